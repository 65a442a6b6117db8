//! In-memory collaborators for session tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use factlens as crate_root;
use serde_json::Value;

use crate_root::app::{FactCheckService, OverlaySession};
use crate_root::config::Credential;
use crate_root::i18n::load_localization;
use crate_root::parse::ResponseParser;
use crate_root::sources::{FactCheckRpc, PageContextFetcher};
use crate_root::state::{FactCheckError, FactCheckRecord, LifecycleStatus, RequestInput};
use crate_root::ui::{OverlayPresenter, Result};

/// Response following the four-section template.
pub const TEMPLATE: &str = "Sources:\n1. [BBC](http://bbc.com)\n\nTruth: 75%\n\nFact Check: Claim is mostly true [1].\n\nContext: Reported widely.";

/// Remote call that replays scripted replies and records what it was asked.
#[derive(Default)]
pub struct ScriptedRpc {
    replies: RefCell<VecDeque<std::result::Result<Value, FactCheckError>>>,
    delay: Option<Duration>,
    never_resolves: bool,
    /// Number of calls made.
    pub calls: Cell<usize>,
    /// Context passed on each call.
    pub contexts: RefCell<Vec<String>>,
}

impl ScriptedRpc {
    /// Replies in order; once exhausted every call returns [`TEMPLATE`].
    pub fn replying(replies: Vec<std::result::Result<Value, FactCheckError>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            ..Self::default()
        }
    }

    /// Every call waits `delay` before answering.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Calls never complete.
    pub fn hanging() -> Self {
        Self {
            never_resolves: true,
            ..Self::default()
        }
    }

    /// Replies in order, then every further call never completes.
    pub fn replying_then_hanging(
        replies: Vec<std::result::Result<Value, FactCheckError>>,
    ) -> Self {
        Self {
            never_resolves: true,
            ..Self::replying(replies)
        }
    }
}

impl FactCheckRpc for ScriptedRpc {
    async fn fact_check(
        &self,
        _claim: &str,
        context: &str,
        _url: &str,
        _credential: &Credential,
    ) -> std::result::Result<Value, FactCheckError> {
        self.calls.set(self.calls.get() + 1);
        self.contexts.borrow_mut().push(context.to_string());
        let scripted = self.replies.borrow_mut().pop_front();
        if scripted.is_none() && self.never_resolves {
            std::future::pending::<()>().await;
        }
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        scripted.unwrap_or_else(|| Ok(Value::String(TEMPLATE.to_string())))
    }
}

/// Page fetcher returning fixed text and counting fetches.
#[derive(Default)]
pub struct CountingPages {
    /// Text served for every page.
    pub text: String,
    /// Number of fetches.
    pub fetches: Cell<usize>,
}

impl PageContextFetcher for CountingPages {
    async fn fetch_visible_text(&self, _page: &str) -> String {
        self.fetches.set(self.fetches.get() + 1);
        self.text.clone()
    }
}

/// Presenter that remembers everything it was asked to show.
#[derive(Default)]
pub struct RecordingPresenter {
    /// Every rendered status, in order.
    pub frames: Vec<LifecycleStatus>,
    /// Records rendered on their own.
    pub records: Vec<FactCheckRecord>,
    /// Notices.
    pub notices: Vec<String>,
}

impl OverlayPresenter for RecordingPresenter {
    fn render(&mut self, status: &LifecycleStatus) -> Result<()> {
        self.frames.push(status.clone());
        Ok(())
    }

    fn render_record(&mut self, record: &FactCheckRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}

/// A credential long enough to look real.
pub fn credential() -> Option<Credential> {
    Some(Credential::new("pplx-test-0123456789abcdef"))
}

/// Service over the fakes with the builtin labels.
pub fn service(
    rpc: ScriptedRpc,
    pages: CountingPages,
    credentials: Option<Credential>,
    timeout: Duration,
) -> FactCheckService<ScriptedRpc, CountingPages, Option<Credential>> {
    FactCheckService::new(rpc, pages, credentials, ResponseParser::default(), timeout)
}

/// English session over a recording presenter.
pub fn session() -> OverlaySession<RecordingPresenter> {
    OverlaySession::new(
        RecordingPresenter::default(),
        120,
        load_localization("en-US", &[]).messages,
    )
}

/// A claim on a page.
pub fn input() -> RequestInput {
    RequestInput::new("The claim under test", "https://example.org/article")
}
