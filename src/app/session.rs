//! One fact-check session: the request pipeline and the lifecycle it drives.
//!
//! [`FactCheckService`] performs a single attempt (credential, page context,
//! remote call, parse) and never touches lifecycle state. [`OverlaySession`]
//! owns the lifecycle and the presenter and applies completions, dropping
//! those whose ticket was retired in the meantime.

use std::time::Duration;

use crate::config::CredentialStore;
use crate::i18n::Messages;
use crate::logic::{RequestLifecycle, RequestTicket, TransitionError, export_text};
use crate::parse::ResponseParser;
use crate::sources::{FactCheckRpc, PageContextFetcher};
use crate::state::{FactCheckError, FactCheckRecord, LifecycleStatus, RequestInput};
use crate::ui::{OverlayPresenter, Result};

/// Work handed from the session to the service for one `Loading` entry.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    /// Ticket of the `Loading` entry.
    pub ticket: RequestTicket,
    /// Claim and page.
    pub input: RequestInput,
    /// Page text from an earlier attempt; fetched again when `None`.
    pub page_context: Option<String>,
}

/// Result of one attempt, tagged with the ticket it belongs to.
#[derive(Debug)]
pub struct Completion {
    /// Ticket the attempt was started with.
    pub ticket: RequestTicket,
    /// Page text used, kept for a retry.
    pub page_context: Option<String>,
    /// Parsed record or the failure.
    pub outcome: std::result::Result<FactCheckRecord, FactCheckError>,
}

/// Runs fact-check attempts against the collaborators.
pub struct FactCheckService<R, P, C> {
    rpc: R,
    pages: P,
    credentials: C,
    parser: ResponseParser,
    timeout: Duration,
}

impl<R, P, C> FactCheckService<R, P, C>
where
    R: FactCheckRpc,
    P: PageContextFetcher,
    C: CredentialStore,
{
    /// What: Assemble a service.
    ///
    /// Inputs:
    /// - `rpc`: Remote fact-check call
    /// - `pages`: Page-context fetcher
    /// - `credentials`: Credential store, consulted on every attempt
    /// - `parser`: Response parser for the active labels
    /// - `timeout`: Hard ceiling on the remote call
    pub const fn new(
        rpc: R,
        pages: P,
        credentials: C,
        parser: ResponseParser,
        timeout: Duration,
    ) -> Self {
        Self {
            rpc,
            pages,
            credentials,
            parser,
            timeout,
        }
    }

    /// The remote call.
    pub const fn rpc(&self) -> &R {
        &self.rpc
    }

    /// The page-context fetcher.
    pub const fn pages(&self) -> &P {
        &self.pages
    }

    /// What: Perform one attempt.
    ///
    /// Inputs:
    /// - `request`: Ticket, inputs and any page context from an earlier attempt
    ///
    /// Output:
    /// - Completion carrying the same ticket
    ///
    /// Details:
    /// - Without a credential the remote call is never made.
    /// - The ticket's cancellation token ends the wait with `UserAborted`; the
    ///   hard ceiling ends it with `Timeout`, independent of any display countdown.
    pub async fn execute(&self, request: PendingRequest) -> Completion {
        let PendingRequest {
            ticket,
            input,
            page_context,
        } = request;

        let Some(credential) = self.credentials.get_credential() else {
            tracing::warn!(request = ticket.id(), "no API key configured");
            return Completion {
                ticket,
                page_context,
                outcome: Err(FactCheckError::MissingCredential),
            };
        };

        let cancel = ticket.cancellation().clone();
        let context = if let Some(context) = page_context {
            context
        } else {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    return Completion { ticket, page_context: None, outcome: Err(FactCheckError::UserAborted) };
                }
                text = self.pages.fetch_visible_text(&input.page_url) => text,
            }
        };

        let call = self.rpc.fact_check(
            &input.selection_text,
            &context,
            &input.page_url,
            &credential,
        );
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FactCheckError::UserAborted),
            result = tokio::time::timeout(self.timeout, call) => match result {
                Ok(Ok(raw)) => Ok(self.parser.parse_value(&raw)),
                Ok(Err(e)) => Err(e),
                Err(_) => {
                    tracing::warn!(after_secs = self.timeout.as_secs(), "request exceeded the hard ceiling");
                    Err(FactCheckError::Timeout { after_secs: self.timeout.as_secs() })
                }
            },
        };
        Completion {
            ticket,
            page_context: Some(context),
            outcome,
        }
    }
}

/// Lifecycle plus presenter for one claim.
pub struct OverlaySession<Pr> {
    lifecycle: RequestLifecycle,
    presenter: Pr,
    messages: Messages,
}

impl<Pr: OverlayPresenter> OverlaySession<Pr> {
    /// What: Create an idle session.
    ///
    /// Inputs:
    /// - `presenter`: Where the session is shown
    /// - `countdown_secs`: Display budget while loading
    /// - `messages`: Strings for notices
    pub const fn new(presenter: Pr, countdown_secs: u32, messages: Messages) -> Self {
        Self {
            lifecycle: RequestLifecycle::new(countdown_secs),
            presenter,
            messages,
        }
    }

    /// Strings for notices.
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Current status.
    pub const fn status(&self) -> &LifecycleStatus {
        self.lifecycle.status()
    }

    /// The presenter.
    pub const fn presenter(&self) -> &Pr {
        &self.presenter
    }

    /// Give back the presenter.
    pub fn into_presenter(self) -> Pr {
        self.presenter
    }

    /// What: Start a fact check, retiring any request still in flight.
    ///
    /// # Errors
    /// - Presenter failures
    pub fn begin(&mut self, input: RequestInput) -> Result<PendingRequest> {
        let ticket = self.lifecycle.start(input.clone());
        self.render()?;
        Ok(PendingRequest {
            ticket,
            input,
            page_context: None,
        })
    }

    /// What: Retry the failed request.
    ///
    /// Output:
    /// - Work for the new attempt, `None` when retry is not allowed right now
    ///
    /// # Errors
    /// - Presenter failures
    pub fn retry(&mut self) -> Result<Option<PendingRequest>> {
        match self.lifecycle.retry() {
            Ok(ticket) => {
                let Some(input) = self.lifecycle.input().cloned() else {
                    return Ok(None);
                };
                let page_context = self.lifecycle.page_context().map(str::to_string);
                self.render()?;
                Ok(Some(PendingRequest {
                    ticket,
                    input,
                    page_context,
                }))
            }
            Err(e) => {
                tracing::debug!(error = %e, "retry refused");
                let msg = self.unavailable_message(e);
                self.presenter.notify(&msg)?;
                Ok(None)
            }
        }
    }

    /// What: Abort the request in flight.
    ///
    /// Output:
    /// - `true` when a request was aborted
    ///
    /// # Errors
    /// - Presenter failures
    pub fn abort(&mut self) -> Result<bool> {
        match self.lifecycle.abort() {
            Ok(()) => {
                self.render()?;
                Ok(true)
            }
            Err(e) => {
                tracing::debug!(error = %e, "abort refused");
                let msg = self.unavailable_message(e);
                self.presenter.notify(&msg)?;
                Ok(false)
            }
        }
    }

    /// What: Close the overlay and return to `Idle`.
    ///
    /// # Errors
    /// - Presenter failures
    pub fn dismiss(&mut self) -> Result<()> {
        self.lifecycle.dismiss();
        self.render()
    }

    /// What: Advance the countdown, redrawing when it changed.
    ///
    /// # Errors
    /// - Presenter failures
    pub fn tick(&mut self) -> Result<()> {
        if self.lifecycle.tick() {
            self.render()?;
        }
        Ok(())
    }

    /// What: Apply a finished attempt.
    ///
    /// Output:
    /// - `true` when applied, `false` when it was discarded as outdated
    ///
    /// # Errors
    /// - Presenter failures
    pub fn finish(&mut self, completion: Completion) -> Result<bool> {
        let Completion {
            ticket,
            page_context,
            outcome,
        } = completion;
        if let Some(context) = page_context {
            if let Err(e) = self.lifecycle.record_page_context(&ticket, context) {
                tracing::debug!(request = ticket.id(), error = %e, "page context discarded");
            }
        }
        match self.lifecycle.complete(&ticket, outcome) {
            Ok(()) => {
                self.render()?;
                Ok(true)
            }
            Err(e) => {
                tracing::debug!(request = ticket.id(), error = %e, "completion discarded");
                Ok(false)
            }
        }
    }

    /// What: Plain-text export of the current result.
    ///
    /// Output:
    /// - Export text when the session shows a record
    pub fn export(&self) -> Option<String> {
        match self.lifecycle.status() {
            LifecycleStatus::Success(record) => Some(export_text(record)),
            _ => None,
        }
    }

    /// What: Pass a notice to the presenter.
    ///
    /// # Errors
    /// - Presenter failures
    pub fn notify(&mut self, message: &str) -> Result<()> {
        self.presenter.notify(message)
    }

    /// What: Scroll the presenter.
    ///
    /// # Errors
    /// - Presenter failures
    pub fn scroll(&mut self, lines: i16) -> Result<()> {
        self.presenter.scroll(lines)
    }

    fn render(&mut self) -> Result<()> {
        self.presenter.render(self.lifecycle.status())
    }

    fn unavailable_message(&self, e: TransitionError) -> String {
        self.messages.t(match e {
            TransitionError::NotLoading => "app.overlay.abort_unavailable",
            TransitionError::NotRetryable
            | TransitionError::NothingToRetry
            | TransitionError::Stale => "app.overlay.retry_unavailable",
        })
    }
}
