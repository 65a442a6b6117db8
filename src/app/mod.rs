//! Application wiring: picks the collaborators and the presenter, then runs a session.

pub mod runtime;
pub mod session;
mod terminal;

pub use runtime::{Mode, UserIntent, copy_result, drive, intent_for_key};
pub use session::{Completion, FactCheckService, OverlaySession, PendingRequest};

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use serde_json::json;
use tokio::sync::mpsc;

use crate::args::{Args, read_claim};
use crate::config::{CredentialStore, Settings, SettingsCredentialStore, settings_path};
use crate::i18n::{Localization, load_localization, resolve_locale};
use crate::logic::{TruthColorMapper, export_text};
use crate::parse::ResponseParser;
use crate::sources::{
    FactCheckRpc, HttpPageFetcher, PageContextFetcher, PerplexityClient, StaticPageContext,
};
use crate::state::{LifecycleStatus, RequestInput};
use crate::ui::{OverlayPresenter, Palette, PlainPresenter, TuiOverlay, ViewBuilder};
use crate::util::{copy_to_clipboard, with_suffix};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Page context from the network or from a file.
enum PageSource {
    Http(HttpPageFetcher),
    Static(StaticPageContext),
}

impl PageContextFetcher for PageSource {
    async fn fetch_visible_text(&self, page: &str) -> String {
        match self {
            Self::Http(f) => f.fetch_visible_text(page).await,
            Self::Static(f) => f.fetch_visible_text(page).await,
        }
    }
}

/// What: JSON document describing a final status.
///
/// Inputs:
/// - `status`: Final lifecycle status
/// - `mapper`: Truth color mapper for the band name
///
/// Output:
/// - `{"status": "success", "truthBand": ..., "record": {...}}`, or the error
///   kind and message for failures
#[must_use]
pub fn status_json(status: &LifecycleStatus, mapper: &TruthColorMapper) -> serde_json::Value {
    match status {
        LifecycleStatus::Success(record) => json!({
            "status": status.name(),
            "truthBand": mapper.color_for(&record.truth_percentage).as_str(),
            "record": record,
        }),
        LifecycleStatus::Error {
            message,
            kind,
            retryable,
        } => json!({
            "status": status.name(),
            "kind": kind.as_str(),
            "message": message,
            "retryable": retryable,
        }),
        other => json!({ "status": other.name() }),
    }
}

/// What: Run factlens for parsed arguments.
///
/// Inputs:
/// - `args`: Command line
/// - `settings`: Loaded settings
///
/// Output:
/// - Process exit code: 0 on success, 1 when the fact check failed, 2 for usage errors
///
/// # Errors
/// - Terminal, presenter or file errors
///
/// Details:
/// - `--parse-file` never touches the network.
/// - The overlay is used when stdout is a terminal and neither `--plain` nor
///   `--json` is given; otherwise the session runs once and prints the result.
pub async fn run(args: &Args, settings: &Settings) -> Result<i32> {
    let locale = resolve_locale(args.locale.as_deref(), settings.locale.as_deref());
    let l10n = load_localization(&locale, &settings.fact_check_labels);
    let color = args.use_color(settings);

    if let Some(path) = &args.parse_file {
        return run_offline(args, settings, path, &l10n, color);
    }

    let Some(claim) = read_claim(args) else {
        eprintln!("{}", l10n.messages.t("app.cli.no_claim"));
        return Ok(2);
    };
    let pages = match &args.context_file {
        Some(path) => PageSource::Static(StaticPageContext(std::fs::read_to_string(path)?)),
        None => PageSource::Http(HttpPageFetcher::new()),
    };
    let service = FactCheckService::new(
        PerplexityClient::new(settings),
        pages,
        SettingsCredentialStore::from_environment(settings_path()),
        ResponseParser::new(&l10n.labels),
        Duration::from_secs(settings.request_timeout_secs),
    );
    let input = RequestInput::new(claim, args.url.clone().unwrap_or_default());
    let mapper = TruthColorMapper::new(&l10n.labels);
    let views = ViewBuilder::new(l10n.messages.clone(), mapper.clone());
    let (intent_tx, mut intents) = mpsc::unbounded_channel();

    if !(args.plain || args.json) && std::io::stdout().is_terminal() {
        tracing::info!("starting overlay");
        terminal::setup_terminal()?;
        let cancelled = Arc::new(AtomicBool::new(false));
        runtime::spawn_key_thread(intent_tx, Arc::clone(&cancelled));
        let outcome = async {
            let overlay = TuiOverlay::new(
                CrosstermBackend::new(std::io::stdout()),
                views,
                Palette::new(color),
            )?;
            let mut session =
                OverlaySession::new(overlay, settings.countdown_secs, l10n.messages.clone());
            drive(
                &mut session,
                &service,
                input,
                &mut intents,
                Mode::Interactive,
                &settings.clipboard_suffix,
            )
            .await
        }
        .await;
        cancelled.store(true, Ordering::Relaxed);
        if let Err(e) = terminal::restore_terminal() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
        outcome?;
        return Ok(0);
    }

    runtime::spawn_interrupt_listener(intent_tx);
    let status = if args.json {
        let presenter = PlainPresenter::new(std::io::stderr(), views, Palette::new(false));
        let status = run_once(presenter, &service, input, &mut intents, args, settings, &l10n).await?;
        println!("{}", status_json(&status, &mapper));
        status
    } else {
        let palette = Palette::new(color && std::io::stdout().is_terminal());
        let presenter = PlainPresenter::new(std::io::stdout(), views, palette);
        run_once(presenter, &service, input, &mut intents, args, settings, &l10n).await?
    };
    Ok(i32::from(!matches!(status, LifecycleStatus::Success(_))))
}

/// Run one request to completion with a line presenter.
async fn run_once<W, R, P, C>(
    presenter: PlainPresenter<W>,
    service: &FactCheckService<R, P, C>,
    input: RequestInput,
    intents: &mut mpsc::UnboundedReceiver<UserIntent>,
    args: &Args,
    settings: &Settings,
    l10n: &Localization,
) -> Result<LifecycleStatus>
where
    W: Write,
    R: FactCheckRpc,
    P: PageContextFetcher,
    C: CredentialStore,
{
    let mut session = OverlaySession::new(presenter, settings.countdown_secs, l10n.messages.clone());
    let status = drive(
        &mut session,
        service,
        input,
        intents,
        Mode::OneShot,
        &settings.clipboard_suffix,
    )
    .await?;
    if args.copy {
        copy_result(&mut session, &settings.clipboard_suffix)?;
    }
    Ok(status)
}

/// Parse a saved response and present it.
fn run_offline(
    args: &Args,
    settings: &Settings,
    path: &str,
    l10n: &Localization,
    color: bool,
) -> Result<i32> {
    let raw = std::fs::read_to_string(path)?;
    tracing::info!(path, bytes = raw.len(), "parsing saved response");
    let record = ResponseParser::new(&l10n.labels).parse(&raw);
    let mapper = TruthColorMapper::new(&l10n.labels);

    if args.json {
        let status = LifecycleStatus::Success(record.clone());
        println!("{}", status_json(&status, &mapper));
    } else {
        let palette = Palette::new(color && std::io::stdout().is_terminal());
        let mut presenter = PlainPresenter::new(
            std::io::stdout(),
            ViewBuilder::new(l10n.messages.clone(), mapper),
            palette,
        );
        presenter.render_record(&record)?;
    }
    if args.copy {
        let text = with_suffix(&export_text(&record), &settings.clipboard_suffix);
        match copy_to_clipboard(&text) {
            Ok(tool) => tracing::info!(tool, "result copied"),
            Err(e) => eprintln!("{}", l10n.messages.t_fmt1("app.overlay.copy_failed", e)),
        }
    }
    Ok(0)
}
