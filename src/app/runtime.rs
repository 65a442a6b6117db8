//! Event loop for one session.
//!
//! A single task waits on three things at once: user intents (keys from a
//! reader thread, or Ctrl-C), the one-second countdown interval, and the
//! request in flight. At most one request is in flight; starting a retry
//! replaces the previous future.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::future::LocalBoxFuture;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::session::{Completion, FactCheckService, OverlaySession};
use crate::config::CredentialStore;
use crate::sources::{FactCheckRpc, PageContextFetcher};
use crate::state::{LifecycleStatus, RequestInput};
use crate::ui::{OverlayPresenter, Result};
use crate::util::{copy_to_clipboard, with_suffix};

/// Something the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserIntent {
    /// Retry a failed request.
    Retry,
    /// Abort the request in flight.
    Abort,
    /// Close the overlay.
    Dismiss,
    /// Copy the result.
    Copy,
    /// Scroll content up one line.
    ScrollUp,
    /// Scroll content down one line.
    ScrollDown,
    /// Ctrl-C: abort while loading, otherwise quit.
    Interrupt,
}

/// How long the loop keeps running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Stop as soon as the request settles.
    OneShot,
    /// Keep the result on screen until dismissed.
    Interactive,
}

/// What: Map a key press to an intent.
///
/// Inputs:
/// - `key`: Key event from crossterm
///
/// Output:
/// - Intent, or `None` for keys without a binding and for key releases
#[must_use]
pub fn intent_for_key(key: &KeyEvent) -> Option<UserIntent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(UserIntent::Interrupt);
    }
    match key.code {
        KeyCode::Char('a' | 'A') => Some(UserIntent::Abort),
        KeyCode::Char('r' | 'R') => Some(UserIntent::Retry),
        KeyCode::Char('c' | 'C' | 'y') => Some(UserIntent::Copy),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(UserIntent::Dismiss),
        KeyCode::Up | KeyCode::Char('k') => Some(UserIntent::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UserIntent::ScrollDown),
        _ => None,
    }
}

/// What: Read terminal keys on a dedicated thread.
///
/// Inputs:
/// - `intent_tx`: Where mapped intents are sent
/// - `cancelled`: Set to stop the thread
///
/// Details:
/// - Polls with a short timeout so the flag is noticed promptly.
/// - Exits when the receiver is gone.
pub fn spawn_key_thread(intent_tx: mpsc::UnboundedSender<UserIntent>, cancelled: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        loop {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            match crossterm::event::poll(Duration::from_millis(50)) {
                Ok(true) => {
                    let Ok(CEvent::Key(key)) = crossterm::event::read() else {
                        continue;
                    };
                    if let Some(intent) = intent_for_key(&key) {
                        if intent_tx.send(intent).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) | Err(_) => {}
            }
        }
    });
}

/// What: Turn Ctrl-C into an [`UserIntent::Interrupt`] for non-raw terminals.
///
/// Inputs:
/// - `intent_tx`: Where the intent is sent
pub fn spawn_interrupt_listener(intent_tx: mpsc::UnboundedSender<UserIntent>) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if intent_tx.send(UserIntent::Interrupt).is_err() {
                break;
            }
        }
    });
}

/// Why the loop woke up.
enum Wake {
    Completed(Completion),
    Tick,
    Intent(UserIntent),
    Closed,
}

async fn wait_for(in_flight: &mut Option<LocalBoxFuture<'_, Completion>>) -> Completion {
    match in_flight {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

/// What: Drive one session from the first request until it ends.
///
/// Inputs:
/// - `session`: Lifecycle and presenter
/// - `service`: Request pipeline
/// - `input`: Claim and page
/// - `intents`: User intents
/// - `mode`: When to stop
/// - `clipboard_suffix`: Text appended to copied results
///
/// Output:
/// - Final lifecycle status (`Idle` when dismissed)
///
/// # Errors
/// - Presenter failures
pub async fn drive<Pr, R, P, C>(
    session: &mut OverlaySession<Pr>,
    service: &FactCheckService<R, P, C>,
    input: RequestInput,
    intents: &mut mpsc::UnboundedReceiver<UserIntent>,
    mode: Mode,
    clipboard_suffix: &str,
) -> Result<LifecycleStatus>
where
    Pr: OverlayPresenter,
    R: FactCheckRpc,
    P: PageContextFetcher,
    C: CredentialStore,
{
    let first = session.begin(input)?;
    let mut in_flight: Option<LocalBoxFuture<'_, Completion>> =
        Some(Box::pin(service.execute(first)));
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        let waiting = in_flight.is_some();
        let loading = session.status().is_loading();
        let wake = tokio::select! {
            c = wait_for(&mut in_flight), if waiting => Wake::Completed(c),
            _ = ticker.tick(), if loading => Wake::Tick,
            Some(intent) = intents.recv() => Wake::Intent(intent),
            else => Wake::Closed,
        };

        match wake {
            Wake::Completed(c) => {
                in_flight = None;
                session.finish(c)?;
            }
            Wake::Tick => session.tick()?,
            Wake::Intent(UserIntent::Abort) => {
                if session.abort()? {
                    in_flight = None;
                }
            }
            Wake::Intent(UserIntent::Interrupt) => {
                if !session.status().is_loading() {
                    tracing::info!("interrupted");
                    break;
                }
                session.abort()?;
                in_flight = None;
            }
            Wake::Intent(UserIntent::Retry) => {
                if let Some(next) = session.retry()? {
                    in_flight = Some(Box::pin(service.execute(next)));
                    ticker.reset();
                }
            }
            Wake::Intent(UserIntent::Dismiss) => {
                session.dismiss()?;
                break;
            }
            Wake::Intent(UserIntent::Copy) => copy_result(session, clipboard_suffix)?,
            Wake::Intent(UserIntent::ScrollUp) => session.scroll(-1)?,
            Wake::Intent(UserIntent::ScrollDown) => session.scroll(1)?,
            Wake::Closed => break,
        }

        if mode == Mode::OneShot && session.status().is_settled() {
            break;
        }
    }
    Ok(session.status().clone())
}

/// What: Copy the current result to the clipboard and report the outcome.
///
/// # Errors
/// - Presenter failures
pub fn copy_result<Pr: OverlayPresenter>(
    session: &mut OverlaySession<Pr>,
    suffix: &str,
) -> Result<()> {
    let Some(text) = session.export() else {
        tracing::debug!("nothing to copy");
        return Ok(());
    };
    let notice = match copy_to_clipboard(&with_suffix(&text, suffix)) {
        Ok(tool) => {
            tracing::info!(tool, "result copied");
            session.messages().t("app.overlay.copied")
        }
        Err(e) => {
            tracing::warn!(error = %e, "copy failed");
            session.messages().t_fmt1("app.overlay.copy_failed", &e)
        }
    };
    session.notify(&notice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn overlay_keys_map_to_intents() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            intent_for_key(&key(KeyCode::Char('a'), none)),
            Some(UserIntent::Abort)
        );
        assert_eq!(
            intent_for_key(&key(KeyCode::Char('r'), none)),
            Some(UserIntent::Retry)
        );
        assert_eq!(
            intent_for_key(&key(KeyCode::Char('c'), none)),
            Some(UserIntent::Copy)
        );
        assert_eq!(
            intent_for_key(&key(KeyCode::Esc, none)),
            Some(UserIntent::Dismiss)
        );
        assert_eq!(
            intent_for_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UserIntent::Interrupt)
        );
        assert_eq!(
            intent_for_key(&key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(intent_for_key(&key(KeyCode::Char('z'), none)), None);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut release = key(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(intent_for_key(&release), None);
    }
}
