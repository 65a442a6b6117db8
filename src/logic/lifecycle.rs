//! Request lifecycle state machine.
//!
//! `Idle -> Loading -> {Success, Error}`, `Error -> Loading` on retry when the
//! error allows it, `Loading -> Error(UserAborted)` on abort, and any state back
//! to `Idle` on dismiss. Each `Loading` entry hands out a [`RequestTicket`];
//! completions carrying an outdated ticket are rejected as stale, which is how
//! a late response after an abort or a newer request gets discarded.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::state::{
    ErrorKind, FactCheckError, FactCheckRecord, LifecycleStatus, RequestInput,
};

/// Default display countdown, in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 120;

/// Why a transition was refused. State is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionError {
    /// The operation needs a request in flight.
    NotLoading,
    /// The current error does not allow retrying.
    NotRetryable,
    /// Retry requested outside an error state or without captured inputs.
    NothingToRetry,
    /// The ticket belongs to a retired request.
    Stale,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotLoading => "no request is in flight",
            Self::NotRetryable => "this error cannot be retried",
            Self::NothingToRetry => "there is no failed request to retry",
            Self::Stale => "the request was superseded",
        })
    }
}

impl std::error::Error for TransitionError {}

/// Handle for one `Loading` entry.
#[derive(Clone, Debug)]
pub struct RequestTicket {
    id: u64,
    cancel: CancellationToken,
}

impl RequestTicket {
    /// Generation number of the request.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Token cancelled when the request is aborted, replaced, or dismissed.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Per-session lifecycle of at most one fact-check request.
#[derive(Debug)]
pub struct RequestLifecycle {
    status: LifecycleStatus,
    input: Option<RequestInput>,
    page_context: Option<String>,
    generation: u64,
    cancel: Option<CancellationToken>,
    countdown_secs: u32,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

impl RequestLifecycle {
    /// What: Create an idle lifecycle.
    ///
    /// Inputs:
    /// - `countdown_secs`: Display budget shown while loading
    ///
    /// Output:
    /// - Lifecycle in `Idle`
    #[must_use]
    pub const fn new(countdown_secs: u32) -> Self {
        Self {
            status: LifecycleStatus::Idle,
            input: None,
            page_context: None,
            generation: 0,
            cancel: None,
            countdown_secs,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> &LifecycleStatus {
        &self.status
    }

    /// Inputs of the current or last request.
    #[must_use]
    pub const fn input(&self) -> Option<&RequestInput> {
        self.input.as_ref()
    }

    /// Page context captured for the current request.
    #[must_use]
    pub fn page_context(&self) -> Option<&str> {
        self.page_context.as_deref()
    }

    /// What: Enter `Loading` for a new claim.
    ///
    /// Inputs:
    /// - `input`: Claim and page
    ///
    /// Output:
    /// - Ticket for the new request
    ///
    /// Details:
    /// - Allowed from any state. A request still in flight is retired first: its
    ///   token is cancelled and its ticket becomes stale.
    pub fn start(&mut self, input: RequestInput) -> RequestTicket {
        if self.status.is_loading() {
            tracing::info!(previous = self.generation, "retiring in-flight request");
        }
        self.page_context = None;
        self.input = Some(input);
        self.enter_loading()
    }

    /// What: Attach page context fetched for the current request.
    ///
    /// Inputs:
    /// - `ticket`: Ticket from [`start`](Self::start)
    /// - `context`: Visible page text (may be empty)
    ///
    /// # Errors
    /// - `Stale` for a retired ticket, `NotLoading` once settled
    pub fn record_page_context(
        &mut self,
        ticket: &RequestTicket,
        context: String,
    ) -> Result<(), TransitionError> {
        self.check_current(ticket)?;
        self.page_context = Some(context);
        Ok(())
    }

    /// What: Advance the display countdown by one second.
    ///
    /// Output:
    /// - `true` when the displayed value changed
    ///
    /// Details:
    /// - Stops at zero. Reaching zero does not end the request.
    pub fn tick(&mut self) -> bool {
        match &mut self.status {
            LifecycleStatus::Loading { remaining_secs } if *remaining_secs > 0 => {
                *remaining_secs -= 1;
                true
            }
            _ => false,
        }
    }

    /// What: Settle the current request with a parsed record.
    ///
    /// # Errors
    /// - `Stale` for a retired ticket, `NotLoading` once settled
    pub fn succeed(
        &mut self,
        ticket: &RequestTicket,
        record: FactCheckRecord,
    ) -> Result<(), TransitionError> {
        self.check_current(ticket)?;
        tracing::info!(
            request = ticket.id,
            sources = record.sources.len(),
            truth = %record.truth_percentage,
            "fact check succeeded"
        );
        self.cancel = None;
        self.page_context = None;
        self.status = LifecycleStatus::Success(record);
        Ok(())
    }

    /// What: Settle the current request with an error.
    ///
    /// # Errors
    /// - `Stale` for a retired ticket, `NotLoading` once settled
    pub fn fail(
        &mut self,
        ticket: &RequestTicket,
        error: &FactCheckError,
    ) -> Result<(), TransitionError> {
        self.check_current(ticket)?;
        self.cancel = None;
        self.set_error(error.to_string(), error.kind());
        Ok(())
    }

    /// What: Settle the current request with whatever the call produced.
    ///
    /// # Errors
    /// - `Stale` for a retired ticket, `NotLoading` once settled
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        outcome: Result<FactCheckRecord, FactCheckError>,
    ) -> Result<(), TransitionError> {
        let result = match outcome {
            Ok(record) => self.succeed(ticket, record),
            Err(e) => self.fail(ticket, &e),
        };
        if result == Err(TransitionError::Stale) {
            tracing::debug!(request = ticket.id, current = self.generation, "discarding stale completion");
        }
        result
    }

    /// What: Abort the request in flight.
    ///
    /// # Errors
    /// - `NotLoading` when nothing is in flight
    ///
    /// Details:
    /// - Cancels the token and retires the ticket, so the eventual response is
    ///   discarded. Inputs are kept for a retry.
    pub fn abort(&mut self) -> Result<(), TransitionError> {
        if !self.status.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        self.retire();
        self.set_error(FactCheckError::UserAborted.to_string(), ErrorKind::UserAborted);
        Ok(())
    }

    /// What: Re-enter `Loading` with the captured inputs.
    ///
    /// Output:
    /// - Ticket for the new attempt; page context is kept
    ///
    /// # Errors
    /// - `NotRetryable` for credential errors
    /// - `NothingToRetry` outside `Error` or without captured inputs
    pub fn retry(&mut self) -> Result<RequestTicket, TransitionError> {
        match &self.status {
            LifecycleStatus::Error { retryable: false, .. } => Err(TransitionError::NotRetryable),
            LifecycleStatus::Error { .. } if self.input.is_some() => {
                tracing::info!(request = self.generation + 1, "retrying fact check");
                Ok(self.enter_loading())
            }
            _ => Err(TransitionError::NothingToRetry),
        }
    }

    /// What: Close the session view and return to `Idle`.
    ///
    /// Details:
    /// - Always allowed. Cancels anything in flight and drops captured inputs.
    pub fn dismiss(&mut self) {
        self.retire();
        self.input = None;
        self.page_context = None;
        if !matches!(self.status, LifecycleStatus::Idle) {
            tracing::info!(from = self.status.name(), "overlay dismissed");
        }
        self.status = LifecycleStatus::Idle;
    }

    fn enter_loading(&mut self) -> RequestTicket {
        self.retire();
        self.generation += 1;
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.status = LifecycleStatus::Loading {
            remaining_secs: self.countdown_secs,
        };
        tracing::info!(request = self.generation, "fact check loading");
        RequestTicket {
            id: self.generation,
            cancel,
        }
    }

    /// Cancel the outstanding token and make every issued ticket stale.
    fn retire(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
            self.generation += 1;
        }
    }

    fn set_error(&mut self, message: String, kind: ErrorKind) {
        tracing::info!(kind = %kind, "fact check failed");
        self.status = LifecycleStatus::Error {
            message,
            kind,
            retryable: kind.is_retryable(),
        };
    }

    fn check_current(&self, ticket: &RequestTicket) -> Result<(), TransitionError> {
        if ticket.id != self.generation {
            return Err(TransitionError::Stale);
        }
        if !self.status.is_loading() {
            return Err(TransitionError::NotLoading);
        }
        Ok(())
    }
}

/// What: Format seconds as `m:ss`.
///
/// Inputs:
/// - `secs`: Remaining seconds
///
/// Output:
/// - e.g. `2:00`, `0:07`
#[must_use]
pub fn format_remaining(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
