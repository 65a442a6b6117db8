//! Failure taxonomy for a single fact-check attempt.

use std::fmt;

/// Classification of a failed attempt, used to pick the remediation hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential missing or rejected by the service.
    InvalidCredential,
    /// Rate limit hit or credits exhausted.
    RateLimited,
    /// The endpoint no longer exists.
    EndpointChanged,
    /// The hard wait ceiling elapsed.
    Timeout,
    /// The user aborted while loading.
    UserAborted,
    /// Anything else (transport failures, unexpected bodies, other statuses).
    NetworkOrUnknown,
}

impl ErrorKind {
    /// What: Decide whether the overlay offers a retry for this kind.
    ///
    /// Output:
    /// - `false` only for credential problems, which need configuration first
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        !matches!(self, Self::InvalidCredential)
    }

    /// Stable lowercase name used in logs and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid_credential",
            Self::RateLimited => "rate_limited",
            Self::EndpointChanged => "endpoint_changed",
            Self::Timeout => "timeout",
            Self::UserAborted => "user_aborted",
            Self::NetworkOrUnknown => "network_or_unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by the remote call or its surroundings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FactCheckError {
    /// No credential is configured.
    MissingCredential,
    /// The service rejected the credential (401).
    InvalidCredential,
    /// Rate limit or quota exceeded (429).
    RateLimited,
    /// The endpoint was not found (404).
    EndpointChanged,
    /// The wait ceiling elapsed.
    Timeout {
        /// Ceiling that was exceeded, in seconds.
        after_secs: u64,
    },
    /// The user aborted the request.
    UserAborted,
    /// Any other non-success status or an error object in the body.
    Api {
        /// HTTP status code, when one was received.
        status: Option<u16>,
        /// Message reported by the service.
        message: String,
    },
    /// The body did not have the expected shape.
    InvalidResponse(String),
    /// Transport failure.
    Network(String),
}

impl FactCheckError {
    /// What: Fold the detailed error into the presentation taxonomy.
    ///
    /// Output:
    /// - Matching [`ErrorKind`]
    ///
    /// Details:
    /// - A missing credential is reported as `InvalidCredential` so the user
    ///   sees the configuration hint rather than a network hint.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential | Self::InvalidCredential => ErrorKind::InvalidCredential,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::EndpointChanged => ErrorKind::EndpointChanged,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::UserAborted => ErrorKind::UserAborted,
            Self::Api { .. } | Self::InvalidResponse(_) | Self::Network(_) => {
                ErrorKind::NetworkOrUnknown
            }
        }
    }
}

impl fmt::Display for FactCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => {
                f.write_str("API Key not found. Please set it with `factlens --set-key`.")
            }
            Self::InvalidCredential => f.write_str(
                "Invalid API key. Please check your Perplexity API key and try again.",
            ),
            Self::RateLimited => f.write_str(
                "API rate limit exceeded or insufficient credits. Please try again later.",
            ),
            Self::EndpointChanged => {
                f.write_str("API endpoint not found. The Perplexity API may have changed.")
            }
            Self::Timeout { after_secs } => write!(
                f,
                "Request to Perplexity API timed out after {after_secs} seconds. Please try again later."
            ),
            Self::UserAborted => f.write_str("The fact check request was aborted."),
            Self::Api {
                status: Some(code),
                message,
            } => write!(f, "Perplexity API error: {code} {message}"),
            Self::Api {
                status: None,
                message,
            } => write!(f, "Perplexity API error: {message}"),
            Self::InvalidResponse(detail) => write!(
                f,
                "Invalid response format from Perplexity API ({detail}). The response structure may have changed."
            ),
            Self::Network(detail) => write!(f, "Network error: {detail}"),
        }
    }
}

impl std::error::Error for FactCheckError {}
