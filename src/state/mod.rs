//! Value types shared by the parser, the request lifecycle and the presenters.
//!
//! Nothing in here performs I/O. The parsed [`FactCheckRecord`] is what the
//! overlay renders, [`LifecycleStatus`] is what drives which overlay screen
//! is shown, and [`FactCheckError`] is the failure taxonomy of one attempt.

pub mod error;
pub mod types;

pub use error::{ErrorKind, FactCheckError};
pub use types::{
    CONTEXT_NOT_PROVIDED, CONTEXT_TRY_AGAIN, FACT_CHECK_NOT_PROVIDED, FACT_CHECK_UNPROCESSABLE,
    FactCheckRecord, LifecycleStatus, RequestInput, Source, TRUTH_NOT_AVAILABLE, UNLINKED_URL,
};
