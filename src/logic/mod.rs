//! Core non-UI logic: citation linking, truth coloring, the request lifecycle
//! and the plain-text export.

pub mod export;
pub mod lifecycle;
pub mod links;
pub mod truth;

pub use export::export_text;
pub use lifecycle::{RequestLifecycle, RequestTicket, TransitionError, format_remaining};
pub use links::{Segment, link, split_links, strip_links};
pub use truth::{ColorBand, TruthColorMapper, TruthValue, color_for};
