//! Library entry for factlens exposing the fact-check pipeline for integration tests.
//!
//! A claim goes through [`app::FactCheckService`] (credential, page context,
//! remote call), the raw answer through [`parse::ResponseParser`], and the
//! resulting [`state::FactCheckRecord`] is shown by a [`ui::OverlayPresenter`]
//! while [`logic::RequestLifecycle`] tracks loading, success, error, retry and
//! abort.

pub mod app;
pub mod args;
pub mod config;
pub mod i18n;
pub mod logic;
pub mod parse;
pub mod sources;
pub mod state;
pub mod ui;
pub mod util;
