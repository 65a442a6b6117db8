//! External collaborators: the remote fact-check call and the page-context fetcher.
//!
//! Both are traits so the session can run against in-memory fakes in tests.
//! Futures are not required to be `Send`; a session drives them on one task.

use std::future::Future;

use serde_json::Value;

use crate::config::Credential;
use crate::state::FactCheckError;

mod page;
mod perplexity;

pub use page::{HttpPageFetcher, StaticPageContext, visible_text};
pub use perplexity::{
    PerplexityClient, SYSTEM_PROMPT, classify_status, extract_content, truncate_context,
    user_prompt,
};

/// Remote text-generation call that produces the raw fact-check response.
pub trait FactCheckRpc {
    /// What: Ask the service to fact-check a claim.
    ///
    /// Inputs:
    /// - `claim`: Selected text
    /// - `context`: Visible page text (may be empty)
    /// - `url`: Page address (may be empty)
    /// - `credential`: API key
    ///
    /// Output:
    /// - The message content as delivered (normally a string)
    ///
    /// # Errors
    /// - Any [`FactCheckError`] except `MissingCredential` and `UserAborted`, which
    ///   the session produces itself
    fn fact_check(
        &self,
        claim: &str,
        context: &str,
        url: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<Value, FactCheckError>>;
}

/// Best-effort source of the text surrounding a claim.
pub trait PageContextFetcher {
    /// What: Fetch the visible text of a page.
    ///
    /// Inputs:
    /// - `page`: Page address or handle
    ///
    /// Output:
    /// - Visible text; empty on any failure
    fn fetch_visible_text(&self, page: &str) -> impl Future<Output = String>;
}
