//! Perplexity chat-completions client.

use std::borrow::Cow;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::FactCheckRpc;
use crate::config::{Credential, Settings};
use crate::state::FactCheckError;
use crate::util::truncate_with_ellipsis;

/// Instructions that ask for the four-section answer template.
pub const SYSTEM_PROMPT: &str = "You are a multilingual fact-checking assistant. Your primary tasks are:

1. Detect the language of the given text.
2. Respond in the same language as the detected language of the input text.
3. Focus specifically on fact-checking the given selected text, not the entire article or page.
4. Find and provide reliable sources for the claims in the selected text, ensuring they are from different domains and strictly related to the subject.
5. Aim to provide 5-10 sources, prioritizing diversity of domains. Do not invent sources or include unrelated sources.
6. Provide a truth percentage based on the reliability and consensus of the sources. The percentage should reflect how well the selected text is supported by the sources, not the number of sources found.
7. Write a fact check (3-4 concise sentences) that directly addresses the claims in the selected text.
8. Provide context (3-4 concise sentences) that places the selected text within the broader topic or article it's from.

Format your response EXACTLY as follows, in the detected language:

Sources:
1. [source 1 title](URL)
2. [source 2 title](URL)
...

Truth: [percentage]

Fact Check: [your fact check with inline source references, e.g. [1], [2], etc.]

Context: [your context with inline source references, e.g. [1], [2], etc.]

If you cannot find enough reliable sources to fact-check the statement, say so explicitly and explain why. If a claim is widely accepted as common knowledge, state this and provide general reference sources.";

/// Tokens requested by the credential test.
const TEST_MAX_TOKENS: u32 = 10;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    return_citations: bool,
}

/// What: Cap page context at `max_chars` characters.
///
/// Output:
/// - The context, or its first `max_chars` characters followed by `...`
#[must_use]
pub fn truncate_context(context: &str, max_chars: usize) -> Cow<'_, str> {
    let out = truncate_with_ellipsis(context, max_chars);
    if let Cow::Owned(_) = out {
        tracing::debug!(
            chars = context.chars().count(),
            max_chars,
            "page context truncated"
        );
    }
    out
}

/// What: Build the user message for one claim.
///
/// Inputs:
/// - `claim`: Selected text
/// - `context`: Page text, already truncated
/// - `url`: Page address
#[must_use]
pub fn user_prompt(claim: &str, context: &str, url: &str) -> String {
    format!(
        "Fact check the following selected text: \"{claim}\"\n\nBroader context from the page:\n{context}\n\nPage URL: {url}"
    )
}

/// What: Map a non-success HTTP status to an error.
///
/// Inputs:
/// - `status`: Response status
///
/// Output:
/// - `None` for 2xx, otherwise the matching [`FactCheckError`]
#[must_use]
pub fn classify_status(status: reqwest::StatusCode) -> Option<FactCheckError> {
    if status.is_success() {
        return None;
    }
    Some(match status.as_u16() {
        401 => FactCheckError::InvalidCredential,
        429 => FactCheckError::RateLimited,
        404 => FactCheckError::EndpointChanged,
        code => FactCheckError::Api {
            status: Some(code),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        },
    })
}

/// What: Pull the message content out of a chat-completions body.
///
/// Inputs:
/// - `body`: Decoded JSON body
///
/// Output:
/// - `choices[0].message.content`, whatever its JSON type
///
/// # Errors
/// - `Api` when the body carries an `error` object
/// - `InvalidResponse` when there is no first choice or it has no content
pub fn extract_content(body: &Value) -> Result<Value, FactCheckError> {
    if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| err.as_str())
            .unwrap_or("Unknown error");
        return Err(FactCheckError::Api {
            status: None,
            message: message.to_string(),
        });
    }
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| FactCheckError::InvalidResponse("no choices".to_string()))?;
    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .cloned()
        .ok_or_else(|| FactCheckError::InvalidResponse("choice without content".to_string()))
}

/// Client for the Perplexity chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct PerplexityClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_context_chars: usize,
    timeout_secs: u64,
}

impl PerplexityClient {
    /// What: Build a client from settings.
    ///
    /// Inputs:
    /// - `settings`: Endpoint, model and request limits
    ///
    /// Output:
    /// - Client with connection pooling and the configured request timeout
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(format!("factlens/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            max_context_chars: settings.max_context_chars,
            timeout_secs: settings.request_timeout_secs,
        }
    }

    /// What: Check a key with a tiny request.
    ///
    /// Inputs:
    /// - `credential`: Key to test
    ///
    /// # Errors
    /// - `InvalidCredential` (401), `RateLimited` (429) or any other request failure
    pub async fn test_credential(&self, credential: &Credential) -> Result<(), FactCheckError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: Cow::Borrowed("Hello"),
            }],
            max_tokens: TEST_MAX_TOKENS,
            temperature: None,
            return_citations: false,
        };
        self.post(&request, credential).await.map(|_| ())
    }

    async fn post(
        &self,
        request: &ChatRequest<'_>,
        credential: &Credential,
    ) -> Result<Value, FactCheckError> {
        tracing::info!(url = %self.api_url, model = request.model, "sending fact-check request");
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(credential.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if let Some(err) = classify_status(status) {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "service returned an error status");
            return Err(err);
        }
        tracing::info!(status = status.as_u16(), "service responded");
        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(&e)
            } else {
                FactCheckError::InvalidResponse(format!("body is not JSON: {e}"))
            }
        })
    }

    fn transport_error(&self, e: &reqwest::Error) -> FactCheckError {
        if e.is_timeout() {
            tracing::warn!(after_secs = self.timeout_secs, "request timed out");
            FactCheckError::Timeout {
                after_secs: self.timeout_secs,
            }
        } else {
            tracing::warn!(error = %e, "request failed");
            FactCheckError::Network(e.to_string())
        }
    }
}

impl FactCheckRpc for PerplexityClient {
    async fn fact_check(
        &self,
        claim: &str,
        context: &str,
        url: &str,
        credential: &Credential,
    ) -> Result<Value, FactCheckError> {
        let context = truncate_context(context, self.max_context_chars);
        tracing::debug!(
            claim_chars = claim.chars().count(),
            context_chars = context.chars().count(),
            "building fact-check prompt"
        );
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Cow::Borrowed(SYSTEM_PROMPT),
                },
                ChatMessage {
                    role: "user",
                    content: Cow::Owned(user_prompt(claim, &context, url)),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
            return_citations: true,
        };
        let body = self.post(&request, credential).await?;
        let content = extract_content(&body)?;
        if let Some(text) = content.as_str() {
            tracing::debug!(chars = text.chars().count(), "received response content");
        }
        Ok(content)
    }
}
