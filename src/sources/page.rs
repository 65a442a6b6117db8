//! Page-context fetchers.

use std::time::Duration;

use ego_tree::NodeRef;
use scraper::{Html, Node};

use super::PageContextFetcher;

/// Elements whose content is never visible text.
const HIDDEN: [&str; 8] = [
    "script", "style", "noscript", "template", "head", "svg", "iframe", "canvas",
];

/// Elements that start a new line.
const BLOCKS: [&str; 22] = [
    "p", "div", "section", "article", "header", "footer", "main", "nav", "aside", "table",
    "tr", "ul", "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
];

/// What: Extract the visible text of an HTML document.
///
/// Inputs:
/// - `html`: Raw HTML
///
/// Output:
/// - Text with whitespace runs collapsed, one line per block element, no blank lines
///
/// Details:
/// - Script, style and similar elements are skipped entirely.
#[must_use]
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut buf = String::new();
    if let Some(root) = document.tree.get(document.root_element().id()) {
        render_node(&mut buf, root);
    }
    buf.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append the visible text under `node` to `buf`.
fn render_node(buf: &mut String, node: NodeRef<'_, Node>) {
    match node.value() {
        Node::Text(t) => push_text(buf, t),
        Node::Element(el) => {
            let name = el.name();
            if HIDDEN.contains(&name) {
                return;
            }
            let is_block = BLOCKS.contains(&name);
            if (is_block || name == "br") && !buf.ends_with('\n') {
                buf.push('\n');
            }
            for child in node.children() {
                render_node(buf, child);
            }
            if is_block && !buf.ends_with('\n') {
                buf.push('\n');
            }
        }
        _ => {}
    }
}

/// Append text, collapsing whitespace runs to one space.
fn push_text(buf: &mut String, text: &str) {
    let mut last_was_space = buf.ends_with(' ') || buf.ends_with('\n');
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                buf.push(' ');
                last_was_space = true;
            }
        } else {
            buf.push(ch);
            last_was_space = false;
        }
    }
}

/// Fetches a page over HTTP and extracts its visible text.
#[derive(Clone, Debug)]
pub struct HttpPageFetcher {
    http: reqwest::Client,
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpPageFetcher {
    /// What: Build a fetcher with short timeouts.
    ///
    /// Output:
    /// - Fetcher that gives up after 15 seconds
    #[must_use]
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(15))
            .user_agent(format!("factlens/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, String> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| format!("Network error: {e}"))?;
        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()));
        }
        response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {e}"))
    }
}

impl PageContextFetcher for HttpPageFetcher {
    async fn fetch_visible_text(&self, page: &str) -> String {
        let url = page.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            tracing::debug!(page = url, "no fetchable page, continuing without context");
            return String::new();
        }
        match self.fetch_html(url).await {
            Ok(html) => {
                let text = visible_text(&html);
                tracing::info!(url, chars = text.chars().count(), "fetched page context");
                text
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "page context unavailable");
                String::new()
            }
        }
    }
}

/// Page context supplied up front (a file, stdin, or nothing).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticPageContext(pub String);

impl PageContextFetcher for StaticPageContext {
    async fn fetch_visible_text(&self, _page: &str) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_text_skips_scripts_and_keeps_blocks() {
        let html = r"<html><head><title>T</title><style>p{}</style></head>
            <body><h1>Headline</h1><script>var x = 1;</script>
            <p>First   paragraph
            continues.</p><ul><li>One</li><li>Two</li></ul>
            <noscript>enable js</noscript><p>Last<br>line</p></body></html>";
        assert_eq!(
            visible_text(html),
            "Headline\nFirst paragraph continues.\nOne\nTwo\nLast\nline"
        );
    }

    #[test]
    fn empty_document_has_no_text() {
        assert_eq!(visible_text(""), "");
    }

    #[tokio::test]
    async fn static_context_and_unfetchable_pages() {
        let fixed = StaticPageContext("from file".to_string());
        assert_eq!(fixed.fetch_visible_text("ignored").await, "from file");
        assert_eq!(HttpPageFetcher::new().fetch_visible_text("").await, "");
        assert_eq!(
            HttpPageFetcher::new().fetch_visible_text("not a url").await,
            ""
        );
    }
}
