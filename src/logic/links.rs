//! Citation marker linking.
//!
//! `[n]` markers in prose become markdown links `[\[n\]](url)`. The linked form
//! no longer contains the bare marker, so linking twice changes nothing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::parse::static_regex;
use crate::state::Source;

/// A bracketed token without blanks or nested brackets.
static MARKER: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\[([^\[\]\s]+)\]"));

/// A marker already rewritten by [`link`].
static LINKED: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"\[\\\[([^\[\]\s\\]+)\\\]\]\(([^()\s]*)\)"));

/// What: Replace every `[index]` marker that names a source with a link to it.
///
/// Inputs:
/// - `text`: Prose to rewrite
/// - `sources`: Parsed sources
///
/// Output:
/// - Rewritten text; unchanged when either input is empty
///
/// Details:
/// - Only whole markers match, so `[12]` never links source `1`.
/// - A marker immediately followed by `(` is already a markdown link and is left alone.
/// - When two sources share an index, the later one wins.
#[must_use]
pub fn link(text: &str, sources: &[Source]) -> String {
    if text.is_empty() || sources.is_empty() {
        return text.to_string();
    }
    let targets: HashMap<&str, &str> = sources
        .iter()
        .map(|s| (s.index.as_str(), s.url.as_str()))
        .collect();
    MARKER
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let followed_by_paren = caps
                .get(0)
                .is_some_and(|m| text[m.end()..].starts_with('('));
            match targets.get(&caps[1]) {
                Some(url) if !followed_by_paren => {
                    format!("[\\[{}\\]]({})", &caps[1], link_target(url))
                }
                _ => whole.to_string(),
            }
        })
        .into_owned()
}

/// Percent-encode characters that would end a markdown link target early or
/// read as a citation marker on a later pass.
fn link_target(url: &str) -> Cow<'_, str> {
    if url.contains(['(', ')', ' ', '[', ']']) {
        Cow::Owned(
            url.replace('(', "%28")
                .replace(')', "%29")
                .replace(' ', "%20")
                .replace('[', "%5B")
                .replace(']', "%5D"),
        )
    } else {
        Cow::Borrowed(url)
    }
}

/// Piece of linked prose, for presenters that style links themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text.
    Text(&'a str),
    /// A linked citation marker.
    Citation {
        /// Marker index, without brackets.
        index: &'a str,
        /// Link target.
        url: &'a str,
    },
}

/// What: Split linked prose into plain text and citation pieces.
///
/// Inputs:
/// - `text`: Output of [`link`]
///
/// Output:
/// - Segments in order; adjacent text is never split
#[must_use]
pub fn split_links(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in LINKED.captures_iter(text) {
        let (Some(whole), Some(index), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Text(&text[last..whole.start()]));
        }
        out.push(Segment::Citation {
            index: index.as_str(),
            url: url.as_str(),
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Text(&text[last..]));
    }
    out
}

/// What: Render linked prose with bare `[n]` markers, for plain output.
#[must_use]
pub fn strip_links(text: &str) -> String {
    split_links(text)
        .into_iter()
        .map(|seg| match seg {
            Segment::Text(t) => Cow::Borrowed(t),
            Segment::Citation { index, .. } => Cow::Owned(format!("[{index}]")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Vec<Source> {
        vec![
            Source::new("1", "BBC", "http://bbc.com"),
            Source::new("2", "AP", "http://ap.org"),
        ]
    }

    #[test]
    fn replaces_each_marker_once_and_is_idempotent() {
        let once = link("True [1], see also [2] and [1].", &sources());
        assert_eq!(
            once,
            "True [\\[1\\]](http://bbc.com), see also [\\[2\\]](http://ap.org) and [\\[1\\]](http://bbc.com)."
        );
        assert_eq!(link(&once, &sources()), once);
    }

    #[test]
    fn only_exact_markers_match() {
        let text = "Figures [12] and [1a] and [ 1 ] stay; [BBC](http://x) too.";
        assert_eq!(link(text, &sources()), text);
    }

    #[test]
    fn no_op_for_empty_inputs() {
        assert_eq!(link("", &sources()), "");
        assert_eq!(link("See [1]", &[]), "See [1]");
    }

    #[test]
    fn duplicate_index_links_to_later_source() {
        let dup = vec![Source::new("1", "A", "http://a"), Source::new("1", "B", "http://b")];
        assert_eq!(link("[1]", &dup), "[\\[1\\]](http://b)");
    }

    #[test]
    fn parentheses_in_urls_are_encoded() {
        let s = vec![Source::new("1", "Wiki", "https://en.wikipedia.org/wiki/Rust_(language)")];
        assert_eq!(
            link("[1]", &s),
            "[\\[1\\]](https://en.wikipedia.org/wiki/Rust_%28language%29)"
        );
    }

    #[test]
    /// What: A marker inside a source URL is encoded so a second pass leaves it alone.
    fn brackets_in_urls_are_encoded() {
        let s = vec![Source::new("1", "X", "http://x/a[1]b")];
        let once = link("see [1]", &s);
        assert_eq!(once, "see [\\[1\\]](http://x/a%5B1%5Db)");
        assert_eq!(link(&once, &s), once);
        assert_eq!(strip_links(&once), "see [1]");
    }

    #[test]
    fn split_and_strip_round_out_linked_text() {
        let linked = link("A [1] b [2]", &sources());
        assert_eq!(
            split_links(&linked),
            vec![
                Segment::Text("A "),
                Segment::Citation { index: "1", url: "http://bbc.com" },
                Segment::Text(" b "),
                Segment::Citation { index: "2", url: "http://ap.org" },
            ]
        );
        assert_eq!(strip_links(&linked), "A [1] b [2]");
        assert_eq!(split_links("plain"), vec![Segment::Text("plain")]);
    }
}
