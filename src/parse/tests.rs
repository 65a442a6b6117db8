use super::*;
use crate::i18n::labels::SectionKind;
use crate::state::{CONTEXT_TRY_AGAIN, FACT_CHECK_UNPROCESSABLE, Source};

const TEMPLATE: &str = "Sources:\n1. [BBC](http://bbc.com)\n\nTruth: 75%\n\nFact Check: Claim is mostly true [1].\n\nContext: Reported widely.";

#[test]
/// What: The documented four-section template is recovered exactly.
///
/// Details:
/// - The `[1]` marker is linked to the BBC source.
fn template_response_parses_all_sections() {
    let r = parse(TEMPLATE);
    assert_eq!(r.sources, vec![Source::new("1", "BBC", "http://bbc.com")]);
    assert_eq!(r.truth_percentage, "75%");
    assert_eq!(
        r.fact_check_text,
        "Claim is mostly true [\\[1\\]](http://bbc.com)."
    );
    assert_eq!(r.context_text, "Reported widely.");
}

#[test]
fn section_order_does_not_matter() {
    let shuffled = "Context: Reported widely.\n\nFact Check: Claim is mostly true [1].\n\nTruth: 75%\n\nSources:\n1. [BBC](http://bbc.com)";
    assert_eq!(parse(shuffled), parse(TEMPLATE));
}

#[test]
fn windows_line_endings_and_blank_runs_are_normalized() {
    let messy = TEMPLATE.replace('\n', "\r\n").replace("\r\n\r\n", "\r\n\r\n\r\n\r\n");
    assert_eq!(parse(&messy), parse(TEMPLATE));
    assert_eq!(normalize("a\r\rb\n\n\n\nc"), "a\n\nb\n\nc");
}

#[test]
fn german_response_parses() {
    let r = parse(
        "Quellen:\n1. [Tagesschau](https://tagesschau.de)\n2. Bundesamt für Statistik\n\nWahrheit: hoch\n\nFaktencheck: Die Aussage stimmt [1].\n\nKontext: Zahlen von 2023 [2].",
    );
    assert_eq!(r.truth_percentage, "hoch");
    assert_eq!(r.sources.len(), 2);
    assert_eq!(r.sources[1], Source::unlinked("2", "Bundesamt für Statistik"));
    assert!(r.fact_check_text.contains("(https://tagesschau.de)"));
    assert_eq!(r.context_text, "Zahlen von 2023 [\\[2\\]](#).");
}

#[test]
fn body_colons_are_preserved() {
    let r = parse("Fact Check: Note: the figure is 3:1.\nContext: Ratio: disputed");
    assert_eq!(r.fact_check_text, "Note: the figure is 3:1.");
    assert_eq!(r.context_text, "Ratio: disputed");
}

#[test]
fn markdown_decorated_headers_are_accepted() {
    let r = parse("**Truth:** 30%\n\n### Fact-Check:\nFalse.\n\n**Context**: None.");
    assert_eq!(r.truth_percentage, "30%");
    assert_eq!(r.fact_check_text, "False.");
    assert_eq!(r.context_text, "None.");
}

#[test]
/// What: Prose without headers falls back to link scanning.
///
/// Details:
/// - One source with index `1` is synthesized from the inline link.
fn free_prose_link_becomes_source() {
    let r = parse("Several outlets covered this, e.g. [Reuters](http://reuters.com), without dispute.");
    assert_eq!(r.sources, vec![Source::new("1", "Reuters", "http://reuters.com")]);
    assert_eq!(r.truth_percentage, "N/A");
    assert!(!r.has_fact_check());
    assert!(!r.has_context());
}

#[test]
fn bare_headings_use_paragraph_fallback() {
    let r = parse("## Truth\n60%\n\n## Fact Check\nMostly right [1].\n\nBut the data is old.\n\n## Sources\n1. [OECD](https://oecd.org)");
    assert_eq!(r.truth_percentage, "60%");
    assert_eq!(
        r.fact_check_text,
        "Mostly right [\\[1\\]](https://oecd.org). But the data is old."
    );
    assert_eq!(r.sources, vec![Source::new("1", "OECD", "https://oecd.org")]);
}

#[test]
fn missing_truth_is_recovered_from_prose() {
    let r = parse("Fact Check: Roughly 70 percent of the claim holds, not 90%.");
    assert_eq!(r.truth_percentage, "70 percent");

    let none = parse("Sources:\n1. [A](http://a)\nNothing else at 50%.");
    assert_eq!(none.truth_percentage, "N/A");
}

#[test]
/// What: An explicit `N/A` truth still gets a percentage from the prose.
fn not_available_truth_is_recovered_from_prose() {
    let r = parse("Truth: N/A\n\nFact Check: Studies put it at 60% accurate.\n\nContext: Old.");
    assert_eq!(r.truth_percentage, "60%");

    let kept = parse("Truth: n/a\n\nFact Check: No figures given.");
    assert_eq!(kept.truth_percentage, "N/A");
}

#[test]
/// What: A one-line answer is split at each header.
fn single_line_answer_splits_into_sections() {
    let r = parse("Truth: 75% Fact Check: True. Context: Reported.");
    assert_eq!(r.truth_percentage, "75%");
    assert_eq!(r.fact_check_text, "True.");
    assert_eq!(r.context_text, "Reported.");
}

#[test]
fn malformed_inputs_yield_defaults() {
    let prose = parse("I cannot help with that.");
    assert_eq!(prose, FactCheckRecord::default());

    let empty = parse("");
    assert_eq!(empty.fact_check_text, FACT_CHECK_UNPROCESSABLE);
    assert_eq!(empty.context_text, CONTEXT_TRY_AGAIN);

    let blank = parse("   \n\n  ");
    assert_eq!(blank, FactCheckRecord::default());
}

#[test]
fn non_string_values_are_unprocessable() {
    let parser = ResponseParser::default();
    for v in [
        serde_json::json!(null),
        serde_json::json!(42),
        serde_json::json!({"text": TEMPLATE}),
        serde_json::json!([TEMPLATE]),
    ] {
        assert_eq!(parser.parse_value(&v), FactCheckRecord::unprocessable());
    }
    assert_eq!(parser.parse_value(&serde_json::json!(TEMPLATE)), parse(TEMPLATE));
}

#[test]
fn configured_fact_check_label_is_honored() {
    let mut labels = crate::i18n::LabelTable::builtin();
    labels.add_section_labels(SectionKind::FactCheck, &["Verdict"]);
    let parser = ResponseParser::new(&labels);
    let r = parser.parse("Verdict: Unsupported.\nTruth: low");
    assert_eq!(r.fact_check_text, "Unsupported.");
    assert_eq!(r.truth_percentage, "low");
    assert!(!parse("Verdict: Unsupported.").has_fact_check());
}

#[test]
fn reasoning_block_is_ignored() {
    let raw = format!(
        "<think>\nThe template wants Truth: [percentage] and Context: ...\n</think>\n\n{TEMPLATE}"
    );
    assert_eq!(parse(&raw), parse(TEMPLATE));
}
