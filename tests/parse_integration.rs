//! End-to-end checks from raw model output to what the user sees and copies.

use factlens as crate_root;

use crate_root::app::status_json;
use crate_root::i18n::load_localization;
use crate_root::logic::{ColorBand, TruthColorMapper, color_for, export_text, link, strip_links};
use crate_root::parse::{ResponseParser, parse};
use crate_root::state::{FactCheckRecord, LifecycleStatus, Source};
use crate_root::ui::{OverlayPresenter, Palette, PlainPresenter, ViewBuilder, plain_line};

const TEMPLATE: &str = "Sources:\n1. [BBC](http://bbc.com)\n\nTruth: 75%\n\nFact Check: Claim is mostly true [1].\n\nContext: Reported widely.";

#[test]
/// What: The template answer survives parse, display and export unchanged in meaning.
///
/// Details:
/// - The display shows `[1]` as its own citation piece.
/// - The export writes the marker back bare.
fn template_flows_to_view_and_export() {
    let record = parse(TEMPLATE);
    assert_eq!(color_for(&record.truth_percentage), ColorBand::High);

    let l10n = load_localization("en-US", &[]);
    let views = ViewBuilder::new(l10n.messages, TruthColorMapper::new(&l10n.labels));
    let shown: Vec<String> = views.record(&record).iter().map(|l| plain_line(l)).collect();
    assert!(shown.iter().any(|l| l == "Claim is mostly true [1]."));
    assert!(shown.iter().any(|l| l == "1. BBC - http://bbc.com"));

    assert_eq!(
        export_text(&record),
        "Truth Percentage: 75%\n\nFact Check: Claim is mostly true [1].\n\nContext: Reported widely.\n\nSources:\n1. BBC - http://bbc.com"
    );
}

#[test]
/// What: Plain output without color carries the record and no key hints.
fn plain_presenter_prints_record_without_escapes() {
    let l10n = load_localization("en-US", &[]);
    let views = ViewBuilder::new(l10n.messages, TruthColorMapper::new(&l10n.labels));
    let mut presenter = PlainPresenter::new(Vec::new(), views, Palette::new(false));
    presenter
        .render(&LifecycleStatus::Success(parse(TEMPLATE)))
        .expect("writes to memory");

    let out = String::from_utf8(presenter.into_inner()).expect("utf-8");
    assert!(out.contains("75%"));
    assert!(out.contains("Reported widely."));
    assert!(!out.contains('\u{1b}'));
}

#[test]
/// What: Linking is idempotent and whole-marker only.
fn linking_twice_changes_nothing() {
    let sources = [
        Source::new("1", "A", "http://a.example"),
        Source::new("12", "B", "http://b.example"),
    ];
    let once = link("See [1] and [12], not [3].", &sources);
    assert_eq!(
        once,
        "See [\\[1\\]](http://a.example) and [\\[12\\]](http://b.example), not [3]."
    );
    assert_eq!(link(&once, &sources), once);
    assert_eq!(strip_links(&once), "See [1] and [12], not [3].");
}

#[test]
/// What: Unusable answers still produce a complete record.
fn malformed_answers_never_fail() {
    for raw in ["", "   ", "Truth:", "Sources:\n\n", "[]()", "Fact Check: [1] [2] [3]"] {
        let r = parse(raw);
        assert!(!r.truth_percentage.is_empty(), "{raw:?}");
        assert!(!r.fact_check_text.is_empty(), "{raw:?}");
        assert!(!r.context_text.is_empty(), "{raw:?}");
    }
    assert_eq!(parse(""), FactCheckRecord::unprocessable());
}

#[test]
/// What: Numeric truth forms agree and unusable ones map to `Unknown`.
fn truth_forms_map_to_the_same_band() {
    let mapper = TruthColorMapper::default();
    assert_eq!(mapper.color_for(85), ColorBand::VeryHigh);
    assert_eq!(mapper.color_for("85%"), ColorBand::VeryHigh);
    assert_eq!(mapper.color_for("85 percent"), ColorBand::VeryHigh);
    for unknown in ["N/A", "", "   ", "unclear"] {
        assert_eq!(mapper.color_for(unknown), ColorBand::Unknown, "{unknown:?}");
    }
    assert_eq!(mapper.color_for(150), ColorBand::VeryHigh);
    assert_eq!(mapper.color_for(-5), ColorBand::VeryLow);
}

#[test]
/// What: German labels and keywords parse and color without extra configuration.
fn german_answer_is_understood() {
    let l10n = load_localization("de-DE", &[]);
    let parser = ResponseParser::new(&l10n.labels);
    let r = parser.parse("Wahrheit: hoch\n\nFaktencheck: Stimmt.\n\nKontext: Belegt.");
    assert_eq!(r.truth_percentage, "hoch");
    assert_eq!(r.fact_check_text, "Stimmt.");
    assert_eq!(
        TruthColorMapper::new(&l10n.labels).color_for(&r.truth_percentage),
        ColorBand::VeryHigh
    );
}

#[test]
/// What: JSON output names the band and embeds the record.
fn json_summary_for_success() {
    let record = parse(TEMPLATE);
    let v = status_json(
        &LifecycleStatus::Success(record),
        &TruthColorMapper::default(),
    );
    assert_eq!(v["status"], "success");
    assert_eq!(v["truthBand"], ColorBand::High.as_str());
    assert_eq!(v["record"]["truthPercentage"], "75%");
}
