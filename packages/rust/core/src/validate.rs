//! Schema validator: untrusted generator text in, canonical [`Report`] out.
//!
//! Extraction (fence stripping, brace slicing, JSON parsing) is the only
//! stage that can fail, and failure yields [`Report::fallback`]. Past that
//! point every field goes through a total coercion, so shape mismatches are
//! absorbed by defaults, clamping, normalization or truncation.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use bleacher_shared::{
    BleacherError, CONTEXT_SUMMARY_MAX_CHARS, Report, ReportMeta, Result, SentimentBreakdown,
    WarRoomItem, truncate_with_ellipsis,
};

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*").expect("leading fence regex"));

static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("trailing fence regex"));

const DEFAULT_SCORE: i64 = 50;
const DEFAULT_SEASON_NOTE: &str = "Weekly Report";
const DEFAULT_LABEL: &str = "Neutral";
const DEFAULT_TREND: &str = "Stable";

/// Validate a raw generator payload. Never fails.
pub fn validate(raw: &str, meta: &ReportMeta) -> Report {
    match parse_payload(raw) {
        Ok(object) => {
            let report = build(&object, meta);
            info!(
                score = report.sentiment_score,
                label = %report.sentiment_label,
                keywords = report.sentiment_keywords.len(),
                war_room_items = report.war_room_items.len(),
                "generator payload validated"
            );
            report
        }
        Err(e) => {
            warn!(error = %e, "unusable generator payload, using fallback report");
            debug!(raw, "raw generator payload");
            Report::fallback(meta)
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Remove a leading ```` ``` ````/```` ```json ```` fence and a trailing fence.
pub fn strip_fences(raw: &str) -> String {
    let without_leading = LEADING_FENCE.replace(raw.trim(), "");
    TRAILING_FENCE
        .replace(without_leading.trim(), "")
        .into_owned()
}

/// Slice from the first `{` to the last `}` inclusive.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_payload(raw: &str) -> Result<Map<String, Value>> {
    let stripped = strip_fences(raw);
    let candidate = extract_object(&stripped)
        .ok_or_else(|| BleacherError::parse("no JSON object found in generator output"))?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(BleacherError::parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(BleacherError::parse(format!("invalid JSON: {e}"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Field coercions
// ---------------------------------------------------------------------------

fn build(object: &Map<String, Value>, meta: &ReportMeta) -> Report {
    Report {
        team_name: meta.team_name.clone(),
        date: meta.date.clone(),
        season_note: coerce_string(object.get("season_note"), DEFAULT_SEASON_NOTE),
        executive_summary: coerce_string(object.get("executive_summary"), ""),
        sentiment_score: coerce_score(object.get("sentiment_score")),
        sentiment_label: coerce_string(object.get("sentiment_label"), DEFAULT_LABEL),
        sentiment_trend: coerce_string(object.get("sentiment_trend"), DEFAULT_TREND),
        sentiment_breakdown: coerce_breakdown(object.get("sentiment_breakdown")),
        sentiment_keywords: coerce_keywords(object.get("sentiment_keywords")),
        war_room_intro: coerce_string(object.get("war_room_intro"), ""),
        war_room_items: coerce_war_room_items(object.get("war_room_items")),
        community_takes: Vec::new(),
    }
}

/// A JSON string is kept; anything else becomes `default`.
pub fn coerce_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Integer reading of `value`, or `default` when it has none.
///
/// Integers pass through (saturating at the `i64` range), finite floats
/// truncate toward zero, and strings must be an optional sign plus ASCII
/// digits after trimming.
pub fn coerce_int(value: Option<&Value>, default: i64) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.as_u64().is_some() {
                i64::MAX
            } else {
                match n.as_f64() {
                    // `as` saturates for out-of-range floats.
                    Some(f) if f.is_finite() => f.trunc() as i64,
                    _ => default,
                }
            }
        }
        Some(Value::String(s)) => parse_integer(s.trim()).unwrap_or(default),
        _ => default,
    }
}

/// Sentiment score clamped into `0..=100`; 50 when not coercible.
pub fn coerce_score(value: Option<&Value>) -> u32 {
    coerce_int(value, DEFAULT_SCORE).clamp(0, 100) as u32
}

fn parse_integer(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

fn coerce_breakdown(value: Option<&Value>) -> SentimentBreakdown {
    let Some(object) = value.and_then(Value::as_object) else {
        return SentimentBreakdown::default();
    };
    let defaults = SentimentBreakdown::default();
    let component = |key: &str, default: u32| -> u64 {
        coerce_int(object.get(key), i64::from(default)).max(0) as u64
    };

    SentimentBreakdown::normalized(
        component("positive", defaults.positive),
        component("neutral", defaults.neutral),
        component("negative", defaults.negative),
    )
}

fn coerce_keywords(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .take(Report::MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

fn coerce_war_room_items(value: Option<&Value>) -> Vec<WarRoomItem> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| WarRoomItem {
            title: coerce_string(item.get("title"), ""),
            summary: truncate_with_ellipsis(
                &coerce_string(item.get("summary"), ""),
                CONTEXT_SUMMARY_MAX_CHARS,
            ),
        })
        // Nothing to render.
        .filter(|item| !item.title.is_empty() || !item.summary.is_empty())
        .take(Report::MAX_WAR_ROOM_ITEMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn meta() -> ReportMeta {
        ReportMeta {
            team_name: "Miami Dolphins".into(),
            date: "February 20, 2026".into(),
        }
    }

    #[test]
    fn fenced_string_score_and_overfull_breakdown() {
        let raw = "```json\n{\"sentiment_score\": \"82\", \"sentiment_breakdown\": {\"positive\": 60, \"neutral\": 60, \"negative\": 0}}\n```";
        let report = validate(raw, &meta());
        assert_eq!(report.sentiment_score, 82);
        assert_eq!(report.sentiment_breakdown.positive, 50);
        assert_eq!(report.sentiment_breakdown.neutral, 50);
        assert_eq!(report.sentiment_breakdown.negative, 0);
        assert_eq!(report.sentiment_breakdown.total(), 100);
    }

    #[test]
    fn fenced_and_bare_payloads_match() {
        let body = r#"{"season_note": "Combine Week", "sentiment_score": 71, "sentiment_keywords": ["Tua", "cap space"]}"#;
        let bare = validate(body, &meta());
        assert_eq!(validate(&format!("```json\n{body}\n```"), &meta()), bare);
        assert_eq!(validate(&format!("```JSON {body}```"), &meta()), bare);
        assert_eq!(validate(&format!("```\n{body}\n```"), &meta()), bare);
        assert_eq!(bare.season_note, "Combine Week");
    }

    #[test]
    fn prose_around_object_is_ignored() {
        let raw = "Sure! Here is the JSON:\n{\"executive_summary\": \"Quiet week.\"}\nHope this helps.";
        assert_eq!(validate(raw, &meta()).executive_summary, "Quiet week.");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let report = validate("{}", &meta());
        assert_eq!(report.team_name, "Miami Dolphins");
        assert_eq!(report.date, "February 20, 2026");
        assert_eq!(report.season_note, "Weekly Report");
        assert_eq!(report.executive_summary, "");
        assert_eq!(report.sentiment_score, 50);
        assert_eq!(report.sentiment_label, "Neutral");
        assert_eq!(report.sentiment_trend, "Stable");
        assert_eq!(report.sentiment_breakdown, SentimentBreakdown::default());
        assert!(report.sentiment_keywords.is_empty());
        assert!(report.war_room_items.is_empty());
    }

    #[test]
    fn non_object_payloads_fall_back() {
        for raw in ["", "no braces here", "} backwards {", "{not json}", "```json\n```"] {
            assert_eq!(validate(raw, &meta()), Report::fallback(&meta()), "input: {raw:?}");
        }
    }

    #[test]
    fn score_coercion_table() {
        let cases = [
            (json!(82), 82),
            (json!(-3), 0),
            (json!(250), 100),
            (json!(77.9), 77),
            (json!(-0.5), 0),
            (json!(" 64 "), 64),
            (json!("+12"), 12),
            (json!("-40"), 0),
            (json!("999999999999999999999999"), 100),
            (json!("82.5"), 50),
            (json!("high"), 50),
            (json!(true), 50),
            (json!(null), 50),
            (json!([1]), 50),
            (json!(u64::MAX), 100),
        ];
        for (value, expected) in cases {
            assert_eq!(coerce_score(Some(&value)), expected, "value: {value}");
        }
        assert_eq!(coerce_score(None), 50);
    }

    #[test]
    fn non_string_fields_take_defaults() {
        let raw = json!({
            "season_note": 42,
            "sentiment_label": null,
            "sentiment_trend": ["up"],
            "war_room_intro": "Cap space is the story."
        })
        .to_string();
        let report = validate(&raw, &meta());
        assert_eq!(report.season_note, "Weekly Report");
        assert_eq!(report.sentiment_label, "Neutral");
        assert_eq!(report.sentiment_trend, "Stable");
        assert_eq!(report.war_room_intro, "Cap space is the story.");
    }

    #[test]
    fn breakdown_components_degrade_individually() {
        let raw = json!({ "sentiment_breakdown": { "positive": "70", "neutral": "lots", "negative": -5 } })
            .to_string();
        // 70 / 34 / 0 -> total 104: 67.3 -> 67, 32.7 -> 33, negative = 0.
        let b = validate(&raw, &meta()).sentiment_breakdown;
        assert_eq!((b.positive, b.neutral, b.negative), (67, 33, 0));
    }

    #[test]
    fn breakdown_all_zero_uses_default() {
        let raw = json!({ "sentiment_breakdown": { "positive": 0, "neutral": 0, "negative": 0 } })
            .to_string();
        assert_eq!(
            validate(&raw, &meta()).sentiment_breakdown,
            SentimentBreakdown::default()
        );
    }

    #[test]
    fn lists_skip_bad_entries_then_cap() {
        let raw = json!({
            "sentiment_keywords": ["a", 1, "b", null, "c", "d", "e", "f", "g", "h"],
            "war_room_items": [
                "not an object",
                { "title": "Cap", "summary": "Room to spend." },
                { "title": 7 },
                { "title": "Draft", "summary": "Pick 13." },
                { "title": "OL", "summary": "Needs help." },
                { "title": "Extra", "summary": "Dropped." }
            ]
        })
        .to_string();
        let report = validate(&raw, &meta());
        assert_eq!(report.sentiment_keywords, ["a", "b", "c", "d", "e", "f"]);
        let titles: Vec<_> = report.war_room_items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Cap", "Draft", "OL", "Extra"]);
        assert_eq!(report.war_room_items[1].summary, "Pick 13.");
    }

    #[test]
    fn war_room_items_without_text_are_dropped() {
        let raw = json!({
            "war_room_items": [
                { "title": 7 },
                { "title": "", "summary": null },
                { "summary": "Only a summary." }
            ]
        })
        .to_string();
        let report = validate(&raw, &meta());
        assert_eq!(report.war_room_items, [WarRoomItem {
            title: String::new(),
            summary: "Only a summary.".into()
        }]);
    }

    #[test]
    fn non_array_lists_are_empty() {
        let raw = json!({ "sentiment_keywords": "Tua", "war_room_items": {"title": "x"} }).to_string();
        let report = validate(&raw, &meta());
        assert!(report.sentiment_keywords.is_empty());
        assert!(report.war_room_items.is_empty());
    }

    #[test]
    fn long_war_room_summary_is_capped() {
        let raw = json!({ "war_room_items": [ { "title": "t", "summary": "x".repeat(1000) } ] })
            .to_string();
        let summary = &validate(&raw, &meta()).war_room_items[0].summary;
        assert_eq!(summary.chars().count(), CONTEXT_SUMMARY_MAX_CHARS);
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn strip_fences_only_touches_edges() {
        assert_eq!(strip_fences("  ```json\n{}\n```  "), "{}");
        assert_eq!(strip_fences("{\"a\": \"```\"}"), "{\"a\": \"```\"}");
    }

    #[test]
    fn extract_object_slices_outer_braces() {
        assert_eq!(extract_object("x {\"a\": {}} y"), Some("{\"a\": {}}"));
        assert_eq!(extract_object("nothing"), None);
        assert_eq!(extract_object("} {"), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_json() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|i| json!(i)),
                any::<u64>().prop_map(|u| json!(u)),
                (-1e20f64..1e20).prop_map(|f| json!(f)),
                ".{0,12}".prop_map(Value::String),
                "[+-]?[0-9]{1,30}".prop_map(Value::String),
            ];
            leaf.prop_recursive(2, 16, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                    prop::collection::hash_map("[a-z]{1,8}", inner, 0..4)
                        .prop_map(|m| Value::Object(m.into_iter().collect())),
                ]
            })
        }

        proptest! {
            #[test]
            fn score_always_in_range(value in arb_json()) {
                let score = coerce_score(Some(&value));
                prop_assert!(score <= 100);
            }

            #[test]
            fn non_numeric_strings_score_50(s in "[a-zA-Z .]{1,12}") {
                prop_assert_eq!(coerce_score(Some(&Value::String(s))), 50);
            }

            #[test]
            fn any_payload_keeps_invariants(
                score in arb_json(),
                breakdown in arb_json(),
                keywords in prop::collection::vec(arb_json(), 0..12),
                items in prop::collection::vec(arb_json(), 0..12),
            ) {
                let raw = json!({
                    "sentiment_score": score,
                    "sentiment_breakdown": breakdown,
                    "sentiment_keywords": keywords,
                    "war_room_items": items,
                })
                .to_string();
                let report = validate(&raw, &meta());
                prop_assert!(report.sentiment_score <= 100);
                prop_assert_eq!(report.sentiment_breakdown.total(), 100);
                prop_assert!(report.sentiment_keywords.len() <= Report::MAX_KEYWORDS);
                prop_assert!(report.war_room_items.len() <= Report::MAX_WAR_ROOM_ITEMS);
            }

            #[test]
            fn validate_never_panics(raw in ".{0,200}") {
                let report = validate(&raw, &meta());
                prop_assert_eq!(report.sentiment_breakdown.total(), 100);
            }
        }
    }
}
