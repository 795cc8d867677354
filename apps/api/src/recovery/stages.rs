//! The ordered text-recovery stages.
//!
//! Each stage either produces a candidate JSON object or passes. Stages are
//! cheap and pure; the engine in `mod.rs` decides which candidate wins.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::scrape::Scraper;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

static BAREWORD_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)").expect("bareword pattern compiles")
});

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern compiles"));

static CAPITAL_TRUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bTrue\b").expect("literal compiles"));
static CAPITAL_FALSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bFalse\b").expect("literal compiles"));
static CAPITAL_NONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bNone\b").expect("literal compiles"));

static MARKDOWN_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fence pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    StrictParse,
    Normalized,
    BracketSpan,
    QuoteRepair,
    FieldScrape,
    MarkdownFence,
    LastResortRepair,
}

impl Stage {
    /// Attempt order. Later stages are more aggressive.
    pub const ORDER: [Stage; 7] = [
        Stage::StrictParse,
        Stage::Normalized,
        Stage::BracketSpan,
        Stage::QuoteRepair,
        Stage::FieldScrape,
        Stage::MarkdownFence,
        Stage::LastResortRepair,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::StrictParse => "strict-parse",
            Stage::Normalized => "normalized",
            Stage::BracketSpan => "bracket-span",
            Stage::QuoteRepair => "quote-repair",
            Stage::FieldScrape => "field-scrape",
            Stage::MarkdownFence => "markdown-fence",
            Stage::LastResortRepair => "last-resort-repair",
        }
    }

    pub fn attempt(self, input: &StageInput<'_>) -> Option<Value> {
        match self {
            Stage::StrictParse => parse_object(input.raw),
            Stage::Normalized => input.normalized.as_deref().and_then(parse_object),
            Stage::BracketSpan => input.bracket_span().and_then(parse_object),
            Stage::QuoteRepair => {
                let target = input.bracket_span().unwrap_or(input.collapsed.as_str());
                if !needs_quote_repair(target) {
                    return None;
                }
                parse_object(&repair_syntax(target))
            }
            Stage::FieldScrape => input.scraper.and_then(|s| s.scrape(input.raw)),
            Stage::MarkdownFence => MARKDOWN_FENCE
                .captures(input.raw)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_object(m.as_str())),
            Stage::LastResortRepair => {
                let target = input
                    .normalized
                    .as_deref()
                    .unwrap_or(input.collapsed.as_str());
                parse_object(&repair_syntax(target))
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw completion text plus the derived forms the stages share.
pub struct StageInput<'a> {
    pub raw: &'a str,
    /// Whitespace runs collapsed to single spaces.
    pub collapsed: String,
    /// `collapsed`, cut or padded so it begins with `{` and ends with `}`.
    pub normalized: Option<String>,
    pub scraper: Option<Scraper>,
}

impl<'a> StageInput<'a> {
    pub fn new(raw: &'a str, scraper: Option<Scraper>) -> Self {
        let collapsed = collapse_whitespace(raw);
        let normalized = brace_normalize(&collapsed);
        Self {
            raw,
            collapsed,
            normalized,
            scraper,
        }
    }

    fn bracket_span(&self) -> Option<&str> {
        let start = self.collapsed.find('{')?;
        let end = self.collapsed.rfind('}')?;
        (end > start).then(|| &self.collapsed[start..=end])
    }
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Drops stray text around the outermost braces. Text that opens with a
/// quoted key gets the missing `{`; text with no closing brace gets a `}`.
pub fn brace_normalize(text: &str) -> Option<String> {
    let text = text.trim();
    let mut body = if text.starts_with('"') {
        format!("{{{text}")
    } else {
        let start = text.find('{')?;
        text[start..].to_string()
    };

    match body.rfind('}') {
        Some(end) => body.truncate(end + 1),
        None => body.push('}'),
    }
    Some(body)
}

fn needs_quote_repair(text: &str) -> bool {
    text.matches('"').count() % 2 != 0
        || split_string_literals(text)
            .into_iter()
            .any(|(segment, quoted)| !quoted && BAREWORD_KEY.is_match(segment))
}

/// Quotes bareword keys, maps `True`/`False`/`None` to JSON literals and
/// drops trailing commas. String literals are left untouched.
pub fn repair_syntax(text: &str) -> String {
    split_string_literals(text)
        .into_iter()
        .map(|(segment, quoted)| {
            if quoted {
                return segment.to_string();
            }
            let fixed = BAREWORD_KEY.replace_all(segment, r#"${1}"${2}"${3}"#);
            let fixed = CAPITAL_TRUE.replace_all(&fixed, "true");
            let fixed = CAPITAL_FALSE.replace_all(&fixed, "false");
            let fixed = CAPITAL_NONE.replace_all(&fixed, "null");
            TRAILING_COMMA.replace_all(&fixed, "$1").into_owned()
        })
        .collect()
}

/// Cuts text into `(segment, is_string_literal)` pieces. Literals keep their
/// quotes; an unterminated literal runs to the end of the text.
fn split_string_literals(text: &str) -> Vec<(&str, bool)> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('"') {
        if open > 0 {
            segments.push((&rest[..open], false));
        }
        let body = &rest[open + 1..];
        let end = closing_quote(body).map_or(rest.len(), |close| open + close + 2);
        segments.push((&rest[open..end], true));
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        segments.push((rest, false));
    }
    segments
}

fn closing_quote(body: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attempt(stage: Stage, raw: &str) -> Option<Value> {
        stage.attempt(&StageInput::new(raw, None))
    }

    #[test]
    fn test_strict_parse_accepts_object_only() {
        assert_eq!(attempt(Stage::StrictParse, r#"{"a": 1}"#), Some(json!({"a": 1})));
        assert_eq!(attempt(Stage::StrictParse, "[1, 2]"), None);
        assert_eq!(attempt(Stage::StrictParse, "Sure! {\"a\": 1}"), None);
    }

    #[test]
    fn test_normalized_strips_prose_around_object() {
        let raw = "Here you go:\n{\n\t\"a\": 1,\n  \"b\": \"two\"\n}\nHope it helps!";
        assert_eq!(
            attempt(Stage::Normalized, raw),
            Some(json!({"a": 1, "b": "two"}))
        );
    }

    #[test]
    fn test_normalized_adds_missing_opening_brace() {
        let raw = "\n  \"explicitConstraints\": [],\n  \"implicitConstraints\": []\n}";
        assert_eq!(
            attempt(Stage::Normalized, raw),
            Some(json!({"explicitConstraints": [], "implicitConstraints": []}))
        );
    }

    #[test]
    fn test_normalized_closes_truncated_object() {
        let raw = r#"{"rootCause": "overlap", "score": 3"#;
        assert_eq!(
            attempt(Stage::Normalized, raw),
            Some(json!({"rootCause": "overlap", "score": 3}))
        );
    }

    #[test]
    fn test_brace_normalize_without_any_brace_or_key() {
        assert_eq!(brace_normalize("no json here"), None);
    }

    #[test]
    fn test_bracket_span_takes_first_to_last_brace() {
        let input = StageInput::new("result => {\"a\": {\"b\": 2}} <= end", None);
        assert_eq!(input.bracket_span(), Some("{\"a\": {\"b\": 2}}"));
        assert_eq!(
            Stage::BracketSpan.attempt(&input),
            Some(json!({"a": {"b": 2}}))
        );
    }

    #[test]
    fn test_quote_repair_fixes_bareword_keys_and_literals() {
        let raw = "{rootCause: \"overlap\", urgent: True, owner: None, solutions: [],}";
        assert_eq!(
            attempt(Stage::QuoteRepair, raw),
            Some(json!({"rootCause": "overlap", "urgent": true, "owner": null, "solutions": []}))
        );
    }

    #[test]
    fn test_quote_repair_skips_text_without_quote_problems() {
        // Balanced quotes, no barewords: nothing for this stage to do.
        assert_eq!(attempt(Stage::QuoteRepair, r#"{"a": 1,}"#), None);
    }

    #[test]
    fn test_quote_repair_leaves_string_contents_alone() {
        let raw = r#"{"rootCause": "Room 301, capacity: 40 seats", solutions: []}"#;
        assert_eq!(
            attempt(Stage::QuoteRepair, raw),
            Some(json!({"rootCause": "Room 301, capacity: 40 seats", "solutions": []}))
        );
    }

    #[test]
    fn test_colon_inside_string_is_not_a_bareword_key() {
        let raw = r#"{"rootCause": "Room 301, capacity: 40 seats", "urgent": True}"#;
        assert_eq!(attempt(Stage::QuoteRepair, raw), None);
        assert_eq!(
            attempt(Stage::LastResortRepair, raw),
            Some(json!({"rootCause": "Room 301, capacity: 40 seats", "urgent": true}))
        );
    }

    #[test]
    fn test_repair_syntax_skips_escaped_quotes() {
        let raw = r#"{"note": "say \"None, x: True\" twice", ok: False,}"#;
        assert_eq!(
            repair_syntax(raw),
            r#"{"note": "say \"None, x: True\" twice", "ok": false}"#
        );
    }

    #[test]
    fn test_field_scrape_passes_without_scraper() {
        assert_eq!(attempt(Stage::FieldScrape, r#""timeRationale": "x""#), None);
    }

    #[test]
    fn test_markdown_fence_with_json_tag() {
        let raw = "Sure! Here is the JSON: ```json\n{\"rootCause\": \"x\"}\n``` Let me know.";
        assert_eq!(
            attempt(Stage::MarkdownFence, raw),
            Some(json!({"rootCause": "x"}))
        );
    }

    #[test]
    fn test_markdown_fence_without_tag() {
        let raw = "```\n{\"a\": [1, 2]}\n```";
        assert_eq!(attempt(Stage::MarkdownFence, raw), Some(json!({"a": [1, 2]})));
    }

    #[test]
    fn test_last_resort_repair_handles_trailing_commas() {
        let raw = "{\"a\": [1, 2,], \"b\": False,}";
        assert_eq!(
            attempt(Stage::LastResortRepair, raw),
            Some(json!({"a": [1, 2], "b": false}))
        );
    }

    #[test]
    fn test_every_stage_passes_on_garbage() {
        let input = StageInput::new("the model timed out mid-sentence and", None);
        for stage in Stage::ORDER {
            assert_eq!(stage.attempt(&input), None, "stage {stage} produced a value");
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\n\tb   c \r\n"), "a b c");
    }
}
