//! Targeted field scraping for the two answer shapes that most often come
//! back broken: constraint lists and schedule rationales.
//!
//! Runs against the raw completion text. Only fields whose key actually
//! appears in the text are emitted; the validator fills the rest.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

const EXPLICIT_KEY: &str = "explicitConstraints";
const IMPLICIT_KEY: &str = "implicitConstraints";
const ALTERNATIVES_KEY: &str = "alternativesConsidered";

const RATIONALE_KEYS: [&str; 4] = [
    "timeRationale",
    "classroomRationale",
    "teacherRationale",
    "overallRationale",
];

static CONSTRAINT_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)"name"\s*:\s*"([^"]+)".*?"description"\s*:\s*"([^"]+)".*?"type"\s*:\s*"([^"]+)".*?"weight"\s*:\s*"?([0-9]*\.?[0-9]+)"#,
    )
    .expect("constraint pattern compiles")
});

static ALTERNATIVE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)"type"\s*:\s*"([^"]+)".*?"alternative"\s*:\s*"([^"]+)".*?"whyNotChosen"\s*:\s*"([^"]+)""#,
    )
    .expect("alternative pattern compiles")
});

static RATIONALE_FIELDS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    RATIONALE_KEYS
        .iter()
        .map(|key| {
            let pattern = format!(r#""{key}"\s*:\s*"((?:[^"\\]|\\.)*)""#);
            (*key, Regex::new(&pattern).expect("rationale pattern compiles"))
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scraper {
    /// `explicitConstraints` / `implicitConstraints` entries.
    Constraints,
    /// The four rationale strings plus `alternativesConsidered`.
    ScheduleRationale,
}

impl Scraper {
    pub fn scrape(self, raw: &str) -> Option<Value> {
        let fields = match self {
            Scraper::Constraints => scrape_constraints(raw),
            Scraper::ScheduleRationale => scrape_rationale(raw),
        };
        (!fields.is_empty()).then_some(Value::Object(fields))
    }
}

fn scrape_constraints(raw: &str) -> Map<String, Value> {
    let explicit_at = raw.find(EXPLICIT_KEY);
    let implicit_at = raw.find(IMPLICIT_KEY);
    let mut fields = Map::new();

    // Each section runs to the start of the other one, or to the end of text.
    let section_end = |start: usize, other: Option<usize>| {
        other.filter(|&o| o > start).unwrap_or(raw.len())
    };

    if let Some(start) = explicit_at {
        let section = &raw[start..section_end(start, implicit_at)];
        fields.insert(EXPLICIT_KEY.to_string(), scrape_constraint_entries(section, 101));
    }
    if let Some(start) = implicit_at {
        let section = &raw[start..section_end(start, explicit_at)];
        fields.insert(IMPLICIT_KEY.to_string(), scrape_constraint_entries(section, 201));
    }
    fields
}

fn scrape_constraint_entries(section: &str, first_id: u64) -> Value {
    let entries = CONSTRAINT_ENTRY
        .captures_iter(section)
        .zip(first_id..)
        .map(|(caps, id)| {
            let mut entry = json!({
                "id": id,
                "name": &caps[1],
                "description": &caps[2],
                "type": &caps[3],
            });
            if let Ok(weight) = caps[4].parse::<f64>() {
                entry["weight"] = json!(weight);
            }
            entry
        })
        .collect();
    Value::Array(entries)
}

fn scrape_rationale(raw: &str) -> Map<String, Value> {
    let mut fields = Map::new();

    for (key, pattern) in RATIONALE_FIELDS.iter() {
        if let Some(caps) = pattern.captures(raw) {
            fields.insert(key.to_string(), Value::String(unescape(&caps[1])));
        }
    }

    if let Some(start) = raw.find(ALTERNATIVES_KEY) {
        let alternatives = ALTERNATIVE_ENTRY
            .captures_iter(&raw[start..])
            .map(|caps| {
                json!({
                    "type": &caps[1],
                    "alternative": &caps[2],
                    "whyNotChosen": &caps[3],
                })
            })
            .collect();
        fields.insert(ALTERNATIVES_KEY.to_string(), Value::Array(alternatives));
    }
    fields
}

/// Decodes JSON string escapes; falls back to the captured text verbatim.
fn unescape(captured: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{captured}\""))
        .unwrap_or_else(|_| captured.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_split_by_section() {
        let raw = r#"{
  "explicitConstraints": [
    {"id": 1, "name": "Room Size", "description": "Room must seat 120", "type": "Hard", "weight": 1.0},
    {"id": 2, "name": "Morning Only", "description": "Prof. Smith teaches Wednesday mornings", "type": "Hard", "weight": "0.95"}
  ],
  "implicitConstraints": [
    {"id": 3, "name": "Near CS", "description": "Close to the CS building", "type": "Hard", "weight": 1.2}
  ]
  oops the model stopped closing things"#;

        let scraped = Scraper::Constraints.scrape(raw).unwrap();
        let explicit = scraped["explicitConstraints"].as_array().unwrap();
        let implicit = scraped["implicitConstraints"].as_array().unwrap();

        assert_eq!(explicit.len(), 2);
        assert_eq!(explicit[0]["id"], 101);
        assert_eq!(explicit[0]["name"], "Room Size");
        assert_eq!(explicit[1]["weight"], json!(0.95));
        assert_eq!(implicit.len(), 1);
        assert_eq!(implicit[0]["id"], 201);
        assert_eq!(implicit[0]["description"], "Close to the CS building");
        assert_eq!(implicit[0]["type"], "Hard");
    }

    #[test]
    fn test_constraints_without_keys_yield_nothing() {
        assert_eq!(
            Scraper::Constraints.scrape(r#"{"name": "x", "description": "y"}"#),
            None
        );
    }

    #[test]
    fn test_only_present_sections_are_emitted() {
        let raw = r#""implicitConstraints": [{"name": "A", "description": "B", "type": "Soft", "weight": 0.6}"#;
        let scraped = Scraper::Constraints.scrape(raw).unwrap();
        assert!(scraped.get("explicitConstraints").is_none());
        assert_eq!(scraped["implicitConstraints"][0]["name"], "A");
    }

    #[test]
    fn test_rationale_fields_and_alternatives() {
        let raw = r#"
  "timeRationale": "Wednesday 9-11 suits the \"morning\" preference",
  "classroomRationale": "Room 301 has projectors",
  "alternativesConsidered": [
    {"type": "Time", "alternative": "Tuesday 2pm", "whyNotChosen": "Clashes with Algorithms"},
    {"type": "Teacher", "alternative": "Prof. Lee", "whyNotChosen": "At full load"}
  "#;
        let scraped = Scraper::ScheduleRationale.scrape(raw).unwrap();
        assert_eq!(
            scraped["timeRationale"],
            "Wednesday 9-11 suits the \"morning\" preference"
        );
        assert_eq!(scraped["classroomRationale"], "Room 301 has projectors");
        assert!(scraped.get("teacherRationale").is_none());
        assert!(scraped.get("overallRationale").is_none());

        let alternatives = scraped["alternativesConsidered"].as_array().unwrap();
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[1]["alternative"], "Prof. Lee");
    }

    #[test]
    fn test_rationale_on_unrelated_text_yields_nothing() {
        assert_eq!(Scraper::ScheduleRationale.scrape("I cannot help with that."), None);
    }
}
