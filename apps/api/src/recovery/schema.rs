//! Result schemas and the field validator / repairer.
//!
//! A `ResultSchema` is static data describing the top-level fields of one
//! operation's answer. `validate` checks a parsed candidate and applies the
//! non-destructive coercions (stringified numbers, scalar → list, choice
//! spelling, range clamps, per-item domain rules). `repair` additionally
//! swaps missing or broken field groups for the fallback's version.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Constraint classification for non-mandatory, weighted preferences.
pub const FLEXIBLE_PREFERENCE: &str = "Soft";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("result is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },

    #[error("field `{path}` needs at least {min} item(s)")]
    TooFewItems { path: String, min: usize },
}

#[derive(Debug)]
pub struct ResultSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            required: true,
            kind,
        }
    }

    /// Absent optional fields get the kind's default inserted, when it has one.
    pub const fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            required: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    /// Text or number, kept exactly as the model wrote it.
    Identifier,
    Number(NumberRule),
    /// One of a fixed set of spellings, matched case-insensitively.
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
    TextList,
    ObjectList(ListRule),
}

#[derive(Debug, Clone, Copy)]
pub struct NumberRule {
    /// Neutral value used when the decoded value is not numeric.
    pub default: f64,
    pub range: Option<(f64, f64)>,
}

impl NumberRule {
    pub const fn within(min: f64, max: f64, default: f64) -> Self {
        Self {
            default,
            range: Some((min, max)),
        }
    }

    fn clamp(&self, n: f64) -> f64 {
        match self.range {
            Some((min, max)) => n.clamp(min, max),
            None => n,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListRule {
    pub item: &'static [FieldSpec],
    pub min_items: usize,
    pub item_rule: ItemRule,
}

/// Domain rule applied to each list element after its fields conform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRule {
    Plain,
    /// Inferred constraints are never mandatory: `type` is forced to
    /// [`FLEXIBLE_PREFERENCE`]. The weight bounds live in the item's `weight` spec.
    FlexiblePreference,
}

/// A candidate that passed validation, with the coercions applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformed {
    pub value: Value,
    pub adjustments: Vec<String>,
}

/// A candidate that needed field groups from the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired {
    pub value: Value,
    pub filled: Vec<String>,
    pub adjustments: Vec<String>,
}

impl ResultSchema {
    /// True when the value is an object carrying at least one top-level key
    /// of this schema.
    pub fn recognizes(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| self.fields.iter().any(|f| obj.contains_key(f.key)))
    }

    pub fn validate(&self, value: Value) -> Result<Conformed, SchemaViolation> {
        let Value::Object(mut obj) = value else {
            return Err(SchemaViolation::NotAnObject);
        };
        let mut adjustments = Vec::new();
        conform_fields(self.fields, &mut obj, "", &mut adjustments)?;
        Ok(Conformed {
            value: Value::Object(obj),
            adjustments,
        })
    }

    /// Replaces every top-level field that is missing or cannot conform with
    /// the fallback's field of the same name, then validates the result.
    pub fn repair(&self, value: Value, fallback: &Value) -> Result<Repaired, SchemaViolation> {
        let Value::Object(mut obj) = value else {
            return Err(SchemaViolation::NotAnObject);
        };

        let mut filled = Vec::new();
        for spec in self.fields {
            let usable = match obj.get(spec.key) {
                None => !spec.required,
                Some(current) => {
                    let mut trial = current.clone();
                    conform_value(spec.kind, &mut trial, spec.key, &mut Vec::new()).is_ok()
                }
            };
            if usable {
                continue;
            }

            let replacement = fallback
                .get(spec.key)
                .cloned()
                .ok_or_else(|| SchemaViolation::MissingField(spec.key.to_string()))?;
            obj.insert(spec.key.to_string(), replacement);
            filled.push(spec.key.to_string());
        }

        let conformed = self.validate(Value::Object(obj))?;
        Ok(Repaired {
            value: conformed.value,
            filled,
            adjustments: conformed.adjustments,
        })
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn conform_fields(
    specs: &[FieldSpec],
    obj: &mut Map<String, Value>,
    parent: &str,
    notes: &mut Vec<String>,
) -> Result<(), SchemaViolation> {
    for spec in specs {
        let path = join_path(parent, spec.key);
        match obj.get_mut(spec.key) {
            Some(slot) => conform_value(spec.kind, slot, &path, notes)?,
            None if spec.required => return Err(SchemaViolation::MissingField(path)),
            None => {
                if let Some(default) = absent_default(spec.kind) {
                    obj.insert(spec.key.to_string(), default);
                    notes.push(format!("{path}: defaulted"));
                }
            }
        }
    }
    Ok(())
}

fn absent_default(kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Text | FieldKind::Identifier => None,
        FieldKind::Number(rule) => Some(number_value(rule.default)),
        FieldKind::Choice { default, .. } => Some(Value::String(default.to_string())),
        FieldKind::TextList | FieldKind::ObjectList(_) => Some(Value::Array(Vec::new())),
    }
}

fn conform_value(
    kind: FieldKind,
    slot: &mut Value,
    path: &str,
    notes: &mut Vec<String>,
) -> Result<(), SchemaViolation> {
    match kind {
        FieldKind::Text => {
            if !slot.is_string() {
                let text = scalar_text(slot).ok_or_else(|| SchemaViolation::WrongType {
                    path: path.to_string(),
                    expected: "text",
                })?;
                *slot = Value::String(text);
                notes.push(format!("{path}: stringified"));
            }
        }
        FieldKind::Identifier => {
            if !(slot.is_string() || slot.is_number()) {
                return Err(SchemaViolation::WrongType {
                    path: path.to_string(),
                    expected: "text or a number",
                });
            }
        }
        FieldKind::Number(rule) => conform_number(rule, slot, path, notes),
        FieldKind::Choice { options, default } => {
            let canonical = slot
                .as_str()
                .and_then(|s| options.iter().find(|o| o.eq_ignore_ascii_case(s.trim())))
                .copied()
                .unwrap_or(default);
            if slot.as_str() != Some(canonical) {
                *slot = Value::String(canonical.to_string());
                notes.push(format!("{path}: set to {canonical}"));
            }
        }
        FieldKind::TextList => {
            let items = as_list(slot, path, notes);
            for (i, item) in items.iter_mut().enumerate() {
                if !item.is_string() {
                    let text = scalar_text(item).ok_or_else(|| SchemaViolation::WrongType {
                        path: format!("{path}[{i}]"),
                        expected: "text",
                    })?;
                    *item = Value::String(text);
                }
            }
        }
        FieldKind::ObjectList(rule) => {
            let items = as_list(slot, path, notes);
            if items.len() < rule.min_items {
                return Err(SchemaViolation::TooFewItems {
                    path: path.to_string(),
                    min: rule.min_items,
                });
            }
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{path}[{i}]");
                let Value::Object(entry) = item else {
                    return Err(SchemaViolation::WrongType {
                        path: item_path,
                        expected: "an object",
                    });
                };
                conform_fields(rule.item, entry, &item_path, notes)?;
                apply_item_rule(rule.item_rule, entry, &item_path, notes);
            }
        }
    }
    Ok(())
}

/// Turns the slot into an array in place: null becomes empty, scalars and
/// objects become a single-element list.
fn as_list<'a>(slot: &'a mut Value, path: &str, notes: &mut Vec<String>) -> &'a mut Vec<Value> {
    if !slot.is_array() {
        let wrapped = match slot.take() {
            Value::Null => Vec::new(),
            other => vec![other],
        };
        notes.push(format!("{path}: wrapped into a list"));
        *slot = Value::Array(wrapped);
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just made an array"),
    }
}

fn conform_number(rule: NumberRule, slot: &mut Value, path: &str, notes: &mut Vec<String>) {
    let decoded = match slot {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite());

    match decoded {
        Some(n) if slot.is_number() && rule.clamp(n) == n => {}
        Some(n) => {
            let clamped = rule.clamp(n);
            *slot = number_value(clamped);
            notes.push(format!("{path}: coerced to {clamped}"));
        }
        None => {
            *slot = number_value(rule.default);
            notes.push(format!("{path}: replaced by default {}", rule.default));
        }
    }
}

fn apply_item_rule(rule: ItemRule, entry: &mut Map<String, Value>, path: &str, notes: &mut Vec<String>) {
    match rule {
        ItemRule::Plain => {}
        ItemRule::FlexiblePreference => {
            if entry.get("type").and_then(Value::as_str) != Some(FLEXIBLE_PREFERENCE) {
                entry.insert(
                    "type".to_string(),
                    Value::String(FLEXIBLE_PREFERENCE.to_string()),
                );
                notes.push(format!("{path}.type: forced to {FLEXIBLE_PREFERENCE}"));
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole numbers are written as integers so `85` stays `85`, not `85.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
