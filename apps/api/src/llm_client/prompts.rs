// Shared prompt fragments and the template filler.
// Each operation module defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

use serde::Serialize;

use super::{ChatMessage, CompletionOptions};

/// Appended to every analysis system prompt.
pub const JSON_ONLY_SUFFIX: &str = "Your responses should be valid JSON objects only.";

/// Closing instruction for analysis user prompts.
pub const JSON_ONLY_INSTRUCTION: &str = "Please ensure you return valid JSON format \
    without any additional text, explanations, or Markdown markup.";

/// Everything one gateway call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

/// Builds an analysis system prompt from the expert role it should adopt.
pub fn json_expert_system(role: &str) -> String {
    format!("You are a {role}. {JSON_ONLY_SUFFIX}")
}

/// Substitutes `{name}` placeholders in a single pass over the template.
/// Substituted text is never scanned again, so request data containing a
/// placeholder token stays literal. Unknown placeholders are kept as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut prompt = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail[1..]
            .find('}')
            .and_then(|close| Some((placeholder_value(&tail[1..=close], values)?, close)));
        match value {
            Some((value, close)) => {
                prompt.push_str(value);
                rest = &tail[close + 2..];
            }
            None => {
                prompt.push('{');
                rest = &tail[1..];
            }
        }
    }
    prompt.push_str(rest);
    prompt
}

fn placeholder_value<'a>(name: &str, values: &[(&str, &'a str)]) -> Option<&'a str> {
    if name == "json_only" {
        return Some(JSON_ONLY_INSTRUCTION);
    }
    values
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

/// Pretty-printed JSON for embedding request objects in a prompt.
pub fn pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
