// Free-form scheduling chat.
// Replies are plain text; a failed completion becomes a fixed apology so the
// endpoint always answers 200.

pub mod prompts;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppJson;
use crate::llm_client::prompts::ComposedPrompt;
use crate::llm_client::{ChatMessage, CompletionGateway, CompletionOptions, MAX_TOKENS};
use crate::state::AppState;
use prompts::{CHAT_APOLOGY, CHAT_SYSTEM_PROMPT, CHAT_TEMPERATURE};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatRequest {
    /// System prompt, then the prior turns, then the new user message.
    pub fn compose(&self) -> ComposedPrompt {
        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.extend(self.conversation.iter().cloned());
        messages.push(ChatMessage::user(self.message.as_str()));

        ComposedPrompt {
            system: CHAT_SYSTEM_PROMPT.to_string(),
            messages,
            options: CompletionOptions {
                temperature: CHAT_TEMPERATURE,
                max_tokens: MAX_TOKENS,
                json_response: false,
            },
        }
    }
}

/// Blank messages are forwarded like any other; the model decides how to
/// answer them.
pub async fn reply(gateway: &dyn CompletionGateway, request: &ChatRequest) -> ChatResponse {
    let prompt = request.compose();
    let response = match gateway
        .complete(&prompt.system, &prompt.messages, &prompt.options)
        .await
    {
        Ok(text) => {
            info!("chat: replied after {} prior turn(s)", request.conversation.len());
            text.trim().to_string()
        }
        Err(e) => {
            warn!("chat completion failed: {e}");
            CHAT_APOLOGY.to_string()
        }
    };

    ChatResponse { response }
}

/// POST /api/llm/chat
///
/// Answers a scheduling question, optionally in the context of earlier turns.
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Json<ChatResponse> {
    Json(reply(state.llm.as_ref(), &request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::stub::StubGateway;
    use crate::llm_client::Role;
    use serde_json::json;

    fn request(message: &str) -> ChatRequest {
        serde_json::from_value(json!({
            "message": message,
            "conversation": [
                {"role": "user", "content": "Which rooms have projectors?"},
                {"role": "assistant", "content": "Rooms 301 and 420."}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_compose_appends_message_after_history() {
        let prompt = request("Is Room 301 free on Friday?").compose();
        assert_eq!(prompt.system, CHAT_SYSTEM_PROMPT);
        assert_eq!(prompt.messages.len(), 3);
        assert_eq!(prompt.messages[1].role, Role::Assistant);
        assert_eq!(prompt.messages[2].role, Role::User);
        assert_eq!(prompt.messages[2].content, "Is Room 301 free on Friday?");
        assert_eq!(prompt.options.temperature, 0.7);
        assert!(!prompt.options.json_response);
    }

    #[test]
    fn test_conversation_defaults_to_empty() {
        let request: ChatRequest = serde_json::from_value(json!({"message": "hello"})).unwrap();
        assert!(request.conversation.is_empty());
        assert_eq!(request.compose().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_reply_is_trimmed_text() {
        let gateway = StubGateway::replying("  Room 301 is free after 2 PM.\n");
        let response = reply(&gateway, &request("Is Room 301 free?")).await;
        assert_eq!(response.response, "Room 301 is free after 2 PM.");
        assert_eq!(gateway.last_call().unwrap().messages.len(), 3);
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_apology() {
        let gateway = StubGateway::failing();
        let response = reply(&gateway, &request("Is Room 301 free?")).await;
        assert_eq!(response.response, CHAT_APOLOGY);
    }

    #[tokio::test]
    async fn test_empty_message_is_forwarded() {
        let gateway = StubGateway::replying("What would you like to know about the schedule?");
        let response = reply(&gateway, &request("   ")).await;
        assert_eq!(
            response.response,
            "What would you like to know about the schedule?"
        );
        assert_eq!(gateway.calls(), 1);
        assert_eq!(gateway.last_call().unwrap().messages[2].content, "   ");
    }
}
