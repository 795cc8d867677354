//! In-memory gateway for service and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatMessage, CompletionGateway, CompletionOptions, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

/// Answers every call with a fixed reply, or fails every call.
pub struct StubGateway {
    reply: Option<String>,
    calls: AtomicUsize,
    last: Mutex<Option<RecordedCall>>,
}

impl StubGateway {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for StubGateway {
    async fn complete(
        &self,
        system: &str,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(RecordedCall {
            system: system.to_string(),
            messages: messages.to_vec(),
            options: *options,
        });

        self.reply.clone().ok_or_else(|| LlmError::Api {
            status: 503,
            message: "stub gateway unavailable".to_string(),
        })
    }
}
