//! Deterministic `ChatBackend` used by the pipeline and front-end tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::{ChatBackend, ChatMessage, LlmError};

type Handler = dyn Fn(usize, &[ChatMessage]) -> Result<String, LlmError> + Send + Sync;

/// Answers each call from a handler that sees the call index and the
/// rendered messages. Every call is recorded.
pub struct ScriptedBackend {
    handler: Box<Handler>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedBackend {
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: Fn(usize, &[ChatMessage]) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply `replies[i]` to the i-th call; calls past the end get `EmptyResponse`.
    pub fn replies<S: Into<String>>(replies: Vec<S>) -> Self {
        let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
        Self::from_fn(move |i, _| replies.get(i).cloned().ok_or(LlmError::EmptyResponse))
    }

    /// Echo the last user message back, prefixed with the call index.
    pub fn echo() -> Self {
        Self::from_fn(|i, messages| {
            let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
            Ok(format!("[{}] {}", i, last))
        })
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let index = match self.calls.lock() {
            Ok(mut calls) => {
                calls.push(messages.to_vec());
                calls.len() - 1
            }
            Err(_) => return Err(LlmError::InvalidResponse("call log poisoned".to_string())),
        };
        (self.handler)(index, messages)
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
