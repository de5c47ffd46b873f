use std::collections::HashMap;

use anyhow::Result;
use async_openai::types::ChatCompletionResponseStream;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, Role};
use crate::services::LlmClient;

/// Keeps per-session conversation history and runs completion round-trips
/// against the model. History lives in memory for the process lifetime only.
pub struct ChatAgent {
    llm_client: LlmClient,
    histories: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl ChatAgent {
    pub fn new(llm_client: LlmClient) -> Self {
        ChatAgent {
            llm_client,
            histories: Mutex::new(HashMap::new()),
        }
    }

    async fn append_messages(&self, session_id: &str, messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(session_id.to_string()).or_default();
        history.extend(messages);
        history.clone()
    }

    /// Run a full completion round-trip: record the incoming messages, ask the
    /// model with the whole session history, record and return the reply.
    pub async fn get_response(
        &self,
        messages: Vec<ChatMessage>,
        session_id: &str,
    ) -> Result<Vec<ChatMessage>> {
        let history = self.append_messages(session_id, messages).await;
        let reply = self.llm_client.chat_completion(&history).await?;

        let mut histories = self.histories.lock().await;
        let history = histories.entry(session_id.to_string()).or_default();
        history.push(ChatMessage {
            role: Role::Assistant,
            content: reply,
        });

        Ok(history.clone())
    }

    /// Record the incoming messages and open a token stream over the session
    /// history. The caller is responsible for storing the assembled reply via
    /// [`store_assistant_reply`](Self::store_assistant_reply) once the stream
    /// finishes.
    pub async fn stream_response(
        &self,
        messages: Vec<ChatMessage>,
        session_id: &str,
    ) -> Result<ChatCompletionResponseStream> {
        let history = self.append_messages(session_id, messages).await;
        self.llm_client.chat_completion_stream(&history).await
    }

    pub async fn store_assistant_reply(&self, session_id: &str, content: String) {
        let mut histories = self.histories.lock().await;
        let history = histories.entry(session_id.to_string()).or_default();
        history.push(ChatMessage {
            role: Role::Assistant,
            content,
        });
    }

    pub async fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        let histories = self.histories.lock().await;
        histories.get(session_id).cloned().unwrap_or_default()
    }

    pub async fn clear_history(&self, session_id: &str) {
        let mut histories = self.histories.lock().await;
        histories.remove(session_id);
    }
}
