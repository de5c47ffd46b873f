use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreamResponse {
    pub content: String,
    pub done: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewsImpactRequest {
    pub url: Url,
    pub field: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsImpactResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let message = ChatMessage::user("hello");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hello"}"#);

        let message = ChatMessage::assistant("hi");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn chat_request_deserializes_message_list() {
        let body = r#"{"messages":[{"role":"system","content":"be brief"},{"role":"user","content":"hi"}]}"#;
        let request: ChatRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].content, "hi");
    }

    #[test]
    fn news_impact_request_rejects_malformed_url() {
        let body = r#"{"url":"not a url","field":"finance"}"#;
        assert!(serde_json::from_str::<NewsImpactRequest>(body).is_err());
    }

    #[test]
    fn stream_response_round_trips() {
        let response = StreamResponse {
            content: "chunk".to_string(),
            done: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"content":"chunk","done":false}"#);
    }
}
