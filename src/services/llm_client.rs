use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        ChatCompletionResponseStream, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::domain::{ChatMessage, Role};

/// Chat-completion client for any OpenAI-compatible endpoint (OpenAI itself,
/// or a local Ollama at e.g. http://localhost:11434/v1).
#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key);

        LlmClient {
            client: Client::with_config(config),
            model,
        }
    }

    fn build_request(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<CreateChatCompletionRequest> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(to_request_messages(messages)?)
            .stream(stream)
            .build()?;

        Ok(request)
    }

    pub async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages, false)?;
        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices in model response"))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow!("No content in model response"))?;

        Ok(content)
    }

    pub async fn chat_completion_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ChatCompletionResponseStream> {
        let request = self.build_request(messages, true)?;
        let stream = self.client.chat().create_stream(request).await?;

        Ok(stream)
    }
}

fn to_request_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
    messages
        .iter()
        .map(|message| -> Result<ChatCompletionRequestMessage> {
            let request_message = match message.role {
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()?
                    .into(),
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.clone())
                    .build()?
                    .into(),
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.clone())
                    .build()?
                    .into(),
            };
            Ok(request_message)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_every_role() {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: "be brief".to_string(),
            },
            ChatMessage::user("hello"),
            ChatMessage::assistant("hi"),
        ];

        let converted = to_request_messages(&messages).unwrap();
        assert_eq!(converted.len(), 3);
        assert!(matches!(
            converted[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(converted[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            converted[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
    }
}
