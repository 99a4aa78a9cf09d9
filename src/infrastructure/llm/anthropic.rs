use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    ContentPart, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};
use crate::domain::DomainError;

const PROVIDER_NAME: &str = "anthropic";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_ANTHROPIC_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let (system, messages) = split_system_messages(&request.messages);

        let wire_messages: Vec<WireMessage> =
            messages.iter().map(|m| WireMessage::from_domain(m)).collect();

        let mut body = json!({
            "model": model,
            "messages": wire_messages,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        if let Some(system_content) = system {
            body["system"] = json!(system_content);
        }

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: WireResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::upstream(PROVIDER_NAME, format!("Failed to parse response: {e}"))
        })?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let message = Message::assistant(content);
        let mut llm_response = LlmResponse::new(response.id, response.model, message);

        llm_response = llm_response.with_finish_reason(parse_stop_reason(&response.stop_reason));
        llm_response = llm_response.with_usage(Usage::new(
            response.usage.input_tokens,
            response.usage.output_tokens,
        ));

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for AnthropicProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.messages_url();
        let body = self.build_request(model, &request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

fn split_system_messages(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
    let mut system_content = String::new();
    let mut other_messages = Vec::new();

    for msg in messages {
        if msg.role == MessageRole::System {
            if !system_content.is_empty() {
                system_content.push('\n');
            }

            if let Some(text) = msg.content_text() {
                system_content.push_str(text);
            }
        } else {
            other_messages.push(msg);
        }
    }

    let system = if system_content.is_empty() {
        None
    } else {
        Some(system_content)
    };

    (system, other_messages)
}

fn parse_stop_reason(reason: &str) -> FinishReason {
    match reason {
        "max_tokens" => FinishReason::Length,
        _ => FinishReason::Stop,
    }
}

// Wire types for the Messages API

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: serde_json::Value,
}

impl WireMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::Assistant => "assistant",
            _ => "user",
        };

        let parts = message.content_parts();
        let content = if parts.is_empty() {
            json!(message.content_text().unwrap_or(""))
        } else {
            json!(parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => json!({
                        "type": "text",
                        "text": text,
                    }),
                    ContentPart::ImageBase64 { data, media_type } => json!({
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": media_type,
                            "data": data,
                        },
                    }),
                })
                .collect::<Vec<_>>())
        };

        Self { role, content }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    id: String,
    model: String,
    content: Vec<WireContentBlock>,
    stop_reason: String,
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}
