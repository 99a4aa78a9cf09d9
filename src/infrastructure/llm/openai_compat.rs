use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use super::http_client::HttpClientTrait;
use crate::domain::llm::{
    ContentPart, FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage,
};
use crate::domain::DomainError;

const PROVIDER_NAME: &str = "openai_compat";

/// Provider for OpenAI-style `/v1/chat/completions` endpoints.
///
/// Covers OpenAI itself plus the hosted inference routers that expose the
/// same schema (Friendli dedicated endpoints, Hugging Face router targets).
#[derive(Debug)]
pub struct OpenAiCompatProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait> OpenAiCompatProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request(&self, model: &str, request: &LlmRequest) -> serde_json::Value {
        let messages: Vec<WireMessage> = request.messages.iter().map(WireMessage::from_domain).collect();

        let mut body = json!({
            "model": model,
            "messages": messages,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, DomainError> {
        let response: WireResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::upstream(PROVIDER_NAME, format!("Failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::upstream(PROVIDER_NAME, "No choices in response"))?;

        let message = Message::assistant(choice.message.content.unwrap_or_default());

        let mut llm_response =
            LlmResponse::new(response.id.unwrap_or_default(), response.model, message);

        if let Some(reason) = choice.finish_reason {
            llm_response = llm_response.with_finish_reason(parse_finish_reason(&reason));
        }

        if let Some(usage) = response.usage {
            llm_response = llm_response
                .with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(llm_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiCompatProvider<C> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        let url = self.chat_completions_url();
        let body = self.build_request(model, &request);
        let response = self.client.post_json(&url, self.headers(), &body).await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

fn parse_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        _ => FinishReason::Stop,
    }
}

// Wire types for the chat completions schema

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<serde_json::Value>),
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: WireContent,
}

impl WireMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        // Plain text goes out as a string; multimodal messages become the
        // mixed content-part array with the image inlined as a data URI.
        let parts = message.content_parts();
        let content = if parts.is_empty() {
            WireContent::Text(message.content_text().unwrap_or("").to_string())
        } else {
            WireContent::Parts(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => json!({
                            "type": "text",
                            "text": text,
                        }),
                        ContentPart::ImageBase64 { data, media_type } => json!({
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{media_type};base64,{data}"),
                            },
                        }),
                    })
                    .collect(),
            )
        };

        Self { role, content }
    }
}

#[derive(Debug, serde::Deserialize)]
struct WireResponse {
    id: Option<String>,
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, serde::Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::LlmRequest;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.example.test/v1/chat/completions";

    fn completion_json(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "model": "gemma-3-27b-it",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 42, "completion_tokens": 17, "total_tokens": 59 }
        })
    }

    #[tokio::test]
    async fn test_chat_text_only() {
        let client =
            MockHttpClient::new().with_response(TEST_URL, completion_json("A stop sign."));
        let provider = OpenAiCompatProvider::new(client, "test-key", "https://api.example.test");

        let request = LlmRequest::builder().user("What signs?").build();
        let response = provider.chat("gemma-3-27b-it", request).await.unwrap();

        assert_eq!(response.content(), Some("A stop sign."));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
        assert_eq!(response.usage.unwrap().total_tokens, 59);
    }

    #[tokio::test]
    async fn test_chat_sends_image_as_data_uri_part() {
        let client = MockHttpClient::new().with_response(TEST_URL, completion_json("ok"));
        let provider = OpenAiCompatProvider::new(client, "test-key", "https://api.example.test");

        let request = LlmRequest::new(vec![Message::user_with_parts(vec![
            ContentPart::Text {
                text: "List the signs".to_string(),
            },
            ContentPart::ImageBase64 {
                data: "aGVsbG8=".to_string(),
                media_type: "image/jpeg".to_string(),
            },
        ])]);

        provider.chat("gemma-3-27b-it", request).await.unwrap();

        let recorded = provider.client.recorded_requests();
        assert_eq!(recorded.len(), 1);
        let body = &recorded[0].1;
        let parts = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(parse_finish_reason("stop"), FinishReason::Stop);
        assert_eq!(parse_finish_reason("length"), FinishReason::Length);
        assert_eq!(
            parse_finish_reason("content_filter"),
            FinishReason::ContentFilter
        );
        // Unrecognized vendor reasons degrade to Stop.
        assert_eq!(parse_finish_reason("tool_calls"), FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_max_tokens_forwarded() {
        let client = MockHttpClient::new().with_response(TEST_URL, completion_json("ok"));
        let provider = OpenAiCompatProvider::new(client, "test-key", "https://api.example.test");

        let request = LlmRequest::builder().user("hi").max_tokens(200).build();
        provider.chat("gemma-3-27b-it", request).await.unwrap();

        let recorded = provider.client.recorded_requests();
        assert_eq!(recorded[0].1["max_tokens"], 200);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "HTTP 401: bad key");
        let provider = OpenAiCompatProvider::new(client, "bad-key", "https://api.example.test");

        let request = LlmRequest::builder().user("hi").build();
        let result = provider.chat("gemma-3-27b-it", request).await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_malformed_response_is_upstream_error() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({"unexpected": true}));
        let provider = OpenAiCompatProvider::new(client, "test-key", "https://api.example.test");

        let request = LlmRequest::builder().user("hi").build();
        let result = provider.chat("gemma-3-27b-it", request).await;

        assert!(matches!(result, Err(DomainError::Upstream { .. })));
    }
}
