//! Anthropic Messages API backend.

use async_stream::stream;
use copydeck_common_config::{require_var, vars, QaConfig};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::*;

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    /// Provider for the configured model, keyed from `ANTHROPIC_API_KEY`.
    pub fn from_config(config: &QaConfig) -> Result<Self, LlmError> {
        let api_key = require_var(vars::ANTHROPIC_API_KEY)
            .map_err(|_| LlmError::MissingApiKey(vars::ANTHROPIC_API_KEY))?;
        Ok(Self::new(api_key, &config.api_base, &config.model))
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.api_base.trim_end_matches('/'))
    }

    fn api_request(&self, request: LlmRequest, stream: bool) -> ApiRequest {
        let mut system = request.system_prompt;
        let mut messages = Vec::with_capacity(request.messages.len());
        for message in request.messages {
            let role = match message.role {
                MessageRole::System => {
                    system = Some(message.content);
                    continue;
                }
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            };
            messages.push(ApiMessage {
                role: role.to_string(),
                content: message.content,
            });
        }

        ApiRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages,
            system,
            stream,
        }
    }

    async fn send(&self, body: &ApiRequest) -> Result<reqwest::Response, LlmError> {
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            stream = body.stream,
            "Sending messages request"
        );
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContent>,
    usage: Option<ApiUsage>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    text: Option<String>,
    stop_reason: Option<String>,
}

/// Incremental decoder for the server-sent event stream.
///
/// Bytes are buffered raw and only complete events are decoded, so a
/// multibyte character split across network chunks survives intact.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed raw bytes; returns chunks for every complete event.
    fn feed(&mut self, bytes: &[u8]) -> Vec<LlmStreamChunk> {
        self.buffer.extend_from_slice(bytes);
        let mut chunks = Vec::new();

        while let Some(idx) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buffer.drain(..idx + 2).collect();
            let event = String::from_utf8_lossy(&event);
            for data in event.lines().filter_map(|l| l.strip_prefix("data: ")) {
                if let Some(chunk) = decode_event(data) {
                    chunks.push(chunk);
                }
            }
        }
        chunks
    }
}

fn decode_event(data: &str) -> Option<LlmStreamChunk> {
    let done = |reason: String| LlmStreamChunk {
        delta: String::new(),
        is_complete: true,
        finish_reason: Some(reason),
    };
    if data == "[DONE]" {
        return Some(done("end_turn".to_string()));
    }

    let event: StreamEvent = serde_json::from_str(data).ok()?;
    match event.event_type.as_str() {
        "content_block_delta" => event.delta?.text.map(|text| LlmStreamChunk {
            delta: text,
            is_complete: false,
            finish_reason: None,
        }),
        "message_delta" => event.delta?.stop_reason.map(done),
        "message_stop" => Some(done("end_turn".to_string())),
        _ => None,
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.api_request(request, false);
        let response: ApiResponse = self
            .send(&body)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let content = response
            .content
            .into_iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text)
            .collect::<String>();

        let usage = response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content,
            finish_reason: response.stop_reason,
            usage,
        })
    }

    async fn complete_stream(&self, request: LlmRequest) -> Result<LlmStream, LlmError> {
        let body = self.api_request(request, true);
        let response = self.send(&body).await?;

        let stream = stream! {
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::default();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(LlmError::NetworkError(e));
                        return;
                    }
                };
                for decoded in decoder.feed(&chunk) {
                    let complete = decoded.is_complete;
                    yield Ok(decoded);
                    if complete {
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            "test-key",
            "https://api.anthropic.com/",
            "claude-sonnet-4-20250514",
        )
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(provider().endpoint(), "https://api.anthropic.com/v1/messages");
        assert_eq!(provider().name(), "anthropic");
    }

    #[test]
    fn test_system_messages_lift_into_system_field() {
        let request = LlmRequest {
            model: String::new(),
            messages: vec![
                LlmMessage {
                    role: MessageRole::System,
                    content: "Be terse".into(),
                },
                LlmMessage::user("Hello"),
                LlmMessage::assistant("Hi"),
            ],
            max_tokens: Some(2000),
            system_prompt: None,
        };
        let body = provider().api_request(request, true);
        assert_eq!(body.system.as_deref(), Some("Be terse"));
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[1].role, "assistant");
        assert_eq!(body.max_tokens, 2000);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_sse_decoder_handles_split_events() {
        let mut decoder = SseDecoder::default();
        let first = decoder.feed(
            b"event: content_block_delta\ndata: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"Hel",
        );
        assert!(first.is_empty());

        let second = decoder.feed(
            b"lo\"}}\n\ndata: {\"type\":\"ping\"}\n\ndata: {\"type\":\"message_stop\"}\n\n",
        );
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].delta, "Hello");
        assert!(!second[0].is_complete);
        assert!(second[1].is_complete);
    }

    #[test]
    fn test_sse_decoder_keeps_multibyte_split_across_chunks() {
        let event = "data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"café\"}}\n\n";
        let bytes = event.as_bytes();
        let split = event.find('é').unwrap() + 1;

        let mut decoder = SseDecoder::default();
        assert!(decoder.feed(&bytes[..split]).is_empty());
        let chunks = decoder.feed(&bytes[split..]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].delta, "café");
    }

    #[test]
    fn test_message_delta_stop_reason() {
        let chunk = decode_event(r#"{"type":"message_delta","delta":{"stop_reason":"max_tokens"}}"#)
            .unwrap();
        assert!(chunk.is_complete);
        assert_eq!(chunk.finish_reason.as_deref(), Some("max_tokens"));
        assert!(decode_event("not json").is_none());
    }
}
