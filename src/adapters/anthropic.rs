//! Anthropic Messages-API implementation of the AI feedback backend.
//!
//! The pipeline hands this adapter *locators*, not bytes: it resolves the
//! image locator against the local filesystem (the shape
//! [`crate::adapters::LocalFileStore`] produces), base64-encodes the PNG,
//! and sends it alongside the instructions as one vision request.
//!
//! Transport and API errors surface as `Err` (the pipeline's catch-all
//! path); a well-formed response with no content maps to `Ok(None)`
//! (the "Failed to analyse Resume" path).

use crate::clients::{
    AiMessage, BoxError, ContentPart, FeedbackAi, FeedbackResponse, MessageContent,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model for feedback requests.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not read image '{path}': {source}")]
    ImageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ── Request/response wire types ──────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RequestBlock<'a> {
    Image { source: ImageSource },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ── Client ───────────────────────────────────────────────────────────────

/// [`FeedbackAi`] backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicFeedbackClient {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicFeedbackClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl FeedbackAi for AnthropicFeedbackClient {
    async fn feedback(
        &self,
        _resume_locator: &str,
        image_locator: &str,
        instructions: &str,
    ) -> Result<Option<FeedbackResponse>, BoxError> {
        // The rasterized page carries everything the vision model needs;
        // the resume locator exists for backends that index the original.
        let image_bytes =
            tokio::fs::read(image_locator)
                .await
                .map_err(|source| LlmError::ImageRead {
                    path: image_locator.to_string(),
                    source,
                })?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![RequestMessage {
                role: "user",
                content: vec![
                    RequestBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: "image/png",
                            data: STANDARD.encode(&image_bytes),
                        },
                    },
                    RequestBlock::Text { text: instructions },
                ],
            }],
        };

        debug!(
            "Requesting feedback from {} ({} image bytes)",
            self.model,
            image_bytes.len()
        );

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(LlmError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Anthropic API error {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let decoded: MessagesResponse = response.json().await.map_err(LlmError::Http)?;
        if decoded.content.is_empty() {
            return Ok(None);
        }

        // Preserve the block structure; the extractor filters for text.
        let parts = decoded
            .content
            .into_iter()
            .map(|block| match block.text {
                Some(text) => ContentPart::Typed {
                    kind: block.kind,
                    text,
                },
                None => ContentPart::Other(serde_json::json!({ "type": block.kind })),
            })
            .collect();

        Ok(Some(FeedbackResponse {
            message: AiMessage {
                content: MessageContent::Parts(parts),
            },
        }))
    }
}
