//! AI gateway: the only component that talks to the multimodal model.
//!
//! The core treats the model as two opaque operations: summarize a
//! set of frame artifacts, and continue a chat given the replayed
//! history. The production implementation targets the Gemini
//! `generateContent` REST endpoint with frames inlined as base64.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use vchat_models::{Role, Turn};

use crate::error::{ApiError, ApiResult};

/// Fixed prompt sent alongside the sampled frames.
pub const ANALYSIS_PROMPT: &str = "\
You are an advanced AI video analysis assistant specializing in detailed \
content understanding and educational responses. Analyze the provided video \
frames and prepare to engage in discussion about the content.

Identify and describe key events, actions, and subjects; note temporal \
progression and significant changes; evaluate technical aspects such as \
quality, composition and lighting.

Structure the initial summary as:
* Key Content Overview: main subjects and actions, timeline of events
* Professional Analysis: technical quality assessment, notable standards
* Educational Points: key learning elements and relevant context";

/// Opaque multimodal summarization/chat service.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Summarize a set of frame images under a fixed prompt.
    async fn summarize(&self, frames: &[PathBuf], prompt: &str) -> ApiResult<String>;

    /// Continue a conversation: replay `history` and send `message`.
    async fn continue_chat(&self, history: &[Turn], message: &str) -> ApiResult<String>;
}

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: &'static str,
    data: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Models to try, in order, before giving up.
const MODELS: &[&str] = &["gemini-2.0-flash", "gemini-2.5-flash", "gemini-2.5-pro"];

impl GeminiClient {
    /// Create a new Gemini client with the given request timeout.
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ApiError::internal("GEMINI_API_KEY not configured"))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { api_key, client })
    }

    /// Call generateContent, falling back through the model list.
    async fn generate(&self, contents: Vec<Content>) -> ApiResult<String> {
        let request = GeminiRequest { contents };
        let mut last_error = None;

        for model in MODELS {
            match self.call_model(model, &request).await {
                Ok(text) => {
                    info!(model, "Gemini call succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model, error = %e, "Gemini call failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::gateway("All Gemini models failed")))
    }

    async fn call_model(&self, model: &str, request: &GeminiRequest) -> ApiResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::gateway(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::gateway(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ApiError::gateway(format!("failed to parse response: {}", e)))?;

        gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ApiError::gateway("no content in Gemini response"))
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    async fn summarize(&self, frames: &[PathBuf], prompt: &str) -> ApiResult<String> {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];

        for frame in frames {
            let bytes = tokio::fs::read(frame)
                .await
                .map_err(|e| ApiError::internal(format!("failed to read frame: {}", e)))?;
            parts.push(Part::Inline {
                inline_data: InlineData {
                    mime_type: "image/jpeg",
                    data: base64::engine::general_purpose::STANDARD.encode(bytes),
                },
            });
        }

        self.generate(vec![Content {
            role: "user",
            parts,
        }])
        .await
    }

    async fn continue_chat(&self, history: &[Turn], message: &str) -> ApiResult<String> {
        let mut contents: Vec<Content> = history.iter().map(content_from_turn).collect();
        contents.push(Content {
            role: "user",
            parts: vec![Part::Text {
                text: message.to_string(),
            }],
        });

        self.generate(contents).await
    }
}

fn content_from_turn(turn: &Turn) -> Content {
    Content {
        role: match turn.role {
            Role::User => "user",
            Role::Model => "model",
        },
        parts: turn
            .parts
            .iter()
            .map(|p| Part::Text { text: p.clone() })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_from_turn_roles() {
        let c = content_from_turn(&Turn::user("hi"));
        assert_eq!(c.role, "user");

        let c = content_from_turn(&Turn::model("summary"));
        assert_eq!(c.role, "model");
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text {
                        text: "prompt".into(),
                    },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: "image/jpeg",
                            data: "QUJD".into(),
                        },
                    },
                ],
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
    }
}
