use async_trait::async_trait;
use config::{GeminiConfig, HttpConfig};
use errors::{GenerationError, GenerationResult};
use quiz_core::traits::TextGenerator;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Gemini `generateContent` client implementing [`TextGenerator`].
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, http: &HttpConfig) -> GenerationResult<Self> {
        let client = Client::builder()
            .timeout(http.timeout())
            .build()
            .map_err(|e| GenerationError::Transport {
                reason: e.to_string()
            })?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let url = self.endpoint();
        debug!(url = %url, prompt_chars = prompt.len(), "Calling Gemini");

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string())
                }]
            }]
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport {
                reason: e.to_string()
            })?;

        match response.status() {
            status if status.is_success() => {
                let body: GenerateContentResponse =
                    response
                        .json()
                        .await
                        .map_err(|e| GenerationError::MalformedResponse {
                            reason: e.to_string()
                        })?;
                let text = body.text();
                if text.trim().is_empty() {
                    return Err(GenerationError::EmptyResponse);
                }
                Ok(text)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(GenerationError::RateLimited { retry_after })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(GenerationError::Unauthorized { reason: body })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: body
                })
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn create_gemini_client(
    config: GeminiConfig,
    http: &HttpConfig
) -> GenerationResult<Arc<dyn TextGenerator>> {
    Ok(Arc::new(GeminiClient::new(config, http)?))
}
