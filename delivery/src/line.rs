use async_trait::async_trait;
use config::{HttpConfig, LineConfig};
use errors::{DeliveryError, DeliveryResult};
use quiz_core::traits::MessageSender;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// LINE Messaging API push client.
pub struct LineClient {
    client: Client,
    config: LineConfig
}

impl LineClient {
    pub fn new(config: LineConfig, http: &HttpConfig) -> DeliveryResult<Self> {
        let client = Client::builder()
            .timeout(http.timeout())
            .build()
            .map_err(|e| DeliveryError::Transport {
                reason: e.to_string()
            })?;

        Ok(Self { client, config })
    }

    fn push_url(&self) -> String {
        format!(
            "{}/v2/bot/message/push",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str
}

#[async_trait]
impl MessageSender for LineClient {
    async fn push_text(&self, recipient: &str, text: &str) -> DeliveryResult<()> {
        let url = self.push_url();
        debug!(url = %url, chars = text.chars().count(), "Pushing LINE message");

        let request = PushRequest {
            to: recipient,
            messages: vec![TextMessage { kind: "text", text }]
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.channel_access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport {
                reason: e.to_string()
            })?;

        match response.status() {
            status if status.is_success() => {
                info!("LINE message delivered");
                Ok(())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(DeliveryError::RateLimited { retry_after })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                Err(DeliveryError::Unauthorized { reason: body })
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(DeliveryError::Api {
                    status: status.as_u16(),
                    message: body
                })
            }
        }
    }
}

pub fn create_line_client(
    config: LineConfig,
    http: &HttpConfig
) -> DeliveryResult<Arc<dyn MessageSender>> {
    Ok(Arc::new(LineClient::new(config, http)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_request_shape() {
        let request = PushRequest {
            to: "U123",
            messages: vec![TextMessage {
                kind: "text",
                text: "hi"
            }]
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "to": "U123", "messages": [{ "type": "text", "text": "hi" }] })
        );
    }

    #[test]
    fn test_push_url_ignores_trailing_slash() {
        let client = LineClient::new(
            LineConfig {
                channel_access_token: "t".to_string(),
                user_id: "U1".to_string(),
                base_url: "https://api.line.me/".to_string()
            },
            &HttpConfig::default()
        )
        .unwrap();

        assert_eq!(client.push_url(), "https://api.line.me/v2/bot/message/push");
    }
}
