use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::Url;
use serde_json::json;

use super::Messenger;
use super::SendError;

/// Messenger that treats the destination reference as a webhook URL.
pub struct WebhookMessenger {
    client: Client,
}

impl WebhookMessenger {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Messenger for WebhookMessenger {
    async fn resolve(&self, destination: &str) -> bool {
        match Url::parse(destination) {
            Ok(url) => url.host_str().is_some(),
            Err(e) => {
                error!("Failed to parse webhook URL {destination}: {e}");
                false
            }
        }
    }

    async fn can_send(&self, destination: &str) -> bool {
        Url::parse(destination).is_ok_and(|url| url.scheme() == "https")
    }

    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError> {
        let response = self
            .client
            .post(destination)
            .json(&json!({ "content": text }))
            .send()
            .await
            .map_err(|e| SendError::Transport(Box::new(e)))?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(SendError::Forbidden)
            }
            s => Err(SendError::Transport(
                format!("webhook returned status {s}").into(),
            )),
        }
    }
}
