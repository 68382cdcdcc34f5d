use async_trait::async_trait;

use super::transport::{double_emphasis, Message, Transport};
use super::Result;
use crate::config::DiscordSettings;

/// Discord incoming-webhook transport.
#[derive(Debug, Clone)]
pub struct Discord {
    client: reqwest::Client,
    webhook_url: String,
}

impl Discord {
    pub fn new(client: reqwest::Client, settings: &DiscordSettings) -> Self {
        Self {
            client,
            webhook_url: settings.webhook_url.clone(),
        }
    }
}

#[async_trait]
impl Transport for Discord {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        // Discord bolds with double asterisks.
        self.client
            .post(&self.webhook_url)
            .json(&serde_json::json!({
                "content": double_emphasis(&message.text()),
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
