use async_trait::async_trait;

use super::transport::{Message, Transport};
use super::Result;
use crate::config::TelegramSettings;

/// Telegram bot transport: chat-markup text addressed to one chat id.
#[derive(Debug, Clone)]
pub struct Telegram {
    client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl Telegram {
    pub fn new(client: reqwest::Client, settings: &TelegramSettings) -> Self {
        Self {
            client,
            token: settings.token.clone(),
            chat_id: settings.chat_id.clone(),
        }
    }
}

#[async_trait]
impl Transport for Telegram {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        // Telegram's Markdown dialect uses single asterisks, the canonical
        // markup passes through unchanged.
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        self.client
            .post(&url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": message.text(),
                "parse_mode": "Markdown",
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
