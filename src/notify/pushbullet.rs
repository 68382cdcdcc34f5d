use async_trait::async_trait;

use super::transport::{strip_emphasis, Message, Transport};
use super::Result;
use crate::config::PushbulletSettings;

/// Pushbullet transport: a plain note with title and body, addressed by
/// account access token.
#[derive(Debug, Clone)]
pub struct Pushbullet {
    client: reqwest::Client,
    api_key: String,
}

impl Pushbullet {
    pub fn new(client: reqwest::Client, settings: &PushbulletSettings) -> Self {
        Self {
            client,
            api_key: settings.api_key.clone(),
        }
    }
}

#[async_trait]
impl Transport for Pushbullet {
    fn name(&self) -> &'static str {
        "pushbullet"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        self.client
            .post("https://api.pushbullet.com/v2/pushes")
            .header("Access-Token", &self.api_key)
            .json(&serde_json::json!({
                "type": "note",
                "title": strip_emphasis(&message.title),
                "body": strip_emphasis(&message.body),
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
