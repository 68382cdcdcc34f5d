use async_trait::async_trait;

use super::transport::{strip_emphasis, Message, Transport};
use super::Result;
use crate::config::NtfySettings;

/// ntfy transport: plain-text body published to a topic, title in a header.
#[derive(Debug, Clone)]
pub struct Ntfy {
    client: reqwest::Client,
    server: String,
    topic: String,
}

impl Ntfy {
    pub fn new(client: reqwest::Client, settings: &NtfySettings) -> Self {
        Self {
            client,
            server: settings.server.trim_end_matches('/').to_owned(),
            topic: settings.topic.clone(),
        }
    }
}

#[async_trait]
impl Transport for Ntfy {
    fn name(&self) -> &'static str {
        "ntfy"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        let url = format!("{}/{}", self.server, self.topic);
        self.client
            .post(&url)
            .header("Title", strip_emphasis(&message.title))
            .body(strip_emphasis(&message.body))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
