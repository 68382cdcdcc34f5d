use async_trait::async_trait;

use super::transport::{double_emphasis, strip_emphasis, Message, Transport};
use super::Result;
use crate::config::GotifySettings;

/// Gotify transport: title + message against a self-hosted server, addressed
/// by application token.
#[derive(Debug, Clone)]
pub struct Gotify {
    client: reqwest::Client,
    server: String,
    token: String,
}

impl Gotify {
    pub fn new(client: reqwest::Client, settings: &GotifySettings) -> Self {
        Self {
            client,
            server: settings.server.trim_end_matches('/').to_owned(),
            token: settings.token.clone(),
        }
    }
}

#[async_trait]
impl Transport for Gotify {
    fn name(&self) -> &'static str {
        "gotify"
    }

    async fn send(&self, message: &Message) -> Result<()> {
        // Titles are plain text; the body keeps markdown with doubled
        // asterisks for clients that render it.
        let url = format!("{}/message", self.server);
        self.client
            .post(&url)
            .query(&[("token", self.token.as_str())])
            .json(&serde_json::json!({
                "title": strip_emphasis(&message.title),
                "message": double_emphasis(&message.body),
                "priority": 5,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
