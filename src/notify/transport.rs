use async_trait::async_trait;

use super::Result;

/// One outbound notification in canonical markup (single-asterisk emphasis).
///
/// `title` is the host/class header line; transports that have no separate
/// title field prepend it to the body via [`Message::text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Title and body as one block, for transports without a title field.
    pub fn text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

/// A fire-and-forget delivery channel.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Attempts delivery of one message, adapted to the transport's payload
    /// shape and markup dialect.
    async fn send(&self, message: &Message) -> Result<()>;
}

/// Doubles emphasis markers for `**bold**` markdown dialects.
pub(super) fn double_emphasis(text: &str) -> String {
    text.replace('*', "**")
}

/// Strips emphasis markers for plain-text transports and title fields.
pub(super) fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}
