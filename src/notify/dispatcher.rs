use std::time::Duration;

use super::formatter;
use super::transport::{Message, Transport};
use super::{Discord, Gotify, Ntfy, Pushbullet, Result, Telegram};
use crate::config::Settings;
use crate::diff::ChangeEvent;
use crate::entity::EntityClass;

/// Bounded timeout per transport call, so one unreachable endpoint cannot
/// stall a whole poll tick.
const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One outbound message per change event.
    PerEvent,
    /// All lines for one entity class and poll cycle in a single message,
    /// lexicographically sorted and newline-joined.
    Grouped,
}

/// Fans formatted notifications out to every enabled transport.
pub struct Dispatcher {
    transports: Vec<Box<dyn Transport>>,
    mode: DeliveryMode,
}

impl Dispatcher {
    pub fn new(transports: Vec<Box<dyn Transport>>, mode: DeliveryMode) -> Self {
        Self { transports, mode }
    }

    /// Builds the dispatcher with one transport per enabled settings block,
    /// all sharing one HTTP client with a bounded request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(TRANSPORT_TIMEOUT)
            .build()?;

        let mut transports: Vec<Box<dyn Transport>> = Vec::new();
        if settings.telegram.enabled {
            transports.push(Box::new(Telegram::new(client.clone(), &settings.telegram)));
        }
        if settings.discord.enabled {
            transports.push(Box::new(Discord::new(client.clone(), &settings.discord)));
        }
        if settings.gotify.enabled {
            transports.push(Box::new(Gotify::new(client.clone(), &settings.gotify)));
        }
        if settings.ntfy.enabled {
            transports.push(Box::new(Ntfy::new(client.clone(), &settings.ntfy)));
        }
        if settings.pushbullet.enabled {
            transports.push(Box::new(Pushbullet::new(client, &settings.pushbullet)));
        }

        let mode = if settings.group_events {
            DeliveryMode::Grouped
        } else {
            DeliveryMode::PerEvent
        };
        Ok(Self::new(transports, mode))
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    /// Renders and delivers one class's change events for this poll cycle.
    pub async fn dispatch(&self, host: &str, class: EntityClass, events: &[ChangeEvent]) {
        if events.is_empty() {
            return;
        }
        let title = formatter::header(host, class);
        let mut lines = formatter::render(events);
        match self.mode {
            DeliveryMode::Grouped => {
                // Sorting makes repeated runs over identical change sets
                // produce byte-identical grouped messages.
                lines.sort();
                self.send(&Message::new(title, lines.join("\n"))).await;
            }
            DeliveryMode::PerEvent => {
                for line in lines {
                    self.send(&Message::new(title.clone(), line)).await;
                }
            }
        }
    }

    /// Attempts delivery on every transport; failures are logged and do not
    /// affect the remaining transports.
    pub async fn send(&self, message: &Message) {
        for transport in &self.transports {
            if let Err(err) = transport.send(message).await {
                log::error!(
                    target: "notify",
                    "failed to deliver via {}: {}",
                    transport.name(),
                    err
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::diff::ChangeKind;
    use crate::entity::{EntityRecord, NetworkRecord};

    struct Recording {
        sent: Arc<Mutex<Vec<Message>>>,
    }

    #[async_trait]
    impl Transport for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, message: &Message) -> super::super::Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn send(&self, _message: &Message) -> super::super::Result<()> {
            // Nothing listens on port 1; the connection fails fast.
            reqwest::Client::new()
                .get("http://127.0.0.1:1/")
                .send()
                .await?;
            Ok(())
        }
    }

    fn network_added(name: &str) -> ChangeEvent {
        ChangeEvent {
            class: EntityClass::Network,
            kind: ChangeKind::Added,
            old: None,
            new: Some(EntityRecord::Network(NetworkRecord { name: name.into() })),
        }
    }

    #[tokio::test]
    async fn test_grouped_mode_sends_one_sorted_message() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            vec![Box::new(Recording { sent: sent.clone() })],
            DeliveryMode::Grouped,
        );

        // Same change set, two enumeration orders.
        let forward = [network_added("alpha"), network_added("beta"), network_added("gamma")];
        let reversed = [network_added("gamma"), network_added("beta"), network_added("alpha")];

        dispatcher.dispatch("host", EntityClass::Network, &forward).await;
        dispatcher.dispatch("host", EntityClass::Network, &reversed).await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
        assert_eq!(sent[0].title, "*host* (docker networks)");
        assert_eq!(sent[0].body.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_per_event_mode_sends_one_message_per_event() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            vec![Box::new(Recording { sent: sent.clone() })],
            DeliveryMode::PerEvent,
        );

        dispatcher
            .dispatch(
                "host",
                EntityClass::Network,
                &[network_added("alpha"), network_added("beta")],
            )
            .await;

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|m| m.title == "*host* (docker networks)"));
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_suppress_others() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            vec![
                Box::new(Unreachable),
                Box::new(Recording { sent: sent.clone() }),
            ],
            DeliveryMode::Grouped,
        );

        dispatcher
            .dispatch("host", EntityClass::Network, &[network_added("alpha")])
            .await;

        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_events_sends_nothing() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = Dispatcher::new(
            vec![Box::new(Recording { sent: sent.clone() })],
            DeliveryMode::Grouped,
        );

        dispatcher.dispatch("host", EntityClass::Network, &[]).await;
        assert!(sent.lock().unwrap().is_empty());
    }
}
