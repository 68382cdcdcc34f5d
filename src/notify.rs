//! Notification rendering and delivery.
//!
//! Change events are rendered into transport-agnostic lines by
//! [`formatter`], then fanned out to every enabled transport by the
//! [`Dispatcher`]. Delivery is best-effort, at most once: a transport
//! failure is logged and never propagates, so one broken endpoint cannot
//! suppress delivery to the others.
//!
//! Rendered text uses single-asterisk emphasis as its canonical markup; each
//! transport adapts that to its own dialect (kept for Telegram, doubled for
//! Discord and Gotify, stripped for ntfy and Pushbullet).

mod discord;
mod dispatcher;
mod error;
pub mod formatter;
mod gotify;
mod ntfy;
mod pushbullet;
mod telegram;
mod transport;

pub use discord::Discord;
pub use dispatcher::{DeliveryMode, Dispatcher};
pub use error::{Error, Result};
pub use gotify::Gotify;
pub use ntfy::Ntfy;
pub use pushbullet::Pushbullet;
pub use telegram::Telegram;
pub use transport::{Message, Transport};
