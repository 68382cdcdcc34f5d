//! Pure rendering of change events into notification lines.
//!
//! Same inputs always produce the same lines, in input order; the dispatcher
//! sorts before a grouped send. Entity names sit inside emphasis markers and
//! every line ends with an exclamation mark. The status indicator is a
//! colored dot: green for running/recovered, red for removed, orange for
//! caution (non-running additions, unhealthy transitions), yellow for
//! non-container creations.

use crate::diff::{ChangeEvent, ChangeKind};
use crate::entity::{ContainerStatus, EntityClass, EntityRecord, Health};

const GREEN_DOT: &str = "\u{1F7E2}";
const RED_DOT: &str = "\u{1F534}";
const ORANGE_DOT: &str = "\u{1F7E0}";
const YELLOW_DOT: &str = "\u{1F7E1}";

/// The header line: host label plus the entity class in parentheses.
pub fn header(host: &str, class: EntityClass) -> String {
    format!("*{host}* (docker {class})")
}

/// Renders every event, in input order.
pub fn render(events: &[ChangeEvent]) -> Vec<String> {
    events.iter().map(render_event).collect()
}

/// Renders one classified change event as a single notification line.
pub fn render_event(event: &ChangeEvent) -> String {
    match (event.kind, event.record()) {
        (ChangeKind::Added, EntityRecord::Container(c)) => {
            let dot = if c.status == ContainerStatus::Running {
                GREEN_DOT
            } else {
                ORANGE_DOT
            };
            format!("{dot} - *{}* is {}!", c.name, c.status)
        }
        (ChangeKind::Added, record) => {
            format!("{YELLOW_DOT} - {} created!", display(record))
        }
        (ChangeKind::Removed, EntityRecord::Container(c)) => {
            format!("{RED_DOT} - *{}* is inactive!", c.name)
        }
        (ChangeKind::Removed, record) => {
            format!("{RED_DOT} - {} removed!", display(record))
        }
        (ChangeKind::Changed, EntityRecord::Container(c)) => {
            let dot = if c.health == Health::Unhealthy {
                ORANGE_DOT
            } else {
                GREEN_DOT
            };
            format!("{dot} - *{}* is {}!", c.name, c.status_label())
        }
        // The diff engine only emits Changed for containers; stay total.
        (ChangeKind::Changed, record) => {
            format!("{YELLOW_DOT} - {} changed!", display(record))
        }
    }
}

/// The emphasized display form: tagged images carry their short id in a
/// parenthetical suffix, untagged images (display name == id) do not.
fn display(record: &EntityRecord) -> String {
    match record {
        EntityRecord::Image(image) if image.is_tagged() => {
            format!("*{}* ({})", image.name, image.id)
        }
        record => format!("*{}*", record.display_name()),
    }
}
