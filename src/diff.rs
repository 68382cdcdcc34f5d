//! The diff engine: compares two snapshots of one entity class and produces
//! classified change events.
//!
//! Classification of additions versus removals uses a size-comparison
//! heuristic inherited from the original monitor: a snapshot that grew (or
//! stayed the same size) reports its new identities as added, a snapshot that
//! shrank reports its missing identities as removed. The heuristic lives in
//! [`bulk_classification`] so a precise symmetric strategy can replace it
//! without touching callers.
//!
//! Containers additionally get a state-transition scan: identities present in
//! both snapshots whose record differs yield a `Changed` event, except while
//! the engine reports the health check as `starting` (transitional, not yet
//! meaningful).

use std::collections::BTreeSet;

use crate::entity::{EntityClass, EntityRecord, Health, Snapshot};

/// How a diff classified one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// One classified change between two consecutive snapshots.
///
/// `Removed` events carry the last-known record (`old`) since the engine can
/// no longer be queried for a removed object; `Added` events carry `new`;
/// `Changed` events carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub class: EntityClass,
    pub kind: ChangeKind,
    pub old: Option<EntityRecord>,
    pub new: Option<EntityRecord>,
}

impl ChangeEvent {
    /// The record the event should be rendered from: the new state where one
    /// exists, the last-known state for removals.
    pub fn record(&self) -> &EntityRecord {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .expect("change event carries at least one record")
    }

    pub fn identity(&self) -> &str {
        self.record().identity()
    }
}

/// Which side of the diff gets reported in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BulkClassification {
    Added,
    Removed,
}

/// The inherited size-comparison strategy: growth (or equal size) implies
/// creation, shrinkage implies removal. Identities present in both snapshots
/// with differing attributes are handled separately regardless of this
/// choice.
fn bulk_classification(old: &Snapshot, new: &Snapshot) -> BulkClassification {
    if new.len() >= old.len() {
        BulkClassification::Added
    } else {
        BulkClassification::Removed
    }
}

/// Computes the classified change set between two snapshots of one class.
///
/// Order-independent on input; output follows the snapshots' identity order.
/// Diffing a snapshot against itself yields no events. First-run seeding
/// (no prior snapshot at all) is the caller's concern, not the diff's.
pub fn diff(class: EntityClass, old: &Snapshot, new: &Snapshot) -> Vec<ChangeEvent> {
    let old_ids: BTreeSet<&str> = old.identities().collect();
    let new_ids: BTreeSet<&str> = new.identities().collect();

    let mut events = Vec::new();

    match bulk_classification(old, new) {
        BulkClassification::Added => {
            for &identity in new_ids.difference(&old_ids) {
                let record = new.get(identity).expect("identity taken from new snapshot");
                events.push(ChangeEvent {
                    class,
                    kind: ChangeKind::Added,
                    old: None,
                    new: Some(record.clone()),
                });
            }
        }
        BulkClassification::Removed => {
            for &identity in old_ids.difference(&new_ids) {
                let record = old.get(identity).expect("identity taken from old snapshot");
                events.push(ChangeEvent {
                    class,
                    kind: ChangeKind::Removed,
                    old: Some(record.clone()),
                    new: None,
                });
            }
        }
    }

    if class == EntityClass::Container {
        events.extend(container_transitions(class, old, new));
    }

    events
}

/// Scans identities present in both snapshots for container state
/// transitions. A record whose new health is `starting` is suppressed.
fn container_transitions(
    class: EntityClass,
    old: &Snapshot,
    new: &Snapshot,
) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    for (identity, new_record) in new.iter() {
        let Some(old_record) = old.get(identity) else {
            continue;
        };
        if old_record == new_record {
            continue;
        }
        if let EntityRecord::Container(c) = new_record
            && c.health == Health::Starting
        {
            continue;
        }
        events.push(ChangeEvent {
            class,
            kind: ChangeKind::Changed,
            old: Some(old_record.clone()),
            new: Some(new_record.clone()),
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ContainerRecord, ContainerStatus, NetworkRecord};

    fn container(name: &str, status: ContainerStatus, health: Health) -> EntityRecord {
        EntityRecord::Container(ContainerRecord {
            name: name.into(),
            status,
            health,
            id: "abc123def456".into(),
        })
    }

    fn containers(records: &[EntityRecord]) -> Snapshot {
        records.iter().cloned().collect()
    }

    #[test]
    fn test_self_diff_is_empty() {
        let snapshot = containers(&[
            container("web", ContainerStatus::Running, Health::Healthy),
            container("db", ContainerStatus::Exited, Health::None),
        ]);
        assert!(diff(EntityClass::Container, &snapshot, &snapshot).is_empty());

        let empty = Snapshot::new();
        assert!(diff(EntityClass::Volume, &empty, &empty).is_empty());
    }

    #[test]
    fn test_single_addition() {
        let old = containers(&[container("web", ContainerStatus::Running, Health::None)]);
        let new = containers(&[
            container("web", ContainerStatus::Running, Health::None),
            container("worker", ContainerStatus::Running, Health::None),
        ]);

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Added);
        assert_eq!(events[0].identity(), "worker");
        assert!(events[0].old.is_none());
    }

    #[test]
    fn test_single_removal_carries_last_known_record() {
        let old = containers(&[
            container("web", ContainerStatus::Running, Health::None),
            container("worker", ContainerStatus::Paused, Health::None),
        ]);
        let new = containers(&[container("web", ContainerStatus::Running, Health::None)]);

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Removed);
        assert_eq!(events[0].identity(), "worker");
        // Last-known attributes, not a fresh lookup.
        assert_eq!(
            events[0].old,
            Some(container("worker", ContainerStatus::Paused, Health::None))
        );
        assert!(events[0].new.is_none());
    }

    #[test]
    fn test_removal_of_everything() {
        let old = containers(&[container("web", ContainerStatus::Running, Health::Healthy)]);
        let new = Snapshot::new();

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Removed);
        assert_eq!(events[0].identity(), "web");
    }

    #[test]
    fn test_health_transition_is_changed_not_add_remove() {
        let old = containers(&[container("api", ContainerStatus::Running, Health::Healthy)]);
        let new = containers(&[container("api", ContainerStatus::Running, Health::Unhealthy)]);

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Changed);
        assert_eq!(events[0].identity(), "api");
        let EntityRecord::Container(c) = events[0].record() else {
            panic!("expected container record");
        };
        assert_eq!(c.health, Health::Unhealthy);
    }

    #[test]
    fn test_lifecycle_transition_is_changed() {
        let old = containers(&[container("api", ContainerStatus::Running, Health::None)]);
        let new = containers(&[container("api", ContainerStatus::Exited, Health::None)]);

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_starting_health_is_suppressed() {
        let old = containers(&[container("api", ContainerStatus::Created, Health::None)]);
        // Both the health and the lifecycle status changed, but health is
        // still starting: no event yet.
        let new = containers(&[container("api", ContainerStatus::Running, Health::Starting)]);

        assert!(diff(EntityClass::Container, &old, &new).is_empty());

        // Once the check settles the transition fires against the old state.
        let settled = containers(&[container("api", ContainerStatus::Running, Health::Healthy)]);
        let events = diff(EntityClass::Container, &old, &settled);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn test_non_container_classes_skip_transition_scan() {
        let old: Snapshot = [EntityRecord::Network(NetworkRecord {
            name: "bridge".into(),
        })]
        .into_iter()
        .collect();
        let new: Snapshot = [
            EntityRecord::Network(NetworkRecord {
                name: "bridge".into(),
            }),
            EntityRecord::Network(NetworkRecord {
                name: "backend".into(),
            }),
        ]
        .into_iter()
        .collect();

        let events = diff(EntityClass::Network, &old, &new);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Added);
        assert_eq!(events[0].identity(), "backend");
    }

    #[test]
    fn test_shrink_with_swap_reports_only_removals() {
        // Two containers gone, one new: the snapshot shrank, so the size
        // heuristic reports the removals and drops the addition.
        let old = containers(&[
            container("a", ContainerStatus::Running, Health::None),
            container("b", ContainerStatus::Running, Health::None),
            container("c", ContainerStatus::Running, Health::None),
        ]);
        let new = containers(&[
            container("a", ContainerStatus::Running, Health::None),
            container("d", ContainerStatus::Running, Health::None),
        ]);

        let events = diff(EntityClass::Container, &old, &new);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == ChangeKind::Removed));
        let ids: Vec<&str> = events.iter().map(ChangeEvent::identity).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
