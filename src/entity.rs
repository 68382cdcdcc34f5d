//! Inventory data model: entity classes, per-class records and snapshots.
//!
//! A [`Snapshot`] is the full set of records for one entity class at one poll
//! instant, keyed by identity (container/network name, image/volume short id).
//! Identity is unique within one snapshot; two records with the same identity
//! but different attributes in consecutive snapshots are a state transition,
//! not an add plus a remove.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod container;

pub use container::{ContainerRecord, ContainerStatus, Health, UnknownStatus};

/// The four inventory classes observed on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Container,
    Image,
    Network,
    Volume,
}

impl EntityClass {
    /// All classes, in the order pipelines run and startup counts are listed.
    pub const ALL: [EntityClass; 4] = [
        EntityClass::Container,
        EntityClass::Image,
        EntityClass::Network,
        EntityClass::Volume,
    ];

    /// Plural label used in message headers and store file names.
    pub fn label(&self) -> &'static str {
        match self {
            EntityClass::Container => "containers",
            EntityClass::Image => "images",
            EntityClass::Network => "networks",
            EntityClass::Volume => "volumes",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An image as reported by the engine.
///
/// `name` is the repository component of the first tag; for untagged images it
/// falls back to the short id, so `name == id` marks an untagged image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
}

impl ImageRecord {
    pub fn is_tagged(&self) -> bool {
        self.name != self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub name: String,
}

/// The engine's reported state for one object at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum EntityRecord {
    Container(ContainerRecord),
    Image(ImageRecord),
    Network(NetworkRecord),
    Volume(VolumeRecord),
}

impl EntityRecord {
    /// The unique key distinguishing this record within its snapshot.
    pub fn identity(&self) -> &str {
        match self {
            EntityRecord::Container(c) => &c.name,
            EntityRecord::Image(i) => &i.id,
            EntityRecord::Network(n) => &n.name,
            EntityRecord::Volume(v) => &v.id,
        }
    }

    /// Human-facing name embedded in notification lines.
    pub fn display_name(&self) -> &str {
        match self {
            EntityRecord::Container(c) => &c.name,
            EntityRecord::Image(i) => &i.name,
            EntityRecord::Network(n) => &n.name,
            EntityRecord::Volume(v) => &v.id,
        }
    }
}

/// All records of one entity class at one poll instant, keyed by identity.
///
/// Backed by a `BTreeMap` so enumeration order is deterministic regardless of
/// the order the engine returned the records in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, EntityRecord>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its identity, replacing any previous record.
    pub fn insert(&mut self, record: EntityRecord) {
        self.0.insert(record.identity().to_owned(), record);
    }

    pub fn get(&self, identity: &str) -> Option<&EntityRecord> {
        self.0.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.0.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityRecord)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<EntityRecord> for Snapshot {
    fn from_iter<T: IntoIterator<Item = EntityRecord>>(iter: T) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}
