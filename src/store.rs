//! Persistence of the last-seen snapshot per entity class, surviving process
//! restarts.
//!
//! One JSON file per class under a state directory. Writes go through a
//! temporary file followed by a rename, so process termination mid-write
//! cannot corrupt the previous generation. Absence of a file is not an
//! error; it marks the first run for that class.

use std::path::{Path, PathBuf};

use crate::entity::{EntityClass, Snapshot};

mod error;

pub use error::{Error, Result};

/// Storage for the one-previous snapshot generation per entity class.
pub trait SnapshotStore {
    /// Returns the stored snapshot for `class`, or `None` on first run.
    fn load(&self, class: EntityClass) -> Result<Option<Snapshot>>;

    /// Replaces the stored snapshot for `class` atomically.
    fn save(&self, class: EntityClass, snapshot: &Snapshot) -> Result<()>;
}

/// File-backed [`SnapshotStore`]: `<state_dir>/<class>.json` per class.
#[derive(Debug, Clone)]
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    /// Creates the store, creating `state_dir` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CreateDir`] if the directory cannot be created.
    pub fn new(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir).map_err(|source| Error::CreateDir {
            path: state_dir.clone(),
            source,
        })?;
        Ok(Self { state_dir })
    }

    fn class_path(&self, class: EntityClass) -> PathBuf {
        self.state_dir.join(format!("{}.json", class.label()))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, class: EntityClass) -> Result<Option<Snapshot>> {
        let path = self.class_path(class);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Read { path, source }),
        };
        let snapshot = serde_json::from_str(&raw).map_err(|source| Error::Parse { path, source })?;
        Ok(Some(snapshot))
    }

    fn save(&self, class: EntityClass, snapshot: &Snapshot) -> Result<()> {
        let path = self.class_path(class);
        let raw = serde_json::to_vec(snapshot).map_err(Error::Serialize)?;
        write_atomically(&path, &raw)
    }
}

/// Writes `data` to `path` via a sibling temporary file and a rename.
fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, data).map_err(|source| Error::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ContainerRecord, ContainerStatus, EntityRecord, Health};

    fn sample_snapshot() -> Snapshot {
        [EntityRecord::Container(ContainerRecord {
            name: "web".into(),
            status: ContainerStatus::Running,
            health: Health::Healthy,
            id: "abc123def456".into(),
        })]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_load_before_first_save_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.load(EntityClass::Container).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        let snapshot = sample_snapshot();

        store.save(EntityClass::Container, &snapshot).unwrap();
        let restored = store.load(EntityClass::Container).unwrap().unwrap();
        assert_eq!(restored, snapshot);

        // Other classes are untouched.
        assert!(store.load(EntityClass::Image).unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous_generation() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        store
            .save(EntityClass::Container, &sample_snapshot())
            .unwrap();
        store
            .save(EntityClass::Container, &Snapshot::new())
            .unwrap();

        let restored = store.load(EntityClass::Container).unwrap().unwrap();
        assert!(restored.is_empty());
        // No temporary file left behind after the rename.
        assert!(!dir.path().join("containers.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error_not_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("containers.json"), b"not json").unwrap();

        assert!(store.load(EntityClass::Container).is_err());
    }
}
