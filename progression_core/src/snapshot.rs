//! Session snapshots and the persistence seam

use crate::types::{AttributeId, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything needed to rebuild a player's progression state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub pick_counts: BTreeMap<SkillId, u32>,
    #[serde(default)]
    pub ranks: BTreeMap<AttributeId, u32>,
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub points: u32,
}

/// Snapshot persistence error
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access save file: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to encode or decode save data: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Storage used at session boundaries
pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError>;

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<ProgressSnapshot>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, snapshot: &ProgressSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("saves").join("slot1.json"));

        let mut snapshot = ProgressSnapshot {
            level: 4,
            xp: 30,
            points: 1,
            ..Default::default()
        };
        snapshot.pick_counts.insert("firebolt".into(), 2);
        snapshot.ranks.insert(AttributeId::MaxHp, 3);

        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::SerdeError(_))));
    }
}
