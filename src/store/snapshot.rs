use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::record::{Abbreviation, UserAccount};
use crate::store::memory::{MemoryStore, StoreError};

/// On-disk form of a [`MemoryStore`]. Rows are kept in id order so that equal
/// stores produce byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub abbreviations: Vec<Abbreviation>,
    #[serde(default)]
    pub users: Vec<UserAccount>,
}

impl MemoryStore {
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let store = MemoryStore::new();
        for account in snapshot.users {
            store.insert_user(account)?;
        }
        for record in snapshot.abbreviations {
            store.insert(record)?;
        }
        Ok(store)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            abbreviations: self.records(),
            users: self.users(),
        }
    }

    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let f = fs::File::open(path)?;
        let snapshot: StoreSnapshot = serde_json::from_reader(BufReader::new(f))?;
        let store = Self::from_snapshot(snapshot)?;
        info!(
            path = %path.display(),
            abbreviations = store.len(),
            "loaded store snapshot"
        );
        Ok(store)
    }

    /// Write the snapshot next to `path` and rename it into place, so readers
    /// see either the old file or the new one.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        let temp_path = path.with_extension("json.tmp");

        let f = fs::File::create(&temp_path)?;
        let mut writer = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        fs::rename(&temp_path, path)?;
        info!(
            path = %path.display(),
            abbreviations = snapshot.abbreviations.len(),
            "saved store snapshot"
        );
        Ok(())
    }
}
