//! JSON snapshot persistence for the user roster.
//!
//! The roster is small (one record per user), so the gateway rewrites the
//! whole file on every save. Write-through keeps the on-disk mapping
//! equivalent to memory after every mutation; the engine decides when a
//! failed write is retried.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::SnapshotError;
use crate::roster::{Roster, UserState};

const SNAPSHOT_FILE: &str = "roster.json";

/// On-disk layout: a `users` map keyed by user name. Records are held as raw
/// JSON during load so one malformed record cannot sink the whole snapshot.
#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    users: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    users: BTreeMap<&'a str, &'a UserState>,
}

/// Durable store for the full roster.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Open the store at `~/.config/medkeeper/roster.json`.
    pub fn open() -> Result<Self, SnapshotError> {
        let dir = data_dir().map_err(|e| SnapshotError::DataDir(e.to_string()))?;
        Ok(Self {
            path: dir.join(SNAPSHOT_FILE),
        })
    }

    /// Open the store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the roster. `Ok(None)` when no snapshot exists yet.
    ///
    /// A file that cannot be read or parsed at the top level is an error --
    /// the engine must not run on corrupted state. A single record that
    /// fails to decode inside an otherwise valid snapshot is dropped and
    /// recreated with defaults.
    pub fn load(&self) -> Result<Option<Roster>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| SnapshotError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        let file: SnapshotFile =
            serde_json::from_str(&content).map_err(|e| SnapshotError::LoadFailed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let mut roster = Roster::new();
        for (name, value) in file.users {
            match serde_json::from_value::<UserState>(value) {
                Ok(mut user) => {
                    // The map key is authoritative for identity.
                    if user.name.is_empty() {
                        user.name = name.clone();
                    }
                    roster.insert(user);
                }
                Err(e) => {
                    log::warn!("dropping malformed snapshot record for '{name}': {e}");
                    roster.insert(UserState::new(name));
                }
            }
        }
        Ok(Some(roster))
    }

    /// Write the full roster.
    pub fn save(&self, roster: &Roster) -> Result<(), SnapshotError> {
        let file = SnapshotFileRef {
            users: roster.iter().map(|u| (u.name.as_str(), u)).collect(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, content).map_err(|e| SnapshotError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(())
    }
}
