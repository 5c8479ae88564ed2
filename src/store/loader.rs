//! Persistence layer for the games store.
//!
//! This module provides the [`StoreLoader`] for reading and writing the
//! backing JSON file that maps user ids to their list of recorded games.
//! Saves are written to a temporary sibling file and renamed into place, so
//! a concurrent reader never observes a truncated or half-written store.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;

use log::{debug, warn};
use mockall::automock;
use tokio::fs;

/// The full persisted mapping of user ids to their recorded games.
///
/// The order of each games list is the insertion order and is preserved
/// across save/load cycles.
pub type Profiles = HashMap<String, Vec<String>>;

/// Errors raised by the store persistence layer.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file exists but is not parseable as the expected
    /// structure. The file is left untouched so no data is destroyed.
    Corrupt(serde_json::Error),
    /// Reading or writing the backing file failed.
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Corrupt(e) => write!(f, "corrupt games store: {}", e),
            StoreError::Io(e) => write!(f, "games store i/o failure: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Trait for loading and persisting the games store.
///
/// This trait abstracts the file operations for easier testing with mocks.
#[automock]
pub trait StoreBackend {
    /// Loads the full mapping. A missing backing file yields an empty mapping.
    async fn load(&self) -> Result<Profiles, StoreError>;
    /// Overwrites the backing file with the full mapping.
    async fn persist(&self, profiles: &Profiles) -> Result<(), StoreError>;
}

/// JSON file implementation of [`StoreBackend`].
///
/// # Examples
///
/// ```no_run
/// # use ludo::store::{StoreBackend, StoreLoader};
/// # async fn example() {
/// let loader = StoreLoader::new("games_db.json".to_string());
///
/// let mut profiles = loader.load().await.unwrap();
/// // ... modify profiles ...
/// loader.persist(&profiles).await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct StoreLoader {
    /// Path to the JSON file where the store lives.
    path: String,
}

impl StoreLoader {
    /// Creates a new `StoreLoader` for the specified file path.
    pub fn new(path: String) -> Self {
        StoreLoader { path }
    }

    /// Path of the temporary sibling file used for atomic replacement.
    ///
    /// Lives in the same directory as the backing file so the rename stays
    /// on one filesystem.
    fn tmp_path(&self) -> String {
        format!("{}.tmp", self.path)
    }
}

impl StoreBackend for StoreLoader {
    /// Loads the store from disk.
    ///
    /// A missing file is not an error and yields an empty mapping. A file
    /// that exists but cannot be deserialized yields [`StoreError::Corrupt`]
    /// rather than an empty mapping, otherwise the next save would silently
    /// wipe whatever the file contained.
    async fn load(&self) -> Result<Profiles, StoreError> {
        let serialized = match fs::read_to_string(&self.path).await {
            Ok(serialized) => serialized,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("no persisted games store found, starting with an empty one");
                return Ok(Profiles::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let profiles = serde_json::from_str(&serialized).map_err(StoreError::Corrupt)?;

        debug!("loaded games store from {}", self.path);

        Ok(profiles)
    }

    /// Persists the full mapping to disk.
    ///
    /// The snapshot is written to `<path>.tmp` and renamed onto the backing
    /// path. Readers observe either the previous or the new snapshot, never
    /// a partial write.
    async fn persist(&self, profiles: &Profiles) -> Result<(), StoreError> {
        let serialized =
            serde_json::to_string_pretty(profiles).map_err(|e| StoreError::Io(e.into()))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &serialized)
            .await
            .map_err(StoreError::Io)?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(StoreError::Io)?;

        debug!("persisted games store to {}", self.path);

        Ok(())
    }
}
