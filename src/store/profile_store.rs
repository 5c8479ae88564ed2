//! Core store of per-user game lists.
//!
//! This module provides the [`ProfileStore`] which owns the mapping from
//! user id to an ordered list of game names and exposes the add, remove,
//! list and bulk operations behind one transaction lock.

use std::collections::HashSet;

use log::{debug, info};
use tokio::sync::Mutex;

use crate::store::loader::{Profiles, StoreBackend, StoreError};

/// Outcome of [`ProfileStore::add_game`].
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The game was appended to the user's list and the store was saved.
    Added,
    /// The user already has this game under a case-insensitive comparison.
    /// Nothing was written.
    AlreadyPresent,
}

/// Outcome of [`ProfileStore::remove_game`].
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The first exact match was removed and the store was saved.
    Removed,
    /// No exact match in the user's list. Nothing was written.
    NotFound,
}

/// Per-user outcomes of [`ProfileStore::bulk_add`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BulkAddOutcome {
    /// Users whose list gained the game.
    pub added: HashSet<String>,
    /// Users who already had the game (case-insensitive match).
    pub already_had: HashSet<String>,
}

/// Per-user outcomes of [`ProfileStore::bulk_remove`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BulkRemoveOutcome {
    /// Users whose list lost the game.
    pub removed: HashSet<String>,
    /// Users without an exact match for the game.
    pub not_found: HashSet<String>,
}

/// Store of per-user game lists backed by a single persisted file.
///
/// Every operation is one load -> mutate -> save transaction executed under
/// the internal lock, so at most one transaction touches the backing file at
/// a time even when command handlers run concurrently for different users.
/// State is re-read from disk at the start of each transaction; a failed
/// save therefore never leaves stale in-memory state authoritative.
///
/// The store is constructed once at process start and shared by reference
/// with the command handlers. It never formats user-facing text.
///
/// # Examples
///
/// ```no_run
/// # use ludo::store::{AddOutcome, ProfileStore, StoreLoader};
/// # async fn example() {
/// let store = ProfileStore::new(StoreLoader::new("games_db.json".to_string()));
///
/// let outcome = store.add_game("@alice:example.com", "Chess").await.unwrap();
/// assert_eq!(outcome, AddOutcome::Added);
/// # }
/// ```
pub struct ProfileStore<B: StoreBackend> {
    /// Persistence backend, the JSON file loader in production.
    backend: B,
    /// Serializes load -> mutate -> save transactions against the backing file.
    transaction: Mutex<()>,
}

impl<B: StoreBackend> ProfileStore<B> {
    /// Creates a new `ProfileStore` over the given persistence backend.
    pub fn new(backend: B) -> Self {
        ProfileStore {
            backend,
            transaction: Mutex::new(()),
        }
    }

    /// Records a game in the user's list.
    ///
    /// The membership check is case-insensitive, so `"CHESS"` counts as
    /// already present when the list holds `"Chess"`. The name is stored
    /// with the casing the user gave. Nothing is written to disk when the
    /// outcome is [`AddOutcome::AlreadyPresent`].
    pub async fn add_game(&self, user_id: &str, game_name: &str) -> Result<AddOutcome, StoreError> {
        let _guard = self.transaction.lock().await;
        let mut profiles = self.backend.load().await?;

        if !Self::add_to_profile(&mut profiles, user_id, game_name) {
            debug!("{} already has {}", user_id, game_name);
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.backend.persist(&profiles).await?;

        info!("added {} to the list of {}", game_name, user_id);

        Ok(AddOutcome::Added)
    }

    /// Removes the first exact match of the game from the user's list.
    ///
    /// Removal matches exactly, unlike the case-insensitive add check;
    /// removing `"chess"` when the list holds `"Chess"` reports
    /// [`RemoveOutcome::NotFound`]. Nothing is written in that case.
    pub async fn remove_game(
        &self,
        user_id: &str,
        game_name: &str,
    ) -> Result<RemoveOutcome, StoreError> {
        let _guard = self.transaction.lock().await;
        let mut profiles = self.backend.load().await?;

        if !Self::remove_from_profile(&mut profiles, user_id, game_name) {
            debug!("{} does not have {}", user_id, game_name);
            return Ok(RemoveOutcome::NotFound);
        }

        self.backend.persist(&profiles).await?;

        info!("removed {} from the list of {}", game_name, user_id);

        Ok(RemoveOutcome::Removed)
    }

    /// Returns the user's games in insertion order.
    ///
    /// A user absent from the store has an empty list; the two cases are
    /// indistinguishable to callers. Read-only, never writes, but shares
    /// the transaction lock so it always observes a complete snapshot.
    pub async fn list_games(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let _guard = self.transaction.lock().await;
        let profiles = self.backend.load().await?;

        Ok(profiles.get(user_id).cloned().unwrap_or_default())
    }

    /// Records a game for several users in one transaction.
    ///
    /// All users are processed against one shared load and the store is
    /// saved exactly once at the end of the batch, regardless of how many
    /// lists changed.
    pub async fn bulk_add(
        &self,
        user_ids: &[String],
        game_name: &str,
    ) -> Result<BulkAddOutcome, StoreError> {
        let _guard = self.transaction.lock().await;
        let mut profiles = self.backend.load().await?;

        let mut outcome = BulkAddOutcome::default();
        for user_id in user_ids {
            if Self::add_to_profile(&mut profiles, user_id, game_name) {
                outcome.added.insert(user_id.clone());
            } else {
                outcome.already_had.insert(user_id.clone());
            }
        }

        self.backend.persist(&profiles).await?;

        info!(
            "bulk added {} for {} users, {} already had it",
            game_name,
            outcome.added.len(),
            outcome.already_had.len()
        );

        Ok(outcome)
    }

    /// Removes a game from several users in one transaction.
    ///
    /// Uses the same exact-match semantics as [`ProfileStore::remove_game`],
    /// with one shared load and a single save for the whole batch.
    pub async fn bulk_remove(
        &self,
        user_ids: &[String],
        game_name: &str,
    ) -> Result<BulkRemoveOutcome, StoreError> {
        let _guard = self.transaction.lock().await;
        let mut profiles = self.backend.load().await?;

        let mut outcome = BulkRemoveOutcome::default();
        for user_id in user_ids {
            if Self::remove_from_profile(&mut profiles, user_id, game_name) {
                outcome.removed.insert(user_id.clone());
            } else {
                outcome.not_found.insert(user_id.clone());
            }
        }

        self.backend.persist(&profiles).await?;

        info!(
            "bulk removed {} for {} users, {} did not have it",
            game_name,
            outcome.removed.len(),
            outcome.not_found.len()
        );

        Ok(outcome)
    }

    /// Appends the game to the user's list unless an entry matching
    /// case-insensitively already exists. Returns whether the list changed.
    fn add_to_profile(profiles: &mut Profiles, user_id: &str, game_name: &str) -> bool {
        let games = profiles.entry(user_id.to_owned()).or_default();

        let lowered = game_name.to_lowercase();
        if games.iter().any(|g| g.to_lowercase() == lowered) {
            return false;
        }

        games.push(game_name.to_owned());
        true
    }

    /// Removes the first exact match of the game from the user's list.
    /// Returns whether the list changed.
    fn remove_from_profile(profiles: &mut Profiles, user_id: &str, game_name: &str) -> bool {
        let Some(games) = profiles.get_mut(user_id) else {
            return false;
        };

        match games.iter().position(|g| g == game_name) {
            Some(index) => {
                games.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::loader::{MockStoreBackend, StoreLoader};
    use tempfile::tempdir;

    fn file_store(dir: &tempfile::TempDir) -> ProfileStore<StoreLoader> {
        let path = dir.path().join("games_db.json").to_str().unwrap().to_string();
        ProfileStore::new(StoreLoader::new(path))
    }

    #[tokio::test]
    async fn test_add_game_then_list_contains_it_once() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        let outcome = store.add_game("@alice:example.com", "Chess").await.unwrap();

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_game_case_insensitive_duplicate_leaves_list_unchanged() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        store.add_game("@alice:example.com", "Chess").await.unwrap();
        let outcome = store.add_game("@alice:example.com", "CHESS").await.unwrap();

        assert_eq!(outcome, AddOutcome::AlreadyPresent);
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_game_preserves_given_casing() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        store
            .add_game("@alice:example.com", "FaCtOrIo")
            .await
            .unwrap();

        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["FaCtOrIo".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_game_preserves_insertion_order() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        for game in ["Zork", "Asteroids", "Chess"] {
            store.add_game("@alice:example.com", game).await.unwrap();
        }

        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec![
                "Zork".to_string(),
                "Asteroids".to_string(),
                "Chess".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_game_requires_exact_match() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        store.add_game("@alice:example.com", "Chess").await.unwrap();
        let outcome = store
            .remove_game("@alice:example.com", "chess")
            .await
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_remove_game_exact_match_removes_entry() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        store.add_game("@alice:example.com", "Chess").await.unwrap();
        let outcome = store
            .remove_game("@alice:example.com", "Chess")
            .await
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::Removed);
        assert!(store.list_games("@alice:example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_game_unknown_user_reports_not_found() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        let outcome = store
            .remove_game("@ghost:example.com", "Chess")
            .await
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_list_games_unknown_user_is_empty() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        assert!(store.list_games("@ghost:example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_add_splits_added_and_already_had() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        // u1 already has the game under a different casing
        store.add_game("@u1:example.com", "chess").await.unwrap();

        let outcome = store
            .bulk_add(
                &["@u1:example.com".to_string(), "@u2:example.com".to_string()],
                "Chess",
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.added,
            HashSet::from(["@u2:example.com".to_string()])
        );
        assert_eq!(
            outcome.already_had,
            HashSet::from(["@u1:example.com".to_string()])
        );
        assert_eq!(
            store.list_games("@u1:example.com").await.unwrap(),
            vec!["chess".to_string()]
        );
        assert_eq!(
            store.list_games("@u2:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_bulk_add_saves_exactly_once() {
        let mut backend = MockStoreBackend::new();
        backend.expect_load().times(1).returning(|| {
            let mut profiles = Profiles::new();
            profiles.insert("@u1:example.com".to_string(), vec!["Chess".to_string()]);
            Ok(profiles)
        });
        backend
            .expect_persist()
            .times(1)
            .withf(|profiles| {
                profiles.get("@u2:example.com") == Some(&vec!["Chess".to_string()])
            })
            .returning(|_| Ok(()));

        let store = ProfileStore::new(backend);
        let outcome = store
            .bulk_add(
                &["@u1:example.com".to_string(), "@u2:example.com".to_string()],
                "Chess",
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.added,
            HashSet::from(["@u2:example.com".to_string()])
        );
        assert_eq!(
            outcome.already_had,
            HashSet::from(["@u1:example.com".to_string()])
        );
    }

    #[tokio::test]
    async fn test_bulk_add_empty_targets_yields_empty_outcome() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        let outcome = store.bulk_add(&[], "Chess").await.unwrap();

        assert!(outcome.added.is_empty());
        assert!(outcome.already_had.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_remove_splits_removed_and_not_found() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        store.add_game("@u1:example.com", "Chess").await.unwrap();
        // Exact-match semantics: a casing mismatch counts as not found
        store.add_game("@u2:example.com", "chess").await.unwrap();

        let outcome = store
            .bulk_remove(
                &[
                    "@u1:example.com".to_string(),
                    "@u2:example.com".to_string(),
                    "@u3:example.com".to_string(),
                ],
                "Chess",
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.removed,
            HashSet::from(["@u1:example.com".to_string()])
        );
        assert_eq!(
            outcome.not_found,
            HashSet::from([
                "@u2:example.com".to_string(),
                "@u3:example.com".to_string()
            ])
        );
        assert!(store.list_games("@u1:example.com").await.unwrap().is_empty());
        assert_eq!(
            store.list_games("@u2:example.com").await.unwrap(),
            vec!["chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_bulk_remove_saves_exactly_once() {
        let mut backend = MockStoreBackend::new();
        backend.expect_load().times(1).returning(|| {
            let mut profiles = Profiles::new();
            profiles.insert("@u1:example.com".to_string(), vec!["Chess".to_string()]);
            Ok(profiles)
        });
        backend.expect_persist().times(1).returning(|_| Ok(()));

        let store = ProfileStore::new(backend);
        store
            .bulk_remove(
                &["@u1:example.com".to_string(), "@u2:example.com".to_string()],
                "Chess",
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_game_does_not_save_when_already_present() {
        let mut backend = MockStoreBackend::new();
        backend.expect_load().times(1).returning(|| {
            let mut profiles = Profiles::new();
            profiles.insert("@alice:example.com".to_string(), vec!["Chess".to_string()]);
            Ok(profiles)
        });
        backend.expect_persist().never();

        let store = ProfileStore::new(backend);
        let outcome = store.add_game("@alice:example.com", "chess").await.unwrap();

        assert_eq!(outcome, AddOutcome::AlreadyPresent);
    }

    #[tokio::test]
    async fn test_remove_game_does_not_save_when_not_found() {
        let mut backend = MockStoreBackend::new();
        backend
            .expect_load()
            .times(1)
            .returning(|| Ok(Profiles::new()));
        backend.expect_persist().never();

        let store = ProfileStore::new(backend);
        let outcome = store
            .remove_game("@alice:example.com", "Chess")
            .await
            .unwrap();

        assert_eq!(outcome, RemoveOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_failed_save_is_propagated() {
        let mut backend = MockStoreBackend::new();
        backend
            .expect_load()
            .returning(|| Ok(Profiles::new()));
        backend.expect_persist().returning(|_| {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        });

        let store = ProfileStore::new(backend);
        let result = store.add_game("@alice:example.com", "Chess").await;

        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_failed_save_does_not_leave_stale_memory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("games_db.json").to_str().unwrap().to_string();

        // First store writes through a backend that fails to persist
        let mut backend = MockStoreBackend::new();
        backend.expect_load().returning(|| Ok(Profiles::new()));
        backend.expect_persist().returning(|_| {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        });
        let failing_store = ProfileStore::new(backend);
        assert!(failing_store
            .add_game("@alice:example.com", "Chess")
            .await
            .is_err());

        // A store over the real file sees the disk state, not the lost write
        let store = ProfileStore::new(StoreLoader::new(path));
        assert!(store.list_games("@alice:example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_store_aborts_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("games_db.json").to_str().unwrap().to_string();
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = ProfileStore::new(StoreLoader::new(path.clone()));
        let result = store.add_game("@alice:example.com", "Chess").await;

        assert!(matches!(result, Err(StoreError::Corrupt(_))));
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "not json");
    }

    #[tokio::test]
    async fn test_concurrent_adds_for_distinct_users_all_survive() {
        let dir = tempdir().unwrap();
        let store = Arc::new(file_store(&dir));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .add_game(&format!("@user{}:example.com", i), "Chess")
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), AddOutcome::Added);
        }

        for i in 0..16 {
            assert_eq!(
                store
                    .list_games(&format!("@user{}:example.com", i))
                    .await
                    .unwrap(),
                vec!["Chess".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_example_scenario_end_to_end() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        assert_eq!(
            store.add_game("@42:example.com", "Chess").await.unwrap(),
            AddOutcome::Added
        );
        assert_eq!(
            store.list_games("@42:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
        assert_eq!(
            store.add_game("@42:example.com", "CHESS").await.unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(
            store.remove_game("@42:example.com", "Chess").await.unwrap(),
            RemoveOutcome::Removed
        );
        assert!(store.list_games("@42:example.com").await.unwrap().is_empty());
    }
}
