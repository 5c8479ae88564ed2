//! Addgame command handler.
//!
//! Records a game in the sender's list. The store checks membership
//! case-insensitively, so re-adding a game under a different casing is
//! reported as already present and leaves the list untouched.

use log::debug;

use crate::commands::markdown_response::{format_added, format_already_present};
use crate::store::{AddOutcome, ProfileStore, StoreBackend, StoreError};

/// Adds a game to the sender's list and formats the outcome.
///
/// # Returns
///
/// * `Ok(String)` - Markdown response describing the outcome
/// * `Err(StoreError)` - The store transaction failed
pub async fn handle_addgame<B: StoreBackend>(
    store: &ProfileStore<B>,
    sender_id: &str,
    game_name: &str,
) -> Result<String, StoreError> {
    debug!("handling addgame command: {} for {}", game_name, sender_id);

    let response = match store.add_game(sender_id, game_name).await? {
        AddOutcome::Added => format_added(game_name),
        AddOutcome::AlreadyPresent => format_already_present(game_name),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreLoader;
    use tempfile::tempdir;

    fn file_store(dir: &tempfile::TempDir) -> ProfileStore<StoreLoader> {
        let path = dir.path().join("games_db.json").to_str().unwrap().to_string();
        ProfileStore::new(StoreLoader::new(path))
    }

    #[tokio::test]
    async fn test_handle_addgame_new_game() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        let response = handle_addgame(&store, "@alice:example.com", "Chess")
            .await
            .unwrap();

        assert_eq!(response, "Added **Chess** to your games list!");
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_handle_addgame_already_present_other_casing() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);

        handle_addgame(&store, "@alice:example.com", "Chess")
            .await
            .unwrap();
        let response = handle_addgame(&store, "@alice:example.com", "CHESS")
            .await
            .unwrap();

        assert_eq!(response, "**CHESS** is already in your list!");
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }

    #[tokio::test]
    async fn test_handle_addgame_corrupt_store_propagates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("games_db.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        let store = ProfileStore::new(StoreLoader::new(path.to_str().unwrap().to_string()));

        let result = handle_addgame(&store, "@alice:example.com", "Chess").await;

        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }
}
