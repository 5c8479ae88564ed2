//! Bulkremove command handler.
//!
//! Removes a game from several users' lists in one store transaction, with
//! the same exact-match semantics as the single removegame command.

use log::debug;

use crate::commands::markdown_response::format_bulk_remove;
use crate::store::{ProfileStore, StoreBackend, StoreError};

/// Removes a game from every target's list and formats the outcome.
///
/// # Returns
///
/// * `Ok(String)` - Markdown response listing who lost the game and who did
///   not have it
/// * `Err(StoreError)` - The store transaction failed
pub async fn handle_bulkremove<B: StoreBackend>(
    store: &ProfileStore<B>,
    user_ids: &[String],
    game_name: &str,
) -> Result<String, StoreError> {
    debug!(
        "handling bulkremove command: {} for {} users",
        game_name,
        user_ids.len()
    );

    let outcome = store.bulk_remove(user_ids, game_name).await?;

    Ok(format_bulk_remove(game_name, &outcome))
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
    async fn test_handle_bulkremove_mixed_outcome() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);
        store.add_game("@alice:example.com", "Chess").await.unwrap();

        let response = handle_bulkremove(
            &store,
            &[
                "@alice:example.com".to_string(),
                "@bob:example.com".to_string(),
            ],
            "Chess",
        )
        .await
        .unwrap();

        assert_eq!(
            response,
            "**Games updated for 2 members:**\n✅ Removed **Chess** from: @alice:example.com\n⚠️ **Chess** was not found for: @bob:example.com"
        );
        assert!(store.list_games("@alice:example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handle_bulkremove_exact_match_only() {
        let dir = tempdir().unwrap();
        let store = file_store(&dir);
        store.add_game("@alice:example.com", "Chess").await.unwrap();

        let response = handle_bulkremove(&store, &["@alice:example.com".to_string()], "chess")
            .await
            .unwrap();

        assert_eq!(
            response,
            "**Games updated for 1 members:**\n⚠️ **chess** was not found for: @alice:example.com"
        );
        assert_eq!(
            store.list_games("@alice:example.com").await.unwrap(),
            vec!["Chess".to_string()]
        );
    }
}
