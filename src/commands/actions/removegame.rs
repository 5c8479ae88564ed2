//! Removegame command handler.
//!
//! Removes a game from the sender's list. Removal matches exactly, so the
//! name must be spelled with the same casing it was recorded with.

use log::debug;

use crate::commands::markdown_response::{format_not_found, format_removed};
use crate::store::{ProfileStore, RemoveOutcome, StoreBackend, StoreError};

/// Removes a game from the sender's list and formats the outcome.
///
/// # Returns
///
/// * `Ok(String)` - Markdown response describing the outcome
/// * `Err(StoreError)` - The store transaction failed
pub async fn handle_removegame<B: StoreBackend>(
    store: &ProfileStore<B>,
    sender_id: &str,
    game_name: &str,
) -> Result<String, StoreError> {
    debug!(
        "handling removegame command: {} for {}",
        game_name, sender_id
    );

    let response = match store.remove_game(sender_id, game_name).await? {
        RemoveOutcome::Removed => format_removed(game_name),
        RemoveOutcome::NotFound => format_not_found(game_name),
    };

    Ok(response)
}
