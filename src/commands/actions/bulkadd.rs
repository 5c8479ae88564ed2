//! Bulkadd command handler.
//!
//! Adds a game to several users' lists in one store transaction. The
//! permission gate lives in the commander; this handler only runs the
//! batch and formats its outcome.

use log::debug;

use crate::commands::markdown_response::format_bulk_add;
use crate::store::{ProfileStore, StoreBackend, StoreError};

/// Adds a game to every target's list and formats the outcome.
///
/// The whole batch runs against one shared load and a single save, so a
/// partial write of the batch is never observable.
///
/// # Returns
///
/// * `Ok(String)` - Markdown response listing who gained the game and who
///   already had it
/// * `Err(StoreError)` - The store transaction failed
pub async fn handle_bulkadd<B: StoreBackend>(
    store: &ProfileStore<B>,
    user_ids: &[String],
    game_name: &str,
) -> Result<String, StoreError> {
    debug!(
        "handling bulkadd command: {} for {} users",
        game_name,
        user_ids.len()
    );

    let outcome = store.bulk_add(user_ids, game_name).await?;

    Ok(format_bulk_add(game_name, &outcome))
}
