//! Profile command handler.
//!
//! Displays a user's games list in insertion order. Without a target the
//! sender's own list is shown; a user with no recorded games gets a
//! placeholder message.

use log::debug;

use crate::commands::markdown_response::format_profile;
use crate::store::{ProfileStore, StoreBackend, StoreError};

/// Renders a user's games list.
///
/// # Arguments
///
/// * `store` - The shared games store
/// * `sender_id` - The Matrix user id of the command sender
/// * `target` - Optional Matrix user id to display instead of the sender
///
/// # Returns
///
/// * `Ok(String)` - Markdown response with the games list
/// * `Err(StoreError)` - The store transaction failed
pub async fn handle_profile<B: StoreBackend>(
    store: &ProfileStore<B>,
    sender_id: &str,
    target: Option<&str>,
) -> Result<String, StoreError> {
    let user_id = target.unwrap_or(sender_id);

    debug!("handling profile command for {}", user_id);

    let games = store.list_games(user_id).await?;

    Ok(format_profile(user_id, &games))
}
