//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Markdown format
//! for display in Matrix chat rooms. All user-facing text for the bot lives
//! here; the store layer never formats messages itself.

use crate::store::{BulkAddOutcome, BulkRemoveOutcome};

/// Formats the help message showing available bot commands.
///
/// Returns a comprehensive help message listing all available commands,
/// their usage syntax, and a brief description of the bot's functionality.
///
/// # Returns
///
/// A Markdown-formatted string containing the help message.
///
/// # Examples
///
/// ```
/// # use ludo::commands::markdown_response::format_help;
/// let help = format_help();
/// assert!(help.contains("Commands:"));
/// ```
pub fn format_help() -> String {
    let body = "Commands:\n\
        - `addgame <game name>`: add a game to your games list\n\
        - `removegame <game name>`: remove a game from your games list\n\
        - `profile [@user:server]`: show a games list, yours by default\n\
        - `bulkadd <@user:server>... <game name>`: add a game to several lists (moderators only)\n\
        - `bulkremove <@user:server>... <game name>`: remove a game from several lists (moderators only)\n\
        - `help`: show this help message\n\n\
        Games are recorded per user, keeping the order you added them in.";

    body.to_owned()
}

/// Formats a response for an unknown command.
///
/// # Returns
///
/// A Markdown-formatted string for unknown command errors.
///
/// # Examples
///
/// ```
/// # use ludo::commands::markdown_response::format_unknown_command;
/// let msg = format_unknown_command();
/// assert!(msg.contains("Unknown command"));
/// ```
pub fn format_unknown_command() -> String {
    "Unknown command. Type `!ludo help` for more information.".to_owned()
}

/// Formats an error response for invalid addgame command syntax.
pub fn format_invalid_addgame() -> String {
    "Invalid addgame command. Usage: `!ludo addgame <game name>`".to_owned()
}

/// Formats an error response for invalid removegame command syntax.
pub fn format_invalid_removegame() -> String {
    "Invalid removegame command. Usage: `!ludo removegame <game name>`".to_owned()
}

/// Formats an error response for invalid profile command syntax.
///
/// Returned when the profile target is not a Matrix user id.
pub fn format_invalid_profile() -> String {
    "Invalid profile command. Usage: `!ludo profile [@user:server]`".to_owned()
}

/// Formats an error response for invalid bulkadd command syntax.
pub fn format_invalid_bulkadd() -> String {
    "Invalid bulkadd command. Usage: `!ludo bulkadd <@user:server>... <game name>`".to_owned()
}

/// Formats an error response for invalid bulkremove command syntax.
pub fn format_invalid_bulkremove() -> String {
    "Invalid bulkremove command. Usage: `!ludo bulkremove <@user:server>... <game name>`"
        .to_owned()
}

/// Formats a success response after a game was added to the sender's list.
///
/// # Examples
///
/// ```
/// # use ludo::commands::markdown_response::format_added;
/// let msg = format_added("Chess");
/// assert!(msg.contains("Chess"));
/// ```
pub fn format_added(game_name: &str) -> String {
    format!("Added **{}** to your games list!", game_name)
}

/// Formats a response when the game is already in the sender's list.
pub fn format_already_present(game_name: &str) -> String {
    format!("**{}** is already in your list!", game_name)
}

/// Formats a success response after a game was removed from the sender's list.
pub fn format_removed(game_name: &str) -> String {
    format!("Removed **{}** from your games list!", game_name)
}

/// Formats a response when the game is not in the sender's list.
///
/// Also returned when the list holds the game under a different casing,
/// since removal matches exactly.
pub fn format_not_found(game_name: &str) -> String {
    format!("**{}** is not in your list.", game_name)
}

/// Formats a user's games list.
///
/// Displays the list as a titled Markdown bullet list in insertion order,
/// or a placeholder message when the user has no recorded games.
///
/// # Arguments
///
/// * `user_id` - The Matrix user id whose list is displayed
/// * `games` - The user's games in insertion order
///
/// # Examples
///
/// ```
/// # use ludo::commands::markdown_response::format_profile;
/// let output = format_profile("@alice:example.com", &[]);
/// assert!(output.contains("has not added any games yet"));
/// ```
pub fn format_profile(user_id: &str, games: &[String]) -> String {
    if games.is_empty() {
        return format!("**{}** has not added any games yet.", user_id);
    }

    let games_md = games
        .iter()
        .map(|game| format!("- {}", game))
        .collect::<Vec<String>>()
        .join("\n");

    format!("**{}'s Game History**\n\n{}", user_id, games_md)
}

/// Formats the outcome of a bulk add.
///
/// Shows how many members were processed, who gained the game, and who
/// already had it. Member lists are sorted for a stable rendering.
///
/// # Examples
///
/// ```
/// # use ludo::commands::markdown_response::format_bulk_add;
/// # use ludo::store::BulkAddOutcome;
/// let outcome = BulkAddOutcome::default();
/// let msg = format_bulk_add("Chess", &outcome);
/// assert!(msg.contains("0 members"));
/// ```
pub fn format_bulk_add(game_name: &str, outcome: &BulkAddOutcome) -> String {
    let mut response = format!(
        "**Games updated for {} members:**\n",
        outcome.added.len() + outcome.already_had.len()
    );

    if !outcome.added.is_empty() {
        response += format!(
            "✅ Added **{}** to: {}\n",
            game_name,
            sorted_list(&outcome.added)
        )
        .as_str();
    }

    if !outcome.already_had.is_empty() {
        response += format!(
            "⚠️ **{}** was already in the list for: {}",
            game_name,
            sorted_list(&outcome.already_had)
        )
        .as_str();
    }

    response
}

/// Formats the outcome of a bulk remove.
///
/// Symmetric to [`format_bulk_add`], listing who lost the game and who did
/// not have an exact match for it.
pub fn format_bulk_remove(game_name: &str, outcome: &BulkRemoveOutcome) -> String {
    let mut response = format!(
        "**Games updated for {} members:**\n",
        outcome.removed.len() + outcome.not_found.len()
    );

    if !outcome.removed.is_empty() {
        response += format!(
            "✅ Removed **{}** from: {}\n",
            game_name,
            sorted_list(&outcome.removed)
        )
        .as_str();
    }

    if !outcome.not_found.is_empty() {
        response += format!(
            "⚠️ **{}** was not found for: {}",
            game_name,
            sorted_list(&outcome.not_found)
        )
        .as_str();
    }

    response
}

/// Formats a response when the sender lacks the power level for bulk commands.
pub fn format_not_allowed() -> String {
    "You need to be a room moderator to use bulk commands.".to_owned()
}

/// Formats an error message for a failed store transaction.
///
/// Returned when loading or saving the backing file fails. The detailed
/// cause is logged, not exposed to the room.
pub fn format_store_failure() -> String {
    "Could not update the games list, please try again later.".to_owned()
}

/// Renders a set of user ids as a sorted comma-separated list.
fn sorted_list(user_ids: &std::collections::HashSet<String>) -> String {
    let mut ids: Vec<&str> = user_ids.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.join(", ")
}
