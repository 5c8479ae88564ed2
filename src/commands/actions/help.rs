//! Help command handler.
//!
//! Displays help information including all available commands, their syntax,
//! and a brief description of the bot's functionality.
//!
//! This is a stateless command that always returns the same help message.

use log::debug;

use crate::commands::markdown_response::format_help;

/// Returns formatted help information about available commands.
///
/// Generates a Markdown-formatted message listing all bot commands with syntax
/// and usage information. This command is read-only and doesn't touch the store.
pub fn handle_help() -> String {
    debug!("handling help command");

    format_help()
}
