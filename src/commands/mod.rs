//! Bot command parsing and response formatting.
//!
//! This module provides the complete command processing pipeline for the Ludo bot,
//! enabling Matrix users to record and inspect which games they have played.
//!
//! # Overview
//!
//! The commands module handles the entire lifecycle of bot commands:
//! 1. **Parsing** - Converting Matrix messages into structured [`command::Command`] enums
//! 2. **Validation** - Ensuring commands have correct syntax and valid arguments
//! 3. **Permissions** - Gating bulk commands on the sender's room power level
//! 4. **Execution** - Routing commands to handlers that run store transactions
//! 5. **Response** - Formatting results as Markdown for Matrix display
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + run_command()
//! └─────────────┘
//!      │
//!      ├── parse() ────────────────────┐
//!      │                               ▼
//!      │                   ┌──────────────────┐
//!      │                   │  command::Command│
//!      │                   └──────────────────┘
//!      │
//!      └── run_command() ──────────────┐
//!                                      ▼
//!                        ┌───────────────────────┐
//!                        │ Action Handlers       │
//!                        │  - handle_help        │
//!                        │  - handle_addgame     │
//!                        │  - handle_removegame  │
//!                        │  - handle_profile     │
//!                        │  - handle_bulkadd     │
//!                        │  - handle_bulkremove  │
//!                        └───────────────────────┘
//!                                      │
//!                                      ▼
//!                        ┌───────────────────────┐
//!                        │  ProfileStore         │
//!                        │  (load/mutate/save)   │
//!                        └───────────────────────┘
//! ```
//!
//! # Command Structure
//!
//! All commands follow the format: `!ludo <subcommand> [args...]`
//!
//! ## Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display help information |
//! | `addgame` | `<game name>` | Add a game to your list |
//! | `removegame` | `<game name>` | Remove a game from your list |
//! | `profile` | `[@user:server]` | Show a games list, yours by default |
//! | `bulkadd` | `<@user:server>... <game name>` | Add a game to several lists (moderators) |
//! | `bulkremove` | `<@user:server>... <game name>` | Remove a game from several lists (moderators) |
//!
//! ## Command Details
//!
//! ### Game Names
//!
//! Game names are free text: every word after the subcommand (or after the
//! target users for bulk commands) belongs to the name. Adding checks
//! membership case-insensitively; removing matches exactly.
//!
//! ### Bulk Commands
//!
//! Bulk commands take one or more `@`-prefixed Matrix user ids followed by
//! the game name. They require a room power level of at least 50 and update
//! all targets in one store transaction.
//!
//! # Error Handling
//!
//! The module distinguishes between two error categories:
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): Messages that aren't commands
//!   or are for a different bot. These should not generate responses.
//!
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): Invalid command syntax
//!   or arguments. These include helpful error messages for the user.
//!
//! # Module Organization
//!
//! - [`commander`] - Main orchestrator for parsing and executing commands
//! - [`command`] - Command enum definitions and parsing logic
//! - [`actions`] - Individual command handler implementations
//! - [`markdown_response`] - Response formatting utilities

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::commander::Commander;

/// Runtime context for command execution.
///
/// This structure provides the message metadata needed to execute a command.
/// It's passed to [`Commander::run_command`] alongside the parsed command.
///
/// # Fields
///
/// * `room_id` - Matrix room ID where the command was issued
/// * `sender_id` - Matrix user ID of the user who issued the command
/// * `sender_power_level` - The sender's power level in the room, used to
///   gate bulk commands
///
/// # Examples
///
/// ```
/// # use ludo::commands::CommandContext;
/// let context = CommandContext {
///     room_id: "!room:example.com".to_string(),
///     sender_id: "@user:example.com".to_string(),
///     sender_power_level: 0,
/// };
/// ```
#[derive(Debug)]
pub struct CommandContext {
    /// Matrix room ID where the command was issued
    pub room_id: String,
    /// Matrix user ID of the command issuer
    pub sender_id: String,
    /// Power level of the command issuer in the room
    pub sender_power_level: i64,
}

/// Errors that can occur during command parsing.
///
/// This enum distinguishes between errors that should produce user-facing
/// messages and those that should be silently ignored.
///
/// # Variants
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
///
/// * `InvalidCommand` - Command syntax or arguments are invalid.
///   Contains a user-friendly error message to display.
///
/// # Examples
///
/// ```
/// # use ludo::commands::{Commander, CommandParseError};
/// let commander = Commander::new();
///
/// // Not a command - silent error
/// match commander.parse("Just chatting") {
///     Err(CommandParseError::NotForBot) => {
///         // Don't respond - not a command
///     }
///     _ => {}
/// }
///
/// // Invalid command - send error message
/// match commander.parse("!ludo invalid_cmd") {
///     Err(CommandParseError::InvalidCommand(msg)) => {
///         // Send error message to user
///         println!("Error: {}", msg);
///     }
///     _ => {}
/// }
/// ```
#[derive(Debug)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
