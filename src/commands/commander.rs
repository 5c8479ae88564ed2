//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates command parsing and execution, routing
//! commands to their appropriate handlers.
//!
//! # Architecture
//!
//! The Commander follows a two-phase processing model:
//!
//! 1. **Parsing Phase** - Validates and parses raw message text into structured [`Command`] enums
//! 2. **Execution Phase** - Gates bulk commands on the sender's power level, then routes
//!    commands to handlers that run store transactions and produce Markdown responses
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → run_command() → Markdown response
//! ```

use command_parser::Parser;
use log::{error, warn};

use crate::commands::{
    CommandContext, CommandParseError,
    actions::{
        handle_addgame, handle_bulkadd, handle_bulkremove, handle_help, handle_profile,
        handle_removegame,
    },
    command::{Command, format_command_error},
    markdown_response::{format_not_allowed, format_store_failure},
};
use crate::store::{ProfileStore, StoreBackend};

/// Minimum room power level required for bulk commands.
///
/// Matches the default Matrix moderator level.
pub const MODERATOR_POWER_LEVEL: i64 = 50;

/// Command orchestrator for parsing and executing bot commands.
///
/// The Commander is responsible for:
/// - Parsing raw message text into structured commands
/// - Validating command syntax and arguments
/// - Gating bulk commands on the sender's room power level
/// - Routing commands to appropriate handlers
/// - Converting errors into user-friendly messages
///
/// # Command Prefix
///
/// All commands must start with the `!ludo` prefix. Messages without this prefix
/// are silently ignored (returning [`CommandParseError::NotForBot`]).
///
/// # Supported Commands
///
/// - `help` - Display help information
/// - `addgame <game name>` - Add a game to the sender's list
/// - `removegame <game name>` - Remove a game from the sender's list
/// - `profile [@user:server]` - Show a games list, the sender's by default
/// - `bulkadd <@user:server>... <game name>` - Add a game to several lists (moderators)
/// - `bulkremove <@user:server>... <game name>` - Remove a game from several lists (moderators)
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
}

impl Commander {
    /// Creates a new Commander instance with a configured command parser.
    ///
    /// The parser is configured to recognize commands starting with `!` as the command
    /// prefix and `-` as the option prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ludo::commands::Commander;
    /// let commander = Commander::new();
    /// ```
    pub fn new() -> Self {
        let parser = Parser::new('!', '-');
        Commander { parser }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// This method validates that the message is:
    /// 1. A valid command format (starts with `!`)
    /// 2. Directed at this bot (uses `ludo` as the command name)
    /// 3. Contains valid syntax and arguments
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed and validated command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or for a different bot
    /// * `Err(CommandParseError::InvalidCommand)` - Command syntax is invalid
    ///
    /// # Error Handling
    ///
    /// - Non-command messages return `NotForBot` to avoid responding to regular chat
    /// - Invalid command syntax returns `InvalidCommand` with a user-friendly error message
    /// - Commands for other bots (e.g., `!other_bot`) return `NotForBot`
    ///
    /// # Examples
    ///
    /// ```
    /// # use ludo::commands::Commander;
    /// let commander = Commander::new();
    ///
    /// // Valid command
    /// let result = commander.parse("!ludo help");
    /// assert!(result.is_ok());
    ///
    /// // Not a command
    /// let result = commander.parse("Hello, world!");
    /// assert!(result.is_err());
    /// ```
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        let parse_result = Command::parse(&self.parser, body);

        // Raise an error message if the command is invalid
        if parse_result.is_err() {
            let error = parse_result.err().unwrap();
            // Return silently if the command is not for the bot
            // Otherwise, send an error message
            if let Some(message) = format_command_error(error) {
                return Err(CommandParseError::InvalidCommand(message));
            }
            return Err(CommandParseError::NotForBot);
        }

        Ok(parse_result.unwrap())
    }

    /// Executes a parsed command against the store and returns the response.
    ///
    /// Bulk commands are gated on the sender's room power level: senders below
    /// [`MODERATOR_POWER_LEVEL`] get a refusal without any store access. Store
    /// failures are logged here and replaced with one generic error reply, so
    /// handlers never expose internal error details to the room.
    ///
    /// # Arguments
    ///
    /// * `command` - The parsed command to execute
    /// * `context` - Runtime context with the room id, the sender id, and the
    ///   sender's room power level
    /// * `store` - The shared games store
    ///
    /// # Returns
    ///
    /// The Markdown response to send back to the room.
    pub async fn run_command<B: StoreBackend>(
        &self,
        command: &Command,
        context: &CommandContext,
        store: &ProfileStore<B>,
    ) -> String {
        let result = match command {
            Command::Help => return handle_help(),
            Command::AddGame(game_name) => {
                handle_addgame(store, &context.sender_id, game_name).await
            }
            Command::RemoveGame(game_name) => {
                handle_removegame(store, &context.sender_id, game_name).await
            }
            Command::Profile(target) => {
                handle_profile(store, &context.sender_id, target.as_deref()).await
            }
            Command::BulkAdd(user_ids, game_name) => {
                if !self.is_moderator(context) {
                    return format_not_allowed();
                }
                handle_bulkadd(store, user_ids, game_name).await
            }
            Command::BulkRemove(user_ids, game_name) => {
                if !self.is_moderator(context) {
                    return format_not_allowed();
                }
                handle_bulkremove(store, user_ids, game_name).await
            }
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                error!("store transaction failed in {}: {}", context.room_id, e);
                format_store_failure()
            }
        }
    }

    /// Whether the sender's power level allows bulk commands.
    fn is_moderator(&self, context: &CommandContext) -> bool {
        if context.sender_power_level < MODERATOR_POWER_LEVEL {
            warn!(
                "{} tried a bulk command in {} with power level {}",
                context.sender_id, context.room_id, context.sender_power_level
            );
            return false;
        }
        true
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}
