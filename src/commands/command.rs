//! Command parsing and handling.
//!
//! This module provides command parsing functionality for the bot, converting
//! Matrix message text into structured [`Command`] enums that can be processed
//! by the application.

use command_parser::{Command as ParserCommand, Parser};
use log::debug;

use crate::commands::markdown_response::{
    format_invalid_addgame, format_invalid_bulkadd, format_invalid_bulkremove,
    format_invalid_profile, format_invalid_removegame, format_unknown_command,
};

/// Represents a parsed bot command.
///
/// Commands are parsed from Matrix message text and represent the various
/// operations users can perform with the bot.
#[derive(Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Add a game to the sender's list
    ///
    /// # Fields
    ///
    /// * `String` - Game name (free text, may contain spaces)
    AddGame(String),
    /// Remove a game from the sender's list
    ///
    /// # Fields
    ///
    /// * `String` - Game name (free text, may contain spaces)
    RemoveGame(String),
    /// Display a user's games list
    ///
    /// # Fields
    ///
    /// * `Option<String>` - Target user id, the sender when absent
    Profile(Option<String>),
    /// Add a game to several users' lists (moderators only)
    ///
    /// # Fields
    ///
    /// * `Vec<String>` - Target user ids
    /// * `String` - Game name (free text, may contain spaces)
    BulkAdd(Vec<String>, String),
    /// Remove a game from several users' lists (moderators only)
    ///
    /// # Fields
    ///
    /// * `Vec<String>` - Target user ids
    /// * `String` - Game name (free text, may contain spaces)
    BulkRemove(Vec<String>, String),
}

/// Errors that can occur during command parsing.
#[derive(Debug)]
pub enum CommandParsingError {
    /// The message could not be parsed as a command
    UnableToParse,
    /// The command is not for this bot (wrong prefix)
    NotLudo,
    /// The command is not recognized
    Unknown,
    /// The addgame command is missing its game name
    InvalidAddGame,
    /// The removegame command is missing its game name
    InvalidRemoveGame,
    /// The profile target is not a Matrix user id
    InvalidProfile,
    /// The bulkadd command is missing targets or a game name
    InvalidBulkAdd,
    /// The bulkremove command is missing targets or a game name
    InvalidBulkRemove,
}

impl Command {
    /// Parses a message string into a Command.
    ///
    /// This method attempts to parse a Matrix message body into a structured
    /// command. It handles the bot prefix check and validates command syntax.
    ///
    /// # Arguments
    ///
    /// * `parser` - The command parser instance configured for the bot
    /// * `body` - The message text to parse
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - If the message is a valid bot command
    /// * `Err(CommandParsingError)` - If parsing fails or the command is invalid
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The message is not a command format - [`CommandParsingError::UnableToParse`]
    /// - The command is for a different bot - [`CommandParsingError::NotLudo`]
    /// - The command is not recognized - [`CommandParsingError::Unknown`]
    /// - A command is missing its game name or targets - the per-command
    ///   `Invalid*` variant
    ///
    /// # Examples
    ///
    /// ```
    /// # use command_parser::Parser;
    /// # use ludo::commands::command::Command;
    /// let parser = Parser::new('!', '-');
    /// let result = Command::parse(&parser, "!ludo help");
    /// assert!(result.is_ok());
    /// ```
    pub fn parse(parser: &Parser, body: &str) -> Result<Self, CommandParsingError> {
        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let body = body.to_string() + " dummy";

        // This is normal to fails if the message is not a command
        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        // Ignore commands that are not for the bot
        if command.name != "ludo" {
            return Err(CommandParsingError::NotLudo);
        }

        debug!("Parsing command: {:?}", command);

        // If no arguments, return help
        if command.arguments.is_empty() {
            return Ok(Command::Help);
        }

        match command.arguments[0].as_str() {
            "help" => Ok(Command::Help),
            "addgame" => match Self::parse_game_name(&command) {
                Some(game_name) => Ok(Command::AddGame(game_name)),
                None => Err(CommandParsingError::InvalidAddGame),
            },
            "removegame" => match Self::parse_game_name(&command) {
                Some(game_name) => Ok(Command::RemoveGame(game_name)),
                None => Err(CommandParsingError::InvalidRemoveGame),
            },
            "profile" => Ok(Command::Profile(Self::parse_profile_target(&command)?)),
            "bulkadd" => {
                let (user_ids, game_name) =
                    Self::parse_bulk(&command).ok_or(CommandParsingError::InvalidBulkAdd)?;
                Ok(Command::BulkAdd(user_ids, game_name))
            }
            "bulkremove" => {
                let (user_ids, game_name) =
                    Self::parse_bulk(&command).ok_or(CommandParsingError::InvalidBulkRemove)?;
                Ok(Command::BulkRemove(user_ids, game_name))
            }
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// Joins the words after the subcommand into a free-text game name.
    ///
    /// Returns `None` when no game name was given.
    fn parse_game_name(command: &ParserCommand) -> Option<String> {
        // 2 arguments: the subcommand and at least one game name word
        if command.arguments.len() < 2 {
            return None;
        }

        let game_name = command.arguments[1..].join(" ");

        debug!("Parsed game name: {}", game_name);

        Some(game_name)
    }

    /// Extracts the optional profile target.
    ///
    /// No argument means the sender's own profile. A given argument must
    /// look like a Matrix user id (leading `@`).
    fn parse_profile_target(
        command: &ParserCommand,
    ) -> Result<Option<String>, CommandParsingError> {
        if command.arguments.len() < 2 {
            return Ok(None);
        }

        let target = command.arguments[1].clone();
        if !target.starts_with('@') {
            debug!("invalid profile target: {}", target);
            return Err(CommandParsingError::InvalidProfile);
        }

        debug!("Parsed profile target: {}", target);

        Ok(Some(target))
    }

    /// Splits bulk command arguments into targets and a game name.
    ///
    /// The leading `@`-prefixed arguments are the target user ids; the
    /// remaining words joined by spaces form the game name. Returns `None`
    /// when either part is missing.
    fn parse_bulk(command: &ParserCommand) -> Option<(Vec<String>, String)> {
        let user_ids: Vec<String> = command.arguments[1..]
            .iter()
            .take_while(|arg| arg.starts_with('@'))
            .cloned()
            .collect();

        if user_ids.is_empty() {
            debug!("bulk command without targets");
            return None;
        }

        let game_name = command.arguments[1 + user_ids.len()..].join(" ");
        if game_name.is_empty() {
            debug!("bulk command without a game name");
            return None;
        }

        debug!(
            "Parsed bulk command - user_ids: {:?}, game_name: {}",
            user_ids, game_name
        );

        Some((user_ids, game_name))
    }
}

/// Formats a command error into a user-friendly message.
///
/// Converts certain [`CommandParsingError`] variants into formatted error messages
/// for display to the user. Not all errors produce messages (e.g., `UnableToParse`
/// and `NotLudo` return `None` to avoid responding to non-command messages).
///
/// # Arguments
///
/// * `error` - The command error to format
///
/// # Returns
///
/// * `Some(String)` - A formatted error message for user-facing errors
/// * `None` - For internal errors that should not produce a response
///
/// # Examples
///
/// ```
/// # use ludo::commands::command::{format_command_error, CommandParsingError};
/// let error = CommandParsingError::Unknown;
/// let message = format_command_error(error);
/// assert!(message.is_some());
/// ```
pub fn format_command_error(error: CommandParsingError) -> Option<String> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command()),
        CommandParsingError::InvalidAddGame => Some(format_invalid_addgame()),
        CommandParsingError::InvalidRemoveGame => Some(format_invalid_removegame()),
        CommandParsingError::InvalidProfile => Some(format_invalid_profile()),
        CommandParsingError::InvalidBulkAdd => Some(format_invalid_bulkadd()),
        CommandParsingError::InvalidBulkRemove => Some(format_invalid_bulkremove()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_parser() -> Parser {
        Parser::new('!', '-')
    }

    #[test]
    fn test_parse_help_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo help");
        assert!(matches!(result, Ok(Command::Help)));
    }

    #[test]
    fn test_parse_help_command_no_args() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo");
        assert!(matches!(result, Ok(Command::Help)));
    }

    #[test]
    fn test_parse_addgame_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo addgame Chess");
        assert!(matches!(
            result,
            Ok(Command::AddGame(game_name)) if game_name == "Chess"
        ));
    }

    #[test]
    fn test_parse_addgame_command_multi_word_name() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo addgame Terraforming Mars");
        assert!(matches!(
            result,
            Ok(Command::AddGame(game_name)) if game_name == "Terraforming Mars"
        ));
    }

    #[test]
    fn test_parse_addgame_command_missing_name() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo addgame");
        assert!(matches!(result, Err(CommandParsingError::InvalidAddGame)));
    }

    #[test]
    fn test_parse_removegame_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo removegame Chess");
        assert!(matches!(
            result,
            Ok(Command::RemoveGame(game_name)) if game_name == "Chess"
        ));
    }

    #[test]
    fn test_parse_removegame_command_missing_name() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo removegame");
        assert!(matches!(
            result,
            Err(CommandParsingError::InvalidRemoveGame)
        ));
    }

    #[test]
    fn test_parse_profile_command_without_target() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo profile");
        assert!(matches!(result, Ok(Command::Profile(None))));
    }

    #[test]
    fn test_parse_profile_command_with_target() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo profile @alice:example.com");
        assert!(matches!(
            result,
            Ok(Command::Profile(Some(target))) if target == "@alice:example.com"
        ));
    }

    #[test]
    fn test_parse_profile_command_invalid_target() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo profile alice");
        assert!(matches!(result, Err(CommandParsingError::InvalidProfile)));
    }

    #[test]
    fn test_parse_bulkadd_command() {
        let parser = create_parser();
        let result = Command::parse(
            &parser,
            "!ludo bulkadd @alice:example.com @bob:example.com Terraforming Mars",
        );
        assert!(matches!(
            result,
            Ok(Command::BulkAdd(user_ids, game_name))
            if user_ids == vec!["@alice:example.com", "@bob:example.com"]
                && game_name == "Terraforming Mars"
        ));
    }

    #[test]
    fn test_parse_bulkadd_command_missing_targets() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo bulkadd Chess");
        assert!(matches!(result, Err(CommandParsingError::InvalidBulkAdd)));
    }

    #[test]
    fn test_parse_bulkadd_command_missing_game_name() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo bulkadd @alice:example.com");
        assert!(matches!(result, Err(CommandParsingError::InvalidBulkAdd)));
    }

    #[test]
    fn test_parse_bulkremove_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo bulkremove @alice:example.com Chess");
        assert!(matches!(
            result,
            Ok(Command::BulkRemove(user_ids, game_name))
            if user_ids == vec!["@alice:example.com"] && game_name == "Chess"
        ));
    }

    #[test]
    fn test_parse_bulkremove_command_missing_targets() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo bulkremove Chess");
        assert!(matches!(
            result,
            Err(CommandParsingError::InvalidBulkRemove)
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!ludo unknown");
        assert!(matches!(result, Err(CommandParsingError::Unknown)));
    }

    #[test]
    fn test_parse_not_ludo_command() {
        let parser = create_parser();
        let result = Command::parse(&parser, "!other_bot help");
        assert!(matches!(result, Err(CommandParsingError::NotLudo)));
    }

    #[test]
    fn test_parse_unable_to_parse() {
        let parser = create_parser();
        let result = Command::parse(&parser, "This is not a command");
        assert!(matches!(result, Err(CommandParsingError::UnableToParse)));
    }

    #[test]
    fn test_format_command_error_unknown() {
        let error = CommandParsingError::Unknown;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Unknown command"));
    }

    #[test]
    fn test_format_command_error_invalid_addgame() {
        let error = CommandParsingError::InvalidAddGame;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Invalid addgame"));
    }

    #[test]
    fn test_format_command_error_invalid_removegame() {
        let error = CommandParsingError::InvalidRemoveGame;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Invalid removegame"));
    }

    #[test]
    fn test_format_command_error_invalid_profile() {
        let error = CommandParsingError::InvalidProfile;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Invalid profile"));
    }

    #[test]
    fn test_format_command_error_invalid_bulkadd() {
        let error = CommandParsingError::InvalidBulkAdd;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Invalid bulkadd"));
    }

    #[test]
    fn test_format_command_error_invalid_bulkremove() {
        let error = CommandParsingError::InvalidBulkRemove;
        let result = format_command_error(error);
        assert!(result.is_some());
        assert!(result.unwrap().contains("Invalid bulkremove"));
    }

    #[test]
    fn test_format_command_error_unable_to_parse() {
        let error = CommandParsingError::UnableToParse;
        let result = format_command_error(error);
        assert!(result.is_none());
    }

    #[test]
    fn test_format_command_error_not_ludo() {
        let error = CommandParsingError::NotLudo;
        let result = format_command_error(error);
        assert!(result.is_none());
    }
}
