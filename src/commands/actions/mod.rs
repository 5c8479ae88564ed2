//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives
//! the shared [`ProfileStore`](crate::store::ProfileStore) plus the command
//! payload, runs the store transaction, and returns the Markdown response.
//!
//! # Handler Pattern
//!
//! Handlers follow a consistent pattern:
//! 1. Receive the store and the parsed command payload
//! 2. Run one store transaction
//! 3. Translate the outcome into a Markdown response
//!
//! Store failures are returned as [`StoreError`](crate::store::StoreError)
//! and turned into one generic reply by the commander.
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_addgame`] - Add a game to the sender's list
//! - [`handle_removegame`] - Remove a game from the sender's list
//! - [`handle_profile`] - Show a user's games list
//! - [`handle_bulkadd`] - Add a game to several lists
//! - [`handle_bulkremove`] - Remove a game from several lists

mod addgame;
mod bulkadd;
mod bulkremove;
mod help;
mod profile;
mod removegame;

pub use crate::commands::actions::{
    addgame::handle_addgame, bulkadd::handle_bulkadd, bulkremove::handle_bulkremove,
    help::handle_help, profile::handle_profile, removegame::handle_removegame,
};
