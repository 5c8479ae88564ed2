//! Matrix protocol integration for the bot.
//!
//! This module provides a Matrix client implementation with support for:
//! - Password login with a fixed display name
//! - Auto-joining rooms on invitation
//! - Real-time event synchronization
//! - Threaded replies to command messages
//!
//! # Architecture
//!
//! The module is structured around the [`client::MatrixClient`] which coordinates:
//! - **Login**: Password authentication against the homeserver
//! - **Sync**: Real-time event handling and room synchronization via the sync submodule
//!
//! Incoming text messages are delivered as [`IncomingMessage`] values carrying
//! the sender's room power level, so the command layer can gate moderator-only
//! commands without touching the Matrix API itself.
//!
//! # Examples
//!
//! ```no_run
//! use ludo::matrix::{UserCredentials, client::MatrixClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = UserCredentials {
//!     user_id: "@bot:example.com".to_string(),
//!     password: "password".to_string(),
//! };
//!
//! let client = MatrixClient::new(&credentials).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
}

/// An incoming text message from a joined room.
///
/// Carries everything the command layer needs to process one message,
/// including the sender's power level at the time the message arrived.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// The message text content
    pub body: String,
    /// The Matrix room ID where the message was sent
    pub room_id: String,
    /// The Matrix user ID who sent the message
    pub sender_id: String,
    /// The Matrix event ID of the message
    pub event_id: String,
    /// The sender's power level in the room
    pub sender_power_level: i64,
}
