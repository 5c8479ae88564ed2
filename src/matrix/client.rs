//! Matrix client wrapper for bot messaging and synchronization.
//!
//! This module provides a high-level [`MatrixClient`] interface that wraps the
//! Matrix SDK client and handles login, message sending, and synchronization.

use log::{error, info};
use matrix_sdk::{
    Client,
    ruma::{
        EventId, RoomId, UserId,
        events::room::message::{
            AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent,
        },
    },
};

use crate::matrix::{IncomingMessage, UserCredentials, sync::MatrixSync};

/// High-level Matrix client for bot messaging operations.
///
/// Manages a Matrix SDK client with synchronization capabilities and provides
/// convenient methods for sending threaded replies.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Creates and initializes a new Matrix client.
    ///
    /// This method performs the complete initialization workflow:
    /// 1. Resolves the homeserver from the user id's server name
    /// 2. Logs in with the account password
    /// 3. Sets the bot's display name
    /// 4. Initializes the synchronization service
    ///
    /// # Arguments
    ///
    /// * `user_credentials` - User credentials containing user ID and password
    ///
    /// # Returns
    ///
    /// A fully configured [`MatrixClient`] ready for messaging and synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user id cannot be parsed
    /// - The homeserver cannot be reached
    /// - Login fails (invalid credentials, network issues)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ludo::matrix::{UserCredentials, client::MatrixClient};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), anyhow::Error> {
    /// let credentials = UserCredentials {
    ///     user_id: "@bot:example.com".to_string(),
    ///     password: "secure_password".to_string(),
    /// };
    ///
    /// let client = MatrixClient::new(&credentials).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(user_credentials: &UserCredentials) -> Result<Self, anyhow::Error> {
        let user_id = UserId::parse(&user_credentials.user_id)?;

        let client = Client::builder()
            .server_name(user_id.server_name())
            .build()
            .await?;

        client
            .matrix_auth()
            .login_username(&user_id, &user_credentials.password)
            .initial_device_display_name("ludo")
            .send()
            .await?;

        info!("logged in as {}", user_id);

        // Set display name
        client.account().set_display_name(Some("Ludo")).await?;

        let matrix_sync = MatrixSync::new(&client);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// This method begins syncing with the Matrix server and invokes the provided
    /// callback for each incoming text message. The sync loop runs indefinitely
    /// and automatically handles:
    /// - Auto-joining rooms on invitation
    /// - Filtering for text messages in joined rooms
    /// - Resolving the sender's power level for each message
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked with an [`IncomingMessage`] for each
    ///   text message
    ///
    /// # Returns
    ///
    /// Never returns under normal operation. Returns `Ok(())` if sync ends gracefully.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ludo::matrix::client::MatrixClient;
    /// # async fn example(client: MatrixClient) -> Result<(), anyhow::Error> {
    /// client.sync(|message| {
    ///     println!("[{}] {}: {}", message.room_id, message.sender_id, message.body);
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn sync<F>(&self, on_message: F) -> Result<(), anyhow::Error>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static + Clone,
    {
        match self.matrix_sync.sync(on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }

        Ok(())
    }

    /// Sends a threaded reply to a specific message.
    ///
    /// Creates a reply to an existing message, maintaining proper thread context
    /// in the Matrix room. The message body is formatted as Markdown.
    ///
    /// # Arguments
    ///
    /// * `room_id` - The Matrix room ID where the reply should be sent
    /// * `sender_id` - The user ID of the original message sender
    /// * `event_id` - The event ID of the message being replied to
    /// * `body` - The reply content (supports Markdown formatting)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use ludo::matrix::client::MatrixClient;
    /// # async fn example(client: MatrixClient) {
    /// client.send_reply(
    ///     "!room:example.com",
    ///     "@user:example.com",
    ///     "$event123:example.com",
    ///     "Added **Chess** to your games list!",
    /// ).await;
    /// # }
    /// ```
    pub async fn send_reply(&self, room_id: &str, sender_id: &str, event_id: &str, body: &str) {
        let sender = UserId::parse(sender_id).unwrap();
        let event = EventId::parse(event_id).unwrap();

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(room_id, content).await;
    }

    /// Internal helper to send message content to a room.
    ///
    /// # Arguments
    ///
    /// * `room_id` - The Matrix room ID
    /// * `content` - The pre-formatted message content
    async fn send(&self, room_id: &str, content: RoomMessageEventContent) {
        let room_id_obj = RoomId::parse(room_id).unwrap();

        if let Some(room) = self.client.get_room(&room_id_obj)
            && let Err(e) = room.send(content).await
        {
            error!("Failed to send message: {:?}", e);
        }
    }
}
