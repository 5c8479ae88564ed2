//! Matrix client synchronization and event handling.
//!
//! This module provides the [`MatrixSync`] struct for managing the Matrix client's
//! synchronization loop and handling real-time events from the homeserver.
//!
//! # Overview
//!
//! The [`MatrixSync::sync`] method:
//! 1. Performs an initial sync to skip the backlog (only processing invites)
//! 2. Sets up event handlers for auto-joining rooms and message processing
//! 3. Enters a continuous sync loop

use anyhow::Result;
use std::sync::Arc;

use log::{error, info, warn};
use matrix_sdk::{
    Client, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
            power_levels::UserPowerLevel,
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::IncomingMessage;

/// Manages Matrix client synchronization and event processing.
///
/// This struct wraps a Matrix [`Client`] and handles the complete synchronization
/// lifecycle, including:
/// - Initial sync to skip events received while the bot was offline
/// - Continuous sync loop for real-time event processing
/// - Event handler registration for invites and messages
pub struct MatrixSync {
    /// The matrix client
    client: Client,
}

impl MatrixSync {
    /// Creates a new MatrixSync instance.
    ///
    /// This does not start the synchronization process; call [`MatrixSync::sync`]
    /// to begin syncing.
    ///
    /// # Arguments
    ///
    /// * `client` - The authenticated Matrix client
    pub fn new(client: &Client) -> Self {
        MatrixSync {
            client: client.to_owned(),
        }
    }

    /// Starts the synchronization process and enters an infinite loop.
    ///
    /// This method performs the following sequence:
    /// 1. Registers an auto-join handler for room invitations
    /// 2. Performs an initial sync to process offline events (especially invites)
    ///    without replaying old messages as commands
    /// 3. Registers a message handler with the provided callback
    /// 4. Enters a continuous sync loop
    ///
    /// The sync loop will continue indefinitely until an error occurs or the process
    /// is terminated.
    ///
    /// # Arguments
    ///
    /// * `on_message` - Callback invoked with an [`IncomingMessage`] for each
    ///   text message in a joined room
    ///
    /// # Returns
    ///
    /// Never returns under normal operation. Returns `Err` if the sync loop
    /// encounters a fatal error.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static + Clone,
    {
        info!("start syncing");

        // Auto join rooms when invited
        self.client.add_event_handler(auto_join_rooms);

        // Enable room members lazy-loading
        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        // First sync to only get the invitations received while the bot was offline
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(error) => {
                    error!("an error occurred during initial sync: {error}");
                    error!("trying again…");
                }
            }
        };

        let on_message_arc = Arc::new(on_message);

        // Listen to incoming room messages. Because we are listening after the sync_once, we only get new messages.
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message_arc);
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, &on_message).await }
            }
        });

        // Since we called `sync_once` before we entered our sync loop we must pass
        // that sync token to `sync`
        sync_settings = sync_settings.token(response.next_batch);

        self.client.sync(sync_settings).await?;

        Ok(())
    }
}

/// Automatically joins rooms when the bot receives an invitation.
///
/// # Arguments
///
/// * `room_member` - The stripped room member event containing the invite
/// * `client` - The Matrix client to use for joining
/// * `room` - The room to join
///
/// # References
///
/// See <https://github.com/matrix-org/synapse/issues/4345> for the Synapse issue
/// that necessitates the retry logic.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    // Ignore if the invite is not for us
    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("auto joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(err) = room.join().await {
            // retry autojoin due to synapse sending invites, before the
            // invited user can join for more information see
            // https://github.com/matrix-org/synapse/issues/4345
            error!(
                "failed to join room {} ({err:?}), retrying in {delay}s",
                room.room_id()
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("can't join room {} ({err:?})", room.room_id());
                break;
            }
        }
        info!("successfully joined room {}", room.room_id());
    });
}

/// Handles incoming room messages and delegates to the user callback.
///
/// This internal function:
/// 1. Filters out messages from non-joined rooms and from the bot itself
/// 2. Extracts text content from message events
/// 3. Resolves the sender's power level in the room
/// 4. Invokes the user-provided callback with the message details
///
/// Non-text messages (images, files, etc.) are silently ignored. When the
/// power level cannot be resolved the message is handled with level 0, so a
/// lookup failure can never grant moderator commands.
///
/// # Arguments
///
/// * `event` - The room message event from the sync stream
/// * `room` - The room where the message was sent
/// * `on_message` - The user-provided callback to invoke
async fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &Arc<F>)
where
    F: Fn(IncomingMessage) + Send + Sync + 'static,
{
    // Ignore messages from non-joined rooms
    if room.state() != RoomState::Joined {
        return;
    }

    // Ignore our own messages
    if event.sender == room.own_user_id() {
        return;
    }

    // Only handle text messages
    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    let sender_power_level = match room.get_member(&event.sender).await {
        Ok(Some(member)) => match member.power_level() {
            UserPowerLevel::Infinite => i64::MAX,
            UserPowerLevel::Int(level) => level.into(),
            _ => 0,
        },
        Ok(None) => {
            warn!("sender {} not found in room member list", event.sender);
            0
        }
        Err(e) => {
            warn!(
                "could not resolve power level for {}: {:?}",
                event.sender, e
            );
            0
        }
    };

    on_message(IncomingMessage {
        body: text_content.body,
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        event_id: event.event_id.to_string(),
        sender_power_level,
    });
}
