//! Bot module wiring the Matrix client to the games store.
//!
//! This module provides the main [`Bot`] implementation that connects a Matrix
//! client with the [`ProfileStore`]. It orchestrates the complete bot lifecycle:
//! logging in, syncing Matrix rooms, parsing commands, running store
//! transactions, and replying.
//!
//! # Overview
//!
//! The Ludo bot lets members of a Matrix community record which games they
//! have played. Every member manages their own list; moderators can update
//! several lists at once with the bulk commands.
//!
//! # Command Processing Flow
//!
//! ```text
//! Matrix Message → Parse Command → Permission Gate → Store Transaction → Send Reply
//! ```
//!
//! # Supported Commands
//!
//! - `addgame` - Add a game to the sender's list
//! - `removegame` - Remove a game from the sender's list
//! - `profile` - Show a games list
//! - `bulkadd` / `bulkremove` - Update several lists at once (moderators)
//! - `help` - Display help information
//!
//! # Example
//!
//! ```no_run
//! # use ludo::bot::Bot;
//! # use ludo::config::Config;
//! # use ludo::Args;
//! # async fn run() -> Result<(), anyhow::Error> {
//! let config = Config::load("config.yaml")?;
//! let args = Args::parse();
//!
//! // Create and start the bot
//! let bot = Bot::new(config, args).await?;
//! bot.start().await; // Runs indefinitely
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use crate::{
    Args,
    commands::{CommandContext, CommandParseError, Commander},
    config::Config,
    matrix::{IncomingMessage, MatrixClient, UserCredentials},
    store::{ProfileStore, StoreLoader},
};

/// File name of the backing games store inside the data directory.
const STORE_FILE: &str = "games_db.json";

/// Context for processing a Matrix message.
///
/// Groups together all the information needed to process a single Matrix message
/// and execute commands.
struct MessageContext {
    /// The incoming Matrix message
    message: IncomingMessage,
    /// Thread-safe reference to the Matrix client
    matrix_client: Arc<MatrixClient>,
    /// Thread-safe reference to the games store
    profile_store: Arc<ProfileStore<StoreLoader>>,
    /// Thread-safe reference to the command handler
    commander: Arc<Commander>,
}

/// Main bot structure that integrates Matrix messaging with the games store.
///
/// The `Bot` manages two responsibilities:
///
/// 1. **Message Processing** - Listens to Matrix rooms and processes user commands
/// 2. **Store Management** - Runs every command against the shared [`ProfileStore`],
///    whose internal lock serializes the load-modify-save transactions on the
///    backing JSON file
///
/// # Thread Safety
///
/// All shared state (`matrix_client`, `profile_store`, `commander`) is wrapped
/// in `Arc` for safe sharing across the per-message tasks. The store provides
/// its own interior locking, so no further synchronization is needed here.
///
/// # Examples
///
/// ```no_run
/// # use ludo::bot::Bot;
/// # use ludo::config::{Config, Matrix};
/// # #[derive(Debug)]
/// # struct Args {
/// #     config: String,
/// #     data: String,
/// # }
/// # async fn example() -> Result<(), anyhow::Error> {
/// let config = Config {
///     matrix: Matrix {
///         user_id: "@bot:example.com".to_string(),
///         password: "secret".to_string(),
///     },
/// };
///
/// let args = Args {
///     config: "config.yaml".to_string(),
///     data: "./data".to_string(),
/// };
///
/// let bot = Bot::new(config, args).await?;
/// bot.start().await; // Runs indefinitely
/// # Ok(())
/// # }
/// ```
pub struct Bot {
    /// Matrix client for sending and receiving messages.
    matrix_client: Arc<MatrixClient>,

    /// Games store shared by all command handlers.
    ///
    /// The store serializes its own transactions; sharing it by `Arc` is
    /// enough for the per-message tasks.
    profile_store: Arc<ProfileStore<StoreLoader>>,

    /// Command parser and executor.
    ///
    /// Handles parsing Matrix messages into structured commands and routing
    /// them to appropriate handlers. Stateless and can be safely shared.
    commander: Arc<Commander>,
}

impl Bot {
    /// Creates a new Bot instance from configuration and command line arguments.
    ///
    /// This constructor logs in to Matrix and builds the games store over
    /// `<data>/games_db.json`. The store file itself is created lazily on the
    /// first save; a missing file simply reads as an empty store.
    ///
    /// # Arguments
    ///
    /// * `config` - YAML configuration containing:
    ///   - `matrix.user_id`: Matrix bot account ID (e.g., `@bot:example.com`)
    ///   - `matrix.password`: Matrix account password
    ///
    /// * `args` - Command line arguments containing:
    ///   - `data`: Directory path holding the backing games store
    ///
    /// # Errors
    ///
    /// Returns an error if Matrix login fails (invalid credentials, network
    /// issues, unparseable user id).
    pub async fn new(config: Config, args: Args) -> Result<Self, anyhow::Error> {
        // Create matrix client
        let matrix_client = Arc::new(
            MatrixClient::new(&UserCredentials {
                user_id: config.matrix.user_id,
                password: config.matrix.password,
            })
            .await?,
        );

        let store_path = Path::new(&args.data).join(STORE_FILE);
        let profile_store = Arc::new(ProfileStore::new(StoreLoader::new(
            store_path.to_string_lossy().into_owned(),
        )));

        let commander = Arc::new(Commander::new());

        Ok(Bot {
            matrix_client,
            profile_store,
            commander,
        })
    }

    /// Starts the bot and begins processing messages.
    ///
    /// This method consumes `self` and runs indefinitely. Each incoming text
    /// message spawns its own task, so a slow store transaction never blocks
    /// the Matrix sync loop; the store's internal lock keeps concurrent
    /// transactions serialized against the backing file.
    ///
    /// # Lifecycle
    ///
    /// This method runs forever and only terminates if:
    /// - The process receives a termination signal (SIGINT, SIGTERM)
    /// - The Matrix sync encounters an unrecoverable error (panics)
    ///
    /// # Panics
    ///
    /// Panics if the Matrix sync loop fails to start or encounters an unrecoverable error.
    pub async fn start(self) {
        // Clone references for the message handler
        let matrix_client_for_handler = Arc::clone(&self.matrix_client);
        let profile_store = Arc::clone(&self.profile_store);
        let commander = Arc::clone(&self.commander);

        // Create message handler closure
        let on_message = move |message: IncomingMessage| {
            let ctx = MessageContext {
                message,
                matrix_client: Arc::clone(&matrix_client_for_handler),
                profile_store: Arc::clone(&profile_store),
                commander: Arc::clone(&commander),
            };
            Self::handle_matrix_message(ctx)
        };

        // Start matrix sync
        self.matrix_client.sync(on_message).await.unwrap();
    }

    /// Handles an incoming Matrix message and processes it as a command.
    ///
    /// This method implements the complete command processing flow:
    /// 1. Parse the message body to identify the command
    /// 2. Silently ignore if not a command or for a different bot
    /// 3. Send error response if command syntax is invalid
    /// 4. Run the command against the store, gated on the sender's power level
    /// 5. Send the response as a threaded reply
    ///
    /// # Behavior
    ///
    /// This method spawns a new async task to handle the message, allowing the Matrix
    /// sync loop to continue processing other messages without blocking.
    fn handle_matrix_message(ctx: MessageContext) {
        tokio::spawn(async move {
            // Parse body to extract command
            let command = match ctx.commander.parse(&ctx.message.body) {
                Ok(command) => command,
                Err(e) => match e {
                    // Return silently if the command is not for the bot
                    CommandParseError::NotForBot => return,
                    // Send error message if the command is invalid
                    CommandParseError::InvalidCommand(message) => {
                        ctx.matrix_client
                            .send_reply(
                                &ctx.message.room_id,
                                &ctx.message.sender_id,
                                &ctx.message.event_id,
                                &message,
                            )
                            .await;
                        return;
                    }
                },
            };

            let command_context = CommandContext {
                room_id: ctx.message.room_id.clone(),
                sender_id: ctx.message.sender_id.clone(),
                sender_power_level: ctx.message.sender_power_level,
            };

            // Run command against the store
            let response = ctx
                .commander
                .run_command(&command, &command_context, &ctx.profile_store)
                .await;

            // Send response back to matrix room
            ctx.matrix_client
                .send_reply(
                    &ctx.message.room_id,
                    &ctx.message.sender_id,
                    &ctx.message.event_id,
                    &response,
                )
                .await;
        });
    }
}
