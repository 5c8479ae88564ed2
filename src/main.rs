//! Ludo - A Matrix bot for tracking which games community members have played.
//!
//! This is the main entry point for the Ludo bot, which lets Matrix users
//! record, remove, and view the games they have played, backed by a single
//! JSON file.
//!
//! # Overview
//!
//! Ludo keeps one games list per user. Members manage their own list with
//! `addgame` and `removegame`, inspect any list with `profile`, and room
//! moderators can update several lists in one command with `bulkadd` and
//! `bulkremove`.
//!
//! # Features
//!
//! - **Per-User Lists**: Every member records their own played games, in the
//!   order they added them
//! - **Duplicate Protection**: Adding checks membership case-insensitively
//! - **Bulk Updates**: Moderators update several members' lists in one
//!   transaction
//! - **Crash-Safe Persistence**: Saves replace the backing file atomically
//! - **YAML Configuration**: Simple configuration file format with environment
//!   variable support
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! matrix:
//!   user_id: "@ludo:matrix.org"
//!   password: "your-password"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `LUDO_` prefix:
//!
//! ```bash
//! export LUDO_MATRIX__USER_ID="@ludo:matrix.org"
//! export LUDO_MATRIX__PASSWORD="your-password"
//! ```
//!
//! # Usage
//!
//! ```bash
//! ludo --config config.yaml --data ./data
//! ```
//!
//! # Bot Commands
//!
//! Once running, users can interact with the bot using these commands in Matrix:
//!
//! - `!ludo help` - Display help information
//! - `!ludo addgame <game name>` - Add a game to your list
//! - `!ludo removegame <game name>` - Remove a game from your list
//! - `!ludo profile [@user:server]` - Show a games list, yours by default
//! - `!ludo bulkadd <@user:server>... <game name>` - Add a game to several lists (moderators)
//! - `!ludo bulkremove <@user:server>... <game name>` - Remove a game from several lists (moderators)
//!
//! # Architecture
//!
//! The bot consists of several modules:
//!
//! - [`bot`] - Main bot logic wiring Matrix messages to store transactions
//! - [`commands`] - Command parsing and execution with validation
//! - [`config`] - YAML configuration file structures and loading with environment variable support
//! - [`matrix`] - Matrix client integration and synchronization
//! - [`store`] - Persisted per-user games lists with transactional saves
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)
//!   - Set to `debug` for verbose output
//!   - Set to `warn` or `error` for minimal logging

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod matrix;
mod store;

/// Command-line arguments for the Ludo bot.
///
/// The bot requires two command-line arguments:
/// - A path to the YAML configuration file containing the Matrix settings
/// - A path to the directory holding the persisted games store
///
/// Most configuration is done through the YAML file (see [`config::Config`]).
///
/// # Examples
///
/// ```bash
/// ludo --config config.yaml --data ./ludo-data
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// The configuration file should contain the Matrix account credentials.
    /// See the [`config`] module for the expected format.
    ///
    /// # Example
    ///
    /// ```yaml
    /// matrix:
    ///   user_id: "@ludo:matrix.org"
    ///   password: "your-password"
    /// ```
    ///
    /// With environment variable overrides:
    ///
    /// ```bash
    /// export LUDO_MATRIX__PASSWORD="secret-from-env"
    /// ludo --config config.yaml --data ./ludo-data
    /// ```
    #[arg(short, long)]
    config: String,

    /// Path to the directory holding the persisted games store.
    ///
    /// This directory will contain:
    /// - `games_db.json` - JSON file mapping user ids to their games lists
    ///
    /// The directory must exist; the file is created on the first save.
    ///
    /// # Example
    ///
    /// ```bash
    /// mkdir -p ./ludo-data
    /// ludo --config config.yaml --data ./ludo-data
    /// ```
    #[arg(short, long)]
    data: String,
}

/// Main entry point for the Ludo bot.
///
/// This function initializes the bot with the following steps:
///
/// 1. **Logging Setup**: Configures the logger with `info` level by default
///    (can be overridden with the `RUST_LOG` environment variable)
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads the YAML configuration file with
///    environment variable overrides
/// 4. **Bot Initialization**: Logs in to Matrix and opens the games store
/// 5. **Bot Execution**: Starts the Matrix sync loop, processing commands
///    until the process is terminated
///
/// # Error Handling
///
/// Configuration or initialization failures are logged and end the process
/// with a non-zero exit code.
///
/// # Examples
///
/// Run with default log level (info):
///
/// ```bash
/// ludo --config config.yaml --data ./ludo-data
/// ```
///
/// Run with debug logging to troubleshoot issues:
///
/// ```bash
/// RUST_LOG=debug ludo --config config.yaml --data ./ludo-data
/// ```
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting ludo {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from YAML file with environment variable overrides
    let config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            std::process::exit(1);
        }
    };

    // Launch bot
    let bot = match Bot::new(config, args).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            std::process::exit(1);
        }
    };
    bot.start().await;
}
