//! Configuration file structures for the Ludo bot.
//!
//! This module defines the configuration file format using YAML, loaded with
//! environment variable overrides. The configuration holds the Matrix account
//! settings.
//!
//! # Configuration File Format
//!
//! The bot uses a YAML configuration file with the following structure:
//!
//! ```yaml
//! # Matrix Account Configuration
//! matrix:
//!   # Fully qualified Matrix user ID for the bot account
//!   user_id: "@ludo:matrix.org"
//!
//!   # Matrix account password
//!   password: "secret-password"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with a `LUDO_`-prefixed environment variable,
//! using `__` to separate nesting levels:
//!
//! ```bash
//! export LUDO_MATRIX__PASSWORD="secret-from-env"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure for the Ludo bot.
///
/// # Structure
///
/// The configuration has a single section:
/// - [`Matrix`] - Matrix account credentials
///
/// # Examples
///
/// ```no_run
/// # use ludo::config::Config;
/// # fn main() -> Result<(), figment::Error> {
/// let config = Config::load("config.yaml")?;
///
/// println!("Matrix User: {}", config.matrix.user_id);
/// # Ok(())
/// # }
/// ```
#[derive(Deserialize)]
pub struct Config {
    /// Matrix account configuration
    pub matrix: Matrix,
}

impl Config {
    /// Loads the configuration from a YAML file with environment overrides.
    ///
    /// Values from `LUDO_`-prefixed environment variables take precedence
    /// over the file, with `__` separating nesting levels
    /// (e.g. `LUDO_MATRIX__PASSWORD`).
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or is
    /// missing a required field after the environment overrides are applied.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("LUDO_").split("__"))
            .extract()
    }
}

/// Matrix account configuration.
///
/// Contains credentials for the Matrix bot account.
///
/// # YAML Section
///
/// ```yaml
/// matrix:
///   user_id: "@ludo:matrix.org"
///   password: "your-password"
/// ```
#[derive(Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID.
    ///
    /// The Matrix ID of the bot account in the format `@username:homeserver.com`.
    ///
    /// # Examples
    ///
    /// - `@ludo:matrix.org`
    /// - `@games-bot:example.com`
    pub user_id: String,

    /// Matrix account password.
    ///
    /// Used to log in when the bot starts.
    pub password: String,
}
