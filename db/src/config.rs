//! Persistent shell configuration.
//!
//! The active pivot and the database credentials live in a small JSON file,
//! `./configuration.json` by default:
//!
//! ```json
//! {
//!   "pivot": "openbravo",
//!   "dbUser": "tad",
//!   "dbPwd": "tad",
//!   "dbHost": "localhost",
//!   "dbPort": 5432
//! }
//! ```
//!
//! Missing keys take their default, so files written without a port still
//! load.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./configuration.json";

/// Settings persisted between shell sessions.
///
/// # Examples
///
/// ```
/// use etshell_db::ShellConfig;
///
/// let config: ShellConfig = serde_json::from_str(r#"{"pivot": "etendo"}"#).unwrap();
/// assert_eq!(config.pivot, "etendo");
/// assert_eq!(config.db_user, "tad");
/// assert_eq!(config.db_port, 5432);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Active database name.
    pub pivot: String,
    pub db_user: String,
    pub db_pwd: String,
    pub db_host: String,
    pub db_port: u16,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            pivot: "openbravo".to_string(),
            db_user: "tad".to_string(),
            db_pwd: "tad".to_string(),
            db_host: "localhost".to_string(),
            db_port: 5432,
        }
    }
}

impl ShellConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or [`JsonError`](ConfigError::JsonError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)?;
        debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, or [`JsonError`](ConfigError::JsonError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path.as_ref())?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.as_ref().display(), "Saved configuration");
        Ok(())
    }

    /// Loads the file at `path`, writing the defaults there first if it
    /// does not exist yet.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Creating default configuration");
            Self::default().save(path)?;
        }
        Self::load(path)
    }

    /// Applies one `:db` setting by its short key.
    ///
    /// Keys are `user`, `pwd`, `host`, `port` and `db` (the pivot). The
    /// configuration is unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for a key outside [`KEYS`](Self::KEYS)
    /// and [`ConfigError::InvalidValue`] if `port` is not a port number.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "user" => self.db_user = value.to_string(),
            "pwd" => self.db_pwd = value.to_string(),
            "host" => self.db_host = value.to_string(),
            "port" => {
                self.db_port = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "port",
                        value: value.to_string(),
                    })?;
            }
            "db" => self.pivot = value.to_string(),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Short keys accepted by [`set`](Self::set).
    pub const KEYS: [&'static str; 5] = ["user", "pwd", "host", "port", "db"];
}
