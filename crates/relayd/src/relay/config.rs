//! Relay and daemon configuration.
//!
//! Example `relay.toml`:
//!
//! ```toml
//! chat_level = "warn"
//!
//! [relay]
//! steam_id = 76561197960287930
//! chat_group_id = 0
//! bot_name = "main"
//! layout = "${level:uppercase=true}|${logger}|${message}"
//!
//! [[sessions]]
//! name = "main"
//! steam_id = 76561197960287931
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use relay_core::{ConfigError, GroupId, Identity};

use super::layout::{Layout, LayoutError};

// ============================================================================
// Relay Configuration
// ============================================================================

/// Destination settings for one relay instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Session to send through. A layout, rendered per event; an empty
    /// rendering means "first available session".
    pub bot_name: Option<String>,
    /// Chat group to post into. `0` means direct messages to `steam_id`.
    pub chat_group_id: u64,
    /// Account the messages are addressed to.
    pub steam_id: u64,
    /// Message layout. Defaults to [`DEFAULT_LAYOUT`](super::layout::DEFAULT_LAYOUT).
    pub layout: Option<String>,
}

/// Validated destination of a relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTarget {
    pub bot_name: Option<Layout>,
    pub identity: Identity,
    pub group: Option<GroupId>,
    pub layout: Layout,
}

impl RelayTarget {
    /// Validates `config`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingIdentity` if `steam_id` is zero
    /// - `ConfigError::NotIndividualAccount` if there is no chat group and
    ///   `steam_id` cannot receive direct messages
    /// - `ConfigError::InvalidLayout` if `layout` or `bot_name` does not parse
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let identity = Identity::new(config.steam_id);
        let group = GroupId::new(config.chat_group_id);

        if identity.is_unset() {
            return Err(ConfigError::MissingIdentity);
        }
        if group.is_none() && !identity.is_individual_account() {
            return Err(ConfigError::NotIndividualAccount { identity });
        }

        let layout = match &config.layout {
            Some(template) => parse_layout("layout", template)?,
            None => Layout::default(),
        };
        let bot_name = config
            .bot_name
            .as_deref()
            .map(|template| parse_layout("bot_name", template))
            .transpose()?
            .filter(|name| !name.is_blank());

        Ok(Self {
            bot_name,
            identity,
            group,
            layout,
        })
    }
}

fn parse_layout(field: &str, template: &str) -> Result<Layout, ConfigError> {
    template
        .parse()
        .map_err(|e: LayoutError| ConfigError::InvalidLayout {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

// ============================================================================
// Daemon Configuration
// ============================================================================

/// A console session the daemon registers at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    pub steam_id: u64,
    #[serde(default = "default_connected")]
    pub connected: bool,
}

fn default_connected() -> bool {
    true
}

/// Top-level daemon configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Minimum level of events forwarded to chat.
    pub chat_level: String,
    pub relay: RelayConfig,
    pub sessions: Vec<SessionConfig>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            chat_level: "info".to_string(),
            relay: RelayConfig::default(),
            sessions: Vec::new(),
        }
    }
}

/// Errors from reading a configuration file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl DaemonConfig {
    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// - `LoadError::Io` if the file cannot be read
    /// - `LoadError::Parse` if the contents are not valid configuration
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
