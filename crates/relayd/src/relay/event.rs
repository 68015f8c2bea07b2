//! Log events as seen by the relay.

use chrono::{DateTime, Utc};
use tracing::Level;

/// A single emitted log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    /// Logger name (the tracing target for events coming from `RelayLayer`).
    pub logger: String,
    pub message: String,
}

impl LogEvent {
    /// Creates an event stamped with the current time.
    pub fn new(level: Level, logger: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            logger: logger.into(),
            message: message.into(),
        }
    }
}
