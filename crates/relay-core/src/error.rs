//! Domain-specific error types following panic-free policy.

use crate::Identity;
use thiserror::Error;

/// Invalid relay configuration. Fatal: a relay is never built from it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Target identity is zero.
    #[error("Invalid steam_id: target identity is not set")]
    MissingIdentity,

    /// No chat group configured and the target cannot receive direct messages.
    #[error("Invalid steam_id: {identity} is not an individual account and no chat_group_id is set")]
    NotIndividualAccount { identity: Identity },

    /// Layout template could not be parsed.
    #[error("Invalid {field}: {reason}")]
    InvalidLayout { field: String, reason: String },
}

/// Failure reported by a session's send capability.
///
/// Recoverable: the relay records it at trace level and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The chat backend refused the message.
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// The session could not reach the chat backend.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Caller cancelled the delivery while it was in flight.
    #[error("Delivery cancelled")]
    Cancelled,
}

/// Result type for session send operations.
pub type SendResult = Result<(), SendError>;
