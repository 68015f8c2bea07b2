//! Relay Core - Shared types for the log relay
//!
//! This crate provides the domain types shared between the relay daemon
//! (relayd) and anything that implements a chat session:
//! - `identity` - account identities and chat group ids
//! - `session` - the `Session` capability trait
//! - `snapshot` - `ScopedSnapshot`, lock-holding iteration over a shared view
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod error;
pub mod identity;
pub mod session;
pub mod snapshot;

// Re-exports for convenience
pub use error::{ConfigError, SendError, SendResult};
pub use identity::{AccountType, GroupId, Identity};
pub use session::Session;
pub use snapshot::ScopedSnapshot;
