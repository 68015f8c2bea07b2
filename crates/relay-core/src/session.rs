//! Bot session capability consumed by the relay.

use async_trait::async_trait;

use crate::{GroupId, Identity, SendResult};

/// A live bot session able to deliver chat messages.
///
/// The registry stores sessions as `Arc<dyn Session>`. Status can change at any
/// time from other tasks, so callers re-check readiness right before sending.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use relay_core::{GroupId, Identity, SendResult, Session};
///
/// struct Silent(Identity);
///
/// #[async_trait]
/// impl Session for Silent {
///     fn name(&self) -> &str { "silent" }
///     fn identity(&self) -> Identity { self.0 }
///     fn is_connected_and_authenticated(&self) -> bool { true }
///
///     async fn send_group_message(&self, _: GroupId, _: Identity, _: &str) -> SendResult {
///         Ok(())
///     }
///
///     async fn send_direct_message(&self, _: Identity, _: &str) -> SendResult {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Unique registry name of this session.
    fn name(&self) -> &str;

    /// Account identity the session is logged on as.
    fn identity(&self) -> Identity;

    /// True once the session is connected and logged on.
    fn is_connected_and_authenticated(&self) -> bool;

    /// Posts `text` into chat group `group`, addressed at `target`.
    async fn send_group_message(&self, group: GroupId, target: Identity, text: &str) -> SendResult;

    /// Sends `text` directly to `target`.
    async fn send_direct_message(&self, target: Identity, text: &str) -> SendResult;
}
