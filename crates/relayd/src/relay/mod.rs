//! Log relay - forwards log events to a chat destination through live sessions.
//!
//! For every event the relay:
//! 1. writes it to the local sink (always, first)
//! 2. renders it with the configured layout
//! 3. picks a session: the named one, or the first eligible one in the registry
//! 4. sends it as a group message (chat group configured) or a direct message
//!
//! Delivery is best-effort. Nothing here returns an error to the code that
//! emitted the event; the outcome is reported as a [`Delivery`] value and
//! failed sends are recorded at trace level under [`DIAGNOSTIC_TARGET`].
//!
//! # Routing
//!
//! ```text
//! registry empty ───────────────────────────────► Skipped(RegistryEmpty)
//! rendered text empty ──────────────────────────► Skipped(EmptyMessage)
//! bot_name set, session absent/offline ─────────► Skipped(NamedSessionUnavailable)
//! chat group set ───────► named or first online ► send_group_message(group, target, text)
//! named session == target ──────────────────────► Skipped(SelfTarget)
//! otherwise ────► named or first online != target ► send_direct_message(target, text)
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use relay_core::{ConfigError, GroupId, Identity, SendError, SendResult, Session};

use crate::registry::SessionRegistry;

pub mod config;
pub mod event;
pub mod layer;
pub mod layout;
pub mod sink;

pub use config::{DaemonConfig, LoadError, RelayConfig, RelayTarget, SessionConfig};
pub use event::LogEvent;
pub use layer::{spawn_relay, RelayLayer, RELAY_QUEUE_CAPACITY};
pub use layout::{Layout, LayoutError, Render, DEFAULT_LAYOUT};
pub use sink::{LocalSink, NullSink, WriterSink};

/// Tracing target for failed deliveries.
pub const DIAGNOSTIC_TARGET: &str = "relayd::relay::delivery";

// ============================================================================
// Delivery Outcome
// ============================================================================

/// Where a message went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Group(GroupId),
    Direct(Identity),
}

/// Why an event was not sent to chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No sessions registered yet.
    RegistryEmpty,
    /// The layout rendered nothing.
    EmptyMessage,
    /// The configured session is not registered or not online.
    NamedSessionUnavailable,
    /// No online session qualifies.
    NoEligibleSession,
    /// The named session is the target itself.
    SelfTarget,
}

/// Outcome of relaying one event. Safe to ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered {
        session: String,
        destination: Destination,
    },
    Failed {
        session: String,
        destination: Destination,
        error: SendError,
    },
    Skipped(SkipReason),
}

impl Delivery {
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

// ============================================================================
// Log Relay
// ============================================================================

/// Relays log events to one chat destination.
///
/// `handle` takes `&self` and touches no shared mutable state, so one relay
/// can serve concurrent callers.
pub struct LogRelay {
    registry: Arc<SessionRegistry>,
    sink: Arc<dyn LocalSink>,
    renderer: Box<dyn Render>,
    target: RelayTarget,
}

impl LogRelay {
    /// Validates `config` and builds a relay over `registry`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`RelayTarget::from_config`]. No relay exists
    /// afterwards, so no event is ever accepted with a bad configuration.
    pub fn new(
        config: &RelayConfig,
        registry: Arc<SessionRegistry>,
        sink: Arc<dyn LocalSink>,
    ) -> Result<Self, ConfigError> {
        let target = RelayTarget::from_config(config)?;
        let renderer = Box::new(target.layout.clone());

        debug!(
            identity = %target.identity,
            group = ?target.group.map(GroupId::raw),
            named = target.bot_name.is_some(),
            "Log relay configured"
        );

        Ok(Self {
            registry,
            sink,
            renderer,
            target,
        })
    }

    /// Replaces the message renderer (the configured layout by default).
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Render + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn target(&self) -> &RelayTarget {
        &self.target
    }

    /// Relays one event, returning once delivery finished or was skipped.
    ///
    /// Cancelling `cancel` abandons an in-flight send, which then counts as a
    /// failed delivery.
    pub async fn handle(&self, event: &LogEvent, cancel: &CancellationToken) -> Delivery {
        self.sink.write(event);

        if self.registry.is_empty().await {
            return Delivery::Skipped(SkipReason::RegistryEmpty);
        }

        let message = self.renderer.render(event);
        if message.is_empty() {
            return Delivery::Skipped(SkipReason::EmptyMessage);
        }

        let mut candidate = None;

        let bot_name = self
            .target
            .bot_name
            .as_ref()
            .map(|layout| layout.render(event))
            .filter(|name| !name.is_empty());

        if let Some(name) = bot_name {
            match self.registry.get(&name).await {
                Some(session) if session.is_connected_and_authenticated() => {
                    candidate = Some(session);
                }
                _ => return Delivery::Skipped(SkipReason::NamedSessionUnavailable),
            }
        }

        let identity = self.target.identity;

        match self.target.group {
            Some(group) => {
                self.send_group_message(group, &message, candidate, cancel)
                    .await
            }
            None if candidate
                .as_ref()
                .map_or(true, |session| session.identity() != identity) =>
            {
                self.send_direct_message(&message, candidate, cancel).await
            }
            None => Delivery::Skipped(SkipReason::SelfTarget),
        }
    }

    async fn send_group_message(
        &self,
        group: GroupId,
        message: &str,
        candidate: Option<Arc<dyn Session>>,
        cancel: &CancellationToken,
    ) -> Delivery {
        let session = match candidate {
            Some(session) => session,
            None => match self
                .first_session(|session| session.is_connected_and_authenticated())
                .await
            {
                Some(session) => session,
                None => return Delivery::Skipped(SkipReason::NoEligibleSession),
            },
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SendError::Cancelled),
            result = session.send_group_message(group, self.target.identity, message) => result,
        };

        Self::finish(&*session, Destination::Group(group), result)
    }

    async fn send_direct_message(
        &self,
        message: &str,
        candidate: Option<Arc<dyn Session>>,
        cancel: &CancellationToken,
    ) -> Delivery {
        let identity = self.target.identity;

        let session = match candidate {
            Some(session) => session,
            None => match self
                .first_session(|session| {
                    session.is_connected_and_authenticated() && session.identity() != identity
                })
                .await
            {
                Some(session) => session,
                None => return Delivery::Skipped(SkipReason::NoEligibleSession),
            },
        };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SendError::Cancelled),
            result = session.send_direct_message(identity, message) => result,
        };

        Self::finish(&*session, Destination::Direct(identity), result)
    }

    /// First session in registry order matching `eligible`.
    ///
    /// The snapshot, and with it the read lock, is gone before any send.
    async fn first_session(
        &self,
        eligible: impl Fn(&dyn Session) -> bool,
    ) -> Option<Arc<dyn Session>> {
        let mut snapshot = self.registry.snapshot().await;
        snapshot.find(|session| eligible(&**session))
    }

    fn finish(session: &dyn Session, destination: Destination, result: SendResult) -> Delivery {
        let name = session.name().to_string();

        match result {
            Ok(()) => {
                debug!(session = %name, ?destination, "Log message relayed");
                Delivery::Delivered {
                    session: name,
                    destination,
                }
            }
            Err(error) => {
                trace!(
                    target: DIAGNOSTIC_TARGET,
                    session = %name,
                    ?destination,
                    error = %error,
                    "send_message failed"
                );
                Delivery::Failed {
                    session: name,
                    destination,
                    error,
                }
            }
        }
    }
}
