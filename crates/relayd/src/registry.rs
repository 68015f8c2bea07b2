//! Session registry shared between session lifecycle code and the relay.
//!
//! Sessions are keyed by their unique name and stored as `Arc<dyn Session>`.
//! Any task may insert or remove sessions at any time; readers either look up a
//! single session by name or take a [`SessionSnapshot`] to enumerate them.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  insert/remove   ┌────────────────────────────────┐
//! │ session lifecycle│─────(write)─────▶│ RwLock<HashMap<name, Session>> │
//! └──────────────────┘                  └───────────────┬────────────────┘
//!                                                       │ read_owned()
//!                                                       ▼
//!                                       ScopedSnapshot { view, guard }
//!                                       (writers wait until it drops)
//! ```
//!
//! # Panic-Free Guarantees
//!
//! - No `.unwrap()` or `.expect()` in production code
//! - Lock acquisition is async and cannot poison

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedRwLockReadGuard, RwLock};
use tracing::{debug, info};

use relay_core::{ScopedSnapshot, Session};

type SessionMap = HashMap<String, Arc<dyn Session>>;

/// Point-in-time view of the registry that keeps writers out until dropped.
pub type SessionSnapshot = ScopedSnapshot<Arc<dyn Session>, OwnedRwLockReadGuard<SessionMap>>;

/// Errors from registry mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Session already exists: {name}")]
    SessionAlreadyExists { name: String },
}

/// Name-keyed registry of live bot sessions.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<SessionMap>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session under its own name.
    ///
    /// # Errors
    ///
    /// - `RegistryError::SessionAlreadyExists` if the name is taken
    pub async fn insert(&self, session: Arc<dyn Session>) -> Result<(), RegistryError> {
        let name = session.name().to_string();
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&name) {
            debug!(session = %name, "Rejecting duplicate session");
            return Err(RegistryError::SessionAlreadyExists { name });
        }

        info!(session = %name, identity = %session.identity(), "Session registered");
        sessions.insert(name, session);
        Ok(())
    }

    /// Removes and returns the session named `name`, if present.
    pub async fn remove(&self, name: &str) -> Option<Arc<dyn Session>> {
        let removed = self.sessions.write().await.remove(name);
        if removed.is_some() {
            info!(session = %name, "Session removed");
        }
        removed
    }

    /// Looks up a session by exact name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Session>> {
        self.sessions.read().await.get(name).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Names of all registered sessions, in no particular order.
    pub async fn names(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }

    /// Takes a snapshot of all sessions, waiting for any writer to finish.
    ///
    /// The read lock is held until the snapshot is released or dropped, so
    /// keep it short-lived and never hold it across a send.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let guard = self.sessions.clone().read_owned().await;
        Self::snapshot_from(guard)
    }

    /// Non-blocking [`snapshot`](Self::snapshot). `None` while a writer holds
    /// the lock.
    pub fn try_snapshot(&self) -> Option<SessionSnapshot> {
        let guard = self.sessions.clone().try_read_owned().ok()?;
        Some(Self::snapshot_from(guard))
    }

    fn snapshot_from(guard: OwnedRwLockReadGuard<SessionMap>) -> SessionSnapshot {
        let view: Vec<Arc<dyn Session>> = guard.values().cloned().collect();
        ScopedSnapshot::new(view, guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_core::{GroupId, Identity, SendResult};
    use std::time::Duration;
    use tokio::time::timeout;

    struct StubSession {
        name: String,
        identity: Identity,
    }

    #[async_trait]
    impl Session for StubSession {
        fn name(&self) -> &str {
            &self.name
        }

        fn identity(&self) -> Identity {
            self.identity
        }

        fn is_connected_and_authenticated(&self) -> bool {
            true
        }

        async fn send_group_message(&self, _: GroupId, _: Identity, _: &str) -> SendResult {
            Ok(())
        }

        async fn send_direct_message(&self, _: Identity, _: &str) -> SendResult {
            Ok(())
        }
    }

    fn stub(name: &str, account: u32) -> Arc<dyn Session> {
        Arc::new(StubSession {
            name: name.to_string(),
            identity: Identity::from_parts(1, 1, 1, account),
        })
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty().await);

        registry.insert(stub("alpha", 1)).await.unwrap();
        assert_eq!(registry.len().await, 1);

        let found = registry.get("alpha").await.expect("alpha registered");
        assert_eq!(found.identity(), Identity::from_parts(1, 1, 1, 1));

        assert!(registry.remove("alpha").await.is_some());
        assert!(registry.get("alpha").await.is_none());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let registry = SessionRegistry::new();
        registry.insert(stub("alpha", 1)).await.unwrap();

        let result = registry.insert(stub("alpha", 2)).await;
        assert_eq!(
            result,
            Err(RegistryError::SessionAlreadyExists {
                name: "alpha".to_string()
            })
        );
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_is_exact_match() {
        let registry = SessionRegistry::new();
        registry.insert(stub("Alpha", 1)).await.unwrap();

        assert!(registry.get("alpha").await.is_none());
        assert!(registry.get("Alph").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_returns_none() {
        let registry = SessionRegistry::new();
        assert!(registry.remove("ghost").await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_lists_all_sessions() {
        let registry = SessionRegistry::new();
        registry.insert(stub("alpha", 1)).await.unwrap();
        registry.insert(stub("beta", 2)).await.unwrap();

        let mut names: Vec<String> = registry
            .snapshot()
            .await
            .map(|s| s.name().to_string())
            .collect();
        names.sort();

        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_snapshot_blocks_writers_until_dropped() {
        let registry = SessionRegistry::new();
        registry.insert(stub("alpha", 1)).await.unwrap();

        let snapshot = registry.snapshot().await;

        let blocked = timeout(Duration::from_millis(50), registry.insert(stub("beta", 2))).await;
        assert!(blocked.is_err(), "insert must wait for the snapshot");

        drop(snapshot);
        registry.insert(stub("beta", 2)).await.unwrap();
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_try_snapshot_when_idle() {
        let registry = SessionRegistry::new();
        registry.insert(stub("alpha", 1)).await.unwrap();

        let snapshot = registry.try_snapshot().expect("no writer is active");
        assert_eq!(snapshot.len(), 1);

        // Readers share the lock
        assert!(registry.try_snapshot().is_some());
    }

    #[tokio::test]
    async fn test_try_snapshot_while_writer_active() {
        let registry = SessionRegistry::new();
        registry.insert(stub("alpha", 1)).await.unwrap();

        let writer = registry.sessions.write().await;
        assert!(registry.try_snapshot().is_none());

        drop(writer);
        let snapshot = registry.try_snapshot().expect("writer released the lock");
        assert_eq!(snapshot.len(), 1);
    }
}
