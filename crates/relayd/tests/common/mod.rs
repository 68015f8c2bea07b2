//! Shared test doubles for relay integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_core::{GroupId, Identity, SendError, SendResult, Session};
use relayd::relay::{LocalSink, LogEvent};

/// Ordered record of sink writes and sends, shared between doubles.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// A message a [`RecordingSession`] was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Group {
        group: GroupId,
        target: Identity,
        text: String,
    },
    Direct {
        target: Identity,
        text: String,
    },
}

/// Session double that records every send.
pub struct RecordingSession {
    name: String,
    identity: Identity,
    connected: AtomicBool,
    failing: AtomicBool,
    hanging: AtomicBool,
    sent: Mutex<Vec<Sent>>,
    journal: Option<Journal>,
}

impl RecordingSession {
    pub fn new(name: &str, identity: Identity) -> Arc<Self> {
        Arc::new(Self::build(name, identity, None))
    }

    pub fn with_journal(name: &str, identity: Identity, journal: Journal) -> Arc<Self> {
        Arc::new(Self::build(name, identity, Some(journal)))
    }

    fn build(name: &str, identity: Identity, journal: Option<Journal>) -> Self {
        Self {
            name: name.to_string(),
            identity,
            connected: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            hanging: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn offline(self: Arc<Self>) -> Arc<Self> {
        self.connected.store(false, Ordering::SeqCst);
        self
    }

    pub fn failing(self: Arc<Self>) -> Arc<Self> {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    pub fn hanging(self: Arc<Self>) -> Arc<Self> {
        self.hanging.store(true, Ordering::SeqCst);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    async fn record(&self, message: Sent) -> SendResult {
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push(format!("send:{}", self.name));
        }
        self.sent.lock().unwrap().push(message);

        if self.hanging.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SendError::Rejected("rate limited".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for RecordingSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self) -> Identity {
        self.identity
    }

    fn is_connected_and_authenticated(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_group_message(&self, group: GroupId, target: Identity, text: &str) -> SendResult {
        self.record(Sent::Group {
            group,
            target,
            text: text.to_string(),
        })
        .await
    }

    async fn send_direct_message(&self, target: Identity, text: &str) -> SendResult {
        self.record(Sent::Direct {
            target,
            text: text.to_string(),
        })
        .await
    }
}

/// Local sink double that records messages it was given.
#[derive(Default)]
pub struct RecordingSink {
    pub journal: Journal,
}

impl RecordingSink {
    pub fn with_journal(journal: Journal) -> Arc<Self> {
        Arc::new(Self { journal })
    }

    pub fn writes(&self) -> Vec<String> {
        self.journal.lock().unwrap().clone()
    }
}

impl LocalSink for RecordingSink {
    fn write(&self, event: &LogEvent) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("sink:{}", event.message));
    }
}

/// Individual account number `n`.
pub fn user(n: u32) -> Identity {
    Identity::from_parts(1, 1, 1, n)
}
