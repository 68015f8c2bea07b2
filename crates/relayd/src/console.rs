//! Stdout-backed session used by the daemon when no chat network is attached.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use relay_core::{GroupId, Identity, SendError, SendResult, Session};

/// Session that "delivers" chat messages by printing them to stdout.
///
/// Output format:
/// ```text
/// [bot-main -> group 103582791429521412 @ 76561197960287930] INFO|app|started
/// [bot-main -> 76561197960287930] INFO|app|started
/// ```
pub struct ConsoleSession {
    name: String,
    identity: Identity,
    connected: AtomicBool,
    out: Mutex<Stdout>,
}

impl ConsoleSession {
    pub fn new(name: impl Into<String>, identity: Identity) -> Self {
        Self {
            name: name.into(),
            identity,
            connected: AtomicBool::new(true),
            out: Mutex::new(tokio::io::stdout()),
        }
    }

    /// Marks the session as connected or disconnected.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    async fn emit(&self, line: String) -> SendResult {
        if !self.is_connected_and_authenticated() {
            return Err(SendError::Transport(format!("{} is offline", self.name)));
        }

        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Session for ConsoleSession {
    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self) -> Identity {
        self.identity
    }

    fn is_connected_and_authenticated(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn send_group_message(&self, group: GroupId, target: Identity, text: &str) -> SendResult {
        self.emit(format!("[{} -> group {group} @ {target}] {text}\n", self.name))
            .await
    }

    async fn send_direct_message(&self, target: Identity, text: &str) -> SendResult {
        self.emit(format!("[{} -> {target}] {text}\n", self.name))
            .await
    }
}
