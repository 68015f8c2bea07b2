//! `tracing` integration: feeds emitted events into a [`LogRelay`].
//!
//! ```text
//! info!(..) ──► RelayLayer::on_event ──► [bounded queue] ──► worker ──► LogRelay::handle
//!                     │                        │
//!                     └─ own targets ignored   └─ full: local sink only
//! ```
//!
//! The worker awaits each `handle` call before taking the next event, so
//! queued events reach the local sink in emission order. Every event reaches
//! the local sink exactly once, even when the queue overflows or the worker
//! is shutting down; only chat delivery is lost in those cases.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::field::{Field, Visit};
use tracing::{debug, Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use super::event::LogEvent;
use super::sink::LocalSink;
use super::LogRelay;

/// Events queued between the layer and the relay worker.
pub const RELAY_QUEUE_CAPACITY: usize = 256;

/// Events from these targets never reach the relay, which would otherwise
/// relay its own diagnostics.
const IGNORED_TARGET_PREFIX: &str = "relayd::relay";

/// Layer that forwards every event it sees to a relay worker.
#[derive(Clone)]
pub struct RelayLayer {
    sender: mpsc::Sender<LogEvent>,
    sink: Arc<dyn LocalSink>,
}

impl RelayLayer {
    pub(crate) fn channel(
        capacity: usize,
        sink: Arc<dyn LocalSink>,
    ) -> (Self, mpsc::Receiver<LogEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender, sink }, receiver)
    }
}

impl<S: Subscriber> Layer<S> for RelayLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(IGNORED_TARGET_PREFIX) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let log_event = LogEvent::new(*metadata.level(), metadata.target(), visitor.finish());

        // Full or closed queue: no chat delivery, but the local write still happens.
        if let Err(rejected) = self.sender.try_send(log_event) {
            self.sink.write(&rejected.into_inner());
        }
    }
}

/// Collects the `message` field plus any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }
}

/// Spawns the relay worker and returns the layer feeding it.
///
/// The worker stops when `cancel` fires or every `RelayLayer` clone is
/// dropped. Cancellation also abandons the send in flight; events still
/// queued at that point are written to the local sink without chat delivery.
pub fn spawn_relay(relay: LogRelay, cancel: CancellationToken) -> (RelayLayer, JoinHandle<()>) {
    let (layer, mut receiver) = RelayLayer::channel(RELAY_QUEUE_CAPACITY, relay.sink.clone());

    let worker = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = receiver.recv() => match next {
                    Some(event) => {
                        relay.handle(&event, &cancel).await;
                    }
                    None => break,
                }
            }
        }

        // Later events go straight to the sink from the layer
        receiver.close();
        let mut drained = 0usize;
        while let Ok(event) = receiver.try_recv() {
            relay.sink.write(&event);
            drained += 1;
        }

        debug!(drained, "Relay worker stopped");
    });

    (layer, worker)
}
