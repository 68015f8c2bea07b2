//! Local log sinks, written before any chat delivery is attempted.

use std::io::Write;
use std::sync::Mutex;

use super::event::LogEvent;
use super::layout::{Layout, Render};

/// Synchronous local destination for every event the relay sees.
pub trait LocalSink: Send + Sync {
    fn write(&self, event: &LogEvent);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LocalSink for NullSink {
    fn write(&self, _event: &LogEvent) {}
}

/// Writes one rendered line per event to any `Write` implementor.
///
/// I/O errors are dropped: a local sink has nowhere better to report them.
pub struct WriterSink<W> {
    writer: Mutex<W>,
    layout: Layout,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W, layout: Layout) -> Self {
        Self {
            writer: Mutex::new(writer),
            layout,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

impl<W: Write + Send> LocalSink for WriterSink<W> {
    fn write(&self, event: &LogEvent) {
        let line = self.layout.render(event);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}
