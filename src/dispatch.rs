//! Async log dispatch
//!
//! Serialized records are queued on an unbounded channel and consumed by a
//! single worker task, so the request path never waits on sink I/O and
//! records reach the sink in submission order. If the worker falls behind,
//! items queue rather than push backpressure into request handling.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::severity::Severity;

/// Destination for serialized log records
///
/// Implementations must not block for long: the dispatcher worker is the
/// only consumer and a slow sink delays every queued record behind it.
pub trait LogSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Default sink writing through the `tracing` macros
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => tracing::error!(target: "logscope", "{message}"),
            Severity::Warning => tracing::warn!(target: "logscope", "{message}"),
            Severity::Info => tracing::info!(target: "logscope", "{message}"),
        }
    }
}

enum Item {
    Record { severity: Severity, message: String },
    Flush(oneshot::Sender<()>),
}

/// Handle to the single-worker log queue
///
/// Cheap to clone; all clones feed the same worker. The worker task exits
/// once every handle has been dropped and the queue is drained.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Item>,
    sink: Arc<dyn LogSink>,
}

impl Dispatcher {
    /// Spawn the worker task draining the queue into `sink`
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker_sink = Arc::clone(&sink);
        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                match item {
                    Item::Record { severity, message } => worker_sink.emit(severity, &message),
                    Item::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });

        Self { tx, sink }
    }

    /// Queue a serialized record; returns immediately
    ///
    /// Fire-and-forget: a closed queue (worker gone during shutdown) drops
    /// the record rather than surfacing an error to the request path.
    pub fn submit(&self, severity: Severity, message: String) {
        let _ = self.tx.send(Item::Record { severity, message });
    }

    /// Write directly to the sink, bypassing the queue
    ///
    /// Used for the downstream-failure record, which is emitted while the
    /// request is terminating abnormally.
    pub fn emit_sync(&self, severity: Severity, message: &str) {
        self.sink.emit(severity, message);
    }

    /// Wait until everything queued so far has reached the sink
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Item::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Sink that records every emission for assertions
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        entries: Mutex<Vec<(Severity, String)>>,
    }

    impl RecordingSink {
        pub(crate) fn entries(&self) -> Vec<(Severity, String)> {
            self.entries.lock().expect("sink lock").clone()
        }
    }

    impl LogSink for RecordingSink {
        fn emit(&self, severity: Severity, message: &str) {
            self.entries
                .lock()
                .expect("sink lock")
                .push((severity, message.to_string()));
        }
    }
}
