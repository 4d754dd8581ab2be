//! Monotonic progress reporting.

use std::sync::atomic::{AtomicU8, Ordering};

use folio_core::ProgressEvent;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Sends [`ProgressEvent`]s to an optional listener.
///
/// Percentages never decrease: a report below the highest value seen so far is
/// raised to it. A dropped receiver is not an error; events are still logged.
#[derive(Debug, Default)]
pub struct ProgressReporter {
    sender: Option<UnboundedSender<ProgressEvent>>,
    highest: AtomicU8,
}

impl ProgressReporter {
    /// Report to `sender`.
    pub fn new(sender: UnboundedSender<ProgressEvent>) -> Self {
        Self {
            sender: Some(sender),
            highest: AtomicU8::new(0),
        }
    }

    /// Report to the log only.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Emit an event at `percent` (clamped to 100 and to the running maximum).
    pub fn report(&self, percent: u8, message: impl Into<String>) {
        let requested = percent.min(100);
        let previous = self.highest.fetch_max(requested, Ordering::SeqCst);
        let event = ProgressEvent::new(previous.max(requested), message);

        debug!(percent = *event.percent(), message = %event.message(), "Progress");
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    /// Highest percentage reported so far.
    pub fn percent(&self) -> u8 {
        self.highest.load(Ordering::SeqCst)
    }
}
