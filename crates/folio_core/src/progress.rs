//! Progress notifications.

/// One progress notification from a running pipeline.
///
/// # Examples
///
/// ```
/// use folio_core::ProgressEvent;
///
/// let event = ProgressEvent::new(140, "Packaging into ZIP...");
/// assert_eq!(*event.percent(), 100);
/// assert_eq!(event.to_string(), "[100%] Packaging into ZIP...");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_getters::Getters, derive_more::Display)]
#[display("[{}%] {}", percent, message)]
pub struct ProgressEvent {
    /// Completion estimate, 0 to 100
    percent: u8,
    /// What the run is doing
    message: String,
}

impl ProgressEvent {
    /// Create an event; percentages above 100 are clamped.
    pub fn new(percent: u8, message: impl Into<String>) -> Self {
        Self {
            percent: percent.min(100),
            message: message.into(),
        }
    }
}
