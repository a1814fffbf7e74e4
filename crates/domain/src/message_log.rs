use std::fmt;

/// Outcome of one dispatch attempt. Failed and simulated sends are logged
/// with their own status so they still count towards the same-day dedup
/// check, which keeps a failing recipient from being retried until the
/// next calendar day.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageStatus {
    Sent,
    Dry,
    Error(String),
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Sent => write!(f, "SENT"),
            MessageStatus::Dry => write!(f, "DRY"),
            MessageStatus::Error(detail) => write!(f, "ERROR: {}", detail),
        }
    }
}

/// One immutable row of the append-only send log.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLogEntry {
    pub timestamp_millis: i64,
    /// Normalized recipient identifier, not the raw source phone text
    pub recipient: String,
    /// The code token as dispatched, e.g. `E-05`
    pub code: String,
    pub status: MessageStatus,
}
