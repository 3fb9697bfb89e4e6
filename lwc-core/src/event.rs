use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flag value for an event that passed validation.
pub const FLAG_RELIABLE: i32 = 0;

/// A single point-in-time measurement from a time series.
///
/// Events are read from the event store and never mutated by the
/// statistics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Measurement time, normalised to UTC.
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Quality/validity code as delivered by the source.
    pub flag: i32,
    pub comment: Option<String>,
}

impl Event {
    /// Create a reliable event without a comment.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Event {
            timestamp,
            value,
            flag: FLAG_RELIABLE,
            comment: None,
        }
    }

    pub fn with_flag(mut self, flag: i32) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
