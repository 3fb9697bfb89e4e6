/// Error types for collage statistics
use thiserror::Error;

/// Main error type for fetching, filtering and aggregating collage series
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollageError {
    /// Series identifier lacks a required field
    #[error("Series identifier is missing required field: {field}")]
    MissingIdentifier { field: &'static str },

    /// Identifier resolved to zero or several series in the event store
    #[error("Series {identifier} resolved to {found} series (expected exactly one)")]
    AmbiguousSeries { identifier: String, found: usize },

    /// Event store query failed
    #[error("Failed to fetch series {identifier}: {message}")]
    UpstreamFetch { identifier: String, message: String },

    /// Event store query ran past its deadline
    #[error("Timed out fetching series {identifier}")]
    Timeout { identifier: String },

    /// Period filter configuration is out of range
    #[error("Invalid period filter: {0}")]
    InvalidPeriodSpec(String),

    /// Query range starts after it ends
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },
}

impl CollageError {
    /// True for errors that fail a single collage item rather than a whole run.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            CollageError::MissingIdentifier { .. }
                | CollageError::AmbiguousSeries { .. }
                | CollageError::UpstreamFetch { .. }
                | CollageError::Timeout { .. }
        )
    }
}

/// Type alias for Results using CollageError
pub type Result<T> = std::result::Result<T, CollageError>;
