//! The event store seam and the deadline handed to it.

use crate::date_range::DateRange;
use crate::error::{CollageError, Result};
use crate::series::{SeriesIdentifier, TimeSeries};
use std::time::{Duration, Instant};

/// Source of time-series events.
pub trait EventStore {
    /// All series matching `identifier` (unset optional parts match
    /// anything), restricted to `range`, events in timestamp order.
    ///
    /// Implementations should give up with [`CollageError::Timeout`] once
    /// `deadline` has passed.
    fn query(
        &self,
        identifier: &SeriesIdentifier,
        range: &DateRange,
        deadline: Deadline,
    ) -> Result<TimeSeries>;
}

/// Point in time after which a fetch should be abandoned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Deadline(None)
    }

    pub fn after(timeout: Duration) -> Self {
        Deadline(Instant::now().checked_add(timeout))
    }

    /// Deadline for `timeout` from now, or none.
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map(Deadline::after).unwrap_or_default()
    }

    pub fn is_expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    /// `Err(Timeout)` for `identifier` if the deadline has passed.
    pub fn check(&self, identifier: &SeriesIdentifier) -> Result<()> {
        if self.is_expired() {
            return Err(CollageError::Timeout {
                identifier: identifier.to_string(),
            });
        }
        Ok(())
    }
}
