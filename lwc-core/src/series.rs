use crate::error::{CollageError, Result};
use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder printed for unset optional identifier parts.
const UNSET: &str = "-";

/// Composite key addressing one time series in the event store.
///
/// `location` and `parameter` are required. The optional parts act as
/// wildcards when the identifier is resolved against the store, so one
/// identifier can match several concrete series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesIdentifier {
    pub source: String,
    pub location: String,
    pub parameter: String,
    pub module: Option<String>,
    pub qualifier: Option<String>,
    pub timestep: Option<String>,
}

impl SeriesIdentifier {
    pub fn new(
        source: impl Into<String>,
        location: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        SeriesIdentifier {
            source: source.into(),
            location: location.into(),
            parameter: parameter.into(),
            module: None,
            qualifier: None,
            timestep: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn with_timestep(mut self, timestep: impl Into<String>) -> Self {
        self.timestep = Some(timestep.into());
        self
    }

    /// Check that the fields needed for a store lookup are present.
    pub fn validate(&self) -> Result<()> {
        if self.location.trim().is_empty() {
            return Err(CollageError::MissingIdentifier { field: "location" });
        }
        if self.parameter.trim().is_empty() {
            return Err(CollageError::MissingIdentifier { field: "parameter" });
        }
        Ok(())
    }

    /// True if every part set on `self` equals the same part of `resolved`.
    pub fn matches(&self, resolved: &SeriesIdentifier) -> bool {
        fn part_matches(pattern: &Option<String>, value: &Option<String>) -> bool {
            pattern.is_none() || pattern == value
        }
        self.source == resolved.source
            && self.location == resolved.location
            && self.parameter == resolved.parameter
            && part_matches(&self.module, &resolved.module)
            && part_matches(&self.qualifier, &resolved.qualifier)
            && part_matches(&self.timestep, &resolved.timestep)
    }
}

impl fmt::Display for SeriesIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.source,
            self.location,
            self.parameter,
            self.module.as_deref().unwrap_or(UNSET),
            self.qualifier.as_deref().unwrap_or(UNSET),
            self.timestep.as_deref().unwrap_or(UNSET),
        )
    }
}

/// Events grouped by the concrete series they belong to.
///
/// Kept as an ordered list of pairs rather than a map so it serialises
/// to JSON for the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries(pub Vec<(SeriesIdentifier, Vec<Event>)>);

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Events of the series for `identifier`, opening an empty series if
    /// it is not present yet.
    ///
    /// A resolved series with no events in range is still one series.
    pub fn open(&mut self, identifier: &SeriesIdentifier) -> &mut Vec<Event> {
        let at = match self.0.iter().position(|(id, _)| id == identifier) {
            Some(at) => at,
            None => {
                self.0.push((identifier.clone(), Vec::new()));
                self.0.len() - 1
            }
        };
        &mut self.0[at].1
    }

    /// Append an event to the series for `identifier`, opening it if needed.
    pub fn push(&mut self, identifier: &SeriesIdentifier, event: Event) {
        self.open(identifier).push(event);
    }

    /// Events of the only series, or `AmbiguousSeries` when `requested`
    /// resolved to zero or several series.
    pub fn single(&self, requested: &SeriesIdentifier) -> Result<&[Event]> {
        match self.0.as_slice() {
            [(_, events)] => Ok(events),
            other => Err(CollageError::AmbiguousSeries {
                identifier: requested.to_string(),
                found: other.len(),
            }),
        }
    }
}
