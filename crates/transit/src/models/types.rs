//! Core data types and enums for bus network data.

use std::collections::HashSet;
use std::sync::Arc;

use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Fill pattern used when drawing a line. Purely visual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum LinePattern {
    #[default]
    Solid,
    Dots,
    Stripes,
    Grid,
    Waves,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A boarding point on a line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
    pub latitude: f64,
    pub longitude: f64,
    /// 1-based position within the owning line
    pub order: u32,
}

impl Stop {
    pub fn new(
        id: impl Into<StopIdentifier>,
        name: impl AsRef<str>,
        latitude: f64,
        longitude: f64,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
            latitude,
            longitude,
            order,
        }
    }

    /// Location as a `geo` point (x = longitude, y = latitude)
    pub fn location(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// A cyclic bus route.
///
/// Stops are listed in traversal order. After the last stop the bus wraps
/// back to the first one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub id: LineIdentifier,
    pub name: Arc<str>,
    /// Display color (hex RGB, e.g. "#0066CC")
    pub color: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pattern: LinePattern,
    pub stops: Vec<Stop>,
}

impl Line {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_at(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    pub fn stop(&self, id: &StopIdentifier) -> Option<&Stop> {
        self.stops.iter().find(|stop| &stop.id == id)
    }

    pub fn stop_index(&self, id: &StopIdentifier) -> Option<usize> {
        self.stops.iter().position(|stop| &stop.id == id)
    }

    pub fn serves(&self, id: &StopIdentifier) -> bool {
        self.stop(id).is_some()
    }

    /// Index following `index`, wrapping from the last stop to the first.
    ///
    /// Returns `None` for a line without stops.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if self.stops.is_empty() {
            None
        } else {
            Some((index + 1) % self.stops.len())
        }
    }

    /// Check that stop orders are dense, 1-based and follow listing order,
    /// and that stop ids are unique within the line.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.stops.len());

        for (index, stop) in self.stops.iter().enumerate() {
            let expected = index as u32 + 1;
            if stop.order != expected {
                return Err(TransitError::InvalidData(format!(
                    "stop {} on line {} has order {}, expected {}",
                    stop.id, self.id, stop.order, expected
                )));
            }

            if !seen.insert(&stop.id) {
                return Err(TransitError::InvalidData(format!(
                    "stop {} listed twice on line {}",
                    stop.id, self.id
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Stop {stop} not found on line {line}")]
    StopNotFound {
        line: LineIdentifier,
        stop: StopIdentifier,
    },

    #[error("Line not found: {0}")]
    LineNotFound(LineIdentifier),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn loop_line() -> Line {
        Line {
            id: LineIdentifier::new("loop"),
            name: "Loop".into(),
            color: "#000000".into(),
            pattern: LinePattern::Solid,
            stops: vec![
                Stop::new("l1", "First", 38.0, -121.0, 1),
                Stop::new("l2", "Second", 38.1, -121.0, 2),
                Stop::new("l3", "Third", 38.2, -121.0, 3),
            ],
        }
    }

    #[test]
    fn test_stop_lookup() {
        let line = loop_line();

        assert_eq!(line.stop_index(&StopIdentifier::new("l2")), Some(1));
        assert_eq!(line.stop(&StopIdentifier::new("l3")).map(|s| s.order), Some(3));
        assert!(line.stop(&StopIdentifier::new("missing")).is_none());
        assert!(line.serves(&StopIdentifier::new("l1")));
    }

    #[test]
    fn test_next_index_wraps() {
        let line = loop_line();

        assert_eq!(line.next_index(0), Some(1));
        assert_eq!(line.next_index(2), Some(0));

        let empty = Line { stops: vec![], ..loop_line() };
        assert_eq!(empty.next_index(0), None);
    }

    #[test]
    fn test_validate_rejects_gaps() {
        let mut line = loop_line();
        assert!(line.validate().is_ok());

        line.stops[2].order = 4;
        assert!(matches!(line.validate(), Err(TransitError::InvalidData(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_stop() {
        let mut line = loop_line();
        line.stops[1].id = StopIdentifier::new("l1");

        assert!(line.validate().is_err());
    }

    #[test]
    fn test_stop_location_axis_order() {
        let stop = Stop::new("s", "S", 38.5, -121.7, 1);
        let point = stop.location();

        assert_eq!(point.x(), -121.7);
        assert_eq!(point.y(), 38.5);
    }
}
