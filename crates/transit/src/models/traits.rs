//! Core traits for network topology.
//!
//! These traits define the read-only interface the simulator, alert rules
//! and stop directory consume. Implementations can be in-memory, loaded from
//! a document, or backed by a live feed.

use crate::identifiers::*;
use crate::models::types::*;

/// Provider of bus lines and their stops
pub trait RouteTopology: Send + Sync {
    /// All lines in display order
    fn lines(&self) -> &[Line];

    fn line(&self, id: &LineIdentifier) -> Option<&Line>;

    fn stop(&self, line: &LineIdentifier, stop: &StopIdentifier) -> Option<&Stop> {
        self.line(line)?.stop(stop)
    }

    fn require_line(&self, id: &LineIdentifier) -> Result<&Line> {
        self.line(id)
            .ok_or_else(|| TransitError::LineNotFound(id.clone()))
    }

    fn require_stop(&self, line: &LineIdentifier, stop: &StopIdentifier) -> Result<&Stop> {
        self.require_line(line)?
            .stop(stop)
            .ok_or_else(|| TransitError::StopNotFound {
                line: line.clone(),
                stop: stop.clone(),
            })
    }

    /// Lines that serve both stops, in display order
    fn lines_between(&self, from: &StopIdentifier, to: &StopIdentifier) -> Vec<&Line> {
        self.lines()
            .iter()
            .filter(|line| line.serves(from) && line.serves(to))
            .collect()
    }
}
