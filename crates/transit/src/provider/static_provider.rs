//! In-memory topology provider.
//!
//! Stores every line in memory with an id lookup map. Built from the
//! bundled seed network or from a JSON document of lines.

use std::collections::HashMap;

use crate::identifiers::*;
use crate::models::{traits::*, types::*};
use crate::provider::seed::seed_lines;

/// In-memory line store
#[derive(Clone, Debug, Default)]
pub struct StaticTopology {
    lines: Vec<Line>,
    line_map: HashMap<LineIdentifier, usize>,
}

impl StaticTopology {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from lines, validating each one
    pub fn from_lines(lines: Vec<Line>) -> Result<Self> {
        let mut line_map = HashMap::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            line.validate()?;

            if line_map.insert(line.id.clone(), index).is_some() {
                return Err(TransitError::InvalidData(format!(
                    "line {} defined twice",
                    line.id
                )));
            }
        }

        Ok(Self { lines, line_map })
    }

    /// The bundled campus network
    pub fn seed() -> Self {
        let lines = seed_lines();
        let line_map = lines
            .iter()
            .enumerate()
            .map(|(index, line)| (line.id.clone(), index))
            .collect();

        Self { lines, line_map }
    }

    /// Parse a JSON array of lines
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let lines: Vec<Line> = serde_json::from_str(json)
            .map_err(|e| TransitError::SerializationError(e.to_string()))?;

        Self::from_lines(lines)
    }
}

impl RouteTopology for StaticTopology {
    fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn line(&self, id: &LineIdentifier) -> Option<&Line> {
        self.line_map.get(id).and_then(|&index| self.lines.get(index))
    }
}
