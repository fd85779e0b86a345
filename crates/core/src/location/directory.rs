//! Every stop in the network, once per name, ordered for the rider.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use companion_transit::geo::Point;
use companion_transit::prelude::*;
use itertools::Itertools;

use crate::location::UserLocation;

/// A line calling at a stop, and the stop's position on it
#[derive(Clone, Debug, PartialEq)]
pub struct ServingLine {
    pub line_id: LineIdentifier,
    pub line_name: Arc<str>,
    pub color: Arc<str>,
    pub stop_order: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StopEntry {
    /// First stop seen under this name
    pub stop: Stop,
    /// Sorted by line name
    pub lines: Vec<ServingLine>,
    /// Distance from the rider, when a location is known
    pub distance_km: Option<f64>,
}

impl StopEntry {
    pub fn formatted_distance(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }

    pub fn location(&self) -> Point {
        self.stop.location()
    }
}

/// Stops deduplicated by name.
///
/// With a rider location entries are nearest first, ties broken by name.
/// Without one they are in name order.
#[derive(Clone, Debug)]
pub struct StopDirectory {
    entries: Vec<StopEntry>,
    index: StopIndex,
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl StopDirectory {
    pub fn build(topology: &dyn RouteTopology, location: Option<&UserLocation>) -> Self {
        let mut entries: Vec<StopEntry> = Vec::new();
        let mut by_name: HashMap<Arc<str>, usize> = HashMap::new();

        for line in topology.lines() {
            for stop in &line.stops {
                let slot = *by_name.entry(stop.name.clone()).or_insert_with(|| {
                    entries.push(StopEntry {
                        stop: stop.clone(),
                        lines: Vec::new(),
                        distance_km: None,
                    });
                    entries.len() - 1
                });

                entries[slot].lines.push(ServingLine {
                    line_id: line.id.clone(),
                    line_name: line.name.clone(),
                    color: line.color.clone(),
                    stop_order: stop.order,
                });
            }
        }

        for entry in &mut entries {
            entry
                .lines
                .sort_by(|a, b| compare_names(&a.line_name, &b.line_name));

            entry.distance_km = location.map(|here| {
                distance_km(
                    here.latitude,
                    here.longitude,
                    entry.stop.latitude,
                    entry.stop.longitude,
                )
            });
        }

        let entries: Vec<StopEntry> = entries
            .into_iter()
            .sorted_by(|a, b| {
                let by_distance = match (a.distance_km, b.distance_km) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    _ => Ordering::Equal,
                };
                by_distance.then_with(|| compare_names(&a.stop.name, &b.stop.name))
            })
            .collect();

        let index = StopIndex::new(entries.iter().map(StopEntry::location));

        Self { entries, index }
    }

    pub fn entries(&self) -> &[StopEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&StopEntry> {
        self.entries
            .iter()
            .find(|entry| entry.stop.name.as_ref() == name)
    }

    /// Entries whose name contains `query`, ignoring case. Surrounding
    /// whitespace is part of the query; a blank query matches everything.
    pub fn filter(&self, query: &str) -> Vec<&StopEntry> {
        if query.trim().is_empty() {
            return self.entries.iter().collect();
        }
        let query = query.to_lowercase();

        self.entries
            .iter()
            .filter(|entry| entry.stop.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Entries within walking distance of `point`, nearest first, with the
    /// distance in meters
    pub fn stops_near(&self, point: Point, radius_m: f64) -> Vec<(&StopEntry, f64)> {
        self.index
            .within(point, radius_m)
            .into_iter()
            .filter_map(|(slot, meters)| self.entries.get(slot).map(|entry| (entry, meters)))
            .collect()
    }
}
