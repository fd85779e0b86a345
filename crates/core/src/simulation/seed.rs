//! Initial bus positions for the bundled campus network.

use chrono::NaiveDateTime;
use companion_transit::prelude::*;

use crate::simulation::BusState;

#[allow(clippy::too_many_arguments)]
fn bus(
    bus_id: &str,
    line_id: &str,
    current_stop_index: usize,
    latitude: f64,
    longitude: f64,
    next_stop_eta: i32,
    delay_minutes: u32,
    capacity_percent: u8,
    timestamp: NaiveDateTime,
) -> BusState {
    BusState {
        bus_id: BusIdentifier::new(bus_id),
        line_id: LineIdentifier::new(line_id),
        current_stop_index,
        latitude,
        longitude,
        next_stop_eta,
        is_delayed: delay_minutes > 0,
        delay_minutes,
        capacity_percent,
        timestamp,
    }
}

/// One bus each on the A, C, G, M and W lines
pub fn seed_buses(now: NaiveDateTime) -> Vec<BusState> {
    vec![
        bus("bus-a1", "a-line", 2, 38.5410, -121.7505, 3, 0, 45, now),
        bus("bus-c1", "c-line", 1, 38.5445, -121.7415, 5, 3, 85, now),
        bus("bus-g1", "g-line", 0, 38.5423, -121.7501, 2, 0, 30, now),
        bus("bus-m1", "m-line", 3, 38.5360, -121.7625, 4, 0, 60, now),
        bus("bus-w1", "w-line", 1, 38.5430, -121.7510, 6, 0, 40, now),
    ]
}
