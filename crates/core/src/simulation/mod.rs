//! Bus motion simulation.
//!
//! Every tick each bus either counts its ETA down by a minute or, once the
//! ETA has run out, arrives at the next stop on its (cyclic) line.

use chrono::NaiveDateTime;
use companion_transit::prelude::*;
use tracing::{debug, trace};

pub mod random;
pub mod seed;

pub use random::{MotionRandom, RngMotion};

/// One simulated vehicle's position and status on a line
#[derive(Clone, Debug, PartialEq)]
pub struct BusState {
    pub bus_id: BusIdentifier,
    pub line_id: LineIdentifier,
    /// 0-based position in the line's stop sequence
    pub current_stop_index: usize,
    pub latitude: f64,
    pub longitude: f64,
    /// Minutes until the next stop
    pub next_stop_eta: i32,
    pub is_delayed: bool,
    pub delay_minutes: u32,
    /// 0-100
    pub capacity_percent: u8,
    pub timestamp: NaiveDateTime,
}

impl BusState {
    /// Advance this bus by one tick along `line`.
    ///
    /// A line without stops leaves the bus untouched.
    pub fn advance(&mut self, line: &Line, random: &mut impl MotionRandom, now: NaiveDateTime) {
        let Some(next_index) = line.next_index(self.current_stop_index) else {
            return;
        };

        self.timestamp = now;

        if self.next_stop_eta > 0 {
            self.next_stop_eta -= 1;
            return;
        }

        self.current_stop_index = next_index;
        if let Some(stop) = line.stop_at(next_index) {
            self.latitude = stop.latitude;
            self.longitude = stop.longitude;
        }

        self.next_stop_eta = random.next_eta();

        // Delays are sticky: an arrival can set or refresh one, never clear it
        if let Some(minutes) = random.delay() {
            self.is_delayed = true;
            self.delay_minutes = minutes;
        }

        let capacity = i32::from(self.capacity_percent) + random.capacity_drift();
        self.capacity_percent = capacity.clamp(0, 100) as u8;
    }

    pub fn current_stop<'a>(&self, line: &'a Line) -> Option<&'a Stop> {
        line.stop_at(self.current_stop_index)
    }

    pub fn next_stop<'a>(&self, line: &'a Line) -> Option<&'a Stop> {
        line.stop_at(line.next_index(self.current_stop_index)?)
    }

    pub fn crowd_level(&self) -> CrowdLevel {
        CrowdLevel::from_capacity(self.capacity_percent)
    }
}

/// How full a bus feels to a rider
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum CrowdLevel {
    #[strum(to_string = "Plenty of space")]
    Plenty,
    #[strum(to_string = "Moderate crowd")]
    Moderate,
    #[strum(to_string = "Getting full")]
    GettingFull,
    #[strum(to_string = "Very full")]
    VeryFull,
}

impl CrowdLevel {
    pub fn from_capacity(percent: u8) -> Self {
        match percent {
            0..50 => Self::Plenty,
            50..75 => Self::Moderate,
            75..90 => Self::GettingFull,
            _ => Self::VeryFull,
        }
    }
}

/// Owner of every bus in a session
#[derive(Clone, Debug, Default)]
pub struct Simulator {
    buses: Vec<BusState>,
}

impl Simulator {
    pub fn new(buses: Vec<BusState>) -> Self {
        Self { buses }
    }

    pub fn buses(&self) -> &[BusState] {
        &self.buses
    }

    pub fn bus(&self, id: &BusIdentifier) -> Option<&BusState> {
        self.buses.iter().find(|bus| &bus.bus_id == id)
    }

    /// First bus running on `line`
    pub fn bus_for_line(&self, line: &LineIdentifier) -> Option<&BusState> {
        self.buses.iter().find(|bus| &bus.line_id == line)
    }

    /// Advance every bus by one tick, returning how many arrived at a stop.
    ///
    /// Buses referencing an unknown line are skipped.
    pub fn tick(
        &mut self,
        topology: &dyn RouteTopology,
        random: &mut impl MotionRandom,
        now: NaiveDateTime,
    ) -> usize {
        let mut arrivals = 0;

        for bus in &mut self.buses {
            let Some(line) = topology.line(&bus.line_id) else {
                debug!(bus = %bus.bus_id, line = %bus.line_id, "skipping bus on unknown line");
                continue;
            };

            let before = bus.current_stop_index;
            let was_due = bus.next_stop_eta <= 0;
            bus.advance(line, &mut *random, now);

            if was_due && line.stop_count() > 0 {
                arrivals += 1;
                trace!(
                    bus = %bus.bus_id,
                    from = before,
                    to = bus.current_stop_index,
                    eta = bus.next_stop_eta,
                    "bus arrived"
                );
            }
        }

        arrivals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::VecDeque;

    /// Replays fixed draws, falling back to neutral values once exhausted
    #[derive(Default)]
    struct Scripted {
        etas: VecDeque<i32>,
        delays: VecDeque<Option<u32>>,
        drifts: VecDeque<i32>,
    }

    impl MotionRandom for Scripted {
        fn next_eta(&mut self) -> i32 {
            self.etas.pop_front().unwrap_or(5)
        }

        fn delay(&mut self) -> Option<u32> {
            self.delays.pop_front().flatten()
        }

        fn capacity_drift(&mut self) -> i32 {
            self.drifts.pop_front().unwrap_or(0)
        }
    }

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn a_line() -> Line {
        StaticTopology::seed()
            .line(&LineIdentifier::new("a-line"))
            .unwrap()
            .clone()
    }

    fn bus(index: usize, eta: i32) -> BusState {
        BusState {
            bus_id: BusIdentifier::new("bus-a1"),
            line_id: LineIdentifier::new("a-line"),
            current_stop_index: index,
            latitude: 0.0,
            longitude: 0.0,
            next_stop_eta: eta,
            is_delayed: false,
            delay_minutes: 0,
            capacity_percent: 50,
            timestamp: t0(),
        }
    }

    #[test]
    fn test_countdown_only_touches_eta_and_timestamp() {
        let line = a_line();
        let mut state = bus(2, 3);
        let before = state.clone();
        let later = t0() + chrono::TimeDelta::minutes(1);

        state.advance(&line, &mut Scripted::default(), later);

        assert_eq!(state.next_stop_eta, 2);
        assert_eq!(state.timestamp, later);
        assert_eq!(
            BusState {
                next_stop_eta: before.next_stop_eta,
                timestamp: before.timestamp,
                ..state.clone()
            },
            before
        );
    }

    #[test]
    fn test_arrival_snaps_to_next_stop() {
        let line = a_line();
        let mut state = bus(1, 0);
        let mut random = Scripted {
            etas: VecDeque::from([6]),
            delays: VecDeque::from([None]),
            drifts: VecDeque::from([-4]),
        };

        state.advance(&line, &mut random, t0());

        assert_eq!(state.current_stop_index, 2);
        assert_eq!(state.latitude, line.stops[2].latitude);
        assert_eq!(state.longitude, line.stops[2].longitude);
        assert_eq!(state.next_stop_eta, 6);
        assert_eq!(state.capacity_percent, 46);
        assert!(!state.is_delayed);
    }

    #[test]
    fn test_cyclic_advance_from_last_stop() {
        let line = a_line();
        let last = line.stop_count() - 1;
        let mut state = bus(last, 0);

        state.advance(&line, &mut Scripted::default(), t0());
        assert_eq!(state.current_stop_index, 0);

        // Negative ETAs count as due too
        let mut state = bus(last, -3);
        state.advance(&line, &mut Scripted::default(), t0());
        assert_eq!(state.current_stop_index, 0);
    }

    #[test]
    fn test_delay_is_sticky() {
        let line = a_line();
        let mut state = bus(0, 0);
        let mut random = Scripted {
            delays: VecDeque::from([Some(4), None]),
            ..Default::default()
        };

        state.advance(&line, &mut random, t0());
        assert!(state.is_delayed);
        assert_eq!(state.delay_minutes, 4);

        state.next_stop_eta = 0;
        state.advance(&line, &mut random, t0());
        assert!(state.is_delayed);
        assert_eq!(state.delay_minutes, 4);
    }

    #[test]
    fn test_capacity_clamps() {
        let line = a_line();

        let mut full = BusState { capacity_percent: 95, ..bus(0, 0) };
        let mut random = Scripted {
            drifts: VecDeque::from([9]),
            ..Default::default()
        };
        full.advance(&line, &mut random, t0());
        assert_eq!(full.capacity_percent, 100);

        let mut empty = BusState { capacity_percent: 3, ..bus(0, 0) };
        let mut random = Scripted {
            drifts: VecDeque::from([-10]),
            ..Default::default()
        };
        empty.advance(&line, &mut random, t0());
        assert_eq!(empty.capacity_percent, 0);
    }

    #[test]
    fn test_capacity_stays_in_bounds_over_many_ticks() {
        let topology = StaticTopology::seed();
        let mut simulator = Simulator::new(seed::seed_buses(t0()));
        let mut random = RngMotion(StdRng::seed_from_u64(2024));

        for _ in 0..5_000 {
            simulator.tick(&topology, &mut random, t0());
            for bus in simulator.buses() {
                assert!(bus.capacity_percent <= 100);
                let line = topology.line(&bus.line_id).unwrap();
                assert!(bus.current_stop_index < line.stop_count());
            }
        }
    }

    #[test]
    fn test_unknown_line_is_skipped() {
        let topology = StaticTopology::seed();
        let mut stray = bus(0, 0);
        stray.line_id = LineIdentifier::new("z-line");
        let mut simulator = Simulator::new(vec![stray.clone(), bus(0, 0)]);

        let arrivals = simulator.tick(&topology, &mut Scripted::default(), t0());

        assert_eq!(arrivals, 1);
        assert_eq!(simulator.buses()[0], stray);
        assert_eq!(simulator.buses()[1].current_stop_index, 1);
    }

    #[test]
    fn test_empty_line_leaves_bus_untouched() {
        let line = Line { stops: vec![], ..a_line() };
        let mut state = bus(0, 0);
        let before = state.clone();

        state.advance(&line, &mut Scripted::default(), t0() + chrono::TimeDelta::hours(1));
        assert_eq!(state, before);
    }

    #[test]
    fn test_current_and_next_stop() {
        let line = a_line();
        let state = bus(4, 2);

        assert_eq!(state.current_stop(&line).map(|s| s.name.as_ref()), Some("Tercero"));
        assert_eq!(state.next_stop(&line).map(|s| s.name.as_ref()), Some("Memorial Union"));
    }

    #[test]
    fn test_crowd_levels() {
        assert_eq!(CrowdLevel::from_capacity(0), CrowdLevel::Plenty);
        assert_eq!(CrowdLevel::from_capacity(49), CrowdLevel::Plenty);
        assert_eq!(CrowdLevel::from_capacity(50), CrowdLevel::Moderate);
        assert_eq!(CrowdLevel::from_capacity(75), CrowdLevel::GettingFull);
        assert_eq!(CrowdLevel::from_capacity(90), CrowdLevel::VeryFull);
        assert_eq!(CrowdLevel::VeryFull.to_string(), "Very full");
    }
}
