//! A rider's session: the network, its buses, and everything the rider
//! has configured, advanced one tick at a time.

use std::sync::Arc;

use companion_transit::prelude::*;
use tracing::{debug, info, warn};

use crate::alerts::{self, Alert, AlertFeed, EvaluationContext, NotificationSink, TracingSink};
use crate::clock::{Clock, SystemClock};
use crate::location::{LocationError, StopDirectory, UserLocation};
use crate::schedule::{ScheduleBook, ScheduleError, ScheduleUpdate, ScheduledRoute};
use crate::settings::NotificationSettings;
use crate::simulation::{BusState, MotionRandom, Simulator, seed::seed_buses};

pub mod driver;

pub use driver::{DEFAULT_TICK_PERIOD, run_session};

/// What a single tick did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Buses that reached a new stop
    pub arrivals: usize,
    /// Alerts published after the move
    pub alerts: usize,
}

pub struct Session<S = TracingSink> {
    topology: Arc<dyn RouteTopology>,
    simulator: Simulator,
    feed: AlertFeed,
    schedules: ScheduleBook,
    settings: NotificationSettings,
    selected_line: Option<LineIdentifier>,
    user_location: Option<UserLocation>,
    clock: Arc<dyn Clock>,
    sink: S,
}

impl Session<TracingSink> {
    /// The bundled campus network with its initial buses
    pub fn seeded() -> Self {
        Self::with_seed_buses(Arc::new(StaticTopology::seed()), TracingSink)
    }
}

impl<S: NotificationSink> Session<S> {
    pub fn new(topology: Arc<dyn RouteTopology>, buses: Vec<BusState>, sink: S) -> Self {
        Self {
            topology,
            simulator: Simulator::new(buses),
            feed: AlertFeed::new(),
            schedules: ScheduleBook::new(),
            settings: NotificationSettings::default(),
            selected_line: None,
            user_location: None,
            clock: Arc::new(SystemClock),
            sink,
        }
    }

    /// Start `topology` with the bundled initial bus positions
    pub fn with_seed_buses(topology: Arc<dyn RouteTopology>, sink: S) -> Self {
        let buses = seed_buses(SystemClock.now());
        Self::new(topology, buses, sink)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_settings(mut self, settings: NotificationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_feed(mut self, feed: AlertFeed) -> Self {
        self.feed = feed;
        self
    }

    pub fn topology(&self) -> &dyn RouteTopology {
        &*self.topology
    }

    pub fn buses(&self) -> &[BusState] {
        self.simulator.buses()
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn schedules(&self) -> &ScheduleBook {
        &self.schedules
    }

    pub fn user_location(&self) -> Option<&UserLocation> {
        self.user_location.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Move every bus one step, then run the alert rules
    pub fn tick(&mut self, random: &mut impl MotionRandom) -> TickSummary {
        let now = self.clock.now();
        let arrivals = self.simulator.tick(&*self.topology, random, now);
        let alerts = self.evaluate();

        debug!(arrivals, alerts, "tick");
        TickSummary { arrivals, alerts }
    }

    /// Run the alert rules against the current state, returning how many
    /// alerts were published
    pub fn evaluate(&mut self) -> usize {
        let ctx = EvaluationContext {
            topology: &*self.topology,
            buses: self.simulator.buses(),
            settings: &self.settings,
            schedules: &self.schedules,
            selected_line: self.selected_line.as_ref(),
            now: self.clock.now(),
        };
        let emissions = alerts::evaluate(&ctx, &self.feed);

        alerts::publish(emissions, &mut self.feed, &mut self.sink)
    }

    // ------------------------------------------------------------------
    // Tracking
    // ------------------------------------------------------------------

    /// Track a line for proximity alerts, or stop tracking with `None`
    pub fn select_line(&mut self, line: Option<LineIdentifier>) -> Result<()> {
        if let Some(id) = &line {
            self.topology.require_line(id)?;
        }

        self.selected_line = line;
        self.evaluate();
        Ok(())
    }

    pub fn selected_line(&self) -> Option<&Line> {
        self.topology.line(self.selected_line.as_ref()?)
    }

    pub fn selected_bus(&self) -> Option<&BusState> {
        self.simulator.bus_for_line(self.selected_line.as_ref()?)
    }

    // ------------------------------------------------------------------
    // Schedules
    // ------------------------------------------------------------------

    pub fn add_schedule(&mut self, route: ScheduledRoute) -> std::result::Result<(), ScheduleError> {
        self.topology.require_stop(&route.line_id, &route.stop_id)?;
        info!(schedule = %route.id, line = %route.line_id, stop = %route.stop_id, "schedule added");

        self.schedules.add(route)?;
        self.evaluate();
        Ok(())
    }

    pub fn update_schedule(
        &mut self,
        id: &ScheduleIdentifier,
        update: ScheduleUpdate,
    ) -> std::result::Result<(), ScheduleError> {
        let mut merged = self
            .schedules
            .get(id)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(id.clone()))?;
        merged.apply(update.clone());
        self.topology.require_stop(&merged.line_id, &merged.stop_id)?;

        self.schedules.update(id, update)?;
        self.evaluate();
        Ok(())
    }

    pub fn toggle_schedule(
        &mut self,
        id: &ScheduleIdentifier,
        enabled: bool,
    ) -> std::result::Result<(), ScheduleError> {
        self.schedules.toggle(id, enabled)?;
        self.evaluate();
        Ok(())
    }

    pub fn remove_schedule(&mut self, id: &ScheduleIdentifier) -> Option<ScheduledRoute> {
        let removed = self.schedules.remove(id);
        if removed.is_some() {
            self.evaluate();
        }
        removed
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn update_settings(&mut self, settings: NotificationSettings) {
        self.settings = settings;
        self.evaluate();
    }

    /// Turn the master switch on, as accepting the welcome prompt does
    pub fn enable_notifications(&mut self) {
        if !self.settings.alerts_enabled {
            self.settings.alerts_enabled = true;
            self.evaluate();
        }
    }

    // ------------------------------------------------------------------
    // Location
    // ------------------------------------------------------------------

    pub fn set_user_location(&mut self, location: Option<UserLocation>) {
        self.user_location = location;
    }

    /// Store a geolocation result. On failure the previous location is
    /// kept and the message to show the rider is returned.
    pub fn apply_location_result(
        &mut self,
        result: std::result::Result<UserLocation, LocationError>,
    ) -> Option<String> {
        match result {
            Ok(location) => {
                self.user_location = Some(location);
                None
            }
            Err(err) => {
                warn!(error = %err, "geolocation failed");
                Some(err.to_string())
            }
        }
    }

    /// Use a stop as the rider's location
    pub fn location_from_stop(&mut self, stop: &Stop) {
        self.user_location = Some(UserLocation::from_stop(stop));
    }

    pub fn stop_directory(&self) -> StopDirectory {
        StopDirectory::build(&*self.topology, self.user_location.as_ref())
    }

    // ------------------------------------------------------------------
    // Feed
    // ------------------------------------------------------------------

    pub fn alerts(&self) -> &[Alert] {
        self.feed.alerts()
    }

    pub fn feed(&self) -> &AlertFeed {
        &self.feed
    }

    pub fn dismiss_alert(&mut self, id: &AlertIdentifier) -> Option<Alert> {
        self.feed.remove(id)
    }

    pub fn clear_alerts(&mut self) -> usize {
        self.feed.clear()
    }
}
