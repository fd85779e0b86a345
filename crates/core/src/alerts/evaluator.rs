//! Alert rules.
//!
//! A pass looks at the current bus states and yields every alert whose
//! condition holds and whose id the feed doesn't suppress yet. Rules run in a fixed
//! order: terminal departures, delays, proximity to the end of the tracked
//! line, then scheduled trips.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDateTime};
use companion_transit::prelude::*;
use tracing::{debug, info};

use crate::alerts::notify::VIBRATION_PATTERN;
use crate::alerts::{Alert, AlertFeed, AlertKind, NotificationSink, Toast, count_noun};
use crate::schedule::{ScheduleBook, ScheduledRoute};
use crate::settings::NotificationSettings;
use crate::simulation::BusState;

/// Read-only snapshot a pass evaluates against
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub topology: &'a dyn RouteTopology,
    pub buses: &'a [BusState],
    pub settings: &'a NotificationSettings,
    pub schedules: &'a ScheduleBook,
    pub selected_line: Option<&'a LineIdentifier>,
    pub now: NaiveDateTime,
}

/// A freshly triggered alert and how to surface it
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub alert: Alert,
    pub toast: Toast,
    pub vibrate: bool,
}

struct Pass<'a, 'b> {
    ctx: &'b EvaluationContext<'a>,
    feed: &'b AlertFeed,
    emitted: HashSet<AlertIdentifier>,
    emissions: Vec<Emission>,
}

impl Pass<'_, '_> {
    fn emit(&mut self, alert: Alert, sound: bool, vibrate: bool) {
        if self.feed.suppresses(&alert.id) || !self.emitted.insert(alert.id.clone()) {
            return;
        }

        let toast = Toast::for_alert(&alert, sound);
        self.emissions.push(Emission {
            alert,
            toast,
            vibrate,
        });
    }

    fn emit_global(&mut self, alert: Alert) {
        let settings = self.ctx.settings;
        self.emit(alert, settings.sound_enabled, settings.vibration_enabled);
    }

    fn alert(
        &self,
        id: String,
        bus: &BusState,
        line: &Line,
        kind: AlertKind,
        message: String,
        stops_away: u32,
    ) -> Alert {
        Alert {
            id: AlertIdentifier::new(id),
            bus_id: bus.bus_id.clone(),
            line_name: line.name.clone(),
            message,
            stops_away,
            timestamp: self.ctx.now,
            kind,
        }
    }

    fn terminal(&mut self, bus: &BusState, line: &Line) {
        if bus.current_stop_index != 0 || bus.next_stop_eta != 1 {
            return;
        }

        let alert = self.alert(
            format!("terminal-{}", bus.bus_id),
            bus,
            line,
            AlertKind::Terminal,
            format!("{} just left the terminal", line.name),
            0,
        );
        self.emit_global(alert);
    }

    fn delay(&mut self, bus: &BusState, line: &Line) {
        if !bus.is_delayed {
            return;
        }

        let alert = self.alert(
            format!("delay-{}", bus.bus_id),
            bus,
            line,
            AlertKind::Delay,
            format!(
                "{} is delayed by {}",
                line.name,
                count_noun(bus.delay_minutes, "minute")
            ),
            0,
        );
        self.emit_global(alert);
    }

    fn proximity(&mut self, bus: &BusState, line: &Line) {
        let count = line.stop_count();
        if bus.current_stop_index + 1 >= count {
            return;
        }

        let remaining = (count - 1 - bus.current_stop_index) as u32;
        if remaining > self.ctx.settings.stops_away {
            return;
        }

        let Some(next) = line.stop_at(bus.current_stop_index + 1) else {
            return;
        };

        let alert = self.alert(
            format!("proximity-{}-{}", bus.bus_id, bus.current_stop_index),
            bus,
            line,
            AlertKind::Proximity,
            format!(
                "{} is {} away from {}!",
                line.name,
                count_noun(remaining, "stop"),
                next.name
            ),
            remaining,
        );
        self.emit_global(alert);
    }

    fn schedule(&mut self, route: &ScheduledRoute, bus: &BusState, line: &Line) {
        let Some(target) = line.stop_index(&route.stop_id) else {
            debug!(schedule = %route.id, stop = %route.stop_id, "schedule stop not on its line");
            return;
        };
        let Some(stop) = line.stop_at(target) else {
            return;
        };

        if target <= bus.current_stop_index {
            return;
        }
        let stops_away = (target - bus.current_stop_index) as u32;
        if stops_away != route.notify_stops_before {
            return;
        }

        let alert = self.alert(
            format!("schedule-{}-{}", route.id, bus.current_stop_index),
            bus,
            line,
            AlertKind::Schedule,
            format!(
                "Your {} to {} is {} away!",
                line.name,
                stop.name,
                count_noun(stops_away, "stop")
            ),
            stops_away,
        );

        let settings = self.ctx.settings;
        self.emit(
            alert,
            settings.sound_enabled && route.channels.sound(),
            settings.vibration_enabled && route.channels.vibration(),
        );
    }
}

/// Run every rule once and return the alerts that are new.
///
/// Ids the `feed` still suppresses are skipped, as are repeats within the
/// pass. Nothing fires while the master switch is off.
pub fn evaluate(ctx: &EvaluationContext<'_>, feed: &AlertFeed) -> Vec<Emission> {
    let settings = ctx.settings;
    if !settings.alerts_enabled {
        return Vec::new();
    }

    let mut pass = Pass {
        ctx,
        feed,
        emitted: HashSet::new(),
        emissions: Vec::new(),
    };

    for bus in ctx.buses {
        let Some(line) = ctx.topology.line(&bus.line_id) else {
            debug!(bus = %bus.bus_id, line = %bus.line_id, "bus on unknown line");
            continue;
        };

        if settings.terminal_departure_alert {
            pass.terminal(bus, line);
        }
        if settings.delay_alerts {
            pass.delay(bus, line);
        }
    }

    if let Some(selected) = ctx.selected_line {
        let tracked = ctx.buses.iter().find(|bus| &bus.line_id == selected);
        match (tracked, ctx.topology.line(selected)) {
            (Some(bus), Some(line)) => pass.proximity(bus, line),
            _ => debug!(line = %selected, "no bus to track on selected line"),
        }
    }

    let mut first_bus: HashMap<&LineIdentifier, &BusState> = HashMap::new();
    for bus in ctx.buses {
        first_bus.entry(&bus.line_id).or_insert(bus);
    }

    let today = ctx.now.weekday();
    for route in ctx.schedules.iter() {
        if !(settings.auto_notifications || route.enabled) {
            continue;
        }
        if !route.days_of_week.contains(today) {
            continue;
        }

        let Some(line) = ctx.topology.line(&route.line_id) else {
            debug!(schedule = %route.id, line = %route.line_id, "schedule on unknown line");
            continue;
        };
        let Some(bus) = first_bus.get(&route.line_id) else {
            continue;
        };

        pass.schedule(route, bus, line);
    }

    pass.emissions
}

/// Append emissions to the feed and surface them, returning how many
/// were published
pub fn publish(
    emissions: Vec<Emission>,
    feed: &mut AlertFeed,
    sink: &mut impl NotificationSink,
) -> usize {
    let count = emissions.len();

    for Emission {
        alert,
        toast,
        vibrate,
    } in emissions
    {
        info!(id = %alert.id, kind = %alert.kind, "alert fired");

        sink.notify(&alert, &toast);
        if vibrate {
            sink.vibrate(&VIBRATION_PATTERN);
        }
        feed.push(alert);
    }

    count
}
