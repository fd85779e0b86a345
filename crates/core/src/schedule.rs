//! Rider-defined recurring trips.
//!
//! A scheduled route watches one stop on one line on chosen weekdays and
//! asks for an alert when the line's bus is a set number of stops away.
//! The time of day is kept for display only; it never gates an alert.

use chrono::NaiveTime;
use companion_transit::prelude::{
    LineIdentifier, ScheduleIdentifier, StopIdentifier, TransitError, WeekdayFlags,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Schedule not found: {0}")]
    NotFound(ScheduleIdentifier),

    #[error("Schedule already exists: {0}")]
    Duplicate(ScheduleIdentifier),

    #[error("Invalid time of day {0:?}, expected HH:mm")]
    InvalidTime(String),

    #[error("Schedule must be active on at least one day")]
    EmptyDays,

    #[error(transparent)]
    Topology(#[from] TransitError),
}

/// Per-route channel toggles. An absent toggle counts as on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOverrides {
    /// Per-route stop alert switch as set by the rider; stored only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibration_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_app_enabled: Option<bool>,
}

impl ChannelOverrides {
    pub fn alerts(&self) -> bool {
        self.alerts_enabled.unwrap_or(true)
    }

    pub fn sound(&self) -> bool {
        self.sound_enabled.unwrap_or(true)
    }

    pub fn vibration(&self) -> bool {
        self.vibration_enabled.unwrap_or(true)
    }

    pub fn push(&self) -> bool {
        self.push_enabled.unwrap_or(true)
    }

    pub fn in_app(&self) -> bool {
        self.in_app_enabled.unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRoute {
    pub id: ScheduleIdentifier,
    pub line_id: LineIdentifier,
    pub stop_id: StopIdentifier,
    pub days_of_week: WeekdayFlags,
    /// Nominal departure time, "HH:mm"
    pub time: String,
    pub notify_stops_before: u32,
    pub enabled: bool,
    #[serde(flatten)]
    pub channels: ChannelOverrides,
}

impl ScheduledRoute {
    pub fn new(
        id: impl Into<ScheduleIdentifier>,
        line_id: impl Into<LineIdentifier>,
        stop_id: impl Into<StopIdentifier>,
        days_of_week: WeekdayFlags,
        time: impl Into<String>,
        notify_stops_before: u32,
    ) -> Self {
        Self {
            id: id.into(),
            line_id: line_id.into(),
            stop_id: stop_id.into(),
            days_of_week,
            time: time.into(),
            notify_stops_before,
            enabled: true,
            channels: ChannelOverrides::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        NaiveTime::parse_from_str(&self.time, "%H:%M")
            .map_err(|_| ScheduleError::InvalidTime(self.time.clone()))?;

        if self.days_of_week.is_empty() {
            return Err(ScheduleError::EmptyDays);
        }

        Ok(())
    }

    /// Merge the fields present in `update` into this route
    pub fn apply(&mut self, update: ScheduleUpdate) {
        let ScheduleUpdate {
            line_id,
            stop_id,
            days_of_week,
            time,
            notify_stops_before,
            enabled,
            alerts_enabled,
            sound_enabled,
            vibration_enabled,
            push_enabled,
            in_app_enabled,
        } = update;

        if let Some(line_id) = line_id {
            self.line_id = line_id;
        }
        if let Some(stop_id) = stop_id {
            self.stop_id = stop_id;
        }
        if let Some(days) = days_of_week {
            self.days_of_week = days;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(threshold) = notify_stops_before {
            self.notify_stops_before = threshold;
        }
        if let Some(enabled) = enabled {
            self.enabled = enabled;
        }
        if alerts_enabled.is_some() {
            self.channels.alerts_enabled = alerts_enabled;
        }
        if sound_enabled.is_some() {
            self.channels.sound_enabled = sound_enabled;
        }
        if vibration_enabled.is_some() {
            self.channels.vibration_enabled = vibration_enabled;
        }
        if push_enabled.is_some() {
            self.channels.push_enabled = push_enabled;
        }
        if in_app_enabled.is_some() {
            self.channels.in_app_enabled = in_app_enabled;
        }
    }
}

/// Partial edit of a [`ScheduledRoute`]; `None` leaves a field unchanged
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleUpdate {
    pub line_id: Option<LineIdentifier>,
    pub stop_id: Option<StopIdentifier>,
    pub days_of_week: Option<WeekdayFlags>,
    pub time: Option<String>,
    pub notify_stops_before: Option<u32>,
    pub enabled: Option<bool>,
    pub alerts_enabled: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub vibration_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
}

/// The rider's scheduled routes, in creation order
#[derive(Clone, Debug, Default)]
pub struct ScheduleBook {
    routes: Vec<ScheduledRoute>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, route: ScheduledRoute) -> Result<(), ScheduleError> {
        route.validate()?;

        if self.get(&route.id).is_some() {
            return Err(ScheduleError::Duplicate(route.id));
        }

        self.routes.push(route);
        Ok(())
    }

    /// Apply a partial update. The route is left untouched if the result
    /// would be invalid.
    pub fn update(
        &mut self,
        id: &ScheduleIdentifier,
        update: ScheduleUpdate,
    ) -> Result<&ScheduledRoute, ScheduleError> {
        let route = self
            .routes
            .iter_mut()
            .find(|route| &route.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.clone()))?;

        let mut edited = route.clone();
        edited.apply(update);
        edited.validate()?;
        *route = edited;

        Ok(route)
    }

    pub fn toggle(&mut self, id: &ScheduleIdentifier, enabled: bool) -> Result<(), ScheduleError> {
        self.update(
            id,
            ScheduleUpdate {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .map(|_| ())
    }

    pub fn remove(&mut self, id: &ScheduleIdentifier) -> Option<ScheduledRoute> {
        let index = self.routes.iter().position(|route| &route.id == id)?;
        Some(self.routes.remove(index))
    }

    pub fn get(&self, id: &ScheduleIdentifier) -> Option<&ScheduledRoute> {
        self.routes.iter().find(|route| &route.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledRoute> {
        self.routes.iter()
    }

    pub fn for_line<'a>(
        &'a self,
        line: &'a LineIdentifier,
    ) -> impl Iterator<Item = &'a ScheduledRoute> {
        self.routes.iter().filter(move |route| &route.line_id == line)
    }

    /// Routes grouped by line, lines in order of their first route
    pub fn by_line(&self) -> Vec<(&LineIdentifier, Vec<&ScheduledRoute>)> {
        let mut groups = self.routes.iter().into_group_map_by(|route| &route.line_id);

        self.routes
            .iter()
            .map(|route| &route.line_id)
            .unique()
            .filter_map(|line| groups.remove(line).map(|routes| (line, routes)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commute() -> ScheduledRoute {
        ScheduledRoute::new(
            "schedule-1",
            "a-line",
            "a4",
            WeekdayFlags::weekdays(),
            "08:15",
            2,
        )
    }

    #[test]
    fn test_add_and_get() {
        let mut book = ScheduleBook::new();
        book.add(commute()).unwrap();

        let route = book.get(&ScheduleIdentifier::new("schedule-1")).unwrap();
        assert!(route.enabled);
        assert!(route.channels.vibration());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_add_rejects_duplicates_and_invalid() {
        let mut book = ScheduleBook::new();
        book.add(commute()).unwrap();
        assert!(matches!(book.add(commute()), Err(ScheduleError::Duplicate(_))));

        let mut late = commute();
        late.id = ScheduleIdentifier::new("schedule-2");
        late.time = "25:00".into();
        assert!(matches!(book.add(late), Err(ScheduleError::InvalidTime(_))));

        let mut never = commute();
        never.id = ScheduleIdentifier::new("schedule-3");
        never.days_of_week = WeekdayFlags::new();
        assert!(matches!(book.add(never), Err(ScheduleError::EmptyDays)));
    }

    #[test]
    fn test_partial_update_merges() {
        let mut book = ScheduleBook::new();
        book.add(commute()).unwrap();

        let updated = book
            .update(
                &ScheduleIdentifier::new("schedule-1"),
                ScheduleUpdate {
                    notify_stops_before: Some(3),
                    vibration_enabled: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.notify_stops_before, 3);
        assert!(!updated.channels.vibration());
        assert!(updated.channels.sound());
        assert_eq!(updated.time, "08:15");
        assert_eq!(updated.stop_id.as_str(), "a4");
    }

    #[test]
    fn test_invalid_update_leaves_route() {
        let mut book = ScheduleBook::new();
        book.add(commute()).unwrap();
        let id = ScheduleIdentifier::new("schedule-1");

        let result = book.update(
            &id,
            ScheduleUpdate {
                time: Some("soon".into()),
                enabled: Some(false),
                ..Default::default()
            },
        );

        assert!(result.is_err());
        assert_eq!(book.get(&id), Some(&commute()));
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut book = ScheduleBook::new();
        book.add(commute()).unwrap();
        let id = ScheduleIdentifier::new("schedule-1");

        book.toggle(&id, false).unwrap();
        assert!(!book.get(&id).unwrap().enabled);

        assert!(book.remove(&id).is_some());
        assert!(book.is_empty());
        assert!(matches!(book.toggle(&id, true), Err(ScheduleError::NotFound(_))));
    }

    #[test]
    fn test_by_line_keeps_first_seen_order() {
        let mut book = ScheduleBook::new();
        book.add(ScheduledRoute::new("s1", "m-line", "m3", WeekdayFlags::every_day(), "07:00", 1))
            .unwrap();
        book.add(ScheduledRoute::new("s2", "a-line", "a3", WeekdayFlags::every_day(), "07:30", 1))
            .unwrap();
        book.add(ScheduledRoute::new("s3", "m-line", "m5", WeekdayFlags::every_day(), "17:00", 2))
            .unwrap();

        let groups = book.by_line();
        let summary: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|(line, routes)| {
                (line.as_str(), routes.iter().map(|r| r.id.as_str()).collect())
            })
            .collect();

        assert_eq!(
            summary,
            vec![("m-line", vec!["s1", "s3"]), ("a-line", vec!["s2"])]
        );
        assert_eq!(book.for_line(&LineIdentifier::new("m-line")).count(), 2);
    }

    #[test]
    fn test_json_layout() {
        let mut route = commute();
        route.channels.push_enabled = Some(false);

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["lineId"], "a-line");
        assert_eq!(json["daysOfWeek"], serde_json::json!([1, 2, 3, 4, 5]));
        assert_eq!(json["notifyStopsBefore"], 2);
        assert_eq!(json["pushEnabled"], false);
        assert!(json.get("soundEnabled").is_none());

        let back: ScheduledRoute = serde_json::from_value(json).unwrap();
        assert_eq!(back, route);
    }

    #[test]
    fn test_stop_alert_switch_survives_storage() {
        let stored = r#"{
            "id": "s",
            "lineId": "a-line",
            "stopId": "a4",
            "daysOfWeek": [1],
            "time": "08:15",
            "notifyStopsBefore": 2,
            "enabled": true,
            "alertsEnabled": false
        }"#;

        let mut route: ScheduledRoute = serde_json::from_str(stored).unwrap();
        assert!(!route.channels.alerts());
        assert!(route.channels.sound());

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["alertsEnabled"], false);

        route.apply(ScheduleUpdate {
            alerts_enabled: Some(true),
            ..Default::default()
        });
        assert!(route.channels.alerts());
        assert!(commute().channels.alerts_enabled.is_none());
    }
}
