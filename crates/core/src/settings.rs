//! Rider notification preferences.

use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Global notification toggles for a session.
///
/// Missing fields in a stored document take their default value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// Master switch; nothing fires while this is off
    pub alerts_enabled: bool,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    pub terminal_departure_alert: bool,
    pub delay_alerts: bool,
    /// Proximity window for the manually tracked line
    pub stops_away: u32,
    pub reduced_motion: bool,
    pub theme: Theme,
    /// Treat disabled schedules as enabled
    pub auto_notifications: bool,
    pub push_enabled: bool,
    pub in_app_enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            alerts_enabled: true,
            sound_enabled: true,
            vibration_enabled: true,
            terminal_departure_alert: true,
            delay_alerts: true,
            stops_away: 2,
            reduced_motion: false,
            theme: Theme::System,
            auto_notifications: false,
            push_enabled: true,
            in_app_enabled: true,
        }
    }
}
