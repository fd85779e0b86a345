//! Alert records, the feed that holds them, and the rules that emit them.

use std::sync::Arc;

use chrono::NaiveDateTime;
use companion_transit::prelude::*;

pub mod evaluator;
pub mod feed;
pub mod notify;

pub use evaluator::{Emission, EvaluationContext, evaluate, publish};
pub use feed::AlertFeed;
pub use notify::{NotificationSink, RecordingSink, Toast, ToastLevel, TracingSink};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Proximity,
    Terminal,
    Delay,
    Schedule,
}

/// A one-shot notification record.
///
/// The id is derived from the triggering event, so evaluating a condition
/// that still holds yields the same id again.
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub id: AlertIdentifier,
    pub bus_id: BusIdentifier,
    pub line_name: Arc<str>,
    pub message: String,
    /// 0 when the alert isn't about an approaching stop
    pub stops_away: u32,
    pub timestamp: NaiveDateTime,
    pub kind: AlertKind,
}

impl Alert {
    pub fn age(&self, now: NaiveDateTime) -> String {
        relative_age(self.timestamp, now)
    }
}

/// "Just now", "5m ago", "3h ago", or the calendar date once a day has passed
pub fn relative_age(timestamp: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - timestamp).num_minutes();

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    timestamp.format("%-m/%-d/%Y").to_string()
}

/// "1 stop", "3 stops"
pub(crate) fn count_noun(count: u32, noun: &str) -> String {
    if count > 1 {
        format!("{count} {noun}s")
    } else {
        format!("{count} {noun}")
    }
}
