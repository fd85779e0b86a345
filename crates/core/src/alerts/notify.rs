//! Transient notification surface.
//!
//! The engine hands every newly emitted alert to a [`NotificationSink`] as a
//! toast, optionally followed by a vibration request. Delivery is fire and
//! forget.

use std::time::Duration;

use tracing::info;

use crate::alerts::{Alert, AlertKind};

/// Vibration pattern in milliseconds: buzz, pause, buzz
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];

const TOAST_DURATION: Duration = Duration::from_secs(5);
const SCHEDULE_TOAST_DURATION: Duration = Duration::from_secs(7);

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Warning,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub duration: Duration,
    /// Whether the surface should play a sound with the toast
    pub sound: bool,
}

impl Toast {
    pub fn for_alert(alert: &Alert, sound: bool) -> Self {
        let (level, duration) = match alert.kind {
            AlertKind::Terminal => (ToastLevel::Info, TOAST_DURATION),
            AlertKind::Delay => (ToastLevel::Warning, TOAST_DURATION),
            AlertKind::Proximity => (ToastLevel::Success, TOAST_DURATION),
            AlertKind::Schedule => (ToastLevel::Success, SCHEDULE_TOAST_DURATION),
        };

        Self {
            level,
            message: alert.message.clone(),
            duration,
            sound,
        }
    }
}

pub trait NotificationSink {
    fn notify(&mut self, alert: &Alert, toast: &Toast);
    fn vibrate(&mut self, pattern: &[u32]);
}

/// Writes notifications to the tracing log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, alert: &Alert, toast: &Toast) {
        info!(
            kind = %alert.kind,
            level = %toast.level,
            bus = %alert.bus_id,
            sound = toast.sound,
            "{}",
            toast.message
        );
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        info!(?pattern, "vibrate");
    }
}

/// Keeps every notification it receives
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub toasts: Vec<Toast>,
    pub vibrations: Vec<Vec<u32>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, _alert: &Alert, toast: &Toast) {
        self.toasts.push(toast.clone());
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        self.vibrations.push(pattern.to_vec());
    }
}
