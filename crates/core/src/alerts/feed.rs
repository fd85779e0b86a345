//! Insertion-ordered alert feed.

use std::collections::HashSet;

use companion_transit::identifiers::AlertIdentifier;

use crate::alerts::Alert;

/// Alerts in the order they were emitted.
///
/// With a capacity limit the oldest alert is dropped to make room. A dropped
/// alert still suppresses its condition; only `remove` and `clear` let it
/// fire again.
#[derive(Clone, Debug, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
    capacity: Option<usize>,
    /// Ids of every alert pushed and not yet removed, stored or not
    live: HashSet<AlertIdentifier>,
}

impl AlertFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            alerts: Vec::with_capacity(capacity),
            capacity: Some(capacity),
            live: HashSet::new(),
        }
    }

    pub fn push(&mut self, alert: Alert) {
        self.live.insert(alert.id.clone());

        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if self.alerts.len() >= capacity {
                let overflow = self.alerts.len() + 1 - capacity;
                self.alerts.drain(..overflow);
            }
        }
        self.alerts.push(alert);
    }

    pub fn remove(&mut self, id: &AlertIdentifier) -> Option<Alert> {
        self.live.remove(id);
        let index = self.alerts.iter().position(|alert| &alert.id == id)?;
        Some(self.alerts.remove(index))
    }

    /// Drop every alert, returning how many there were
    pub fn clear(&mut self) -> usize {
        let count = self.alerts.len();
        self.alerts.clear();
        self.live.clear();
        count
    }

    /// Whether an alert with `id` is stored
    pub fn contains(&self, id: &AlertIdentifier) -> bool {
        self.alerts.iter().any(|alert| &alert.id == id)
    }

    /// Whether an alert with `id` was pushed and not since removed, even if
    /// the capacity limit has dropped it
    pub fn suppresses(&self, id: &AlertIdentifier) -> bool {
        self.live.contains(id)
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
