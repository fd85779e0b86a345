//! Day-of-week sets for recurring trips.
//!
//! Days are numbered the way riders' schedules store them: 0 = Sunday
//! through 6 = Saturday.

use chrono::Weekday;

use crate::models::types::{Result, TransitError};

/// Compact representation of the weekdays a recurring trip is active on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct WeekdayFlags {
    pub(crate) flags: u8,
}

impl WeekdayFlags {
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    pub fn set(&mut self, weekday: Weekday) {
        self.flags |= 1 << weekday.num_days_from_sunday();
    }

    pub fn unset(&mut self, weekday: Weekday) {
        self.flags &= !(1 << weekday.num_days_from_sunday());
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        (self.flags & (1 << weekday.num_days_from_sunday())) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.flags == 0
    }

    /// Build from day numbers (0 = Sunday .. 6 = Saturday)
    pub fn from_days(days: &[u8]) -> Result<Self> {
        let mut flags = Self::new();
        for &day in days {
            if day > 6 {
                return Err(TransitError::InvalidData(format!(
                    "day of week {} is outside 0..=6",
                    day
                )));
            }
            flags.flags |= 1 << day;
        }
        Ok(flags)
    }

    /// Day numbers in ascending order (0 = Sunday)
    pub fn days(&self) -> Vec<u8> {
        (0..7).filter(|day| self.flags & (1 << day) != 0).collect()
    }

    pub fn weekdays() -> Self {
        Self { flags: 0b0011_1110 }
    }

    pub fn every_day() -> Self {
        Self { flags: 0b0111_1111 }
    }
}

impl TryFrom<Vec<u8>> for WeekdayFlags {
    type Error = TransitError;

    fn try_from(days: Vec<u8>) -> Result<Self> {
        Self::from_days(&days)
    }
}

impl From<WeekdayFlags> for Vec<u8> {
    fn from(flags: WeekdayFlags) -> Self {
        flags.days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_flags() {
        let mut flags = WeekdayFlags::new();
        flags.set(Weekday::Mon);
        flags.set(Weekday::Wed);
        flags.set(Weekday::Fri);

        assert!(flags.contains(Weekday::Mon));
        assert!(!flags.contains(Weekday::Tue));
        assert!(flags.contains(Weekday::Wed));

        flags.unset(Weekday::Wed);
        assert!(!flags.contains(Weekday::Wed));
    }

    #[test]
    fn test_sunday_is_day_zero() {
        let flags = WeekdayFlags::from_days(&[0, 6]).unwrap();

        assert!(flags.contains(Weekday::Sun));
        assert!(flags.contains(Weekday::Sat));
        assert!(!flags.contains(Weekday::Mon));
        assert_eq!(flags.days(), vec![0, 6]);
    }

    #[test]
    fn test_out_of_range_day() {
        assert!(WeekdayFlags::from_days(&[1, 7]).is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(WeekdayFlags::weekdays().days(), vec![1, 2, 3, 4, 5]);
        assert_eq!(WeekdayFlags::every_day().days().len(), 7);
        assert!(WeekdayFlags::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_day_numbers() {
        let flags: WeekdayFlags = serde_json::from_str("[1, 3, 5]").unwrap();
        assert!(flags.contains(Weekday::Wed));
        assert_eq!(serde_json::to_string(&flags).unwrap(), "[1,3,5]");

        assert!(serde_json::from_str::<WeekdayFlags>("[9]").is_err());
    }
}
