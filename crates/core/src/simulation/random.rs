//! Random draws made when a bus arrives at a stop.
//!
//! The simulator never touches a random number generator directly; it asks
//! a [`MotionRandom`] so tests can script exact sequences.

use std::ops::RangeInclusive;

use rand::Rng;

/// Minutes to the next stop, drawn on every arrival
pub const ETA_MINUTES: RangeInclusive<i32> = 3..=7;

/// Chance that an arrival injects a (new) delay
pub const DELAY_PROBABILITY: f64 = 0.2;

/// Delay magnitude in minutes when one is injected
pub const DELAY_MINUTES: RangeInclusive<u32> = 1..=5;

/// Capacity change in percentage points applied on every arrival
pub const CAPACITY_DRIFT: RangeInclusive<i32> = -10..=9;

pub trait MotionRandom {
    /// Minutes until the following stop
    fn next_eta(&mut self) -> i32;

    /// `Some(minutes)` when this arrival injects a delay
    fn delay(&mut self) -> Option<u32>;

    /// Signed change to the capacity percentage
    fn capacity_drift(&mut self) -> i32;
}

impl<M: MotionRandom + ?Sized> MotionRandom for &mut M {
    fn next_eta(&mut self) -> i32 {
        (**self).next_eta()
    }

    fn delay(&mut self) -> Option<u32> {
        (**self).delay()
    }

    fn capacity_drift(&mut self) -> i32 {
        (**self).capacity_drift()
    }
}

/// [`MotionRandom`] backed by any `rand` generator
#[derive(Clone, Debug)]
pub struct RngMotion<R>(pub R);

impl<R: Rng> MotionRandom for RngMotion<R> {
    fn next_eta(&mut self) -> i32 {
        self.0.random_range(ETA_MINUTES)
    }

    fn delay(&mut self) -> Option<u32> {
        if self.0.random_bool(DELAY_PROBABILITY) {
            Some(self.0.random_range(DELAY_MINUTES))
        } else {
            None
        }
    }

    fn capacity_drift(&mut self) -> i32 {
        self.0.random_range(CAPACITY_DRIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_draws_stay_in_range() {
        let mut motion = RngMotion(StdRng::seed_from_u64(7));
        let mut delays = 0;

        for _ in 0..2_000 {
            assert!(ETA_MINUTES.contains(&motion.next_eta()));
            assert!(CAPACITY_DRIFT.contains(&motion.capacity_drift()));
            if let Some(minutes) = motion.delay() {
                assert!(DELAY_MINUTES.contains(&minutes));
                delays += 1;
            }
        }

        // Roughly one arrival in five is delayed
        assert!((250..=550).contains(&delays), "got {delays} delays");
    }

    #[test]
    fn test_seeded_draws_replay() {
        let mut a = RngMotion(StdRng::seed_from_u64(99));
        let mut b = RngMotion(StdRng::seed_from_u64(99));

        for _ in 0..50 {
            assert_eq!(a.next_eta(), b.next_eta());
            assert_eq!(a.delay(), b.delay());
            assert_eq!(a.capacity_drift(), b.capacity_drift());
        }
    }
}
