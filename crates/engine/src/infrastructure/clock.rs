//! Clock and random implementations.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Seeded random - reproducible sequences for replays and debugging.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic mid-draw leaves the generator usable, so ignore poisoning.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }
}

impl RandomPort for SeededRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.with_rng(|rng| rng.gen_range(min..=max))
    }

    fn gen_f64(&self) -> f64 {
        self.with_rng(|rng| rng.gen::<f64>())
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing: every integer draw is the lower bound plus
/// `offset` (capped at the upper bound) and every float draw is `fraction`.
#[cfg(test)]
pub struct FixedRandom {
    pub offset: i32,
    pub fraction: f64,
}

#[cfg(test)]
impl FixedRandom {
    pub fn low() -> Self {
        Self {
            offset: 0,
            fraction: 0.0,
        }
    }

    pub fn high() -> Self {
        Self {
            offset: i32::MAX / 2,
            fraction: 0.999,
        }
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        min.saturating_add(self.offset).min(max.max(min))
    }

    fn gen_f64(&self) -> f64 {
        self.fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let draws_a: Vec<i32> = (0..20).map(|_| a.gen_range(1, 20)).collect();
        let draws_b: Vec<i32> = (0..20).map(|_| b.gen_range(1, 20)).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|d| (1..=20).contains(d)));
    }

    #[test]
    fn seeded_floats_stay_in_unit_interval() {
        let random = SeededRandom::new(7);
        for _ in 0..100 {
            let f = random.gen_f64();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn degenerate_ranges_return_min() {
        assert_eq!(SystemRandom::new().gen_range(3, 3), 3);
        assert_eq!(SeededRandom::new(1).gen_range(5, 2), 5);
    }

    #[test]
    fn fixed_random_respects_bounds() {
        assert_eq!(FixedRandom::low().gen_range(1, 20), 1);
        assert_eq!(FixedRandom::high().gen_range(1, 20), 20);
    }
}
