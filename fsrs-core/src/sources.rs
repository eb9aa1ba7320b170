//! Injectable time and randomness.

use chrono::{DateTime, Utc};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of uniform draws in `[0, 1)` used for interval fuzzing.
pub trait FuzzSource {
    fn uniform(&mut self) -> f64;
}

pub struct RandSource<R: Rng>(pub R);

impl RandSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl RandSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FuzzSource for RandSource<R> {
    fn uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Always returns the same draw.
#[derive(Clone, Copy, Debug)]
pub struct FixedDraw(pub f64);

impl FuzzSource for FixedDraw {
    fn uniform(&mut self) -> f64 {
        self.0
    }
}
