//! Wall-clock source for record timestamps.
//!
//! RULE: Ledgers never call `Utc::now()` directly. They ask a Clock,
//! so tests can pin and advance time.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The real UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Each `now()` call returns the
/// current instant and then steps forward by `step`, so consecutive
/// records get strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<Timestamp>,
    step:    Duration,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { current: Cell::new(start), step: Duration::zero() }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn set(&self, at: Timestamp) {
        self.current.set(at);
    }

    pub fn advance(&self, by: Duration) -> Timestamp {
        let next = self.current.get() + by;
        self.current.set(next);
        next
    }

    pub fn peek(&self) -> Timestamp {
        self.current.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let at = self.current.get();
        self.current.set(at + self.step);
        at
    }
}
