//! Time types for PARALLAX.
//!
//! Trace timestamps are synthetic monitoring data, not wall-clock time.
//! A `Timestamp` is a point on a trace's time axis; a `TimeOffset` is a
//! signed distance between two points, which is what the rewriters
//! accumulate when a connection's latency changes.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub};

/// A point in time within a recorded trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Timestamp zero
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create from raw value
    #[must_use]
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

/// A signed distance between two timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOffset(i64);

impl TimeOffset {
    /// Offset zero
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Create from raw value
    #[must_use]
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Get raw value
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this offset is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add<TimeOffset> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: TimeOffset) -> Timestamp {
        Timestamp(self.0 + rhs.0)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = TimeOffset;

    fn sub(self, rhs: Timestamp) -> TimeOffset {
        TimeOffset(self.0 - rhs.0)
    }
}

impl Add for TimeOffset {
    type Output = TimeOffset;

    fn add(self, rhs: TimeOffset) -> TimeOffset {
        TimeOffset(self.0 + rhs.0)
    }
}

impl AddAssign for TimeOffset {
    fn add_assign(&mut self, rhs: TimeOffset) {
        self.0 += rhs.0;
    }
}

impl Sub for TimeOffset {
    type Output = TimeOffset;

    fn sub(self, rhs: TimeOffset) -> TimeOffset {
        TimeOffset(self.0 - rhs.0)
    }
}

impl Neg for TimeOffset {
    type Output = TimeOffset;

    fn neg(self) -> TimeOffset {
        TimeOffset(-self.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={}", self.0)
    }
}

impl std::fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.0)
    }
}
