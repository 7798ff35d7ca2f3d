use serde::{Deserialize, Serialize};

/// Unit direction in canvas space (`+x` right, `+y` down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub x: f64,
    pub y: f64,
}

impl Direction {
    /// Normalizes `(x, y)`. Degenerate or non-finite input yields `None`.
    pub fn new(x: f64, y: f64) -> Option<Self> {
        let len = x.hypot(y);
        if !len.is_finite() || len <= f64::EPSILON {
            return None;
        }
        Some(Self { x: x / len, y: y / len })
    }

    pub fn from_angle(radians: f64) -> Self {
        Self { x: radians.cos(), y: radians.sin() }
    }
}

/// Wind forcing shared by every particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    /// Metres per second.
    pub speed: f64,
    pub direction: Direction,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl WindVector {
    pub fn new(speed: f64, direction: Direction, timestamp: i64) -> Self {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        Self { speed, direction, timestamp }
    }
}
