//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in map space (pixels, x = right, y = down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of active ticks simulated so far.
    pub tick: u64,
    /// Elapsed game time in seconds (already scaled by the time scale).
    pub elapsed_secs: f64,
}

/// A polyline that enemies follow from a spawn point to the base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathCurve {
    pub points: Vec<Position>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Move toward `target` by at most `step`, never overshooting.
    pub fn step_toward(&self, target: &Position, step: f64) -> Position {
        let from = self.as_vec();
        let to = target.as_vec();
        let remaining = from.distance(to);
        if remaining <= step {
            return *target;
        }
        (from + (to - from) / remaining * step).into()
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for DVec2 {
    fn from(p: Position) -> Self {
        p.as_vec()
    }
}

impl SimTime {
    /// Advance by one tick covering `dt` seconds of game time.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl PathCurve {
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// First point of the path, or the origin for an empty path.
    pub fn start(&self) -> Position {
        self.points.first().copied().unwrap_or_default()
    }

    /// Last point of the path, or the origin for an empty path.
    pub fn end(&self) -> Position {
        self.points.last().copied().unwrap_or_default()
    }

    /// Point at normalized arc-length parameter `t` (clamped to [0, 1]).
    pub fn point_at(&self, t: f64) -> Position {
        let total = self.length();
        if total <= 0.0 {
            return self.start();
        }
        let mut remaining = t.clamp(0.0, 1.0) * total;
        for pair in self.points.windows(2) {
            let a = pair[0].as_vec();
            let b = pair[1].as_vec();
            let segment = a.distance(b);
            if remaining <= segment {
                if segment == 0.0 {
                    return pair[0];
                }
                return a.lerp(b, remaining / segment).into();
            }
            remaining -= segment;
        }
        self.end()
    }
}
