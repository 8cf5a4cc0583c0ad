//! The builder: the player's avatar on the map.
//!
//! Holds position, the structure kind picked for placement, and the dash
//! cooldown. Movement itself is driven by input collaborators through
//! `MoveBuilder`; the simulation only clamps it to the map.

use glam::DVec2;

use rampart_core::config::MapLayout;
use rampart_core::constants::{DASH_COOLDOWN_SECS, DASH_DISTANCE};
use rampart_core::enums::StructureKind;
use rampart_core::types::Position;

#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub position: Position,
    pub selected: Option<StructureKind>,
    last_dash_secs: Option<f64>,
}

impl Builder {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn move_to(&mut self, target: Position, map: &MapLayout) {
        self.position = clamp_to_map(target, map);
    }

    /// Dash `DASH_DISTANCE` along (dx, dy). Returns the start and end
    /// points, or `None` while on cooldown or for a zero direction.
    pub fn dash(
        &mut self,
        dx: f64,
        dy: f64,
        now_secs: f64,
        map: &MapLayout,
    ) -> Option<(Position, Position)> {
        if self.dash_readiness(now_secs) < 1.0 {
            return None;
        }
        let direction = DVec2::new(dx, dy).try_normalize()?;
        let from = self.position;
        let to = clamp_to_map((from.as_vec() + direction * DASH_DISTANCE).into(), map);
        self.position = to;
        self.last_dash_secs = Some(now_secs);
        Some((from, to))
    }

    /// 0.0 right after a dash, rising to 1.0 when the next dash is allowed.
    pub fn dash_readiness(&self, now_secs: f64) -> f64 {
        match self.last_dash_secs {
            None => 1.0,
            Some(last) => ((now_secs - last) / DASH_COOLDOWN_SECS).clamp(0.0, 1.0),
        }
    }
}

/// Clamp a point to the map rectangle.
pub fn clamp_to_map(position: Position, map: &MapLayout) -> Position {
    Position::new(
        position.x.clamp(0.0, map.width),
        position.y.clamp(0.0, map.height),
    )
}

/// Whether a point lies inside the map rectangle.
pub fn inside_map(position: &Position, map: &MapLayout) -> bool {
    (0.0..=map.width).contains(&position.x) && (0.0..=map.height).contains(&position.y)
}
