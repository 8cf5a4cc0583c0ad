//! Path motion: advances every enemy along its path as a linear tween.

use hecs::{Entity, World};

use rampart_core::components::{EnemyStatus, PathFollower};
use rampart_core::types::{PathCurve, Position};

use crate::lifecycle::advance_path;

/// Advance enemies by `dt` seconds. Enemies that reach the end of their
/// path this tick are pushed to `leaks`.
pub fn run(
    world: &mut World,
    roster: &[Entity],
    paths: &[PathCurve],
    dt: f64,
    leaks: &mut Vec<Entity>,
) {
    for &entity in roster {
        let Ok((status, follower, position)) =
            world.query_one_mut::<(&EnemyStatus, &mut PathFollower, &mut Position)>(entity)
        else {
            continue;
        };
        if !status.active || status.dead {
            continue;
        }
        let arrived = advance_path(follower, dt);
        if let Some(path) = paths.get(follower.path_index) {
            *position = path.point_at(follower.progress);
        }
        if arrived {
            leaks.push(entity);
        }
    }
}
