//! Entity lifecycle: damage, death, slow, construction, repair and upgrade.
//!
//! Capabilities are traits implemented per component rather than a class
//! hierarchy: `Damageable` for anything with health, `Attacker` for the
//! two structure weapons. Structure state transitions are free functions
//! over `StructureCore`.

use rampart_core::components::*;
use rampart_core::config::{LevelSpec, StructureSpec, WeaponSpec};
use rampart_core::constants::MIN_STRUCTURE_DAMAGE;
use rampart_core::enums::{DamageType, StructureState};

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Target was already dead or destroyed.
    Ignored,
    /// Health reduced, target survives.
    Hurt { applied: f64 },
    /// This hit took health to zero. Returned once per target.
    Destroyed { applied: f64 },
}

/// Anything that has health and can be destroyed.
pub trait Damageable {
    fn health(&self) -> f64;
    fn is_destroyed(&self) -> bool;
    fn take_damage(&mut self, amount: f64, damage_type: DamageType) -> DamageOutcome;
}

/// A weapon that fires at enemies within a reach, gated by a cooldown.
pub trait Attacker {
    /// Radius within which targets are considered.
    fn reach(&self) -> f64;
    fn is_ready(&self, now_secs: f64) -> bool;
    fn mark_fired(&mut self, now_secs: f64);
    /// Replace stats with a level's weapon table. Returns false if the
    /// table is for the other weapon kind.
    fn apply_level(&mut self, weapon: &WeaponSpec) -> bool;
}

impl Damageable for EnemyStats {
    fn health(&self) -> f64 {
        self.health
    }

    fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Enemies have no resistance; damage type is irrelevant.
    fn take_damage(&mut self, amount: f64, _damage_type: DamageType) -> DamageOutcome {
        if self.is_destroyed() {
            return DamageOutcome::Ignored;
        }
        let applied = amount.max(0.0).min(self.health);
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            DamageOutcome::Destroyed { applied }
        } else {
            DamageOutcome::Hurt { applied }
        }
    }
}

impl Damageable for StructureCore {
    fn health(&self) -> f64 {
        self.health
    }

    fn is_destroyed(&self) -> bool {
        self.state == StructureState::Destroyed
    }

    fn take_damage(&mut self, amount: f64, damage_type: DamageType) -> DamageOutcome {
        if self.is_destroyed() {
            return DamageOutcome::Ignored;
        }
        let effective = effective_structure_damage(amount, damage_type, self.damage_resistance);
        let applied = effective.min(self.health);
        self.health = (self.health - effective).max(0.0);

        if self.health <= 0.0 {
            self.state = StructureState::Destroyed;
            return DamageOutcome::Destroyed { applied };
        }
        // Building and Upgrading keep their state while taking hits.
        if self.state == StructureState::Active {
            self.state = StructureState::Damaged;
        }
        DamageOutcome::Hurt { applied }
    }
}

/// True damage passes through untouched; everything else is reduced by
/// resistance, floored, and never drops below one point.
pub fn effective_structure_damage(amount: f64, damage_type: DamageType, resistance: f64) -> f64 {
    match damage_type {
        DamageType::True => amount,
        DamageType::Physical | DamageType::Magical => {
            (amount * (1.0 - resistance)).floor().max(MIN_STRUCTURE_DAMAGE)
        }
    }
}

impl Attacker for TowerWeapon {
    fn reach(&self) -> f64 {
        self.range
    }

    fn is_ready(&self, now_secs: f64) -> bool {
        self.last_attack_secs
            .map_or(true, |last| now_secs - last >= self.attack_interval_secs)
    }

    fn mark_fired(&mut self, now_secs: f64) {
        self.last_attack_secs = Some(now_secs);
    }

    fn apply_level(&mut self, weapon: &WeaponSpec) -> bool {
        let WeaponSpec::Ranged {
            range,
            damage,
            attack_interval_secs,
            damage_type,
        } = *weapon
        else {
            return false;
        };
        self.range = range;
        self.damage = damage;
        self.attack_interval_secs = attack_interval_secs;
        self.damage_type = damage_type;
        true
    }
}

impl Attacker for TrapTrigger {
    fn reach(&self) -> f64 {
        self.radius
    }

    fn is_ready(&self, _now_secs: f64) -> bool {
        self.ready
    }

    fn mark_fired(&mut self, now_secs: f64) {
        self.ready = false;
        self.last_trigger_secs = Some(now_secs);
    }

    fn apply_level(&mut self, weapon: &WeaponSpec) -> bool {
        let WeaponSpec::Trigger {
            radius,
            damage,
            slow_factor,
            slow_duration_secs,
            cooldown_secs,
        } = *weapon
        else {
            return false;
        };
        self.radius = radius;
        self.damage = damage;
        self.slow_factor = slow_factor;
        self.slow_duration_secs = slow_duration_secs;
        self.cooldown_secs = cooldown_secs;
        true
    }
}

// ---- Enemies ----

/// Apply damage to an enemy. On the killing hit, marks it dead and stops
/// its path motion. Returns true only for the killing hit.
pub fn damage_enemy(
    stats: &mut EnemyStats,
    status: &mut EnemyStatus,
    follower: &mut PathFollower,
    amount: f64,
) -> bool {
    if status.dead {
        return false;
    }
    match stats.take_damage(amount, DamageType::Physical) {
        DamageOutcome::Destroyed { .. } => {
            status.dead = true;
            follower.paused = true;
            true
        }
        DamageOutcome::Hurt { .. } | DamageOutcome::Ignored => false,
    }
}

/// Seconds to cover the rest of the path at `speed`.
pub fn remaining_duration(follower: &PathFollower, speed: f64) -> f64 {
    if speed <= 0.0 {
        return f64::INFINITY;
    }
    (1.0 - follower.progress).max(0.0) * follower.path_length / speed
}

/// Slow an enemy by `factor`. Ignored if it is already slowed or dead.
/// Progress is kept; only the rate for the remainder changes.
pub fn slow_enemy(
    stats: &mut EnemyStats,
    status: &mut EnemyStatus,
    follower: &mut PathFollower,
    factor: f64,
) -> bool {
    if status.slowed || status.dead {
        return false;
    }
    status.slowed = true;
    stats.current_speed = stats.base_speed * factor;
    follower.remaining_secs = remaining_duration(follower, stats.current_speed);
    true
}

/// Restore base speed after a slow, if the enemy is alive and still on its path.
pub fn end_slow(stats: &mut EnemyStats, status: &mut EnemyStatus, follower: &mut PathFollower) {
    if status.dead || !status.active || follower.progress >= 1.0 {
        return;
    }
    status.slowed = false;
    stats.current_speed = stats.base_speed;
    follower.remaining_secs = remaining_duration(follower, stats.current_speed);
}

/// Advance path progress by `dt` seconds of a linear tween. Returns true
/// when the end of the path is reached on this step.
pub fn advance_path(follower: &mut PathFollower, dt: f64) -> bool {
    if follower.paused || follower.progress >= 1.0 {
        return false;
    }
    if follower.remaining_secs <= dt {
        follower.progress = 1.0;
        follower.remaining_secs = 0.0;
        return true;
    }
    follower.progress += (1.0 - follower.progress) * dt / follower.remaining_secs;
    follower.progress = follower.progress.min(1.0);
    follower.remaining_secs -= dt;
    false
}

// ---- Structures ----

/// Placing -> Building, with progress reset.
pub fn start_building(core: &mut StructureCore) -> bool {
    if core.state != StructureState::Placing {
        return false;
    }
    core.state = StructureState::Building;
    core.build_progress = 0.0;
    true
}

/// Advance construction. Returns true on the step that completes it.
pub fn advance_build(core: &mut StructureCore, dt: f64) -> bool {
    if core.state != StructureState::Building {
        return false;
    }
    core.build_progress += dt / core.build_time_secs;
    if core.build_progress >= 1.0 {
        core.build_progress = 1.0;
        core.state = StructureState::Active;
        return true;
    }
    false
}

/// Heal up to max health. A fully healed damaged structure becomes Active.
/// Returns the health actually restored.
pub fn repair(core: &mut StructureCore, amount: f64) -> f64 {
    if matches!(
        core.state,
        StructureState::Destroyed | StructureState::Placing | StructureState::Building
    ) {
        return 0.0;
    }
    let before = core.health;
    core.health = (core.health + amount.max(0.0)).min(core.max_health);
    if core.health >= core.max_health && core.state == StructureState::Damaged {
        core.state = StructureState::Active;
    }
    core.health - before
}

/// Whether the structure has another level to go to.
pub fn can_upgrade(core: &StructureCore, spec: &StructureSpec) -> bool {
    core.state != StructureState::Destroyed && (core.level as usize + 1) < spec.levels.len()
}

/// Move to the next level and apply its stat table (health reset to the
/// new max). Fails at max level or when destroyed.
pub fn upgrade(core: &mut StructureCore, spec: &StructureSpec) -> bool {
    if !can_upgrade(core, spec) {
        return false;
    }
    core.level += 1;
    apply_level(core, &spec.levels[core.level as usize]);
    true
}

/// Overwrite health and resistance from a level table.
pub fn apply_level(core: &mut StructureCore, level: &LevelSpec) {
    core.max_health = level.health;
    core.health = level.health;
    core.damage_resistance = level.damage_resistance;
}

/// Advance an upgrade in progress. Returns true on the step that finishes it;
/// the caller then applies `upgrade`.
pub fn advance_upgrade(core: &mut StructureCore, dt: f64, upgrade_time_secs: f64) -> bool {
    if core.state != StructureState::Upgrading {
        return false;
    }
    core.upgrade_progress = (core.upgrade_progress + dt / upgrade_time_secs).min(1.0);
    core.upgrade_progress >= 1.0
}

/// Whether the structure's weapon may act this tick.
pub fn is_operational(core: &StructureCore) -> bool {
    matches!(core.state, StructureState::Active | StructureState::Damaged)
}
