//! Game configuration tables and their validation.
//!
//! A `GameConfig` is pure data: per-kind stat tables, the wave sequence,
//! economy constants and the map layout. `Default` holds the canonical
//! tables. Anything loaded from outside must pass [`GameConfig::validate`]
//! before the simulation accepts it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{PathCurve, Position};

/// Fatal configuration problems, reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no stat table for structure kind {0:?}")]
    MissingStructure(StructureKind),
    #[error("no stat table for enemy kind {0:?}")]
    MissingEnemy(EnemyKind),
    #[error("structure {0:?} has no levels")]
    EmptyLevels(StructureKind),
    #[error("structure {kind:?} has {levels} levels but {costs} upgrade costs")]
    UpgradeCostMismatch {
        kind: StructureKind,
        levels: usize,
        costs: usize,
    },
    #[error("structure {kind:?} level {level} carries a weapon that does not fit its kind")]
    WeaponMismatch { kind: StructureKind, level: usize },
    #[error("structure {kind:?} level {level} resistance {value} is outside [0, 1)")]
    InvalidResistance {
        kind: StructureKind,
        level: usize,
        value: f64,
    },
    #[error("{what} must be positive, got {value}")]
    NonPositive { what: String, value: f64 },
    #[error("wave {wave}: {reason}")]
    MalformedWave { wave: usize, reason: String },
    #[error("economy: {0}")]
    InvalidEconomy(String),
    #[error("map: {0}")]
    InvalidMap(String),
}

/// Complete configuration surface of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub structures: BTreeMap<StructureKind, StructureSpec>,
    pub enemies: BTreeMap<EnemyKind, EnemySpec>,
    pub waves: Vec<WaveDefinition>,
    pub economy: EconomyConfig,
    pub map: MapLayout,
    pub base_health: f64,
    /// Start the first wave automatically after this delay.
    #[serde(default)]
    pub first_wave_delay_secs: Option<f64>,
}

/// Cost and per-level stats of one structure kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSpec {
    pub cost: u32,
    pub build_time_secs: f64,
    pub levels: Vec<LevelSpec>,
    /// `upgrade_costs[n]` is the price of going from level `n` to `n + 1`.
    pub upgrade_costs: Vec<u32>,
}

/// Stats a structure takes on at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub health: f64,
    pub damage_resistance: f64,
    #[serde(default)]
    pub weapon: Option<WeaponSpec>,
}

/// Attack behaviour attached to a structure level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeaponSpec {
    /// Tower: nearest target in range, pursuit projectile.
    Ranged {
        range: f64,
        damage: f64,
        attack_interval_secs: f64,
        damage_type: DamageType,
    },
    /// Trap: first enemy in radius, damage plus slow.
    Trigger {
        radius: f64,
        damage: f64,
        slow_factor: f64,
        slow_duration_secs: f64,
        cooldown_secs: f64,
    },
}

/// Base stats of one enemy kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub health: f64,
    pub speed: f64,
    pub damage: f64,
    pub crystal_reward: u32,
}

/// One wave: spawn groups in order, then a break before the next wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    pub groups: Vec<SpawnGroup>,
    pub break_time_secs: f64,
}

/// `count` enemies of one kind from one side, `inter_spawn_delay_secs` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    pub enemy: EnemyKind,
    pub count: u32,
    pub inter_spawn_delay_secs: f64,
    #[serde(default)]
    pub side: SpawnSide,
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: u32,
    pub max: u32,
}

/// Economy constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    pub initial_resources: u32,
    pub combo_window_secs: f64,
    /// Multiplier gained per kill beyond the first in a combo.
    pub combo_step: f64,
    /// Interval of the background combo-decay check.
    pub combo_check_interval_secs: f64,
    /// Chance that a kill drops a resource pile.
    pub pile_chance: f64,
    /// Chance that a dropped pile is rare.
    pub rare_pile_chance: f64,
    pub normal_pile: ValueRange,
    pub rare_pile: ValueRange,
    /// Bonus piles scattered when a wave is cleared.
    pub wave_bonus_piles: u32,
    pub wave_bonus_pile_value: u32,
    /// Crystals charged per `repair_heal` hit points.
    pub repair_cost: u32,
    pub repair_heal: f64,
    pub repair_cooldown_secs: f64,
    pub upgrade_time_secs: f64,
}

/// Map geometry: spawn points, one path per spawn point, and the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    pub width: f64,
    pub height: f64,
    pub spawn_points: Vec<Position>,
    pub paths: Vec<PathCurve>,
    pub base: Position,
}

impl GameConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn structure(&self, kind: StructureKind) -> Option<&StructureSpec> {
        self.structures.get(&kind)
    }

    pub fn enemy(&self, kind: EnemyKind) -> Option<&EnemySpec> {
        self.enemies.get(&kind)
    }

    /// Check every table for completeness and sane values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in StructureKind::ALL {
            let spec = self
                .structures
                .get(&kind)
                .ok_or(ConfigError::MissingStructure(kind))?;
            validate_structure(kind, spec)?;
        }
        for kind in EnemyKind::ALL {
            let spec = self
                .enemies
                .get(&kind)
                .ok_or(ConfigError::MissingEnemy(kind))?;
            positive(&format!("{kind:?} health"), spec.health)?;
            positive(&format!("{kind:?} speed"), spec.speed)?;
            if spec.damage < 0.0 {
                return Err(ConfigError::NonPositive {
                    what: format!("{kind:?} damage"),
                    value: spec.damage,
                });
            }
        }
        for (index, wave) in self.waves.iter().enumerate() {
            validate_wave(index + 1, wave)?;
        }
        validate_economy(&self.economy)?;
        validate_map(&self.map)?;
        positive("base health", self.base_health)?;
        if let Some(delay) = self.first_wave_delay_secs {
            if delay < 0.0 {
                return Err(ConfigError::NonPositive {
                    what: "first wave delay".into(),
                    value: delay,
                });
            }
        }
        Ok(())
    }
}

fn positive(what: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            what: what.to_string(),
            value,
        })
    }
}

fn validate_structure(kind: StructureKind, spec: &StructureSpec) -> Result<(), ConfigError> {
    if spec.levels.is_empty() {
        return Err(ConfigError::EmptyLevels(kind));
    }
    if spec.upgrade_costs.len() != spec.levels.len() - 1 {
        return Err(ConfigError::UpgradeCostMismatch {
            kind,
            levels: spec.levels.len(),
            costs: spec.upgrade_costs.len(),
        });
    }
    positive(&format!("{kind:?} build time"), spec.build_time_secs)?;

    for (level, stats) in spec.levels.iter().enumerate() {
        positive(&format!("{kind:?} level {level} health"), stats.health)?;
        if !(0.0..1.0).contains(&stats.damage_resistance) {
            return Err(ConfigError::InvalidResistance {
                kind,
                level,
                value: stats.damage_resistance,
            });
        }
        let fits = matches!(
            (kind, &stats.weapon),
            (StructureKind::Wall, None)
                | (StructureKind::Tower, Some(WeaponSpec::Ranged { .. }))
                | (StructureKind::Trap, Some(WeaponSpec::Trigger { .. }))
        );
        if !fits {
            return Err(ConfigError::WeaponMismatch { kind, level });
        }
        match &stats.weapon {
            Some(WeaponSpec::Ranged {
                range,
                attack_interval_secs,
                ..
            }) => {
                positive(&format!("{kind:?} level {level} range"), *range)?;
                positive(
                    &format!("{kind:?} level {level} attack interval"),
                    *attack_interval_secs,
                )?;
            }
            Some(WeaponSpec::Trigger {
                radius,
                slow_factor,
                slow_duration_secs,
                cooldown_secs,
                ..
            }) => {
                positive(&format!("{kind:?} level {level} radius"), *radius)?;
                positive(&format!("{kind:?} level {level} slow factor"), *slow_factor)?;
                positive(
                    &format!("{kind:?} level {level} slow duration"),
                    *slow_duration_secs,
                )?;
                positive(&format!("{kind:?} level {level} cooldown"), *cooldown_secs)?;
            }
            None => {}
        }
    }
    Ok(())
}

fn validate_wave(wave: usize, definition: &WaveDefinition) -> Result<(), ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedWave { wave, reason };

    if definition.groups.is_empty() {
        return Err(malformed("no spawn groups".into()));
    }
    if definition.break_time_secs < 0.0 || !definition.break_time_secs.is_finite() {
        return Err(malformed(format!(
            "break time {} is negative",
            definition.break_time_secs
        )));
    }
    for (index, group) in definition.groups.iter().enumerate() {
        if group.count == 0 {
            return Err(malformed(format!("group {index} spawns no enemies")));
        }
        if group.inter_spawn_delay_secs < 0.0 || !group.inter_spawn_delay_secs.is_finite() {
            return Err(malformed(format!(
                "group {index} delay {} is negative",
                group.inter_spawn_delay_secs
            )));
        }
    }
    Ok(())
}

fn validate_economy(economy: &EconomyConfig) -> Result<(), ConfigError> {
    let invalid = |reason: &str| Err(ConfigError::InvalidEconomy(reason.to_string()));

    if economy.combo_window_secs < 0.0 {
        return invalid("combo window is negative");
    }
    if economy.combo_step < 0.0 {
        return invalid("combo step is negative");
    }
    if !(0.0..=1.0).contains(&economy.pile_chance)
        || !(0.0..=1.0).contains(&economy.rare_pile_chance)
    {
        return invalid("pile chances must lie in [0, 1]");
    }
    if economy.normal_pile.min > economy.normal_pile.max
        || economy.rare_pile.min > economy.rare_pile.max
    {
        return invalid("pile value range has min above max");
    }
    positive("combo check interval", economy.combo_check_interval_secs)?;
    positive("repair heal", economy.repair_heal)?;
    positive("upgrade time", economy.upgrade_time_secs)?;
    Ok(())
}

fn validate_map(map: &MapLayout) -> Result<(), ConfigError> {
    positive("map width", map.width)?;
    positive("map height", map.height)?;
    if map.spawn_points.is_empty() {
        return Err(ConfigError::InvalidMap("no spawn points".into()));
    }
    if map.paths.len() != map.spawn_points.len() {
        return Err(ConfigError::InvalidMap(format!(
            "{} spawn points but {} paths",
            map.spawn_points.len(),
            map.paths.len()
        )));
    }
    for (index, path) in map.paths.iter().enumerate() {
        if path.points.len() < 2 || path.length() <= 0.0 {
            return Err(ConfigError::InvalidMap(format!("path {index} has no length")));
        }
    }
    Ok(())
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            structures: default_structures(),
            enemies: default_enemies(),
            waves: default_waves(),
            economy: EconomyConfig::default(),
            map: MapLayout::default(),
            base_health: BASE_HEALTH,
            first_wave_delay_secs: Some(FIRST_WAVE_DELAY_SECS),
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_resources: 200,
            combo_window_secs: 2.0,
            combo_step: 0.1,
            combo_check_interval_secs: 0.1,
            pile_chance: 0.2,
            rare_pile_chance: 0.2,
            normal_pile: ValueRange { min: 30, max: 50 },
            rare_pile: ValueRange { min: 60, max: 80 },
            wave_bonus_piles: 3,
            wave_bonus_pile_value: 15,
            repair_cost: 15,
            repair_heal: 20.0,
            repair_cooldown_secs: 0.5,
            upgrade_time_secs: 3.0,
        }
    }
}

impl Default for MapLayout {
    /// Two entrances on the left and right edges whose paths meet in the
    /// middle and run north to the base.
    fn default() -> Self {
        let (w, h) = (MAP_WIDTH, MAP_HEIGHT);
        let left = PathCurve::new(vec![
            Position::new(0.0, h * 0.4),
            Position::new(w * 0.25, h * 0.4),
            Position::new(w * 0.25, h * 0.6),
            Position::new(w * 0.5, h * 0.6),
            Position::new(w * 0.5, h * 0.15),
        ]);
        let right = PathCurve::new(
            left.points
                .iter()
                .map(|p| Position::new(w - p.x, p.y))
                .collect(),
        );
        Self {
            width: w,
            height: h,
            spawn_points: vec![left.start(), right.start()],
            paths: vec![left, right],
            base: Position::new(w * 0.5, h * 0.15),
        }
    }
}

fn default_structures() -> BTreeMap<StructureKind, StructureSpec> {
    let wall = StructureSpec {
        cost: 20,
        build_time_secs: 1.5,
        levels: [(200.0, 0.5), (400.0, 0.6), (600.0, 0.7)]
            .into_iter()
            .map(|(health, damage_resistance)| LevelSpec {
                health,
                damage_resistance,
                weapon: None,
            })
            .collect(),
        upgrade_costs: vec![50, 100],
    };

    let tower = StructureSpec {
        cost: 40,
        build_time_secs: 2.0,
        levels: [(150.0, 30.0, 1.0), (200.0, 40.0, 0.8), (250.0, 50.0, 0.6)]
            .into_iter()
            .map(|(range, damage, attack_interval_secs)| LevelSpec {
                health: 100.0,
                damage_resistance: 0.0,
                weapon: Some(WeaponSpec::Ranged {
                    range,
                    damage,
                    attack_interval_secs,
                    damage_type: DamageType::Physical,
                }),
            })
            .collect(),
        upgrade_costs: vec![80, 160],
    };

    let trap = StructureSpec {
        cost: 30,
        build_time_secs: 1.0,
        levels: [(20.0, 0.5, 3.0), (30.0, 0.4, 2.5), (40.0, 0.3, 2.0)]
            .into_iter()
            .map(|(damage, slow_factor, cooldown_secs)| LevelSpec {
                health: 80.0,
                damage_resistance: 0.0,
                weapon: Some(WeaponSpec::Trigger {
                    radius: 50.0,
                    damage,
                    slow_factor,
                    slow_duration_secs: 2.0,
                    cooldown_secs,
                }),
            })
            .collect(),
        upgrade_costs: vec![60, 120],
    };

    BTreeMap::from([
        (StructureKind::Wall, wall),
        (StructureKind::Tower, tower),
        (StructureKind::Trap, trap),
    ])
}

fn default_enemies() -> BTreeMap<EnemyKind, EnemySpec> {
    let spec = |health, speed, damage, crystal_reward| EnemySpec {
        health,
        speed,
        damage,
        crystal_reward,
    };
    BTreeMap::from([
        (EnemyKind::Goblin, spec(50.0, 100.0, 10.0, 5)),
        (EnemyKind::Carrier, spec(100.0, 80.0, 15.0, 15)),
        (EnemyKind::Ogre, spec(300.0, 50.0, 30.0, 30)),
    ])
}

/// The canonical adaptive three-wave schedule.
pub fn default_waves() -> Vec<WaveDefinition> {
    let group = |enemy, count, inter_spawn_delay_secs, side| SpawnGroup {
        enemy,
        count,
        inter_spawn_delay_secs,
        side,
    };
    vec![
        WaveDefinition {
            groups: vec![group(EnemyKind::Goblin, 4, 2.0, SpawnSide::Left)],
            break_time_secs: 30.0,
        },
        WaveDefinition {
            groups: vec![
                group(EnemyKind::Goblin, 5, 1.5, SpawnSide::Left),
                group(EnemyKind::Goblin, 3, 1.5, SpawnSide::Right),
            ],
            break_time_secs: 30.0,
        },
        WaveDefinition {
            groups: vec![
                group(EnemyKind::Goblin, 3, 2.0, SpawnSide::Left),
                group(EnemyKind::Carrier, 2, 3.0, SpawnSide::Right),
                group(EnemyKind::Ogre, 1, 5.0, SpawnSide::Weakest),
            ],
            break_time_secs: 0.0,
        },
    ]
}
