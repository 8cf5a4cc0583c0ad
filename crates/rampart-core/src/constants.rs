//! Simulation constants and tuning parameters.
//!
//! Per-kind stat tables live in [`crate::config`]; these are the fixed
//! rules that do not vary between configurations.

/// Nominal frame rate the headless driver steps at (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal frame rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper bound accepted by `SetTimeScale`.
pub const MAX_TIME_SCALE: f64 = 4.0;

// --- Map ---

/// Placement grid cell size. Two structures may not sit closer than this.
pub const GRID_CELL_SIZE: f64 = 64.0;

/// Default map width.
pub const MAP_WIDTH: f64 = 1280.0;

/// Default map height.
pub const MAP_HEIGHT: f64 = 720.0;

/// Starting health of the defended base.
pub const BASE_HEALTH: f64 = 100.0;

// --- Waves ---

/// Radius around a spawn point in which structures count toward its defence.
pub const WEAKEST_SIDE_RADIUS: f64 = 200.0;

/// Delay between an enemy's death and its removal from the roster.
pub const ENEMY_REMOVAL_DELAY_SECS: f64 = 0.2;

/// Maximum number of recycled enemies kept per kind.
pub const ENEMY_POOL_MAX: usize = 20;

/// Delay before the first wave starts automatically.
pub const FIRST_WAVE_DELAY_SECS: f64 = 21.0;

// --- Combat ---

/// Tower projectile flight speed (units/s).
pub const PROJECTILE_SPEED: f64 = 300.0;

/// Distance at which a projectile counts as a hit.
pub const PROJECTILE_HIT_RADIUS: f64 = 10.0;

/// Minimum damage a structure takes from any hit.
pub const MIN_STRUCTURE_DAMAGE: f64 = 1.0;

// --- Siege (structure-targeting enemies) ---

/// Radius in which an Ogre notices structures.
pub const OGRE_DETECTION_RADIUS: f64 = 80.0;

/// Seconds between Ogre strikes.
pub const OGRE_SIEGE_COOLDOWN_SECS: f64 = 1.5;

/// How long an Ogre halts on its path after each strike.
pub const OGRE_SIEGE_PAUSE_SECS: f64 = 0.6;

// --- Builder ---

/// Distance covered by a dash.
pub const DASH_DISTANCE: f64 = 192.0;

/// Cooldown between dashes.
pub const DASH_COOLDOWN_SECS: f64 = 3.0;

/// Radius in which the builder picks up resource piles.
pub const PILE_COLLECT_RADIUS: f64 = GRID_CELL_SIZE / 2.0;

/// Margin from the map edge for wave-bonus piles.
pub const BONUS_PILE_MARGIN: f64 = 100.0;

// --- Messages ---

/// How long player-facing messages stay up.
pub const MESSAGE_DURATION_SECS: f64 = 1.5;

pub const MSG_NOT_ENOUGH_CRYSTALS: &str = "Not enough crystals!";
pub const MSG_CANNOT_BUILD_HERE: &str = "Cannot build here!";
pub const MSG_MAX_LEVEL: &str = "Already at max level!";
pub const MSG_REPAIR_NOT_READY: &str = "Repair not ready!";
pub const MSG_NO_STRUCTURE_SELECTED: &str = "Select a structure first!";
