//! Resource pool and kill-combo multiplier.
//!
//! `credit`, `debit` and `on_enemy_killed` are the only mutators of the
//! resource count. `debit` is the single gate for every spend action.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use rampart_core::config::EconomyConfig;
use rampart_core::enums::PileRarity;
use rampart_core::events::GameEvent;

/// A resource pile rolled by a kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PileDrop {
    pub value: u32,
    pub rarity: PileRarity,
}

/// Player resources plus combo tracking.
#[derive(Debug, Clone)]
pub struct Economy {
    resources: u32,
    combo: u32,
    last_kill_secs: Option<f64>,
    config: EconomyConfig,
}

impl Economy {
    /// An empty economy; call `credit` with the starting resources.
    pub fn new(config: EconomyConfig) -> Self {
        Self {
            resources: 0,
            combo: 0,
            last_kill_secs: None,
            config,
        }
    }

    pub fn resources(&self) -> u32 {
        self.resources
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn last_kill_secs(&self) -> Option<f64> {
        self.last_kill_secs
    }

    /// Reward multiplier for the current combo: `1 + (combo - 1) * step`.
    pub fn multiplier(&self) -> f64 {
        1.0 + self.combo.saturating_sub(1) as f64 * self.config.combo_step
    }

    pub fn credit(&mut self, amount: u32, events: &mut Vec<GameEvent>) {
        self.resources = self.resources.saturating_add(amount);
        events.push(GameEvent::CrystalsUpdated {
            amount: self.resources,
        });
    }

    /// Spend `amount` if affordable. Leaves resources untouched on failure.
    pub fn debit(&mut self, amount: u32, events: &mut Vec<GameEvent>) -> bool {
        if self.resources < amount {
            return false;
        }
        self.resources -= amount;
        events.push(GameEvent::CrystalsUpdated {
            amount: self.resources,
        });
        true
    }

    /// Register a kill: advance or restart the combo, credit the multiplied
    /// reward, and roll for a resource pile drop.
    pub fn on_enemy_killed(
        &mut self,
        now_secs: f64,
        base_reward: u32,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
    ) -> Option<PileDrop> {
        let within_window = self
            .last_kill_secs
            .is_some_and(|last| now_secs - last <= self.config.combo_window_secs);
        self.combo = if within_window { self.combo + 1 } else { 1 };
        self.last_kill_secs = Some(now_secs);

        let multiplier = self.multiplier();
        events.push(GameEvent::ComboChanged {
            combo: self.combo,
            multiplier,
        });

        let reward = (base_reward as f64 * multiplier).floor() as u32;
        debug!(combo = self.combo, reward, "enemy killed");
        self.credit(reward, events);

        if rng.gen::<f64>() >= self.config.pile_chance {
            return None;
        }
        let (range, rarity) = if rng.gen::<f64>() < self.config.rare_pile_chance {
            (self.config.rare_pile, PileRarity::Rare)
        } else {
            (self.config.normal_pile, PileRarity::Normal)
        };
        Some(PileDrop {
            value: rng.gen_range(range.min..=range.max),
            rarity,
        })
    }

    /// Background decay: drop the combo to zero once the window has lapsed
    /// with no further kill. Returns whether the combo was reset.
    pub fn check_combo_decay(&mut self, now_secs: f64, events: &mut Vec<GameEvent>) -> bool {
        let lapsed = self
            .last_kill_secs
            .is_some_and(|last| now_secs - last > self.config.combo_window_secs);
        if self.combo > 0 && lapsed {
            self.combo = 0;
            events.push(GameEvent::ComboChanged {
                combo: 0,
                multiplier: 1.0,
            });
            return true;
        }
        false
    }
}
