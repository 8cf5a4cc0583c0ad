//! Scenario definitions: preset wave schedules.
//!
//! Stat tables always come from the game configuration; a scenario only
//! swaps the wave sequence.

use rampart_core::config::{default_waves, SpawnGroup, WaveDefinition};
use rampart_core::enums::{EnemyKind, ScenarioId, SpawnSide};

/// Build the wave schedule for a given scenario.
pub fn build_schedule(scenario: ScenarioId) -> Vec<WaveDefinition> {
    match scenario {
        ScenarioId::Skirmish => default_waves(),
        ScenarioId::Siege => build_siege(),
    }
}

/// Siege: four escalating waves from random entrances.
/// 10 / 20 / 33 / 48 enemies, Ogres from wave 3.
fn build_siege() -> Vec<WaveDefinition> {
    let random = |enemy, count, inter_spawn_delay_secs| SpawnGroup {
        enemy,
        count,
        inter_spawn_delay_secs,
        side: SpawnSide::Random,
    };

    vec![
        WaveDefinition {
            groups: vec![random(EnemyKind::Goblin, 10, 2.0)],
            break_time_secs: 15.0,
        },
        WaveDefinition {
            groups: vec![
                random(EnemyKind::Goblin, 15, 1.8),
                random(EnemyKind::Carrier, 5, 3.0),
            ],
            break_time_secs: 20.0,
        },
        WaveDefinition {
            groups: vec![
                random(EnemyKind::Goblin, 20, 1.5),
                random(EnemyKind::Carrier, 10, 2.5),
                random(EnemyKind::Ogre, 3, 5.0),
            ],
            break_time_secs: 25.0,
        },
        WaveDefinition {
            groups: vec![
                random(EnemyKind::Goblin, 25, 1.2),
                random(EnemyKind::Carrier, 15, 2.0),
                SpawnGroup {
                    side: SpawnSide::Weakest,
                    ..random(EnemyKind::Ogre, 8, 4.0)
                },
            ],
            break_time_secs: 0.0,
        },
    ]
}

/// Total number of enemies a schedule spawns.
pub fn total_enemies(waves: &[WaveDefinition]) -> u32 {
    waves
        .iter()
        .flat_map(|wave| wave.groups.iter())
        .map(|group| group.count)
        .sum()
}
