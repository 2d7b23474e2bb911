//! Тесты детерминизма
//!
//! Симуляция с одинаковым seed даёт идентичные результаты.
//! Крит: единственный источник случайности, поэтому высокий шанс крита
//! заставляет RNG реально влиять на исход.

use bevy::prelude::*;
use arena_simulation::*;

const DT: f32 = 0.05;

fn spawn_arena(app: &mut App, fighters_per_team: u32) {
    let config = app.world().resource::<SimulationConfig>().clone();

    for i in 0..fighters_per_team {
        for (faction, x) in [(Faction::PlayerTeam, 0.0), (Faction::EnemyTeam, 8.0)] {
            let id = i * 2 + (faction == Faction::EnemyTeam) as u32;
            let stats = StatsInstance::from_template(&StatsTemplate {
                name: format!("Duelist {}", id),
                critical_chance: 0.5,
                critical_multiplier: 2.0,
                ..default()
            });

            app.world_mut().spawn((
                CharacterBundle::new(
                    Character::new(id, CharacterKind::Enemy, faction),
                    stats,
                    Vec3::new(x, 0.0, i as f32 * 1.5),
                    &config,
                ),
                DecisionPolicy::from_config(&config),
            ));
        }
    }
}

/// Запускает симуляцию и возвращает snapshot мира
fn run_simulation(seed: u64, fighters_per_team: u32, seconds: f32) -> Vec<u8> {
    let mut app = create_simulation_app(seed);
    spawn_arena(&mut app, fighters_per_team);

    run_for(&mut app, seconds, DT);

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<HealthStatus>(world);
    snapshot.extend(world_snapshot::<Transform>(world));
    snapshot.extend(world_snapshot::<BehaviorStateMachine>(world));
    snapshot.extend(world_snapshot::<CombatResolver>(world));
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_simulation(SEED, 2, 20.0);
    let snapshot2 = run_simulation(SEED, 2, 20.0);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    // Запускаем 5 раз: все должны быть идентичны
    let snapshots: Vec<_> = (0..5).map(|_| run_simulation(SEED, 3, 15.0)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_rng_seed_is_kept() {
    let app = create_simulation_app(777);
    assert_eq!(app.world().resource::<DeterministicRng>().seed, 777);
}
