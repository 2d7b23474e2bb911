//! Headless дуэль ARENA
//!
//! Два AI бойца разных фракций дерутся до смерти одного из них.
//!
//! Использование: `arena_simulation [seed] [stats_catalog.ron]`

use std::path::Path;

use arena_simulation::*;
use bevy::prelude::*;

const STEP: f32 = 1.0 / 30.0;
const TIME_LIMIT: f32 = 120.0;

/// Печать переходов FSM (Presentation set)
fn print_transitions(mut events: EventReader<StateChanged>, time: Res<Time>) {
    for event in events.read() {
        println!(
            "[{:>6.2}s] {:?}: {} → {}",
            time.elapsed_secs(),
            event.entity,
            event.from.as_str(),
            event.to.as_str()
        );
    }
}

fn fighter_stats(catalog: Option<&StatsCatalog>, name: &str, fallback: StatsTemplate) -> StatsInstance {
    catalog
        .and_then(|catalog| catalog.instantiate(name))
        .unwrap_or_else(|| StatsInstance::from_template(&fallback))
}

fn main() -> Result<(), ConfigError> {
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(42);
    let catalog = args.next().map(|path| StatsCatalog::load(Path::new(&path))).transpose()?;

    println!("Starting ARENA headless duel (seed: {})", seed);

    let mut app = create_simulation_app(seed);
    app.add_systems(LogicTick, print_transitions.in_set(SimSet::Presentation));

    let config = app.world().resource::<SimulationConfig>().clone();

    let hero_stats = fighter_stats(
        catalog.as_ref(),
        "Hero",
        StatsTemplate {
            name: "Hero".to_string(),
            max_health: 120.0,
            critical_chance: 0.15,
            ..default()
        },
    );
    let brute_stats = fighter_stats(
        catalog.as_ref(),
        "Brute",
        StatsTemplate {
            name: "Brute".to_string(),
            max_health: 150.0,
            attack_power: 25.0,
            attack_cooldown: 2.0,
            move_speed: 2.5,
            ..default()
        },
    );

    println!("  {}", hero_stats);
    println!("  {}", brute_stats);

    let hero = app
        .world_mut()
        .spawn((
            CharacterBundle::new(
                Character::new(1, CharacterKind::Player, Faction::PlayerTeam),
                hero_stats,
                Vec3::ZERO,
                &config,
            ),
            DecisionPolicy::from_config(&config),
        ))
        .id();
    let brute = app
        .world_mut()
        .spawn((
            CharacterBundle::new(
                Character::new(2, CharacterKind::Enemy, Faction::EnemyTeam),
                brute_stats,
                Vec3::new(6.0, 0.0, 0.0),
                &config,
            ),
            DecisionPolicy::from_config(&config),
        ))
        .id();

    let mut elapsed = 0.0;
    let winner = loop {
        advance(&mut app, STEP);
        elapsed += STEP;

        let hero_dead = app.world().get::<HealthStatus>(hero).map_or(true, |health| health.is_dead());
        let brute_dead = app.world().get::<HealthStatus>(brute).map_or(true, |health| health.is_dead());

        match (hero_dead, brute_dead) {
            (false, true) => break Some(hero),
            (true, false) => break Some(brute),
            (true, true) => break None,
            _ if elapsed >= TIME_LIMIT => break None,
            _ => {}
        }
    };

    match winner {
        Some(entity) => {
            app.world_mut()
                .send_event(StateChangeRequest::change(entity, BehaviorStateType::Victory));
            run_for(&mut app, config.timings.victory_duration, STEP);

            let health = app.world().get::<HealthStatus>(entity).map(|health| health.current());
            println!("Winner: {:?} with {:.1} HP after {:.2}s", entity, health.unwrap_or(0.0), elapsed);
        }
        None => println!("No winner after {:.2}s", elapsed),
    }

    Ok(())
}
