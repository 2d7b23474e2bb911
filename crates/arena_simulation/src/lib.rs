//! ARENA Simulation Core
//!
//! ECS-симуляция боевого поведения персонажей арены на Bevy 0.16.
//!
//! Поведение персонажа:
//! - BehaviorStateMachine: Idle/Chase/Attack/Hit/Dead/Victory/Stunned
//! - HealthStatus: урон, смерть, оглушение, воскрешение
//! - CombatResolver: cooldown, крит, impact через 0.3s
//! - MovementController: прямолинейное движение к точке
//! - DecisionPolicy: AI опрос раз в 0.5s
//!
//! Анимация, input, UI, загрузка уровней: внешние слои (см. `animation`, `spawn`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod animation;
pub mod behavior;
pub mod combat;
pub mod components;
pub mod config;
pub mod health;
pub mod logger;
pub mod movement;
pub mod schedules;
pub mod spatial;
pub mod spawn;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, Decision, DecisionPolicy, TapInput};
pub use animation::{AnimationCue, AnimationCueSink, AnimationPlugin, AnimationSinks, CueRecorder};
pub use behavior::{BehaviorPlugin, BehaviorStateMachine, BehaviorStateType, StateChangeRequest, StateChanged};
pub use combat::{AttackCompleted, AttackRequest, AttackStarted, CombatPlugin, CombatResolver, DamageDealt};
pub use components::*;
pub use config::{BehaviorTimings, ConfigError, SimulationConfig, StatsCatalog};
pub use health::{HealthCommand, HealthEvent, HealthPlugin};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use movement::{MoveRequest, MovementPlugin};
pub use schedules::{LogicTick, PhysicsTick, SimSet};
pub use spatial::{ActorIndex, ActorView, SpatialPlugin, SpatialQuery};
pub use spawn::{spawn_character, AssignStats, CharacterBundle, CharacterCommand, StatsProvider};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        schedules::register_schedules(app);

        app.init_resource::<Time>().init_resource::<SimulationConfig>();

        // Seed по умолчанию, если app создан не через create_headless_app
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.register_type::<Character>()
            .register_type::<HealthStatus>()
            .register_type::<StatsInstance>()
            .register_type::<MovementController>()
            .register_type::<BehaviorStateMachine>()
            .register_type::<CombatResolver>()
            .register_type::<DecisionPolicy>();

        app.add_plugins((
            SpatialPlugin,
            HealthPlugin,
            BehaviorPlugin,
            CombatPlugin,
            MovementPlugin,
            AIPlugin,
            AnimationPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время симуляции двигает только `advance`, реальные часы не участвуют.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.insert_resource(DeterministicRng::new(seed))
        .init_resource::<Time>()
        .init_resource::<SimulationConfig>();

    app
}

/// Headless app + все подсистемы
pub fn create_simulation_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

/// Один шаг симуляции: Time += delta, затем logic и physics фазы
pub fn advance(app: &mut App, delta: f32) {
    let world = app.world_mut();
    world
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(delta.max(0.0)));

    world.run_schedule(LogicTick);
    world.run_schedule(PhysicsTick);
    world.clear_trackers();
}

/// Прогнать `seconds` симуляции шагами по `delta`. Возвращает число шагов.
pub fn run_for(app: &mut App, seconds: f32, delta: f32) -> usize {
    if delta <= 0.0 {
        return 0;
    }

    let steps = (seconds / delta).round() as usize;
    for _ in 0..steps {
        advance(app, delta);
    }
    steps
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
