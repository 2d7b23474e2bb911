//! Custom schedules: двухфазный тик симуляции
//!
//! # Архитектура
//!
//! `advance(app, dt)` → Time += dt
//!   ├─ LogicTick (SimSet по порядку)
//!   └─ PhysicsTick (интеграция движения)
//!
//! Обе фазы на однопоточном executor'е: порядок систем внутри тика
//! фиксирован `.chain()`, прогоны с одним seed совпадают побитово.

use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::prelude::*;

/// Logic фаза: FSM, здоровье, AI, бой
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicTick;

/// Physics фаза: контроллеры движения → velocity → Transform/Rapier
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicsTick;

/// Фазы LogicTick (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Ротация буферов событий
    Events,
    /// Lifecycle команды, пересборка ActorIndex
    Perception,
    /// Таймеры активных состояний FSM
    StateUpdate,
    /// Stat reassignment, stun таймеры, health команды
    Timers,
    /// AI и player input
    Decision,
    /// Движение (logic часть), атаки, импакты
    Actions,
    /// Health события → запросы FSM → переходы
    Reactions,
    /// Animation cues
    Presentation,
}

/// Регистрация schedules + порядок SimSet
pub fn register_schedules(app: &mut App) {
    app.init_schedule(LogicTick);
    app.init_schedule(PhysicsTick);

    app.edit_schedule(LogicTick, single_threaded);
    app.edit_schedule(PhysicsTick, single_threaded);

    app.configure_sets(
        LogicTick,
        (
            SimSet::Events,
            SimSet::Perception,
            SimSet::StateUpdate,
            SimSet::Timers,
            SimSet::Decision,
            SimSet::Actions,
            SimSet::Reactions,
            SimSet::Presentation,
        )
            .chain(),
    );

    // Без App::update события ротируем сами, в начале каждого logic тика
    app.add_systems(
        LogicTick,
        bevy::ecs::event::event_update_system.in_set(SimSet::Events),
    );
}

fn single_threaded(schedule: &mut Schedule) {
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
}
