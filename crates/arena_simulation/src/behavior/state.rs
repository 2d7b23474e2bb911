//! Behavior FSM: состояния персонажа и правила смены
//!
//! Каждое состояние: вариант enum с transient таймерами (сбрасываются на Enter).
//! Побочные эффекты Enter/Exit (стоп движения, анимация, hurtbox) выполняет
//! вызывающая сторона через `StateHooks`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::BehaviorTimings;

/// Тип поведения (без данных): ключ для событий, анимаций, запросов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BehaviorStateType {
    #[default]
    Idle,
    Chase,
    Attack,
    Hit,
    Dead,
    Victory,
    Stunned,
}

impl BehaviorStateType {
    pub const ALL: [BehaviorStateType; 7] = [
        BehaviorStateType::Idle,
        BehaviorStateType::Chase,
        BehaviorStateType::Attack,
        BehaviorStateType::Hit,
        BehaviorStateType::Dead,
        BehaviorStateType::Victory,
        BehaviorStateType::Stunned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorStateType::Idle => "Idle",
            BehaviorStateType::Chase => "Chase",
            BehaviorStateType::Attack => "Attack",
            BehaviorStateType::Hit => "Hit",
            BehaviorStateType::Dead => "Dead",
            BehaviorStateType::Victory => "Victory",
            BehaviorStateType::Stunned => "Stunned",
        }
    }
}

/// Активное состояние + его transient данные
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum BehaviorState {
    Idle,
    Chase,
    /// Атака: сколько секунд прошло с входа
    Attack { elapsed: f32 },
    /// Hit-react
    Hit { elapsed: f32 },
    Dead,
    Victory { elapsed: f32 },
    /// Выход по флагу HealthStatus, не по своему таймеру
    Stunned,
}

impl BehaviorState {
    /// Свежий экземпляр состояния (таймеры обнулены)
    pub fn entered(kind: BehaviorStateType) -> Self {
        match kind {
            BehaviorStateType::Idle => BehaviorState::Idle,
            BehaviorStateType::Chase => BehaviorState::Chase,
            BehaviorStateType::Attack => BehaviorState::Attack { elapsed: 0.0 },
            BehaviorStateType::Hit => BehaviorState::Hit { elapsed: 0.0 },
            BehaviorStateType::Dead => BehaviorState::Dead,
            BehaviorStateType::Victory => BehaviorState::Victory { elapsed: 0.0 },
            BehaviorStateType::Stunned => BehaviorState::Stunned,
        }
    }

    pub fn kind(&self) -> BehaviorStateType {
        match self {
            BehaviorState::Idle => BehaviorStateType::Idle,
            BehaviorState::Chase => BehaviorStateType::Chase,
            BehaviorState::Attack { .. } => BehaviorStateType::Attack,
            BehaviorState::Hit { .. } => BehaviorStateType::Hit,
            BehaviorState::Dead => BehaviorStateType::Dead,
            BehaviorState::Victory { .. } => BehaviorStateType::Victory,
            BehaviorState::Stunned => BehaviorStateType::Stunned,
        }
    }
}

/// Побочные эффекты входа/выхода из состояния
pub trait StateHooks {
    fn exit(&mut self, state: BehaviorStateType);
    fn enter(&mut self, state: BehaviorStateType);
}

/// Без побочных эффектов (тесты, предпросмотр переходов)
impl StateHooks for () {
    fn exit(&mut self, _state: BehaviorStateType) {}
    fn enter(&mut self, _state: BehaviorStateType) {}
}

/// Совершённый переход (old → new)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: BehaviorStateType,
    pub to: BehaviorStateType,
}

/// Конечный автомат поведения персонажа
///
/// Начальное состояние: Idle. Из Dead выходят только через Revive (форсированный Idle).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BehaviorStateMachine {
    current: BehaviorState,
}

impl Default for BehaviorStateMachine {
    fn default() -> Self {
        Self {
            current: BehaviorState::Idle,
        }
    }
}

impl BehaviorStateMachine {
    pub fn current(&self) -> &BehaviorState {
        &self.current
    }

    pub fn current_type(&self) -> BehaviorStateType {
        self.current.kind()
    }

    pub fn is_in(&self, kind: BehaviorStateType) -> bool {
        self.current_type() == kind
    }

    /// Смена состояния. No-op если `new_state` уже активно.
    pub fn change_state(
        &mut self,
        new_state: BehaviorStateType,
        hooks: &mut impl StateHooks,
    ) -> Option<StateTransition> {
        if new_state == self.current_type() {
            return None;
        }
        Some(self.swap(new_state, hooks))
    }

    /// Смена состояния без проверки (перезапуск текущего, например Attack)
    pub fn force_change_state(
        &mut self,
        new_state: BehaviorStateType,
        hooks: &mut impl StateHooks,
    ) -> StateTransition {
        self.swap(new_state, hooks)
    }

    fn swap(&mut self, new_state: BehaviorStateType, hooks: &mut impl StateHooks) -> StateTransition {
        let from = self.current_type();
        hooks.exit(from);
        self.current = BehaviorState::entered(new_state);
        hooks.enter(new_state);

        StateTransition { from, to: new_state }
    }

    /// Per-tick update активного состояния.
    ///
    /// Возвращает состояние, в которое активное состояние просит перейти.
    pub fn update_logic(
        &mut self,
        delta: f32,
        timings: &BehaviorTimings,
        is_stunned: bool,
    ) -> Option<BehaviorStateType> {
        match &mut self.current {
            BehaviorState::Attack { elapsed } => {
                *elapsed += delta;
                (*elapsed >= timings.attack_duration).then_some(BehaviorStateType::Idle)
            }
            BehaviorState::Hit { elapsed } => {
                *elapsed += delta;
                (*elapsed >= timings.hit_duration).then_some(BehaviorStateType::Idle)
            }
            BehaviorState::Victory { elapsed } => {
                *elapsed += delta;
                (*elapsed >= timings.victory_duration).then_some(BehaviorStateType::Idle)
            }
            BehaviorState::Stunned => (!is_stunned).then_some(BehaviorStateType::Idle),
            BehaviorState::Idle | BehaviorState::Chase | BehaviorState::Dead => None,
        }
    }
}
