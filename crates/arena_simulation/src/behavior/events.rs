//! Behavior events: запросы смены состояния и уведомления о переходах

use bevy::prelude::*;

use super::BehaviorStateType;

/// Запрос смены состояния (AI, input, health реакции, таймеры состояний)
///
/// Применяется в `SimSet::Reactions` в порядке записи.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct StateChangeRequest {
    pub entity: Entity,
    pub state: BehaviorStateType,
    /// Перезапустить состояние даже если оно уже активно
    pub force: bool,
    /// Применить только если персонаж сейчас в этом состоянии
    pub only_from: Option<BehaviorStateType>,
}

impl StateChangeRequest {
    /// Обычная смена (no-op если уже в `state`)
    pub fn change(entity: Entity, state: BehaviorStateType) -> Self {
        Self {
            entity,
            state,
            force: false,
            only_from: None,
        }
    }

    /// Форсированная смена (Hit/Stunned/Attack перезапускаются)
    pub fn force(entity: Entity, state: BehaviorStateType) -> Self {
        Self {
            force: true,
            ..Self::change(entity, state)
        }
    }

    pub fn when_in(mut self, current: BehaviorStateType) -> Self {
        self.only_from = Some(current);
        self
    }
}

/// Переход совершён (old → new)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub entity: Entity,
    pub from: BehaviorStateType,
    pub to: BehaviorStateType,
}
