//! Combat events: запрос атаки, начало, урон, завершение

use bevy::prelude::*;

/// Запрос атаки (AI, player input, скрипты)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRequest {
    pub attacker: Entity,
    pub target: Entity,
}

/// Атака началась (cooldown пройден, impact запланирован)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub target: Entity,
}

/// Урон нанесён на импакте
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
    pub is_critical: bool,
}

/// Атака завершена (с уроном или без)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackCompleted {
    pub attacker: Entity,
}
