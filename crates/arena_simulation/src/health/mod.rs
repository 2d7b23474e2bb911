//! Health domain: команды урона/лечения/оглушения и события здоровья
//!
//! `HealthStatus` меняется только здесь (команды, stun таймер) и в
//! `combat::resolve_impacts` через те же helper'ы, поэтому порядок событий
//! одинаковый для всех источников урона:
//! 1. Changed
//! 2. Died или WasHit

use bevy::prelude::*;

use crate::components::{DamageOutcome, HealthStatus};
use crate::logger;
use crate::spawn::{apply_stat_assignments, AssignStats};
use crate::{LogicTick, SimSet};

/// Уведомления об изменении здоровья
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    Changed { entity: Entity, current: f32 },
    /// Несмертельный урон
    WasHit {
        entity: Entity,
        attacker: Option<Entity>,
        amount: f32,
    },
    Died { entity: Entity, attacker: Option<Entity> },
    Revived { entity: Entity, current: f32 },
    Stunned { entity: Entity, duration: f32 },
    StunRecovered { entity: Entity },
}

impl HealthEvent {
    pub fn entity(&self) -> Entity {
        match self {
            HealthEvent::Changed { entity, .. }
            | HealthEvent::WasHit { entity, .. }
            | HealthEvent::Died { entity, .. }
            | HealthEvent::Revived { entity, .. }
            | HealthEvent::Stunned { entity, .. }
            | HealthEvent::StunRecovered { entity } => *entity,
        }
    }
}

/// Внешние команды здоровья (геймплей, тесты, скрипты)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum HealthCommand {
    Damage {
        entity: Entity,
        amount: f32,
        attacker: Option<Entity>,
    },
    Heal { entity: Entity, amount: f32 },
    Stun { entity: Entity, duration: f32 },
    /// `fraction` от max здоровья, [0, 1]
    Revive { entity: Entity, fraction: f32 },
}

impl HealthCommand {
    pub fn damage(entity: Entity, amount: f32) -> Self {
        HealthCommand::Damage {
            entity,
            amount,
            attacker: None,
        }
    }

    /// Полное воскрешение
    pub fn revive(entity: Entity) -> Self {
        HealthCommand::Revive { entity, fraction: 1.0 }
    }
}

/// Health Plugin
///
/// Timers set:
/// 1. apply_stat_assignments: AssignStats до урона этого тика
/// 2. tick_stun_timers: оглушение заканчивается до новых команд
/// 3. apply_health_commands
pub struct HealthPlugin;

impl Plugin for HealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthEvent>()
            .add_event::<HealthCommand>()
            .add_event::<AssignStats>();

        app.add_systems(
            LogicTick,
            (apply_stat_assignments, tick_stun_timers, apply_health_commands)
                .chain()
                .in_set(SimSet::Timers),
        );
    }
}

/// Урон с событиями. `None`: персонаж уже мертв.
pub fn deal_damage(
    entity: Entity,
    health: &mut HealthStatus,
    amount: f32,
    attacker: Option<Entity>,
    events: &mut EventWriter<HealthEvent>,
) -> Option<DamageOutcome> {
    let outcome = health.take_damage(amount)?;

    events.write(HealthEvent::Changed {
        entity,
        current: outcome.current,
    });

    if outcome.died {
        events.write(HealthEvent::Died { entity, attacker });
        logger::log_info(&format!("💀 {:?} died (attacker: {:?})", entity, attacker));
    } else {
        events.write(HealthEvent::WasHit {
            entity,
            attacker,
            amount,
        });
    }

    Some(outcome)
}

/// System: тик оглушения → StunRecovered
pub fn tick_stun_timers(
    time: Res<Time>,
    mut characters: Query<(Entity, &mut HealthStatus)>,
    mut events: EventWriter<HealthEvent>,
) {
    let delta = time.delta_secs();

    for (entity, mut health) in characters.iter_mut() {
        if health.tick_stun(delta) {
            events.write(HealthEvent::StunRecovered { entity });
            logger::log(&format!("{:?} recovered from stun", entity));
        }
    }
}

/// System: HealthCommand → HealthStatus + HealthEvent
///
/// Команды к мертвым/отсутствующим персонажам молча игнорируются.
pub fn apply_health_commands(
    mut commands: EventReader<HealthCommand>,
    mut characters: Query<&mut HealthStatus>,
    mut events: EventWriter<HealthEvent>,
) {
    for command in commands.read() {
        match *command {
            HealthCommand::Damage {
                entity,
                amount,
                attacker,
            } => {
                let Ok(mut health) = characters.get_mut(entity) else {
                    continue;
                };
                deal_damage(entity, &mut health, amount, attacker, &mut events);
            }
            HealthCommand::Heal { entity, amount } => {
                let Ok(mut health) = characters.get_mut(entity) else {
                    continue;
                };
                if let Some(current) = health.heal(amount) {
                    events.write(HealthEvent::Changed { entity, current });
                }
            }
            HealthCommand::Stun { entity, duration } => {
                let Ok(mut health) = characters.get_mut(entity) else {
                    continue;
                };
                if health.apply_stun(duration) {
                    events.write(HealthEvent::Stunned { entity, duration });
                    logger::log(&format!("{:?} stunned for {:.2}s", entity, duration));
                }
            }
            HealthCommand::Revive { entity, fraction } => {
                let Ok(mut health) = characters.get_mut(entity) else {
                    continue;
                };
                if let Some(current) = health.revive(fraction) {
                    events.write(HealthEvent::Changed { entity, current });
                    events.write(HealthEvent::Revived { entity, current });
                    logger::log_info(&format!("{:?} revived with {:.1} HP", entity, current));
                }
            }
        }
    }
}
