//! DecisionPolicy: AI персонажа, опрашивается раз в `interval` секунд симуляции
//!
//! Решение принимается чистой функцией `decide`, система только собирает
//! входные данные и превращает `Decision` в запросы (MoveRequest, AttackRequest,
//! StateChangeRequest).

use bevy::prelude::*;

use crate::behavior::{BehaviorStateMachine, BehaviorStateType, StateChangeRequest};
use crate::combat::{AttackRequest, CombatResolver, TIME_EPSILON};
use crate::components::{Character, CombatRanges, HealthStatus, PlayerControlled, StatsInstance};
use crate::config::SimulationConfig;
use crate::movement::MoveRequest;
use crate::spatial::{ActorIndex, ActorView, SpatialQuery};

/// Период опроса AI по умолчанию (секунды)
pub const DEFAULT_DECISION_INTERVAL: f32 = 0.5;

/// AI опрос
///
/// `Default` берёт `DEFAULT_DECISION_INTERVAL`; период из конфига даёт `from_config`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct DecisionPolicy {
    pub interval: f32,
    /// Накопленное время с последнего опроса
    pub timer: f32,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DECISION_INTERVAL)
    }
}

impl DecisionPolicy {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(0.0),
            timer: 0.0,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.decision_interval)
    }

    /// Накопить время. `true`: пора принимать решение (таймер сброшен).
    pub fn tick(&mut self, delta: f32) -> bool {
        self.timer += delta;
        if self.timer + TIME_EPSILON >= self.interval {
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Результат опроса
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Ничего не делать
    Wait,
    /// Цель в радиусе атаки, атака доступна
    Attack { target: Entity },
    /// Цель далеко или атака на cooldown: идти к ней
    Chase { target: Entity, point: Vec3 },
    /// Врагов нет
    ReturnToIdle,
}

/// Решение AI
///
/// Действует только из Idle/Chase: Attack, Hit, Victory заканчиваются своими
/// таймерами, Stunned/Dead отсекаются раньше.
pub fn decide(
    state: BehaviorStateType,
    position: Vec3,
    ranges: &CombatRanges,
    attack_ready: bool,
    nearest: Option<&ActorView>,
) -> Decision {
    if !matches!(state, BehaviorStateType::Idle | BehaviorStateType::Chase) {
        return Decision::Wait;
    }

    let Some(target) = nearest else {
        return if state == BehaviorStateType::Idle {
            Decision::Wait
        } else {
            Decision::ReturnToIdle
        };
    };

    if attack_ready && position.distance(target.position) <= ranges.attack_range {
        Decision::Attack { target: target.entity }
    } else {
        Decision::Chase {
            target: target.entity,
            point: target.position,
        }
    }
}

/// System: опрос DecisionPolicy
///
/// Таймер тикает и сбрасывается всегда, мертвые/оглушенные пропускают решение.
/// Игрок (`PlayerControlled`) решает через input, не через policy.
pub fn tick_decision_policies(
    time: Res<Time>,
    index: Res<ActorIndex>,
    mut agents: Query<
        (
            Entity,
            &Character,
            &Transform,
            &BehaviorStateMachine,
            &HealthStatus,
            &CombatResolver,
            &StatsInstance,
            &CombatRanges,
            &mut DecisionPolicy,
        ),
        Without<PlayerControlled>,
    >,
    mut move_requests: EventWriter<MoveRequest>,
    mut attack_requests: EventWriter<AttackRequest>,
    mut state_requests: EventWriter<StateChangeRequest>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, character, transform, fsm, health, resolver, stats, ranges, mut policy) in agents.iter_mut() {
        if !policy.tick(delta) {
            continue;
        }

        if health.is_dead() || health.is_stunned() {
            continue;
        }

        let position = transform.translation;
        let nearest = index.find_nearest_enemy(character, position, ranges.detection_range);
        let attack_ready = resolver.can_attack(now, stats.attack_cooldown);

        match decide(fsm.current_type(), position, ranges, attack_ready, nearest.as_ref()) {
            Decision::Wait => {}
            Decision::Attack { target } => {
                attack_requests.write(AttackRequest {
                    attacker: entity,
                    target,
                });
            }
            Decision::Chase { point, .. } => {
                move_requests.write(MoveRequest::MoveTo { entity, target: point });
                state_requests.write(StateChangeRequest::change(entity, BehaviorStateType::Chase));
            }
            Decision::ReturnToIdle => {
                state_requests.write(StateChangeRequest::change(entity, BehaviorStateType::Idle));
            }
        }
    }
}
