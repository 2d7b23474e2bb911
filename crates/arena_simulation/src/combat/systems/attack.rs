//! Начало атаки: AttackRequest → cooldown check → Attack state + запланированный impact

use bevy::prelude::*;

use crate::behavior::{BehaviorStateType, StateChangeRequest};
use crate::combat::{AttackRequest, AttackStarted, CombatResolver};
use crate::components::{face_point, HealthStatus, StatsInstance};
use crate::config::SimulationConfig;
use crate::logger;
use crate::spatial::ActorIndex;

/// System: обработка запросов атаки
///
/// No-op если атакующий мертв/оглушен, цель отсутствует или cooldown не прошёл.
/// Позиция цели берётся из `ActorIndex` (snapshot начала тика).
/// Успешная атака форсирует Attack (перезапуск таймера) и поворачивает к цели.
pub fn start_attacks(
    time: Res<Time>,
    config: Res<SimulationConfig>,
    mut requests: EventReader<AttackRequest>,
    mut attackers: Query<(&mut CombatResolver, &mut Transform, &StatsInstance, &HealthStatus)>,
    index: Res<ActorIndex>,
    mut started: EventWriter<AttackStarted>,
    mut state_requests: EventWriter<StateChangeRequest>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Some(target_position) = index.get(request.target).map(|view| view.position) else {
            logger::log(&format!("{:?} attack ignored: target {:?} missing", request.attacker, request.target));
            continue;
        };

        let Ok((mut resolver, mut transform, stats, health)) = attackers.get_mut(request.attacker) else {
            continue;
        };

        if health.is_dead() || health.is_stunned() {
            continue;
        }

        if !resolver.begin_attack(now, stats.attack_cooldown, request.target, config.impact_delay) {
            continue;
        }

        face_point(&mut transform, target_position);
        state_requests.write(StateChangeRequest::force(request.attacker, BehaviorStateType::Attack));
        started.write(AttackStarted {
            attacker: request.attacker,
            target: request.target,
        });

        logger::log(&format!(
            "⚔️ {:?} attacks {:?} at t={:.2} (impact at {:.2})",
            request.attacker,
            request.target,
            now,
            now + config.impact_delay
        ));
    }
}
