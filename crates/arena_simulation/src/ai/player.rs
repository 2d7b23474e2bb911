//! Player input: tap/click → атака ближайшего врага
//!
//! Захват устройства ввода снаружи, сюда приходит уже `TapInput`.

use bevy::prelude::*;

use crate::combat::AttackRequest;
use crate::components::{Character, CombatRanges, HealthStatus, PlayerControlled};
use crate::logger;
use crate::spatial::{ActorIndex, SpatialQuery};

/// Tap/click игрока
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapInput {
    pub entity: Entity,
}

/// System: TapInput → AttackRequest по ближайшему врагу в detection range
///
/// Cooldown и состояние проверяет `start_attacks`, здесь только выбор цели.
pub fn handle_tap_input(
    mut taps: EventReader<TapInput>,
    index: Res<ActorIndex>,
    players: Query<(&Character, &Transform, &CombatRanges, &HealthStatus), With<PlayerControlled>>,
    mut attack_requests: EventWriter<AttackRequest>,
) {
    for tap in taps.read() {
        let Ok((character, transform, ranges, health)) = players.get(tap.entity) else {
            continue;
        };

        if health.is_dead() || health.is_stunned() {
            continue;
        }

        match index.find_nearest_enemy(character, transform.translation, ranges.detection_range) {
            Some(target) => {
                attack_requests.write(AttackRequest {
                    attacker: tap.entity,
                    target: target.entity,
                });
            }
            None => logger::log(&format!("{:?} tap: no enemy in range", tap.entity)),
        }
    }
}
