//! Импакт атаки: через impact delay цель выбирается заново и получает урон

use bevy::prelude::*;

use crate::combat::damage::roll_damage;
use crate::combat::{AttackCompleted, CombatResolver, DamageDealt};
use crate::components::{Character, HealthStatus, StatsInstance};
use crate::health::{deal_damage, HealthEvent};
use crate::logger;
use crate::spatial::{ActorIndex, SpatialQuery};
use crate::DeterministicRng;

/// Удар, время которого наступило в этом тике
struct DueImpact {
    attacker: Entity,
    character: Character,
    position: Vec3,
    base_damage: f32,
    damage_multiplier: f32,
    critical_chance: f32,
    critical_damage: f32,
    search_radius: f32,
}

/// System: разрешение запланированных ударов
///
/// Цель на импакте: ближайший живой враг в `search_radius`, а не цель
/// из AttackRequest (она могла уйти или умереть за impact delay).
/// Мертвый к моменту импакта атакующий урона не наносит.
/// AttackCompleted пишется всегда.
pub fn resolve_impacts(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut index: ResMut<ActorIndex>,
    mut attackers: Query<(Entity, &Character, &Transform, &StatsInstance, &mut CombatResolver)>,
    mut healths: Query<&mut HealthStatus>,
    mut damage_events: EventWriter<DamageDealt>,
    mut health_events: EventWriter<HealthEvent>,
    mut completed: EventWriter<AttackCompleted>,
) {
    let now = time.elapsed_secs();

    let due: Vec<DueImpact> = attackers
        .iter_mut()
        .filter_map(|(entity, character, transform, stats, mut resolver)| {
            resolver.take_due_impact(now)?;
            Some(DueImpact {
                attacker: entity,
                character: *character,
                position: transform.translation,
                base_damage: stats.attack_power,
                damage_multiplier: resolver.damage_multiplier(),
                critical_chance: resolver.critical_chance(),
                critical_damage: resolver.critical_damage(),
                search_radius: resolver.search_radius(),
            })
        })
        .collect();

    for impact in due {
        let attacker_alive = healths
            .get(impact.attacker)
            .map(|health| health.is_alive())
            .unwrap_or(false);

        if attacker_alive {
            strike(&impact, &mut rng, &mut index, &mut healths, &mut damage_events, &mut health_events);
        }

        completed.write(AttackCompleted {
            attacker: impact.attacker,
        });
    }
}

fn strike(
    impact: &DueImpact,
    rng: &mut DeterministicRng,
    index: &mut ActorIndex,
    healths: &mut Query<&mut HealthStatus>,
    damage_events: &mut EventWriter<DamageDealt>,
    health_events: &mut EventWriter<HealthEvent>,
) {
    let Some(target) = index.find_nearest_enemy(&impact.character, impact.position, impact.search_radius) else {
        logger::log(&format!("{:?} impact: no target in {:.1}m", impact.attacker, impact.search_radius));
        return;
    };

    let Ok(mut health) = healths.get_mut(target.entity) else {
        return;
    };

    let roll = roll_damage(
        &mut rng.rng,
        impact.base_damage,
        impact.damage_multiplier,
        impact.critical_chance,
        impact.critical_damage,
    );

    let Some(outcome) = deal_damage(target.entity, &mut health, roll.amount, Some(impact.attacker), health_events)
    else {
        return;
    };

    if outcome.died {
        // Следующие импакты этого тика уже не выберут труп
        index.mark_dead(target.entity);
    }

    damage_events.write(DamageDealt {
        attacker: impact.attacker,
        target: target.entity,
        amount: roll.amount,
        is_critical: roll.is_critical,
    });

    logger::log(&format!(
        "💥 {:?} → {:?}: {:.1} dmg{} (HP left {:.1})",
        impact.attacker,
        target.entity,
        roll.amount,
        if roll.is_critical { " CRIT" } else { "" },
        outcome.current
    ));
}
