//! Combat module
//!
//! ECS ответственность:
//! - CombatResolver: cooldown, in-flight атака, модификаторы урона/крита
//! - Combat rules: damage calculation, critical roll (seeded RNG)
//! - Events: AttackRequest → AttackStarted → DamageDealt → AttackCompleted
//!
//! Урон применяется через `health::deal_damage`, реакция FSM (Hit/Dead): в behavior.

use bevy::prelude::*;

pub mod damage;
pub mod events;
pub mod resolver;
pub mod systems;

pub use damage::{compute_damage, roll_critical, roll_damage, DamageRoll};
pub use events::{AttackCompleted, AttackRequest, AttackStarted, DamageDealt};
pub use resolver::{CombatResolver, PendingImpact, TIME_EPSILON};
pub use systems::{resolve_impacts, start_attacks};

use crate::{LogicTick, SimSet};

/// Combat Plugin
///
/// Actions set:
/// 1. start_attacks: новые атаки (cooldown, force Attack)
/// 2. resolve_impacts: удары, чьё время наступило
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackRequest>()
            .add_event::<AttackStarted>()
            .add_event::<DamageDealt>()
            .add_event::<AttackCompleted>();

        app.add_systems(
            LogicTick,
            (start_attacks, resolve_impacts).chain().in_set(SimSet::Actions),
        );
    }
}
