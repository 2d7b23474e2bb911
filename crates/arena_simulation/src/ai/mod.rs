//! AI decision-making module
//!
//! DecisionPolicy для NPC (опрос раз в 0.5s), TapInput для игрока.
//! Оба пишут одинаковые запросы: MoveRequest, AttackRequest, StateChangeRequest.

use bevy::prelude::*;

pub mod decision;
pub mod player;

pub use decision::{decide, tick_decision_policies, Decision, DecisionPolicy, DEFAULT_DECISION_INTERVAL};
pub use player::{handle_tap_input, TapInput};

use crate::{LogicTick, SimSet};

/// AI Plugin
///
/// Decision set:
/// 1. handle_tap_input: input игрока
/// 2. tick_decision_policies: опрос AI
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TapInput>();

        app.add_systems(
            LogicTick,
            (handle_tap_input, tick_decision_policies)
                .chain()
                .in_set(SimSet::Decision),
        );
    }
}
