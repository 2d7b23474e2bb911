//! Behavior domain: FSM персонажа
//!
//! Порядок в LogicTick:
//! 1. StateUpdate: update_active_states (таймеры → запросы Idle)
//! 2. Reactions: react_to_health_events → apply_state_requests
//!
//! Все смены состояния проходят через `StateChangeRequest`, поэтому правило
//! "из Dead только через Revive" проверяется в одном месте.

use bevy::prelude::*;

pub mod events;
pub mod state;
pub mod systems;

#[cfg(test)]
mod state_tests;

pub use events::{StateChangeRequest, StateChanged};
pub use state::{BehaviorState, BehaviorStateMachine, BehaviorStateType, StateHooks, StateTransition};
pub use systems::{apply_state_requests, react_to_health_events, update_active_states};

use crate::{LogicTick, SimSet};

pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StateChangeRequest>().add_event::<StateChanged>();

        app.add_systems(LogicTick, update_active_states.in_set(SimSet::StateUpdate));
        app.add_systems(
            LogicTick,
            (react_to_health_events, apply_state_requests)
                .chain()
                .in_set(SimSet::Reactions),
        );
    }
}
