//! Tests for behavior FSM.

#[cfg(test)]
mod tests {
    use super::super::state::*;
    use crate::config::BehaviorTimings;

    /// Записывает порядок вызовов Exit/Enter
    #[derive(Default)]
    struct RecordingHooks {
        calls: Vec<String>,
    }

    impl StateHooks for RecordingHooks {
        fn exit(&mut self, state: BehaviorStateType) {
            self.calls.push(format!("exit {}", state.as_str()));
        }

        fn enter(&mut self, state: BehaviorStateType) {
            self.calls.push(format!("enter {}", state.as_str()));
        }
    }

    #[test]
    fn test_initial_state_is_idle() {
        let fsm = BehaviorStateMachine::default();
        assert_eq!(fsm.current_type(), BehaviorStateType::Idle);
    }

    #[test]
    fn test_change_to_same_state_is_noop() {
        let mut fsm = BehaviorStateMachine::default();
        let mut hooks = RecordingHooks::default();

        assert_eq!(fsm.change_state(BehaviorStateType::Idle, &mut hooks), None);
        assert!(hooks.calls.is_empty());
    }

    #[test]
    fn test_change_runs_exit_then_enter() {
        let mut fsm = BehaviorStateMachine::default();
        let mut hooks = RecordingHooks::default();

        let transition = fsm.change_state(BehaviorStateType::Chase, &mut hooks);

        assert_eq!(
            transition,
            Some(StateTransition {
                from: BehaviorStateType::Idle,
                to: BehaviorStateType::Chase,
            })
        );
        assert_eq!(hooks.calls, vec!["exit Idle", "enter Chase"]);
    }

    #[test]
    fn test_force_restarts_attack_timer() {
        let timings = BehaviorTimings::default();
        let mut fsm = BehaviorStateMachine::default();
        let mut hooks = RecordingHooks::default();

        fsm.force_change_state(BehaviorStateType::Attack, &mut hooks);
        assert_eq!(fsm.update_logic(0.6, &timings, false), None);

        // Повторный вход в Attack обнуляет таймер
        let transition = fsm.force_change_state(BehaviorStateType::Attack, &mut hooks);
        assert_eq!(transition.from, BehaviorStateType::Attack);
        assert_eq!(*fsm.current(), BehaviorState::Attack { elapsed: 0.0 });

        assert_eq!(fsm.update_logic(0.6, &timings, false), None);
        assert_eq!(fsm.update_logic(0.5, &timings, false), Some(BehaviorStateType::Idle));
    }

    #[test]
    fn test_timed_states_request_idle() {
        let timings = BehaviorTimings::default();
        let cases = [
            (BehaviorStateType::Hit, 0.8),
            (BehaviorStateType::Attack, 1.0),
            (BehaviorStateType::Victory, 3.0),
        ];

        for (state, duration) in cases {
            let mut fsm = BehaviorStateMachine::default();
            fsm.force_change_state(state, &mut ());

            assert_eq!(fsm.update_logic(duration * 0.5, &timings, false), None, "{:?}", state);
            assert_eq!(
                fsm.update_logic(duration * 0.5, &timings, false),
                Some(BehaviorStateType::Idle),
                "{:?}",
                state
            );
        }
    }

    #[test]
    fn test_stunned_waits_for_health_flag() {
        let timings = BehaviorTimings::default();
        let mut fsm = BehaviorStateMachine::default();
        fsm.force_change_state(BehaviorStateType::Stunned, &mut ());

        assert_eq!(fsm.update_logic(10.0, &timings, true), None);
        assert_eq!(fsm.update_logic(0.1, &timings, false), Some(BehaviorStateType::Idle));
    }

    #[test]
    fn test_untimed_states_never_request() {
        let timings = BehaviorTimings::default();
        for state in [BehaviorStateType::Idle, BehaviorStateType::Chase, BehaviorStateType::Dead] {
            let mut fsm = BehaviorStateMachine::default();
            fsm.force_change_state(state, &mut ());
            assert_eq!(fsm.update_logic(100.0, &timings, false), None);
        }
    }

    #[test]
    fn test_entered_state_round_trips_kind() {
        for kind in BehaviorStateType::ALL {
            assert_eq!(BehaviorState::entered(kind).kind(), kind);
        }
    }
}
