//! Behavior systems: тик состояний, реакции на здоровье, применение запросов

use bevy::prelude::*;

use super::{BehaviorStateMachine, BehaviorStateType, StateChangeRequest, StateChanged, StateHooks};
use crate::animation::AnimationCue;
use crate::components::{HealthStatus, Hurtbox, MovementController, PhysicsBody};
use crate::config::SimulationConfig;
use crate::health::HealthEvent;
use crate::logger;

/// Побочные эффекты Enter/Exit для одного персонажа
///
/// - Enter любого состояния кроме Chase гасит остаточное движение
///   (Chase входит уже после MoveTo)
/// - Enter пишет PlayState cue
/// - Dead выключает hurtbox, выход из Dead включает обратно
/// - Exit Chase останавливает движение
struct StateEffects<'a> {
    entity: Entity,
    movement: &'a mut MovementController,
    hurtbox: &'a mut Hurtbox,
    body: Option<&'a mut PhysicsBody>,
    cues: &'a mut Vec<AnimationCue>,
}

impl StateEffects<'_> {
    fn stop_movement(&mut self) {
        self.movement.stop();
        if let Some(body) = self.body.as_deref_mut() {
            body.stop_horizontal();
        }
    }
}

impl StateHooks for StateEffects<'_> {
    fn exit(&mut self, state: BehaviorStateType) {
        match state {
            BehaviorStateType::Chase => self.stop_movement(),
            BehaviorStateType::Dead => self.hurtbox.enabled = true,
            _ => {}
        }
    }

    fn enter(&mut self, state: BehaviorStateType) {
        if state != BehaviorStateType::Chase {
            self.stop_movement();
        }
        if state == BehaviorStateType::Dead {
            self.hurtbox.enabled = false;
        }

        self.cues.push(AnimationCue::PlayState {
            entity: self.entity,
            state,
        });
    }
}

/// System: per-tick update активного состояния
///
/// Истёкшие таймеры (Attack/Hit/Victory) и снятое оглушение превращаются
/// в запрос Idle с условием "ещё в этом состоянии".
pub fn update_active_states(
    time: Res<Time>,
    config: Res<SimulationConfig>,
    mut machines: Query<(Entity, &mut BehaviorStateMachine, &HealthStatus)>,
    mut requests: EventWriter<StateChangeRequest>,
) {
    let delta = time.delta_secs();

    for (entity, mut fsm, health) in machines.iter_mut() {
        let current = fsm.current_type();
        if let Some(next) = fsm.update_logic(delta, &config.timings, health.is_stunned()) {
            requests.write(StateChangeRequest::change(entity, next).when_in(current));
        }
    }
}

/// System: HealthEvent → запросы смены состояния
///
/// | Событие        | Запрос                     |
/// |----------------|----------------------------|
/// | Died           | Dead                       |
/// | WasHit         | force Hit                  |
/// | Stunned        | force Stunned              |
/// | StunRecovered  | Idle, только из Stunned    |
/// | Revived        | force Idle (выход из Dead) |
pub fn react_to_health_events(
    mut events: EventReader<HealthEvent>,
    mut requests: EventWriter<StateChangeRequest>,
) {
    for event in events.read() {
        let request = match *event {
            HealthEvent::Died { entity, .. } => StateChangeRequest::change(entity, BehaviorStateType::Dead),
            HealthEvent::WasHit { entity, .. } => StateChangeRequest::force(entity, BehaviorStateType::Hit),
            HealthEvent::Stunned { entity, .. } => StateChangeRequest::force(entity, BehaviorStateType::Stunned),
            HealthEvent::StunRecovered { entity } => {
                StateChangeRequest::change(entity, BehaviorStateType::Idle).when_in(BehaviorStateType::Stunned)
            }
            HealthEvent::Revived { entity, .. } => StateChangeRequest::force(entity, BehaviorStateType::Idle),
            HealthEvent::Changed { .. } => continue,
        };
        requests.write(request);
    }
}

/// System: применить запросы тика в порядке записи
///
/// Из Dead выпускает только форсированный Idle (Revive).
pub fn apply_state_requests(
    mut requests: EventReader<StateChangeRequest>,
    mut characters: Query<(
        &mut BehaviorStateMachine,
        &mut MovementController,
        &mut Hurtbox,
        Option<&mut PhysicsBody>,
    )>,
    mut changed: EventWriter<StateChanged>,
    mut cue_events: EventWriter<AnimationCue>,
) {
    let mut cues = Vec::new();

    for request in requests.read() {
        let Ok((mut fsm, mut movement, mut hurtbox, mut body)) = characters.get_mut(request.entity) else {
            continue;
        };

        let current = fsm.current_type();

        if request.only_from.is_some_and(|required| required != current) {
            continue;
        }

        if current == BehaviorStateType::Dead && !(request.force && request.state == BehaviorStateType::Idle) {
            continue;
        }

        let mut effects = StateEffects {
            entity: request.entity,
            movement: &mut *movement,
            hurtbox: &mut *hurtbox,
            body: body.as_deref_mut(),
            cues: &mut cues,
        };

        let transition = if request.force {
            Some(fsm.force_change_state(request.state, &mut effects))
        } else {
            fsm.change_state(request.state, &mut effects)
        };

        if let Some(transition) = transition {
            logger::log(&format!(
                "{:?}: {} → {}",
                request.entity,
                transition.from.as_str(),
                transition.to.as_str()
            ));
            changed.write(StateChanged {
                entity: request.entity,
                from: transition.from,
                to: transition.to,
            });
        }
    }

    cue_events.write_batch(cues);
}
