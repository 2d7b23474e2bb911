//! Animation cues: мост от симуляции к внешнему анимационному слою
//!
//! Core не проигрывает клипы. Он пишет `AnimationCue`, а `dispatch_animation_cues`
//! раздаёт их всем зарегистрированным sink'ам (движок, лог, тесты).
//! Без sink'ов cues молча отбрасываются.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use crate::behavior::BehaviorStateType;
use crate::combat::CombatResolver;
use crate::components::{MovementController, StatsInstance};
use crate::{LogicTick, SimSet};

/// Animation Plugin
///
/// Presentation set: параметры → dispatch (cues тика уходят sink'ам в конце logic фазы).
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationCue>().init_resource::<AnimationSinks>();

        app.add_systems(
            LogicTick,
            (update_animation_parameters, dispatch_animation_cues)
                .chain()
                .in_set(SimSet::Presentation),
        );
    }
}

/// Изменение анимации персонажа
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum AnimationCue {
    /// Проиграть анимацию состояния (на Enter)
    PlayState { entity: Entity, state: BehaviorStateType },
    /// Нормализованная скорость движения (0 = стоит, 1 = полная скорость)
    MoveSpeed { entity: Entity, value: f32 },
    /// Множитель скорости атаки
    AttackSpeed { entity: Entity, value: f32 },
}

impl AnimationCue {
    pub fn entity(&self) -> Entity {
        match self {
            AnimationCue::PlayState { entity, .. }
            | AnimationCue::MoveSpeed { entity, .. }
            | AnimationCue::AttackSpeed { entity, .. } => *entity,
        }
    }
}

/// Получатель анимационных команд (реализуется движком)
pub trait AnimationCueSink: Send + Sync {
    fn play_state_animation(&mut self, entity: Entity, state: BehaviorStateType);
    fn set_move_speed_parameter(&mut self, entity: Entity, value: f32);
    fn set_attack_speed_parameter(&mut self, entity: Entity, value: f32);
}

/// Зарегистрированные sink'и (вызываются в порядке регистрации)
#[derive(Resource, Default)]
pub struct AnimationSinks {
    sinks: Vec<Box<dyn AnimationCueSink>>,
}

impl AnimationSinks {
    pub fn register(&mut self, sink: impl AnimationCueSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn dispatch(&mut self, cue: &AnimationCue) {
        for sink in self.sinks.iter_mut() {
            match *cue {
                AnimationCue::PlayState { entity, state } => sink.play_state_animation(entity, state),
                AnimationCue::MoveSpeed { entity, value } => sink.set_move_speed_parameter(entity, value),
                AnimationCue::AttackSpeed { entity, value } => sink.set_attack_speed_parameter(entity, value),
            }
        }
    }
}

/// Sink, который складывает cues в общий буфер (тесты, headless replay)
#[derive(Clone, Default)]
pub struct CueRecorder {
    cues: Arc<Mutex<Vec<AnimationCue>>>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<AnimationCue> {
        self.cues.lock().map(|cues| cues.clone()).unwrap_or_default()
    }

    /// Последовательность PlayState для entity
    pub fn states_played(&self, entity: Entity) -> Vec<BehaviorStateType> {
        self.cues()
            .into_iter()
            .filter_map(|cue| match cue {
                AnimationCue::PlayState { entity: e, state } if e == entity => Some(state),
                _ => None,
            })
            .collect()
    }

    fn push(&self, cue: AnimationCue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}

impl AnimationCueSink for CueRecorder {
    fn play_state_animation(&mut self, entity: Entity, state: BehaviorStateType) {
        self.push(AnimationCue::PlayState { entity, state });
    }

    fn set_move_speed_parameter(&mut self, entity: Entity, value: f32) {
        self.push(AnimationCue::MoveSpeed { entity, value });
    }

    fn set_attack_speed_parameter(&mut self, entity: Entity, value: f32) {
        self.push(AnimationCue::AttackSpeed { entity, value });
    }
}

/// Последние отправленные значения анимационных параметров
///
/// Cue пишется только при изменении значения.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimationParameters {
    pub move_speed: f32,
    pub attack_speed: f32,
}

impl Default for AnimationParameters {
    fn default() -> Self {
        Self {
            move_speed: 0.0,
            attack_speed: 1.0,
        }
    }
}

/// System: move/attack speed параметры из контроллеров
pub fn update_animation_parameters(
    mut characters: Query<(
        Entity,
        &MovementController,
        &CombatResolver,
        &StatsInstance,
        &mut AnimationParameters,
    )>,
    mut cues: EventWriter<AnimationCue>,
) {
    for (entity, movement, resolver, stats, mut params) in characters.iter_mut() {
        let move_speed = if stats.move_speed > 0.0 {
            movement.current_speed() / stats.move_speed
        } else {
            0.0
        };

        if (move_speed - params.move_speed).abs() > f32::EPSILON {
            params.move_speed = move_speed;
            cues.write(AnimationCue::MoveSpeed { entity, value: move_speed });
        }

        let attack_speed = resolver.attack_speed_multiplier();
        if (attack_speed - params.attack_speed).abs() > f32::EPSILON {
            params.attack_speed = attack_speed;
            cues.write(AnimationCue::AttackSpeed { entity, value: attack_speed });
        }
    }
}

/// System: раздать cues тика всем sink'ам
pub fn dispatch_animation_cues(mut events: EventReader<AnimationCue>, sinks: Option<ResMut<AnimationSinks>>) {
    let Some(mut sinks) = sinks else {
        events.clear();
        return;
    };

    for cue in events.read() {
        sinks.dispatch(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sinks_receive_in_registration_order() {
        let first = CueRecorder::new();
        let second = CueRecorder::new();

        let mut sinks = AnimationSinks::default();
        sinks.register(first.clone());
        sinks.register(second.clone());
        assert_eq!(sinks.len(), 2);

        let entity = Entity::from_raw(3);
        sinks.dispatch(&AnimationCue::PlayState {
            entity,
            state: BehaviorStateType::Hit,
        });
        sinks.dispatch(&AnimationCue::MoveSpeed { entity, value: 0.5 });

        assert_eq!(first.cues(), second.cues());
        assert_eq!(first.states_played(entity), vec![BehaviorStateType::Hit]);
        assert_eq!(first.cues()[1].entity(), entity);
    }

    #[test]
    fn test_recorder_filters_by_entity() {
        let recorder = CueRecorder::new();
        let mut sink = recorder.clone();

        sink.play_state_animation(Entity::from_raw(1), BehaviorStateType::Chase);
        sink.play_state_animation(Entity::from_raw(2), BehaviorStateType::Dead);

        assert_eq!(recorder.states_played(Entity::from_raw(2)), vec![BehaviorStateType::Dead]);
    }
}
