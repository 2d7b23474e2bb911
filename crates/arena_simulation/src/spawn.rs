//! Spawn персонажей и переназначение характеристик
//!
//! Lifetime entity принадлежит вызывающей стороне: core только собирает
//! согласованный набор компонентов и обрабатывает lifecycle события.

use bevy::ecs::entity_disabling::Disabled;
use bevy::prelude::*;

use crate::behavior::{BehaviorStateType, StateChangeRequest};
use crate::combat::CombatResolver;
use crate::components::{
    Character, CombatRanges, HealthStatus, LevelScaling, MovementController, PhysicsBody,
    StatsInstance, StatsTemplate,
};
use crate::config::SimulationConfig;
use crate::logger;

/// Источник stats шаблонов (каталог уровня, RON, тестовые данные)
pub trait StatsProvider {
    fn template(&self, name: &str) -> Option<&StatsTemplate>;

    /// Прогрессия уровня, если текущий уровень её задаёт
    fn level_scaling(&self) -> Option<LevelScaling> {
        None
    }

    /// Runtime stats по имени шаблона (с учётом прогрессии)
    fn instantiate(&self, name: &str) -> Option<StatsInstance> {
        let template = self.template(name)?;
        Some(match self.level_scaling() {
            Some(scaling) => StatsInstance::with_level(template, &scaling),
            None => StatsInstance::from_template(template),
        })
    }
}

/// Полный набор компонентов персонажа, согласованный со stats
///
/// Health/resolver/movement инициализируются из `StatsInstance` и конфига,
/// остальное добавляют Required Components `Character`.
#[derive(Bundle)]
pub struct CharacterBundle {
    pub character: Character,
    pub transform: Transform,
    pub stats: StatsInstance,
    pub health: HealthStatus,
    pub resolver: CombatResolver,
    pub movement: MovementController,
    pub ranges: CombatRanges,
}

impl CharacterBundle {
    pub fn new(character: Character, stats: StatsInstance, position: Vec3, config: &SimulationConfig) -> Self {
        Self {
            character,
            transform: Transform::from_translation(position),
            health: HealthStatus::new(stats.max_health),
            resolver: CombatResolver::from_stats(&stats),
            movement: MovementController::with_stop_epsilon(config.stop_epsilon),
            ranges: CombatRanges {
                detection_range: config.detection_range,
                attack_range: config.attack_range,
            },
            stats,
        }
    }
}

/// Spawn персонажа с physics body (velocity пишет контроллер движения)
pub fn spawn_character(
    commands: &mut Commands,
    character: Character,
    stats: StatsInstance,
    position: Vec3,
    config: &SimulationConfig,
) -> Entity {
    logger::log(&format!(
        "spawn character #{} ({:?}/{:?}) {}",
        character.id, character.kind, character.faction, stats
    ));

    commands
        .spawn((CharacterBundle::new(character, stats, position, config), PhysicsBody::default()))
        .id()
}

/// Переназначить характеристики (заменяет StatsInstance целиком)
#[derive(Event, Debug, Clone)]
pub struct AssignStats {
    pub entity: Entity,
    pub stats: StatsInstance,
}

/// Lifecycle команды персонажа
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterCommand {
    /// Стоп + Idle
    ResetToIdle { entity: Entity },
    /// Вернуть выключенного персонажа в симуляцию (сразу Idle)
    Enable { entity: Entity },
    /// Остановить и исключить из всех запросов
    Disable { entity: Entity },
}

/// System: AssignStats → новые stats, health и resolver
///
/// Живой персонаж получает полное здоровье нового максимума, мёртвый остаётся с 0.
pub fn apply_stat_assignments(
    mut events: EventReader<AssignStats>,
    mut characters: Query<(&mut StatsInstance, &mut HealthStatus, &mut CombatResolver)>,
) {
    for event in events.read() {
        let Ok((mut stats, mut health, mut resolver)) = characters.get_mut(event.entity) else {
            continue;
        };

        *stats = event.stats.clone().clamped();
        health.reset_max(stats.max_health);
        resolver.reinitialize(&stats);

        logger::log_info(&format!("{:?} stats reassigned: {}", event.entity, *stats));
    }
}

/// System: Reset/Enable/Disable
///
/// Disable прячет entity за `Disabled`, остальные системы его не видят.
/// `Has<Disabled>` в запросе включает выключенные entity в выборку.
pub fn apply_character_commands(
    mut commands: Commands,
    mut events: EventReader<CharacterCommand>,
    mut state_requests: EventWriter<StateChangeRequest>,
    mut movement: Query<(&mut MovementController, Has<Disabled>)>,
) {
    for event in events.read() {
        match *event {
            CharacterCommand::ResetToIdle { entity } => {
                if let Ok((mut controller, _)) = movement.get_mut(entity) {
                    controller.stop();
                }
                state_requests.write(StateChangeRequest::change(entity, BehaviorStateType::Idle));
            }
            CharacterCommand::Enable { entity } => {
                if let Ok((mut controller, _)) = movement.get_mut(entity) {
                    controller.stop();
                }
                commands.entity(entity).remove::<Disabled>();
                state_requests.write(StateChangeRequest::change(entity, BehaviorStateType::Idle));
                logger::log(&format!("{:?} enabled", entity));
            }
            CharacterCommand::Disable { entity } => {
                if let Ok((mut controller, _)) = movement.get_mut(entity) {
                    controller.stop();
                }
                commands.entity(entity).insert(Disabled);
                logger::log(&format!("{:?} disabled", entity));
            }
        }
    }
}
