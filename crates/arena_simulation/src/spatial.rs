//! Spatial queries: поиск ближайших врагов/союзников
//!
//! `ActorIndex`: snapshot позиций всех персонажей, пересобирается в начале
//! каждого logic тика. Смерти внутри тика отмечаются через `mark_dead`, чтобы
//! следующая атака в том же тике не попала в труп.

use bevy::prelude::*;

use crate::components::{Character, Faction, HealthStatus, Hurtbox};
use crate::spawn::{apply_character_commands, CharacterCommand};
use crate::{LogicTick, SimSet};

/// Spatial Plugin
///
/// Perception set: lifecycle команды (Enable/Disable) → пересборка индекса.
pub struct SpatialPlugin;

impl Plugin for SpatialPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CharacterCommand>().init_resource::<ActorIndex>();

        app.add_systems(
            LogicTick,
            (apply_character_commands, refresh_actor_index)
                .chain()
                .in_set(SimSet::Perception),
        );
    }
}

/// Что видно о персонаже при поиске
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorView {
    pub entity: Entity,
    pub character: Character,
    pub position: Vec3,
    pub alive: bool,
    /// Hurtbox включен (Dead выключает)
    pub targetable: bool,
}

impl ActorView {
    pub fn faction(&self) -> Faction {
        self.character.faction
    }

    /// Живой враг `of`, по которому можно попасть
    pub fn is_hostile_target_for(&self, of: &Character) -> bool {
        self.alive && self.targetable && of.is_enemy_of(&self.character)
    }
}

/// Интерфейс пространственного поиска (DI вместо глобального Physics.OverlapSphere)
pub trait SpatialQuery {
    fn find_nearest(
        &self,
        origin: Vec3,
        radius: f32,
        predicate: &dyn Fn(&ActorView) -> bool,
    ) -> Option<ActorView>;

    fn find_all_in_range(
        &self,
        origin: Vec3,
        radius: f32,
        predicate: &dyn Fn(&ActorView) -> bool,
    ) -> Vec<ActorView>;

    /// Ближайший живой враг `of` в радиусе
    fn find_nearest_enemy(&self, of: &Character, origin: Vec3, radius: f32) -> Option<ActorView> {
        self.find_nearest(origin, radius, &|view| view.is_hostile_target_for(of))
    }

    fn find_enemies_in_range(&self, of: &Character, origin: Vec3, radius: f32) -> Vec<ActorView> {
        self.find_all_in_range(origin, radius, &|view| view.is_hostile_target_for(of))
    }

    /// Живые союзники в радиусе. `entity` (сам персонаж) исключён по Entity, не по id.
    fn find_allies_in_range(&self, entity: Entity, of: &Character, origin: Vec3, radius: f32) -> Vec<ActorView> {
        self.find_all_in_range(origin, radius, &|view| {
            view.alive && view.entity != entity && view.faction() == of.faction
        })
    }
}

/// Snapshot персонажей мира (в порядке итерации Query: детерминирован)
#[derive(Resource, Debug, Clone, Default)]
pub struct ActorIndex {
    actors: Vec<ActorView>,
}

impl ActorIndex {
    pub fn from_views(actors: Vec<ActorView>) -> Self {
        Self { actors }
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn get(&self, entity: Entity) -> Option<&ActorView> {
        self.actors.iter().find(|view| view.entity == entity)
    }

    pub fn mark_dead(&mut self, entity: Entity) {
        if let Some(view) = self.actors.iter_mut().find(|view| view.entity == entity) {
            view.alive = false;
        }
    }
}

impl SpatialQuery for ActorIndex {
    fn find_nearest(
        &self,
        origin: Vec3,
        radius: f32,
        predicate: &dyn Fn(&ActorView) -> bool,
    ) -> Option<ActorView> {
        let mut nearest: Option<(ActorView, f32)> = None;

        for view in &self.actors {
            if !predicate(view) {
                continue;
            }

            let distance = origin.distance(view.position);
            if distance > radius {
                continue;
            }

            // Строгое сравнение: при равенстве выигрывает первый в индексе
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((*view, distance)),
            }
        }

        nearest.map(|(view, _)| view)
    }

    fn find_all_in_range(
        &self,
        origin: Vec3,
        radius: f32,
        predicate: &dyn Fn(&ActorView) -> bool,
    ) -> Vec<ActorView> {
        self.actors
            .iter()
            .filter(|view| predicate(view) && origin.distance(view.position) <= radius)
            .copied()
            .collect()
    }
}

/// Система: пересобрать `ActorIndex` из мира
pub fn refresh_actor_index(
    mut index: ResMut<ActorIndex>,
    actors: Query<(Entity, &Character, &Transform, &HealthStatus, &Hurtbox)>,
) {
    index.actors.clear();
    index.actors.extend(actors.iter().map(|(entity, character, transform, health, hurtbox)| ActorView {
        entity,
        character: *character,
        position: transform.translation,
        alive: health.is_alive(),
        targetable: hurtbox.enabled,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::CharacterKind;

    fn view(index: u32, faction: Faction, x: f32, alive: bool) -> ActorView {
        ActorView {
            entity: Entity::from_raw(index),
            character: Character::new(index, CharacterKind::Enemy, faction),
            position: Vec3::new(x, 0.0, 0.0),
            alive,
            targetable: alive,
        }
    }

    fn sample_index() -> ActorIndex {
        ActorIndex::from_views(vec![
            view(0, Faction::PlayerTeam, 0.0, true),
            view(1, Faction::EnemyTeam, 5.0, true),
            view(2, Faction::EnemyTeam, 3.0, true),
            view(3, Faction::EnemyTeam, 1.0, false),
            view(4, Faction::EnemyTeam, 15.0, true),
            view(5, Faction::PlayerTeam, 2.0, true),
        ])
    }

    #[test]
    fn test_nearest_enemy_skips_dead_and_far() {
        let index = sample_index();
        let hero = Character::new(0, CharacterKind::Player, Faction::PlayerTeam);

        let nearest = index
            .find_nearest_enemy(&hero, Vec3::ZERO, 10.0)
            .expect("enemy within range");
        assert_eq!(nearest.entity, Entity::from_raw(2));

        assert!(index.find_nearest_enemy(&hero, Vec3::ZERO, 2.5).is_none());
    }

    #[test]
    fn test_enemies_and_allies_in_range() {
        let index = sample_index();
        let hero = Character::new(0, CharacterKind::Player, Faction::PlayerTeam);

        let enemies = index.find_enemies_in_range(&hero, Vec3::ZERO, 10.0);
        assert_eq!(enemies.len(), 2);

        let allies = index.find_allies_in_range(Entity::from_raw(0), &hero, Vec3::ZERO, 10.0);
        assert_eq!(allies.len(), 1);
        assert_eq!(allies[0].entity, Entity::from_raw(5));
    }

    #[test]
    fn test_allies_with_default_ids() {
        // Required Components дают всем id 0
        let teammate = |index: u32, x: f32| ActorView {
            entity: Entity::from_raw(index),
            character: Character::default(),
            position: Vec3::new(x, 0.0, 0.0),
            alive: true,
            targetable: true,
        };
        let index = ActorIndex::from_views(vec![teammate(10, 0.0), teammate(11, 1.0), teammate(12, 2.0)]);

        let allies = index.find_allies_in_range(Entity::from_raw(10), &Character::default(), Vec3::ZERO, 10.0);
        let entities: Vec<Entity> = allies.iter().map(|view| view.entity).collect();
        assert_eq!(entities, vec![Entity::from_raw(11), Entity::from_raw(12)]);
    }

    #[test]
    fn test_mark_dead_hides_target() {
        let mut index = sample_index();
        let hero = Character::new(0, CharacterKind::Player, Faction::PlayerTeam);

        index.mark_dead(Entity::from_raw(2));
        let nearest = index
            .find_nearest_enemy(&hero, Vec3::ZERO, 10.0)
            .expect("next enemy");
        assert_eq!(nearest.entity, Entity::from_raw(1));
    }

    #[test]
    fn test_tie_keeps_first() {
        let index = ActorIndex::from_views(vec![
            view(7, Faction::EnemyTeam, 2.0, true),
            view(8, Faction::EnemyTeam, -2.0, true),
        ]);

        let nearest = index.find_nearest(Vec3::ZERO, 5.0, &|_| true).expect("one of two");
        assert_eq!(nearest.entity, Entity::from_raw(7));
    }
}
