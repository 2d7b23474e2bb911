//! Базовые компоненты персонажа: identity, фракция, hurtbox, радиусы боя

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationParameters;
use crate::behavior::BehaviorStateMachine;
use crate::combat::CombatResolver;
use crate::components::{HealthStatus, MovementController, StatsInstance};

/// Тип персонажа (кто им управляет / как он отображается)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    Player,
    Enemy,
    Friendly,
}

/// Командная принадлежность: определяет врагов и союзников
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    PlayerTeam,
    EnemyTeam,
    NeutralTeam,
}

/// Персонаж арены
///
/// Автоматически добавляет остальные части персонажа через Required Components.
/// Явный `CharacterBundle` (см. `spawn`) подставляет stats/health из шаблона.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    StatsInstance,
    HealthStatus,
    MovementController,
    CombatResolver,
    BehaviorStateMachine,
    Hurtbox,
    CombatRanges,
    AnimationParameters
)]
pub struct Character {
    pub id: u32,
    pub kind: CharacterKind,
    pub faction: Faction,
}

impl Character {
    pub fn new(id: u32, kind: CharacterKind, faction: Faction) -> Self {
        Self { id, kind, faction }
    }

    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    pub fn is_enemy(&self) -> bool {
        self.kind == CharacterKind::Enemy
    }

    pub fn is_friendly(&self) -> bool {
        self.kind == CharacterKind::Friendly
    }

    pub fn is_player_team(&self) -> bool {
        self.faction == Faction::PlayerTeam
    }

    pub fn is_enemy_team(&self) -> bool {
        self.faction == Faction::EnemyTeam
    }

    /// Враги: разные фракции
    pub fn is_enemy_of(&self, other: &Character) -> bool {
        self.faction != other.faction
    }

    /// Союзники: одна фракция, но не сам персонаж
    ///
    /// "Сам" определяется по `id`, поэтому id должны быть уникальны на арене.
    /// Поиск в мире (`SpatialQuery::find_allies_in_range`) сравнивает Entity.
    pub fn is_ally_of(&self, other: &Character) -> bool {
        self.faction == other.faction && self.id != other.id
    }
}

/// Участвует ли персонаж в hit detection
///
/// Выключается на входе в Dead, включается обратно на выходе (Revive).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub enabled: bool,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Радиусы для выбора цели (AI и player input)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatRanges {
    /// Радиус обнаружения врагов
    pub detection_range: f32,
    /// Радиус, в котором можно начинать атаку
    pub attack_range: f32,
}

impl Default for CombatRanges {
    fn default() -> Self {
        Self {
            detection_range: 10.0,
            attack_range: 2.0,
        }
    }
}

/// Маркер: персонаж управляется игроком (tap/click → атака)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerControlled;

/// Расстояние между двумя точками
pub fn distance(from: Vec3, to: Vec3) -> f32 {
    from.distance(to)
}

/// Нормализованное направление (ZERO если точки совпадают)
pub fn direction(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_and_ally_relations() {
        let hero = Character::new(1, CharacterKind::Player, Faction::PlayerTeam);
        let buddy = Character::new(2, CharacterKind::Friendly, Faction::PlayerTeam);
        let brute = Character::new(3, CharacterKind::Enemy, Faction::EnemyTeam);
        let bystander = Character::new(4, CharacterKind::Friendly, Faction::NeutralTeam);

        assert!(hero.is_enemy_of(&brute));
        assert!(hero.is_enemy_of(&bystander));
        assert!(!hero.is_enemy_of(&buddy));

        assert!(hero.is_ally_of(&buddy));
        assert!(!hero.is_ally_of(&hero));
        assert!(!hero.is_ally_of(&brute));
    }

    #[test]
    fn test_kind_and_team_flags() {
        let brute = Character::new(3, CharacterKind::Enemy, Faction::EnemyTeam);
        assert!(brute.is_enemy());
        assert!(brute.is_enemy_team());
        assert!(!brute.is_player());
        assert!(!brute.is_player_team());
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(direction(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)), Vec3::Z);
        assert_eq!(direction(Vec3::ONE, Vec3::ONE), Vec3::ZERO);
        assert_eq!(distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)), 5.0);
    }
}
