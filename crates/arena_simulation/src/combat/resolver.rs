//! CombatResolver: cooldown, in-flight атака и боевые модификаторы персонажа

use bevy::prelude::*;

use crate::components::StatsInstance;

/// Допуск сравнения моментов времени (накопление f32 в `Time::elapsed`)
pub const TIME_EPSILON: f32 = 1e-4;

/// Запланированный удар (через impact delay после начала атаки)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct PendingImpact {
    /// Абсолютное время симуляции
    pub fire_at: f32,
    /// Цель на момент начала атаки (на импакте цель выбирается заново)
    pub target: Entity,
}

/// Боевой resolver персонажа
///
/// Инвариант: `pending.is_some() == attacking`: одна атака за раз.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CombatResolver {
    attacking: bool,
    /// `None`: ещё не атаковал (cooldown не действует)
    last_attack_time: Option<f32>,
    attack_speed_multiplier: f32,
    damage_multiplier: f32,
    critical_chance: f32,
    critical_damage: f32,
    /// Радиус поиска цели на импакте
    search_radius: f32,
    pending: Option<PendingImpact>,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::from_stats(&StatsInstance::default())
    }
}

impl CombatResolver {
    pub fn from_stats(stats: &StatsInstance) -> Self {
        let mut resolver = Self {
            attacking: false,
            last_attack_time: None,
            attack_speed_multiplier: 1.0,
            damage_multiplier: 1.0,
            critical_chance: 0.0,
            critical_damage: 1.0,
            search_radius: 0.0,
            pending: None,
        };
        resolver.reinitialize(stats);
        resolver
    }

    /// Перечитать модификаторы из новых stats (multipliers сохраняются)
    pub fn reinitialize(&mut self, stats: &StatsInstance) {
        self.set_critical_chance(stats.critical_chance);
        self.set_critical_damage(stats.critical_multiplier);
        self.search_radius = stats.range_attack_power.max(0.0);
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn last_attack_time(&self) -> Option<f32> {
        self.last_attack_time
    }

    pub fn attack_speed_multiplier(&self) -> f32 {
        self.attack_speed_multiplier
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.damage_multiplier
    }

    pub fn critical_chance(&self) -> f32 {
        self.critical_chance
    }

    pub fn critical_damage(&self) -> f32 {
        self.critical_damage
    }

    pub fn search_radius(&self) -> f32 {
        self.search_radius
    }

    pub fn pending_impact(&self) -> Option<PendingImpact> {
        self.pending
    }

    /// Cooldown с учётом attack speed
    pub fn effective_cooldown(&self, base_cooldown: f32) -> f32 {
        base_cooldown / self.attack_speed_multiplier
    }

    pub fn can_attack(&self, now: f32, base_cooldown: f32) -> bool {
        if self.attacking {
            return false;
        }

        match self.last_attack_time {
            None => true,
            Some(last) => now - last + TIME_EPSILON >= self.effective_cooldown(base_cooldown),
        }
    }

    /// Начать атаку. `false`: cooldown или атака уже идёт.
    pub fn begin_attack(&mut self, now: f32, base_cooldown: f32, target: Entity, impact_delay: f32) -> bool {
        if !self.can_attack(now, base_cooldown) {
            return false;
        }

        self.attacking = true;
        self.last_attack_time = Some(now);
        self.pending = Some(PendingImpact {
            fire_at: now + impact_delay.max(0.0),
            target,
        });
        true
    }

    /// Забрать удар, время которого наступило (атака при этом завершается)
    pub fn take_due_impact(&mut self, now: f32) -> Option<PendingImpact> {
        let impact = self.pending?;
        if impact.fire_at > now + TIME_EPSILON {
            return None;
        }

        self.complete();
        Some(impact)
    }

    fn complete(&mut self) {
        self.attacking = false;
        self.pending = None;
    }

    /// Множитель скорости атаки (> 0)
    pub fn set_attack_speed_multiplier(&mut self, multiplier: f32) {
        self.attack_speed_multiplier = positive(multiplier, self.attack_speed_multiplier);
    }

    /// Множитель урона (> 0)
    pub fn set_damage_multiplier(&mut self, multiplier: f32) {
        self.damage_multiplier = positive(multiplier, self.damage_multiplier);
    }

    pub fn set_critical_chance(&mut self, chance: f32) {
        self.critical_chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
    }

    pub fn set_critical_damage(&mut self, multiplier: f32) {
        self.critical_damage = if multiplier.is_finite() { multiplier.max(1.0) } else { 1.0 };
    }
}

// Некорректное значение (≤ 0, NaN) оставляет прежнее
fn positive(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Entity {
        Entity::from_raw(9)
    }

    #[test]
    fn test_first_attack_ignores_cooldown() {
        let resolver = CombatResolver::default();
        assert!(resolver.can_attack(0.0, 1.5));
    }

    #[test]
    fn test_cooldown_gates_next_attack() {
        let mut resolver = CombatResolver::default();
        assert!(resolver.begin_attack(0.0, 1.5, target(), 0.3));

        // Пока атака в полёте: нельзя
        assert!(!resolver.can_attack(0.1, 1.5));
        assert!(resolver.take_due_impact(0.2).is_none());
        assert!(resolver.take_due_impact(0.3).is_some());
        assert!(!resolver.is_attacking());

        assert!(!resolver.begin_attack(1.0, 1.5, target(), 0.3));
        assert!(resolver.begin_attack(1.6, 1.5, target(), 0.3));
        assert_eq!(resolver.last_attack_time(), Some(1.6));
    }

    #[test]
    fn test_attack_speed_shortens_cooldown() {
        let mut resolver = CombatResolver::default();
        resolver.set_attack_speed_multiplier(2.0);
        assert_eq!(resolver.effective_cooldown(1.5), 0.75);

        resolver.begin_attack(0.0, 1.5, target(), 0.3);
        resolver.take_due_impact(0.3);
        assert!(resolver.can_attack(0.8, 1.5));
    }

    #[test]
    fn test_setters_clamp() {
        let mut resolver = CombatResolver::default();

        resolver.set_attack_speed_multiplier(0.0);
        assert_eq!(resolver.attack_speed_multiplier(), 1.0);
        resolver.set_damage_multiplier(-3.0);
        assert_eq!(resolver.damage_multiplier(), 1.0);

        resolver.set_critical_chance(1.7);
        assert_eq!(resolver.critical_chance(), 1.0);
        resolver.set_critical_chance(-0.2);
        assert_eq!(resolver.critical_chance(), 0.0);

        resolver.set_critical_damage(0.5);
        assert_eq!(resolver.critical_damage(), 1.0);
    }

    #[test]
    fn test_initialised_from_stats() {
        let stats = StatsInstance {
            critical_chance: 0.25,
            critical_multiplier: 2.0,
            range_attack_power: 12.0,
            ..default()
        };

        let resolver = CombatResolver::from_stats(&stats);
        assert_eq!(resolver.critical_chance(), 0.25);
        assert_eq!(resolver.critical_damage(), 2.0);
        assert_eq!(resolver.search_radius(), 12.0);
    }
}
