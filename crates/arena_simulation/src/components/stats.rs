//! Боевые характеристики: шаблон (static config) + runtime копия на персонаже

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Шаблон характеристик (authoring data, не меняется в рантайме)
///
/// Загружается из RON каталога или создаётся в коде.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct StatsTemplate {
    pub name: String,
    pub max_health: f32,
    pub attack_power: f32,
    /// Cooldown между атаками (секунды)
    pub attack_cooldown: f32,
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    pub has_range_attack: bool,
    pub range_attack_power: f32,
    /// Вероятность крита [0, 1]
    pub critical_chance: f32,
    /// Множитель урона крита (≥ 1)
    pub critical_multiplier: f32,
}

impl Default for StatsTemplate {
    fn default() -> Self {
        Self {
            name: "Default Character".to_string(),
            max_health: 100.0,
            attack_power: 20.0,
            attack_cooldown: 1.5,
            move_speed: 3.0,
            has_range_attack: false,
            range_attack_power: 15.0,
            critical_chance: 0.05,
            critical_multiplier: 1.5,
        }
    }
}

/// Дескриптор прогрессии уровня
///
/// Все множители применяются мультипликативно к шаблону.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LevelScaling {
    pub level: u32,
    pub health: f32,
    pub damage: f32,
    pub crit: f32,
    pub speed: f32,
}

impl Default for LevelScaling {
    fn default() -> Self {
        Self {
            level: 1,
            health: 1.0,
            damage: 1.0,
            crit: 1.0,
            speed: 1.0,
        }
    }
}

/// Runtime характеристики персонажа
///
/// Инвариант: critical_chance ∈ [0, 1], critical_multiplier ≥ 1, остальное ≥ 0.
/// Заменяется целиком при переназначении (см. `AssignStats`).
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct StatsInstance {
    pub name: String,
    pub max_health: f32,
    pub attack_power: f32,
    pub attack_cooldown: f32,
    pub move_speed: f32,
    pub has_range_attack: bool,
    pub range_attack_power: f32,
    pub critical_chance: f32,
    pub critical_multiplier: f32,
}

impl Default for StatsInstance {
    fn default() -> Self {
        Self::from_template(&StatsTemplate::default())
    }
}

impl StatsInstance {
    pub fn from_template(template: &StatsTemplate) -> Self {
        Self {
            name: template.name.clone(),
            max_health: template.max_health,
            attack_power: template.attack_power,
            attack_cooldown: template.attack_cooldown,
            move_speed: template.move_speed,
            has_range_attack: template.has_range_attack,
            range_attack_power: template.range_attack_power,
            critical_chance: template.critical_chance,
            critical_multiplier: template.critical_multiplier,
        }
        .clamped()
    }

    /// Копия шаблона с применённой прогрессией уровня
    pub fn with_level(template: &StatsTemplate, scaling: &LevelScaling) -> Self {
        let mut stats = Self::from_template(template);
        stats.max_health *= scaling.health;
        stats.attack_power *= scaling.damage;
        stats.range_attack_power *= scaling.damage;
        stats.critical_chance *= scaling.crit;
        stats.move_speed *= scaling.speed;
        stats.name = format!("{} (Level {})", template.name, scaling.level);
        stats.clamped()
    }

    /// Масштабированная копия (health/damage/crit), cooldown и скорость не трогаем
    pub fn scaled(&self, health: f32, damage: f32, crit: f32) -> Self {
        Self {
            name: format!("{} (Scaled)", self.name),
            max_health: self.max_health * health,
            attack_power: self.attack_power * damage,
            range_attack_power: self.range_attack_power * damage,
            critical_chance: self.critical_chance * crit,
            ..self.clone()
        }
        .clamped()
    }

    /// Привести значения к допустимым диапазонам
    pub fn clamped(mut self) -> Self {
        self.max_health = non_negative(self.max_health);
        self.attack_power = non_negative(self.attack_power);
        self.attack_cooldown = non_negative(self.attack_cooldown);
        self.move_speed = non_negative(self.move_speed);
        self.range_attack_power = non_negative(self.range_attack_power);
        self.critical_chance = if self.critical_chance.is_finite() {
            self.critical_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.critical_multiplier = if self.critical_multiplier.is_finite() {
            self.critical_multiplier.max(1.0)
        } else {
            1.0
        };
        self
    }

    pub fn melee_damage(&self, is_critical: bool) -> f32 {
        if is_critical {
            self.attack_power * self.critical_multiplier
        } else {
            self.attack_power
        }
    }

    pub fn range_damage(&self, is_critical: bool) -> f32 {
        if !self.has_range_attack {
            return 0.0;
        }
        if is_critical {
            self.range_attack_power * self.critical_multiplier
        } else {
            self.range_attack_power
        }
    }

    /// Средний DPS с учётом крита
    pub fn damage_per_second(&self) -> f32 {
        if self.attack_cooldown <= 0.0 {
            return 0.0;
        }
        let average = self.attack_power * (1.0 + self.critical_chance * (self.critical_multiplier - 1.0));
        average / self.attack_cooldown
    }

    pub fn effective_health(&self) -> f32 {
        self.max_health
    }

    pub fn combat_rating(&self) -> f32 {
        self.damage_per_second() * (self.effective_health() / 100.0)
    }
}

impl StatsTemplate {
    pub fn melee_damage(&self, is_critical: bool) -> f32 {
        StatsInstance::from_template(self).melee_damage(is_critical)
    }

    pub fn range_damage(&self, is_critical: bool) -> f32 {
        StatsInstance::from_template(self).range_damage(is_critical)
    }

    pub fn damage_per_second(&self) -> f32 {
        StatsInstance::from_template(self).damage_per_second()
    }

    pub fn combat_rating(&self) -> f32 {
        StatsInstance::from_template(self).combat_rating()
    }

    /// Новый шаблон с масштабированием (используется генератором уровней)
    pub fn scaled(&self, health: f32, damage: f32, crit: f32) -> Self {
        Self {
            max_health: self.max_health * health,
            attack_power: self.attack_power * damage,
            range_attack_power: self.range_attack_power * damage,
            critical_chance: (self.critical_chance * crit).clamp(0.0, 1.0),
            ..self.clone()
        }
    }
}

impl fmt::Display for StatsInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: HP={:.0}, ATK={:.0}, CRIT={:.1}%, SPD={:.1}",
            self.name,
            self.max_health,
            self.attack_power,
            self.critical_chance * 100.0,
            self.move_speed
        )
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_copies_template() {
        let template = StatsTemplate::default();
        let stats = StatsInstance::from_template(&template);

        assert_eq!(stats.name, "Default Character");
        assert_eq!(stats.max_health, 100.0);
        assert_eq!(stats.attack_cooldown, 1.5);
        assert_eq!(stats.critical_multiplier, 1.5);
    }

    #[test]
    fn test_level_scaling_is_multiplicative() {
        let template = StatsTemplate::default();
        let scaling = LevelScaling {
            level: 4,
            health: 2.0,
            damage: 1.5,
            crit: 3.0,
            speed: 1.2,
        };
        let stats = StatsInstance::with_level(&template, &scaling);

        assert_eq!(stats.max_health, 200.0);
        assert_eq!(stats.attack_power, 30.0);
        assert_eq!(stats.range_attack_power, 22.5);
        assert!((stats.critical_chance - 0.15).abs() < 1e-6);
        assert!((stats.move_speed - 3.6).abs() < 1e-5);
        assert_eq!(stats.name, "Default Character (Level 4)");
    }

    #[test]
    fn test_crit_values_clamped() {
        let template = StatsTemplate {
            critical_chance: 0.6,
            critical_multiplier: 0.5,
            ..default()
        };
        let stats = StatsInstance::with_level(
            &template,
            &LevelScaling {
                crit: 4.0,
                ..default()
            },
        );

        assert_eq!(stats.critical_chance, 1.0);
        assert_eq!(stats.critical_multiplier, 1.0);
    }

    #[test]
    fn test_damage_helpers() {
        let stats = StatsInstance::default();

        assert_eq!(stats.melee_damage(false), 20.0);
        assert_eq!(stats.melee_damage(true), 30.0);
        // Нет ranged атаки → 0
        assert_eq!(stats.range_damage(true), 0.0);

        // 20 × (1 + 0.05 × 0.5) / 1.5 = 13.666…
        assert!((stats.damage_per_second() - 13.666_667).abs() < 1e-3);
        assert!((stats.combat_rating() - stats.damage_per_second()).abs() < 1e-6);
    }

    #[test]
    fn test_scaled_copy_keeps_cooldown_and_speed() {
        let stats = StatsInstance::default().scaled(2.0, 2.0, 2.0);

        assert_eq!(stats.max_health, 200.0);
        assert_eq!(stats.attack_power, 40.0);
        assert_eq!(stats.attack_cooldown, 1.5);
        assert_eq!(stats.move_speed, 3.0);
        assert!(stats.name.ends_with("(Scaled)"));
    }

    #[test]
    fn test_display_summary() {
        let summary = StatsInstance::default().to_string();
        assert_eq!(summary, "Default Character: HP=100, ATK=20, CRIT=5.0%, SPD=3.0");
    }
}
