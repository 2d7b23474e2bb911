//! Конфигурация симуляции и каталог stats шаблонов (RON)
//!
//! Единственная fallible часть crate: загрузка данных. Всё остальное
//! деградирует в no-op.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::components::{LevelScaling, StatsTemplate};
use crate::spawn::StatsProvider;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid stats template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Длительности timed состояний (секунды)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct BehaviorTimings {
    pub attack_duration: f32,
    pub hit_duration: f32,
    pub victory_duration: f32,
}

impl Default for BehaviorTimings {
    fn default() -> Self {
        Self {
            attack_duration: 1.0,
            hit_duration: 0.8,
            victory_duration: 3.0,
        }
    }
}

/// Глобальные параметры симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct SimulationConfig {
    /// Период опроса AI (секунды симуляции)
    pub decision_interval: f32,
    /// Задержка между началом атаки и нанесением урона
    pub impact_delay: f32,
    /// Дистанция остановки контроллера движения
    pub stop_epsilon: f32,
    pub timings: BehaviorTimings,
    /// Радиусы по умолчанию для новых персонажей
    pub detection_range: f32,
    pub attack_range: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            decision_interval: crate::ai::DEFAULT_DECISION_INTERVAL,
            impact_delay: 0.3,
            stop_epsilon: crate::components::STOP_EPSILON,
            timings: BehaviorTimings::default(),
            detection_range: 10.0,
            attack_range: 2.0,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_ron_str(&read_file(path)?)
    }
}

/// Каталог stats шаблонов + опциональная прогрессия уровня
///
/// RON формат:
/// ```ron
/// (
///     templates: [(name: "Brawler", max_health: 120.0, attack_power: 25.0)],
///     level: Some((level: 3, health: 1.5, damage: 1.2)),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsCatalog {
    pub templates: Vec<StatsTemplate>,
    pub level: Option<LevelScaling>,
}

impl StatsCatalog {
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let catalog: StatsCatalog = ron::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::from_ron_str(&read_file(path)?)
    }

    /// Структурная валидация; значения вне диапазонов клампятся позже в `StatsInstance`
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();

        for template in &self.templates {
            let invalid = |reason: &str| ConfigError::InvalidTemplate {
                name: template.name.clone(),
                reason: reason.to_string(),
            };

            if template.name.trim().is_empty() {
                return Err(invalid("empty name"));
            }
            if !seen.insert(template.name.as_str()) {
                return Err(invalid("duplicate name"));
            }

            let numbers = [
                template.max_health,
                template.attack_power,
                template.attack_cooldown,
                template.move_speed,
                template.range_attack_power,
                template.critical_chance,
                template.critical_multiplier,
            ];
            if numbers.iter().any(|value| !value.is_finite()) {
                return Err(invalid("non-finite value"));
            }
        }

        Ok(())
    }
}

impl StatsProvider for StatsCatalog {
    fn template(&self, name: &str) -> Option<&StatsTemplate> {
        self.templates.iter().find(|template| template.name == name)
    }

    fn level_scaling(&self) -> Option<LevelScaling> {
        self.level
    }
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = SimulationConfig::default();
        assert_eq!(config.decision_interval, 0.5);
        assert_eq!(config.impact_delay, 0.3);
        assert_eq!(config.stop_epsilon, 0.1);
        assert_eq!(config.timings.hit_duration, 0.8);
        assert_eq!(config.timings.attack_duration, 1.0);
        assert_eq!(config.timings.victory_duration, 3.0);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = SimulationConfig::from_ron_str("(impact_delay: 0.25)").expect("valid RON");
        assert_eq!(config.impact_delay, 0.25);
        assert_eq!(config.decision_interval, 0.5);
    }

    #[test]
    fn test_catalog_lookup_and_level() {
        let catalog = StatsCatalog::from_ron_str(
            r#"(
                templates: [
                    (name: "Brawler", max_health: 120.0, attack_power: 25.0),
                    (name: "Archer", has_range_attack: true, range_attack_power: 18.0),
                ],
                level: Some((level: 3, health: 1.5)),
            )"#,
        )
        .expect("valid catalog");

        let brawler = catalog.template("Brawler").expect("brawler exists");
        assert_eq!(brawler.max_health, 120.0);
        // Поля по умолчанию из StatsTemplate::default
        assert_eq!(brawler.attack_cooldown, 1.5);

        let level = catalog.level_scaling().expect("level present");
        assert_eq!(level.level, 3);
        assert_eq!(level.damage, 1.0);
        assert!(catalog.template("Ghost").is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = StatsCatalog::from_ron_str(r#"(templates: [(name: "A"), (name: "A")])"#);
        assert!(matches!(result, Err(ConfigError::InvalidTemplate { .. })));
    }

    #[test]
    fn test_catalog_rejects_empty_name() {
        let result = StatsCatalog::from_ron_str(r#"(templates: [(name: "  ")])"#);
        assert!(matches!(result, Err(ConfigError::InvalidTemplate { .. })));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let result = StatsCatalog::from_ron_str("(templates: [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = StatsCatalog::load(Path::new("/definitely/not/here.ron"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
