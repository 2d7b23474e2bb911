//! ECS Components персонажа арены
//!
//! Организация по доменам:
//! - actor: identity, фракция, hurtbox, радиусы боя
//! - stats: шаблон характеристик и runtime копия (level scaling)
//! - health: здоровье, смерть, оглушение
//! - movement: контроллер движения к точке, физическое тело

pub mod actor;
pub mod health;
pub mod movement;
pub mod stats;

// Re-exports для удобного импорта
pub use actor::*;
pub use health::*;
pub use movement::*;
pub use stats::*;
