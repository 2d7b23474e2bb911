//! Movement events

use bevy::prelude::*;

/// Команда контроллеру движения
///
/// Генерируется AI (Chase), player input, внешним кодом.
/// Применяется в logic фазе, движение интегрируется в physics фазе.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum MoveRequest {
    /// Прямолинейно к точке (без pathfinding)
    MoveTo { entity: Entity, target: Vec3 },
    /// Повернуться к точке (проекция на землю)
    LookAt { entity: Entity, point: Vec3 },
    Stop { entity: Entity },
    /// Запрет движения сразу останавливает
    SetCanMove { entity: Entity, can_move: bool },
}

impl MoveRequest {
    pub fn entity(&self) -> Entity {
        match self {
            MoveRequest::MoveTo { entity, .. }
            | MoveRequest::LookAt { entity, .. }
            | MoveRequest::Stop { entity }
            | MoveRequest::SetCanMove { entity, .. } => *entity,
        }
    }
}
