//! Movement компоненты: прямолинейное движение к точке, поворот, физическое тело

use bevy::prelude::*;

/// Дистанция, ближе которой считаем цель достигнутой (units)
pub const STOP_EPSILON: f32 = 0.1;

/// Контроллер движения к точке (без pathfinding)
///
/// Логика (`move_to`/`stop`) пишется в logic фазе,
/// интеграция позиции: в physics фазе (`crate::movement::drive_movement`).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MovementController {
    can_move: bool,
    moving: bool,
    target: Vec3,
    current_speed: f32,
    stop_epsilon: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            can_move: true,
            moving: false,
            target: Vec3::ZERO,
            current_speed: 0.0,
            stop_epsilon: STOP_EPSILON,
        }
    }
}

/// Результат одного physics шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementStep {
    /// Не двигаемся
    Idle,
    /// Цель достигнута на этом шаге
    Arrived,
    /// Двигаемся: нормализованное направление + скорость
    Moving { direction: Vec3, speed: f32 },
}

impl MovementController {
    pub fn with_stop_epsilon(stop_epsilon: f32) -> Self {
        Self {
            stop_epsilon: stop_epsilon.max(0.0),
            ..default()
        }
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Начать движение к `target` из позиции `from`
    ///
    /// No-op если движение запрещено. Если уже в пределах epsilon: сразу стоим.
    pub fn move_to(&mut self, from: Vec3, target: Vec3) {
        if !self.can_move {
            return;
        }

        self.target = target;
        if from.distance(target) <= self.stop_epsilon {
            self.stop();
        } else {
            self.moving = true;
        }
    }

    pub fn stop(&mut self) {
        self.moving = false;
        self.current_speed = 0.0;
    }

    /// Запрет движения сразу останавливает персонажа
    pub fn set_can_move(&mut self, can_move: bool) {
        self.can_move = can_move;
        if !can_move {
            self.stop();
        }
    }

    /// Вычислить шаг движения из текущей позиции
    pub fn step(&mut self, position: Vec3, move_speed: f32) -> MovementStep {
        if !self.can_move || !self.moving {
            return MovementStep::Idle;
        }

        if position.distance(self.target) <= self.stop_epsilon {
            self.stop();
            return MovementStep::Arrived;
        }

        self.current_speed = move_speed;
        MovementStep::Moving {
            direction: (self.target - position).normalize_or_zero(),
            speed: move_speed,
        }
    }
}

/// Опциональное физическое тело (velocity задаёт контроллер, двигает физика)
///
/// Если у персонажа нет `PhysicsBody`, `drive_movement` двигает Transform напрямую.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

impl PhysicsBody {
    /// Обнулить горизонтальную скорость (Y: гравитация, не трогаем)
    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.velocity.z = 0.0;
    }
}

/// Повернуть персонажа лицом к точке (проекция на плоскость земли)
pub fn face_point(transform: &mut Transform, point: Vec3) {
    let mut direction = point - transform.translation;
    direction.y = 0.0;
    face_direction(transform, direction);
}

/// Повернуть персонажа по направлению движения
pub fn face_direction(transform: &mut Transform, direction: Vec3) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() > f32::EPSILON {
        transform.look_to(flat, Vec3::Y);
    }
}
