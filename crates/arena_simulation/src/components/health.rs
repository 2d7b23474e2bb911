//! Здоровье, смерть и оглушение персонажа
//!
//! Методы компонента синхронные и возвращают исход операции;
//! события (`HealthEvent`) из исходов пишут системы `crate::health`.

use bevy::prelude::*;

/// Здоровье персонажа
///
/// Инварианты:
/// - 0 ≤ current ≤ max
/// - dead ⇒ current == 0
/// - stunned ⇒ stun_timer > 0 && !dead
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HealthStatus {
    current: f32,
    max: f32,
    dead: bool,
    stunned: bool,
    stun_timer: f32,
}

/// Исход `take_damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    /// Здоровье после удара
    pub current: f32,
    /// Удар оказался смертельным
    pub died: bool,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl HealthStatus {
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            dead: false,
            stunned: false,
            stun_timer: 0.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn stun_timer(&self) -> f32 {
        self.stun_timer
    }

    /// Нанести урон. `None`: удар проигнорирован (мертв или amount некорректен).
    pub fn take_damage(&mut self, amount: f32) -> Option<DamageOutcome> {
        if self.dead || !amount.is_finite() || amount < 0.0 {
            return None;
        }

        self.current = (self.current - amount).max(0.0);

        let died = self.current <= 0.0;
        if died {
            self.current = 0.0;
            self.dead = true;
            // Мертвый не может быть оглушен
            self.stunned = false;
            self.stun_timer = 0.0;
        }

        Some(DamageOutcome {
            current: self.current,
            died,
        })
    }

    /// Лечение. Возвращает новое здоровье, `None` если мертв.
    pub fn heal(&mut self, amount: f32) -> Option<f32> {
        if self.dead || !amount.is_finite() || amount < 0.0 {
            return None;
        }

        self.current = (self.current + amount).min(self.max);
        Some(self.current)
    }

    /// Оглушение на `duration` секунд. `false`: проигнорировано.
    pub fn apply_stun(&mut self, duration: f32) -> bool {
        if self.dead || !duration.is_finite() || duration <= 0.0 {
            return false;
        }

        self.stunned = true;
        self.stun_timer = duration;
        true
    }

    /// Тик таймера оглушения. `true`: оглушение закончилось на этом тике.
    pub fn tick_stun(&mut self, delta: f32) -> bool {
        if !self.stunned {
            return false;
        }

        self.stun_timer -= delta;
        if self.stun_timer <= 0.0 {
            self.stunned = false;
            self.stun_timer = 0.0;
            return true;
        }

        false
    }

    /// Воскрешение с `fraction` от max здоровья. Только для мертвых.
    pub fn revive(&mut self, fraction: f32) -> Option<f32> {
        if !self.dead {
            return None;
        }

        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 1.0 };
        self.dead = false;
        self.current = self.max * fraction;
        Some(self.current)
    }

    /// Новый max (при переназначении stats).
    ///
    /// Живой персонаж получает полное здоровье, мертвый остаётся на 0.
    pub fn reset_max(&mut self, max: f32) {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        self.max = max;
        if !self.dead {
            self.current = max;
        }
    }
}
