//! Расчёт урона: base × damage multiplier, крит × critical damage
//!
//! Крит бросается через seeded RNG симуляции (детерминизм прогонов).

use rand::Rng;

/// Результат расчёта одного удара
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: f32,
    pub is_critical: bool,
}

/// Финальный урон удара
pub fn compute_damage(base: f32, damage_multiplier: f32, is_critical: bool, critical_damage: f32) -> f32 {
    let damage = base.max(0.0) * damage_multiplier;
    if is_critical {
        damage * critical_damage
    } else {
        damage
    }
}

/// Крит с вероятностью `chance` (0: никогда, 1: всегда)
pub fn roll_critical(rng: &mut impl Rng, chance: f32) -> bool {
    if chance <= 0.0 {
        return false;
    }
    rng.gen::<f32>() < chance
}

/// Бросок крита + расчёт урона
pub fn roll_damage(
    rng: &mut impl Rng,
    base: f32,
    damage_multiplier: f32,
    critical_chance: f32,
    critical_damage: f32,
) -> DamageRoll {
    let is_critical = roll_critical(rng, critical_chance);
    DamageRoll {
        amount: compute_damage(base, damage_multiplier, is_critical, critical_damage),
        is_critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_compute_damage() {
        assert_eq!(compute_damage(20.0, 1.0, false, 1.5), 20.0);
        assert_eq!(compute_damage(20.0, 1.5, false, 2.0), 30.0);
        assert_eq!(compute_damage(20.0, 1.5, true, 2.0), 60.0);
        assert_eq!(compute_damage(-5.0, 1.0, true, 2.0), 0.0);
    }

    #[test]
    fn test_crit_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(!roll_critical(&mut rng, 0.0));
            assert!(roll_critical(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_crit_rate_converges() {
        const TRIALS: usize = 10_000;
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for chance in [0.05_f32, 0.25, 0.5] {
            let crits = (0..TRIALS).filter(|_| roll_critical(&mut rng, chance)).count();
            let rate = crits as f32 / TRIALS as f32;
            assert!(
                (rate - chance).abs() < 0.02,
                "crit rate {} too far from {}",
                rate,
                chance
            );
        }
    }

    #[test]
    fn test_roll_damage_matches_flag() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let roll = roll_damage(&mut rng, 10.0, 1.0, 0.5, 3.0);
            let expected = if roll.is_critical { 30.0 } else { 10.0 };
            assert_eq!(roll.amount, expected);
        }
    }
}
