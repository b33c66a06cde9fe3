//! Pure combat math shared by the encounter resolver and tests.
//!
//! These functions compute damage without touching entity state; the
//! encounter layer applies the results.

use super::constants::*;
use crate::entities::player::Stance;

/// Stance multiplier applied to attack power.
pub fn stance_attack_mult(stance: Stance) -> f64 {
    match stance {
        Stance::Balanced => 1.0,
        Stance::Aggressive => STANCE_ATTACK_AGGRESSIVE,
        Stance::Defensive => STANCE_ATTACK_DEFENSIVE,
    }
}

/// Attack power after the stance multiplier, truncated to an integer.
pub fn attack_power(base_attack: u32, stance: Stance) -> u32 {
    (base_attack as f64 * stance_attack_mult(stance)) as u32
}

/// Damage multiplier from the defender's total resistance percent against the
/// incoming damage type. Floored so resistance never removes more than 80%.
pub fn resistance_mult(total_resistance_percent: u32) -> f64 {
    (1.0 - total_resistance_percent as f64 / 100.0).max(RESISTANCE_FLOOR)
}

/// 1.5x against a declared weakness, 1.0 otherwise.
pub fn weakness_mult(is_weak: bool) -> f64 {
    if is_weak {
        WEAKNESS_MULTIPLIER
    } else {
        1.0
    }
}

/// +10% damage per combo stack.
pub fn combo_mult(stacks: u32) -> f64 {
    1.0 + stacks as f64 * COMBO_DAMAGE_PER_STACK
}

/// Half the defender's effective defense, rounded down.
pub fn defense_term(effective_defense: u32) -> u32 {
    effective_defense / 2
}

/// Final damage: attack power times the multiplier product, minus the defense
/// term, floored, never below 1. A hit always deals at least 1 damage.
pub fn resolve_damage(attack_power: u32, multiplier_product: f64, defense_term: u32) -> u32 {
    let raw = attack_power as f64 * multiplier_product - defense_term as f64;
    raw.floor().max(1.0) as u32
}

/// Leveling cost curve: floor(100 * 1.1^(level - 1)). Strictly increasing.
pub fn level_cost(level: u32) -> u64 {
    (LEVEL_COST_BASE * LEVEL_COST_GROWTH.powi(level.saturating_sub(1) as i32)).floor() as u64
}

/// Estus heals 40% of max HP, rounded down.
pub fn estus_heal_amount(max_hp: u32) -> u32 {
    (max_hp as f64 * ESTUS_HEAL_FRACTION).floor() as u32
}
