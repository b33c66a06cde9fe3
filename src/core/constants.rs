// Combat tuning
pub const STANCE_ATTACK_AGGRESSIVE: f64 = 1.2;
pub const STANCE_ATTACK_DEFENSIVE: f64 = 0.8;
pub const STANCE_DEFENSE_AGGRESSIVE: f64 = 0.8;
pub const STANCE_DEFENSE_DEFENSIVE: f64 = 1.2;

/// Resistance can reduce damage by at most 80%.
pub const RESISTANCE_FLOOR: f64 = 0.2;
pub const WEAKNESS_MULTIPLIER: f64 = 1.5;

// Combo mechanic
pub const COMBO_WINDOW_SECS: f64 = 2.0;
pub const COMBO_DAMAGE_PER_STACK: f64 = 0.1;

// Stamina economy
pub const STAMINA_REGEN_BASE: u32 = 5;
pub const STAMINA_REGEN_DEX_DIVISOR: u32 = 5;

// Progression
pub const LEVEL_COST_BASE: f64 = 100.0;
pub const LEVEL_COST_GROWTH: f64 = 1.1;
/// Max HP / max stamina gained per vitality / endurance point.
pub const LEVEL_POOL_INCREMENT: u32 = 5;
pub const ESTUS_HEAL_FRACTION: f64 = 0.4;
pub const STARTING_ESTUS_CHARGES: u32 = 3;
/// Respawning after death restores half of max HP, not full.
pub const RESPAWN_HP_DIVISOR: u32 = 2;

// Quick-time brace prompt on heavy enemy swings
pub const BRACE_PROMPT_TIMEOUT_MS: u64 = 1500;
pub const BRACE_DAMAGE_REDUCTION: f64 = 0.5;

// Save system
pub const SAVE_VERSION: &str = "1.0.0";
pub const SAVE_FILE_NAME: &str = "ardenvale_save.json";
