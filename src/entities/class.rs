use super::item::DamageType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerClass {
    Warrior,
    Knight,
    Pyromancer,
    Thief,
}

impl PlayerClass {
    pub const ALL: [PlayerClass; 4] = [
        PlayerClass::Warrior,
        PlayerClass::Knight,
        PlayerClass::Pyromancer,
        PlayerClass::Thief,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlayerClass::Warrior => "Warrior",
            PlayerClass::Knight => "Knight",
            PlayerClass::Pyromancer => "Pyromancer",
            PlayerClass::Thief => "Thief",
        }
    }

    pub fn parse(name: &str) -> Option<PlayerClass> {
        match name.to_lowercase().as_str() {
            "warrior" => Some(PlayerClass::Warrior),
            "knight" => Some(PlayerClass::Knight),
            "pyromancer" => Some(PlayerClass::Pyromancer),
            "thief" => Some(PlayerClass::Thief),
            _ => None,
        }
    }

    /// Starting spread: (str, dex, int, faith, vit, end).
    pub fn starting_stats(&self) -> (u32, u32, u32, u32, u32, u32) {
        match self {
            PlayerClass::Warrior => (14, 9, 7, 8, 12, 11),
            PlayerClass::Knight => (12, 8, 8, 12, 13, 10),
            PlayerClass::Pyromancer => (9, 10, 14, 10, 10, 9),
            PlayerClass::Thief => (9, 14, 10, 8, 9, 12),
        }
    }

    /// Each class knows exactly two special moves.
    pub fn special_moves(&self) -> [&'static SpecialMove; 2] {
        match self {
            PlayerClass::Warrior => [&HEAVY_SWING, &WAR_CRY],
            PlayerClass::Knight => [&SHIELD_BASH, &SACRED_OATH],
            PlayerClass::Pyromancer => [&FIREBALL, &FLAME_WARD],
            PlayerClass::Thief => [&BACKSTAB, &SMOKE_BOMB],
        }
    }

    pub fn find_move(&self, name: &str) -> Option<&'static SpecialMove> {
        let q = name.to_lowercase();
        self.special_moves()
            .into_iter()
            .find(|m| m.name.to_lowercase().starts_with(&q))
    }
}

/// How a special move's damage is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovePower {
    /// Multiplies the player's basic attack power.
    Multiplier(f64),
    /// Flat damage, independent of the equipped weapon.
    Flat(u32),
}

/// Stat whose half-value is added on top of the move's power.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveScaling {
    Faith,
    Intelligence,
    Dexterity,
}

/// Secondary effect granted by a move, lasting `turns` enemy turns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveEffect {
    StunChance { chance: f64 },
    DefenseBoost { amount: u32, turns: u32 },
    EvasionBoost { chance: f64, turns: u32 },
    DamageShield { reduction: f64, turns: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialMove {
    pub name: &'static str,
    pub stamina_cost: u32,
    pub power: MovePower,
    pub damage_type: DamageType,
    pub scaling: Option<MoveScaling>,
    pub effect: Option<MoveEffect>,
}

pub static HEAVY_SWING: SpecialMove = SpecialMove {
    name: "Heavy Swing",
    stamina_cost: 20,
    power: MovePower::Multiplier(1.6),
    damage_type: DamageType::Physical,
    scaling: None,
    effect: Some(MoveEffect::StunChance { chance: 0.25 }),
};

pub static WAR_CRY: SpecialMove = SpecialMove {
    name: "War Cry",
    stamina_cost: 15,
    power: MovePower::Flat(0),
    damage_type: DamageType::Physical,
    scaling: None,
    effect: Some(MoveEffect::DefenseBoost { amount: 5, turns: 3 }),
};

pub static SHIELD_BASH: SpecialMove = SpecialMove {
    name: "Shield Bash",
    stamina_cost: 15,
    power: MovePower::Multiplier(1.2),
    damage_type: DamageType::Physical,
    scaling: None,
    effect: Some(MoveEffect::StunChance { chance: 0.35 }),
};

pub static SACRED_OATH: SpecialMove = SpecialMove {
    name: "Sacred Oath",
    stamina_cost: 20,
    power: MovePower::Flat(8),
    damage_type: DamageType::Dark,
    scaling: Some(MoveScaling::Faith),
    effect: Some(MoveEffect::DamageShield { reduction: 0.3, turns: 3 }),
};

pub static FIREBALL: SpecialMove = SpecialMove {
    name: "Fireball",
    stamina_cost: 20,
    power: MovePower::Flat(25),
    damage_type: DamageType::Fire,
    scaling: Some(MoveScaling::Intelligence),
    effect: None,
};

pub static FLAME_WARD: SpecialMove = SpecialMove {
    name: "Flame Ward",
    stamina_cost: 25,
    power: MovePower::Flat(0),
    damage_type: DamageType::Fire,
    scaling: None,
    effect: Some(MoveEffect::DamageShield { reduction: 0.5, turns: 2 }),
};

pub static BACKSTAB: SpecialMove = SpecialMove {
    name: "Backstab",
    stamina_cost: 15,
    power: MovePower::Multiplier(2.0),
    damage_type: DamageType::Physical,
    scaling: Some(MoveScaling::Dexterity),
    effect: None,
};

pub static SMOKE_BOMB: SpecialMove = SpecialMove {
    name: "Smoke Bomb",
    stamina_cost: 10,
    power: MovePower::Flat(0),
    damage_type: DamageType::Physical,
    scaling: None,
    effect: Some(MoveEffect::EvasionBoost { chance: 0.6, turns: 2 }),
};
