use super::item::DamageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One entry of an enemy's round-robin attack cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPattern {
    pub name: String,
    pub damage: u32,
    pub damage_type: DamageType,
    /// Heavy swings trigger the brace quick-time prompt.
    #[serde(default)]
    pub heavy: bool,
}

impl AttackPattern {
    pub fn basic(damage: u32) -> Self {
        Self {
            name: "strike".to_string(),
            damage,
            damage_type: DamageType::Physical,
            heavy: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item_id: String,
    /// Drop probability in [0, 1].
    pub chance: f64,
    #[serde(default = "default_quantity_range")]
    pub quantity: (u32, u32),
}

fn default_quantity_range() -> (u32, u32) {
    (1, 1)
}

/// A combat-behavior tier a boss enters once its HP percentage drops to the
/// trigger. Triggers are listed in descending order; index 0 is the opening
/// phase at 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPhase {
    pub hp_percent_trigger: u32,
    #[serde(default)]
    pub attack_boost: u32,
    #[serde(default)]
    pub defense_boost: u32,
    #[serde(default)]
    pub patterns: Option<Vec<AttackPattern>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(default)]
    pub attack_patterns: Vec<AttackPattern>,
    #[serde(default)]
    pub loot: Vec<LootDrop>,
    pub essence_reward: u64,
    #[serde(default)]
    pub weaknesses: BTreeSet<DamageType>,
    /// Empty for ordinary enemies.
    #[serde(default)]
    pub phases: Vec<BossPhase>,
}

impl Enemy {
    pub fn new(id: &str, name: &str, level: u32, max_hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level,
            hp: max_hp,
            max_hp,
            attack,
            defense,
            attack_patterns: Vec::new(),
            loot: Vec::new(),
            essence_reward: 0,
            weaknesses: BTreeSet::new(),
            phases: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_boss(&self) -> bool {
        !self.phases.is_empty()
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        (self.hp as u64 * 100 / self.max_hp as u64) as u32
    }

    pub fn is_weak_to(&self, damage_type: DamageType) -> bool {
        self.weaknesses.contains(&damage_type)
    }
}
