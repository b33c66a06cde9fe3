use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Damage and resistance channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Fire,
    Frost,
    Poison,
    Dark,
}

impl DamageType {
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Physical => "physical",
            DamageType::Fire => "fire",
            DamageType::Frost => "frost",
            DamageType::Poison => "poison",
            DamageType::Dark => "dark",
        }
    }
}

/// Which player stat a weapon scales with (adds floor(stat/3) to base attack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStat {
    Strength,
    Dexterity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorClass {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: u32,
    pub damage_type: DamageType,
    #[serde(default)]
    pub two_handed: bool,
    #[serde(default)]
    pub scaling: Option<ScalingStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorStats {
    pub defense: u32,
    pub armor_class: ArmorClass,
    /// Resistance percentages by damage type.
    #[serde(default)]
    pub resistance: BTreeMap<DamageType, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableKind {
    Heal,
    RestoreStamina,
    AttackBuff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumableEffect {
    pub kind: ConsumableKind,
    pub amount: u32,
    /// Turns the effect lasts; 0 for instant effects.
    #[serde(default)]
    pub duration: u32,
}

/// Typed item payload. The `item_type` tag is what the save format uses to
/// reconstruct the right variant on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon(WeaponStats),
    Armor(ArmorStats),
    Shield(ArmorStats),
    Consumable(ConsumableEffect),
    Key,
    Material,
    Ring(ArmorStats),
    Amulet,
    Catalyst,
}

impl ItemKind {
    pub fn is_equippable(&self) -> bool {
        matches!(
            self,
            ItemKind::Weapon(_)
                | ItemKind::Armor(_)
                | ItemKind::Shield(_)
                | ItemKind::Ring(_)
                | ItemKind::Amulet
        )
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, ItemKind::Consumable(_))
    }

    /// Resistance map granted while equipped, if any.
    pub fn resistance(&self) -> Option<&BTreeMap<DamageType, u32>> {
        match self {
            ItemKind::Armor(s) | ItemKind::Shield(s) | ItemKind::Ring(s) => Some(&s.resistance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub weight: f32,
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
}

impl Item {
    pub fn new(id: &str, name: &str, description: &str, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            kind,
            value: 0,
            weight: 0.0,
            quantity: 1,
            equipped: false,
        }
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn is_equippable(&self) -> bool {
        self.kind.is_equippable()
    }

    pub fn is_usable(&self) -> bool {
        self.kind.is_usable()
    }

    /// Stackable items merge by id; equipment never stacks.
    pub fn is_stackable(&self) -> bool {
        !self.kind.is_equippable()
    }

    pub fn weapon_stats(&self) -> Option<&WeaponStats> {
        match &self.kind {
            ItemKind::Weapon(s) => Some(s),
            _ => None,
        }
    }

    pub fn defense(&self) -> u32 {
        match &self.kind {
            ItemKind::Armor(s) | ItemKind::Shield(s) | ItemKind::Ring(s) => s.defense,
            _ => 0,
        }
    }

    /// Resistance percent granted against one damage type while equipped.
    pub fn resistance_percent(&self, damage_type: DamageType) -> u32 {
        self.kind
            .resistance()
            .and_then(|map| map.get(&damage_type).copied())
            .unwrap_or(0)
    }
}
