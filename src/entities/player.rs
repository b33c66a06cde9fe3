use super::class::PlayerClass;
use super::inventory::{EquipSlot, Equipment, Inventory};
use super::item::{DamageType, Item, ScalingStat};
use crate::core::constants::{
    STANCE_DEFENSE_AGGRESSIVE, STANCE_DEFENSE_DEFENSIVE, STARTING_ESTUS_CHARGES,
};
use crate::core::quest_log::QuestLog;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The six levelable stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Strength,
    Dexterity,
    Intelligence,
    Faith,
    Vitality,
    Endurance,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        StatKind::Strength,
        StatKind::Dexterity,
        StatKind::Intelligence,
        StatKind::Faith,
        StatKind::Vitality,
        StatKind::Endurance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StatKind::Strength => "strength",
            StatKind::Dexterity => "dexterity",
            StatKind::Intelligence => "intelligence",
            StatKind::Faith => "faith",
            StatKind::Vitality => "vitality",
            StatKind::Endurance => "endurance",
        }
    }

    pub fn parse(name: &str) -> Option<StatKind> {
        match name.to_lowercase().as_str() {
            "strength" | "str" => Some(StatKind::Strength),
            "dexterity" | "dex" => Some(StatKind::Dexterity),
            "intelligence" | "int" => Some(StatKind::Intelligence),
            "faith" | "fth" => Some(StatKind::Faith),
            "vitality" | "vit" => Some(StatKind::Vitality),
            "endurance" | "end" => Some(StatKind::Endurance),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            StatKind::Strength => 0,
            StatKind::Dexterity => 1,
            StatKind::Intelligence => 2,
            StatKind::Faith => 3,
            StatKind::Vitality => 4,
            StatKind::Endurance => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    values: [u32; 6],
}

impl Stats {
    pub fn new(str_: u32, dex: u32, int: u32, faith: u32, vit: u32, end: u32) -> Self {
        Self {
            values: [str_, dex, int, faith, vit, end],
        }
    }

    pub fn get(&self, stat: StatKind) -> u32 {
        self.values[stat.index()]
    }

    pub fn increment(&mut self, stat: StatKind) {
        self.values[stat.index()] += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Balanced,
    Aggressive,
    Defensive,
}

impl Stance {
    pub fn name(&self) -> &'static str {
        match self {
            Stance::Balanced => "balanced",
            Stance::Aggressive => "aggressive",
            Stance::Defensive => "defensive",
        }
    }

    pub fn parse(name: &str) -> Option<Stance> {
        match name.to_lowercase().as_str() {
            "balanced" => Some(Stance::Balanced),
            "aggressive" => Some(Stance::Aggressive),
            "defensive" => Some(Stance::Defensive),
            _ => None,
        }
    }
}

/// Essence dropped on death, waiting at the location it was lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostEssence {
    pub amount: u64,
    pub location_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub class: PlayerClass,
    pub level: u32,
    pub essence: u64,
    #[serde(default)]
    pub lost_essence: Option<LostEssence>,
    pub hp: u32,
    pub max_hp: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub estus: u32,
    pub estus_max: u32,
    pub stats: Stats,
    pub stance: Stance,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub current_location: String,
    pub starting_location: String,
    #[serde(default)]
    pub last_beacon: Option<String>,
    #[serde(default)]
    pub discovered: BTreeSet<String>,
    /// Kills per enemy id, feeding quest progress.
    #[serde(default)]
    pub kills: BTreeMap<String, u32>,
    #[serde(default)]
    pub faction_rep: BTreeMap<String, i64>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub quests: QuestLog,
}

impl Player {
    pub fn new(name: &str, class: PlayerClass, starting_location: &str) -> Self {
        let (str_, dex, int, faith, vit, end) = class.starting_stats();
        let max_hp = 80 + vit * 2;
        let max_stamina = 80 + end * 2;
        let mut discovered = BTreeSet::new();
        discovered.insert(starting_location.to_string());
        Self {
            name: name.to_string(),
            class,
            level: 1,
            essence: 0,
            lost_essence: None,
            hp: max_hp,
            max_hp,
            stamina: max_stamina,
            max_stamina,
            estus: STARTING_ESTUS_CHARGES,
            estus_max: STARTING_ESTUS_CHARGES,
            stats: Stats::new(str_, dex, int, faith, vit, end),
            stance: Stance::Balanced,
            inventory: Inventory::new(),
            equipment: Equipment::default(),
            current_location: starting_location.to_string(),
            starting_location: starting_location.to_string(),
            last_beacon: None,
            discovered,
            kills: BTreeMap::new(),
            faction_rep: BTreeMap::new(),
            lore: Vec::new(),
            quests: QuestLog::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Damage clamps at zero; healing clamps at max.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn spend_stamina(&mut self, amount: u32) -> bool {
        if self.stamina < amount {
            return false;
        }
        self.stamina -= amount;
        true
    }

    pub fn restore_stamina(&mut self, amount: u32) {
        self.stamina = (self.stamina + amount).min(self.max_stamina);
    }

    pub fn equipped_items(&self) -> impl Iterator<Item = &Item> {
        self.equipment
            .iter_equipped_ids()
            .filter_map(|(_, id)| self.inventory.get(id))
    }

    pub fn equipped_weapon(&self) -> Option<&Item> {
        self.equipment
            .get(EquipSlot::Weapon)
            .and_then(|id| self.inventory.get(id))
    }

    /// Base attack before stance: floor(str/2) + weapon damage + scaling bonus
    /// of floor(stat/3) for the weapon's declared scaling stat. Unarmed
    /// players swing with strength alone.
    pub fn base_attack(&self) -> u32 {
        let mut attack = self.stats.get(StatKind::Strength) / 2;
        if let Some(weapon) = self.equipped_weapon() {
            if let Some(stats) = weapon.weapon_stats() {
                attack += stats.damage;
                attack += match stats.scaling {
                    Some(ScalingStat::Strength) => self.stats.get(StatKind::Strength) / 3,
                    Some(ScalingStat::Dexterity) => self.stats.get(StatKind::Dexterity) / 3,
                    None => 0,
                };
            }
        }
        attack
    }

    pub fn attack_damage_type(&self) -> DamageType {
        self.equipped_weapon()
            .and_then(|w| w.weapon_stats())
            .map(|s| s.damage_type)
            .unwrap_or(DamageType::Physical)
    }

    /// floor((floor(vit/2) + armor defense + shield defense) * stance
    /// multiplier). The shield contributes nothing while aggressive.
    pub fn effective_defense(&self) -> u32 {
        let mut defense = self.stats.get(StatKind::Vitality) / 2;
        if let Some(id) = self.equipment.get(EquipSlot::Armor) {
            if let Some(armor) = self.inventory.get(id) {
                defense += armor.defense();
            }
        }
        if self.stance != Stance::Aggressive {
            if let Some(id) = self.equipment.get(EquipSlot::Shield) {
                if let Some(shield) = self.inventory.get(id) {
                    defense += shield.defense();
                }
            }
        }
        let mult = match self.stance {
            Stance::Balanced => 1.0,
            Stance::Aggressive => STANCE_DEFENSE_AGGRESSIVE,
            Stance::Defensive => STANCE_DEFENSE_DEFENSIVE,
        };
        (defense as f64 * mult) as u32
    }

    /// Total resistance percent against a damage type over all equipped items.
    pub fn resistance_percent(&self, damage_type: DamageType) -> u32 {
        self.equipped_items()
            .map(|item| item.resistance_percent(damage_type))
            .sum()
    }

    pub fn stamina_regen(&self) -> u32 {
        use crate::core::constants::{STAMINA_REGEN_BASE, STAMINA_REGEN_DEX_DIVISOR};
        STAMINA_REGEN_BASE + self.stats.get(StatKind::Dexterity) / STAMINA_REGEN_DEX_DIVISOR
    }

    pub fn record_kill(&mut self, enemy_id: &str) -> u32 {
        let entry = self.kills.entry(enemy_id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn discover(&mut self, location_id: &str) -> bool {
        self.discovered.insert(location_id.to_string())
    }

    /// After deserialization, make equipped flags agree with the slots and
    /// drop slot references that no longer resolve to an inventory item.
    pub fn relink_equipment(&mut self) {
        for slot in EquipSlot::ALL {
            let stale = match self.equipment.get(slot) {
                Some(id) => self.inventory.get(id).is_none(),
                None => false,
            };
            if stale {
                self.equipment.set(slot, None);
            }
        }
        let equipped_ids: Vec<String> = self
            .equipment
            .iter_equipped_ids()
            .map(|(_, id)| id.to_string())
            .collect();
        for item in &mut self.inventory.items {
            item.equipped = equipped_ids.iter().any(|id| *id == item.id);
        }
    }
}
