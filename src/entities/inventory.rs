use super::item::{Item, ItemKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    Weapon,
    Shield,
    Armor,
    Ring1,
    Ring2,
    Amulet,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 6] = [
        EquipSlot::Weapon,
        EquipSlot::Shield,
        EquipSlot::Armor,
        EquipSlot::Ring1,
        EquipSlot::Ring2,
        EquipSlot::Amulet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Shield => "shield",
            EquipSlot::Armor => "armor",
            EquipSlot::Ring1 => "ring1",
            EquipSlot::Ring2 => "ring2",
            EquipSlot::Amulet => "amulet",
        }
    }

    pub fn parse(name: &str) -> Option<EquipSlot> {
        match name {
            "weapon" => Some(EquipSlot::Weapon),
            "shield" => Some(EquipSlot::Shield),
            "armor" => Some(EquipSlot::Armor),
            "ring1" | "ring" => Some(EquipSlot::Ring1),
            "ring2" => Some(EquipSlot::Ring2),
            "amulet" => Some(EquipSlot::Amulet),
            _ => None,
        }
    }
}

/// Fixed equipment slots. Slots reference inventory items by id; the item
/// itself stays in the inventory while equipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub shield: Option<String>,
    pub armor: Option<String>,
    pub ring1: Option<String>,
    pub ring2: Option<String>,
    pub amulet: Option<String>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_deref(),
            EquipSlot::Shield => self.shield.as_deref(),
            EquipSlot::Armor => self.armor.as_deref(),
            EquipSlot::Ring1 => self.ring1.as_deref(),
            EquipSlot::Ring2 => self.ring2.as_deref(),
            EquipSlot::Amulet => self.amulet.as_deref(),
        }
    }

    pub fn set(&mut self, slot: EquipSlot, id: Option<String>) {
        match slot {
            EquipSlot::Weapon => self.weapon = id,
            EquipSlot::Shield => self.shield = id,
            EquipSlot::Armor => self.armor = id,
            EquipSlot::Ring1 => self.ring1 = id,
            EquipSlot::Ring2 => self.ring2 = id,
            EquipSlot::Amulet => self.amulet = id,
        }
    }

    pub fn iter_equipped_ids(&self) -> impl Iterator<Item = (EquipSlot, &str)> {
        EquipSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|id| (slot, id)))
    }

    /// Which slot holds this item id, if any.
    pub fn slot_of(&self, id: &str) -> Option<EquipSlot> {
        EquipSlot::ALL.into_iter().find(|slot| self.get(*slot) == Some(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipError {
    NotInInventory,
    NotEquippable,
    NoSuchSlot,
    SlotEmpty,
}

/// Ordered collection of items, stackable by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds an item, merging into an existing stack when stackable.
    pub fn add(&mut self, item: Item) {
        if item.is_stackable() {
            if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                existing.quantity += item.quantity;
                return;
            }
        }
        self.items.push(item);
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Finds an item by id or case-insensitive name prefix.
    pub fn find(&self, query: &str) -> Option<&Item> {
        let q = query.to_lowercase();
        self.items
            .iter()
            .find(|i| i.id == q || i.name.to_lowercase().starts_with(&q))
    }

    /// Removes `amount` from a stack. A stack that reaches zero quantity is
    /// removed from the collection entirely.
    pub fn remove(&mut self, id: &str, amount: u32) -> Option<Item> {
        let index = self.items.iter().position(|i| i.id == id)?;
        let item = &mut self.items[index];
        if item.quantity > amount {
            item.quantity -= amount;
            let mut taken = item.clone();
            taken.quantity = amount;
            taken.equipped = false;
            Some(taken)
        } else {
            Some(self.items.remove(index))
        }
    }

    pub fn count(&self, id: &str) -> u32 {
        self.get(id).map(|i| i.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Slot an item belongs in based on its kind. Rings prefer ring1, spilling to
/// ring2 when ring1 is taken.
fn slot_for(item: &Item, equipment: &Equipment) -> Option<EquipSlot> {
    match &item.kind {
        ItemKind::Weapon(_) => Some(EquipSlot::Weapon),
        ItemKind::Shield(_) => Some(EquipSlot::Shield),
        ItemKind::Armor(_) => Some(EquipSlot::Armor),
        ItemKind::Ring(_) => {
            if equipment.ring1.is_none() || equipment.ring2.is_some() {
                Some(EquipSlot::Ring1)
            } else {
                Some(EquipSlot::Ring2)
            }
        }
        ItemKind::Amulet => Some(EquipSlot::Amulet),
        _ => None,
    }
}

/// Equips an inventory item, displacing whatever held the slot. A two-handed
/// weapon also clears the shield slot.
pub fn equip(inventory: &mut Inventory, equipment: &mut Equipment, id: &str) -> Result<EquipSlot, EquipError> {
    let item = inventory.get(id).ok_or(EquipError::NotInInventory)?;
    if !item.is_equippable() {
        return Err(EquipError::NotEquippable);
    }
    let slot = slot_for(item, equipment).ok_or(EquipError::NotEquippable)?;
    let two_handed = item
        .weapon_stats()
        .map(|w| w.two_handed)
        .unwrap_or(false);

    if let Some(previous) = equipment.get(slot).map(str::to_string) {
        if let Some(prev_item) = inventory.get_mut(&previous) {
            prev_item.equipped = false;
        }
    }
    equipment.set(slot, Some(id.to_string()));
    if two_handed {
        if let Some(shield_id) = equipment.shield.take() {
            if let Some(shield) = inventory.get_mut(&shield_id) {
                shield.equipped = false;
            }
        }
    }
    if let Some(item) = inventory.get_mut(id) {
        item.equipped = true;
    }
    Ok(slot)
}

/// Unequips a slot named the way the player types it ("weapon", "ring"...).
pub fn unequip_named(
    inventory: &mut Inventory,
    equipment: &mut Equipment,
    slot_name: &str,
) -> Result<String, EquipError> {
    let slot = EquipSlot::parse(slot_name).ok_or(EquipError::NoSuchSlot)?;
    unequip(inventory, equipment, slot)
}

/// Unequips a slot. The item remains in the inventory.
pub fn unequip(inventory: &mut Inventory, equipment: &mut Equipment, slot: EquipSlot) -> Result<String, EquipError> {
    let id = equipment.get(slot).map(str::to_string).ok_or(EquipError::SlotEmpty)?;
    equipment.set(slot, None);
    if let Some(item) = inventory.get_mut(&id) {
        item.equipped = false;
    }
    Ok(id)
}
