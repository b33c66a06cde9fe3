//! The game world: the location graph plus the template tables everything
//! else spawns from. Locations and NPCs carry mutable state (visited flags,
//! ground items, dialogue position) and are persisted with the save; enemy,
//! item, and quest tables are templates cloned on use.

pub mod content;

use crate::entities::enemy::Enemy;
use crate::entities::item::Item;
use crate::entities::location::Location;
use crate::entities::npc::Npc;
use crate::entities::quest::Quest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub locations: BTreeMap<String, Location>,
    pub npcs: BTreeMap<String, Npc>,
    pub enemies: BTreeMap<String, Enemy>,
    pub items: BTreeMap<String, Item>,
    pub quests: BTreeMap<String, Quest>,
}

impl World {
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn location_mut(&mut self, id: &str) -> Option<&mut Location> {
        self.locations.get_mut(id)
    }

    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.get(id)
    }

    pub fn npc_mut(&mut self, id: &str) -> Option<&mut Npc> {
        self.npcs.get_mut(id)
    }

    pub fn enemy_template(&self, id: &str) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn item_template(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// A fresh combat-ready copy; the template never mutates.
    pub fn spawn_enemy(&self, id: &str) -> Option<Enemy> {
        self.enemies.get(id).cloned()
    }

    pub fn instantiate_item(&self, id: &str) -> Option<Item> {
        self.items.get(id).cloned()
    }

    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::content;

    // Referential integrity of the shipped world: every id referenced
    // anywhere must resolve against the owning table.
    #[test]
    fn connections_resolve() {
        let world = content::ardenvale();
        for location in world.locations.values() {
            for destination in location.connections.values() {
                assert!(
                    world.locations.contains_key(destination),
                    "{} connects to unknown {destination}",
                    location.id
                );
            }
        }
    }

    #[test]
    fn spawn_tables_resolve() {
        let world = content::ardenvale();
        for location in world.locations.values() {
            for enemy in &location.enemies {
                assert!(world.enemies.contains_key(enemy), "unknown enemy {enemy}");
            }
            for npc in &location.npcs {
                assert!(world.npcs.contains_key(npc), "unknown npc {npc}");
            }
        }
    }

    #[test]
    fn loot_shop_and_reward_items_resolve() {
        let world = content::ardenvale();
        for enemy in world.enemies.values() {
            for drop in &enemy.loot {
                assert!(
                    world.items.contains_key(&drop.item_id),
                    "{} drops unknown {}",
                    enemy.id,
                    drop.item_id
                );
            }
        }
        for npc in world.npcs.values() {
            for item in &npc.shop {
                assert!(world.items.contains_key(item), "shop sells unknown {item}");
            }
        }
        for quest in world.quests.values() {
            if let Some(item) = &quest.reward.item_id {
                assert!(world.items.contains_key(item), "reward item {item} unknown");
            }
        }
    }

    #[test]
    fn dialogue_quest_hooks_resolve() {
        let world = content::ardenvale();
        for npc in world.npcs.values() {
            for node in npc.dialogue.values() {
                for option in &node.options {
                    if let Some(next) = &option.next {
                        assert!(
                            npc.dialogue.contains_key(next),
                            "{} option leads to missing node {next}",
                            npc.id
                        );
                    }
                    if let Some(quest) = &option.starts_quest {
                        assert!(
                            world.quests.contains_key(quest),
                            "{} starts unknown quest {quest}",
                            npc.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn starting_location_exists_and_start_has_a_beacon_nearby() {
        let world = content::ardenvale();
        let start = world.location(content::STARTING_LOCATION).unwrap();
        assert!(!start.beacon);
        let shrine = world.location("firelink_shrine").unwrap();
        assert!(shrine.beacon);
    }

    #[test]
    fn spawned_enemies_are_independent_of_the_template() {
        let world = content::ardenvale();
        let mut spawned = world.spawn_enemy("hollow_soldier").unwrap();
        let max = spawned.max_hp;
        spawned.take_damage(max);
        assert!(!spawned.is_alive());
        assert_eq!(world.enemy_template("hollow_soldier").unwrap().hp, max);
    }

    #[test]
    fn boss_phase_triggers_descend() {
        let world = content::ardenvale();
        for enemy in world.enemies.values().filter(|e| e.is_boss()) {
            let triggers: Vec<u32> = enemy.phases.iter().map(|p| p.hp_percent_trigger).collect();
            let mut sorted = triggers.clone();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            assert_eq!(triggers, sorted, "{} phases out of order", enemy.id);
        }
    }
}
