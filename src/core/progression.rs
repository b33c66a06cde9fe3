//! Essence economy: leveling, estus, beacon rest, death and recovery.

use super::combat_math::{estus_heal_amount, level_cost};
use super::constants::{LEVEL_POOL_INCREMENT, RESPAWN_HP_DIVISOR};
use crate::entities::item::{ConsumableEffect, ConsumableKind, Item, ItemKind};
use crate::entities::location::Location;
use crate::entities::player::{LostEssence, Player, StatKind};
use crate::entities::quest::Reward;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("not enough essence: need {needed}, have {have}")]
    NotEnoughEssence { needed: u64, have: u64 },
    #[error("no estus remaining")]
    NoEstus,
    #[error("there is no beacon to rest at here")]
    NoBeacon,
    #[error("no such item: {0}")]
    NoSuchItem(String),
    #[error("{0} cannot be used")]
    NotUsable(String),
}

/// Spends essence to raise one stat by a point. The cost is checked before
/// anything changes; on success the player's level rises by one and, for
/// vitality or endurance, the matching pool grows by the increment with the
/// current value raised alongside it.
pub fn level_up(player: &mut Player, stat: StatKind) -> Result<u64, ProgressionError> {
    let cost = level_cost(player.level);
    if player.essence < cost {
        return Err(ProgressionError::NotEnoughEssence {
            needed: cost,
            have: player.essence,
        });
    }
    player.essence -= cost;
    player.level += 1;
    player.stats.increment(stat);
    match stat {
        StatKind::Vitality => {
            player.max_hp += LEVEL_POOL_INCREMENT;
            player.hp += LEVEL_POOL_INCREMENT;
        }
        StatKind::Endurance => {
            player.max_stamina += LEVEL_POOL_INCREMENT;
            player.stamina += LEVEL_POOL_INCREMENT;
        }
        _ => {}
    }
    Ok(cost)
}

/// Drinks one estus charge, healing 40% of max HP. Returns the HP actually
/// restored, which is less near full health.
pub fn use_estus(player: &mut Player) -> Result<u32, ProgressionError> {
    if player.estus == 0 {
        return Err(ProgressionError::NoEstus);
    }
    player.estus -= 1;
    let before = player.hp;
    player.heal(estus_heal_amount(player.max_hp));
    Ok(player.hp - before)
}

/// Rests at a beacon: full HP and stamina, estus refilled, and the beacon
/// becomes the respawn point. The only full restore in the game.
pub fn rest(player: &mut Player, location: &Location) -> Result<(), ProgressionError> {
    if !location.beacon {
        return Err(ProgressionError::NoBeacon);
    }
    player.hp = player.max_hp;
    player.stamina = player.max_stamina;
    player.estus = player.estus_max;
    player.last_beacon = Some(location.id.clone());
    Ok(())
}

/// Handles the player's death: carried essence drops where they fell,
/// replacing any earlier stash, and the player wakes at the last beacon
/// rested at (or the start of the game) with half HP, full stamina, and
/// refilled estus. Returns the respawn location id.
pub fn handle_death(player: &mut Player) -> String {
    if player.essence > 0 {
        player.lost_essence = Some(LostEssence {
            amount: player.essence,
            location_id: player.current_location.clone(),
        });
        player.essence = 0;
    }
    let respawn = player
        .last_beacon
        .clone()
        .unwrap_or_else(|| player.starting_location.clone());
    player.current_location = respawn.clone();
    player.hp = player.max_hp / RESPAWN_HP_DIVISOR;
    player.stamina = player.max_stamina;
    player.estus = player.estus_max;
    respawn
}

/// Picks lost essence back up if the player is standing where it fell.
pub fn recover_essence(player: &mut Player) -> Option<u64> {
    let stash = player.lost_essence.as_ref()?;
    if stash.location_id != player.current_location {
        return None;
    }
    let amount = stash.amount;
    player.essence += amount;
    player.lost_essence = None;
    Some(amount)
}

/// Grants a quest reward: essence, the reward item resolved from the item
/// table, a faction reputation shift, and a lore entry.
pub fn apply_reward(player: &mut Player, reward: &Reward, items: &BTreeMap<String, Item>) {
    player.essence += reward.essence;
    if let Some(id) = &reward.item_id {
        if let Some(item) = items.get(id) {
            player.inventory.add(item.clone());
        }
    }
    if let Some((faction, delta)) = &reward.faction {
        *player.faction_rep.entry(faction.clone()).or_insert(0) += delta;
    }
    if let Some(lore) = &reward.lore {
        if !player.lore.contains(lore) {
            player.lore.push(lore.clone());
        }
    }
}

/// Consumes one of a stacked item. Heal and stamina effects apply on the
/// spot; an attack buff is returned to the caller so combat can track its
/// remaining turns.
pub fn consume_item(
    player: &mut Player,
    id_or_name: &str,
) -> Result<ConsumableEffect, ProgressionError> {
    let item = player
        .inventory
        .find(id_or_name)
        .ok_or_else(|| ProgressionError::NoSuchItem(id_or_name.to_string()))?;
    let effect = match &item.kind {
        ItemKind::Consumable(effect) => effect.clone(),
        _ => return Err(ProgressionError::NotUsable(item.name.clone())),
    };
    let id = item.id.clone();
    player.inventory.remove(&id, 1);
    match effect.kind {
        ConsumableKind::Heal => player.heal(effect.amount),
        ConsumableKind::RestoreStamina => player.restore_stamina(effect.amount),
        ConsumableKind::AttackBuff => {}
    }
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::class::PlayerClass;

    fn warrior() -> Player {
        Player::new("Tarn", PlayerClass::Warrior, "firelink_shrine")
    }

    #[test]
    fn level_up_spends_essence_and_raises_level() {
        let mut player = warrior();
        player.essence = 250;
        let cost = level_up(&mut player, StatKind::Strength).unwrap();
        assert_eq!(cost, 100);
        assert_eq!(player.level, 2);
        assert_eq!(player.essence, 150);
        assert_eq!(player.stats.get(StatKind::Strength), 15);
        // Next level costs more.
        let cost = level_up(&mut player, StatKind::Strength).unwrap();
        assert_eq!(cost, 110);
    }

    #[test]
    fn level_up_rejects_without_mutating() {
        let mut player = warrior();
        player.essence = 99;
        let err = level_up(&mut player, StatKind::Strength).unwrap_err();
        assert_eq!(
            err,
            ProgressionError::NotEnoughEssence {
                needed: 100,
                have: 99
            }
        );
        assert_eq!(player.level, 1);
        assert_eq!(player.essence, 99);
        assert_eq!(player.stats.get(StatKind::Strength), 14);
    }

    #[test]
    fn vitality_level_grows_both_hp_pools() {
        let mut player = warrior();
        player.essence = 100;
        player.hp = 50;
        let max_before = player.max_hp;
        level_up(&mut player, StatKind::Vitality).unwrap();
        assert_eq!(player.max_hp, max_before + LEVEL_POOL_INCREMENT);
        assert_eq!(player.hp, 50 + LEVEL_POOL_INCREMENT);
    }

    #[test]
    fn estus_heals_forty_percent_and_decrements() {
        let mut player = warrior();
        player.hp = 1;
        let healed = use_estus(&mut player).unwrap();
        assert_eq!(healed, estus_heal_amount(player.max_hp));
        assert_eq!(player.estus, 2);
        player.estus = 0;
        assert_eq!(use_estus(&mut player), Err(ProgressionError::NoEstus));
    }

    #[test]
    fn rest_requires_beacon_and_fully_restores() {
        let mut player = warrior();
        player.hp = 1;
        player.stamina = 0;
        player.estus = 0;

        let plain = Location::new("cemetery", "Cemetery of Ash", "Cold graves.");
        assert_eq!(rest(&mut player, &plain), Err(ProgressionError::NoBeacon));
        assert_eq!(player.hp, 1);

        let mut shrine = Location::new("firelink_shrine", "Firelink Shrine", "Embers.");
        shrine.beacon = true;
        rest(&mut player, &shrine).unwrap();
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.stamina, player.max_stamina);
        assert_eq!(player.estus, player.estus_max);
        assert_eq!(player.last_beacon.as_deref(), Some("firelink_shrine"));
    }

    #[test]
    fn death_drops_essence_and_respawns_at_beacon() {
        let mut player = warrior();
        player.essence = 400;
        player.last_beacon = Some("firelink_shrine".to_string());
        player.current_location = "high_wall".to_string();
        player.hp = 0;

        let respawn = handle_death(&mut player);
        assert_eq!(respawn, "firelink_shrine");
        assert_eq!(player.current_location, "firelink_shrine");
        assert_eq!(player.essence, 0);
        assert_eq!(
            player.lost_essence,
            Some(LostEssence {
                amount: 400,
                location_id: "high_wall".to_string(),
            })
        );
        assert_eq!(player.hp, player.max_hp / 2);
    }

    #[test]
    fn second_death_replaces_the_stash() {
        let mut player = warrior();
        player.essence = 400;
        player.current_location = "high_wall".to_string();
        handle_death(&mut player);

        player.essence = 30;
        player.current_location = "cemetery".to_string();
        handle_death(&mut player);
        assert_eq!(
            player.lost_essence,
            Some(LostEssence {
                amount: 30,
                location_id: "cemetery".to_string(),
            })
        );
    }

    #[test]
    fn dying_broke_keeps_old_stash() {
        let mut player = warrior();
        player.essence = 400;
        player.current_location = "high_wall".to_string();
        handle_death(&mut player);
        // Respawned with zero essence; dying again must not erase the stash.
        player.current_location = "cemetery".to_string();
        handle_death(&mut player);
        assert_eq!(
            player.lost_essence.as_ref().map(|l| l.amount),
            Some(400)
        );
    }

    #[test]
    fn recovery_only_at_the_death_spot() {
        let mut player = warrior();
        player.essence = 250;
        player.current_location = "high_wall".to_string();
        handle_death(&mut player);

        assert_eq!(recover_essence(&mut player), None);
        player.current_location = "high_wall".to_string();
        assert_eq!(recover_essence(&mut player), Some(250));
        assert_eq!(player.essence, 250);
        assert!(player.lost_essence.is_none());
        // Nothing left to pick up.
        assert_eq!(recover_essence(&mut player), None);
    }

    #[test]
    fn consuming_heal_item_restores_and_decrements_stack() {
        use crate::entities::item::{ConsumableEffect, ConsumableKind};
        let mut player = warrior();
        player.hp = 10;
        player.inventory.add(
            Item::new(
                "healing_potion",
                "Healing Potion",
                "Restores health.",
                ItemKind::Consumable(ConsumableEffect {
                    kind: ConsumableKind::Heal,
                    amount: 30,
                    duration: 0,
                }),
            )
            .with_quantity(2),
        );
        let effect = consume_item(&mut player, "healing").unwrap();
        assert_eq!(effect.kind, ConsumableKind::Heal);
        assert_eq!(player.hp, 40);
        assert_eq!(player.inventory.get("healing_potion").unwrap().quantity, 1);
    }

    #[test]
    fn consuming_non_consumable_fails() {
        use crate::entities::item::{DamageType, WeaponStats};
        let mut player = warrior();
        player.inventory.add(Item::new(
            "blade",
            "Blade",
            "A blade.",
            ItemKind::Weapon(WeaponStats {
                damage: 5,
                damage_type: DamageType::Physical,
                two_handed: false,
                scaling: None,
            }),
        ));
        assert!(matches!(
            consume_item(&mut player, "blade"),
            Err(ProgressionError::NotUsable(_))
        ));
        assert!(player.inventory.get("blade").is_some());
    }
}
