//! One play session: the player, the world, and the loops that drive them.
//!
//! State transitions (movement, looting, quest bookkeeping, equipment) are
//! methods returning narration strings so they can be exercised without a
//! terminal. The interactive REPL at the bottom is a thin shell over them.

use crate::commands::{self, CombatCommand, Command};
use crate::core::constants::BRACE_PROMPT_TIMEOUT_MS;
use crate::core::encounter::Encounter;
use crate::core::progression;
use crate::core::quest_log::QuestState;
use crate::entities::inventory::{self, EquipError};
use crate::entities::item::ConsumableKind;
use crate::entities::player::{Player, Stance, StatKind};
use crate::entities::quest::ObjectiveKind;
use crate::input;
use crate::save::SaveManager;
use crate::ui;
use crate::world::World;
use anyhow::Result;
use log::debug;
use rand::Rng;
use std::time::{Duration, Instant};

pub struct Session {
    pub player: Player,
    pub world: World,
    save: SaveManager,
}

/// What the encounter loop ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightResult {
    Victory,
    Death,
    Fled,
}

impl Session {
    pub fn new(player: Player, world: World, save: SaveManager) -> Self {
        Self {
            player,
            world,
            save,
        }
    }

    pub fn look(&self) -> String {
        match self.world.location(&self.player.current_location) {
            Some(location) => ui::render_location(location, &self.world),
            None => "You are nowhere at all.\n".to_string(),
        }
    }

    /// Moves through a connection. Entering a location picks up any essence
    /// stash dropped there and plays first-visit narration once.
    pub fn move_player(&mut self, direction: &str) -> String {
        let Some(location) = self.world.location(&self.player.current_location) else {
            return "You are nowhere at all.".to_string();
        };
        let Some(destination) = location.destination(direction).map(str::to_string) else {
            return format!("There is no way {direction} from here.");
        };
        self.player.current_location = destination.clone();
        self.player.discover(&destination);

        let mut lines = Vec::new();
        if let Some(amount) = progression::recover_essence(&mut self.player) {
            lines.push(format!("You reclaim {amount} lost essence."));
        }
        if let Some(location) = self.world.location_mut(&destination) {
            if let Some(text) = location.visit() {
                lines.push(text);
            }
        }
        lines.push(self.look());
        lines.join("\n")
    }

    pub fn take(&mut self, query: &str) -> String {
        let Some(location) = self.world.location_mut(&self.player.current_location) else {
            return "There is nothing here.".to_string();
        };
        let q = query.to_lowercase();
        let Some(index) = location
            .ground_items
            .iter()
            .position(|i| i.id == q || i.name.to_lowercase().starts_with(&q))
        else {
            return format!("There is no {query} here.");
        };
        let item = location.ground_items.remove(index);
        let (id, name, quantity) = (item.id.clone(), item.name.clone(), item.quantity);
        self.player.inventory.add(item);
        let mut lines = vec![format!("Taken: {name}.")];
        lines.extend(self.note_objective(ObjectiveKind::Item, &id, quantity));
        lines.join("\n")
    }

    /// Drops one of an item onto the ground here. Equipped gear stays put.
    pub fn drop_item(&mut self, query: &str) -> String {
        let Some(item) = self.player.inventory.find(query) else {
            return format!("You are not carrying {query}.");
        };
        if let Some(slot) = self.player.equipment.slot_of(&item.id) {
            return format!(
                "{} is equipped ({}). Unequip it first.",
                item.name,
                slot.name()
            );
        }
        let id = item.id.clone();
        let Some(dropped) = self.player.inventory.remove(&id, 1) else {
            return format!("You are not carrying {query}.");
        };
        let name = dropped.name.clone();
        if let Some(location) = self.world.location_mut(&self.player.current_location) {
            location.ground_items.push(dropped);
        }
        format!("Dropped: {name}.")
    }

    fn shopkeeper_here(&self) -> Option<&crate::entities::npc::Npc> {
        let location = self.world.location(&self.player.current_location)?;
        location
            .npcs
            .iter()
            .filter_map(|id| self.world.npc(id))
            .find(|npc| !npc.shop.is_empty())
    }

    pub fn shop_list(&self) -> String {
        let Some(keeper) = self.shopkeeper_here() else {
            return "No one here has anything to sell.".to_string();
        };
        let mut lines = vec![format!("{} offers:", keeper.name)];
        for id in &keeper.shop {
            if let Some(item) = self.world.item_template(id) {
                lines.push(format!("  {} - {} essence", item.name, item.value));
            }
        }
        lines.join("\n")
    }

    /// Buys one of a shopkeeper's wares for its essence value.
    pub fn buy_item(&mut self, query: &str) -> String {
        let Some(keeper) = self.shopkeeper_here() else {
            return "No one here has anything to sell.".to_string();
        };
        let q = query.to_lowercase();
        let ware = keeper.shop.iter().find_map(|id| {
            self.world
                .item_template(id)
                .filter(|i| i.id == q || i.name.to_lowercase().starts_with(&q))
        });
        let Some(item) = ware else {
            return format!("{} has no {query} for sale.", keeper.name);
        };
        let cost = item.value as u64;
        if self.player.essence < cost {
            return format!(
                "{} costs {cost} essence; you have {}.",
                item.name, self.player.essence
            );
        }
        let bought = item.clone();
        let name = bought.name.clone();
        let id = bought.id.clone();
        self.player.essence -= cost;
        self.player.inventory.add(bought);
        let mut lines = vec![format!("Bought: {name} for {cost} essence.")];
        lines.extend(self.note_objective(ObjectiveKind::Item, &id, 1));
        lines.join("\n")
    }

    pub fn equip_item(&mut self, query: &str) -> String {
        let Some(item) = self.player.inventory.find(query) else {
            return format!("You are not carrying {query}.");
        };
        let id = item.id.clone();
        let name = item.name.clone();
        match inventory::equip(&mut self.player.inventory, &mut self.player.equipment, &id) {
            Ok(slot) => format!("{name} equipped ({}).", slot.name()),
            Err(EquipError::NotEquippable) => format!("{name} cannot be equipped."),
            Err(_) => format!("You cannot equip {name} right now."),
        }
    }

    pub fn unequip_slot(&mut self, slot_name: &str) -> String {
        match inventory::unequip_named(
            &mut self.player.inventory,
            &mut self.player.equipment,
            slot_name,
        ) {
            Ok(id) => {
                let name = self
                    .player
                    .inventory
                    .get(&id)
                    .map(|i| i.name.clone())
                    .unwrap_or(id);
                format!("{name} unequipped.")
            }
            Err(EquipError::NoSuchSlot) => format!("No such slot: {slot_name}."),
            Err(_) => format!("Nothing is equipped in the {slot_name} slot."),
        }
    }

    /// Uses a consumable outside combat. Attack buffs only matter in a
    /// fight, so here the item is simply spent.
    pub fn use_item(&mut self, query: &str) -> String {
        match progression::consume_item(&mut self.player, query) {
            Ok(effect) => match effect.kind {
                ConsumableKind::Heal => format!(
                    "You feel restored. HP {}/{}.",
                    self.player.hp, self.player.max_hp
                ),
                ConsumableKind::RestoreStamina => format!(
                    "Your legs steady. Stamina {}/{}.",
                    self.player.stamina, self.player.max_stamina
                ),
                ConsumableKind::AttackBuff => {
                    "Heat spreads through you, then fades. Better used in a fight.".to_string()
                }
            },
            Err(err) => err.to_string(),
        }
    }

    pub fn set_stance(&mut self, name: &str) -> String {
        match Stance::parse(name) {
            Some(stance) => {
                self.player.stance = stance;
                format!("You settle into a {} stance.", stance.name())
            }
            None => "Stances: balanced, aggressive, defensive.".to_string(),
        }
    }

    pub fn rest_here(&mut self) -> String {
        let Some(location) = self.world.location(&self.player.current_location) else {
            return "There is nowhere to rest.".to_string();
        };
        match progression::rest(&mut self.player, location) {
            Ok(()) => "You rest at the beacon. Health, stamina, and estus are restored."
                .to_string(),
            Err(err) => err.to_string(),
        }
    }

    pub fn drink_estus(&mut self) -> String {
        match progression::use_estus(&mut self.player) {
            Ok(healed) => format!(
                "The flask burns going down. +{healed} HP ({}/{}). {} estus left.",
                self.player.hp, self.player.max_hp, self.player.estus
            ),
            Err(err) => err.to_string(),
        }
    }

    pub fn level_up_stat(&mut self, stat_name: Option<&str>) -> String {
        let Some(name) = stat_name else {
            let cost = crate::core::combat_math::level_cost(self.player.level);
            return format!(
                "Raising a stat costs {cost} essence (you have {}). Usage: level <stat>.",
                self.player.essence
            );
        };
        let Some(stat) = StatKind::parse(name) else {
            return format!("No such stat: {name}.");
        };
        match progression::level_up(&mut self.player, stat) {
            Ok(cost) => format!(
                "{} rises to {}. Level {} ({cost} essence spent).",
                stat.name(),
                self.player.stats.get(stat),
                self.player.level
            ),
            Err(err) => err.to_string(),
        }
    }

    /// Saves, reporting failure as narration. A broken disk never ends the
    /// session.
    pub fn save_game(&self) -> String {
        match self.save.save(&self.player, &self.world) {
            Ok(()) => "Game saved.".to_string(),
            Err(err) => format!("The game could not be saved: {err}"),
        }
    }

    /// Reloads the last save in place. A missing or unreadable file is
    /// reported and play continues with the current state.
    pub fn load_game(&mut self) -> String {
        match self.save.load() {
            Ok(Some((player, world))) => {
                self.player = player;
                self.world = world;
                format!("Save loaded.\n{}", self.look())
            }
            Ok(None) => "There is no save to load.".to_string(),
            Err(err) => format!("The save could not be read: {err}"),
        }
    }

    /// Quest bookkeeping for a kill or an item gained. Completions pay out
    /// immediately and exactly once.
    fn note_objective(&mut self, kind: ObjectiveKind, target: &str, amount: u32) -> Vec<String> {
        let ready = self
            .player
            .quests
            .record(&self.world.quests, kind, target, amount);
        let mut lines = Vec::new();
        for id in ready {
            let Some(quest) = self.world.quests.get(&id) else {
                continue;
            };
            if self.player.quests.try_complete(quest) {
                progression::apply_reward(&mut self.player, &quest.reward, &self.world.items);
                let mut line = format!("Quest complete: {}.", quest.name);
                if quest.reward.essence > 0 {
                    line.push_str(&format!(" +{} essence.", quest.reward.essence));
                }
                if let Some(item_id) = &quest.reward.item_id {
                    if let Some(item) = self.world.items.get(item_id) {
                        line.push_str(&format!(" Received: {}.", item.name));
                    }
                }
                lines.push(line);
                if let Some(lore) = &quest.reward.lore {
                    lines.push(format!("Lore gained: {lore}"));
                }
            }
        }
        lines
    }

    /// Accepts a quest offered in dialogue.
    pub fn start_quest(&mut self, quest_id: &str) -> Option<String> {
        let quest = self.world.quests.get(quest_id)?.clone();
        if self.player.quests.state(quest_id) != QuestState::NotStarted {
            return None;
        }
        self.player.quests.start(&quest);
        let mut lines = vec![format!("Quest started: {}. {}", quest.name, quest.description)];
        // Items already in the pack count toward collect objectives.
        for objective in &quest.objectives {
            if objective.kind == ObjectiveKind::Item {
                let held = self.player.inventory.count(&objective.target);
                if held > 0 {
                    lines.extend(self.note_objective(ObjectiveKind::Item, &objective.target, held));
                }
            }
        }
        Some(lines.join("\n"))
    }

    /// Resolves which NPC to talk to: the named one, or the only one here.
    pub fn npc_here(&self, query: Option<&str>) -> Option<String> {
        let location = self.world.location(&self.player.current_location)?;
        match query {
            Some(q) => {
                let q = q.to_lowercase();
                location
                    .npcs
                    .iter()
                    .find(|id| {
                        self.world
                            .npc(id)
                            .is_some_and(|n| n.id == q || n.name.to_lowercase().starts_with(&q))
                    })
                    .cloned()
            }
            None => {
                if location.npcs.len() == 1 {
                    location.npcs.first().cloned()
                } else {
                    None
                }
            }
        }
    }

    /// First live enemy template at the current location.
    pub fn enemy_here(&self) -> Option<String> {
        let location = self.world.location(&self.player.current_location)?;
        location
            .enemies
            .iter()
            .find(|id| self.world.enemy_template(id).is_some())
            .cloned()
    }

    /// Settles a won fight: essence, kill tally, quest progress, loot rolls.
    pub fn after_victory(&mut self, fight: &Encounter, rng: &mut impl Rng) -> Vec<String> {
        let enemy_id = fight.enemy.id.clone();
        let mut lines = vec![format!(
            "{} falls. +{} essence.",
            fight.enemy.name, fight.enemy.essence_reward
        )];
        self.player.essence += fight.enemy.essence_reward;
        self.player.record_kill(&enemy_id);
        lines.extend(self.note_objective(ObjectiveKind::Kill, &enemy_id, 1));

        for (item_id, quantity) in fight.roll_loot(rng) {
            if let Some(template) = self.world.instantiate_item(&item_id) {
                let item = template.with_quantity(quantity);
                lines.push(format!("Loot: {} x{quantity}.", item.name));
                self.player.inventory.add(item);
                lines.extend(self.note_objective(ObjectiveKind::Item, &item_id, quantity));
            }
        }

        // A slain boss stays slain.
        if fight.enemy.is_boss() {
            if let Some(location) = self.world.location_mut(&self.player.current_location) {
                location.enemies.retain(|id| *id != enemy_id);
            }
        }
        lines
    }

    /// Settles the player's death.
    pub fn after_defeat(&mut self) -> String {
        let dropped = self.player.essence;
        let respawn = progression::handle_death(&mut self.player);
        let name = self
            .world
            .location(&respawn)
            .map(|l| l.name.clone())
            .unwrap_or(respawn);
        if dropped > 0 {
            format!(
                "You die. {dropped} essence falls where you stood.\nYou wake at {name}, hollow but breathing."
            )
        } else {
            format!("You die.\nYou wake at {name}, hollow but breathing.")
        }
    }

    // ---- interactive shell -------------------------------------------------

    /// The main REPL. Returns when the player quits or stdin closes.
    pub fn run(&mut self) -> Result<()> {
        println!("{}", ui::divider());
        println!("{}", self.look());
        loop {
            let Some(line) = input::read_line("> ")? else {
                return Ok(());
            };
            let Some(command) = commands::parse(&line) else {
                if !line.is_empty() {
                    println!("Unclear. Try 'help'.");
                }
                continue;
            };
            debug!("command: {command:?}");
            match command {
                Command::Quit => {
                    println!("{}", self.save_game());
                    return Ok(());
                }
                Command::Look => println!("{}", self.look()),
                Command::Move(direction) => println!("{}", self.move_player(&direction)),
                Command::Take(query) => println!("{}", self.take(&query)),
                Command::Drop(query) => println!("{}", self.drop_item(&query)),
                Command::Shop => println!("{}", self.shop_list()),
                Command::Buy(query) => println!("{}", self.buy_item(&query)),
                Command::Inventory => self.print_inventory(),
                Command::Equip(query) => println!("{}", self.equip_item(&query)),
                Command::Unequip(slot) => println!("{}", self.unequip_slot(&slot)),
                Command::Use(query) => println!("{}", self.use_item(&query)),
                Command::Status => print!("{}", ui::render_status(&self.player)),
                Command::Stance(name) => println!("{}", self.set_stance(&name)),
                Command::Rest => println!("{}", self.rest_here()),
                Command::Estus => println!("{}", self.drink_estus()),
                Command::LevelUp(stat) => println!("{}", self.level_up_stat(stat.as_deref())),
                Command::Quests => print!("{}", ui::render_quests(&self.player, &self.world)),
                Command::Lore => self.print_lore(),
                Command::Save => println!("{}", self.save_game()),
                Command::Load => println!("{}", self.load_game()),
                Command::Help => print_help(),
                Command::Talk(query) => self.run_dialogue(query.as_deref())?,
                Command::Attack => self.run_fight()?,
            }
        }
    }

    fn print_inventory(&self) {
        if self.player.inventory.is_empty() {
            println!("Your pack is empty.");
            return;
        }
        for item in &self.player.inventory.items {
            let marker = if item.equipped { " (equipped)" } else { "" };
            if item.quantity > 1 {
                println!("{} x{}{marker}", item.name, item.quantity);
            } else {
                println!("{}{marker}", item.name);
            }
        }
    }

    fn print_lore(&self) {
        if self.player.lore.is_empty() {
            println!("You have learned nothing of this land yet.");
            return;
        }
        for entry in &self.player.lore {
            println!("- {entry}");
        }
    }

    fn run_dialogue(&mut self, query: Option<&str>) -> Result<()> {
        let Some(npc_id) = self.npc_here(query) else {
            println!("There is no one here to talk to by that name.");
            return Ok(());
        };
        loop {
            let Some(npc) = self.world.npc_mut(&npc_id) else {
                return Ok(());
            };
            let name = npc.name.clone();
            let Some(node) = npc.greet().cloned() else {
                return Ok(());
            };
            println!("{name}: \"{}\"", node.text);
            if node.options.is_empty() {
                // Dead-end node: rewind to the greeting for next time.
                if let Some(npc) = self.world.npc_mut(&npc_id) {
                    npc.current_node = "greeting".to_string();
                }
                return Ok(());
            }
            for (index, option) in node.options.iter().enumerate() {
                println!("  {}. {}", index + 1, option.label);
            }
            let Some(line) = input::read_line("? ")? else {
                return Ok(());
            };
            let Ok(choice) = line.trim().parse::<usize>() else {
                println!("Pick a number.");
                continue;
            };
            if choice == 0 || choice > node.options.len() {
                println!("Pick a number.");
                continue;
            }
            let Some(npc) = self.world.npc_mut(&npc_id) else {
                return Ok(());
            };
            let Some(option) = npc.choose(choice - 1) else {
                continue;
            };
            if let Some(quest_id) = &option.starts_quest {
                if let Some(message) = self.start_quest(quest_id) {
                    println!("{message}");
                }
            }
            if option.next.is_none() {
                return Ok(());
            }
        }
    }

    fn run_fight(&mut self) -> Result<()> {
        let Some(enemy_id) = self.enemy_here() else {
            println!("Nothing here wants to fight you.");
            return Ok(());
        };
        let Some(enemy) = self.world.spawn_enemy(&enemy_id) else {
            return Ok(());
        };
        let mut fight = Encounter::new(enemy);
        let started = Instant::now();
        let mut rng = rand::thread_rng();
        println!("{} moves to attack!", fight.enemy.name);

        let result = loop {
            println!(
                "\n{}  {} {}/{}",
                fight.enemy.name,
                ui::meter(fight.enemy.hp, fight.enemy.max_hp, ui::METER_WIDTH),
                fight.enemy.hp,
                fight.enemy.max_hp
            );
            println!(
                "You      {} {}/{}  stamina {}/{}",
                ui::meter(self.player.hp, self.player.max_hp, ui::METER_WIDTH),
                self.player.hp,
                self.player.max_hp,
                self.player.stamina,
                self.player.max_stamina
            );

            let Some(line) = input::read_line("! ")? else {
                break FightResult::Fled;
            };
            let Some(command) = commands::parse_combat(&line) else {
                println!("In a fight: attack, special <move>, estus, use <item>, stance <s>, flee.");
                continue;
            };
            let mut enemy_acts = true;
            match command {
                CombatCommand::Attack => {
                    let now = started.elapsed().as_secs_f64();
                    let outcome = fight.player_attack(&self.player, now);
                    self.narrate_strike(&outcome);
                    if outcome.defeated {
                        break FightResult::Victory;
                    }
                }
                CombatCommand::Special(name) => {
                    let Some(mv) = self.player.class.find_move(&name) else {
                        println!("You know no such move.");
                        continue;
                    };
                    match fight.special_move(&mut self.player, mv, &mut rng) {
                        Ok(outcome) => {
                            self.narrate_strike(&outcome);
                            if outcome.defeated {
                                break FightResult::Victory;
                            }
                        }
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    }
                }
                CombatCommand::Estus => println!("{}", self.drink_estus()),
                CombatCommand::Use(query) => {
                    match progression::consume_item(&mut self.player, &query) {
                        Ok(effect) => {
                            if effect.kind == ConsumableKind::AttackBuff {
                                fight.add_attack_buff(effect.amount, effect.duration);
                                println!("Your strikes sharpen (+{} attack).", effect.amount);
                            } else {
                                println!("Done.");
                            }
                        }
                        Err(err) => {
                            println!("{err}");
                            continue;
                        }
                    }
                }
                CombatCommand::Stance(name) => println!("{}", self.set_stance(&name)),
                CombatCommand::Status => {
                    print!("{}", ui::render_status(&self.player));
                    enemy_acts = false;
                }
                CombatCommand::Flee => {
                    if fight.enemy.is_boss() {
                        println!("The way back is sealed. There is no fleeing this.");
                    } else {
                        break FightResult::Fled;
                    }
                }
                CombatCommand::Help => {
                    println!("attack, special <move>, estus, use <item>, stance <s>, status, flee");
                    enemy_acts = false;
                }
            }

            if enemy_acts && fight.enemy.is_alive() {
                let pattern = fight.next_pattern();
                let braced = if pattern.heavy && !fight.enemy_stunned() {
                    println!(
                        "{} winds up a {}! Press Enter to brace!",
                        fight.enemy.name, pattern.name
                    );
                    matches!(
                        input::read_line_timeout(Duration::from_millis(BRACE_PROMPT_TIMEOUT_MS))?,
                        input::TimedRead::Entered(_)
                    )
                } else {
                    false
                };
                let outcome = fight.enemy_turn(&mut self.player, braced, &mut rng);
                if outcome.was_stunned {
                    println!("{} is stunned and misses its turn.", fight.enemy.name);
                } else if outcome.dodged {
                    println!("You slip aside from the {}.", outcome.pattern_name);
                } else {
                    let braced_note = if braced && outcome.heavy { " (braced)" } else { "" };
                    println!(
                        "{} hits you with {} for {}{braced_note}.",
                        fight.enemy.name, outcome.pattern_name, outcome.damage
                    );
                }
                if outcome.player_defeated {
                    break FightResult::Death;
                }
            }
        };

        match result {
            FightResult::Victory => {
                for line in self.after_victory(&fight, &mut rng) {
                    println!("{line}");
                }
            }
            FightResult::Death => println!("{}", self.after_defeat()),
            FightResult::Fled => println!("You break away and run."),
        }
        Ok(())
    }

    fn narrate_strike(&self, outcome: &crate::core::encounter::StrikeOutcome) {
        let name = outcome.move_name.as_deref().unwrap_or("Your attack");
        let mut line = format!("{name} hits for {}.", outcome.damage);
        if outcome.combo_stacks > 0 {
            line.push_str(&format!(" Combo x{}!", outcome.combo_stacks + 1));
        }
        if outcome.exploited_weakness {
            line.push_str(" It recoils from the blow!");
        }
        if outcome.stunned_enemy {
            line.push_str(" The enemy is stunned!");
        }
        println!("{line}");
        if let Some(message) = &outcome.phase_message {
            println!("{message}");
        }
    }
}

fn print_help() {
    println!(
        "look, north/south/east/west, attack, talk [npc], take/drop <item>, shop,\n\
         buy <item>, inventory, equip <item>, unequip <slot>, use <item>, status,\n\
         stance <s>, rest, estus, level <stat>, quests, lore, save, load, quit"
    );
}
