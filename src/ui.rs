//! Plain-text rendering helpers for the terminal loop.

use crate::entities::location::Location;
use crate::entities::player::Player;
use crate::world::World;
use std::fmt::Write;

pub const METER_WIDTH: usize = 20;

pub fn divider() -> String {
    "-".repeat(60)
}

/// A fixed-width meter like `[########------------]`. Current is clamped to
/// max so an over-healed pool never overflows the bar.
pub fn meter(current: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        (current.min(max) as usize * width) / max as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_status(player: &Player) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} the {} (level {})",
        player.name,
        player.class.name(),
        player.level
    );
    let _ = writeln!(
        out,
        "HP      {} {}/{}",
        meter(player.hp, player.max_hp, METER_WIDTH),
        player.hp,
        player.max_hp
    );
    let _ = writeln!(
        out,
        "Stamina {} {}/{}",
        meter(player.stamina, player.max_stamina, METER_WIDTH),
        player.stamina,
        player.max_stamina
    );
    let _ = writeln!(
        out,
        "Estus {}/{}  Essence {}  Stance {}",
        player.estus,
        player.estus_max,
        player.essence,
        player.stance.name()
    );
    for stat in crate::entities::player::StatKind::ALL {
        let _ = write!(out, "{} {}  ", stat.name(), player.stats.get(stat));
    }
    out.push('\n');
    out
}

pub fn render_location(location: &Location, world: &World) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", location.name);
    let _ = writeln!(out, "{}", location.description);
    if location.beacon {
        let _ = writeln!(out, "A beacon burns here. You may rest.");
    }
    for npc_id in &location.npcs {
        if let Some(npc) = world.npc(npc_id) {
            let _ = writeln!(out, "{} is here.", npc.name);
        }
    }
    for enemy_id in &location.enemies {
        if let Some(enemy) = world.enemy_template(enemy_id) {
            let _ = writeln!(out, "{} lurks nearby.", enemy.name);
        }
    }
    for item in &location.ground_items {
        let _ = writeln!(out, "On the ground: {}.", item.name);
    }
    if !location.connections.is_empty() {
        let exits: Vec<&str> = location.connections.keys().map(String::as_str).collect();
        let _ = writeln!(out, "Exits: {}.", exits.join(", "));
    }
    out
}

pub fn render_quests(player: &Player, world: &World) -> String {
    let mut out = String::new();
    let mut any = false;
    for id in player.quests.active_ids() {
        let Some(quest) = world.quest(id) else { continue };
        any = true;
        let _ = writeln!(out, "{} (active)", quest.name);
        if let Some(counts) = player.quests.progress(id) {
            for (objective, count) in quest.objectives.iter().zip(counts) {
                let _ = writeln!(
                    out,
                    "  {} {}: {}/{}",
                    match objective.kind {
                        crate::entities::quest::ObjectiveKind::Kill => "defeat",
                        crate::entities::quest::ObjectiveKind::Item => "collect",
                    },
                    objective.target,
                    count,
                    objective.required
                );
            }
        }
    }
    for id in player.quests.completed_ids() {
        if let Some(quest) = world.quest(id) {
            any = true;
            let _ = writeln!(out, "{} (completed)", quest.name);
        }
    }
    if !any {
        out.push_str("No quests yet.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::class::PlayerClass;
    use crate::world::content;

    #[test]
    fn meter_fills_proportionally_and_clamps() {
        assert_eq!(meter(0, 100, 10), "[----------]");
        assert_eq!(meter(50, 100, 10), "[#####-----]");
        assert_eq!(meter(100, 100, 10), "[##########]");
        assert_eq!(meter(250, 100, 10), "[##########]");
        assert_eq!(meter(1, 0, 10), "[----------]");
    }

    #[test]
    fn location_render_lists_exits_and_presences() {
        let world = content::ardenvale();
        let shrine = world.location("firelink_shrine").unwrap();
        let text = render_location(shrine, &world);
        assert!(text.contains("Firelink Shrine"));
        assert!(text.contains("beacon"));
        assert!(text.contains("Blacksmith Andre"));
        assert!(text.contains("Exits:"));
    }

    #[test]
    fn quest_render_shows_progress() {
        let world = content::ardenvale();
        let mut player = Player::new("Tarn", PlayerClass::Warrior, content::STARTING_LOCATION);
        assert!(render_quests(&player, &world).contains("No quests"));
        player.quests.start(world.quest("clear_the_wall").unwrap());
        let text = render_quests(&player, &world);
        assert!(text.contains("Clear the Wall (active)"));
        assert!(text.contains("defeat hollow_soldier: 0/3"));
    }
}
