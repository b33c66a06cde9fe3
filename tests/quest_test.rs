//! Quest lifecycle through the session layer, using the shipped quests.

use ardenvale::core::encounter::Encounter;
use ardenvale::core::quest_log::QuestState;
use ardenvale::entities::class::PlayerClass;
use ardenvale::entities::player::Player;
use ardenvale::save::SaveManager;
use ardenvale::session::Session;
use ardenvale::world::content;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

fn session() -> (Session, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let world = content::ardenvale();
    let player = Player::new("Tarn", PlayerClass::Warrior, content::STARTING_LOCATION);
    (
        Session::new(player, world, SaveManager::with_dir(dir.path())),
        dir,
    )
}

fn slay(s: &mut Session, enemy_id: &str, rng: &mut ChaCha8Rng) -> Vec<String> {
    let mut fight = Encounter::new(s.world.spawn_enemy(enemy_id).unwrap());
    fight.enemy.hp = 0;
    s.after_victory(&fight, rng)
}

#[test]
fn kill_quest_full_lifecycle() {
    let (mut s, _dir) = session();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(s.player.quests.state("clear_the_wall"), QuestState::NotStarted);

    // Kills before accepting the quest do not count.
    slay(&mut s, "hollow_soldier", &mut rng);
    s.start_quest("clear_the_wall").unwrap();
    assert_eq!(s.player.quests.progress("clear_the_wall"), Some(&[0][..]));

    slay(&mut s, "hollow_soldier", &mut rng);
    slay(&mut s, "hollow_soldier", &mut rng);
    assert_eq!(s.player.quests.state("clear_the_wall"), QuestState::Active);
    assert_eq!(s.player.quests.progress("clear_the_wall"), Some(&[2][..]));

    let lines = slay(&mut s, "hollow_soldier", &mut rng);
    assert!(lines.iter().any(|l| l.contains("Quest complete: Clear the Wall")));
    assert_eq!(s.player.quests.state("clear_the_wall"), QuestState::Completed);
    assert_eq!(s.player.inventory.count("ashen_ring"), 1);
    assert_eq!(s.player.faction_rep.get("shrine"), Some(&10));
}

#[test]
fn unrelated_kills_do_not_advance_the_quest() {
    let (mut s, _dir) = session();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    s.start_quest("clear_the_wall").unwrap();
    slay(&mut s, "ashen_hound", &mut rng);
    assert_eq!(s.player.quests.progress("clear_the_wall"), Some(&[0][..]));
}

#[test]
fn collect_quest_completes_via_ground_pickups() {
    let (mut s, _dir) = session();
    s.start_quest("embers_for_andre").unwrap();
    s.player.current_location = "high_wall".to_string();
    s.take("ember");
    assert_eq!(s.player.quests.state("embers_for_andre"), QuestState::Active);

    // Restock the ground and take a second ember.
    let ember = s.world.item_template("ember").unwrap().clone();
    s.world
        .location_mut("high_wall")
        .unwrap()
        .ground_items
        .push(ember);
    let text = s.take("ember");
    assert!(text.contains("Quest complete: Embers for Andre"));
    assert!(text.contains("Ember Blade"));
    assert_eq!(s.player.quests.state("embers_for_andre"), QuestState::Completed);
    assert_eq!(s.player.lore.len(), 1);
}

#[test]
fn completed_quest_cannot_restart_or_pay_twice() {
    let (mut s, _dir) = session();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    s.start_quest("clear_the_wall").unwrap();
    for _ in 0..3 {
        slay(&mut s, "hollow_soldier", &mut rng);
    }
    assert_eq!(s.player.quests.state("clear_the_wall"), QuestState::Completed);
    let essence_after = s.player.essence;

    assert!(s.start_quest("clear_the_wall").is_none());
    let lines = slay(&mut s, "hollow_soldier", &mut rng);
    assert!(!lines.iter().any(|l| l.contains("Quest complete")));
    // Only the kill's own essence came in, not a second quest payout.
    assert_eq!(s.player.essence, essence_after + 25);
    assert_eq!(s.player.inventory.count("ashen_ring"), 1);
}

#[test]
fn dialogue_option_starts_the_smith_quest() {
    let (mut s, _dir) = session();
    s.player.current_location = "firelink_shrine".to_string();
    let npc_id = s.npc_here(Some("blacksmith")).unwrap();
    let npc = s.world.npc_mut(&npc_id).unwrap();
    npc.greet();
    // Walk the dialogue graph: greeting -> forge -> accept.
    let to_forge = npc.choose(0).unwrap();
    assert_eq!(to_forge.next.as_deref(), Some("forge"));
    let accept = npc.choose(0).unwrap();
    let quest_id = accept.starts_quest.clone().unwrap();
    let message = s.start_quest(&quest_id).unwrap();
    assert!(message.contains("Quest started: Embers for Andre"));
    assert_eq!(s.player.quests.state("embers_for_andre"), QuestState::Active);
    // Accepting again through dialogue is a no-op.
    assert!(s.start_quest(&quest_id).is_none());
}
