//! The shipped Ardenvale campaign: five locations on the road from the
//! Cemetery of Ash to Vordt's arena, two quests, and the tables backing them.

use super::World;
use crate::entities::enemy::{AttackPattern, BossPhase, Enemy, LootDrop};
use crate::entities::item::{
    ArmorClass, ArmorStats, ConsumableEffect, ConsumableKind, DamageType, Item, ItemKind,
    ScalingStat, WeaponStats,
};
use crate::entities::location::Location;
use crate::entities::npc::{DialogueNode, DialogueOption, Npc};
use crate::entities::quest::{ObjectiveKind, Quest, Reward};
use std::collections::BTreeMap;

pub const STARTING_LOCATION: &str = "cemetery_of_ash";

pub fn ardenvale() -> World {
    World {
        locations: locations(),
        npcs: npcs(),
        enemies: enemies(),
        items: items(),
        quests: quests(),
    }
}

fn items() -> BTreeMap<String, Item> {
    let mut table = BTreeMap::new();
    let mut insert = |item: Item| {
        table.insert(item.id.clone(), item);
    };

    insert(
        Item::new(
            "rusted_sword",
            "Rusted Sword",
            "A pitted blade that has seen better centuries.",
            ItemKind::Weapon(WeaponStats {
                damage: 6,
                damage_type: DamageType::Physical,
                two_handed: false,
                scaling: Some(ScalingStat::Strength),
            }),
        )
        .with_value(20)
        .with_weight(3.0),
    );
    insert(
        Item::new(
            "ember_blade",
            "Ember Blade",
            "Andre's work. The edge still glows faintly from the forge.",
            ItemKind::Weapon(WeaponStats {
                damage: 14,
                damage_type: DamageType::Fire,
                two_handed: false,
                scaling: Some(ScalingStat::Strength),
            }),
        )
        .with_value(300)
        .with_weight(4.0),
    );
    insert(
        Item::new(
            "kite_shield",
            "Kite Shield",
            "Dented but serviceable.",
            ItemKind::Shield(ArmorStats {
                defense: 4,
                armor_class: ArmorClass::Medium,
                resistance: BTreeMap::new(),
            }),
        )
        .with_value(80)
        .with_weight(5.0),
    );
    insert(
        Item::new(
            "knight_armor",
            "Knight Armor",
            "Battered plate, scoured of its heraldry.",
            ItemKind::Armor(ArmorStats {
                defense: 8,
                armor_class: ArmorClass::Heavy,
                resistance: resist(&[(DamageType::Frost, 20)]),
            }),
        )
        .with_value(150)
        .with_weight(12.0),
    );
    insert(
        Item::new(
            "ashen_ring",
            "Ashen Ring",
            "Warm to the touch. Wards off flame.",
            ItemKind::Ring(ArmorStats {
                defense: 0,
                armor_class: ArmorClass::Light,
                resistance: resist(&[(DamageType::Fire, 30)]),
            }),
        )
        .with_value(120),
    );
    insert(
        Item::new(
            "healing_potion",
            "Healing Potion",
            "Bitter red draught.",
            ItemKind::Consumable(ConsumableEffect {
                kind: ConsumableKind::Heal,
                amount: 30,
                duration: 0,
            }),
        )
        .with_value(25),
    );
    insert(
        Item::new(
            "stamina_draught",
            "Stamina Draught",
            "Smells of crushed nettles.",
            ItemKind::Consumable(ConsumableEffect {
                kind: ConsumableKind::RestoreStamina,
                amount: 40,
                duration: 0,
            }),
        )
        .with_value(20),
    );
    insert(
        Item::new(
            "dragon_pepper",
            "Dragon Pepper",
            "Eating one is an act of courage in itself.",
            ItemKind::Consumable(ConsumableEffect {
                kind: ConsumableKind::AttackBuff,
                amount: 5,
                duration: 3,
            }),
        )
        .with_value(40),
    );
    insert(
        Item::new(
            "ember",
            "Ember",
            "A knot of wood that refuses to stop burning.",
            ItemKind::Material,
        )
        .with_value(15),
    );
    insert(
        Item::new(
            "frost_core",
            "Frost Core",
            "The cold heart of the Boreal beast.",
            ItemKind::Material,
        )
        .with_value(400),
    );
    table
}

fn resist(entries: &[(DamageType, u32)]) -> BTreeMap<DamageType, u32> {
    entries.iter().copied().collect()
}

fn enemies() -> BTreeMap<String, Enemy> {
    let mut table = BTreeMap::new();

    let mut soldier = Enemy::new("hollow_soldier", "Hollow Soldier", 3, 40, 8, 4);
    soldier.attack_patterns = vec![
        AttackPattern::basic(8),
        AttackPattern {
            name: "overhead slam".to_string(),
            damage: 14,
            damage_type: DamageType::Physical,
            heavy: true,
        },
    ];
    soldier.loot = vec![LootDrop {
        item_id: "ember".to_string(),
        chance: 0.4,
        quantity: (1, 2),
    }];
    soldier.essence_reward = 25;
    soldier.weaknesses.insert(DamageType::Fire);
    table.insert(soldier.id.clone(), soldier);

    let mut hound = Enemy::new("ashen_hound", "Ashen Hound", 5, 30, 11, 2);
    hound.attack_patterns = vec![
        AttackPattern {
            name: "snap".to_string(),
            damage: 9,
            damage_type: DamageType::Physical,
            heavy: false,
        },
        AttackPattern {
            name: "lunge".to_string(),
            damage: 13,
            damage_type: DamageType::Physical,
            heavy: true,
        },
    ];
    hound.loot = vec![LootDrop {
        item_id: "healing_potion".to_string(),
        chance: 0.25,
        quantity: (1, 1),
    }];
    hound.essence_reward = 35;
    hound.weaknesses.insert(DamageType::Frost);
    table.insert(hound.id.clone(), hound);

    let mut vordt = Enemy::new("vordt", "Vordt of the Boreal Valley", 12, 220, 16, 8);
    vordt.attack_patterns = vec![
        AttackPattern {
            name: "mace sweep".to_string(),
            damage: 16,
            damage_type: DamageType::Physical,
            heavy: false,
        },
        AttackPattern {
            name: "crushing slam".to_string(),
            damage: 24,
            damage_type: DamageType::Physical,
            heavy: true,
        },
    ];
    vordt.loot = vec![LootDrop {
        item_id: "frost_core".to_string(),
        chance: 1.0,
        quantity: (1, 1),
    }];
    vordt.essence_reward = 500;
    vordt.weaknesses.insert(DamageType::Fire);
    vordt.phases = vec![
        BossPhase {
            hp_percent_trigger: 100,
            attack_boost: 0,
            defense_boost: 0,
            patterns: None,
            message: None,
        },
        BossPhase {
            hp_percent_trigger: 50,
            attack_boost: 4,
            defense_boost: 2,
            patterns: Some(vec![
                AttackPattern {
                    name: "frost breath".to_string(),
                    damage: 18,
                    damage_type: DamageType::Frost,
                    heavy: false,
                },
                AttackPattern {
                    name: "boreal charge".to_string(),
                    damage: 26,
                    damage_type: DamageType::Frost,
                    heavy: true,
                },
            ]),
            message: Some("Frost crawls over Vordt's hide as he rears up, howling.".to_string()),
        },
        BossPhase {
            hp_percent_trigger: 20,
            attack_boost: 8,
            defense_boost: 0,
            patterns: None,
            message: Some("Vordt staggers, then charges with nothing left to lose.".to_string()),
        },
    ];
    table.insert(vordt.id.clone(), vordt);

    table
}

fn npcs() -> BTreeMap<String, Npc> {
    let mut table = BTreeMap::new();

    let mut andre = Npc::new(
        "blacksmith_andre",
        "Blacksmith Andre",
        "A broad-backed smith working a quiet anvil.",
    );
    andre.faction = Some("shrine".to_string());
    andre.shop = vec![
        "healing_potion".to_string(),
        "stamina_draught".to_string(),
        "kite_shield".to_string(),
    ];
    andre.dialogue.insert(
        "greeting".to_string(),
        DialogueNode {
            text: "Well then, a new face. Need smithing? Or just the warmth of the forge?"
                .to_string(),
            options: vec![
                DialogueOption {
                    label: "Can you forge me something?".to_string(),
                    next: Some("forge".to_string()),
                    relationship_delta: 0,
                    starts_quest: None,
                },
                DialogueOption {
                    label: "Tell me about this place.".to_string(),
                    next: Some("shrine_lore".to_string()),
                    relationship_delta: 1,
                    starts_quest: None,
                },
                DialogueOption {
                    label: "Farewell.".to_string(),
                    next: None,
                    relationship_delta: 0,
                    starts_quest: None,
                },
            ],
        },
    );
    andre.dialogue.insert(
        "forge".to_string(),
        DialogueNode {
            text: "Bring me two embers from the wall and I'll fold their fire into a blade."
                .to_string(),
            options: vec![
                DialogueOption {
                    label: "I'll fetch them.".to_string(),
                    next: Some("greeting".to_string()),
                    relationship_delta: 1,
                    starts_quest: Some("embers_for_andre".to_string()),
                },
                DialogueOption {
                    label: "Not now.".to_string(),
                    next: Some("greeting".to_string()),
                    relationship_delta: 0,
                    starts_quest: None,
                },
            ],
        },
    );
    andre.dialogue.insert(
        "shrine_lore".to_string(),
        DialogueNode {
            text: "Firelink has outlived three kingdoms. The beacon holds, so we hold."
                .to_string(),
            options: vec![DialogueOption {
                label: "Good to know.".to_string(),
                next: Some("greeting".to_string()),
                relationship_delta: 0,
                starts_quest: None,
            }],
        },
    );
    table.insert(andre.id.clone(), andre);

    let mut keeper = Npc::new(
        "fire_keeper",
        "Fire Keeper",
        "A veiled woman tending the beacon's flame.",
    );
    keeper.faction = Some("shrine".to_string());
    keeper.dialogue.insert(
        "greeting".to_string(),
        DialogueNode {
            text: "Welcome home, ashen one. The wall grows worse by the day.".to_string(),
            options: vec![
                DialogueOption {
                    label: "What can I do?".to_string(),
                    next: Some("task".to_string()),
                    relationship_delta: 0,
                    starts_quest: None,
                },
                DialogueOption {
                    label: "Just resting.".to_string(),
                    next: None,
                    relationship_delta: 0,
                    starts_quest: None,
                },
            ],
        },
    );
    keeper.dialogue.insert(
        "task".to_string(),
        DialogueNode {
            text: "Thin the hollows on the high wall. Three fewer would let the watch sleep."
                .to_string(),
            options: vec![
                DialogueOption {
                    label: "Consider it done.".to_string(),
                    next: Some("greeting".to_string()),
                    relationship_delta: 1,
                    starts_quest: Some("clear_the_wall".to_string()),
                },
                DialogueOption {
                    label: "I am no soldier.".to_string(),
                    next: Some("greeting".to_string()),
                    relationship_delta: -1,
                    starts_quest: None,
                },
            ],
        },
    );
    table.insert(keeper.id.clone(), keeper);

    table
}

fn locations() -> BTreeMap<String, Location> {
    let mut table = BTreeMap::new();
    let mut insert = |location: Location| {
        table.insert(location.id.clone(), location);
    };

    let mut cemetery = Location::new(
        "cemetery_of_ash",
        "Cemetery of Ash",
        "Broken headstones lean in grey drifts. The path north climbs toward a distant fire.",
    );
    cemetery.first_visit_text = Some(
        "You wake among the graves with ash in your mouth and a bell tolling far away."
            .to_string(),
    );
    cemetery.connect("north", "firelink_shrine");
    insert(cemetery);

    let mut shrine = Location::new(
        "firelink_shrine",
        "Firelink Shrine",
        "A ruined chapel sheltering an ember-bright beacon. The forge rings somewhere below.",
    );
    shrine.beacon = true;
    shrine.npcs = vec!["blacksmith_andre".to_string(), "fire_keeper".to_string()];
    shrine.connect("south", "cemetery_of_ash");
    shrine.connect("north", "high_wall");
    shrine.connect("east", "ashen_woods");
    insert(shrine);

    let mut wall = Location::new(
        "high_wall",
        "High Wall of Lothric",
        "Wind scours the battlements. Hollow soldiers shuffle between the crenellations.",
    );
    wall.enemies = vec!["hollow_soldier".to_string()];
    wall.ground_items = vec![Item::new(
        "ember",
        "Ember",
        "A knot of wood that refuses to stop burning.",
        ItemKind::Material,
    )
    .with_value(15)];
    wall.connect("south", "firelink_shrine");
    wall.connect("north", "boreal_approach");
    insert(wall);

    let mut woods = Location::new(
        "ashen_woods",
        "Ashen Woods",
        "Charred trunks stand in still rows. Something four-legged paces in the grey.",
    );
    woods.enemies = vec!["ashen_hound".to_string()];
    woods.connect("west", "firelink_shrine");
    insert(woods);

    let mut approach = Location::new(
        "boreal_approach",
        "Boreal Approach",
        "The gatehouse beyond the wall. Hoarfrost thickens on the flagstones.",
    );
    approach.first_visit_text =
        Some("The cold deepens with every step. Something enormous waits ahead.".to_string());
    approach.enemies = vec!["vordt".to_string()];
    approach.connect("south", "high_wall");
    insert(approach);

    table
}

fn quests() -> BTreeMap<String, Quest> {
    let mut table = BTreeMap::new();

    let wall = Quest::new(
        "clear_the_wall",
        "Clear the Wall",
        "Thin the hollow soldiers on the high wall so the shrine's watch can rest.",
    )
    .objective(ObjectiveKind::Kill, "hollow_soldier", 3)
    .reward(Reward {
        essence: 150,
        item_id: Some("ashen_ring".to_string()),
        faction: Some(("shrine".to_string(), 10)),
        lore: None,
    });
    table.insert(wall.id.clone(), wall);

    let embers = Quest::new(
        "embers_for_andre",
        "Embers for Andre",
        "Gather two embers from the high wall so Andre can forge a flame-tempered blade.",
    )
    .objective(ObjectiveKind::Item, "ember", 2)
    .reward(Reward {
        essence: 50,
        item_id: Some("ember_blade".to_string()),
        faction: Some(("shrine".to_string(), 5)),
        lore: Some(
            "Andre's forge predates the shrine itself; the first keepers built around it."
                .to_string(),
        ),
    });
    table.insert(embers.id.clone(), embers);

    table
}
