//! Static game content: the dungeon rooms and their adjacency graph, the
//! enemy roster, and the item catalog, declared in code the same way the
//! canonical world is seeded elsewhere in the project history.
//!
//! Everything here is an immutable blueprint. Mutable copies of the rooms
//! are handed to [`crate::game::world::WorldState`] at session start; items
//! and enemies are only ever read.

use std::collections::HashMap;

use crate::game::types::{EnemyTemplate, Item, ItemKind, Room, UseEffect};

/// The starting room id for new players.
pub const START_ROOM_ID: &str = "start";

/// The synthetic backtracking direction present in most rooms.
pub const PREVIOUS_DIRECTION: &str = "previous";

/// Static catalog of rooms, enemies and items plus the lookup indexes the
/// engines need. Built once per session; no hidden globals.
#[derive(Debug)]
pub struct Catalog {
    enemies: HashMap<&'static str, EnemyTemplate>,
    items: HashMap<&'static str, Item>,
    /// direction label -> target room id, in declaration order (the order
    /// matters for exit display).
    graph: HashMap<&'static str, Vec<(&'static str, &'static str)>>,
    /// Lowercased display name -> item id, precomputed so free-text item
    /// commands resolve without scanning the catalog per call.
    name_index: HashMap<String, &'static str>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let items = item_definitions();
        let name_index = items
            .values()
            .map(|item| (item.name.to_lowercase(), item.id))
            .collect();
        Self {
            enemies: enemy_definitions(),
            items,
            graph: room_graph(),
            name_index,
        }
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyTemplate> {
        self.enemies.get(id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.enemies.values()
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Resolve a free-text item name (case-insensitive, matched against the
    /// display name rather than the internal id).
    pub fn resolve_item_name(&self, name: &str) -> Option<&Item> {
        let key = name.trim().to_lowercase();
        self.name_index.get(&key).and_then(|id| self.items.get(id))
    }

    /// Display name for an item id, falling back to the raw id for loot that
    /// is not in the catalog.
    pub fn item_name<'a>(&self, id: &'a str) -> &'a str {
        self.items.get(id).map(|item| item.name).unwrap_or(id)
    }

    /// Exits for a room, in declaration order.
    pub fn exits(&self, room_id: &str) -> &[(&'static str, &'static str)] {
        self.graph.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a direction label from a room to its target room id.
    pub fn target_of(&self, room_id: &str, direction: &str) -> Option<&'static str> {
        self.exits(room_id)
            .iter()
            .find(|(label, _)| *label == direction)
            .map(|(_, target)| *target)
    }

    /// Fresh mutable copies of every room, keyed by id.
    pub fn build_rooms(&self) -> HashMap<String, Room> {
        room_definitions()
            .into_iter()
            .map(|room| (room.id.clone(), room))
            .collect()
    }
}

fn room(
    id: &str,
    name: &str,
    description: &str,
    items: &[&str],
    enemy: Option<&str>,
    locked: bool,
) -> Room {
    Room {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        items: items.iter().map(|i| i.to_string()).collect(),
        enemy: enemy.map(str::to_string),
        enemy_instance: None,
        locked,
        special: None,
    }
}

fn room_definitions() -> Vec<Room> {
    let mut rooms = vec![
        room(
            "start",
            "start",
            "A damp stone chamber lit by flickering torches. Carved runes on the walls glow faintly in the dim light.",
            &["flashlight"],
            None,
            false,
        ),
        room(
            "north",
            "north",
            "You enter a cold chamber. There are doors to the south and west.",
            &["key"],
            None,
            false,
        ),
        room(
            "east",
            "east",
            "You find yourself in a library. There is a door to the west and a hidden passage to the south.",
            &["ancient_book"],
            None,
            false,
        ),
        room(
            "west",
            "west",
            "You discover a mysterious door, but it requires a key to enter. but there is a chest lying in the corner.",
            &["chest"],
            None,
            false,
        ),
        room(
            "south",
            "south",
            "You enter a dark cavern. The air feels heavy. There is a door to the north and a mysterious tunnel to the east.",
            &["torch"],
            None,
            false,
        ),
        room(
            "treasure_room",
            "treasure room",
            "A magnificent room filled with gold and jewels.",
            &["crown", "golden_sword"],
            None,
            true,
        ),
        room(
            "cave",
            "cave",
            "A damp cave with strange glowing crystals. There is a passage back west and a dark tunnel to the south.",
            &["dragon_scale", "dragon_tooth"],
            None,
            true,
        ),
        room(
            "dragon_lair",
            "dragon's lair",
            "A massive cavern with scorch marks... The legendary dragon rests here!",
            &["bow", "arrows"],
            Some("dragon"),
            true,
        ),
        room(
            "forest",
            "forest",
            "A lush green forest with sunlight filtering through the leaves. There is a path to the east and a dark cave to the west.",
            &["berries", "crystal"],
            Some("goblin"),
            false,
        ),
        room(
            "mountain",
            "mountain",
            "A rocky mountain path with a breathtaking view. There is a path down to the south and a strange door embedded in the cliff.",
            &["stone_pickaxe"],
            Some("troll"),
            false,
        ),
    ];
    if let Some(treasure) = rooms.iter_mut().find(|r| r.id == "treasure_room") {
        treasure.special = Some("Congratulations! You found the royal treasures!".to_string());
    }
    rooms
}

fn room_graph() -> HashMap<&'static str, Vec<(&'static str, &'static str)>> {
    HashMap::from([
        ("start", vec![("north", "north"), ("east", "east")]),
        ("north", vec![("west", "west"), ("south", "south")]),
        (
            "east",
            vec![
                ("west", "west"),
                ("south", "south"),
                (PREVIOUS_DIRECTION, "start"),
            ],
        ),
        (
            "west",
            vec![("door", "treasure_room"), (PREVIOUS_DIRECTION, "east")],
        ),
        ("south", vec![("north", "north"), ("east", "east")]),
        (
            "treasure_room",
            vec![("north", "forest"), (PREVIOUS_DIRECTION, "west")],
        ),
        (
            "mountain",
            vec![("south", "cave"), (PREVIOUS_DIRECTION, "forest")],
        ),
        (
            "forest",
            vec![("up", "mountain"), (PREVIOUS_DIRECTION, "treasure_room")],
        ),
        (
            "cave",
            vec![("door", "dragon_lair"), (PREVIOUS_DIRECTION, "mountain")],
        ),
        ("dragon_lair", vec![(PREVIOUS_DIRECTION, "cave")]),
    ])
}

fn enemy_definitions() -> HashMap<&'static str, EnemyTemplate> {
    let mut enemies = HashMap::new();

    // The goblin's behavior table replaces the shared defaults wholesale, so
    // its only entry names an attack with no multiplier and no flavor line;
    // both fall back downstream. Kept verbatim.
    enemies.insert(
        "goblin",
        EnemyTemplate {
            id: "goblin",
            name: "Forest Goblin",
            health: 100,
            damage: 10,
            defense: 0,
            behavior: vec![("basicAttack", 14)],
            attacks: HashMap::from([("basic", 1.0), ("special", 1.5), ("critical", 2.0)]),
            drop_items: vec!["shield", "healing_potion", "climbing_rope"],
        },
    );

    enemies.insert(
        "troll",
        EnemyTemplate {
            id: "troll",
            name: "Mountain Troll",
            health: 250,
            damage: 23,
            defense: 3,
            behavior: vec![("basic", 23), ("rockThrow", 20)],
            attacks: HashMap::from([
                ("basic", 1.0),
                ("special", 1.5),
                ("critical", 2.0),
                ("rockThrow", 2.0),
            ]),
            drop_items: vec!["small_dagger", "heavy_armor"],
        },
    );

    enemies.insert(
        "dragon",
        EnemyTemplate {
            id: "dragon",
            name: "Ancient Dragon",
            health: 500,
            damage: 120,
            defense: 5,
            behavior: vec![("basic", 120), ("fireBreath", 120), ("tailSwipe", 100)],
            attacks: HashMap::from([
                ("basic", 1.0),
                ("special", 1.5),
                ("critical", 2.0),
                ("fireBreath", 2.0),
                ("tailSwipe", 1.3),
            ]),
            drop_items: vec!["dragon_heart", "scaled_armor", "ancient_tear"],
        },
    );

    enemies
}

fn item_definitions() -> HashMap<&'static str, Item> {
    let defs = [
        Item {
            id: "golden_sword",
            name: "Golden Sword",
            description: "A legendary sword forged from pure gold",
            kind: ItemKind::Dagger,
            damage: Some(32),
            defense: None,
            magic: None,
            effect: Some(UseEffect::RaiseStrength {
                amount: 32,
                message: "You equip the golden sword. Your attacks now deal +32 damage!",
            }),
        },
        Item {
            id: "small_dagger",
            name: "Small Dagger",
            description: "A sharp dagger that can be used for close combat",
            kind: ItemKind::Dagger,
            damage: Some(12),
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "stone_pickaxe",
            name: "Stone Axe",
            description: "A heavy double-headed axe",
            kind: ItemKind::Axe,
            damage: Some(15),
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "bow",
            name: "Bow",
            description: "A powerful bow that can shoot arrows",
            kind: ItemKind::Bow,
            damage: Some(10),
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "shield",
            name: "Shield",
            description: "A large shield that provides extra protection",
            kind: ItemKind::Shield,
            damage: None,
            defense: Some(20),
            magic: None,
            effect: Some(UseEffect::RaiseDefense {
                amount: 20,
                message: "You equip the shield and feel safer! Your defense increases by 20!",
            }),
        },
        Item {
            id: "heavy_armor",
            name: "Heavy Armor",
            description: "A suit of heavy armor that provides excellent protection",
            kind: ItemKind::Armor,
            damage: None,
            defense: Some(30),
            magic: None,
            effect: Some(UseEffect::RaiseDefense {
                amount: 30,
                message: "You equip the heavy armor and feel invincible! Your defense increases by 30!",
            }),
        },
        Item {
            id: "healing_potion",
            name: "Healing Potion",
            description: "A potion that heals wounds",
            kind: ItemKind::Healing,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::Heal {
                amount: 30,
                message: "You drink the healing potion and feel rejuvenated! (+30 health)",
            }),
        },
        Item {
            id: "berries",
            name: "Berries",
            description: "A handful of ripe berries that look edible",
            kind: ItemKind::Healing,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::Heal {
                amount: 10,
                message: "You eat the berries and feel refreshed!",
            }),
        },
        Item {
            id: "chest",
            name: "Chest",
            description: "A large chest filled with gold and jewels\nyou will have to type (use chest) to unlock it with the key!",
            kind: ItemKind::Utility,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::OpenChest {
                requires: "key",
                grants: "map",
                open_messages: [
                    "You open the treasure chest and find the royal treasures!",
                    "Inside you find a map to the dragon's lair.",
                ],
                locked_message: "The treasure chest is locked! You need a key to open it.",
            }),
        },
        Item {
            id: "map",
            name: "Map",
            description: "A detailed map showing the way to the dragon's lair!",
            kind: ItemKind::Utility,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::RevealPassage {
                room: "cave",
                description: "A damp cave with strange glowing crystals. There is a passage back west and a dark tunnel to the south. The map shows a hidden passage to the dragon's lair to the north.",
                unlock: "dragon_lair",
                message: "The map guides you to the dragon's lair!",
            }),
        },
        Item {
            id: "dragon_scale",
            name: "Dragon Scales",
            description: "Shimmering scales from the legendary dragon\nyou will have to use it!",
            kind: ItemKind::Healing,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::Fortify {
                defense: 150,
                max_health: 250,
                message: "The dragon scales provide excellent protection, Your maximum health increases by 250! and 150 defense!",
            }),
        },
        Item {
            id: "ancient_book",
            name: "Ancient Book",
            description: "A dusty tome filled with mysterious symbols",
            kind: ItemKind::Utility,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::RewriteDescription {
                room: "east",
                description: "You find yourself in a library. There is a door to the west and a hidden passage to the south. A secret passage to the treasure room is revealed to the east.",
                message: "You read the ancient book and learn about a hidden treasure room!",
                followup: Some(
                    "The book mentions that a key and a flashlight are needed to access the true treasures.",
                ),
            }),
        },
        Item {
            id: "key",
            name: "Key",
            description: "An old rusty key that glints in the light",
            kind: ItemKind::Utility,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::UnlockRoom {
                room: "treasure_room",
                message: "You have found the way to the treasure room!",
            }),
        },
        Item {
            id: "climbing_rope",
            name: "Climbing Rope",
            description: "A sturdy rope that can be used for climbing",
            kind: ItemKind::Utility,
            damage: None,
            defense: None,
            magic: None,
            effect: Some(UseEffect::UnlockRoom {
                room: "cave",
                message: "use this rope to climb up the mountain",
            }),
        },
        Item {
            id: "arrows",
            name: "Arrows",
            description: "A quiver of sharp arrows for the bow",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "flashlight",
            name: "Flashlight",
            description: "A small flashlight that flickers to life",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "torch",
            name: "Torch",
            description: "A burning torch that illuminates the darkness",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "dragon_tooth",
            name: "Dragon Tooth",
            description: "A sharp tooth from the legendary dragon",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "dragon_heart",
            name: "Dragon Heart",
            description: "The heart of the ancient dragon, a trophy of your victory",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "ancient_tear",
            name: "Ancient Tear",
            description: "A tear from the ancient dragon, said to have magical properties",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "scaled_armor",
            name: "Scaled Armor",
            description: "Armor made from the scales of the ancient dragon",
            kind: ItemKind::Armor,
            damage: None,
            defense: Some(50),
            magic: None,
            effect: Some(UseEffect::RaiseDefense {
                amount: 50,
                message: "You equip the scaled armor and feel invincible! Your defense increases by 50!",
            }),
        },
        Item {
            id: "crown",
            name: "Crown",
            description: "A magnificent crown fit for a king",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
        Item {
            id: "crystal",
            name: "Glowing Crystal",
            description: "A crystal that emits a soft glow",
            kind: ItemKind::Miscellaneous,
            damage: None,
            defense: None,
            magic: None,
            effect: None,
        },
    ];

    defs.into_iter().map(|item| (item.id, item)).collect()
}
