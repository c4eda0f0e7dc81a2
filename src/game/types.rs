use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current save document schema version. Documents below this version are
/// migrated on load; see `persistence::migrate_save`.
pub const SAVE_VERSION: f64 = 1.1;

/// Broad item categories. Weapon-like kinds can be equipped; `Healing`,
/// `Utility` and `Miscellaneous` items can only be used (or carried).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Dagger,
    Axe,
    Bow,
    Staff,
    Shield,
    Armor,
    Healing,
    Utility,
    Miscellaneous,
}

impl ItemKind {
    /// Whether `equip` accepts this kind at all.
    pub fn is_equippable(self) -> bool {
        !matches!(self, ItemKind::Healing | ItemKind::Miscellaneous)
    }

    /// Animation key for the equip sequence; unmapped kinds fall back to a
    /// generic animation chosen by the caller.
    pub fn animation_key(self) -> Option<&'static str> {
        match self {
            ItemKind::Dagger => Some("dagger"),
            ItemKind::Axe => Some("axe"),
            ItemKind::Bow => Some("bow"),
            ItemKind::Staff => Some("staff"),
            ItemKind::Shield => Some("shield"),
            ItemKind::Armor => Some("armor"),
            _ => None,
        }
    }
}

/// Declarative use-effect, interpreted by `effects::apply_effect`.
///
/// Each variant decides for itself whether the item is consumed, mirroring
/// the per-item consumption policy of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum UseEffect {
    /// Restore health, clamped to `max_health`. Consumed.
    Heal { amount: i32, message: &'static str },
    /// Permanently raise strength. Not consumed.
    RaiseStrength { amount: i32, message: &'static str },
    /// Permanently raise defense. Not consumed.
    RaiseDefense { amount: i32, message: &'static str },
    /// Raise defense and maximum health together, healing by the max-health
    /// increase. Consumed.
    Fortify {
        defense: i32,
        max_health: i32,
        message: &'static str,
    },
    /// Clear the `locked` flag on a room. Consumed.
    UnlockRoom {
        room: &'static str,
        message: &'static str,
    },
    /// Rewrite a room description and unlock another room. Consumed.
    RevealPassage {
        room: &'static str,
        description: &'static str,
        unlock: &'static str,
        message: &'static str,
    },
    /// Rewrite a room description only. Not consumed.
    RewriteDescription {
        room: &'static str,
        description: &'static str,
        message: &'static str,
        followup: Option<&'static str>,
    },
    /// Grant `grants` if `requires` is held, consuming the container;
    /// otherwise report it locked and keep it.
    OpenChest {
        requires: &'static str,
        grants: &'static str,
        open_messages: [&'static str; 2],
        locked_message: &'static str,
    },
}

/// Immutable item blueprint from the catalog.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ItemKind,
    pub damage: Option<i32>,
    pub defense: Option<i32>,
    pub magic: Option<i32>,
    pub effect: Option<UseEffect>,
}

/// Immutable enemy blueprint. `behavior` keeps declaration order because the
/// weighted attack draw walks it cumulatively.
#[derive(Debug, Clone)]
pub struct EnemyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub health: i32,
    pub damage: i32,
    pub defense: i32,
    pub behavior: Vec<(&'static str, u32)>,
    pub attacks: HashMap<&'static str, f64>,
    pub drop_items: Vec<&'static str>,
}

/// Per-encounter mutable copy of an [`EnemyTemplate`].
///
/// Created lazily the first time a room needs one; destroyed when the
/// encounter resolves. Mutating it never touches the shared template.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyInstance {
    pub template_id: String,
    pub name: String,
    pub health: i32,
    pub damage: i32,
    pub defense: i32,
    pub behavior: Vec<(String, u32)>,
    pub attacks: HashMap<String, f64>,
    pub drop_items: Vec<String>,
}

impl EnemyInstance {
    /// Structural deep copy of the template into a fresh instance record.
    pub fn from_template(template: &EnemyTemplate) -> Self {
        Self {
            template_id: template.id.to_string(),
            name: template.name.to_string(),
            health: template.health,
            damage: template.damage,
            defense: template.defense,
            behavior: template
                .behavior
                .iter()
                .map(|(attack, weight)| (attack.to_string(), *weight))
                .collect(),
            attacks: template
                .attacks
                .iter()
                .map(|(attack, mult)| (attack.to_string(), *mult))
                .collect(),
            drop_items: template.drop_items.iter().map(|i| i.to_string()).collect(),
        }
    }
}

/// A node in the dungeon graph. `items`, `enemy_instance`, `locked` and
/// `description` are the only fields mutated during play.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: String,
    pub items: Vec<String>,
    pub enemy: Option<String>,
    pub enemy_instance: Option<EnemyInstance>,
    pub locked: bool,
    pub special: Option<String>,
}

/// Additive score components persisted alongside the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub enemies: i64,
    pub inventory: i64,
    pub health_bonus: i64,
    pub time_bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub total: i64,
    pub breakdown: ScoreBreakdown,
}

fn default_max_health() -> i32 {
    100
}

fn default_strength() -> i32 {
    1
}

fn default_start_room() -> String {
    crate::game::catalog::START_ROOM_ID.to_string()
}

/// The live player record; single source of truth for session progress.
///
/// Every field carries a serde default so loading an older save backfills
/// missing fields from fresh-player defaults without overwriting anything
/// the document supplies. Field names stay camelCase on disk for
/// compatibility with pre-existing save files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default = "default_max_health")]
    pub max_health: i32,
    #[serde(default = "default_max_health")]
    pub health: i32,
    #[serde(default = "default_strength")]
    pub strength: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub magic_power: i32,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub defeated_enemies: Vec<String>,
    #[serde(default)]
    pub enemies_defeated: u32,
    #[serde(default = "default_start_room")]
    pub current_room: String,
    #[serde(default)]
    pub has_won: bool,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub equipped_item: Option<String>,
    #[serde(default)]
    pub equipped_armor: Option<String>,
    #[serde(default)]
    pub score: Option<Score>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            max_health: default_max_health(),
            health: default_max_health(),
            strength: default_strength(),
            defense: 0,
            magic_power: 0,
            inventory: Vec::new(),
            defeated_enemies: Vec::new(),
            enemies_defeated: 0,
            current_room: default_start_room(),
            has_won: false,
            is_dead: false,
            equipped_item: None,
            equipped_armor: None,
            score: None,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|i| i == item_id)
    }
}

/// On-disk save document: schema version, timestamp, full player snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: f64,
    pub timestamp: DateTime<Utc>,
    pub player: Player,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new();
        assert_eq!(player.max_health, 100);
        assert_eq!(player.health, 100);
        assert_eq!(player.strength, 1);
        assert_eq!(player.defense, 0);
        assert_eq!(player.current_room, "start");
        assert!(player.inventory.is_empty());
        assert!(!player.has_won);
        assert!(!player.is_dead);
        assert!(player.score.is_none());
    }

    #[test]
    fn test_player_missing_fields_backfilled() {
        // A sparse document only carries what an old save wrote; everything
        // else must come back as fresh-player defaults.
        let player: Player =
            serde_json::from_str(r#"{"health": 42, "currentRoom": "forest"}"#).unwrap();
        assert_eq!(player.health, 42);
        assert_eq!(player.current_room, "forest");
        assert_eq!(player.max_health, 100);
        assert_eq!(player.strength, 1);
        assert!(!player.has_won);
        assert!(!player.is_dead);
    }

    #[test]
    fn test_player_roundtrip_uses_camel_case() {
        let player = Player::new();
        let json = serde_json::to_string(&player).unwrap();
        assert!(json.contains("maxHealth"));
        assert!(json.contains("currentRoom"));
        assert!(json.contains("enemiesDefeated"));
        assert!(json.contains("equippedArmor"));
        assert!(!json.contains("max_health"));
    }

    #[test]
    fn test_instance_is_independent_of_template() {
        let template = EnemyTemplate {
            id: "goblin",
            name: "Forest Goblin",
            health: 100,
            damage: 10,
            defense: 0,
            behavior: vec![("basic", 3)],
            attacks: HashMap::from([("basic", 1.0)]),
            drop_items: vec!["shield"],
        };
        let mut instance = EnemyInstance::from_template(&template);
        instance.health = 1;
        assert_eq!(template.health, 100);
        assert_eq!(instance.name, "Forest Goblin");
        assert_eq!(instance.drop_items, vec!["shield".to_string()]);
    }

    #[test]
    fn test_kind_equippability() {
        assert!(ItemKind::Dagger.is_equippable());
        assert!(ItemKind::Shield.is_equippable());
        assert!(ItemKind::Utility.is_equippable());
        assert!(!ItemKind::Healing.is_equippable());
        assert!(!ItemKind::Miscellaneous.is_equippable());
    }
}
