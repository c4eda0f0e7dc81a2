//! Game core: data model, catalog, engines and the session orchestrator.
//! The catalog and types are foundational; navigation, inventory and combat
//! mutate one shared [`world::WorldState`]; persistence snapshots the player
//! to a versioned JSON document; the session wires it all to the terminal.

pub mod catalog;
pub mod combat;
pub mod effects;
pub mod errors;
pub mod inventory;
pub mod navigation;
pub mod persistence;
pub mod session;
pub mod types;
pub mod world;

pub use catalog::{Catalog, PREVIOUS_DIRECTION, START_ROOM_ID};
pub use combat::{run_combat, select_attack, CombatOutcome};
pub use effects::apply_effect;
pub use errors::GameError;
pub use inventory::{equip_item, take_item, use_item, EquipOutcome, TakeOutcome, UseOutcome};
pub use navigation::{display_room, move_player, MoveOutcome};
pub use persistence::{compute_score, migrate_save, SaveStore};
pub use session::Session;
pub use types::{
    EnemyInstance, EnemyTemplate, Item, ItemKind, Player, Room, SaveDocument, Score,
    ScoreBreakdown, UseEffect, SAVE_VERSION,
};
pub use world::WorldState;
