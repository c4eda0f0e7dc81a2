//! Integration tests for the persistence layer: round-trips, schema
//! migration and failure handling against real files.

mod common;

use common::{temp_store, write_raw_save};
use veilspire::game::{GameError, Player, SAVE_VERSION};

#[test]
fn save_load_roundtrip_preserves_player_fields() {
    let (_dir, mut store) = temp_store();

    let mut player = Player::new();
    player.health = 42;
    player.inventory = vec!["key".to_string(), "torch".to_string()];
    player.enemies_defeated = 2;
    player.defeated_enemies = vec!["goblin".to_string(), "troll".to_string()];
    player.current_room = "cave".to_string();
    player.equipped_item = Some("small_dagger".to_string());

    store.save(&mut player, 90).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.health, 42);
    assert_eq!(loaded.inventory, vec!["key", "torch"]);
    assert_eq!(loaded.enemies_defeated, 2);
    assert_eq!(loaded.defeated_enemies, vec!["goblin", "troll"]);
    assert_eq!(loaded.current_room, "cave");
    assert_eq!(loaded.equipped_item.as_deref(), Some("small_dagger"));
    assert!(!loaded.has_won);
    assert!(!loaded.is_dead);
}

#[test]
fn save_document_is_versioned_camel_case_json() {
    let (dir, mut store) = temp_store();
    store.save(&mut Player::new(), 0).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("savegame.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["version"].as_f64(), Some(SAVE_VERSION));
    assert!(doc["timestamp"].is_string());
    let player = &doc["player"];
    assert!(player.get("maxHealth").is_some());
    assert!(player.get("currentRoom").is_some());
    assert!(player.get("score").is_some());
}

#[test]
fn save_recomputes_score_with_breakdown() {
    let (_dir, mut store) = temp_store();
    let mut player = Player::new();
    player.enemies_defeated = 3;
    player.inventory = vec!["key".to_string()];
    player.health = 80;

    store.save(&mut player, 2 * 60).unwrap();
    let score = player.score.expect("score stamped onto player");
    assert_eq!(score.breakdown.enemies, 300);
    assert_eq!(score.breakdown.inventory, 50);
    assert_eq!(score.breakdown.health_bonus, 80);
    assert_eq!(score.breakdown.time_bonus, 498);
    assert_eq!(score.total, 300 + 50 + 80 + 498);
}

#[test]
fn legacy_version_backfills_score_without_time_bonus() {
    let (dir, _keep) = temp_store();
    write_raw_save(
        &dir,
        r#"{
            "version": 1.0,
            "timestamp": "2023-01-15T12:00:00Z",
            "player": {
                "health": 42,
                "inventory": ["key", "torch"],
                "enemiesDefeated": 2,
                "currentRoom": "forest",
                "score": 17
            }
        }"#,
    );
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));
    let player = store.load().unwrap();
    let score = player.score.unwrap();
    assert_eq!(score.total, 2 * 100 + 2 * 50 + 42);
    assert_eq!(score.breakdown.time_bonus, 0);
}

#[test]
fn sparse_legacy_save_gets_defaults_and_score() {
    let (dir, _keep) = temp_store();
    write_raw_save(
        &dir,
        r#"{"version": 1.0, "player": {"currentRoom": "start"}}"#,
    );
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));
    let player = store.load().unwrap();
    assert_eq!(player.max_health, 100);
    assert_eq!(player.strength, 1);
    // Legacy score: 0 enemies + 0 items + default health backfilled... the
    // migration sees the raw document, where health is absent, so the
    // legacy health addend is zero.
    assert_eq!(player.score.unwrap().total, 0);
}

#[test]
fn malformed_json_is_a_load_failure() {
    let (dir, _keep) = temp_store();
    write_raw_save(&dir, "{ this is not json");
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));
    assert!(matches!(store.load(), Err(GameError::Json(_))));
}

#[test]
fn missing_current_room_is_a_load_failure() {
    let (dir, _keep) = temp_store();
    write_raw_save(
        &dir,
        r#"{"version": 1.1, "timestamp": "2024-01-01T00:00:00Z", "player": {"health": 10}}"#,
    );
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));
    assert!(matches!(store.load(), Err(GameError::InvalidSave(_))));
}

#[test]
fn load_failure_leaves_live_player_untouched() {
    let (dir, _keep) = temp_store();
    write_raw_save(&dir, "corrupt");
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));

    let mut world = veilspire::game::WorldState::new();
    world.player.health = 77;
    if let Ok(player) = store.load() {
        world.reset_with(player);
    }
    assert_eq!(world.player.health, 77);
}

#[test]
fn future_version_is_a_migration_failure() {
    let (dir, _keep) = temp_store();
    write_raw_save(
        &dir,
        r#"{"version": 9.0, "player": {"currentRoom": "start"}}"#,
    );
    let store = veilspire::game::SaveStore::new(Some(dir.path().to_path_buf()));
    assert!(matches!(
        store.load(),
        Err(GameError::MigrationUnsupported { .. })
    ));
}

#[test]
fn repeated_saves_overwrite_one_document() {
    let (dir, mut store) = temp_store();
    let mut player = Player::new();
    store.save(&mut player, 0).unwrap();
    player.health = 5;
    store.save(&mut player, 0).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".json"))
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(store.load().unwrap().health, 5);
}
