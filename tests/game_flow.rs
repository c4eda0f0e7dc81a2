//! Cross-engine integration tests: full dungeon walkthroughs exercising
//! navigation gates, inventory semantics, combat resolution and the win
//! condition together on one world.

mod common;

use common::temp_store;
use rand::rngs::StdRng;
use rand::SeedableRng;
use veilspire::animation::SilentAnimator;
use veilspire::game::{
    equip_item, move_player, run_combat, take_item, use_item, CombatOutcome, MoveOutcome, Player,
    WorldState,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(77)
}

/// A deliberately over-statted player so combat outcomes do not depend on
/// the random attack draws.
fn speedrun_player() -> Player {
    let mut player = Player::new();
    player.strength = 100;
    player.defense = 50;
    player
}

#[tokio::test]
async fn full_walkthrough_to_dragon_victory() {
    let animator = SilentAnimator;
    let mut world = WorldState::new();
    world.player = speedrun_player();
    let mut rng = rng();

    // start -> north, grab the key.
    assert_eq!(
        move_player(&mut world, &animator, "north", 15).await.unwrap(),
        MoveOutcome::Moved
    );
    take_item(&mut world, "Key").unwrap();

    // north -> west, open the chest for the map (key stays in inventory).
    move_player(&mut world, &animator, "west", 15).await.unwrap();
    take_item(&mut world, "Chest").unwrap();
    use_item(&mut world, &animator, "Chest").await.unwrap();
    assert!(world.player.has_item("map"));
    assert!(!world.player.has_item("chest"));

    // The treasure room door opens on key possession.
    assert_eq!(
        move_player(&mut world, &animator, "door", 15).await.unwrap(),
        MoveOutcome::Moved
    );
    assert_eq!(world.player.current_room, "treasure_room");
    take_item(&mut world, "Golden Sword").unwrap();
    use_item(&mut world, &animator, "Golden Sword").await.unwrap();
    let strength_after_use = world.player.strength;
    assert_eq!(strength_after_use, 100 + 32);

    // treasure room -> forest announces the goblin ahead.
    let outcome = move_player(&mut world, &animator, "north", 15).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::EnemyAhead { ref room_id, .. } if room_id == "forest"));

    // The timer path spawns and fights in the captured room.
    world.spawn_enemy("forest").unwrap();
    assert_eq!(
        run_combat(&mut world, &animator, &mut rng, "forest").await.unwrap(),
        CombatOutcome::EnemyDefeated
    );
    assert!(world.player.has_item("climbing_rope"));
    assert!(world.room("forest").unwrap().enemy_instance.is_none());

    // Gear up from the goblin loot.
    equip_item(&mut world, &animator, "Shield").await.unwrap();
    assert_eq!(world.player.defense, 50 + 20);

    // forest -> up needs the rope we just looted.
    let outcome = move_player(&mut world, &animator, "up", 15).await.unwrap();
    assert!(matches!(outcome, MoveOutcome::EnemyAhead { ref room_id, .. } if room_id == "mountain"));
    run_combat(&mut world, &animator, &mut rng, "mountain").await.unwrap();
    assert!(world.player.has_item("heavy_armor"));

    // mountain -> cave is ungated despite the locked flag; only the named
    // gates guard transitions.
    assert_eq!(
        move_player(&mut world, &animator, "south", 15).await.unwrap(),
        MoveOutcome::Moved
    );
    take_item(&mut world, "Dragon Scales").unwrap();
    use_item(&mut world, &animator, "Dragon Scales").await.unwrap();
    assert_eq!(world.player.defense, 70 + 150);
    assert_eq!(world.player.max_health, 350);

    // cave -> door into the lair, map still in hand.
    let outcome = move_player(&mut world, &animator, "door", 15).await.unwrap();
    assert!(
        matches!(outcome, MoveOutcome::EnemyAhead { ref room_id, .. } if room_id == "dragon_lair")
    );
    let outcome = run_combat(&mut world, &animator, &mut rng, "dragon_lair")
        .await
        .unwrap();
    assert_eq!(outcome, CombatOutcome::DragonSlain);

    assert!(world.player.has_won);
    assert_eq!(world.player.enemies_defeated, 3);
    assert_eq!(
        world.player.defeated_enemies,
        vec!["goblin", "troll", "dragon"]
    );
    for drop in ["dragon_heart", "scaled_armor", "ancient_tear"] {
        assert!(world.player.has_item(drop), "missing dragon drop {}", drop);
    }
}

#[tokio::test]
async fn treasure_room_is_sealed_without_the_key() {
    let animator = SilentAnimator;
    let mut world = WorldState::new();
    world.player.current_room = "west".to_string();

    assert_eq!(
        move_player(&mut world, &animator, "door", 15).await.unwrap(),
        MoveOutcome::Blocked
    );
    assert_eq!(world.player.current_room, "west");

    world.player.inventory.push("key".to_string());
    assert_eq!(
        move_player(&mut world, &animator, "door", 15).await.unwrap(),
        MoveOutcome::Moved
    );
    assert_eq!(world.player.current_room, "treasure_room");
}

#[tokio::test]
async fn delayed_encounter_fires_for_the_captured_room() {
    // The scheduled trigger keeps the room it was scheduled for: leaving
    // before it fires still resolves combat in that room.
    let animator = SilentAnimator;
    let mut world = WorldState::new();
    world.player = speedrun_player();
    world.player.current_room = "treasure_room".to_string();
    let mut rng = rng();

    let outcome = move_player(&mut world, &animator, "north", 15).await.unwrap();
    let captured_room = match outcome {
        MoveOutcome::EnemyAhead { room_id, .. } => room_id,
        other => panic!("expected EnemyAhead, got {:?}", other),
    };

    // Player retreats during the warning window.
    move_player(&mut world, &animator, "previous", 15).await.unwrap();
    assert_eq!(world.player.current_room, "treasure_room");

    // Timer fires regardless of the player's location.
    world.spawn_enemy(&captured_room).unwrap();
    let outcome = run_combat(&mut world, &animator, &mut rng, &captured_room)
        .await
        .unwrap();
    assert_eq!(outcome, CombatOutcome::EnemyDefeated);
    assert_eq!(world.player.current_room, "treasure_room");
    assert_eq!(world.player.defeated_enemies, vec!["goblin"]);
}

#[tokio::test]
async fn equip_stacking_survives_a_save_load_cycle() {
    // Stacked equip bonuses are plain player stats, so they persist.
    let (_dir, mut store) = temp_store();
    let animator = SilentAnimator;
    let mut world = WorldState::new();
    world.player.inventory.push("bow".to_string());
    world.player.inventory.push("small_dagger".to_string());

    equip_item(&mut world, &animator, "Bow").await.unwrap();
    equip_item(&mut world, &animator, "Small Dagger").await.unwrap();
    assert_eq!(world.player.strength, 1 + 10 + 12);

    let play_secs = 30;
    store.save(&mut world.player, play_secs).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded.strength, 23);
    assert_eq!(loaded.equipped_item.as_deref(), Some("small_dagger"));
}

#[tokio::test]
async fn drop_items_accumulate_without_dedup() {
    // Drops are appended verbatim: a looted shield lands next to the one
    // already carried instead of being deduplicated.
    let animator = SilentAnimator;
    let mut world = WorldState::new();
    world.player = speedrun_player();
    world.player.inventory.push("shield".to_string());
    let mut rng = rng();

    world.player.current_room = "forest".to_string();
    world.spawn_enemy("forest").unwrap();
    run_combat(&mut world, &animator, &mut rng, "forest").await.unwrap();

    // The goblin drops another shield; the inventory now holds both.
    let shields = world
        .player
        .inventory
        .iter()
        .filter(|i| *i == "shield")
        .count();
    assert_eq!(shields, 2);
}

#[tokio::test]
async fn dead_player_state_round_trips() {
    let (_dir, mut store) = temp_store();
    let mut world = WorldState::new();
    world.player.health = 0;
    world.player.is_dead = true;

    store.save(&mut world.player, 0).unwrap();
    let loaded = store.load().unwrap();
    assert!(loaded.is_dead);
    assert_eq!(loaded.health, 0);
}
