//! Navigation engine: directional movement over the static room graph,
//! gated (locked) transitions, and room display.

use log::debug;

use crate::animation::Animator;
use crate::game::catalog::PREVIOUS_DIRECTION;
use crate::game::errors::GameError;
use crate::game::world::WorldState;

/// A single gating predicate: a transition that requires an inventory item.
/// Keyed either by target room (`when_locked` gates) or by the
/// (current room, direction) pair.
struct Gate {
    /// Only applies while the target room is still locked.
    when_locked: bool,
    target: Option<&'static str>,
    from: Option<&'static str>,
    direction: Option<&'static str>,
    requires: &'static str,
    denial: &'static str,
}

/// Fixed gate set, checked in declaration order. The `start`+`west` entry is
/// unreachable through the shipped graph but stays part of the contract.
const GATES: &[Gate] = &[
    Gate {
        when_locked: true,
        target: Some("treasure_room"),
        from: None,
        direction: None,
        requires: "key",
        denial: "The treasure room is locked! Find a key.",
    },
    Gate {
        when_locked: true,
        target: Some("dragon_lair"),
        from: None,
        direction: None,
        requires: "map",
        denial: "You need the dragon map to enter the lair.",
    },
    Gate {
        when_locked: true,
        target: None,
        from: Some("forest"),
        direction: None,
        requires: "climbing_rope",
        denial: "You need ropes to go up the mountain.",
    },
    Gate {
        when_locked: false,
        target: None,
        from: Some("cave"),
        direction: Some("door"),
        requires: "map",
        denial: "You need the dragon map to enter the lair.",
    },
    Gate {
        when_locked: false,
        target: None,
        from: Some("forest"),
        direction: Some("up"),
        requires: "climbing_rope",
        denial: "You need ropes to go up the mountain.",
    },
    Gate {
        when_locked: false,
        target: None,
        from: Some("start"),
        direction: Some("west"),
        requires: "key",
        denial: "You need a key to enter this room.",
    },
];

/// Result of a movement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Moved into a room that declares an enemy; the caller schedules the
    /// delayed encounter for the carried room id.
    EnemyAhead { room_id: String, enemy_name: String },
    NoExit,
    Blocked,
}

/// First failing gate for a transition, if any.
pub(crate) fn gate_denial(
    world: &WorldState,
    current: &str,
    direction: &str,
    target: &str,
) -> Result<Option<&'static str>, GameError> {
    let target_locked = world.room(target)?.locked;
    for gate in GATES {
        if gate.when_locked && !target_locked {
            continue;
        }
        if let Some(t) = gate.target {
            if t != target {
                continue;
            }
        }
        if let Some(f) = gate.from {
            if f != current {
                continue;
            }
        }
        if let Some(d) = gate.direction {
            if d != direction {
                continue;
            }
        }
        if !world.player.has_item(gate.requires) {
            return Ok(Some(gate.denial));
        }
    }
    Ok(None)
}

/// Resolve a directional command against the room graph and, when every
/// gate passes, move the player and render the destination.
pub async fn move_player<A: Animator>(
    world: &mut WorldState,
    animator: &A,
    direction: &str,
    encounter_warn_secs: u64,
) -> Result<MoveOutcome, GameError> {
    let current = world.player.current_room.clone();

    let Some(target) = world.catalog.target_of(&current, direction) else {
        println!("You can't go that way!");
        return Ok(MoveOutcome::NoExit);
    };

    if let Some(denial) = gate_denial(world, &current, direction, target)? {
        println!("{}", denial);
        return Ok(MoveOutcome::Blocked);
    }

    // Scripted transition sequences for the showpiece routes.
    match (current.as_str(), direction) {
        ("west", "door") | ("cave", "door") => {
            animator.play_transition("door", 150).await;
        }
        ("forest", "up") => {
            animator.play_item_effect("climbing_rope", 150).await;
            animator.play_transition("up", 150).await;
            animator.play_environment("mountain_climb", 2, 150).await;
            animator.play_item_effect("climbing_confirmation", 150).await;
        }
        ("cave", PREVIOUS_DIRECTION) => {
            animator.play_transition("down", 150).await;
            animator.play_environment("mountain_descent", 2, 150).await;
            animator.play_item_effect("descending_confirmation", 150).await;
        }
        _ => {}
    }

    world.player.current_room = target.to_string();
    debug!("moved {} -> {} via {}", current, target, direction);

    animator
        .play_character_action("player", "walk", "green", 4, 150)
        .await;
    animator.play_transition(direction, 150).await;
    display_room(world, animator).await?;

    let destination = world.room(target)?;
    if let Some(enemy_id) = &destination.enemy {
        let enemy_name = world
            .catalog
            .enemy(enemy_id)
            .ok_or_else(|| GameError::UnknownEnemy(enemy_id.clone()))?
            .name
            .to_string();
        println!(
            "\nBEWARE {} LIES HERE!,\nYOU GOT {} SECONDS TO EQUIP YOUR GEAR !",
            enemy_name, encounter_warn_secs
        );
        return Ok(MoveOutcome::EnemyAhead {
            room_id: target.to_string(),
            enemy_name,
        });
    }

    Ok(MoveOutcome::Moved)
}

/// Render the current room: environment, description, exits, items, and any
/// lurking enemy.
pub async fn display_room<A: Animator>(
    world: &WorldState,
    animator: &A,
) -> Result<(), GameError> {
    let room = world.current_room()?;

    animator.play_environment(&room.name, 2, 150).await;

    println!("\nLocation: {}", room.name);
    println!("\n{}", room.description);
    if let Some(special) = &room.special {
        println!("{}", special);
    }

    let exits = world.catalog.exits(&room.id);
    if !exits.is_empty() {
        println!("\nAvailable Exits:");
        for (direction, _) in exits {
            println!("{}", direction);
        }
    }

    if !room.items.is_empty() {
        println!("\nItems here:");
        for item_id in &room.items {
            println!("- {}", world.catalog.item_name(item_id));
        }
    }

    if let Some(instance) = &room.enemy_instance {
        println!("\n! DANGER ! {} lurks here!", instance.name);
        println!("Enemy Health: {}", instance.health);
    }

    Ok(())
}
