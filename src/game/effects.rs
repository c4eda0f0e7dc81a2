//! Use-effect executor.
//!
//! Item behaviors are declared as [`UseEffect`] variants in the catalog and
//! interpreted here, so "what an item does" stays data while "how it is
//! done" stays in one audited place. The executor returns whether the item
//! was consumed by the use.

use log::debug;

use crate::game::errors::GameError;
use crate::game::types::UseEffect;
use crate::game::world::WorldState;

/// Apply a use-effect against the live world. Returns `true` when the used
/// item should be removed from the inventory.
pub fn apply_effect(world: &mut WorldState, effect: &UseEffect) -> Result<bool, GameError> {
    match effect {
        UseEffect::Heal { amount, message } => {
            println!("{}", message);
            let player = &mut world.player;
            player.health = (player.health + amount).min(player.max_health);
            Ok(true)
        }
        UseEffect::RaiseStrength { amount, message } => {
            println!("{}", message);
            world.player.strength += amount;
            Ok(false)
        }
        UseEffect::RaiseDefense { amount, message } => {
            println!("{}", message);
            world.player.defense += amount;
            Ok(false)
        }
        UseEffect::Fortify {
            defense,
            max_health,
            message,
        } => {
            println!("{}", message);
            let player = &mut world.player;
            player.defense += defense;
            player.max_health += max_health;
            player.health = (player.health + max_health).min(player.max_health);
            Ok(true)
        }
        UseEffect::UnlockRoom { room, message } => {
            println!("{}", message);
            debug!("unlocking room {}", room);
            world.room_mut(room)?.locked = false;
            Ok(true)
        }
        UseEffect::RevealPassage {
            room,
            description,
            unlock,
            message,
        } => {
            println!("{}", message);
            world.room_mut(room)?.description = description.to_string();
            world.room_mut(unlock)?.locked = false;
            Ok(true)
        }
        UseEffect::RewriteDescription {
            room,
            description,
            message,
            followup,
        } => {
            println!("{}", message);
            world.room_mut(room)?.description = description.to_string();
            if let Some(line) = followup {
                println!("{}", line);
            }
            Ok(false)
        }
        UseEffect::OpenChest {
            requires,
            grants,
            open_messages,
            locked_message,
        } => {
            if world.player.has_item(requires) {
                for line in open_messages {
                    println!("{}", line);
                }
                world.player.inventory.push(grants.to_string());
                Ok(true)
            } else {
                println!("{}", locked_message);
                Ok(false)
            }
        }
    }
}
