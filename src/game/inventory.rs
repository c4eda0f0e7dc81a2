//! Inventory engine: take, equip and use semantics.
//!
//! Item arguments arrive as free text and resolve case-insensitively against
//! catalog display names through the precomputed index. All user-visible
//! failure messages are printed here; callers branch on the returned outcome
//! only when they need to.

use log::debug;

use crate::animation::Animator;
use crate::game::effects::apply_effect;
use crate::game::errors::GameError;
use crate::game::types::ItemKind;
use crate::game::world::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeOutcome {
    Taken,
    UnknownItem,
    NotHere,
    AlreadyHeld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipOutcome {
    Equipped,
    UnknownItem,
    NotOwned,
    AlreadyEquipped,
    NotEquippable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    Used { consumed: bool },
    NotUsable,
    UnknownItem,
    NotOwned,
}

/// Pick up an item from the current room by display name.
pub fn take_item(world: &mut WorldState, name: &str) -> Result<TakeOutcome, GameError> {
    let Some(item) = world.catalog.resolve_item_name(name) else {
        println!("There is no such item here!");
        return Ok(TakeOutcome::UnknownItem);
    };
    let (item_id, item_name, item_desc) = (item.id, item.name, item.description);

    let room_id = world.player.current_room.clone();
    if !world.room(&room_id)?.items.iter().any(|i| i == item_id) {
        println!("There is no such item here!");
        return Ok(TakeOutcome::NotHere);
    }

    if world.player.has_item(item_id) {
        println!("You already have {} in your inventory!", item_name);
        return Ok(TakeOutcome::AlreadyHeld);
    }

    world.room_mut(&room_id)?.items.retain(|i| i != item_id);
    world.player.inventory.push(item_id.to_string());
    debug!("took {} in {}", item_id, room_id);
    println!("You picked up {}!\n{}", item_name, item_desc);
    Ok(TakeOutcome::Taken)
}

/// Equip a weapon, shield or armor piece from the inventory.
///
/// Stat deltas are additive and deliberately non-reversible: equipping a
/// second weapon stacks its bonus on top of the first instead of replacing
/// it. Healing and miscellaneous items are rejected before any delta is
/// applied.
pub async fn equip_item<A: Animator>(
    world: &mut WorldState,
    animator: &A,
    name: &str,
) -> Result<EquipOutcome, GameError> {
    let Some(item) = world.catalog.resolve_item_name(name) else {
        println!("No such item: {}", name);
        return Ok(EquipOutcome::UnknownItem);
    };
    let item = item.clone();

    if !world.player.has_item(item.id) {
        println!("You don't have {} in your inventory!", item.name);
        return Ok(EquipOutcome::NotOwned);
    }

    let already_weapon = world.player.equipped_item.as_deref() == Some(item.id);
    let already_armor = world.player.equipped_armor.as_deref() == Some(item.id);
    if already_weapon || already_armor {
        println!("{} is already equipped", item.name);
        return Ok(EquipOutcome::AlreadyEquipped);
    }

    if !item.kind.is_equippable() {
        println!(
            "You can't equip {}, maybe try using it instead",
            item.name
        );
        return Ok(EquipOutcome::NotEquippable);
    }

    // Animate by weapon category, falling back to the item's own key.
    let anim_key = item.kind.animation_key().unwrap_or(item.id);
    animator.play_item_effect(anim_key, 150).await;

    if let Some(damage) = item.damage {
        world.player.equipped_item = Some(item.id.to_string());
        world.player.strength += damage;
        println!("Equipped {} (+{} damage)", item.name, damage);
    }
    if let Some(magic) = item.magic {
        world.player.magic_power += magic;
        println!("Equipped {} (+{} magic)", item.name, magic);
    }
    if matches!(item.kind, ItemKind::Shield | ItemKind::Armor) {
        let defense = item.defense.unwrap_or(0);
        world.player.equipped_armor = Some(item.id.to_string());
        world.player.defense += defense;
        println!("Equipped {} (+{} defense)", item.name, defense);
    }

    debug!("equipped {}", item.id);
    Ok(EquipOutcome::Equipped)
}

/// Use an item from the inventory, running its declared effect.
pub async fn use_item<A: Animator>(
    world: &mut WorldState,
    animator: &A,
    name: &str,
) -> Result<UseOutcome, GameError> {
    let Some(item) = world.catalog.resolve_item_name(name) else {
        println!(
            "No such item: {}, try rechecking your spelling or remove _",
            name
        );
        return Ok(UseOutcome::UnknownItem);
    };
    let item = item.clone();

    if !world.player.has_item(item.id) {
        println!("You don't have {} in your inventory!", item.name);
        return Ok(UseOutcome::NotOwned);
    }

    // The flourish plays before we know whether anything happens, exactly
    // like the original game.
    animator.play_item_effect(item.id, 150).await;

    let Some(effect) = &item.effect else {
        println!("{} is not useable", item.name);
        return Ok(UseOutcome::NotUsable);
    };

    let consumed = apply_effect(world, effect)?;
    if consumed {
        world.player.inventory.retain(|i| i != item.id);
        println!("{} was consumed!", item.name);
    }
    debug!("used {} (consumed: {})", item.id, consumed);
    Ok(UseOutcome::Used { consumed })
}
