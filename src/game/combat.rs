//! Combat engine: the per-encounter state machine.
//!
//! An encounter runs `Fighting` rounds while both sides have health, then
//! resolves to victory or defeat. Each round the player strikes first; a
//! kill breaks the round before the enemy retaliates. Enemy attacks are
//! drawn by weighted random over the template's behavior table, walked in
//! declaration order.

use log::{debug, warn};
use rand::Rng;

use crate::animation::Animator;
use crate::game::errors::GameError;
use crate::game::world::WorldState;

/// How an encounter resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatOutcome {
    /// Player health reached zero; the session routes to game-end handling.
    PlayerDefeated,
    /// Enemy defeated, loot granted, room cleared.
    EnemyDefeated,
    /// The dragon fell: `has_won` is set and the finale has played.
    DragonSlain,
    /// Nothing to fight in that room.
    NoEnemy,
}

/// Weighted draw over a behavior table: uniform value in `[0, total)`,
/// first entry whose weight exceeds the remaining draw wins. Falls back to
/// `basic` for empty or exhausted tables.
pub fn select_attack<R: Rng>(rng: &mut R, behavior: &[(String, u32)]) -> String {
    let total: u32 = behavior.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return "basic".to_string();
    }
    let mut draw = rng.gen_range(0.0..total as f64);
    for (attack, weight) in behavior {
        if draw < *weight as f64 {
            return attack.clone();
        }
        draw -= *weight as f64;
    }
    "basic".to_string()
}

fn attack_flavor(attack: &str) -> &'static str {
    match attack {
        "fireBreath" => "The dragon unleashes fiery hell!",
        "tailSwipe" => "The dragon's tail smashes into you!",
        "rockThrow" => "The troll hurls a massive boulder!",
        _ => "The enemy attacks!",
    }
}

/// Run one encounter in `room_id`, spawning the enemy instance if it does
/// not exist yet (direct-entry path; the timed path spawns before calling).
pub async fn run_combat<A: Animator, R: Rng>(
    world: &mut WorldState,
    animator: &A,
    rng: &mut R,
    room_id: &str,
) -> Result<CombatOutcome, GameError> {
    if !world.spawn_enemy(room_id)? {
        warn!("combat requested for {} which has no enemy", room_id);
        return Ok(CombatOutcome::NoEnemy);
    }

    let (enemy_id, enemy_alive) = {
        let instance = world
            .room(room_id)?
            .enemy_instance
            .as_ref()
            .expect("spawn_enemy guaranteed an instance");
        (instance.template_id.clone(), instance.health > 0)
    };
    if !enemy_alive {
        debug!("enemy in {} already at zero health; skipping", room_id);
        return Ok(CombatOutcome::NoEnemy);
    }

    println!(
        "{}",
        animator.render_health_bar(world.player.health, world.player.max_health, 20)
    );
    if enemy_id == "dragon" {
        animator.play_cutscene("dragon_intro").await;
    }

    loop {
        let (enemy_name, enemy_defense, enemy_damage_base, behavior, attacks) = {
            let instance = world
                .room(room_id)?
                .enemy_instance
                .as_ref()
                .expect("instance present while fighting");
            (
                instance.name.clone(),
                instance.defense,
                instance.damage,
                instance.behavior.clone(),
                instance.attacks.clone(),
            )
        };

        // Player strikes first.
        let player_damage = (world.player.strength - enemy_defense).max(1);
        let enemy_health = {
            let instance = world
                .room_mut(room_id)?
                .enemy_instance
                .as_mut()
                .expect("instance present while fighting");
            instance.health = (instance.health - player_damage).max(0);
            instance.health
        };

        let weapon = if world.player.equipped_item.is_some() {
            "sword"
        } else {
            "attack"
        };
        animator
            .play_battle_round(weapon, &enemy_id, world.player.health, enemy_health)
            .await;
        println!("You hit the {} for {} damage!", enemy_name, player_damage);
        animator.play_damage_popup(player_damage).await;

        // No retaliation on the killing round.
        if enemy_health <= 0 {
            break;
        }

        let attack = select_attack(rng, &behavior);
        let multiplier = attacks.get(&attack).copied().unwrap_or(1.0);
        let enemy_damage =
            ((enemy_damage_base as f64 * multiplier) - world.player.defense as f64).max(1.0) as i32;

        world.player.health = (world.player.health - enemy_damage).max(0);
        println!("{} hits you for {} damage!", enemy_name, enemy_damage);
        animator.play_damage_popup(enemy_damage).await;

        if world.player.health <= 0 {
            break;
        }

        println!("{}", attack_flavor(&attack));
    }

    if world.player.health == 0 {
        debug!("player defeated by {} in {}", enemy_id, room_id);
        return Ok(CombatOutcome::PlayerDefeated);
    }

    handle_enemy_defeat(world, animator, room_id).await
}

/// Defeat processing: loot, counters, room cleanup, and the dragon finale.
async fn handle_enemy_defeat<A: Animator>(
    world: &mut WorldState,
    animator: &A,
    room_id: &str,
) -> Result<CombatOutcome, GameError> {
    let defeated = {
        let room = world.room(room_id)?;
        room.enemy_instance
            .as_ref()
            .filter(|instance| instance.health <= 0)
            .cloned()
    };
    let Some(instance) = defeated else {
        println!("No defeated enemy to process!");
        return Ok(CombatOutcome::NoEnemy);
    };

    println!("\nYou defeated the {}!", instance.name);
    animator.play_victory(&instance.template_id).await;

    if !instance.drop_items.is_empty() {
        // Drops are appended verbatim: order preserved, no dedup.
        world
            .player
            .inventory
            .extend(instance.drop_items.iter().cloned());
        println!("Loot obtained:\n- {}", instance.drop_items.join("\n- "));
        println!(
            "player Health: {}/{}",
            world.player.health, world.player.max_health
        );
    }

    world.player.enemies_defeated += 1;
    world
        .player
        .defeated_enemies
        .push(instance.template_id.clone());
    world.room_mut(room_id)?.enemy_instance = None;
    debug!(
        "{} defeated in {} (total {})",
        instance.template_id, room_id, world.player.enemies_defeated
    );

    if instance.template_id.to_lowercase().contains("dragon") {
        world.player.has_won = true;
        println!("\nDRAGON VANQUISHED! The realm is saved!");
        animator.play_final_victory().await;
        return Ok(CombatOutcome::DragonSlain);
    }

    if world.all_enemies_defeated() {
        println!("\nALL ENEMIES DEFEATED! Peace reigns!");
    }

    Ok(CombatOutcome::EnemyDefeated)
}
