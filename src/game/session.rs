//! Session orchestrator: wires the engines into a command dispatch loop and
//! the game lifecycle (main menu, game session, autosave, game end).
//!
//! One logical thread of control: stdin lines, the autosave interval and
//! delayed encounter timers are independent tokio tasks funneled into a
//! single select loop, interleaving only at await points. A scheduled
//! encounter carries the room id captured at schedule time and fires for
//! that room regardless of where the player is by then; leaving the room
//! does not cancel it.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Duration};

use crate::animation::Animator;
use crate::config::Config;
use crate::game::combat::{run_combat, CombatOutcome};
use crate::game::errors::GameError;
use crate::game::inventory::{equip_item, take_item, use_item};
use crate::game::navigation::{display_room, move_player, MoveOutcome};
use crate::game::persistence::SaveStore;
use crate::game::types::Player;
use crate::game::world::WorldState;

/// Deferred encounter token, captured when the player enters an enemy room.
#[derive(Debug, Clone)]
struct PendingEncounter {
    room_id: String,
}

/// What the select loop observed this iteration.
enum SessionEvent {
    Line(Option<String>),
    Encounter(PendingEncounter),
    AutosaveTick,
}

/// Where control goes after a dispatched command or a game-end screen.
enum Flow {
    Continue,
    ToMenu,
    Restart,
}

enum MenuChoice {
    NewGame,
    Continue,
    Settings,
    Quit,
    Unknown,
}

pub struct Session<A: Animator> {
    config: Config,
    store: SaveStore,
    world: WorldState,
    animator: A,
    rng: StdRng,
}

impl<A: Animator> Session<A> {
    pub fn new(config: Config, animator: A) -> Self {
        let store = SaveStore::new(config.save.dir.clone().map(PathBuf::from));
        Self {
            config,
            store,
            world: WorldState::new(),
            animator,
            rng: StdRng::from_entropy(),
        }
    }

    /// Run the whole program lifecycle. Only returns on process exit paths
    /// that choose not to exit directly (never, in practice).
    pub async fn run(&mut self) -> Result<()> {
        // Single background reader feeding every prompt and the game loop.
        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
        tokio::spawn(async move {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut lines = stdin.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            match self.main_menu(&mut line_rx).await {
                Ok(()) => {}
                Err(e) => {
                    error!("main menu failed: {:#}", e);
                    println!("Failed to load main menu. Returning in 5 seconds...");
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    async fn main_menu(&mut self, lines: &mut mpsc::UnboundedReceiver<String>) -> Result<()> {
        self.animator.play_title_screen().await;

        let mut highest = self.store.peek_high_score();
        if let Some(score) = &self.world.player.score {
            highest = highest.max(score.total);
        }

        let has_save = self.store.exists();
        println!("\nWelcome to Veilspire: Shattered Legacy");
        println!("1) Start a new game");
        if has_save {
            println!("2) Continue Journey");
        }
        println!("3) Settings");
        println!("4) Quit");
        println!("---- Highest Score: {} ----", highest);

        match read_menu_choice(lines).await {
            MenuChoice::NewGame => {
                info!("starting new game");
                self.world.reset_with(Player::new());
                self.game_session(lines).await?;
            }
            MenuChoice::Continue => match self.store.load() {
                Ok(player) => {
                    info!("journey resumed from {}", self.store.path().display());
                    println!("\nJourney resumed!");
                    self.world.reset_with(player);
                    self.game_session(lines).await?;
                }
                Err(e) => {
                    warn!("load failed: {}", e);
                    println!("\nNo save available. Start new game...");
                    sleep(Duration::from_secs(2)).await;
                }
            },
            MenuChoice::Settings => {
                println!("Coming soon! :)");
                sleep(Duration::from_secs(2)).await;
            }
            MenuChoice::Quit => {
                self.handle_game_exit().await;
            }
            MenuChoice::Unknown => {
                println!("Pick an option by number.");
            }
        }
        Ok(())
    }

    /// One game session: welcome, command loop, timers. Returns when the
    /// player goes back to the menu (directly or through a game-end screen).
    async fn game_session(&mut self, lines: &mut mpsc::UnboundedReceiver<String>) -> Result<()> {
        println!("=======================================================");
        println!("       Welcome To Veilspire: Shattered Legacy       ");
        println!("=======================================================");
        println!("You find yourself in a mysterious dungeon. Explore, find treasures, and defeat the ancient dragon!");
        self.display_help();
        display_room(&self.world, &self.animator).await?;

        let (spawn_tx, mut spawn_rx) = mpsc::unbounded_channel::<PendingEncounter>();
        let mut autosave = interval(Duration::from_secs(
            self.config.game.autosave_interval_secs.max(1),
        ));
        autosave.tick().await; // the first tick fires immediately; skip it

        loop {
            let event = tokio::select! {
                line = lines.recv() => SessionEvent::Line(line),
                Some(encounter) = spawn_rx.recv() => SessionEvent::Encounter(encounter),
                _ = autosave.tick() => SessionEvent::AutosaveTick,
            };

            match event {
                SessionEvent::Line(None) => {
                    // stdin closed; save and leave like a quiet quit.
                    info!("input stream closed; saving and exiting");
                    self.save_game();
                    process::exit(0);
                }
                SessionEvent::Line(Some(line)) => {
                    match self.dispatch_command(&line, lines, &spawn_tx).await {
                        Flow::Continue => {}
                        Flow::ToMenu => return Ok(()),
                        Flow::Restart => {
                            display_room(&self.world, &self.animator).await?;
                        }
                    }
                }
                SessionEvent::Encounter(encounter) => {
                    match self.handle_encounter(encounter, lines).await {
                        Flow::Continue => {}
                        Flow::ToMenu => return Ok(()),
                        Flow::Restart => {
                            display_room(&self.world, &self.animator).await?;
                        }
                    }
                }
                SessionEvent::AutosaveTick => {
                    if self.world.player.has_won || self.world.player.is_dead {
                        debug!("autosave suppressed after game end");
                        continue;
                    }
                    println!("\nAuto-saving...");
                    self.save_game();
                }
            }
        }
    }

    /// Parse and dispatch one command line. Engine failures are caught here:
    /// logged, reported, and treated as a no-op for that command.
    async fn dispatch_command(
        &mut self,
        input: &str,
        lines: &mut mpsc::UnboundedReceiver<String>,
        spawn_tx: &mpsc::UnboundedSender<PendingEncounter>,
    ) -> Flow {
        // A finished game stays finished no matter what comes in.
        if self.world.player.has_won || self.world.player.is_dead {
            return self.handle_game_end(lines).await;
        }

        let lowered = input.to_lowercase();
        let mut parts = lowered.split_whitespace();
        let Some(verb) = parts.next() else {
            return Flow::Continue;
        };
        let target = parts.collect::<Vec<_>>().join(" ");
        debug!("command: {} {:?}", verb, target);

        let result: Result<Flow, GameError> = match verb {
            "go" => {
                match move_player(
                    &mut self.world,
                    &self.animator,
                    &target,
                    self.config.game.spawn_delay_secs,
                )
                .await
                {
                    Ok(MoveOutcome::EnemyAhead { room_id, .. }) => {
                        self.schedule_encounter(spawn_tx, room_id);
                        Ok(Flow::Continue)
                    }
                    Ok(_) => Ok(Flow::Continue),
                    Err(e) => Err(e),
                }
            }
            "take" => take_item(&mut self.world, &target).map(|_| Flow::Continue),
            "use" => use_item(&mut self.world, &self.animator, &target)
                .await
                .map(|_| Flow::Continue),
            "equip" => equip_item(&mut self.world, &self.animator, &target)
                .await
                .map(|_| Flow::Continue),
            "inventory" => {
                self.display_inventory();
                Ok(Flow::Continue)
            }
            "look" => display_room(&self.world, &self.animator)
                .await
                .map(|_| Flow::Continue),
            "status" => {
                self.display_status();
                Ok(Flow::Continue)
            }
            "help" => {
                self.display_help();
                Ok(Flow::Continue)
            }
            "menu" => {
                self.save_game();
                Ok(Flow::ToMenu)
            }
            "quit" => {
                self.handle_game_exit().await;
                Ok(Flow::Continue) // unreachable; exit above
            }
            _ => {
                println!(
                    "Invalid command. Try: go, take, use, equip, inventory, look, status, menu, quit"
                );
                Ok(Flow::Continue)
            }
        };

        match result {
            Ok(flow) => flow,
            Err(e) => {
                error!("command '{}' failed: {}", verb, e);
                println!("Something went wrong with that command.");
                Flow::Continue
            }
        }
    }

    /// Spawn the deferred encounter task for a room the player just entered.
    fn schedule_encounter(
        &self,
        spawn_tx: &mpsc::UnboundedSender<PendingEncounter>,
        room_id: String,
    ) {
        let delay = Duration::from_secs(self.config.game.spawn_delay_secs);
        let tx = spawn_tx.clone();
        debug!("encounter scheduled for {} in {:?}", room_id, delay);
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(PendingEncounter { room_id });
        });
    }

    /// A deferred encounter fired: spawn the instance and enter combat for
    /// the captured room.
    async fn handle_encounter(
        &mut self,
        encounter: PendingEncounter,
        lines: &mut mpsc::UnboundedReceiver<String>,
    ) -> Flow {
        if self.world.player.has_won || self.world.player.is_dead {
            debug!("encounter for {} ignored after game end", encounter.room_id);
            return Flow::Continue;
        }

        info!("encounter fires for {}", encounter.room_id);
        let outcome = match run_combat(
            &mut self.world,
            &self.animator,
            &mut self.rng,
            &encounter.room_id,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("combat failed in {}: {}", encounter.room_id, e);
                println!("Something went wrong during the fight.");
                return Flow::Continue;
            }
        };

        match outcome {
            CombatOutcome::PlayerDefeated => self.handle_game_end(lines).await,
            CombatOutcome::DragonSlain => {
                self.save_game();
                self.restart_prompt(lines).await
            }
            CombatOutcome::EnemyDefeated | CombatOutcome::NoEnemy => Flow::Continue,
        }
    }

    /// Game-end handling: persist, mark death, show the end screen, and let
    /// the player choose what happens next. Any failure inside routes to the
    /// force-exit path.
    async fn handle_game_end(&mut self, lines: &mut mpsc::UnboundedReceiver<String>) -> Flow {
        // Save first, as every end path has always done; the death flag is
        // set afterwards and only lives in memory.
        self.save_game();

        if self.world.player.is_dead {
            return self.restart_prompt(lines).await;
        }

        if self.world.player.health == 0 {
            self.world.player.is_dead = true;
            println!("\nYou have been defeated...");
            self.animator.play_defeat().await;
            println!(
                "Final Score: {}",
                self.world
                    .player
                    .score
                    .as_ref()
                    .map(|s| s.total)
                    .unwrap_or(0)
            );
            return self.restart_prompt(lines).await;
        }

        if self.world.all_enemies_defeated() {
            println!("\nAll enemies vanquished! Peace restored!");
            println!(
                "Final Score: {}",
                self.world
                    .player
                    .score
                    .as_ref()
                    .map(|s| s.total)
                    .unwrap_or(0)
            );
        }
        Flow::ToMenu
    }

    /// "Game over" menu. Restart is only offered to the dead.
    async fn restart_prompt(&mut self, lines: &mut mpsc::UnboundedReceiver<String>) -> Flow {
        println!("\nGame over! What do you want to do?");
        let restartable = self.world.player.is_dead;
        if restartable {
            println!("1) Restart from last save");
            println!("2) Go to main menu");
            println!("3) Quit");
        } else {
            println!("1) Go to main menu");
            println!("2) Quit");
        }

        loop {
            let Some(line) = lines.recv().await else {
                self.force_exit();
            };
            match (line.trim(), restartable) {
                ("1", true) => match self.store.load() {
                    Ok(player) => {
                        info!("restarting from last save");
                        self.world.reset_with(player);
                        return Flow::Restart;
                    }
                    Err(e) => {
                        warn!("restart load failed: {}", e);
                        println!("No save available. Start new game...");
                        return Flow::ToMenu;
                    }
                },
                ("2", true) | ("1", false) => return Flow::ToMenu,
                ("3", true) | ("2", false) => self.handle_game_exit().await,
                _ => println!("Pick an option by number."),
            }
        }
    }

    /// Normal quit: save, thank the player, count down, exit 0.
    async fn handle_game_exit(&mut self) {
        println!("Saving before exit...");
        self.save_game();

        println!();
        println!("  +------------------------------+");
        println!("  |  Thanks for playing!         |");
        println!("  |  Veilspire: Shattered Legacy |");
        println!("  +------------------------------+");

        let mut countdown = self.config.game.quit_countdown_secs;
        while countdown > 0 {
            println!("Closing in {}s...", countdown);
            sleep(Duration::from_secs(1)).await;
            countdown -= 1;
        }
        println!("\nStay awesome! Closing game...");
        process::exit(0);
    }

    /// Emergency exit: best-effort save, final status, immediate shutdown.
    fn force_exit(&mut self) -> ! {
        error!("emergency shutdown");
        println!("Emergency shutdown!");
        println!("Saving game state...");
        self.save_game();
        println!(
            "Final Score: {}",
            self.world
                .player
                .score
                .as_ref()
                .map(|s| s.total)
                .unwrap_or(0)
        );
        process::exit(1);
    }

    /// Persist the current player; failures are reported but never fatal.
    fn save_game(&mut self) {
        let play_secs = self.world.play_secs();
        match self.store.save(&mut self.world.player, play_secs) {
            Ok(()) => println!("\nGame saved successfully!"),
            Err(e) => {
                error!("save failed: {}", e);
                println!("Failed to save game: {}", e);
            }
        }
    }

    fn display_help(&self) {
        println!("\nCommands:");
        println!("  go <direction> - Move in a direction");
        println!("  take <item> - Pick up an item");
        println!("  use <item> - Use an item from your inventory");
        println!("  equip <item> - Equip weapons/armor (swords, bows, axes, shields)");
        println!("  look - Look around the room");
        println!("  inventory - Show your inventory");
        println!("  status - Show your health and player stats");
        println!("  help - Show this help menu");
        println!("  menu - Goes to the main menu");
        println!("  quit - Quit the game");
    }

    fn display_inventory(&self) {
        let player = &self.world.player;
        let catalog = &self.world.catalog;
        println!("Equipped:");
        println!(
            "Weapon: {}",
            player
                .equipped_item
                .as_deref()
                .map(|id| catalog.item_name(id))
                .unwrap_or("None")
        );
        println!(
            "Armor: {}\n",
            player
                .equipped_armor
                .as_deref()
                .map(|id| catalog.item_name(id))
                .unwrap_or("None")
        );
        println!("Items:");
        for item_id in &player.inventory {
            println!("- {}", catalog.item_name(item_id));
        }
    }

    fn display_status(&self) {
        let player = &self.world.player;
        let catalog = &self.world.catalog;
        println!("\n--- Character Status ---");
        println!("Health: {}/{}", player.health, player.max_health);
        println!("Strength: {}", player.strength);
        println!("Defense: {}", player.defense);
        println!("Enemies Defeated: {}", player.enemies_defeated);
        println!(
            "Score: {}",
            player.score.as_ref().map(|s| s.total).unwrap_or(0)
        );
        println!("Time Played: {} seconds", self.world.play_secs());
        println!("Inventory: {} items", player.inventory.len());
        println!(
            "Equipped: {} / {}",
            player
                .equipped_item
                .as_deref()
                .map(|id| catalog.item_name(id))
                .unwrap_or("None"),
            player
                .equipped_armor
                .as_deref()
                .map(|id| catalog.item_name(id))
                .unwrap_or("None")
        );
        println!("------------------------\n");
    }
}

async fn read_menu_choice(lines: &mut mpsc::UnboundedReceiver<String>) -> MenuChoice {
    let Some(line) = lines.recv().await else {
        return MenuChoice::Quit;
    };
    match line.trim().to_lowercase().as_str() {
        "1" | "new" | "new game" => MenuChoice::NewGame,
        "2" | "continue" => MenuChoice::Continue,
        "3" | "settings" => MenuChoice::Settings,
        "4" | "quit" | "q" => MenuChoice::Quit,
        _ => MenuChoice::Unknown,
    }
}
