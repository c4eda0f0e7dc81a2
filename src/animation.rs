//! Animation collaborator interface.
//!
//! The engines treat animation as a fire-and-forget side effect: nothing an
//! animator renders feeds back into game state except the rendered
//! health-bar string and the line count of a character action. The decorative
//! frame art lives entirely behind this trait so the core stays testable
//! with [`SilentAnimator`].

use tokio::time::{sleep, Duration};

/// Rendering surface for game animations. All playback methods pace
/// themselves; callers simply await them in sequence.
#[allow(async_fn_in_trait)]
pub trait Animator {
    /// Play a character sprite action (walk, attack, ...). Returns the
    /// number of lines rendered.
    async fn play_character_action(
        &self,
        character: &str,
        action: &str,
        color: &str,
        frames: u32,
        speed_ms: u64,
    ) -> usize;

    /// Directional room-transition effect (north/south/door/up/down/...).
    async fn play_transition(&self, direction: &str, speed_ms: u64);

    /// Item pickup/use flourish keyed by item id (also used for one-shot
    /// confirmations like `climbing_confirmation`).
    async fn play_item_effect(&self, item_id: &str, speed_ms: u64);

    /// Ambient environment loop keyed by room or scene name.
    async fn play_environment(&self, scene: &str, frames: u32, speed_ms: u64);

    /// One full battle exchange tableau.
    async fn play_battle_round(&self, weapon: &str, enemy: &str, player_hp: i32, enemy_hp: i32);

    /// Numeric damage pop.
    async fn play_damage_popup(&self, value: i32);

    /// Per-enemy victory fanfare.
    async fn play_victory(&self, enemy: &str);

    /// Player death sequence.
    async fn play_defeat(&self);

    /// The dragon-slain ending sequence.
    async fn play_final_victory(&self);

    /// Named scripted cutscene (e.g. `dragon_intro`).
    async fn play_cutscene(&self, name: &str);

    /// Title card shown above the main menu.
    async fn play_title_screen(&self);

    /// Render a textual health bar. Synchronous; the only animator output
    /// the engines read back.
    fn render_health_bar(&self, current: i32, max: i32, width: usize) -> String {
        let max = max.max(1);
        let filled = ((current.clamp(0, max) as usize) * width) / max as usize;
        let mut bar = String::with_capacity(width + 16);
        bar.push('[');
        for i in 0..width {
            bar.push(if i < filled { '#' } else { '-' });
        }
        bar.push(']');
        bar.push_str(&format!(" {}/{}", current.max(0), max));
        bar
    }
}

/// Console animator: compact ASCII frames paced by tokio sleeps. The `speed`
/// multiplier scales every delay; `enabled = false` degrades to instant
/// text-only output.
pub struct ConsoleAnimator {
    enabled: bool,
    speed: f64,
}

impl ConsoleAnimator {
    pub fn new(enabled: bool, speed: f64) -> Self {
        Self {
            enabled,
            speed: if speed > 0.0 { speed } else { 1.0 },
        }
    }

    async fn pace(&self, ms: u64) {
        if self.enabled && ms > 0 {
            sleep(Duration::from_millis((ms as f64 * self.speed) as u64)).await;
        }
    }
}

impl Default for ConsoleAnimator {
    fn default() -> Self {
        Self::new(true, 1.0)
    }
}

impl Animator for ConsoleAnimator {
    async fn play_character_action(
        &self,
        character: &str,
        action: &str,
        _color: &str,
        frames: u32,
        speed_ms: u64,
    ) -> usize {
        let sprites = ["( o_o)", "( o_o)>", "(>o_o)", "( o_o)"];
        let mut lines = 0;
        for frame in 0..frames {
            let sprite = sprites[frame as usize % sprites.len()];
            println!("  {} {} ({})", sprite, character, action);
            lines += 1;
            self.pace(speed_ms).await;
        }
        lines
    }

    async fn play_transition(&self, direction: &str, speed_ms: u64) {
        println!("  ~~~ heading {} ~~~", direction);
        self.pace(speed_ms).await;
    }

    async fn play_item_effect(&self, item_id: &str, speed_ms: u64) {
        println!("  * {} *", item_id.replace('_', " "));
        self.pace(speed_ms).await;
    }

    async fn play_environment(&self, scene: &str, frames: u32, speed_ms: u64) {
        for _ in 0..frames.min(2) {
            println!("  .: {} :.", scene);
            self.pace(speed_ms).await;
        }
    }

    async fn play_battle_round(&self, weapon: &str, enemy: &str, player_hp: i32, enemy_hp: i32) {
        println!("  -- {} vs {} --", weapon, enemy);
        println!("  you: {} hp   foe: {} hp", player_hp.max(0), enemy_hp.max(0));
        self.pace(120).await;
    }

    async fn play_damage_popup(&self, value: i32) {
        println!("      -{}!", value);
        self.pace(80).await;
    }

    async fn play_victory(&self, enemy: &str) {
        println!("  \\o/  the {} falls!", enemy);
        self.pace(200).await;
    }

    async fn play_defeat(&self) {
        println!("  x_x  darkness takes you...");
        self.pace(300).await;
    }

    async fn play_final_victory(&self) {
        println!("  ==== THE REALM IS SAVED ====");
        self.pace(400).await;
    }

    async fn play_cutscene(&self, name: &str) {
        println!("  ((( {} )))", name.replace('_', " "));
        self.pace(300).await;
    }

    async fn play_title_screen(&self) {
        println!("=======================================================");
        println!("          VEILSPIRE : SHATTERED LEGACY");
        println!("=======================================================");
        self.pace(200).await;
    }
}

/// No-op animator for tests and `--quiet` runs.
#[derive(Default)]
pub struct SilentAnimator;

impl Animator for SilentAnimator {
    async fn play_character_action(
        &self,
        _character: &str,
        _action: &str,
        _color: &str,
        frames: u32,
        _speed_ms: u64,
    ) -> usize {
        frames as usize
    }

    async fn play_transition(&self, _direction: &str, _speed_ms: u64) {}

    async fn play_item_effect(&self, _item_id: &str, _speed_ms: u64) {}

    async fn play_environment(&self, _scene: &str, _frames: u32, _speed_ms: u64) {}

    async fn play_battle_round(&self, _weapon: &str, _enemy: &str, _player_hp: i32, _enemy_hp: i32) {
    }

    async fn play_damage_popup(&self, _value: i32) {}

    async fn play_victory(&self, _enemy: &str) {}

    async fn play_defeat(&self) {}

    async fn play_final_victory(&self) {}

    async fn play_cutscene(&self, _name: &str) {}

    async fn play_title_screen(&self) {}
}
