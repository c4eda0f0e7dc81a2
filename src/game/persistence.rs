//! Persistence layer: the versioned JSON save document, score computation,
//! and forward migration of older schema versions.
//!
//! One flat document at `<user data dir>/veilspire/saves/savegame.json`
//! using atomic write+rename under an exclusive file lock. Loading merges
//! the saved player under fresh defaults (serde per-field defaults), so new
//! fields pick up defaults and saved fields always win.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, info, warn};
use serde_json::{json, Value};

use crate::game::errors::GameError;
use crate::game::types::{Player, SaveDocument, Score, ScoreBreakdown, SAVE_VERSION};

const SAVE_FILE_NAME: &str = "savegame.json";

/// Compute the current score with its breakdown.
/// The time bonus starts at 500 and decays one point per played minute,
/// floored at zero.
pub fn compute_score(player: &Player, play_secs: u64) -> Score {
    let enemies = player.enemies_defeated as i64 * 100;
    let inventory = player.inventory.len() as i64 * 50;
    let health_bonus = player.health as i64;
    let time_bonus = (500 - (play_secs / 60) as i64).max(0);
    Score {
        total: enemies + inventory + health_bonus + time_bonus,
        breakdown: ScoreBreakdown {
            enemies,
            inventory,
            health_bonus,
            time_bonus,
        },
    }
}

/// Legacy score for pre-1.1 saves: same addends, no time bonus.
fn legacy_score(player: &Value) -> Score {
    let enemies = player
        .get("enemiesDefeated")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        * 100;
    let inventory = player
        .get("inventory")
        .and_then(Value::as_array)
        .map(|a| a.len() as i64)
        .unwrap_or(0)
        * 50;
    let health_bonus = player.get("health").and_then(Value::as_i64).unwrap_or(0);
    Score {
        total: enemies + inventory + health_bonus,
        breakdown: ScoreBreakdown {
            enemies,
            inventory,
            health_bonus,
            time_bonus: 0,
        },
    }
}

/// Migrate a raw save document to the current schema version in place.
///
/// Versions below 1.1 carried a bare numeric score; it is replaced by a
/// freshly computed legacy score object. Versions above the current schema
/// have no migration path and fail.
pub fn migrate_save(doc: &mut Value) -> Result<(), GameError> {
    let found = doc.get("version").and_then(Value::as_f64).unwrap_or(0.0);
    if found == SAVE_VERSION {
        return Ok(());
    }
    if found > SAVE_VERSION {
        return Err(GameError::MigrationUnsupported {
            found,
            current: SAVE_VERSION,
        });
    }

    info!("migrating save from version {} to {}", found, SAVE_VERSION);
    if found < 1.1 {
        if let Some(player) = doc.get_mut("player") {
            let score = legacy_score(player);
            player["score"] = serde_json::to_value(&score)?;
        }
    }
    doc["version"] = json!(SAVE_VERSION);
    Ok(())
}

/// Owns the resolved save location and performs all file IO.
pub struct SaveStore {
    save_dir: PathBuf,
    save_path: PathBuf,
}

impl SaveStore {
    /// Resolve the save location: an explicit override, or the platform
    /// user-data directory joined with `veilspire/saves`.
    pub fn new(dir_override: Option<PathBuf>) -> Self {
        let save_dir = dir_override
            .unwrap_or_else(|| user_data_dir().join("veilspire").join("saves"));
        let save_path = save_dir.join(SAVE_FILE_NAME);
        Self {
            save_dir,
            save_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    pub fn exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Recompute the score onto the player and persist a full snapshot.
    /// Falls back to a temp directory (and retries once) when the primary
    /// save directory cannot be created.
    pub fn save(&mut self, player: &mut Player, play_secs: u64) -> Result<(), GameError> {
        player.score = Some(compute_score(player, play_secs));

        if !self.save_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&self.save_dir) {
                warn!(
                    "unable to create save directory {}: {}; falling back to temp",
                    self.save_dir.display(),
                    e
                );
                self.save_dir = std::env::temp_dir().join("veilspire-saves");
                self.save_path = self.save_dir.join(SAVE_FILE_NAME);
                std::fs::create_dir_all(&self.save_dir)?;
            }
        }

        let document = SaveDocument {
            version: SAVE_VERSION,
            timestamp: chrono::Utc::now(),
            player: player.clone(),
        };
        let content = serde_json::to_string_pretty(&document)?;
        write_json_atomic(&self.save_path, &content)?;
        debug!("saved game to {}", self.save_path.display());
        Ok(())
    }

    /// Load and migrate the save document into a player record. The caller's
    /// live player stays untouched unless this returns Ok.
    pub fn load(&self) -> Result<Player, GameError> {
        if !self.exists() {
            return Err(GameError::NoSaveFile(self.save_path.display().to_string()));
        }

        let raw = std::fs::read_to_string(&self.save_path)?;
        let mut doc: Value = serde_json::from_str(&raw)?;

        let version = doc.get("version").and_then(Value::as_f64).unwrap_or(0.0);
        if version != SAVE_VERSION {
            migrate_save(&mut doc)?;
            info!("save file migrated to version {}", SAVE_VERSION);
        }

        let has_room = doc
            .get("player")
            .and_then(|p| p.get("currentRoom"))
            .and_then(Value::as_str)
            .is_some();
        if !has_room {
            return Err(GameError::InvalidSave(
                "save document has no player.currentRoom".to_string(),
            ));
        }

        // Per-field serde defaults give the merge-under-defaults semantics:
        // anything the document omits comes back as a fresh-player value.
        let mut player: Player = serde_json::from_value(doc["player"].take())?;
        if player.score.is_none() {
            player.score = Some(compute_score(&player, 0));
        }
        Ok(player)
    }

    /// Best-effort high score for the main menu; every failure reads as 0.
    pub fn peek_high_score(&self) -> i64 {
        self.load()
            .ok()
            .and_then(|player| player.score.map(|s| s.total))
            .unwrap_or(0)
    }

    /// Remove the save file. Returns whether anything was deleted.
    pub fn delete(&self) -> Result<bool, GameError> {
        if !self.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.save_path)?;
        Ok(true)
    }
}

/// Platform user-data directory: `%APPDATA%` on Windows, `~/Library/
/// Application Support` on macOS, `~/.local/share` elsewhere.
fn user_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join("AppData").join("Roaming"))
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        home_dir().join(".local").join("share")
    }
}

fn home_dir() -> PathBuf {
    let var = if cfg!(target_os = "windows") {
        "USERPROFILE"
    } else {
        "HOME"
    };
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Atomic JSON write: exclusive lock on the target, write to a fresh temp
/// file in the same directory, rename over the target, sync the directory.
fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(SAVE_FILE_NAME);
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.sync_all()?;
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    std::fs::rename(&tmp_path, path)?;
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    drop(lock_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> SaveStore {
        SaveStore::new(Some(dir.to_path_buf()))
    }

    #[test]
    fn test_score_computation() {
        let mut player = Player::new();
        player.enemies_defeated = 2;
        player.inventory = vec!["key".to_string(), "torch".to_string()];
        player.health = 42;

        let score = compute_score(&player, 120);
        assert_eq!(score.breakdown.enemies, 200);
        assert_eq!(score.breakdown.inventory, 100);
        assert_eq!(score.breakdown.health_bonus, 42);
        assert_eq!(score.breakdown.time_bonus, 498);
        assert_eq!(score.total, 200 + 100 + 42 + 498);
    }

    #[test]
    fn test_time_bonus_floors_at_zero() {
        let player = Player::new();
        let score = compute_score(&player, 600 * 60);
        assert_eq!(score.breakdown.time_bonus, 0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());

        let mut player = Player::new();
        player.health = 42;
        player.inventory = vec!["key".to_string(), "torch".to_string()];
        player.enemies_defeated = 2;
        player.current_room = "forest".to_string();

        store.save(&mut player, 0).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.health, 42);
        assert_eq!(loaded.inventory, vec!["key", "torch"]);
        assert_eq!(loaded.enemies_defeated, 2);
        assert_eq!(loaded.current_room, "forest");
        assert!(loaded.score.is_some());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(matches!(store.load(), Err(GameError::NoSaveFile(_))));
    }

    #[test]
    fn test_load_corrupt_json_fails() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SAVE_FILE_NAME), "{ not json").unwrap();
        let store = store_in(dir.path());
        assert!(matches!(store.load(), Err(GameError::Json(_))));
    }

    #[test]
    fn test_load_without_current_room_fails() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SAVE_FILE_NAME),
            r#"{"version": 1.1, "timestamp": "2024-01-01T00:00:00Z", "player": {"health": 50}}"#,
        )
        .unwrap();
        let store = store_in(dir.path());
        assert!(matches!(store.load(), Err(GameError::InvalidSave(_))));
    }

    #[test]
    fn test_legacy_save_migrates_score() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SAVE_FILE_NAME),
            r#"{
                "version": 1.0,
                "timestamp": "2023-06-01T00:00:00Z",
                "player": {
                    "health": 42,
                    "inventory": ["key", "torch"],
                    "enemiesDefeated": 2,
                    "currentRoom": "south",
                    "score": 0
                }
            }"#,
        )
        .unwrap();

        let store = store_in(dir.path());
        let player = store.load().unwrap();
        let score = player.score.unwrap();
        assert_eq!(score.total, 2 * 100 + 2 * 50 + 42);
        assert_eq!(score.breakdown.time_bonus, 0);
    }

    #[test]
    fn test_future_version_has_no_migration_path() {
        let mut doc = serde_json::json!({
            "version": 2.0,
            "player": {"currentRoom": "start"}
        });
        assert!(matches!(
            migrate_save(&mut doc),
            Err(GameError::MigrationUnsupported { .. })
        ));
    }

    #[test]
    fn test_missing_fields_backfill_defaults_on_load() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SAVE_FILE_NAME),
            r#"{"version": 1.1, "timestamp": "2024-01-01T00:00:00Z",
                "player": {"currentRoom": "cave", "health": 7}}"#,
        )
        .unwrap();
        let store = store_in(dir.path());
        let player = store.load().unwrap();
        assert_eq!(player.current_room, "cave");
        assert_eq!(player.health, 7);
        assert_eq!(player.max_health, 100);
        assert_eq!(player.strength, 1);
        assert!(!player.has_won);
        assert!(!player.is_dead);
        // Absent score synthesizes from current stats with no time bonus.
        assert_eq!(player.score.unwrap().total, 7);
    }

    #[test]
    fn test_save_falls_back_to_temp_dir() {
        // Point the save dir below a regular file so create_dir_all fails.
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let mut store = SaveStore::new(Some(blocker.join("saves")));
        let mut player = Player::new();
        store.save(&mut player, 0).unwrap();
        assert!(store.path().starts_with(std::env::temp_dir()));
        assert!(store.exists());
        let _ = store.delete();
    }

    #[test]
    fn test_peek_high_score_tolerates_everything() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert_eq!(store.peek_high_score(), 0);

        std::fs::write(dir.path().join(SAVE_FILE_NAME), "garbage").unwrap();
        assert_eq!(store.peek_high_score(), 0);
    }

    #[test]
    fn test_delete_reports_presence() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        assert!(!store.delete().unwrap());
        store.save(&mut Player::new(), 0).unwrap();
        assert!(store.delete().unwrap());
        assert!(!store.exists());
    }
}
