//! JSON snapshot persistence.
//!
//! One save slot per installation, stored under the platform data directory.
//! The snapshot carries a version string; loading an older snapshot logs a
//! warning and proceeds, letting serde defaults fill any gaps. Equipment is
//! stored as item-id slot references and relinked after deserialization.

use crate::core::constants::{SAVE_FILE_NAME, SAVE_VERSION};
use crate::entities::player::Player;
use crate::world::World;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not determine a save directory for this platform")]
    NoSaveDir,
    #[error("save io: {0}")]
    Io(#[from] std::io::Error),
    #[error("save format: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub player: Player,
    pub world: World,
}

pub struct SaveManager {
    save_dir: PathBuf,
}

impl SaveManager {
    /// Uses the platform data directory (e.g. `~/.local/share/ardenvale`).
    pub fn new() -> Result<Self, SaveError> {
        let dirs = ProjectDirs::from("", "", "ardenvale").ok_or(SaveError::NoSaveDir)?;
        Ok(Self {
            save_dir: dirs.data_dir().to_path_buf(),
        })
    }

    pub fn with_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_dir.join(SAVE_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.save_path().exists()
    }

    pub fn save(&self, player: &Player, world: &World) -> Result<(), SaveError> {
        fs::create_dir_all(&self.save_dir)?;
        let snapshot = SaveFile {
            version: SAVE_VERSION.to_string(),
            timestamp: Utc::now(),
            player: player.clone(),
            world: world.clone(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(&self.save_path(), &json)?;
        info!("saved game to {}", self.save_path().display());
        Ok(())
    }

    /// Loads the snapshot if one exists. Version drift is tolerated with a
    /// warning; missing fields fall back to their serde defaults.
    pub fn load(&self) -> Result<Option<(Player, World)>, SaveError> {
        let path = self.save_path();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let snapshot: SaveFile = serde_json::from_str(&json)?;
        if snapshot.version != SAVE_VERSION {
            warn!(
                "save version {} differs from current {}; loading anyway",
                snapshot.version, SAVE_VERSION
            );
        }
        let mut player = snapshot.player;
        player.relink_equipment();
        info!(
            "loaded {} (level {}) saved at {}",
            player.name, player.level, snapshot.timestamp
        );
        Ok(Some((player, snapshot.world)))
    }

    pub fn delete(&self) -> Result<bool, SaveError> {
        let path = self.save_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// Write to a sibling temp file first so an interrupted save never truncates
/// the previous snapshot.
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::class::PlayerClass;
    use crate::entities::inventory::equip;
    use crate::world::content;
    use tempfile::tempdir;

    fn setup() -> (Player, World) {
        let world = content::ardenvale();
        let mut player = Player::new("Tarn", PlayerClass::Warrior, content::STARTING_LOCATION);
        player
            .inventory
            .add(world.item_template("rusted_sword").unwrap().clone());
        equip(&mut player.inventory, &mut player.equipment, "rusted_sword").unwrap();
        player.essence = 777;
        (player, world)
    }

    #[test]
    fn round_trip_preserves_player_and_world() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        let (mut player, mut world) = setup();
        world.location_mut("firelink_shrine").unwrap().visit();
        player.discover("firelink_shrine");

        assert!(!manager.exists());
        manager.save(&player, &world).unwrap();
        assert!(manager.exists());

        let (loaded_player, loaded_world) = manager.load().unwrap().unwrap();
        assert_eq!(loaded_player, player);
        assert_eq!(loaded_world, world);
        assert!(loaded_world.location("firelink_shrine").unwrap().visited);
    }

    #[test]
    fn missing_save_is_none() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        assert!(manager.load().unwrap().is_none());
    }

    #[test]
    fn older_version_still_loads() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        let (player, world) = setup();
        manager.save(&player, &world).unwrap();

        let json = fs::read_to_string(manager.save_path()).unwrap();
        let patched = json.replacen(SAVE_VERSION, "0.0.1", 1);
        fs::write(manager.save_path(), patched).unwrap();

        let (loaded, _) = manager.load().unwrap().unwrap();
        assert_eq!(loaded.essence, 777);
    }

    #[test]
    fn corrupt_save_is_an_error() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        fs::write(manager.save_path(), "{not json").unwrap();
        assert!(matches!(manager.load(), Err(SaveError::Format(_))));
    }

    #[test]
    fn load_relinks_equipment_flags() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        let (player, world) = setup();
        manager.save(&player, &world).unwrap();

        let (loaded, _) = manager.load().unwrap().unwrap();
        assert_eq!(loaded.equipment.weapon.as_deref(), Some("rusted_sword"));
        assert!(loaded.inventory.get("rusted_sword").unwrap().equipped);
    }

    #[test]
    fn delete_reports_whether_a_save_existed() {
        let dir = tempdir().unwrap();
        let manager = SaveManager::with_dir(dir.path());
        assert!(!manager.delete().unwrap());
        let (player, world) = setup();
        manager.save(&player, &world).unwrap();
        assert!(manager.delete().unwrap());
        assert!(!manager.exists());
    }
}
