//! World settings
//!
//! Loaded from a JSON file next to the binary; every field has a default so a
//! partial file only overrides what it names.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the collision sweep treats aircraft destroyed earlier in the same sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionPolicy {
    /// Skip pairs whose aircraft is already a wreck instead of letting it
    /// absorb further hits (and award its bounty again)
    pub skip_wrecks_within_sweep: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === View ===
    /// Visible area in world units
    pub view_size: Vec2,
    /// Height of the scrolling level
    pub world_height: f32,
    /// Minimum distance between the player and the view edges
    pub border_distance: f32,
    /// Lookahead above the view used for spawning and despawning
    pub battlefield_margin: f32,
    /// View scroll speed per level (index 0 = level 1); the last entry covers later levels
    pub scroll_speeds: Vec<f32>,

    // === Gameplay ===
    /// Chance that a destroyed enemy drops a pickup
    pub pickup_drop_chance: f64,
    /// Seed for pickup drops and explosion sound choice
    pub seed: u64,
    pub collision: CollisionPolicy,

    // === Files ===
    pub high_score_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view_size: Vec2::new(1024.0, 768.0),
            world_height: 10_000.0,
            border_distance: 40.0,
            battlefield_margin: 100.0,
            scroll_speeds: vec![-100.0, -125.0, -125.0, -150.0],

            pickup_drop_chance: 1.0 / 3.0,
            seed: 0x5eed,
            collision: CollisionPolicy::default(),

            high_score_path: PathBuf::from("HighScore.txt"),
        }
    }
}

impl Settings {
    /// Scroll speed for a 1-based level
    pub fn scroll_speed_for(&self, level: u32) -> f32 {
        let index = (level.max(1) - 1) as usize;
        self.scroll_speeds
            .get(index)
            .or(self.scroll_speeds.last())
            .copied()
            .unwrap_or(-100.0)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse settings")
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{:#} ({}), using defaults", err, path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write settings {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_speed_per_level() {
        let settings = Settings::default();
        assert_eq!(settings.scroll_speed_for(1), -100.0);
        assert_eq!(settings.scroll_speed_for(2), -125.0);
        assert_eq!(settings.scroll_speed_for(3), -125.0);
        assert_eq!(settings.scroll_speed_for(4), -150.0);
        assert_eq!(settings.scroll_speed_for(5), -150.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{"seed": 42, "collision": {"skip_wrecks_within_sweep": true}}"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert!(settings.collision.skip_wrecks_within_sweep);
        assert_eq!(settings.view_size, Vec2::new(1024.0, 768.0));
    }

    #[test]
    fn test_load_falls_back_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        assert_eq!(Settings::load(&dir.path().join("absent.json")), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            pickup_drop_chance: 0.5,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }
}
