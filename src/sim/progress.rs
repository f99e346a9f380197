//! Campaign progress carried across levels: level counter, score, player loadout

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// Weapon upgrades and ammo the player keeps between levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLoadout {
    pub fire_rate_level: u32,
    pub spread_level: u32,
    pub missile_ammo: u32,
}

impl Default for PlayerLoadout {
    fn default() -> Self {
        Self {
            fire_rate_level: 1,
            spread_level: 1,
            missile_ammo: 2,
        }
    }
}

/// Bonus awarded when a level is cleared, keyed by the level counter after the clear
pub fn level_bonus(level: u32) -> u64 {
    match level {
        2 => 1_000,
        3 => 2_000,
        4 => 5_000,
        5 => 10_000,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    level: u32,
    score: u64,
    loadout: PlayerLoadout,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl GameProgress {
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            loadout: PlayerLoadout::default(),
        }
    }

    /// Level to build next (1-based)
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn loadout(&self) -> PlayerLoadout {
        self.loadout
    }

    /// Store the player's current loadout; upgrade levels never go down
    pub fn record_loadout(&mut self, loadout: PlayerLoadout) {
        self.loadout = PlayerLoadout {
            fire_rate_level: self.loadout.fire_rate_level.max(loadout.fire_rate_level),
            spread_level: self.loadout.spread_level.max(loadout.spread_level),
            missile_ammo: loadout.missile_ammo,
        };
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
    }

    /// Back to level 1, zero score, base loadout
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Add the completion bonus for the current level counter; returns the bonus
    pub fn increase_score_on_level_complete(&mut self) -> u64 {
        let bonus = level_bonus(self.level);
        self.add_score(bonus);
        log::info!("Level bonus {} at level counter {}, score {}", bonus, self.level, self.score);
        bonus
    }

    /// True once every level has been built and cleared
    pub fn is_campaign_complete(&self) -> bool {
        self.level > LEVEL_COUNT
    }
}
