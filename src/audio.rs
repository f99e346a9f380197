//! Sound effect ids and the audio collaborator the world reports to
//!
//! The simulation never plays audio itself: it hands positional play requests
//! to a [`SoundPlayer`] once per frame.

use std::collections::{HashMap, VecDeque};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player volley
    AlliedGunfire,
    /// Enemy volley
    EnemyGunfire,
    /// Aircraft destroyed (two variants picked at random)
    Explosion1,
    Explosion2,
    /// Guided missile launched
    LaunchMissile,
    /// Pickup collected
    CollectPickup,
}

/// Positional audio backend
pub trait SoundPlayer {
    /// Start `effect` at a world position
    fn play(&mut self, effect: SoundEffect, position: Vec2);
    fn set_listener_position(&mut self, position: Vec2);
    /// Drop finished sounds
    fn remove_stopped_sounds(&mut self);
}

/// A sound started by [`RecordingSoundPlayer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedSound {
    pub effect: SoundEffect,
    pub position: Vec2,
}

/// Silent player that records every request (headless runs and tests)
#[derive(Debug, Default)]
pub struct RecordingSoundPlayer {
    /// Played sounds in order, oldest dropped once `history_limit` is reached
    pub history: VecDeque<PlayedSound>,
    /// `None` keeps the full history
    pub history_limit: Option<usize>,
    totals: HashMap<SoundEffect, usize>,
    /// Sounds started since the last `remove_stopped_sounds`
    pub active: Vec<PlayedSound>,
    pub listener: Vec2,
    pub muted: bool,
}

impl RecordingSoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player that only remembers the most recent `limit` sounds
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Times `effect` was played, including sounds dropped from the history
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.totals.get(&effect).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.totals.values().sum()
    }
}

impl SoundPlayer for RecordingSoundPlayer {
    fn play(&mut self, effect: SoundEffect, position: Vec2) {
        if self.muted {
            return;
        }
        let sound = PlayedSound { effect, position };
        *self.totals.entry(effect).or_default() += 1;
        if self.history_limit.is_some_and(|limit| self.history.len() >= limit) {
            self.history.pop_front();
        }
        if self.history_limit != Some(0) {
            self.history.push_back(sound);
        }
        self.active.push(sound);
    }

    fn set_listener_position(&mut self, position: Vec2) {
        self.listener = position;
    }

    fn remove_stopped_sounds(&mut self) {
        // Nothing is audible, so every sound has finished by the next frame
        self.active.clear();
    }
}
