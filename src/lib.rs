//! Sky Raid - simulation core of a vertically scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Scene graph, command dispatch, collisions and the level driver
//! - `audio`: Sound effect ids and the positional audio collaborator
//! - `renderer`: Backend-agnostic draw contract for the scene graph
//! - `settings`: Data-driven world configuration
//! - `highscores`: Single-value high score file
//! - `task`: Background worker with a polled completion flag

pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod task;

pub use highscores::HighScore;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the frame loop)
    pub const TIME_PER_FRAME: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of playable levels; the campaign ends once the level counter reaches this + 1
    pub const LEVEL_COUNT: u32 = 4;

    /// Missile steering rate toward its target direction
    pub const MISSILE_APPROACH_RATE: f32 = 200.0;
    /// Explosion animation length for destroyed aircraft (seconds)
    pub const EXPLOSION_DURATION: f32 = 1.0;
    /// Particles emitted per second by a missile exhaust emitter
    pub const EMISSION_RATE: f32 = 30.0;

    /// Player loadout caps
    pub const MAX_FIRE_RATE_LEVEL: u32 = 10;
    pub const MAX_SPREAD_LEVEL: u32 = 3;
}

/// Unit vector in the direction of `v`, or zero for a zero-length vector
#[inline]
pub fn unit_vector(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Direction of travel for a heading given in degrees, where 0 points down the screen
#[inline]
pub fn heading_to_direction(degrees: f32) -> Vec2 {
    let radians = (degrees + 90.0).to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Sprite rotation (radians) that makes a sprite drawn nose-up face along `velocity`
#[inline]
pub fn rotation_for_velocity(velocity: Vec2) -> f32 {
    velocity.y.atan2(velocity.x) + std::f32::consts::FRAC_PI_2
}
