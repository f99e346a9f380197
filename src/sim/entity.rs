//! Shared state of everything that moves and can be destroyed

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Velocity plus hit points; health never drops below zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub velocity: Vec2,
    hitpoints: i32,
}

impl Entity {
    pub fn new(hitpoints: i32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            hitpoints: hitpoints.max(0),
        }
    }

    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    pub fn accelerate(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    pub fn repair(&mut self, points: i32) {
        debug_assert!(points > 0);
        self.hitpoints += points;
    }

    pub fn damage(&mut self, points: i32) {
        debug_assert!(points >= 0);
        self.hitpoints = (self.hitpoints - points).max(0);
    }

    pub fn destroy(&mut self) {
        self.hitpoints = 0;
    }

    pub fn is_destroyed(&self) -> bool {
        self.hitpoints <= 0
    }

    /// Displacement for this frame
    pub fn step(&self, dt: f32) -> Vec2 {
        self.velocity * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut entity = Entity::new(10);
        entity.damage(25);
        assert_eq!(entity.hitpoints(), 0);
        assert!(entity.is_destroyed());
    }

    #[test]
    fn test_repair_and_destroy() {
        let mut entity = Entity::new(100);
        entity.damage(40);
        entity.repair(25);
        assert_eq!(entity.hitpoints(), 85);
        entity.destroy();
        assert!(entity.is_destroyed());
    }
}
