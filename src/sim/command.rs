//! Commands: a category mask plus the action every matching node performs
//!
//! Actions are plain data. The scene graph interprets them node by node, so a
//! command can be built anywhere and queued for the next dispatch pass.

use std::collections::VecDeque;

use glam::Vec2;

use super::category::Category;
use super::data::{ParticleKind, PickupKind, ProjectileKind};
use super::geometry::Rect;
use crate::audio::SoundEffect;

/// A node to create under the receiving layer, positioned in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Projectile {
        kind: ProjectileKind,
        position: Vec2,
        velocity: Vec2,
    },
    Pickup {
        kind: PickupKind,
        position: Vec2,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction {
    /// Remove the entity when its bounds no longer touch the given rectangle
    RemoveIfOutside(Rect),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AircraftAction {
    /// Add `direction * max_speed` to the velocity
    Accelerate(Vec2),
    Fire,
    LaunchMissile,
    /// Record the aircraft's world position as a guidance target if it still flies
    CollectIfAlive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileAction {
    GuideTowardsNearestEnemy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerAction {
    Attach(Vec<Spawn>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleAction {
    Emit { kind: ParticleKind, positions: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SoundAction {
    Play { effect: SoundEffect, position: Vec2 },
}

/// What a receiving node does, grouped by the node type that understands it
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Entity(EntityAction),
    Aircraft(AircraftAction),
    Projectile(ProjectileAction),
    Layer(LayerAction),
    Particles(ParticleAction),
    Sound(SoundAction),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Entity(_) => "entity",
            Action::Aircraft(_) => "aircraft",
            Action::Projectile(_) => "projectile",
            Action::Layer(_) => "layer",
            Action::Particles(_) => "particles",
            Action::Sound(_) => "sound",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub category: Category,
    pub action: Action,
}

impl Command {
    pub fn new(category: Category, action: Action) -> Self {
        Self { category, action }
    }

    pub fn play_sound(effect: SoundEffect, position: Vec2) -> Self {
        Self::new(
            Category::SOUND_EFFECT,
            Action::Sound(SoundAction::Play { effect, position }),
        )
    }

    /// Attach nodes under the air layer
    pub fn spawn(spawns: Vec<Spawn>) -> Self {
        Self::new(Category::SCENE_AIR_LAYER, Action::Layer(LayerAction::Attach(spawns)))
    }
}

/// FIFO of pending commands
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = CommandQueue::new();
        queue.push(Command::play_sound(SoundEffect::Explosion1, Vec2::ZERO));
        queue.push(Command::play_sound(SoundEffect::Explosion2, Vec2::ZERO));

        assert_eq!(queue.len(), 2);
        let first = queue.pop().unwrap();
        assert_eq!(
            first.action,
            Action::Sound(SoundAction::Play {
                effect: SoundEffect::Explosion1,
                position: Vec2::ZERO
            })
        );
        assert!(queue.pop().is_some());
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_spawn_targets_air_layer() {
        let command = Command::spawn(vec![]);
        assert_eq!(command.category, Category::SCENE_AIR_LAYER);
        assert_eq!(command.action.name(), "layer");
    }
}
