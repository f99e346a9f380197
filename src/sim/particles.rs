//! Particle trails: emitters follow a missile, particle nodes own the points

use std::collections::VecDeque;

use glam::Vec2;

use super::category::Category;
use super::command::{Action, Command, CommandQueue, ParticleAction};
use super::data::ParticleKind;
use crate::consts::EMISSION_RATE;
use crate::renderer::RenderTarget;

/// A single particle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Seconds since emission
    pub age: f32,
}

/// Collection of particles of one kind, oldest first
#[derive(Debug)]
pub struct ParticleNode {
    kind: ParticleKind,
    particles: VecDeque<Particle>,
}

impl ParticleNode {
    pub fn new(kind: ParticleKind) -> Self {
        Self {
            kind,
            particles: VecDeque::new(),
        }
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn add_particle(&mut self, position: Vec2) {
        self.particles.push_back(Particle { position, age: 0.0 });
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn update(&mut self, dt: f32) {
        let lifetime = self.kind.lifetime();
        while self.particles.front().is_some_and(|p| p.age + dt > lifetime) {
            self.particles.pop_front();
        }
        for particle in &mut self.particles {
            particle.age += dt;
        }
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        if !self.particles.is_empty() {
            let particles: Vec<Particle> = self.particles.iter().copied().collect();
            target.draw_particles(self.kind, &particles);
        }
    }
}

/// Emits particles at its world position at a fixed rate
#[derive(Debug)]
pub struct EmitterNode {
    kind: ParticleKind,
    accumulated: f32,
}

impl EmitterNode {
    pub fn new(kind: ParticleKind) -> Self {
        Self {
            kind,
            accumulated: 0.0,
        }
    }

    pub fn update(&mut self, position: Vec2, dt: f32, commands: &mut CommandQueue) {
        let interval = 1.0 / EMISSION_RATE;
        self.accumulated += dt;

        let mut positions = Vec::new();
        while self.accumulated > interval {
            self.accumulated -= interval;
            positions.push(position);
        }

        if !positions.is_empty() {
            commands.push(Command::new(
                Category::PARTICLE_SYSTEM,
                Action::Particles(ParticleAction::Emit {
                    kind: self.kind,
                    positions,
                }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_expire_after_lifetime() {
        let mut node = ParticleNode::new(ParticleKind::Propellant);
        node.add_particle(Vec2::ZERO);
        node.update(0.5);
        assert_eq!(node.len(), 1);
        node.update(0.5);
        assert!(node.is_empty());
    }

    #[test]
    fn test_emitter_batches_particles_per_frame() {
        let mut emitter = EmitterNode::new(ParticleKind::Smoke);
        let mut commands = CommandQueue::new();

        emitter.update(Vec2::new(3.0, 4.0), 0.01, &mut commands);
        assert!(commands.is_empty());

        emitter.update(Vec2::new(3.0, 4.0), 0.1, &mut commands);
        let command = commands.pop().unwrap();
        assert_eq!(command.category, Category::PARTICLE_SYSTEM);
        match command.action {
            Action::Particles(ParticleAction::Emit { kind, positions }) => {
                assert_eq!(kind, ParticleKind::Smoke);
                assert_eq!(positions.len(), 3);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
}
