//! Bullets and guided missiles

use glam::{Affine2, Vec2};

use super::category::Category;
use super::data::{ParticleKind, ProjectileKind};
use super::entity::Entity;
use super::geometry::Transform;
use super::node::{NodeKind, SceneNode};
use super::particles::EmitterNode;
use crate::consts::MISSILE_APPROACH_RATE;
use crate::renderer::RenderTarget;
use crate::{rotation_for_velocity, unit_vector};

#[derive(Debug)]
pub struct Projectile {
    kind: ProjectileKind,
    entity: Entity,
    /// Unit heading a guided projectile steers toward
    target_direction: Vec2,
}

impl Projectile {
    pub fn new(kind: ProjectileKind) -> Self {
        Self {
            kind,
            entity: Entity::new(1),
            target_direction: Vec2::ZERO,
        }
    }

    /// Node ready to attach, plus the exhaust emitters missiles trail
    pub fn build(kind: ProjectileKind, position: Vec2, velocity: Vec2) -> (SceneNode, Vec<SceneNode>) {
        let mut projectile = Projectile::new(kind);
        projectile.entity.velocity = velocity;
        let size = projectile.size();
        let node = SceneNode::new(NodeKind::Projectile(projectile)).at(position);

        let emitters = if kind.is_guided() {
            let exhaust = Vec2::new(0.0, size.y / 2.0);
            vec![
                SceneNode::new(NodeKind::Emitter(EmitterNode::new(ParticleKind::Smoke))).at(exhaust),
                SceneNode::new(NodeKind::Emitter(EmitterNode::new(ParticleKind::Propellant))).at(exhaust),
            ]
        } else {
            Vec::new()
        };
        (node, emitters)
    }

    pub fn kind(&self) -> ProjectileKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        if self.kind.is_allied() {
            Category::ALLIED_PROJECTILE
        } else {
            Category::ENEMY_PROJECTILE
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn damage(&self) -> i32 {
        self.kind.data().damage
    }

    pub fn max_speed(&self) -> f32 {
        self.kind.data().speed
    }

    pub fn size(&self) -> Vec2 {
        self.kind.data().sprite.size()
    }

    pub fn is_guided(&self) -> bool {
        self.kind.is_guided()
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    pub fn target_direction(&self) -> Vec2 {
        self.target_direction
    }

    /// Steer toward `offset` (target position minus own world position)
    pub fn guide_towards(&mut self, offset: Vec2) {
        debug_assert!(self.is_guided());
        self.target_direction = unit_vector(offset);
    }

    pub fn update(&mut self, transform: &mut Transform, dt: f32) {
        if self.is_guided() {
            let velocity = unit_vector(MISSILE_APPROACH_RATE * dt * self.target_direction + self.entity.velocity)
                * self.max_speed();
            self.entity.velocity = velocity;
            transform.rotation = rotation_for_velocity(velocity);
        }
        transform.translate(self.entity.step(dt));
    }

    pub fn draw(&self, world: &Affine2, target: &mut dyn RenderTarget) {
        let sprite = self.kind.data().sprite;
        target.draw_sprite(&sprite, &(*world * Affine2::from_translation(-sprite.size() / 2.0)));
    }
}
