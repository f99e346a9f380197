//! Collectible power-ups dropped by destroyed enemies

use glam::{Affine2, Vec2};

use super::aircraft::Aircraft;
use super::data::{HEALTH_REFILL_AMOUNT, MISSILE_REFILL_AMOUNT, PickupKind};
use super::entity::Entity;
use super::node::{NodeKind, SceneNode};
use crate::renderer::RenderTarget;

#[derive(Debug)]
pub struct Pickup {
    kind: PickupKind,
    entity: Entity,
}

impl Pickup {
    pub fn new(kind: PickupKind) -> Self {
        Self {
            kind,
            entity: Entity::new(1),
        }
    }

    pub fn build(kind: PickupKind, position: Vec2) -> SceneNode {
        SceneNode::new(NodeKind::Pickup(Pickup::new(kind))).at(position)
    }

    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn size(&self) -> Vec2 {
        self.kind.sprite().size()
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    /// Grant this pickup's effect to `aircraft`
    pub fn apply(&self, aircraft: &mut Aircraft) {
        match self.kind {
            PickupKind::HealthRefill => aircraft.repair(HEALTH_REFILL_AMOUNT),
            PickupKind::MissileRefill => aircraft.collect_missiles(MISSILE_REFILL_AMOUNT),
            PickupKind::FireSpread => aircraft.increase_spread(),
            PickupKind::FireRate => aircraft.increase_fire_rate(),
        }
    }

    pub fn draw(&self, world: &Affine2, target: &mut dyn RenderTarget) {
        let sprite = self.kind.sprite();
        target.draw_sprite(&sprite, &(*world * Affine2::from_translation(-sprite.size() / 2.0)));
    }
}
