//! Aircraft: player and enemy fighters
//!
//! Handles firing cadence, missile launches, enemy movement patterns, death
//! effects (pickup drop, explosion, sound) and the HP / missile labels.

use std::f32::consts::PI;

use glam::{Affine2, Vec2};
use rand::Rng;
use rand_pcg::Pcg32;

use super::category::Category;
use super::command::{Command, CommandQueue, Spawn};
use super::data::{AircraftKind, PickupKind, ProjectileKind, Sprite, TextureId};
use super::entity::Entity;
use super::geometry::{Rect, Transform};
use super::node::{NodeId, NodeKind, SceneGraph, SceneNode};
use super::progress::PlayerLoadout;
use super::scenery::TextNode;
use crate::audio::SoundEffect;
use crate::consts::{EXPLOSION_DURATION, MAX_FIRE_RATE_LEVEL, MAX_SPREAD_LEVEL};
use crate::heading_to_direction;
use crate::renderer::RenderTarget;

/// Explosion sheet layout
const EXPLOSION_FRAME_SIZE: f32 = 256.0;
const EXPLOSION_FRAMES: u32 = 16;
const EXPLOSION_COLUMNS: u32 = 4;

/// Label offsets below the aircraft, in aircraft-local space
const HEALTH_LABEL_OFFSET: Vec2 = Vec2::new(0.0, 50.0);
const MISSILE_LABEL_OFFSET: Vec2 = Vec2::new(0.0, 70.0);

/// Rotation for enemies, which fly nose-down
pub const ENEMY_ROTATION: f32 = PI;

/// Default chance that a destroyed enemy drops a pickup
pub const DEFAULT_DROP_CHANCE: f64 = 1.0 / 3.0;

#[derive(Debug)]
pub struct Aircraft {
    kind: AircraftKind,
    entity: Entity,
    sprite: Sprite,

    fire_countdown: f32,
    is_firing: bool,
    is_launching_missile: bool,

    fire_rate_level: u32,
    spread_level: u32,
    missile_ammo: u32,

    /// Cleared when the aircraft leaves the battlefield instead of being shot down
    show_explosion: bool,
    explosion_elapsed: f32,
    played_explosion_sound: bool,
    spawned_pickup: bool,
    drop_chance: f64,

    /// Movement pattern progress
    travelled_distance: f32,
    direction_index: usize,

    health_display: Option<NodeId>,
    missile_display: Option<NodeId>,
}

impl Aircraft {
    /// The player's aircraft starts from `loadout`; enemies always use the base loadout.
    pub fn new(kind: AircraftKind, loadout: &PlayerLoadout) -> Self {
        let data = kind.data();
        let loadout = if kind.is_allied() {
            *loadout
        } else {
            PlayerLoadout::default()
        };

        Self {
            kind,
            entity: Entity::new(data.hitpoints),
            sprite: data.sprite,
            fire_countdown: 0.0,
            is_firing: false,
            is_launching_missile: false,
            fire_rate_level: loadout.fire_rate_level,
            spread_level: loadout.spread_level,
            missile_ammo: loadout.missile_ammo,
            show_explosion: true,
            explosion_elapsed: 0.0,
            played_explosion_sound: false,
            spawned_pickup: false,
            drop_chance: DEFAULT_DROP_CHANCE,
            travelled_distance: 0.0,
            direction_index: 0,
            health_display: None,
            missile_display: None,
        }
    }

    pub fn with_drop_chance(mut self, chance: f64) -> Self {
        self.drop_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn kind(&self) -> AircraftKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        if self.kind.is_allied() {
            Category::PLAYER_AIRCRAFT
        } else {
            Category::ENEMY_AIRCRAFT
        }
    }

    pub fn is_allied(&self) -> bool {
        self.kind.is_allied()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn hitpoints(&self) -> i32 {
        self.entity.hitpoints()
    }

    pub fn damage(&mut self, points: i32) {
        self.entity.damage(points);
    }

    pub fn repair(&mut self, points: i32) {
        self.entity.repair(points);
    }

    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.entity.is_destroyed()
    }

    /// Silent removal: no explosion is shown
    pub fn remove(&mut self) {
        self.entity.destroy();
        self.show_explosion = false;
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.is_destroyed() && (self.explosion_finished() || !self.show_explosion)
    }

    fn explosion_finished(&self) -> bool {
        self.explosion_elapsed >= EXPLOSION_DURATION
    }

    pub fn max_speed(&self) -> f32 {
        self.kind.data().speed
    }

    pub fn size(&self) -> Vec2 {
        self.kind.data().sprite.size()
    }

    pub fn fire_rate_level(&self) -> u32 {
        self.fire_rate_level
    }

    pub fn spread_level(&self) -> u32 {
        self.spread_level
    }

    pub fn missile_ammo(&self) -> u32 {
        self.missile_ammo
    }

    pub fn loadout(&self) -> PlayerLoadout {
        PlayerLoadout {
            fire_rate_level: self.fire_rate_level,
            spread_level: self.spread_level,
            missile_ammo: self.missile_ammo,
        }
    }

    pub fn increase_fire_rate(&mut self) {
        if self.fire_rate_level < MAX_FIRE_RATE_LEVEL {
            self.fire_rate_level += 1;
        }
    }

    pub fn increase_spread(&mut self) {
        if self.spread_level < MAX_SPREAD_LEVEL {
            self.spread_level += 1;
        }
    }

    pub fn collect_missiles(&mut self, count: u32) {
        self.missile_ammo += count;
    }

    /// Request a shot; aircraft without a gun ignore it
    pub fn fire(&mut self) {
        if self.kind.data().fire_interval.is_some() {
            self.is_firing = true;
        }
    }

    pub fn launch_missile(&mut self) {
        if self.missile_ammo > 0 {
            self.is_launching_missile = true;
            self.missile_ammo -= 1;
        }
    }

    pub(crate) fn update(
        &mut self,
        transform: &mut Transform,
        world_position: Vec2,
        dt: f32,
        commands: &mut CommandQueue,
        rng: &mut Pcg32,
    ) {
        self.update_roll_animation();

        if self.is_destroyed() {
            self.check_pickup_drop(world_position, commands, rng);
            self.explosion_elapsed += dt;

            if !self.played_explosion_sound {
                let effect = if rng.random_bool(0.5) {
                    SoundEffect::Explosion1
                } else {
                    SoundEffect::Explosion2
                };
                commands.push(Command::play_sound(effect, world_position));
                self.played_explosion_sound = true;
            }
            return;
        }

        self.check_projectile_launch(world_position, dt, commands);
        self.update_movement_pattern(dt);
        transform.translate(self.entity.step(dt));
    }

    fn check_pickup_drop(&mut self, position: Vec2, commands: &mut CommandQueue, rng: &mut Pcg32) {
        if !self.is_allied() && !self.spawned_pickup && rng.random_bool(self.drop_chance) {
            let kind = PickupKind::ALL[rng.random_range(0..PickupKind::ALL.len())];
            commands.push(Command::spawn(vec![Spawn::Pickup { kind, position }]));
        }
        self.spawned_pickup = true;
    }

    fn check_projectile_launch(&mut self, position: Vec2, dt: f32, commands: &mut CommandQueue) {
        // Enemies try to fire all the time
        if !self.is_allied() {
            self.fire();
        }

        if let Some(interval) = self.kind.data().fire_interval {
            if self.is_firing && self.fire_countdown <= 0.0 {
                commands.push(Command::spawn(self.bullet_spawns(position)));
                let effect = if self.is_allied() {
                    SoundEffect::AlliedGunfire
                } else {
                    SoundEffect::EnemyGunfire
                };
                commands.push(Command::play_sound(effect, position));
                self.fire_countdown += interval / (self.fire_rate_level as f32 + 1.0);
            } else if self.fire_countdown > 0.0 {
                self.fire_countdown -= dt;
            }
        }
        self.is_firing = false;

        if self.is_launching_missile {
            commands.push(Command::spawn(vec![self.projectile_spawn(
                ProjectileKind::Missile,
                position,
                Vec2::new(0.0, 0.5),
            )]));
            commands.push(Command::play_sound(SoundEffect::LaunchMissile, position));
            self.is_launching_missile = false;
        }
    }

    /// Bullets for the current spread level, offsets in fractions of the sprite size
    fn bullet_spawns(&self, position: Vec2) -> Vec<Spawn> {
        let kind = if self.is_allied() {
            ProjectileKind::AlliedBullet
        } else {
            ProjectileKind::EnemyBullet
        };
        let offsets: &[Vec2] = match self.spread_level {
            1 => &[Vec2::new(0.0, 0.5)],
            2 => &[Vec2::new(-0.33, 0.33), Vec2::new(0.33, 0.33)],
            _ => &[Vec2::new(-0.5, 0.33), Vec2::new(0.0, 0.5), Vec2::new(0.5, 0.33)],
        };
        offsets
            .iter()
            .map(|offset| self.projectile_spawn(kind, position, *offset))
            .collect()
    }

    fn projectile_spawn(&self, kind: ProjectileKind, position: Vec2, offset: Vec2) -> Spawn {
        // Allied shots travel up the screen, enemy shots down
        let sign = if self.is_allied() { -1.0 } else { 1.0 };
        let size = self.sprite.size();
        Spawn::Projectile {
            kind,
            position: position + offset * size * sign,
            velocity: Vec2::new(0.0, kind.data().speed * sign),
        }
    }

    fn update_movement_pattern(&mut self, dt: f32) {
        let directions = self.kind.data().directions;
        if directions.is_empty() {
            return;
        }

        if self.travelled_distance > directions[self.direction_index].distance {
            self.direction_index = (self.direction_index + 1) % directions.len();
            self.travelled_distance = 0.0;
        }

        let speed = self.max_speed();
        self.entity.velocity = heading_to_direction(directions[self.direction_index].angle) * speed;
        self.travelled_distance += speed * dt;
    }

    /// Banking frames sit right of the level frame in the atlas
    fn update_roll_animation(&mut self) {
        let data = self.kind.data();
        if !data.has_roll_animation {
            return;
        }
        let mut rect = data.sprite.rect;
        if self.entity.velocity.x < 0.0 {
            rect.left += rect.width;
        } else if self.entity.velocity.x > 0.0 {
            rect.left += 2.0 * rect.width;
        }
        self.sprite.rect = rect;
    }

    pub fn sprite(&self) -> Sprite {
        self.sprite
    }

    /// Current explosion frame while the wreck is still burning
    pub fn explosion_frame(&self) -> Option<Sprite> {
        if !self.is_destroyed() || !self.show_explosion || self.explosion_finished() {
            return None;
        }
        let progress = self.explosion_elapsed / EXPLOSION_DURATION;
        let frame = ((progress * EXPLOSION_FRAMES as f32) as u32).min(EXPLOSION_FRAMES - 1);
        Some(Sprite::new(
            TextureId::Explosion,
            Rect::new(
                (frame % EXPLOSION_COLUMNS) as f32 * EXPLOSION_FRAME_SIZE,
                (frame / EXPLOSION_COLUMNS) as f32 * EXPLOSION_FRAME_SIZE,
                EXPLOSION_FRAME_SIZE,
                EXPLOSION_FRAME_SIZE,
            ),
        ))
    }

    pub fn draw(&self, world: &Affine2, target: &mut dyn RenderTarget) {
        let sprite = if self.is_destroyed() {
            match self.explosion_frame() {
                Some(frame) => frame,
                None => return,
            }
        } else {
            self.sprite
        };
        let centered = *world * Affine2::from_translation(-sprite.size() / 2.0);
        target.draw_sprite(&sprite, &centered);
    }

    /// Label text and local transforms, counter-rotated so they stay upright
    pub(crate) fn labels(&self, rotation: f32) -> Vec<(NodeId, String, Transform)> {
        let upright = |offset: Vec2| Transform {
            position: offset,
            rotation: -rotation,
            scale: Vec2::ONE,
        };

        let mut labels = Vec::with_capacity(2);
        if let Some(id) = self.health_display {
            let text = if self.is_destroyed() {
                String::new()
            } else {
                format!("{} HP", self.hitpoints())
            };
            labels.push((id, text, upright(HEALTH_LABEL_OFFSET)));
        }
        if let Some(id) = self.missile_display {
            let text = if self.is_destroyed() {
                String::new()
            } else {
                format!("M: {}", self.missile_ammo)
            };
            labels.push((id, text, upright(MISSILE_LABEL_OFFSET)));
        }
        labels
    }
}

/// Attach an aircraft under `parent` together with its label nodes
pub fn attach_aircraft(
    graph: &mut SceneGraph,
    parent: NodeId,
    aircraft: Aircraft,
    transform: Transform,
) -> NodeId {
    let is_player = aircraft.is_allied();
    let id = graph.attach_child(parent, SceneNode::new(NodeKind::Aircraft(aircraft)).with_transform(transform));

    let health = graph.attach_child(id, SceneNode::new(NodeKind::Text(TextNode::default())));
    let missiles =
        is_player.then(|| graph.attach_child(id, SceneNode::new(NodeKind::Text(TextNode::default()))));

    if let Some(aircraft) = graph.get_mut(id).and_then(SceneNode::as_aircraft_mut) {
        aircraft.health_display = Some(health);
        aircraft.missile_display = missiles;
    }
    id
}
