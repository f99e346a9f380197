//! Level driver
//!
//! A `World` is one level's playthrough: it builds the scene, scrolls the view
//! up the level, feeds commands to the scene graph, resolves collisions,
//! spawns enemies as they come into range and reports sounds to the audio
//! collaborator. Level transitions are decided by the caller by polling
//! [`World::has_alive_player`] and [`World::has_player_reached_end`].

use std::f32::consts::SQRT_2;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::aircraft::{Aircraft, ENEMY_ROTATION, attach_aircraft};
use super::category::Category;
use super::collision::handle_collisions;
use super::command::{Action, AircraftAction, Command, CommandQueue, EntityAction, ProjectileAction};
use super::data::{AircraftKind, ParticleKind, Sprite, TextureId};
use super::geometry::{Rect, Transform};
use super::node::{Dispatch, NodeId, NodeKind, SceneGraph, SceneNode};
use super::particles::ParticleNode;
use super::progress::{GameProgress, PlayerLoadout};
use super::scenery::{SoundNode, SpriteNode};
use super::spawn::{LevelTable, SpawnSchedule};
use crate::audio::SoundPlayer;
use crate::renderer::RenderTarget;
use crate::settings::Settings;

/// Height of the finish line strip drawn above the level
const FINISH_LINE_HEIGHT: f32 = 76.0;

/// Render layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    /// Projectiles, pickups and particles
    LowerAir,
    /// Aircraft
    UpperAir,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::LowerAir, Layer::UpperAir];

    fn category(self) -> Category {
        match self {
            Layer::LowerAir => Category::SCENE_AIR_LAYER,
            Layer::Background | Layer::UpperAir => Category::NONE,
        }
    }
}

fn background_texture(level: u32) -> TextureId {
    match level {
        1 => TextureId::Jungle,
        2 => TextureId::Space1,
        3 => TextureId::Space2,
        _ => TextureId::Space3,
    }
}

pub struct World<S: SoundPlayer> {
    settings: Settings,
    level: u32,
    progress: GameProgress,

    graph: SceneGraph,
    layers: [NodeId; 3],
    commands: CommandQueue,
    dispatch: Dispatch,
    rng: Pcg32,

    view_center: Vec2,
    world_bounds: Rect,
    spawn_position: Vec2,
    scroll_speed: f32,

    player: NodeId,
    sound_node: NodeId,
    schedule: SpawnSchedule,
    sounds: S,
}

impl<S: SoundPlayer> World<S> {
    /// Build the level named by `progress.level()` and advance the counter past it
    pub fn new(settings: &Settings, levels: &LevelTable, mut progress: GameProgress, sounds: S) -> Self {
        let level = progress.level();
        let view_size = settings.view_size;
        let world_bounds = Rect::new(0.0, 0.0, view_size.x, settings.world_height);
        let spawn_position = Vec2::new(
            view_size.x / 2.0,
            world_bounds.bottom() - view_size.y / 2.0,
        );

        let loadout = progress.loadout();
        progress.advance_level();

        let mut world = Self {
            settings: settings.clone(),
            level,
            progress,
            graph: SceneGraph::new(),
            layers: [NodeId::DANGLING; 3],
            commands: CommandQueue::new(),
            dispatch: Dispatch::default(),
            rng: Pcg32::seed_from_u64(settings.seed.wrapping_add(level as u64)),
            view_center: spawn_position,
            world_bounds,
            spawn_position,
            scroll_speed: settings.scroll_speed_for(level),
            player: NodeId::DANGLING,
            sound_node: NodeId::DANGLING,
            schedule: SpawnSchedule::from_records(levels.enemies_for(level), spawn_position),
            sounds,
        };
        world.build_scene(&loadout);

        log::info!(
            "Built level {} with {} scheduled enemies, scroll speed {}",
            level,
            world.schedule.len(),
            world.scroll_speed
        );
        world
    }

    fn build_scene(&mut self, loadout: &PlayerLoadout) {
        let root = self.graph.root();
        for layer in Layer::ALL {
            self.layers[layer as usize] = self.graph.attach_child(root, SceneNode::group(layer.category()));
        }

        let view_height = self.settings.view_size.y;
        let background = Sprite::new(
            background_texture(self.level),
            Rect::new(0.0, 0.0, self.world_bounds.width, self.world_bounds.height + view_height),
        );
        self.graph.attach_child(
            self.layer(Layer::Background),
            SceneNode::new(NodeKind::Sprite(SpriteNode::new(background)))
                .at(Vec2::new(self.world_bounds.left, self.world_bounds.top - view_height)),
        );

        let finish_line = Sprite::new(
            TextureId::FinishLine,
            Rect::new(0.0, 0.0, self.world_bounds.width, FINISH_LINE_HEIGHT),
        );
        self.graph.attach_child(
            self.layer(Layer::Background),
            SceneNode::new(NodeKind::Sprite(SpriteNode::new(finish_line)))
                .at(Vec2::new(0.0, -FINISH_LINE_HEIGHT)),
        );

        for kind in [ParticleKind::Smoke, ParticleKind::Propellant] {
            self.graph.attach_child(
                self.layer(Layer::LowerAir),
                SceneNode::new(NodeKind::Particles(ParticleNode::new(kind))),
            );
        }

        self.sound_node = self.graph.attach_child(root, SceneNode::new(NodeKind::Sound(SoundNode::default())));

        let upper_air = self.layer(Layer::UpperAir);
        self.player = attach_aircraft(
            &mut self.graph,
            upper_air,
            Aircraft::new(AircraftKind::Eagle, loadout),
            Transform::at(self.spawn_position),
        );
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32) {
        self.view_center.y += self.scroll_speed * dt;
        if let Some(player) = self.player_aircraft_mut() {
            player.entity_mut().velocity = Vec2::ZERO;
        }

        self.destroy_entities_outside_view();
        self.guide_missiles();

        while let Some(command) = self.commands.pop() {
            self.graph.on_command(&command, &mut self.dispatch);
        }
        self.adapt_player_velocity();

        handle_collisions(
            &mut self.graph,
            &mut self.progress,
            &mut self.commands,
            &self.settings.collision,
        );
        let removed = self.graph.remove_wrecks();
        if removed > 0 {
            log::debug!("Pruned {} nodes", removed);
        }

        self.spawn_enemies();

        self.graph.update(dt, &mut self.commands, &mut self.rng);
        self.adapt_player_position();
        self.update_sounds();

        if let Some(loadout) = self.player().map(Aircraft::loadout) {
            self.progress.record_loadout(loadout);
        }
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.graph.draw(target);
    }

    fn destroy_entities_outside_view(&mut self) {
        self.commands.push(Command::new(
            Category::PROJECTILE | Category::ENEMY_AIRCRAFT,
            Action::Entity(EntityAction::RemoveIfOutside(self.battlefield_bounds())),
        ));
    }

    fn guide_missiles(&mut self) {
        self.dispatch.active_enemies.clear();
        self.commands.push(Command::new(
            Category::ENEMY_AIRCRAFT,
            Action::Aircraft(AircraftAction::CollectIfAlive),
        ));
        self.commands.push(Command::new(
            Category::ALLIED_PROJECTILE,
            Action::Projectile(ProjectileAction::GuideTowardsNearestEnemy),
        ));
    }

    fn adapt_player_velocity(&mut self) {
        let scroll_speed = self.scroll_speed;
        if let Some(player) = self.player_aircraft_mut() {
            let velocity = &mut player.entity_mut().velocity;
            // Diagonal input should not be faster than straight input
            if velocity.x != 0.0 && velocity.y != 0.0 {
                *velocity /= SQRT_2;
            }
            velocity.y += scroll_speed;
        }
    }

    fn spawn_enemies(&mut self) {
        let top = self.battlefield_bounds().top;
        let parent = self.layer(Layer::UpperAir);
        while let Some(point) = self.schedule.pop_visible(top) {
            let enemy = Aircraft::new(point.kind, &PlayerLoadout::default())
                .with_drop_chance(self.settings.pickup_drop_chance);
            let transform = Transform {
                rotation: ENEMY_ROTATION,
                ..Transform::at(point.position)
            };
            attach_aircraft(&mut self.graph, parent, enemy, transform);
            log::debug!("Spawned {:?} at {}", point.kind, point.position);
        }
    }

    /// Keep the player inside the view, minus a border
    fn adapt_player_position(&mut self) {
        let view = self.view_bounds();
        let border = self.settings.border_distance;
        if let Some(node) = self.graph.get_mut(self.player) {
            let position = &mut node.transform.position;
            position.x = position.x.max(view.left + border).min(view.right() - border);
            position.y = position.y.max(view.top + border).min(view.bottom() - border);
        }
    }

    fn update_sounds(&mut self) {
        let pending = self
            .graph
            .get_mut(self.sound_node)
            .and_then(SceneNode::as_sound_mut)
            .map(SoundNode::take_pending)
            .unwrap_or_default();
        for (effect, position) in pending {
            self.sounds.play(effect, position);
        }

        if let Some(position) = self.graph.world_position(self.player) {
            self.sounds.set_listener_position(position);
        }
        self.sounds.remove_stopped_sounds();
    }

    /// Commands queued here are dispatched at the start of the next update
    pub fn command_queue(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    /// True until the player's wreck has finished exploding
    pub fn has_alive_player(&self) -> bool {
        self.graph
            .get(self.player)
            .is_some_and(|node| !node.is_marked_for_removal())
    }

    /// True once the player has flown past the top of the level
    pub fn has_player_reached_end(&self) -> bool {
        self.graph
            .world_position(self.player)
            .is_some_and(|position| !self.world_bounds.contains(position))
    }

    /// Level this world plays
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn into_progress(self) -> GameProgress {
        self.progress
    }

    pub fn player_id(&self) -> NodeId {
        self.player
    }

    pub fn player(&self) -> Option<&Aircraft> {
        self.graph.get(self.player).and_then(SceneNode::as_aircraft)
    }

    fn player_aircraft_mut(&mut self) -> Option<&mut Aircraft> {
        self.graph.get_mut(self.player).and_then(SceneNode::as_aircraft_mut)
    }

    pub fn layer(&self, layer: Layer) -> NodeId {
        self.layers[layer as usize]
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    pub fn sounds(&self) -> &S {
        &self.sounds
    }

    pub fn world_bounds(&self) -> Rect {
        self.world_bounds
    }

    pub fn view_bounds(&self) -> Rect {
        let size = self.settings.view_size;
        Rect::new(
            self.view_center.x - size.x / 2.0,
            self.view_center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    /// View extended upward by the lookahead margin
    pub fn battlefield_bounds(&self) -> Rect {
        let margin = self.settings.battlefield_margin;
        let mut bounds = self.view_bounds();
        bounds.top -= margin;
        bounds.height += margin;
        bounds
    }
}
