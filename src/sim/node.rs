//! Scene graph: an arena of nodes linked parent-to-children by handles
//!
//! Every node owns its children through the arena; removing a node frees its
//! whole subtree and bumps the slot generation, so handles held elsewhere
//! (the world's player handle, for instance) go stale instead of dangling.

use std::collections::BTreeSet;

use glam::{Affine2, Vec2};
use rand_pcg::Pcg32;

use super::aircraft::Aircraft;
use super::category::Category;
use super::collision::CollisionPair;
use super::command::{
    Action, AircraftAction, Command, CommandQueue, EntityAction, LayerAction, ParticleAction,
    ProjectileAction, SoundAction, Spawn,
};
use super::entity::Entity;
use super::geometry::{Rect, Transform};
use super::particles::{EmitterNode, ParticleNode};
use super::pickup::Pickup;
use super::projectile::Projectile;
use super::scenery::{SoundNode, SpriteNode, TextNode};
use crate::renderer::RenderTarget;

/// Generational handle to a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// A handle that never resolves
    pub const DANGLING: NodeId = NodeId {
        index: u32::MAX,
        generation: u32::MAX,
    };
}

/// Type-specific payload of a node
#[derive(Debug)]
pub enum NodeKind {
    /// Plain grouping node (scene root, render layers)
    Group,
    Sprite(SpriteNode),
    Text(TextNode),
    Sound(SoundNode),
    Particles(ParticleNode),
    Emitter(EmitterNode),
    Aircraft(Aircraft),
    Projectile(Projectile),
    Pickup(Pickup),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Sprite(_) => "sprite",
            NodeKind::Text(_) => "text",
            NodeKind::Sound(_) => "sound",
            NodeKind::Particles(_) => "particles",
            NodeKind::Emitter(_) => "emitter",
            NodeKind::Aircraft(_) => "aircraft",
            NodeKind::Projectile(_) => "projectile",
            NodeKind::Pickup(_) => "pickup",
        }
    }

    fn default_category(&self) -> Category {
        match self {
            NodeKind::Sound(_) => Category::SOUND_EFFECT,
            NodeKind::Particles(_) => Category::PARTICLE_SYSTEM,
            NodeKind::Aircraft(aircraft) => aircraft.category(),
            NodeKind::Projectile(projectile) => projectile.category(),
            NodeKind::Pickup(_) => Category::PICKUP,
            NodeKind::Group | NodeKind::Sprite(_) | NodeKind::Text(_) | NodeKind::Emitter(_) => {
                Category::NONE
            }
        }
    }

    pub fn entity(&self) -> Option<&Entity> {
        match self {
            NodeKind::Aircraft(aircraft) => Some(aircraft.entity()),
            NodeKind::Projectile(projectile) => Some(projectile.entity()),
            NodeKind::Pickup(pickup) => Some(pickup.entity()),
            _ => None,
        }
    }

    pub fn entity_mut(&mut self) -> Option<&mut Entity> {
        match self {
            NodeKind::Aircraft(aircraft) => Some(aircraft.entity_mut()),
            NodeKind::Projectile(projectile) => Some(projectile.entity_mut()),
            NodeKind::Pickup(pickup) => Some(pickup.entity_mut()),
            _ => None,
        }
    }

    /// Destroy without the usual death effects (off-screen cleanup)
    fn remove(&mut self) {
        match self {
            NodeKind::Aircraft(aircraft) => aircraft.remove(),
            other => {
                if let Some(entity) = other.entity_mut() {
                    entity.destroy();
                }
            }
        }
    }

    /// Bounds in local space; empty for nodes that never collide
    fn local_bounds(&self) -> Rect {
        match self {
            NodeKind::Aircraft(aircraft) => Rect::centered(aircraft.size()),
            NodeKind::Projectile(projectile) => Rect::centered(projectile.size()),
            NodeKind::Pickup(pickup) => Rect::centered(pickup.size()),
            _ => Rect::EMPTY,
        }
    }
}

/// A node: local transform, immutable category, children and payload
#[derive(Debug)]
pub struct SceneNode {
    pub transform: Transform,
    category: Category,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        let category = kind.default_category();
        Self {
            transform: Transform::default(),
            category,
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Grouping node with an explicit category (render layers)
    pub fn group(category: Category) -> Self {
        Self {
            category,
            ..Self::new(NodeKind::Group)
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_destroyed(&self) -> bool {
        self.kind.entity().is_some_and(Entity::is_destroyed)
    }

    /// Wrecks are removed by the next pruning pass
    pub fn is_marked_for_removal(&self) -> bool {
        match &self.kind {
            NodeKind::Aircraft(aircraft) => aircraft.is_marked_for_removal(),
            _ => self.is_destroyed(),
        }
    }

    pub fn bounding_rect(&self, world: &Affine2) -> Rect {
        let local = self.kind.local_bounds();
        if local.is_empty() {
            Rect::EMPTY
        } else {
            local.transformed(world)
        }
    }

    pub fn as_aircraft(&self) -> Option<&Aircraft> {
        match &self.kind {
            NodeKind::Aircraft(aircraft) => Some(aircraft),
            _ => None,
        }
    }

    pub fn as_aircraft_mut(&mut self) -> Option<&mut Aircraft> {
        match &mut self.kind {
            NodeKind::Aircraft(aircraft) => Some(aircraft),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            NodeKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn as_projectile_mut(&mut self) -> Option<&mut Projectile> {
        match &mut self.kind {
            NodeKind::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    pub fn as_pickup_mut(&mut self) -> Option<&mut Pickup> {
        match &mut self.kind {
            NodeKind::Pickup(pickup) => Some(pickup),
            _ => None,
        }
    }

    pub fn as_sound_mut(&mut self) -> Option<&mut SoundNode> {
        match &mut self.kind {
            NodeKind::Sound(sound) => Some(sound),
            _ => None,
        }
    }

    fn update_current(
        &mut self,
        parent_world: &Affine2,
        dt: f32,
        commands: &mut CommandQueue,
        rng: &mut Pcg32,
    ) {
        let world = *parent_world * self.transform.to_affine();
        match &mut self.kind {
            NodeKind::Aircraft(aircraft) => {
                aircraft.update(&mut self.transform, world.translation, dt, commands, rng)
            }
            NodeKind::Projectile(projectile) => projectile.update(&mut self.transform, dt),
            NodeKind::Pickup(pickup) => self.transform.translate(pickup.entity().step(dt)),
            NodeKind::Particles(particles) => particles.update(dt),
            NodeKind::Emitter(emitter) => emitter.update(world.translation, dt, commands),
            NodeKind::Group | NodeKind::Sprite(_) | NodeKind::Text(_) | NodeKind::Sound(_) => {}
        }
    }

    fn on_action(
        &mut self,
        id: NodeId,
        world: &Affine2,
        action: &Action,
        dispatch: &mut Dispatch,
    ) {
        let handled = match action {
            Action::Entity(EntityAction::RemoveIfOutside(bounds)) => {
                if self.kind.entity().is_none() {
                    false
                } else {
                    if !bounds.intersects(&self.bounding_rect(world)) {
                        self.kind.remove();
                    }
                    true
                }
            }
            Action::Aircraft(op) => match self.as_aircraft_mut() {
                Some(aircraft) => {
                    match op {
                        AircraftAction::Accelerate(direction) => {
                            let speed = aircraft.max_speed();
                            aircraft.entity_mut().accelerate(*direction * speed);
                        }
                        AircraftAction::Fire => aircraft.fire(),
                        AircraftAction::LaunchMissile => aircraft.launch_missile(),
                        AircraftAction::CollectIfAlive => {
                            if !aircraft.is_destroyed() {
                                dispatch.active_enemies.push(world.translation);
                            }
                        }
                    }
                    true
                }
                None => false,
            },
            Action::Projectile(ProjectileAction::GuideTowardsNearestEnemy) => {
                match self.as_projectile_mut() {
                    Some(projectile) => {
                        if projectile.is_guided() {
                            let position = world.translation;
                            let closest = dispatch
                                .active_enemies
                                .iter()
                                .copied()
                                .min_by(|a, b| a.distance(position).total_cmp(&b.distance(position)));
                            if let Some(target) = closest {
                                projectile.guide_towards(target - position);
                            }
                        }
                        true
                    }
                    None => false,
                }
            }
            Action::Layer(LayerAction::Attach(spawns)) => match self.kind {
                NodeKind::Group => {
                    dispatch
                        .pending
                        .extend(spawns.iter().map(|spawn| (id, *spawn)));
                    true
                }
                _ => false,
            },
            Action::Particles(ParticleAction::Emit { kind, positions }) => match &mut self.kind {
                NodeKind::Particles(particles) => {
                    if particles.kind() == *kind {
                        for position in positions {
                            particles.add_particle(*position);
                        }
                    }
                    true
                }
                _ => false,
            },
            Action::Sound(SoundAction::Play { effect, position }) => match self.as_sound_mut() {
                Some(sound) => {
                    sound.play(*effect, *position);
                    true
                }
                None => false,
            },
        };

        if !handled {
            log::warn!(
                "{} command reached incompatible {} node (category {:?})",
                action.name(),
                self.kind.name(),
                self.category
            );
        }
    }

    fn draw_current(&self, world: &Affine2, target: &mut dyn RenderTarget) {
        match &self.kind {
            NodeKind::Sprite(sprite) => target.draw_sprite(&sprite.sprite, world),
            NodeKind::Text(text) => {
                if !text.text().is_empty() {
                    target.draw_text(text.text(), world);
                }
            }
            NodeKind::Particles(particles) => particles.draw(target),
            NodeKind::Aircraft(aircraft) => aircraft.draw(world, target),
            NodeKind::Projectile(projectile) => projectile.draw(world, target),
            NodeKind::Pickup(pickup) => pickup.draw(world, target),
            NodeKind::Group | NodeKind::Sound(_) | NodeKind::Emitter(_) => {}
        }
    }
}

/// Scratch state shared by every command drained in one frame
#[derive(Debug, Default)]
pub struct Dispatch {
    /// World positions of live enemies, rebuilt each frame for missile guidance
    pub active_enemies: Vec<Vec2>,
    pending: Vec<(NodeId, Spawn)>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Arena-backed tree of scene nodes
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::DANGLING,
            live: 0,
        };
        graph.root = graph.insert(SceneNode::group(Category::NONE));
        graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Mutable access to two distinct nodes at once
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> Option<(&mut SceneNode, &mut SceneNode)> {
        if a.index == b.index || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (ia, ib) = (a.index as usize, b.index as usize);
        let (low, high) = self.slots.split_at_mut(ia.max(ib));
        let (slot_a, slot_b) = if ia < ib {
            (&mut low[ia], &mut high[0])
        } else {
            (&mut high[0], &mut low[ib])
        };
        Some((slot_a.node.as_mut()?, slot_b.node.as_mut()?))
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Transfer `node` into `parent`'s child list (appended).
    ///
    /// A stale parent handle attaches the node to the root instead.
    pub fn attach_child(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let parent = if self.contains(parent) {
            parent
        } else {
            log::warn!("attach_child: stale parent {:?}, attaching to root", parent);
            self.root
        };
        node.parent = Some(parent);
        let id = self.insert(node);
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(id);
        }
        id
    }

    pub(crate) fn attach_spawn(&mut self, parent: NodeId, spawn: Spawn) -> NodeId {
        match spawn {
            Spawn::Projectile {
                kind,
                position,
                velocity,
            } => {
                let (node, children) = Projectile::build(kind, position, velocity);
                let id = self.attach_child(parent, node);
                for child in children {
                    self.attach_child(id, child);
                }
                id
            }
            Spawn::Pickup { kind, position } => self.attach_child(parent, Pickup::build(kind, position)),
        }
    }

    /// Composition of the node's transform with all of its ancestors'
    pub fn world_transform(&self, id: NodeId) -> Option<Affine2> {
        let node = self.get(id)?;
        let mut transform = node.transform.to_affine();
        let mut current = node.parent;
        while let Some(parent_id) = current {
            let parent = self.get(parent_id)?;
            transform = parent.transform.to_affine() * transform;
            current = parent.parent;
        }
        Some(transform)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec2> {
        self.world_transform(id).map(|t| t.translation)
    }

    pub fn bounding_rect(&self, id: NodeId) -> Rect {
        match (self.get(id), self.world_transform(id)) {
            (Some(node), Some(world)) => node.bounding_rect(&world),
            _ => Rect::EMPTY,
        }
    }

    pub fn category_of(&self, id: NodeId) -> Option<Category> {
        self.get(id).map(SceneNode::category)
    }

    /// Node ids in pre-order (parent before children, children in attach order)
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.live);
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                order.push(id);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// Recursive update, self before children
    pub fn update(&mut self, dt: f32, commands: &mut CommandQueue, rng: &mut Pcg32) {
        self.update_node(self.root, Affine2::IDENTITY, dt, commands, rng);
    }

    fn update_node(
        &mut self,
        id: NodeId,
        parent_world: Affine2,
        dt: f32,
        commands: &mut CommandQueue,
        rng: &mut Pcg32,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.update_current(&parent_world, dt, commands, rng);
        let world = parent_world * node.transform.to_affine();
        let labels = node
            .as_aircraft()
            .map(|aircraft| aircraft.labels(node.transform.rotation))
            .unwrap_or_default();
        let children = node.children.clone();

        for (label_id, text, transform) in labels {
            if let Some(label) = self.get_mut(label_id) {
                label.transform = transform;
                if let NodeKind::Text(node_text) = &mut label.kind {
                    node_text.set_text(text);
                }
            }
        }

        for child in children {
            self.update_node(child, world, dt, commands, rng);
        }
    }

    /// Dispatch `command` to every node whose category intersects its mask.
    ///
    /// Children are always visited, whether or not their parent matched.
    /// Spawns requested by layer nodes are attached once the pass completes.
    pub fn on_command(&mut self, command: &Command, dispatch: &mut Dispatch) {
        self.dispatch_node(self.root, Affine2::IDENTITY, command, dispatch);
        let pending: Vec<_> = dispatch.pending.drain(..).collect();
        for (parent, spawn) in pending {
            self.attach_spawn(parent, spawn);
        }
    }

    fn dispatch_node(
        &mut self,
        id: NodeId,
        parent_world: Affine2,
        command: &Command,
        dispatch: &mut Dispatch,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let world = parent_world * node.transform.to_affine();
        // Wrecks are out of play until pruned
        if node.category.intersects(command.category) && !node.is_destroyed() {
            node.on_action(id, &world, &command.action, dispatch);
        }
        let children = node.children.clone();
        for child in children {
            self.dispatch_node(child, world, command, dispatch);
        }
    }

    /// Collect every pair of live nodes whose bounding rectangles overlap
    pub fn check_scene_collision(&self, pairs: &mut BTreeSet<CollisionPair>) {
        let candidates: Vec<(NodeId, Rect)> = self
            .preorder()
            .into_iter()
            .filter_map(|id| {
                let node = self.get(id)?;
                if node.is_destroyed() {
                    return None;
                }
                let bounds = node.bounding_rect(&self.world_transform(id)?);
                (!bounds.is_empty()).then_some((id, bounds))
            })
            .collect();

        for (i, (a, bounds_a)) in candidates.iter().enumerate() {
            for (b, bounds_b) in &candidates[i + 1..] {
                if bounds_a.intersects(bounds_b) {
                    pairs.insert(CollisionPair::new(*a, *b));
                }
            }
        }
    }

    /// Prune every subtree whose root is marked for removal; returns nodes freed
    pub fn remove_wrecks(&mut self) -> usize {
        self.remove_wrecks_below(self.root)
    }

    fn remove_wrecks_below(&mut self, id: NodeId) -> usize {
        let Some(node) = self.get(id) else {
            return 0;
        };
        let (wrecks, survivors): (Vec<NodeId>, Vec<NodeId>) = node
            .children
            .iter()
            .copied()
            .partition(|child| self.get(*child).is_some_and(SceneNode::is_marked_for_removal));

        let mut removed = 0;
        for wreck in wrecks {
            removed += self.free_subtree(wreck);
        }
        if let Some(node) = self.get_mut(id) {
            node.children = survivors.clone();
        }
        for survivor in survivors {
            removed += self.remove_wrecks_below(survivor);
        }
        removed
    }

    fn free_subtree(&mut self, id: NodeId) -> usize {
        let Some(slot) = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
        else {
            return 0;
        };
        let Some(node) = slot.node.take() else {
            return 0;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;

        1 + node
            .children
            .into_iter()
            .map(|child| self.free_subtree(child))
            .sum::<usize>()
    }

    /// Draw self then children, in child-list order
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        self.draw_node(self.root, Affine2::IDENTITY, target);
    }

    fn draw_node(&self, id: NodeId, parent_world: Affine2, target: &mut dyn RenderTarget) {
        let Some(node) = self.get(id) else {
            return;
        };
        let world = parent_world * node.transform.to_affine();
        node.draw_current(&world, target);
        for child in &node.children {
            self.draw_node(*child, world, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::renderer::{DrawCall, DrawRecorder};
    use crate::sim::aircraft::attach_aircraft;
    use crate::sim::data::{AircraftKind, PickupKind, Sprite, TextureId};
    use crate::sim::progress::PlayerLoadout;
    use std::f32::consts::PI;

    fn sound_command(category: Category) -> Command {
        Command::new(
            category,
            Action::Sound(SoundAction::Play {
                effect: SoundEffect::CollectPickup,
                position: Vec2::ZERO,
            }),
        )
    }

    fn pending_sounds(graph: &mut SceneGraph, id: NodeId) -> usize {
        graph
            .get_mut(id)
            .and_then(SceneNode::as_sound_mut)
            .map(|sound| sound.take_pending().len())
            .unwrap_or(0)
    }

    #[test]
    fn test_world_transform_composes_ancestors() {
        let mut graph = SceneGraph::new();
        let parent = graph.attach_child(
            graph.root(),
            SceneNode::group(Category::NONE).with_transform(Transform {
                position: Vec2::new(100.0, 100.0),
                rotation: PI,
                scale: Vec2::ONE,
            }),
        );
        let child = graph.attach_child(parent, SceneNode::group(Category::NONE).at(Vec2::new(0.0, 50.0)));

        let position = graph.world_position(child).unwrap();
        assert!((position - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_command_reaches_matching_nodes_at_any_depth() {
        let mut graph = SceneGraph::new();
        let layer = graph.attach_child(graph.root(), SceneNode::group(Category::SCENE_AIR_LAYER));
        let nested = graph.attach_child(layer, SceneNode::new(NodeKind::Sound(SoundNode::default())));
        let top = graph.attach_child(graph.root(), SceneNode::new(NodeKind::Sound(SoundNode::default())));
        let mut dispatch = Dispatch::default();

        graph.on_command(&sound_command(Category::SOUND_EFFECT), &mut dispatch);
        assert_eq!(pending_sounds(&mut graph, nested), 1);
        assert_eq!(pending_sounds(&mut graph, top), 1);

        graph.on_command(&sound_command(Category::PICKUP), &mut dispatch);
        assert_eq!(pending_sounds(&mut graph, nested), 0);
        assert_eq!(pending_sounds(&mut graph, top), 0);
    }

    #[test]
    fn test_wreck_ignores_commands() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let player = attach_aircraft(
            &mut graph,
            root,
            Aircraft::new(AircraftKind::Eagle, &PlayerLoadout::default()),
            Transform::at(Vec2::new(100.0, 100.0)),
        );
        graph.get_mut(player).and_then(SceneNode::as_aircraft_mut).unwrap().destroy();
        let mut dispatch = Dispatch::default();

        for action in [
            AircraftAction::LaunchMissile,
            AircraftAction::Accelerate(Vec2::new(-1.0, 0.0)),
        ] {
            graph.on_command(&Command::new(Category::PLAYER_AIRCRAFT, Action::Aircraft(action)), &mut dispatch);
        }
        let wreck = graph.get(player).and_then(SceneNode::as_aircraft).unwrap();
        assert_eq!(wreck.missile_ammo(), 2);
        assert_eq!(wreck.entity().velocity, Vec2::ZERO);

        // The explosion still plays out even once off screen
        graph.on_command(
            &Command::new(
                Category::PLAYER_AIRCRAFT,
                Action::Entity(EntityAction::RemoveIfOutside(Rect::new(5000.0, 5000.0, 10.0, 10.0))),
            ),
            &mut dispatch,
        );
        assert!(!graph.get(player).unwrap().is_marked_for_removal());
    }

    #[test]
    fn test_layer_attach_spawns_after_pass() {
        let mut graph = SceneGraph::new();
        let layer = graph.attach_child(graph.root(), SceneNode::group(Category::SCENE_AIR_LAYER));
        let command = Command::new(
            Category::SCENE_AIR_LAYER,
            Action::Layer(LayerAction::Attach(vec![Spawn::Pickup {
                kind: PickupKind::FireRate,
                position: Vec2::new(10.0, 20.0),
            }])),
        );

        graph.on_command(&command, &mut Dispatch::default());

        let children = graph.get(layer).unwrap().children().to_vec();
        assert_eq!(children.len(), 1);
        assert_eq!(graph.category_of(children[0]), Some(Category::PICKUP));
        assert_eq!(graph.world_position(children[0]), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_remove_wrecks_prunes_whole_subtree() {
        let mut graph = SceneGraph::new();
        let pickup = graph.attach_child(graph.root(), Pickup::build(PickupKind::HealthRefill, Vec2::ZERO));
        let label = graph.attach_child(pickup, SceneNode::new(NodeKind::Text(TextNode::new("bonus"))));
        let before = graph.len();

        graph.get_mut(pickup).unwrap().as_pickup_mut().unwrap().destroy();
        let removed = graph.remove_wrecks();

        assert_eq!(removed, 2);
        assert_eq!(graph.len(), before - 2);
        assert!(!graph.contains(pickup));
        assert!(!graph.contains(label));
        assert!(graph.get(graph.root()).unwrap().children().is_empty());
    }

    #[test]
    fn test_stale_handle_after_slot_reuse() {
        let mut graph = SceneGraph::new();
        let pickup = graph.attach_child(graph.root(), Pickup::build(PickupKind::FireSpread, Vec2::ZERO));
        graph.get_mut(pickup).unwrap().as_pickup_mut().unwrap().destroy();
        graph.remove_wrecks();

        let replacement = graph.attach_child(graph.root(), SceneNode::group(Category::NONE));
        assert_ne!(replacement, pickup);
        assert!(graph.get(pickup).is_none());
        assert!(graph.get(replacement).is_some());
    }

    #[test]
    fn test_collision_sweep_skips_destroyed_and_separated_nodes() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let a = graph.attach_child(root, Pickup::build(PickupKind::FireRate, Vec2::new(0.0, 0.0)));
        let b = graph.attach_child(root, Pickup::build(PickupKind::FireRate, Vec2::new(20.0, 0.0)));
        let far = graph.attach_child(root, Pickup::build(PickupKind::FireRate, Vec2::new(500.0, 0.0)));
        let wreck = graph.attach_child(root, Pickup::build(PickupKind::FireRate, Vec2::new(10.0, 10.0)));
        graph.get_mut(wreck).unwrap().as_pickup_mut().unwrap().destroy();

        let mut pairs = BTreeSet::new();
        graph.check_scene_collision(&mut pairs);

        assert_eq!(pairs.len(), 1);
        let pair = pairs.iter().next().unwrap();
        assert_eq!((pair.first, pair.second), (a.min(b), a.max(b)));
        assert!(pairs.iter().all(|p| p.first != far && p.second != far));
    }

    #[test]
    fn test_draw_follows_attach_order() {
        let mut graph = SceneGraph::new();
        let background = graph.attach_child(graph.root(), SceneNode::group(Category::NONE));
        let foreground = graph.attach_child(graph.root(), SceneNode::group(Category::NONE));
        let near = Sprite::new(TextureId::FinishLine, Rect::new(0.0, 0.0, 10.0, 10.0));
        let far = Sprite::new(TextureId::Jungle, Rect::new(0.0, 0.0, 10.0, 10.0));
        graph.attach_child(foreground, SceneNode::new(NodeKind::Sprite(SpriteNode::new(near))));
        graph.attach_child(background, SceneNode::new(NodeKind::Sprite(SpriteNode::new(far))));

        let mut recorder = DrawRecorder::default();
        graph.draw(&mut recorder);

        let textures: Vec<TextureId> = recorder
            .calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Sprite { texture, .. } => Some(*texture),
                _ => None,
            })
            .collect();
        assert_eq!(textures, vec![TextureId::Jungle, TextureId::FinishLine]);
    }

    #[test]
    fn test_preorder_visits_parent_first() {
        let mut graph = SceneGraph::new();
        let a = graph.attach_child(graph.root(), SceneNode::group(Category::NONE));
        let a1 = graph.attach_child(a, SceneNode::group(Category::NONE));
        let b = graph.attach_child(graph.root(), SceneNode::group(Category::NONE));

        assert_eq!(graph.preorder(), vec![graph.root(), a, a1, b]);
    }
}
