//! Collision pair matching and response
//!
//! The scene graph produces every overlapping pair of live nodes; this module
//! picks out the pairs of interest by category and applies their effects:
//! ramming, pickup collection, and projectile hits.

use std::collections::BTreeSet;

use super::category::Category;
use super::command::{Command, CommandQueue};
use super::node::{NodeId, SceneGraph};
use super::progress::GameProgress;
use crate::audio::SoundEffect;
use crate::settings::CollisionPolicy;

/// Two overlapping nodes; `new` stores them in canonical (ascending id) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    pub first: NodeId,
    pub second: NodeId,
}

impl CollisionPair {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
    }
}

/// How a pair's categories line up with a requested `(type1, type2)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrder {
    AsIs,
    Swapped,
}

pub fn pair_order(first: Category, second: Category, type1: Category, type2: Category) -> Option<PairOrder> {
    if first.intersects(type1) && second.intersects(type2) {
        Some(PairOrder::AsIs)
    } else if first.intersects(type2) && second.intersects(type1) {
        Some(PairOrder::Swapped)
    } else {
        None
    }
}

/// True when the pair is `{type1, type2}` in some order; reorders it so `first` matches `type1`
pub fn matches_categories(pair: &mut CollisionPair, graph: &SceneGraph, type1: Category, type2: Category) -> bool {
    let (Some(first), Some(second)) = (graph.category_of(pair.first), graph.category_of(pair.second)) else {
        return false;
    };
    match pair_order(first, second, type1, type2) {
        Some(PairOrder::AsIs) => true,
        Some(PairOrder::Swapped) => {
            pair.swap();
            true
        }
        None => false,
    }
}

/// Detect and resolve every collision of interest in one sweep.
///
/// Returns the number of pairs that produced an effect.
pub fn handle_collisions(
    graph: &mut SceneGraph,
    progress: &mut GameProgress,
    commands: &mut CommandQueue,
    policy: &CollisionPolicy,
) -> usize {
    let mut pairs = BTreeSet::new();
    graph.check_scene_collision(&mut pairs);

    let mut resolved = 0;
    for pair in pairs {
        let mut pair = pair;
        if matches_categories(&mut pair, graph, Category::PLAYER_AIRCRAFT, Category::ENEMY_AIRCRAFT) {
            if resolve_ramming(graph, pair, progress, policy) {
                resolved += 1;
            }
        } else if matches_categories(&mut pair, graph, Category::PLAYER_AIRCRAFT, Category::PICKUP) {
            if resolve_pickup(graph, pair, commands, policy) {
                resolved += 1;
            }
        } else if (matches_categories(&mut pair, graph, Category::ENEMY_AIRCRAFT, Category::ALLIED_PROJECTILE)
            || matches_categories(&mut pair, graph, Category::PLAYER_AIRCRAFT, Category::ENEMY_PROJECTILE))
            && resolve_hit(graph, pair, progress, policy)
        {
            resolved += 1;
        }
    }
    resolved
}

fn resolve_ramming(
    graph: &mut SceneGraph,
    pair: CollisionPair,
    progress: &mut GameProgress,
    policy: &CollisionPolicy,
) -> bool {
    let Some((player_node, enemy_node)) = graph.pair_mut(pair.first, pair.second) else {
        return false;
    };
    let (Some(player), Some(enemy)) = (player_node.as_aircraft_mut(), enemy_node.as_aircraft_mut()) else {
        log::warn!("Aircraft collision pair without aircraft payloads: {:?}", pair);
        return false;
    };
    if policy.skip_wrecks_within_sweep && (player.is_destroyed() || enemy.is_destroyed()) {
        return false;
    }

    player.damage(enemy.hitpoints());
    enemy.destroy();
    progress.add_score(enemy.kind().bounty());
    log::debug!(
        "{:?} rammed, player at {} HP, score {}",
        enemy.kind(),
        player.hitpoints(),
        progress.score()
    );
    true
}

fn resolve_pickup(
    graph: &mut SceneGraph,
    pair: CollisionPair,
    commands: &mut CommandQueue,
    policy: &CollisionPolicy,
) -> bool {
    let position = graph.world_position(pair.first).unwrap_or_default();
    let Some((player_node, pickup_node)) = graph.pair_mut(pair.first, pair.second) else {
        return false;
    };
    let (Some(player), Some(pickup)) = (player_node.as_aircraft_mut(), pickup_node.as_pickup_mut()) else {
        log::warn!("Pickup collision pair without matching payloads: {:?}", pair);
        return false;
    };
    if policy.skip_wrecks_within_sweep && player.is_destroyed() {
        return false;
    }

    pickup.apply(player);
    pickup.destroy();
    commands.push(Command::play_sound(SoundEffect::CollectPickup, position));
    log::debug!("Collected {:?}", pickup.kind());
    true
}

fn resolve_hit(
    graph: &mut SceneGraph,
    pair: CollisionPair,
    progress: &mut GameProgress,
    policy: &CollisionPolicy,
) -> bool {
    let Some((aircraft_node, projectile_node)) = graph.pair_mut(pair.first, pair.second) else {
        return false;
    };
    let (Some(aircraft), Some(projectile)) = (aircraft_node.as_aircraft_mut(), projectile_node.as_projectile_mut())
    else {
        log::warn!("Projectile collision pair without matching payloads: {:?}", pair);
        return false;
    };
    if policy.skip_wrecks_within_sweep && (aircraft.is_destroyed() || projectile.is_destroyed()) {
        return false;
    }

    aircraft.damage(projectile.damage());
    projectile.destroy();
    if aircraft.is_destroyed() {
        // Every tier pays its bounty on a shot-down kill, C83 included
        progress.add_score(aircraft.kind().bounty());
    }
    true
}
