//! Deterministic simulation module
//!
//! All gameplay logic lives here. Rendering and audio are reached only through
//! the `RenderTarget` and `SoundPlayer` traits:
//! - Caller-chosen timestep, one `World::update` per frame
//! - Seeded RNG only
//! - Stable iteration order (scene pre-order, pairs by node id)

pub mod aircraft;
pub mod category;
pub mod collision;
pub mod command;
pub mod data;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod node;
pub mod particles;
pub mod pickup;
pub mod progress;
pub mod projectile;
pub mod scenery;
pub mod spawn;
pub mod world;

pub use aircraft::{Aircraft, attach_aircraft};
pub use category::Category;
pub use collision::{CollisionPair, handle_collisions, matches_categories};
pub use command::{Action, Command, CommandQueue, Spawn};
pub use data::{AircraftKind, PickupKind, ProjectileKind};
pub use geometry::{Rect, Transform};
pub use input::PlayerAction;
pub use node::{Dispatch, NodeId, NodeKind, SceneGraph, SceneNode};
pub use progress::{GameProgress, PlayerLoadout};
pub use spawn::{LevelTable, SpawnPoint, SpawnSchedule};
pub use world::{Layer, World};
