//! Static stat tables for every entity variant
//!
//! Sprite rectangles index into the shared entity texture atlas; their sizes
//! double as the local bounding boxes used for collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Texture atlas / image ids resolved by the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    Entities,
    Jungle,
    Space1,
    Space2,
    Space3,
    Explosion,
    FinishLine,
}

/// A region of a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub rect: Rect,
}

impl Sprite {
    pub const fn new(texture: TextureId, rect: Rect) -> Self {
        Self { texture, rect }
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }
}

const fn atlas(left: f32, top: f32, width: f32, height: f32) -> Sprite {
    Sprite::new(
        TextureId::Entities,
        Rect {
            left,
            top,
            width,
            height,
        },
    )
}

/// One leg of an enemy movement pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    /// Heading in degrees, 0 = straight down the screen
    pub angle: f32,
    /// Distance travelled before switching to the next leg
    pub distance: f32,
}

const fn leg(angle: f32, distance: f32) -> Direction {
    Direction { angle, distance }
}

/// Aircraft tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AircraftKind {
    /// Player-controlled fighter
    Eagle,
    Raptor,
    Avenger,
    /// Boss tier
    C83,
}

#[derive(Debug)]
pub struct AircraftData {
    pub hitpoints: i32,
    pub speed: f32,
    /// Seconds between shots; `None` for aircraft that never fire
    pub fire_interval: Option<f32>,
    pub sprite: Sprite,
    /// Score awarded for destroying this aircraft
    pub bounty: u64,
    pub directions: &'static [Direction],
    pub has_roll_animation: bool,
}

static EAGLE: AircraftData = AircraftData {
    hitpoints: 200,
    speed: 200.0,
    fire_interval: Some(1.0),
    sprite: atlas(0.0, 0.0, 48.0, 64.0),
    bounty: 0,
    directions: &[],
    has_roll_animation: true,
};

static RAPTOR: AircraftData = AircraftData {
    hitpoints: 10,
    speed: 80.0,
    fire_interval: None,
    sprite: atlas(144.0, 0.0, 84.0, 64.0),
    bounty: 10,
    directions: &[leg(45.0, 80.0), leg(-45.0, 160.0), leg(45.0, 80.0)],
    has_roll_animation: false,
};

static AVENGER: AircraftData = AircraftData {
    hitpoints: 40,
    speed: 50.0,
    fire_interval: Some(2.0),
    sprite: atlas(228.0, 0.0, 60.0, 59.0),
    bounty: 50,
    directions: &[
        leg(45.0, 50.0),
        leg(0.0, 50.0),
        leg(-45.0, 100.0),
        leg(0.0, 50.0),
        leg(45.0, 50.0),
    ],
    has_roll_animation: false,
};

static C83: AircraftData = AircraftData {
    hitpoints: 300,
    speed: 40.0,
    fire_interval: Some(1.5),
    sprite: atlas(288.0, 0.0, 96.0, 80.0),
    bounty: 100,
    directions: &[leg(90.0, 100.0), leg(-90.0, 200.0), leg(90.0, 100.0)],
    has_roll_animation: false,
};

impl AircraftKind {
    pub fn data(self) -> &'static AircraftData {
        match self {
            AircraftKind::Eagle => &EAGLE,
            AircraftKind::Raptor => &RAPTOR,
            AircraftKind::Avenger => &AVENGER,
            AircraftKind::C83 => &C83,
        }
    }

    pub fn is_allied(self) -> bool {
        self == AircraftKind::Eagle
    }

    pub fn bounty(self) -> u64 {
        self.data().bounty
    }
}

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    AlliedBullet,
    EnemyBullet,
    Missile,
}

#[derive(Debug)]
pub struct ProjectileData {
    pub damage: i32,
    pub speed: f32,
    pub sprite: Sprite,
}

static ALLIED_BULLET: ProjectileData = ProjectileData {
    damage: 10,
    speed: 300.0,
    sprite: atlas(175.0, 64.0, 3.0, 14.0),
};

static ENEMY_BULLET: ProjectileData = ProjectileData {
    damage: 10,
    speed: 300.0,
    sprite: atlas(178.0, 64.0, 3.0, 14.0),
};

static MISSILE: ProjectileData = ProjectileData {
    damage: 200,
    speed: 150.0,
    sprite: atlas(160.0, 64.0, 15.0, 32.0),
};

impl ProjectileKind {
    pub fn data(self) -> &'static ProjectileData {
        match self {
            ProjectileKind::AlliedBullet => &ALLIED_BULLET,
            ProjectileKind::EnemyBullet => &ENEMY_BULLET,
            ProjectileKind::Missile => &MISSILE,
        }
    }

    pub fn is_guided(self) -> bool {
        self == ProjectileKind::Missile
    }

    pub fn is_allied(self) -> bool {
        self != ProjectileKind::EnemyBullet
    }
}

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    HealthRefill,
    MissileRefill,
    FireSpread,
    FireRate,
}

impl PickupKind {
    pub const ALL: [PickupKind; 4] = [
        PickupKind::HealthRefill,
        PickupKind::MissileRefill,
        PickupKind::FireSpread,
        PickupKind::FireRate,
    ];

    pub fn sprite(self) -> Sprite {
        match self {
            PickupKind::HealthRefill => atlas(0.0, 64.0, 40.0, 40.0),
            PickupKind::MissileRefill => atlas(40.0, 64.0, 40.0, 40.0),
            PickupKind::FireSpread => atlas(80.0, 64.0, 40.0, 40.0),
            PickupKind::FireRate => atlas(120.0, 64.0, 40.0, 40.0),
        }
    }
}

/// Hit points restored by a health pickup
pub const HEALTH_REFILL_AMOUNT: i32 = 25;
/// Missiles granted by a missile pickup
pub const MISSILE_REFILL_AMOUNT: u32 = 3;

/// Particle flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Propellant,
    Smoke,
}

impl ParticleKind {
    /// Seconds a particle stays alive
    pub fn lifetime(self) -> f32 {
        match self {
            ParticleKind::Propellant => 0.6,
            ParticleKind::Smoke => 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounty_table() {
        assert_eq!(AircraftKind::Eagle.bounty(), 0);
        assert_eq!(AircraftKind::Raptor.bounty(), 10);
        assert_eq!(AircraftKind::Avenger.bounty(), 50);
        assert_eq!(AircraftKind::C83.bounty(), 100);
    }

    #[test]
    fn test_only_missiles_are_guided() {
        assert!(ProjectileKind::Missile.is_guided());
        assert!(!ProjectileKind::AlliedBullet.is_guided());
        assert!(!ProjectileKind::EnemyBullet.is_guided());
    }

    #[test]
    fn test_spawn_table_names_deserialize() {
        let kind: AircraftKind = serde_json::from_str("\"C83\"").unwrap();
        assert_eq!(kind, AircraftKind::C83);
    }
}
