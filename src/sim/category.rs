//! Category bitmask used for command targeting and collision-pair matching

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Bitmask tag carried by every scene node
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Category(u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const SCENE_AIR_LAYER: Category = Category(1 << 0);
    pub const PLAYER_AIRCRAFT: Category = Category(1 << 1);
    pub const ALLIED_AIRCRAFT: Category = Category(1 << 2);
    pub const ENEMY_AIRCRAFT: Category = Category(1 << 3);
    pub const PICKUP: Category = Category(1 << 4);
    pub const ALLIED_PROJECTILE: Category = Category(1 << 5);
    pub const ENEMY_PROJECTILE: Category = Category(1 << 6);
    pub const PARTICLE_SYSTEM: Category = Category(1 << 7);
    pub const SOUND_EFFECT: Category = Category(1 << 8);

    pub const AIRCRAFT: Category =
        Category(Self::PLAYER_AIRCRAFT.0 | Self::ALLIED_AIRCRAFT.0 | Self::ENEMY_AIRCRAFT.0);
    pub const PROJECTILE: Category = Category(Self::ALLIED_PROJECTILE.0 | Self::ENEMY_PROJECTILE.0);

    pub const fn from_bits(bits: u32) -> Self {
        Category(bits)
    }

    /// True when the two masks share at least one bit
    #[inline]
    pub const fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        Category(self.0 | rhs.0)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Category, &str); 9] = [
            (Category::SCENE_AIR_LAYER, "SceneAirLayer"),
            (Category::PLAYER_AIRCRAFT, "PlayerAircraft"),
            (Category::ALLIED_AIRCRAFT, "AlliedAircraft"),
            (Category::ENEMY_AIRCRAFT, "EnemyAircraft"),
            (Category::PICKUP, "Pickup"),
            (Category::ALLIED_PROJECTILE, "AlliedProjectile"),
            (Category::ENEMY_PROJECTILE, "EnemyProjectile"),
            (Category::PARTICLE_SYSTEM, "ParticleSystem"),
            (Category::SOUND_EFFECT, "SoundEffect"),
        ];

        if self.is_none() {
            return write!(f, "None");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.intersects(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}
