//! Axis-aligned rectangles and node transforms
//!
//! Screen space: +x right, +y down. Rotations are radians, clockwise on screen.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (left/top corner plus size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const EMPTY: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on the origin
    pub fn centered(size: Vec2) -> Self {
        Self::new(-size.x / 2.0, -size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Strict overlap test; rectangles that only touch along an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }

    /// Bounding box of this rectangle after applying `transform`
    pub fn transformed(&self, transform: &Affine2) -> Rect {
        let corners = [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right(), self.top),
            Vec2::new(self.left, self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
        .map(|p| transform.transform_point2(p));

        let min = corners.iter().fold(Vec2::splat(f32::MAX), |acc, p| acc.min(*p));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |acc, p| acc.max(*p));
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Local transform of a scene node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Move by an offset in parent space
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(!a.intersects(&empty));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.9, 9.9)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, -0.1)));
    }

    #[test]
    fn test_transformed_rect_rotated_half_turn_keeps_size() {
        let local = Rect::centered(Vec2::new(40.0, 20.0));
        let transform = Transform {
            position: Vec2::new(100.0, 50.0),
            rotation: PI,
            scale: Vec2::ONE,
        };
        let bounds = local.transformed(&transform.to_affine());

        assert!((bounds.width - 40.0).abs() < 1e-3);
        assert!((bounds.height - 20.0).abs() < 1e-3);
        assert!((bounds.center() - Vec2::new(100.0, 50.0)).length() < 1e-3);
    }

    #[test]
    fn test_transformed_rect_quarter_turn_swaps_extent() {
        let local = Rect::centered(Vec2::new(40.0, 20.0));
        let transform = Transform {
            rotation: PI / 2.0,
            ..Default::default()
        };
        let bounds = local.transformed(&transform.to_affine());

        assert!((bounds.width - 20.0).abs() < 1e-3);
        assert!((bounds.height - 40.0).abs() < 1e-3);
    }
}
