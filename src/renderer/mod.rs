//! Draw contract between the scene graph and a rendering backend
//!
//! Nodes describe what to draw in world space; the backend owns textures,
//! fonts and the view transform.

use glam::{Affine2, Vec2};

use crate::sim::data::{ParticleKind, Sprite, TextureId};
use crate::sim::geometry::Rect;
use crate::sim::particles::Particle;

pub trait RenderTarget {
    /// Draw `sprite` with its top-left corner at the origin of `transform`
    fn draw_sprite(&mut self, sprite: &Sprite, transform: &Affine2);
    /// Draw a text label centred on the origin of `transform`
    fn draw_text(&mut self, text: &str, transform: &Affine2);
    /// Draw particles (world positions) tinted and faded by kind and age
    fn draw_particles(&mut self, kind: ParticleKind, particles: &[Particle]);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Sprite {
        texture: TextureId,
        rect: Rect,
        position: Vec2,
        rotation: f32,
    },
    Text {
        text: String,
        position: Vec2,
    },
    Particles {
        kind: ParticleKind,
        count: usize,
    },
}

/// Render target that records draw calls instead of drawing
#[derive(Debug, Default)]
pub struct DrawRecorder {
    pub calls: Vec<DrawCall>,
}

impl DrawRecorder {
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for DrawRecorder {
    fn draw_sprite(&mut self, sprite: &Sprite, transform: &Affine2) {
        let (_, rotation, position) = transform.to_scale_angle_translation();
        self.calls.push(DrawCall::Sprite {
            texture: sprite.texture,
            rect: sprite.rect,
            position,
            rotation,
        });
    }

    fn draw_text(&mut self, text: &str, transform: &Affine2) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            position: transform.translation,
        });
    }

    fn draw_particles(&mut self, kind: ParticleKind, particles: &[Particle]) {
        self.calls.push(DrawCall::Particles {
            kind,
            count: particles.len(),
        });
    }
}
