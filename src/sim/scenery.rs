//! Passive nodes: static sprites, text labels and the sound sink

use glam::Vec2;

use super::data::Sprite;
use crate::audio::SoundEffect;

/// Static sprite drawn with its top-left corner at the node origin
#[derive(Debug, Clone)]
pub struct SpriteNode {
    pub sprite: Sprite,
}

impl SpriteNode {
    pub fn new(sprite: Sprite) -> Self {
        Self { sprite }
    }
}

/// Text label; the owning aircraft rewrites it every frame
#[derive(Debug, Clone, Default)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Receives sound commands; the world forwards the queued plays to the player
#[derive(Debug, Default)]
pub struct SoundNode {
    pending: Vec<(SoundEffect, Vec2)>,
}

impl SoundNode {
    pub fn play(&mut self, effect: SoundEffect, position: Vec2) {
        self.pending.push((effect, position));
    }

    pub fn take_pending(&mut self) -> Vec<(SoundEffect, Vec2)> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_node_drains_pending() {
        let mut node = SoundNode::default();
        node.play(SoundEffect::CollectPickup, Vec2::new(1.0, 2.0));
        assert_eq!(node.take_pending(), vec![(SoundEffect::CollectPickup, Vec2::new(1.0, 2.0))]);
        assert!(node.take_pending().is_empty());
    }
}
