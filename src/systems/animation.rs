use std::sync::Arc;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    query::Without,
    system::{Commands, Query, Res},
};

use crate::systems::{DeltaTime, Enemy};
use crate::texture::cache::SpriteCache;
use crate::texture::frames::{Bitmap, FrameSequence};

/// Per-entity playback state over a shared [`FrameSequence`].
///
/// Every enemy keeps its own clock, so two enemies with the same label animate independently.
#[derive(Component, Debug, Clone)]
pub struct Animation {
    sequence: Arc<FrameSequence>,
    current_frame: usize,
    time_bank: f32,
}

impl Animation {
    pub fn new(sequence: Arc<FrameSequence>) -> Self {
        Self {
            sequence,
            current_frame: 0,
            time_bank: 0.0,
        }
    }

    /// Accumulates `delta_ms` and steps through as many frames as it covers, wrapping at the end.
    ///
    /// Large deltas (or very short frames) skip several frames in one call rather than lagging behind.
    pub fn advance(&mut self, delta_ms: f32) {
        if !delta_ms.is_finite() || delta_ms <= 0.0 {
            return;
        }

        // Whole cycles would only spin the loop below.
        let cycle = self.sequence.cycle_ms() as f32;
        self.time_bank = (self.time_bank + delta_ms) % cycle;

        loop {
            let duration = self.sequence.duration_ms(self.current_frame) as f32;
            if self.time_bank < duration {
                break;
            }
            self.time_bank -= duration;
            self.current_frame = (self.current_frame + 1) % self.sequence.len();
        }
    }

    pub fn current_bitmap(&self) -> &Bitmap {
        &self.sequence.frame(self.current_frame).bitmap
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Milliseconds accumulated toward the next frame.
    pub fn time_bank(&self) -> f32 {
        self.time_bank
    }

    pub fn sequence(&self) -> &Arc<FrameSequence> {
        &self.sequence
    }
}

/// Gives newly spawned enemies their animation, decoding the emote on first sight.
pub fn attach_animation_system(
    mut commands: Commands,
    cache: Res<SpriteCache>,
    query: Query<(Entity, &Enemy), Without<Animation>>,
) {
    for (entity, enemy) in query.iter() {
        let sequence = cache.get(&enemy.label);
        commands.entity(entity).insert(Animation::new(sequence));
    }
}

/// Advances every enemy's animation clock by the frame delta.
pub fn animation_system(dt: Res<DeltaTime>, mut query: Query<&mut Animation>) {
    let delta_ms = dt.millis();
    for mut animation in query.iter_mut() {
        animation.advance(delta_ms);
    }
}
