//! Lazily populated, memoizing store of decoded emote animations.

use std::collections::HashMap;
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::asset::AssetKey;
use crate::texture::frames::{FrameDecoder, FrameSequence};

/// Maps each label to its decoded [`FrameSequence`], decoding on first request.
///
/// Decoding is the most expensive operation in the game, so each key is decoded at
/// most once per process; failures are cached as a placeholder so they aren't retried.
/// Entries are inserted fully built and never replaced, so every reader of a key sees
/// the same `Arc`.
#[derive(Resource)]
pub struct SpriteCache {
    entries: RwLock<HashMap<AssetKey, Arc<FrameSequence>>>,
    decoder: Box<dyn FrameDecoder>,
}

impl SpriteCache {
    pub fn new(decoder: impl FrameDecoder + 'static) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            decoder: Box::new(decoder),
        }
    }

    /// Returns the sequence for `key`, decoding it on first sight.
    ///
    /// Never fails: undecodable assets resolve to [`FrameSequence::placeholder`].
    pub fn get(&self, key: &AssetKey) -> Arc<FrameSequence> {
        if let Some(sequence) = self.entries.read().get(key) {
            return Arc::clone(sequence);
        }

        // Decode without holding the lock; if another caller got there first, theirs wins.
        let decoded = match self.decoder.decode(key) {
            Ok(sequence) => {
                debug!(label = %key, frames = sequence.len(), cycle_ms = sequence.cycle_ms(), "Cached emote");
                sequence
            }
            Err(error) => {
                warn!(label = %key, %error, "Failed to decode emote, using placeholder");
                FrameSequence::placeholder()
            }
        };

        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key.clone()).or_insert_with(|| Arc::new(decoded)))
    }

    /// Returns the cached sequence without decoding.
    pub fn peek(&self, key: &AssetKey) -> Option<Arc<FrameSequence>> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of labels decoded (or placeholdered) so far.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
