#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use typing_survivors::{
    asset::{AssetKey, Vocabulary},
    config::GameConfig,
    error::{AssetError, GameError},
    events::{GameEvent, RunEnded},
    game::GameSetup,
    highscore::{HighScoreStorage, MemoryHighScoreStore},
    systems::{
        DeltaTime, EnemyBundle, GameRng, GameStage, GlobalState, InputBuffer, PauseState, ScoreResource, SimulationClock,
        Spawner,
    },
    texture::{
        cache::SpriteCache,
        frames::{Frame, FrameDecoder, FrameSequence},
    },
};

/// Decoder backed by a table of frame durations, counting every decode call.
#[derive(Default)]
pub struct CountingDecoder {
    durations: HashMap<String, Vec<u32>>,
    calls: Arc<AtomicUsize>,
}

impl CountingDecoder {
    pub fn with(mut self, label: &str, durations: &[u32]) -> Self {
        self.durations.insert(label.to_string(), durations.to_vec());
        self
    }

    /// Shared handle to the call counter, readable after the decoder is moved into a cache.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl FrameDecoder for CountingDecoder {
    fn decode(&self, key: &AssetKey) -> Result<FrameSequence, AssetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let durations = self
            .durations
            .get(key.as_str())
            .ok_or_else(|| AssetError::NotFound(key.to_string()))?;
        Ok(sequence(durations))
    }
}

pub fn call_count(calls: &Arc<AtomicUsize>) -> usize {
    calls.load(Ordering::SeqCst)
}

/// A sequence of 2x2 frames with the given durations.
pub fn sequence(durations: &[u32]) -> FrameSequence {
    let frames = durations
        .iter()
        .enumerate()
        .map(|(i, &ms)| Frame::new(RgbaImage::from_pixel(2, 2, Rgba([i as u8, 0, 0, 255])), ms))
        .collect();
    FrameSequence::new(frames, "test").expect("durations should not be empty")
}

pub fn key(label: &str) -> AssetKey {
    AssetKey::new(label).expect("label should not be empty")
}

/// A headless setup over `labels`, every one decodable as a two-frame animation.
pub fn test_setup(labels: &[&str], high_score: u32) -> (GameSetup, Arc<MemoryHighScoreStore>) {
    let decoder = labels
        .iter()
        .fold(CountingDecoder::default(), |decoder, label| decoder.with(label, &[100, 50]));
    let store = Arc::new(MemoryHighScoreStore::with_value(high_score));

    let setup = GameSetup {
        config: GameConfig::default(),
        vocabulary: Vocabulary::from_labels(labels.iter().copied()),
        sprites: SpriteCache::new(decoder),
        high_scores: HighScoreStorage::new(Arc::clone(&store)),
        rng: GameRng::seeded(7),
    };
    (setup, store)
}

/// A world with every resource and event the simulation systems read, for `RunSystemOnce` tests.
pub fn create_test_world() -> World {
    let mut world = World::new();

    world.insert_resource(Events::<GameEvent>::default());
    world.insert_resource(Events::<GameError>::default());
    world.insert_resource(Events::<RunEnded>::default());

    world.insert_resource(GameConfig::default());
    world.insert_resource(Vocabulary::from_labels(["bat", "fang"]));
    world.insert_resource(SpriteCache::new(
        CountingDecoder::default().with("bat", &[100, 50]).with("fang", &[80]),
    ));
    world.insert_resource(HighScoreStorage::new(MemoryHighScoreStore::default()));
    world.insert_resource(GameRng::seeded(42));
    world.insert_resource(ScoreResource::default());
    world.insert_resource(GlobalState { exit: false });
    world.insert_resource(DeltaTime::from_millis(1000.0 / 60.0));
    world.insert_resource(SimulationClock::default());
    world.insert_resource(Spawner::default());
    world.insert_resource(InputBuffer::default());
    world.insert_resource(GameStage::Playing);
    world.insert_resource(PauseState::default());

    world
}

pub fn spawn_enemy(world: &mut World, label: &str, position: Vec2) -> Entity {
    world.spawn(EnemyBundle::new(key(label), position)).id()
}

pub fn enemy_count(world: &mut World) -> usize {
    world.query::<&typing_survivors::systems::Enemy>().iter(world).count()
}

pub fn send_command(world: &mut World, command: typing_survivors::events::GameCommand) {
    world.resource_mut::<Events<GameEvent>>().send(GameEvent::Command(command));
}
