use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::asset::AssetKey;

/// A word-carrying emote converging on the player.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub label: AssetKey,
}

/// Free-floating position in canvas pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// Everything a freshly spawned enemy needs; its animation is attached on first update.
#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub position: Position,
}

impl EnemyBundle {
    pub fn new(label: AssetKey, position: Vec2) -> Self {
        Self {
            enemy: Enemy { label },
            position: Position(position),
        }
    }
}

#[derive(Resource)]
pub struct GlobalState {
    pub exit: bool,
}

/// Wall-clock time elapsed since the previous tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime {
    pub seconds: f32,
}

impl DeltaTime {
    pub fn from_millis(ms: f32) -> Self {
        Self { seconds: ms / 1000.0 }
    }

    pub fn millis(&self) -> f32 {
        self.seconds * 1000.0
    }
}

/// Simulation time in milliseconds; only advances while a run is active and unpaused.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimulationClock {
    pub now_ms: f32,
    /// When the current run started, for the survival timer.
    pub run_started_ms: f32,
}

impl SimulationClock {
    pub fn run_elapsed_ms(&self) -> f32 {
        (self.now_ms - self.run_started_ms).max(0.0)
    }
}

/// Source of randomness for spawning; seeded once so a run can be replayed in tests.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub SmallRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    pub fn from_thread_rng() -> Self {
        Self(SmallRng::from_rng(&mut rand::rng()))
    }
}
