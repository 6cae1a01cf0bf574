use bevy_ecs::{
    resource::Resource,
    system::{Commands, Res, ResMut},
};
use glam::{UVec2, Vec2};
use rand::seq::IndexedRandom;
use rand::Rng;
use strum::VariantArray;
use strum_macros::{Display, VariantArray};
use tracing::debug;

use crate::asset::{AssetKey, Vocabulary};
use crate::config::GameConfig;
use crate::constants::CANVAS_SIZE;
use crate::systems::{EnemyBundle, GameRng, SimulationClock};

/// A side of the canvas enemies can enter from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, VariantArray)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// The point on this edge at `offset` along it, for a canvas of `bounds`.
    pub fn point(self, offset: u32, bounds: UVec2) -> Vec2 {
        let offset = offset as f32;
        match self {
            Edge::Top => Vec2::new(offset, 0.0),
            Edge::Bottom => Vec2::new(offset, bounds.y as f32),
            Edge::Left => Vec2::new(0.0, offset),
            Edge::Right => Vec2::new(bounds.x as f32, offset),
        }
    }

    /// Length of the edge, which bounds the offset passed to [`Edge::point`].
    pub fn span(self, bounds: UVec2) -> u32 {
        match self {
            Edge::Top | Edge::Bottom => bounds.x,
            Edge::Left | Edge::Right => bounds.y,
        }
    }
}

/// Time of the last spawn, in simulation milliseconds.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Spawner {
    pub last_spawn_ms: f32,
}

/// Whether more than `interval_ms` has passed since the last spawn.
pub fn should_spawn(now_ms: f32, last_spawn_ms: f32, interval_ms: f32) -> bool {
    now_ms - last_spawn_ms > interval_ms
}

/// Picks a uniformly random edge, then a uniformly random point along it (ends included).
pub fn spawn_position<R: Rng + ?Sized>(rng: &mut R, bounds: UVec2) -> (Edge, Vec2) {
    let edge = *Edge::VARIANTS.choose(rng).unwrap_or(&Edge::Top);
    let offset = rng.random_range(0..=edge.span(bounds));
    (edge, edge.point(offset, bounds))
}

/// Returns the label and position for a new enemy, or `None` with an empty vocabulary.
pub fn roll_enemy<R: Rng + ?Sized>(rng: &mut R, vocabulary: &Vocabulary, bounds: UVec2) -> Option<(AssetKey, Vec2)> {
    let label = vocabulary.keys().choose(rng)?.clone();
    let (_, position) = spawn_position(rng, bounds);
    Some((label, position))
}

/// Spawns one enemy whenever the spawn interval has elapsed.
pub fn spawn_system(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    config: Res<GameConfig>,
    vocabulary: Res<Vocabulary>,
    mut spawner: ResMut<Spawner>,
    mut rng: ResMut<GameRng>,
) {
    if !should_spawn(clock.now_ms, spawner.last_spawn_ms, config.spawn_interval_ms) {
        return;
    }
    spawner.last_spawn_ms = clock.now_ms;

    if let Some((label, position)) = roll_enemy(&mut rng.0, &vocabulary, CANVAS_SIZE) {
        debug!(%label, x = position.x, y = position.y, "Spawned enemy");
        commands.spawn(EnemyBundle::new(label, position));
    }
}
