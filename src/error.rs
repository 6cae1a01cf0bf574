//! Centralized error types for the game.
//!
//! Asset decoding and high-score storage failures are recovered where they
//! happen; only startup failures propagate out of [`crate::game::Game::new`].

use std::io;
use std::path::PathBuf;

use bevy_ecs::event::Event;

/// Main error type for the game.
///
/// Also registered as an ECS event so systems can report non-fatal failures
/// without aborting the frame.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("High score error: {0}")]
    Score(#[from] ScoreError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("SDL error: {0}")]
    Sdl(String),
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Asset decoded to zero frames: {0}")]
    NoFrames(String),

    #[error("No emotes found in {0}")]
    EmptyVocabulary(PathBuf),
}

/// Errors from the persisted high score.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Corrupt high score {0:?}")]
    Corrupt(String),
}

/// Errors related to texture operations.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadFailed(String),

    #[error("Rendering failed: {0}")]
    RenderFailed(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
