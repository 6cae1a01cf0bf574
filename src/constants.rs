//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::{UVec2, Vec2};

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of the canvas, in pixels.
pub const CANVAS_SIZE: UVec2 = UVec2::new(1000, 1000);

/// The point every enemy converges on: the center of the canvas.
pub const PLAYER_POSITION: Vec2 = Vec2::new(CANVAS_SIZE.x as f32 / 2.0, CANVAS_SIZE.y as f32 / 2.0);

pub mod mechanics {
    /// The radius of the player marker, in pixels.
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Added to [`PLAYER_RADIUS`] to form the collision distance; roughly half an emote.
    pub const COLLISION_PADDING: f32 = 24.0;
    /// An enemy strictly closer than this to the player ends the run.
    pub const COLLISION_DISTANCE: f32 = PLAYER_RADIUS + COLLISION_PADDING;
    /// Distance an enemy covers per tick, in pixels.
    pub const ENEMY_SPEED: f32 = 1.0;
    /// Milliseconds of simulation time between spawns.
    pub const SPAWN_INTERVAL_MS: f32 = 2000.0;
    /// Longest input the buffer accepts.
    pub const MAX_INPUT_LEN: usize = 32;
}

pub mod animation {
    use glam::UVec2;

    /// Duration used when an asset carries no per-frame delay.
    pub const FALLBACK_FRAME_DURATION_MS: u32 = 100;
    /// Zero or negative delays are raised to this (one tick at 60 Hz).
    pub const MIN_FRAME_DURATION_MS: u32 = 16;
    /// Every frame of a decoded emote is resized to this.
    pub const EMOTE_SIZE: UVec2 = UVec2::new(96, 96);
    /// Size of the flat square used when an emote can't be decoded.
    pub const PLACEHOLDER_SIZE: UVec2 = UVec2::new(48, 48);
    pub const PLACEHOLDER_COLOR: [u8; 4] = [200, 50, 50, 255];
}

pub mod ui {
    /// Point size of the font used for labels and overlays.
    pub const FONT_SIZE: u16 = 28;
    /// Gap between an emote and its label, in pixels.
    pub const LABEL_GAP: i32 = 5;
    /// Enemies below this fraction of the canvas height draw their label above the sprite.
    pub const LABEL_FLIP_FRACTION: f32 = 0.7;
    /// Height of the input box along the bottom edge.
    pub const INPUT_BOX_HEIGHT: u32 = 40;
    /// Margin between the HUD elements and the canvas edge.
    pub const MARGIN: i32 = 10;

    pub const BACKGROUND: [u8; 3] = [30, 30, 30];
    pub const PLAYER: [u8; 3] = [0, 255, 0];
    pub const INPUT_BOX: [u8; 3] = [50, 50, 50];
    pub const TEXT: [u8; 3] = [255, 255, 255];
    pub const SCORE: [u8; 3] = [255, 255, 0];
    pub const HIGH_SCORE: [u8; 3] = [255, 200, 0];
    pub const GAME_OVER: [u8; 3] = [255, 0, 0];
    pub const HINT: [u8; 3] = [200, 200, 200];
}

pub mod assets {
    /// Directory scanned for emotes when nothing else is configured.
    pub const DEFAULT_ASSET_DIR: &str = "emotes";
    pub const DEFAULT_FONT_PATH: &str = "assets/font.ttf";
    pub const DEFAULT_HIGHSCORE_PATH: &str = "highscore.txt";
    /// Extensions recognized by the vocabulary scan, in decode-probe order.
    pub const EXTENSIONS: [&str; 4] = ["png", "apng", "gif", "webp"];
}
