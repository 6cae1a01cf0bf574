//! Runtime configuration: defaults from [`crate::constants`], overridden by environment and command line.

use std::path::PathBuf;

use bevy_ecs::resource::Resource;
use tracing::warn;

use crate::constants::{assets, mechanics};

pub const ENV_ASSETS: &str = "TYPING_SURVIVORS_ASSETS";
pub const ENV_FONT: &str = "TYPING_SURVIVORS_FONT";
pub const ENV_HIGHSCORE: &str = "TYPING_SURVIVORS_HIGHSCORE";
pub const ENV_SPAWN_MS: &str = "TYPING_SURVIVORS_SPAWN_MS";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Folder scanned for emotes; file stems become labels.
    pub asset_dir: PathBuf,
    pub font_path: PathBuf,
    pub highscore_path: PathBuf,
    pub spawn_interval_ms: f32,
    pub enemy_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(assets::DEFAULT_ASSET_DIR),
            font_path: PathBuf::from(assets::DEFAULT_FONT_PATH),
            highscore_path: PathBuf::from(assets::DEFAULT_HIGHSCORE_PATH),
            spawn_interval_ms: mechanics::SPAWN_INTERVAL_MS,
            enemy_speed: mechanics::ENEMY_SPEED,
        }
    }
}

impl GameConfig {
    /// Reads the process environment and arguments.
    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    /// Applies environment overrides, then command line overrides, to the defaults.
    ///
    /// Unknown arguments are left for other consumers (e.g. `--console`); unparsable
    /// numbers are ignored with a warning.
    pub fn resolve<F, I>(env: F, args: I) -> Self
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();

        if let Some(dir) = env(ENV_ASSETS) {
            config.asset_dir = dir.into();
        }
        if let Some(font) = env(ENV_FONT) {
            config.font_path = font.into();
        }
        if let Some(path) = env(ENV_HIGHSCORE) {
            config.highscore_path = path.into();
        }
        if let Some(raw) = env(ENV_SPAWN_MS) {
            config.set_spawn_interval(&raw);
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--assets" => &mut config.asset_dir,
                "--font" => &mut config.font_path,
                "--highscore" => &mut config.highscore_path,
                _ => continue,
            };
            match args.next() {
                Some(value) => *slot = value.into(),
                None => warn!(flag = %arg, "Missing value for flag"),
            }
        }

        config
    }

    fn set_spawn_interval(&mut self, raw: &str) {
        match raw.trim().parse::<f32>() {
            Ok(ms) if ms.is_finite() && ms > 0.0 => self.spawn_interval_ms = ms,
            _ => warn!(value = raw, "Ignoring invalid spawn interval"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::resolve(|_| None, Vec::new());
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.spawn_interval_ms, 2000.0);
    }

    #[test]
    fn test_env_overrides() {
        let config = GameConfig::resolve(
            |key| match key {
                ENV_ASSETS => Some("/tmp/emotes".to_string()),
                ENV_SPAWN_MS => Some("750".to_string()),
                _ => None,
            },
            Vec::new(),
        );
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/emotes"));
        assert_eq!(config.spawn_interval_ms, 750.0);
    }

    #[test]
    fn test_invalid_spawn_interval_ignored() {
        for raw in ["zero", "-5", "0", "NaN"] {
            let config = GameConfig::resolve(|key| (key == ENV_SPAWN_MS).then(|| raw.to_string()), Vec::new());
            assert_eq!(config.spawn_interval_ms, 2000.0, "{raw} should be ignored");
        }
    }

    #[test]
    fn test_args_take_precedence() {
        let config = GameConfig::resolve(
            |key| (key == ENV_ASSETS).then(|| "from-env".to_string()),
            args(&["--console", "--assets", "from-args", "--highscore", "best.txt"]),
        );
        assert_eq!(config.asset_dir, PathBuf::from("from-args"));
        assert_eq!(config.highscore_path, PathBuf::from("best.txt"));
    }
}
