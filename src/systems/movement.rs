use bevy_ecs::{
    query::With,
    system::{Query, Res},
};
use glam::Vec2;

use crate::config::GameConfig;
use crate::constants::PLAYER_POSITION;
use crate::systems::{Enemy, Position};

/// Returns `position` moved `speed` pixels toward `target`.
///
/// The step never exceeds the remaining distance, so a position already on (or within one
/// step of) the target lands exactly on it and stays there.
pub fn step_toward(position: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let delta = target - position;
    let distance = delta.length();
    if distance <= speed || distance == 0.0 {
        return target;
    }
    position + delta / distance * speed
}

/// Moves every enemy one fixed step toward the player.
pub fn movement_system(config: Res<GameConfig>, mut query: Query<&mut Position, With<Enemy>>) {
    let target = PLAYER_POSITION;
    for mut position in query.iter_mut() {
        position.0 = step_toward(position.0, target, config.enemy_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_is_fixed_length() {
        let next = step_toward(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 5.0);
        assert!((next - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_on_target_stays_put() {
        let target = Vec2::new(500.0, 500.0);
        assert_eq!(step_toward(target, target, 1.0), target);
    }

    #[test]
    fn test_no_overshoot() {
        let target = Vec2::new(10.0, 0.0);
        assert_eq!(step_toward(Vec2::new(9.5, 0.0), target, 1.0), target);
    }
}
