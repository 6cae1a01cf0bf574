use bevy_ecs::{
    event::EventWriter,
    system::{Query, ResMut},
};
use glam::Vec2;
use tracing::debug;

use crate::constants::{mechanics::COLLISION_DISTANCE, PLAYER_POSITION};
use crate::events::RunEnded;
use crate::highscore::HighScoreStorage;
use crate::systems::{end_run, Enemy, GameStage, Position, ScoreResource};

/// Whether an enemy at `position` has reached the player.
pub fn touches_player(position: Vec2) -> bool {
    position.distance(PLAYER_POSITION) < COLLISION_DISTANCE
}

/// Ends the run as soon as any enemy reaches the player.
pub fn collision_system(
    query: Query<(&Enemy, &Position)>,
    mut stage: ResMut<GameStage>,
    mut score: ResMut<ScoreResource>,
    mut storage: ResMut<HighScoreStorage>,
    mut ended: EventWriter<RunEnded>,
) {
    let Some((enemy, position)) = query.iter().find(|(_, position)| touches_player(position.0)) else {
        return;
    };

    debug!(label = %enemy.label, x = position.0.x, y = position.0.y, "Enemy reached the player");
    end_run(&mut stage, &mut score, &mut storage, &mut ended);
}
