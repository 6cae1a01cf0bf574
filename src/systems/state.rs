use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    resource::Resource,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, error, info};

use crate::error::GameError;
use crate::events::{GameCommand, GameEvent, RunEnded};
use crate::highscore::HighScoreStorage;
use crate::systems::formatting::format_survival_ms;
use crate::systems::{DeltaTime, Enemy, GlobalState, InputBuffer, SimulationClock, Spawner};

/// The high-level stage of the game.
#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum GameStage {
    #[default]
    Playing,
    /// An enemy reached the player. Enemies stay frozen in place until a restart.
    GameOver,
}

#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum PauseState {
    #[default]
    Inactive,
    Active,
}

impl PauseState {
    pub fn active(&self) -> bool {
        matches!(self, PauseState::Active)
    }
}

#[derive(Resource, Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct ScoreResource {
    pub score: u32,
    /// Never decreases; the only value that outlives the process.
    pub high_score: u32,
}

impl ScoreResource {
    pub fn with_high_score(high_score: u32) -> Self {
        Self { score: 0, high_score }
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Raises the high score to the current score if it was beaten. Returns whether it grew.
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Run condition: no exit has been requested.
pub fn is_running(state: Res<GlobalState>) -> bool {
    !state.exit
}

/// Run condition: the run is live, not paused, and the game isn't exiting.
pub fn is_simulating(state: Res<GlobalState>, stage: Res<GameStage>, pause: Res<PauseState>) -> bool {
    !state.exit && *stage == GameStage::Playing && !pause.active()
}

/// Settles the high score, persisting it if it grew.
fn settle_high_score(score: &mut ScoreResource, storage: &mut HighScoreStorage) {
    if score.record_high_score() {
        info!(high_score = score.high_score, "New high score");
        storage.save(score.high_score);
    }
}

/// Moves a live run to `GameOver`, settling the high score.
pub fn end_run(
    stage: &mut GameStage,
    score: &mut ScoreResource,
    storage: &mut HighScoreStorage,
    ended: &mut EventWriter<RunEnded>,
) {
    if *stage != GameStage::Playing {
        return;
    }

    settle_high_score(score, storage);
    *stage = GameStage::GameOver;
    ended.write(RunEnded {
        score: score.score,
        high_score: score.high_score,
    });
}

/// Advances simulation time; only scheduled while the run is live and unpaused.
pub fn clock_system(dt: Res<DeltaTime>, mut clock: ResMut<SimulationClock>) {
    clock.now_ms += dt.millis();
}

/// Applies commands to the input buffer, pause state and stage.
#[allow(clippy::too_many_arguments)]
pub fn command_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut state: ResMut<GlobalState>,
    mut stage: ResMut<GameStage>,
    mut pause: ResMut<PauseState>,
    mut input: ResMut<InputBuffer>,
    mut score: ResMut<ScoreResource>,
    mut storage: ResMut<HighScoreStorage>,
    mut spawner: ResMut<Spawner>,
    mut clock: ResMut<SimulationClock>,
    enemies: Query<Entity, With<Enemy>>,
) {
    for event in events.read() {
        let GameEvent::Command(command) = event;
        let accepting_text = *stage == GameStage::Playing && !pause.active();

        match command {
            GameCommand::Type(c) if accepting_text => {
                input.push(*c);
            }
            GameCommand::Backspace if accepting_text => {
                input.pop();
            }
            GameCommand::ClearInput if accepting_text => input.clear(),
            GameCommand::TogglePause if *stage == GameStage::Playing => {
                *pause = match *pause {
                    PauseState::Active => {
                        info!("Game resumed");
                        PauseState::Inactive
                    }
                    PauseState::Inactive => {
                        info!("Game paused");
                        PauseState::Active
                    }
                };
            }
            GameCommand::Restart if *stage == GameStage::GameOver => {
                settle_high_score(&mut score, &mut storage);

                let cleared = enemies.iter().count();
                for entity in enemies.iter() {
                    commands.entity(entity).despawn();
                }

                score.score = 0;
                input.clear();
                spawner.last_spawn_ms = clock.now_ms;
                clock.run_started_ms = clock.now_ms;
                *pause = PauseState::Inactive;
                *stage = GameStage::Playing;
                debug!(cleared, high_score = score.high_score, "Restarted run");
            }
            GameCommand::Exit => {
                info!("Exit requested");
                state.exit = true;
            }
            ignored => {
                let name: &'static str = ignored.into();
                debug!(command = name, stage = ?*stage, "Ignoring command");
            }
        }
    }
}

/// Reports each finished run with its survival time.
pub fn run_summary_system(mut ended: EventReader<RunEnded>, clock: Res<SimulationClock>) {
    for run in ended.read() {
        info!(
            score = run.score,
            high_score = run.high_score,
            survived = %format_survival_ms(clock.run_elapsed_ms()),
            "Game over"
        );
    }
}

/// Logs errors reported by systems during the frame; none of them are fatal.
pub fn error_log_system(mut errors: EventReader<GameError>) {
    for err in errors.read() {
        error!(error = %err, "System error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_only_grows() {
        let mut score = ScoreResource::with_high_score(10);
        score.award(4);
        assert!(!score.record_high_score());
        assert_eq!(score.high_score, 10);

        score.award(7);
        assert!(score.record_high_score());
        assert_eq!(score.high_score, 11);
    }
}
