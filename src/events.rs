use bevy_ecs::prelude::*;
use strum_macros::IntoStaticStr;

/// A discrete player intent, produced by the input layer once per key or text event.
#[derive(Clone, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum GameCommand {
    Exit,
    /// Append a character to the input buffer.
    Type(char),
    /// Remove the last character of the input buffer.
    Backspace,
    ClearInput,
    /// Start a new run from the game over screen.
    Restart,
    TogglePause,
}

#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Emitted after a run ends, once the high score has been settled.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunEnded {
    pub score: u32,
    pub high_score: u32,
}
