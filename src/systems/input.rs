use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use strum_macros::IntoStaticStr;

use crate::events::{GameCommand, GameEvent};
use crate::systems::GameStage;

/// Keys with a fixed meaning; everything else arrives as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum Key {
    Escape,
    Backspace,
    Return,
    Tab,
    Pause,
    R,
}

/// Platform-neutral input, as delivered by the window's event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    Text(String),
}

/// Translates raw input into commands, given the stage the game was in when it was polled.
///
/// Text is only meaningful while playing; restart only while the run is over. Quit and
/// Escape always exit.
pub fn process_input_events(stage: GameStage, events: impl IntoIterator<Item = InputEvent>) -> Vec<GameCommand> {
    let mut commands = Vec::new();

    for event in events {
        match (stage, event) {
            (_, InputEvent::Quit | InputEvent::KeyDown(Key::Escape)) => commands.push(GameCommand::Exit),
            (GameStage::Playing, InputEvent::KeyDown(Key::Backspace)) => commands.push(GameCommand::Backspace),
            (GameStage::Playing, InputEvent::KeyDown(Key::Return)) => commands.push(GameCommand::ClearInput),
            (GameStage::Playing, InputEvent::KeyDown(Key::Tab | Key::Pause)) => commands.push(GameCommand::TogglePause),
            (GameStage::Playing, InputEvent::Text(text)) => {
                commands.extend(text.chars().filter(|c| !c.is_control()).map(GameCommand::Type));
            }
            (GameStage::GameOver, InputEvent::KeyDown(Key::R | Key::Return)) => commands.push(GameCommand::Restart),
            _ => {}
        }
    }

    commands
}

#[cfg(feature = "window")]
pub use window::input_system;

#[cfg(feature = "window")]
mod window {
    use bevy_ecs::{
        event::EventWriter,
        system::{NonSendMut, Res},
    };
    use sdl2::{event::Event, keyboard::Keycode, EventPump};

    use super::{emit, process_input_events, InputEvent, Key};
    use crate::events::GameEvent;
    use crate::systems::GameStage;

    fn map_key(keycode: Keycode) -> Option<Key> {
        match keycode {
            Keycode::Escape => Some(Key::Escape),
            Keycode::Backspace => Some(Key::Backspace),
            Keycode::Return | Keycode::KpEnter => Some(Key::Return),
            Keycode::Tab => Some(Key::Tab),
            Keycode::Pause => Some(Key::Pause),
            Keycode::R => Some(Key::R),
            _ => None,
        }
    }

    /// Drains the SDL event queue and forwards the resulting commands.
    pub fn input_system(stage: Res<GameStage>, writer: EventWriter<GameEvent>, mut pump: NonSendMut<&'static mut EventPump>) {
        let events: Vec<InputEvent> = pump
            .poll_iter()
            .filter_map(|event| match event {
                Event::Quit { .. } => Some(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => map_key(keycode).map(InputEvent::KeyDown),
                // Backspace is repeated while held, like any text editor.
                Event::KeyDown {
                    keycode: Some(Keycode::Backspace),
                    repeat: true,
                    ..
                } => Some(InputEvent::KeyDown(Key::Backspace)),
                Event::TextInput { text, .. } => Some(InputEvent::Text(text)),
                _ => None,
            })
            .collect();

        emit(writer, process_input_events(*stage, events));
    }
}

fn emit(mut writer: EventWriter<GameEvent>, commands: Vec<GameCommand>) {
    for command in commands {
        writer.write(GameEvent::Command(command));
    }
}

/// Forwards queued synthetic input; the headless counterpart of the window's input system.
pub fn scripted_input_system(
    stage: Res<GameStage>,
    mut queue: ResMut<ScriptedInput>,
    writer: EventWriter<GameEvent>,
) {
    let events = std::mem::take(&mut queue.0);
    if !events.is_empty() {
        emit(writer, process_input_events(*stage, events));
    }
}

/// Input events waiting to be delivered on the next tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct ScriptedInput(pub Vec<InputEvent>);

impl ScriptedInput {
    pub fn push(&mut self, event: InputEvent) {
        self.0.push(event);
    }
}
