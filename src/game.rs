//! This module contains the main game logic and state.

use std::time::Instant;

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use tracing::{debug, info, warn};

use crate::asset::Vocabulary;
use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::events::{GameEvent, RunEnded};
use crate::formatter;
use crate::highscore::{FileHighScoreStore, HighScoreStorage};
use crate::systems::{
    self, animation_system, attach_animation_system, clock_system, collision_system, command_system, error_log_system,
    is_simulating, movement_system, run_summary_system, spawn_system, typing_system, DeltaTime, GameRng,
    GameStage, GlobalState, InputBuffer, InputEvent, PauseState, ScoreResource, ScriptedInput, SimulationClock, Spawner,
};
use crate::texture::cache::SpriteCache;
use crate::texture::frames::DirectoryDecoder;

/// Frames slower than this multiple of their own delta are reported.
const SLOW_FRAME_FACTOR: f32 = 1.2;

/// System set for all gameplay systems to ensure they run after input processing
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Turns raw input into commands and applies them
    Input,
    /// Advances the run: spawning, movement, animation, collisions, typing
    Update,
}

/// System set for all rendering systems to ensure they run after gameplay logic
#[cfg(feature = "window")]
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum RenderSet {
    Draw,
    Present,
}

/// Everything the simulation needs from the outside world, gathered before the game starts.
pub struct GameSetup {
    pub config: GameConfig,
    pub vocabulary: Vocabulary,
    pub sprites: SpriteCache,
    pub high_scores: HighScoreStorage,
    pub rng: GameRng,
}

impl GameSetup {
    /// Scans the emote folder and opens the high score file named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Asset` if the folder can't be read or holds no emotes; the game
    /// can't be played without at least one label.
    pub fn from_config(config: GameConfig) -> GameResult<Self> {
        let vocabulary = Vocabulary::scan(&config.asset_dir)?;
        let sprites = SpriteCache::new(DirectoryDecoder::new(&config.asset_dir));
        let high_scores = HighScoreStorage::new(FileHighScoreStore::new(&config.highscore_path));

        Ok(Self {
            config,
            vocabulary,
            sprites,
            high_scores,
            rng: GameRng::from_thread_rng(),
        })
    }
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// All state lives in the `World`; the `Schedule` runs input handling, the simulation
/// step and (with a window) rendering once per [`Game::tick`]. A headless game replaces
/// the SDL event pump with [`ScriptedInput`] and skips rendering entirely.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a game with no window, driven by [`Game::send_input`] and [`Game::tick`].
    pub fn headless(setup: GameSetup) -> Self {
        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, setup);
        world.insert_resource(ScriptedInput::default());

        Self::configure_simulation(&mut schedule);
        schedule.add_systems(systems::scripted_input_system.in_set(GameplaySet::Input).before(command_system));

        Self { world, schedule }
    }

    /// Builds a game that reads the SDL event queue and draws into `canvas`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if the window's rendering resources can't be created.
    #[cfg(feature = "window")]
    pub fn new(
        setup: GameSetup,
        canvas: sdl2::render::Canvas<sdl2::video::Window>,
        texture_creator: sdl2::render::TextureCreator<sdl2::video::WindowContext>,
        mut event_pump: sdl2::EventPump,
        glyphs: crate::texture::text::GlyphAtlas,
    ) -> GameResult<Self> {
        use crate::systems::render::{hud_render_system, present_system, scene_render_system, TextResource};
        use crate::texture::upload::FrameTextures;

        info!("Starting game initialization");
        Self::disable_sdl_events(&mut event_pump);

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, setup);

        world.insert_non_send_resource::<&mut sdl2::EventPump>(Box::leak(Box::new(event_pump)));
        world.insert_non_send_resource::<&mut sdl2::render::Canvas<sdl2::video::Window>>(Box::leak(Box::new(canvas)));
        world.insert_non_send_resource(FrameTextures::new(texture_creator));
        world.insert_non_send_resource(TextResource(glyphs));

        Self::configure_simulation(&mut schedule);
        schedule
            .add_systems((
                systems::input_system.in_set(GameplaySet::Input).before(command_system),
                (scene_render_system, hud_render_system).chain().in_set(RenderSet::Draw),
                present_system.in_set(RenderSet::Present),
            ))
            .configure_sets((
                RenderSet::Draw.after(GameplaySet::Update).run_if(systems::is_running),
                RenderSet::Present.after(RenderSet::Draw).run_if(systems::is_running),
            ));

        info!("Game initialization completed");
        Ok(Self { world, schedule })
    }

    #[cfg(feature = "window")]
    fn disable_sdl_events(event_pump: &mut sdl2::EventPump) {
        use sdl2::event::EventType;

        let disabled = [
            EventType::MouseMotion,
            EventType::MouseButtonDown,
            EventType::MouseButtonUp,
            EventType::MouseWheel,
            EventType::FingerDown,
            EventType::FingerUp,
            EventType::FingerMotion,
            EventType::JoyAxisMotion,
            EventType::ControllerAxisMotion,
        ];
        for event_type in disabled {
            event_pump.disable_event(event_type);
        }
        debug!(count = disabled.len(), "Disabled unused SDL events");
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<RunEnded>(world);
    }

    fn insert_resources(world: &mut World, setup: GameSetup) {
        let high_score = setup.high_scores.load_or_default();
        info!(high_score, labels = setup.vocabulary.len(), "Loaded game state");

        world.insert_resource(setup.config);
        world.insert_resource(setup.vocabulary);
        world.insert_resource(setup.sprites);
        world.insert_resource(setup.high_scores);
        world.insert_resource(setup.rng);
        world.insert_resource(ScoreResource::with_high_score(high_score));
        world.insert_resource(GlobalState { exit: false });
        world.insert_resource(DeltaTime::default());
        world.insert_resource(SimulationClock::default());
        world.insert_resource(Spawner::default());
        world.insert_resource(InputBuffer::default());
        world.insert_resource(GameStage::default());
        world.insert_resource(PauseState::default());
    }

    /// Input handling and the simulation step, shared by windowed and headless games.
    fn configure_simulation(schedule: &mut Schedule) {
        schedule
            .add_systems((
                command_system.in_set(GameplaySet::Input),
                (
                    clock_system,
                    spawn_system,
                    attach_animation_system,
                    movement_system,
                    animation_system,
                    collision_system,
                    typing_system,
                )
                    .chain()
                    .in_set(GameplaySet::Update),
                (run_summary_system, error_log_system).after(GameplaySet::Update),
            ))
            .configure_sets((
                GameplaySet::Input,
                GameplaySet::Update.after(GameplaySet::Input).run_if(is_simulating),
            ));
    }

    /// Queues input for the next tick of a headless game.
    pub fn send_input(&mut self, event: InputEvent) {
        if let Some(mut queue) = self.world.get_resource_mut::<ScriptedInput>() {
            queue.push(event);
        } else {
            warn!(?event, "Scripted input sent to a windowed game, ignoring");
        }
    }

    /// Executes one frame: input, simulation (if a run is live and unpaused), and rendering.
    ///
    /// # Arguments
    ///
    /// * `dt` - Frame delta time in seconds
    ///
    /// # Returns
    ///
    /// `true` if the game should terminate (exit command received), `false` to continue
    pub fn tick(&mut self, dt: f32) -> bool {
        self.world.insert_resource(DeltaTime { seconds: dt });

        let start = Instant::now();
        self.schedule.run(&mut self.world);
        let elapsed = start.elapsed();

        self.update_events();
        formatter::increment_tick();

        let budget_ms = dt * 1000.0 * SLOW_FRAME_FACTOR;
        let elapsed_ms = elapsed.as_secs_f32() * 1000.0;
        if dt > 0.0 && elapsed_ms > budget_ms {
            warn!(
                total = format!("{elapsed:.3?}"),
                tick = formatter::get_tick_count(),
                budget = format!("{budget_ms:.1}ms"),
                "Frame took longer than expected"
            );
        }

        self.world.get_resource::<GlobalState>().is_some_and(|state| state.exit)
    }

    /// Swaps the double-buffered event queues so events don't outlive the following frame.
    fn update_events(&mut self) {
        self.world.resource_mut::<Events<GameError>>().update();
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<RunEnded>>().update();
    }

    /// Flushes any high score write that failed during play.
    pub fn shutdown(&mut self) {
        if let Some(mut storage) = self.world.get_resource_mut::<HighScoreStorage>() {
            if storage.is_dirty() {
                info!("Retrying failed high score write");
                storage.flush();
            }
        }
    }
}
