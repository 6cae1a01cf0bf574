use std::time::{Duration, Instant};

use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::constants::{ui, CANVAS_SIZE, LOOP_TIME};
use crate::error::{GameError, GameResult};
use crate::game::{Game, GameSetup};
use crate::platform;
use crate::systems::render::render_loading_screen;
use crate::texture::text::GlyphAtlas;

/// Main application wrapper that manages SDL initialization, window lifecycle, and the game loop.
pub struct App {
    pub game: Game,
    last_tick: Instant,
    focused: bool,
    // SDL shuts its subsystems down when the context is dropped
    _sdl_context: Sdl,
}

impl App {
    /// Opens the window, shows the loading screen while the emote folder is scanned, then builds the game.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if any SDL initialization step fails, and `GameError::Asset`
    /// if the emote folder has no usable emotes.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        info!("Initializing SDL2 application");
        let sdl_context = sdl2::init().map_err(GameError::Sdl)?;

        debug!("Initializing SDL2 subsystems");
        let ttf_context = sdl2::ttf::init().map_err(|e| GameError::Sdl(e.to_string()))?;
        let video_subsystem = sdl_context.video().map_err(GameError::Sdl)?;
        let event_pump = sdl_context.event_pump().map_err(GameError::Sdl)?;

        trace!(width = CANVAS_SIZE.x, height = CANVAS_SIZE.y, "Creating game window");
        let window = video_subsystem
            .window("Typing Survivors", CANVAS_SIZE.x, CANVAS_SIZE.y)
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas
            .set_logical_size(CANVAS_SIZE.x, CANVAS_SIZE.y)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");

        let texture_creator = canvas.texture_creator();

        debug!(path = %config.font_path.display(), "Loading font");
        let font = ttf_context
            .load_font(&config.font_path, ui::FONT_SIZE)
            .map_err(GameError::Sdl)?;
        // Glyphs are rendered once; the font and TTF context aren't needed afterwards.
        let mut glyphs = GlyphAtlas::new(&mut canvas, &texture_creator, &font)?;

        render_loading_screen(&mut canvas, &mut glyphs, "Loading emote names...")?;
        let setup = GameSetup::from_config(config)?;

        video_subsystem.text_input().start();

        let game = Game::new(setup, canvas, texture_creator, event_pump, glyphs)?;

        info!("Application initialization completed successfully");
        Ok(App {
            game,
            focused: true,
            last_tick: Instant::now(),
            _sdl_context: sdl_context,
        })
    }

    /// Executes a single frame of the game loop with consistent timing and optional sleep.
    ///
    /// # Returns
    ///
    /// `true` if the game should continue running, `false` if the game requested exit.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();

        let dt = self.last_tick.elapsed().as_secs_f32();
        self.last_tick = start;

        if self.game.tick(dt) {
            self.game.shutdown();
            return false;
        }

        self.focused = self.has_focus();

        let remaining = LOOP_TIME.saturating_sub(start.elapsed());
        if remaining != Duration::ZERO {
            platform::sleep(remaining, self.focused);
        }

        true
    }

    fn has_focus(&self) -> bool {
        let focus_flag = sdl2::sys::SDL_WindowFlags::SDL_WINDOW_INPUT_FOCUS as u32;
        self.game
            .world
            .get_non_send_resource::<&mut Canvas<Window>>()
            .map_or(true, |canvas| canvas.window().window_flags() & focus_flag != 0)
    }
}
