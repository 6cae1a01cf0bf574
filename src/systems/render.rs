//! Frame drawing. Layout helpers are plain functions; the SDL systems live behind the `window` feature.

use glam::{UVec2, Vec2};

use crate::constants::ui::{LABEL_FLIP_FRACTION, LABEL_GAP};

/// Whether an enemy at height `y` draws its label above the sprite, to keep it clear of the input box.
pub fn label_above(y: f32, canvas_height: u32) -> bool {
    y > canvas_height as f32 * LABEL_FLIP_FRACTION
}

/// Top-left corner of a sprite of `size` centered on `center`.
pub fn sprite_origin(center: Vec2, size: UVec2) -> Vec2 {
    center - size.as_vec2() / 2.0
}

/// Top-left corner of an enemy's label, centered horizontally under (or over) its sprite.
pub fn label_origin(center: Vec2, sprite_size: UVec2, text_size: UVec2, canvas_height: u32) -> Vec2 {
    let x = center.x - text_size.x as f32 / 2.0;
    let half_sprite = sprite_size.y as f32 / 2.0;
    let y = if label_above(center.y, canvas_height) {
        center.y - half_sprite - LABEL_GAP as f32 - text_size.y as f32
    } else {
        center.y + half_sprite + LABEL_GAP as f32
    };
    Vec2::new(x, y)
}

#[cfg(feature = "window")]
pub use window::*;

#[cfg(feature = "window")]
mod window {
    use bevy_ecs::{
        event::EventWriter,
        system::{NonSendMut, Query, Res},
    };
    use glam::{UVec2, Vec2};
    use sdl2::gfx::primitives::DrawRenderer;
    use sdl2::pixels::Color;
    use sdl2::rect::Rect;
    use sdl2::render::Canvas;
    use sdl2::video::Window;

    use super::{label_origin, sprite_origin};
    use crate::constants::{mechanics::PLAYER_RADIUS, ui, CANVAS_SIZE, PLAYER_POSITION};
    use crate::error::{GameError, TextureError};
    use crate::systems::formatting::{format_score, format_survival_ms};
    use crate::systems::{Animation, Enemy, GameStage, InputBuffer, PauseState, Position, ScoreResource, SimulationClock};
    use crate::texture::text::GlyphAtlas;
    use crate::texture::upload::FrameTextures;

    fn color([r, g, b]: [u8; 3]) -> Color {
        Color::RGB(r, g, b)
    }

    /// The glyph atlas, as a non-send resource.
    pub struct TextResource(pub GlyphAtlas);

    /// Draws the playfield: background, player, enemies with their labels, and the input box.
    #[allow(clippy::too_many_arguments)]
    pub fn scene_render_system(
        mut canvas: NonSendMut<&'static mut Canvas<Window>>,
        mut textures: NonSendMut<FrameTextures>,
        mut text: NonSendMut<TextResource>,
        stage: Res<GameStage>,
        input: Res<InputBuffer>,
        enemies: Query<(&Enemy, &Position, &Animation)>,
        mut errors: EventWriter<GameError>,
    ) {
        let canvas: &mut Canvas<Window> = &mut canvas;
        canvas.set_draw_color(color(ui::BACKGROUND));
        canvas.clear();

        if *stage == GameStage::Playing {
            let player_color = color(ui::PLAYER);
            if let Err(e) = canvas.filled_circle(
                PLAYER_POSITION.x as i16,
                PLAYER_POSITION.y as i16,
                PLAYER_RADIUS as i16,
                player_color,
            ) {
                errors.write(TextureError::RenderFailed(format!("Failed to draw player: {e}")).into());
            }
        }

        let line_height = text.0.line_height();
        for (enemy, position, animation) in enemies.iter() {
            let bitmap = animation.current_bitmap();
            let size = UVec2::from(bitmap.dimensions());
            let origin = sprite_origin(position.0, size);

            match textures.get_or_upload(&enemy.label, animation.current_frame(), bitmap) {
                Ok(texture) => {
                    let dest = Rect::new(origin.x as i32, origin.y as i32, size.x, size.y);
                    if let Err(e) = canvas.copy(texture, None, dest) {
                        errors.write(TextureError::RenderFailed(format!("Failed to draw {}: {e}", enemy.label)).into());
                    }
                }
                Err(e) => {
                    errors.write(e.into());
                }
            }

            let label = enemy.label.as_str();
            let text_size = UVec2::new(text.0.text_width(label), line_height);
            let label_position = label_origin(position.0, size, text_size, CANVAS_SIZE.y);
            if let Err(e) = text.0.render(canvas, label, label_position, color(ui::TEXT)) {
                errors.write(e.into());
            }
        }

        let box_top = CANVAS_SIZE.y as i32 - ui::INPUT_BOX_HEIGHT as i32 - ui::MARGIN;
        canvas.set_draw_color(color(ui::INPUT_BOX));
        let input_box = Rect::new(
            ui::MARGIN,
            box_top,
            CANVAS_SIZE.x - 2 * ui::MARGIN as u32,
            ui::INPUT_BOX_HEIGHT,
        );
        if let Err(e) = canvas.fill_rect(input_box) {
            errors.write(TextureError::RenderFailed(format!("Failed to draw input box: {e}")).into());
        }

        let input_position = Vec2::new((ui::MARGIN + 5) as f32, (box_top + 5) as f32);
        if let Err(e) = text.0.render(canvas, input.as_str(), input_position, color(ui::TEXT)) {
            errors.write(e.into());
        }
    }

    /// Draws the score line, the survival timer, and the game over or pause overlay.
    pub fn hud_render_system(
        mut canvas: NonSendMut<&'static mut Canvas<Window>>,
        mut text: NonSendMut<TextResource>,
        stage: Res<GameStage>,
        pause: Res<PauseState>,
        score: Res<ScoreResource>,
        clock: Res<SimulationClock>,
        mut errors: EventWriter<GameError>,
    ) {
        let canvas: &mut Canvas<Window> = &mut canvas;
        let margin = ui::MARGIN as f32;
        let width = CANVAS_SIZE.x as f32;
        let center_x = width / 2.0;
        let center_y = CANVAS_SIZE.y as f32 / 2.0;

        let score_text = format_score("Score", score.score);
        let high_text = format_score("High Score", score.high_score);
        let timer_text = format_survival_ms(clock.run_elapsed_ms());
        let high_x = width - text.0.text_width(&high_text) as f32 - margin;

        let mut lines = vec![
            (score_text.clone(), Vec2::new(margin, margin), ui::SCORE),
            (high_text.clone(), Vec2::new(high_x, margin), ui::HIGH_SCORE),
        ];
        let timer_x = center_x - text.0.text_width(&timer_text) as f32 / 2.0;
        lines.push((timer_text.clone(), Vec2::new(timer_x, margin), ui::TEXT));

        for (line, position, rgb) in lines {
            if let Err(e) = text.0.render(canvas, &line, position, color(rgb)) {
                errors.write(e.into());
            }
        }

        let overlay: Vec<(String, f32, [u8; 3])> = match (*stage, pause.active()) {
            (GameStage::GameOver, _) => vec![
                ("GAME OVER".to_string(), -50.0, ui::GAME_OVER),
                (score_text, -10.0, ui::SCORE),
                (high_text, 30.0, ui::HIGH_SCORE),
                (format!("Survived {timer_text}"), 70.0, ui::TEXT),
                ("Press R to restart or ESC to quit".to_string(), 110.0, ui::HINT),
            ],
            (GameStage::Playing, true) => vec![
                ("PAUSED".to_string(), -10.0, ui::TEXT),
                ("Press Tab to resume".to_string(), 30.0, ui::HINT),
            ],
            (GameStage::Playing, false) => Vec::new(),
        };

        for (line, offset, rgb) in overlay {
            if let Err(e) = text.0.render_centered(canvas, &line, center_x, center_y + offset, color(rgb)) {
                errors.write(e.into());
            }
        }
    }

    pub fn present_system(mut canvas: NonSendMut<&'static mut Canvas<Window>>) {
        canvas.present();
    }

    /// Presents a single message on an otherwise empty frame, before the game world exists.
    pub fn render_loading_screen(canvas: &mut Canvas<Window>, text: &mut GlyphAtlas, message: &str) -> Result<(), TextureError> {
        canvas.set_draw_color(color(ui::BACKGROUND));
        canvas.clear();
        let y = CANVAS_SIZE.y as f32 / 2.0 - text.line_height() as f32 / 2.0;
        text.render_centered(canvas, message, CANVAS_SIZE.x as f32 / 2.0, y, color(ui::TEXT))?;
        canvas.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_flips_near_bottom() {
        let sprite = UVec2::new(96, 96);
        let text = UVec2::new(40, 20);

        let below = label_origin(Vec2::new(100.0, 100.0), sprite, text, 1000);
        assert_eq!(below, Vec2::new(80.0, 153.0));

        let above = label_origin(Vec2::new(100.0, 800.0), sprite, text, 1000);
        assert_eq!(above, Vec2::new(80.0, 727.0));
    }
}
