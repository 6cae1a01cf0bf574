//! Text drawing from a glyph atlas rendered once from the TTF font.
//!
//! Each printable ASCII glyph is drawn into one texture at startup; strings are composed by
//! copying glyph rectangles out of it.

use std::collections::HashMap;

use glam::{UVec2, Vec2};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::ttf::Font;
use sdl2::video::{Window, WindowContext};

use crate::error::{GameError, TextureError};

/// Advance used for characters outside the atlas, as a fraction of the line height.
const MISSING_GLYPH_ADVANCE: f32 = 0.5;

#[derive(Clone, Copy, Debug)]
struct Glyph {
    pos: UVec2,
    size: UVec2,
    advance: u32,
}

pub struct GlyphAtlas {
    texture: Texture,
    glyphs: HashMap<char, Glyph>,
    last_modulation: Option<Color>,
    line_height: u32,
}

impl GlyphAtlas {
    /// Measures and renders every printable ASCII glyph of `font` into a single texture.
    pub fn new(
        canvas: &mut Canvas<Window>,
        texture_creator: &TextureCreator<WindowContext>,
        font: &Font,
    ) -> Result<Self, GameError> {
        let mut glyphs = HashMap::new();
        let mut line_height = font.height().max(1) as u32;
        let mut cursor = 0u32;

        for c in (' '..='~').filter(|c| !c.is_control()) {
            let (advance, height) = font.size_of_char(c).map_err(|e| GameError::Sdl(e.to_string()))?;
            let width = if c == ' ' { 0 } else { advance };
            glyphs.insert(
                c,
                Glyph {
                    pos: UVec2::new(cursor, 0),
                    size: UVec2::new(width, height),
                    advance,
                },
            );
            cursor += width;
            line_height = line_height.max(height);
        }

        let mut texture = texture_creator
            .create_texture_target(None, cursor.max(1), line_height)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        texture.set_blend_mode(BlendMode::Blend);

        let mut render_error: Option<GameError> = None;
        canvas
            .with_texture_canvas(&mut texture, |atlas_canvas| {
                atlas_canvas.set_draw_color(Color::RGBA(0, 0, 0, 0));
                atlas_canvas.clear();

                for (c, glyph) in glyphs.iter().filter(|(_, glyph)| glyph.size.x > 0) {
                    let rendered = font
                        .render_char(*c)
                        .blended(Color::WHITE)
                        .map_err(|e| GameError::Sdl(e.to_string()))
                        .and_then(|surface| {
                            texture_creator
                                .create_texture_from_surface(&surface)
                                .map_err(|e| GameError::Sdl(e.to_string()))
                        });

                    let result = rendered.and_then(|glyph_texture| {
                        let dest = Rect::new(glyph.pos.x as i32, glyph.pos.y as i32, glyph.size.x, glyph.size.y);
                        let copied = atlas_canvas.copy(&glyph_texture, None, dest).map_err(GameError::Sdl);
                        // SAFETY: the glyph texture was created above and is not used after this point.
                        unsafe { glyph_texture.destroy() };
                        copied
                    });

                    if let Err(error) = result {
                        render_error = Some(error);
                        return;
                    }
                }
            })
            .map_err(|e| GameError::Sdl(e.to_string()))?;

        if let Some(error) = render_error {
            return Err(error);
        }

        Ok(Self {
            texture,
            glyphs,
            last_modulation: None,
            line_height,
        })
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    fn missing_advance(&self) -> f32 {
        self.line_height as f32 * MISSING_GLYPH_ADVANCE
    }

    /// Width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .map(|c| match self.glyphs.get(&c) {
                Some(glyph) => glyph.advance as f32,
                None => self.missing_advance(),
            })
            .sum::<f32>() as u32
    }

    /// Draws `text` with its top-left corner at `position`.
    pub fn render(
        &mut self,
        canvas: &mut Canvas<Window>,
        text: &str,
        position: Vec2,
        color: Color,
    ) -> Result<(), TextureError> {
        if self.last_modulation != Some(color) {
            self.texture.set_color_mod(color.r, color.g, color.b);
            self.texture.set_alpha_mod(color.a);
            self.last_modulation = Some(color);
        }

        let mut x_offset = 0.0;
        for c in text.chars() {
            let Some(glyph) = self.glyphs.get(&c) else {
                x_offset += self.missing_advance();
                continue;
            };

            if glyph.size.x > 0 && glyph.size.y > 0 {
                let src = Rect::new(glyph.pos.x as i32, glyph.pos.y as i32, glyph.size.x, glyph.size.y);
                let dest = Rect::new(
                    (position.x + x_offset) as i32,
                    position.y as i32,
                    glyph.size.x,
                    glyph.size.y,
                );
                canvas.copy(&self.texture, src, dest).map_err(TextureError::RenderFailed)?;
            }
            x_offset += glyph.advance as f32;
        }

        Ok(())
    }

    /// Draws `text` horizontally centered on `center_x`.
    pub fn render_centered(
        &mut self,
        canvas: &mut Canvas<Window>,
        text: &str,
        center_x: f32,
        y: f32,
        color: Color,
    ) -> Result<(), TextureError> {
        let x = center_x - self.text_width(text) as f32 / 2.0;
        self.render(canvas, text, Vec2::new(x, y), color)
    }
}
