//! GPU copies of decoded emote frames, created the first time each frame is drawn.

use std::collections::HashMap;

use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{BlendMode, Texture, TextureCreator};
use sdl2::video::WindowContext;
use tracing::trace;

use crate::asset::AssetKey;
use crate::error::TextureError;
use crate::texture::frames::Bitmap;

/// Uploaded textures keyed by label and frame index.
pub struct FrameTextures {
    creator: TextureCreator<WindowContext>,
    textures: HashMap<(AssetKey, usize), Texture>,
}

impl FrameTextures {
    pub fn new(creator: TextureCreator<WindowContext>) -> Self {
        Self {
            creator,
            textures: HashMap::new(),
        }
    }

    /// Returns the texture for frame `index` of `key`, uploading `bitmap` if it isn't resident yet.
    pub fn get_or_upload(&mut self, key: &AssetKey, index: usize, bitmap: &Bitmap) -> Result<&Texture, TextureError> {
        let slot = (key.clone(), index);
        if !self.textures.contains_key(&slot) {
            let texture = upload(&self.creator, bitmap)?;
            trace!(label = %key, frame = index, "Uploaded frame texture");
            self.textures.insert(slot.clone(), texture);
        }
        self.textures
            .get(&slot)
            .ok_or_else(|| TextureError::LoadFailed(format!("{key}#{index} missing after upload")))
    }
}

fn upload(creator: &TextureCreator<WindowContext>, bitmap: &Bitmap) -> Result<Texture, TextureError> {
    let (width, height) = bitmap.dimensions();
    let mut texture = creator
        .create_texture_static(PixelFormatEnum::RGBA32, width, height)
        .map_err(|e| TextureError::LoadFailed(e.to_string()))?;
    texture
        .update(None, bitmap.as_raw(), width as usize * 4)
        .map_err(|e| TextureError::LoadFailed(e.to_string()))?;
    texture.set_blend_mode(BlendMode::Blend);
    Ok(texture)
}
