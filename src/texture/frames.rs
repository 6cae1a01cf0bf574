//! Decoded animation frames and the decoders that produce them.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};

use glam::UVec2;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::imageops::{self, FilterType};
use image::{AnimationDecoder, Delay, DynamicImage, ImageDecoder, Rgba, RgbaImage};
use tracing::trace;

use crate::asset::{resolve_path, AssetKey};
use crate::constants::animation::{
    EMOTE_SIZE, FALLBACK_FRAME_DURATION_MS, MIN_FRAME_DURATION_MS, PLACEHOLDER_COLOR, PLACEHOLDER_SIZE,
};
use crate::error::AssetError;

/// A decoded RGBA raster.
pub type Bitmap = RgbaImage;

/// One step of an animation: what to show and for how long.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bitmap: Bitmap,
    pub duration_ms: u32,
}

impl Frame {
    /// Creates a frame, raising a zero duration to [`MIN_FRAME_DURATION_MS`].
    pub fn new(bitmap: Bitmap, duration_ms: u32) -> Self {
        Self {
            bitmap,
            duration_ms: coerce_duration(i64::from(duration_ms)),
        }
    }
}

/// Clamps a raw per-frame delay to a positive duration.
pub fn coerce_duration(raw_ms: i64) -> u32 {
    if raw_ms <= 0 {
        MIN_FRAME_DURATION_MS
    } else {
        u32::try_from(raw_ms).unwrap_or(u32::MAX)
    }
}

/// Converts an image crate delay into whole milliseconds.
pub fn delay_to_ms(delay: Delay) -> u32 {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        return FALLBACK_FRAME_DURATION_MS;
    }
    coerce_duration(i64::from(numer / denom))
}

/// An immutable, non-empty loop of frames.
///
/// Built once by the sprite cache and shared by every enemy carrying the same label.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    placeholder: bool,
}

impl FrameSequence {
    /// # Errors
    ///
    /// Returns `AssetError::NoFrames` when `frames` is empty.
    pub fn new(frames: Vec<Frame>, label: &str) -> Result<Self, AssetError> {
        if frames.is_empty() {
            return Err(AssetError::NoFrames(label.to_string()));
        }
        Ok(Self {
            frames,
            placeholder: false,
        })
    }

    /// The single flat square shown for labels whose emote failed to decode.
    pub fn placeholder() -> Self {
        let bitmap = RgbaImage::from_pixel(PLACEHOLDER_SIZE.x, PLACEHOLDER_SIZE.y, Rgba(PLACEHOLDER_COLOR));
        Self {
            frames: vec![Frame::new(bitmap, FALLBACK_FRAME_DURATION_MS)],
            placeholder: true,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Never true for a constructed sequence.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Wraps `index` into range, so callers never index out of bounds.
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    pub fn duration_ms(&self, index: usize) -> u32 {
        self.frame(index).duration_ms
    }

    /// Sum of all frame durations.
    pub fn cycle_ms(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.duration_ms)).sum()
    }

    /// Size of the first frame; all frames of one sequence share it.
    pub fn size(&self) -> UVec2 {
        let (w, h) = self.frames[0].bitmap.dimensions();
        UVec2::new(w, h)
    }
}

/// Turns an asset key into frames. Implementations must be deterministic per key.
pub trait FrameDecoder: Send + Sync {
    /// # Errors
    ///
    /// Any `AssetError`; the caller substitutes a placeholder.
    fn decode(&self, key: &AssetKey) -> Result<FrameSequence, AssetError>;
}

/// Decodes emotes from image files in a folder, resizing every frame to [`EMOTE_SIZE`].
#[derive(Debug, Clone)]
pub struct DirectoryDecoder {
    root: PathBuf,
}

impl DirectoryDecoder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FrameDecoder for DirectoryDecoder {
    fn decode(&self, key: &AssetKey) -> Result<FrameSequence, AssetError> {
        let path = resolve_path(&self.root, key).ok_or_else(|| AssetError::NotFound(key.to_string()))?;
        let frames = decode_file(&path, EMOTE_SIZE)?;
        trace!(label = %key, frames = frames.len(), "Decoded emote");
        FrameSequence::new(frames, key.as_str())
    }
}

/// Decodes every frame of the image at `path`, resized to `size`.
///
/// The container is picked by extension; still images yield one frame with the fallback duration.
///
/// # Errors
///
/// Returns `AssetError::Io` if the file can't be opened and `AssetError::Decode` if it is malformed.
pub fn decode_file(path: &Path, size: UVec2) -> Result<Vec<Frame>, AssetError> {
    let reader = BufReader::new(File::open(path)?);
    let decode_err = |source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "gif" => {
            let decoder = GifDecoder::new(reader).map_err(decode_err)?;
            collect_animation(decoder, size).map_err(decode_err)
        }
        "webp" => {
            let decoder = WebPDecoder::new(reader).map_err(decode_err)?;
            if decoder.has_animation() {
                collect_animation(decoder, size).map_err(decode_err)
            } else {
                still_frame(decoder, size).map_err(decode_err)
            }
        }
        _ => decode_png(reader, size).map_err(decode_err),
    }
}

fn decode_png<R: BufRead + Seek>(reader: R, size: UVec2) -> image::ImageResult<Vec<Frame>> {
    let decoder = PngDecoder::new(reader)?;
    if decoder.is_apng()? {
        collect_animation(decoder.apng()?, size)
    } else {
        still_frame(decoder, size)
    }
}

fn collect_animation<'a, D: AnimationDecoder<'a>>(decoder: D, size: UVec2) -> image::ImageResult<Vec<Frame>> {
    decoder
        .into_frames()
        .map(|frame| {
            let frame = frame?;
            let duration_ms = delay_to_ms(frame.delay());
            Ok(Frame::new(resize(frame.into_buffer(), size), duration_ms))
        })
        .collect()
}

fn still_frame<D: ImageDecoder>(decoder: D, size: UVec2) -> image::ImageResult<Vec<Frame>> {
    let image = DynamicImage::from_decoder(decoder)?.to_rgba8();
    Ok(vec![Frame::new(resize(image, size), FALLBACK_FRAME_DURATION_MS)])
}

fn resize(bitmap: Bitmap, size: UVec2) -> Bitmap {
    if bitmap.dimensions() == (size.x, size.y) {
        return bitmap;
    }
    imageops::resize(&bitmap, size.x, size.y, FilterType::Lanczos3)
}
