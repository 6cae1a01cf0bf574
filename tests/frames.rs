use std::fs::{self, File};
use std::path::PathBuf;

use image::codecs::gif::GifEncoder;
use image::{Delay, Frame as ImageFrame, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use typing_survivors::asset::{AssetKey, Vocabulary};
use typing_survivors::constants::animation::{EMOTE_SIZE, FALLBACK_FRAME_DURATION_MS, MIN_FRAME_DURATION_MS};
use typing_survivors::error::AssetError;
use typing_survivors::texture::frames::{decode_file, DirectoryDecoder, FrameDecoder};

mod common;

/// A fresh, empty directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("typing-survivors-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir should be creatable");
    dir
}

fn write_gif(path: &PathBuf, delays_ms: &[u32]) {
    let file = File::create(path).expect("gif should be creatable");
    let mut encoder = GifEncoder::new(file);
    let frames = delays_ms.iter().enumerate().map(|(i, &ms)| {
        let buffer = RgbaImage::from_pixel(32, 24, Rgba([(i * 60) as u8, 10, 10, 255]));
        ImageFrame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(ms, 1))
    });
    encoder.encode_frames(frames).expect("gif should encode");
}

#[test]
fn test_still_png_is_single_frame() {
    let dir = scratch_dir("still-png");
    let path = dir.join("kappa.png");
    RgbaImage::from_pixel(10, 20, Rgba([1, 2, 3, 255])).save(&path).unwrap();

    let frames = decode_file(&path, EMOTE_SIZE).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration_ms, FALLBACK_FRAME_DURATION_MS);
    assert_eq!(frames[0].bitmap.dimensions(), (EMOTE_SIZE.x, EMOTE_SIZE.y));
}

#[test]
fn test_gif_keeps_delays_and_coerces_zero() {
    let dir = scratch_dir("animated-gif");
    let path = dir.join("dance.gif");
    write_gif(&path, &[100, 0, 50]);

    let frames = decode_file(&path, EMOTE_SIZE).unwrap();
    let durations: Vec<u32> = frames.iter().map(|f| f.duration_ms).collect();

    assert_eq!(durations, vec![100, MIN_FRAME_DURATION_MS, 50]);
    for frame in &frames {
        assert_eq!(frame.bitmap.dimensions(), (EMOTE_SIZE.x, EMOTE_SIZE.y));
    }
}

#[test]
fn test_corrupt_file_is_decode_error() {
    let dir = scratch_dir("corrupt");
    let path = dir.join("broken.gif");
    fs::write(&path, b"definitely not a gif").unwrap();

    let result = decode_file(&path, EMOTE_SIZE);
    assert!(matches!(result, Err(AssetError::Decode { .. })), "got {result:?}");
}

#[test]
fn test_directory_decoder_resolves_by_label() {
    let dir = scratch_dir("directory-decoder");
    write_gif(&dir.join("wave.gif"), &[70, 70]);

    let decoder = DirectoryDecoder::new(&dir);
    let sequence = decoder.decode(&common::key("wave")).unwrap();
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.cycle_ms(), 140);

    let missing = decoder.decode(&common::key("absent"));
    assert!(matches!(missing, Err(AssetError::NotFound(_))));
}

#[test]
fn test_directory_decoder_ignores_extension_case() {
    let dir = scratch_dir("mixed-case-extension");
    RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255])).save_with_format(dir.join("bat.Png"), image::ImageFormat::Png).unwrap();
    write_gif(&dir.join("Wave.GiF"), &[40, 40, 40]);

    let vocabulary = Vocabulary::scan(&dir).unwrap();
    assert_that(&vocabulary.contains("bat")).is_true();

    let decoder = DirectoryDecoder::new(&dir);
    let bat = decoder.decode(&common::key("bat")).unwrap();
    assert_that(&bat.is_placeholder()).is_false();
    assert_eq!(bat.len(), 1);

    let wave = decoder.decode(&common::key("Wave")).unwrap();
    assert_eq!(wave.len(), 3);

    // Stems still match exactly.
    assert!(matches!(decoder.decode(&common::key("wave")), Err(AssetError::NotFound(_))));
}

#[test]
fn test_vocabulary_scan() {
    let dir = scratch_dir("vocabulary");
    for name in ["bat.png", "bat.gif", "Fang.GIF", "moon.webp", "notes.txt"] {
        fs::write(dir.join(name), b"").unwrap();
    }
    fs::create_dir_all(dir.join("nested.png")).unwrap();

    let vocabulary = Vocabulary::scan(&dir).unwrap();
    let labels: Vec<&str> = vocabulary.keys().iter().map(AssetKey::as_str).collect();

    assert_eq!(labels, vec!["Fang", "bat", "moon"]);
    assert_that(&vocabulary.contains("moon")).is_true();
    assert_that(&vocabulary.contains("notes")).is_false();
}

#[test]
fn test_vocabulary_scan_empty_folder_is_fatal() {
    let dir = scratch_dir("empty-vocabulary");
    fs::write(dir.join("readme.md"), b"nothing to see").unwrap();

    let result = Vocabulary::scan(&dir);
    assert!(matches!(result, Err(AssetError::EmptyVocabulary(_))));
}
