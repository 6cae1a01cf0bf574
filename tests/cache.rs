use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use speculoos::prelude::*;
use typing_survivors::constants::animation::{FALLBACK_FRAME_DURATION_MS, PLACEHOLDER_SIZE};
use typing_survivors::texture::cache::SpriteCache;
use typing_survivors::texture::frames::{DirectoryDecoder, FrameSequence};

mod common;

use common::{call_count, key, CountingDecoder};

#[test]
fn test_get_decodes_once_per_label() {
    let decoder = CountingDecoder::default().with("bat", &[100, 50]).with("fang", &[80]);
    let calls = decoder.calls();
    let cache = SpriteCache::new(decoder);

    let first = cache.get(&key("bat"));
    let second = cache.get(&key("bat"));
    let third = cache.get(&key("bat"));

    assert_that(&Arc::ptr_eq(&first, &second)).is_true();
    assert_that(&Arc::ptr_eq(&second, &third)).is_true();
    assert_eq!(call_count(&calls), 1);

    cache.get(&key("fang"));
    assert_eq!(call_count(&calls), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_peek_does_not_decode() {
    let decoder = CountingDecoder::default().with("bat", &[100]);
    let calls = decoder.calls();
    let cache = SpriteCache::new(decoder);

    assert_that(&cache.peek(&key("bat"))).is_none();
    assert_that(&cache.contains(&key("bat"))).is_false();
    assert_eq!(call_count(&calls), 0);
}

#[test]
fn test_missing_asset_yields_placeholder() {
    let decoder = CountingDecoder::default();
    let calls = decoder.calls();
    let cache = SpriteCache::new(decoder);

    let sequence = cache.get(&key("nowhere"));

    assert_that(&sequence.is_placeholder()).is_true();
    assert_eq!(sequence.len(), 1);
    assert_eq!(sequence.duration_ms(0), FALLBACK_FRAME_DURATION_MS);
    assert_eq!(sequence.size(), PLACEHOLDER_SIZE);

    // The failure is cached like any other result.
    let again = cache.get(&key("nowhere"));
    assert_that(&Arc::ptr_eq(&sequence, &again)).is_true();
    assert_eq!(call_count(&calls), 1);
}

#[test]
fn test_placeholder_is_deterministic() {
    assert_eq!(FrameSequence::placeholder(), FrameSequence::placeholder());
}

#[test]
fn test_directory_decoder_missing_folder_falls_back() {
    let dir = std::env::temp_dir().join("typing-survivors-cache-missing-folder");
    let cache = SpriteCache::new(DirectoryDecoder::new(dir));

    let sequence = cache.get(&key("anything"));
    assert_that(&sequence.is_placeholder()).is_true();
}

#[test]
fn test_concurrent_population_shares_one_sequence() {
    let decoder = CountingDecoder::default().with("bat", &[100, 50]);
    let cache = Arc::new(SpriteCache::new(decoder));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.get(&key("bat")))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().expect("thread panicked")).collect();

    let stored = cache.peek(&key("bat")).expect("bat should be cached");
    for result in &results {
        assert_that(&Arc::ptr_eq(result, &stored)).is_true();
    }
}
