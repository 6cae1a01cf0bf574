//! Emote vocabulary: the labels enemies can carry, one per image in the asset folder.

use std::borrow::Borrow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bevy_ecs::resource::Resource;
use tracing::{debug, info, trace};

use crate::constants::assets::EXTENSIONS;
use crate::error::AssetError;

/// A label naming a decodable emote. Never empty; cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey(Arc<str>);

impl AssetKey {
    /// Returns `None` for an empty label, which could never be typed.
    pub fn new(label: impl AsRef<str>) -> Option<Self> {
        let label = label.as_ref();
        (!label.is_empty()).then(|| Self(Arc::from(label)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Position of `path`'s extension in [`EXTENSIONS`], ignoring case.
fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    EXTENSIONS.iter().position(|known| known.eq_ignore_ascii_case(ext))
}

/// Whether `path` has one of the recognized emote extensions.
pub fn is_emote_file(path: &Path) -> bool {
    extension_rank(path).is_some()
}

/// The set of labels available for spawning, fixed at startup.
#[derive(Resource, Debug, Clone)]
pub struct Vocabulary {
    keys: Vec<AssetKey>,
}

impl Vocabulary {
    /// Builds a vocabulary from arbitrary labels, dropping empties and duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<AssetKey> = labels.into_iter().filter_map(AssetKey::new).collect();
        keys.sort();
        keys.dedup();
        Self { keys }
    }

    /// Scans `dir` for emote files; each file stem becomes a label.
    ///
    /// # Errors
    ///
    /// Returns `AssetError::Io` if the directory can't be read and
    /// `AssetError::EmptyVocabulary` if it holds no usable emotes.
    pub fn scan(dir: &Path) -> Result<Self, AssetError> {
        debug!(dir = %dir.display(), "Scanning emote folder");

        let mut labels = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_emote_file(&path) {
                trace!(path = %path.display(), "Skipping non-emote entry");
                continue;
            }

            match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => labels.push(stem.to_string()),
                None => debug!(path = %path.display(), "Skipping emote with a non UTF-8 name"),
            }
        }

        let vocabulary = Self::from_labels(labels);
        if vocabulary.is_empty() {
            return Err(AssetError::EmptyVocabulary(dir.to_path_buf()));
        }

        info!(count = vocabulary.len(), "Loaded emote vocabulary");
        Ok(vocabulary)
    }

    pub fn keys(&self) -> &[AssetKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.keys.binary_search_by(|key| key.as_str().cmp(label)).is_ok()
    }
}

/// Locates the file backing `key` under `dir`.
///
/// The stem must equal the label exactly; the extension may be in any case. When several
/// files share the stem, the earliest extension in [`EXTENSIONS`] wins.
pub fn resolve_path(dir: &Path, key: &AssetKey) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && path.file_stem().and_then(|stem| stem.to_str()) == Some(key.as_str()))
        .filter_map(|path| extension_rank(&path).map(|rank| (rank, path)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_rejected() {
        assert!(AssetKey::new("").is_none());
        assert_eq!(AssetKey::new("bat").unwrap().as_str(), "bat");
    }

    #[test]
    fn test_vocabulary_sorted_and_deduplicated() {
        let vocabulary = Vocabulary::from_labels(["night", "bat", "", "bat", "fang"]);
        let labels: Vec<&str> = vocabulary.keys().iter().map(AssetKey::as_str).collect();
        assert_eq!(labels, vec!["bat", "fang", "night"]);
        assert!(vocabulary.contains("fang"));
        assert!(!vocabulary.contains("crypt"));
    }

    #[test]
    fn test_is_emote_file() {
        assert!(is_emote_file(Path::new("emotes/monkaCough.png")));
        assert!(is_emote_file(Path::new("emotes/catJAM.GIF")));
        assert!(is_emote_file(Path::new("emotes/pepeD.webp")));
        assert!(!is_emote_file(Path::new("emotes/readme.txt")));
        assert!(!is_emote_file(Path::new("emotes/noextension")));
    }
}
