// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The set of videos being labeled in a session.
//!
//! Navigation follows the order videos were discovered in. Export uses the
//! natural order, where embedded numbers compare by value (`clip2` sorts
//! before `clip10`) and text compares case-insensitively.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

/// A video's file name. Unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Id for a path: its file name, or the whole path if it has none.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A discovered video: where it lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: VideoId,
    pub path: PathBuf,
}

/// Videos in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from discovered paths, keeping their order.
    pub fn load(paths: Vec<PathBuf>) -> Self {
        let entries = paths
            .into_iter()
            .map(|path| CatalogEntry {
                id: VideoId::from_path(&path),
                path,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, id: &VideoId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &VideoId> {
        self.entries.iter().map(|e| &e.id)
    }
}

/// One run of a natural sort key.
///
/// Keys always start with a text run (possibly empty) and alternate, so a
/// text run is never compared against a number run at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Run {
    Text(String),
    Number(Digits),
}

/// A digit run compared by numeric value without parsing, so arbitrarily
/// long runs cannot overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Self(trimmed.to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn natural_key(name: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();

    for c in name.chars() {
        if c.is_ascii_digit() {
            if digits.is_empty() {
                runs.push(Run::Text(std::mem::take(&mut text).to_lowercase()));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                runs.push(Run::Number(Digits::new(&std::mem::take(&mut digits))));
            }
            text.push(c);
        }
    }

    if !digits.is_empty() {
        runs.push(Run::Number(Digits::new(&digits)));
    }
    runs.push(Run::Text(text.to_lowercase()));
    runs
}

/// Sort ids in natural order. Equal keys keep their input order.
pub fn natural_order<'a, I>(ids: I) -> Vec<VideoId>
where
    I: IntoIterator<Item = &'a VideoId>,
{
    let mut sorted: Vec<VideoId> = ids.into_iter().cloned().collect();
    sorted.sort_by_cached_key(|id| natural_key(id.as_str()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<VideoId> {
        names.iter().map(|n| VideoId::from(*n)).collect()
    }

    fn names(ids: &[VideoId]) -> Vec<&str> {
        ids.iter().map(VideoId::as_str).collect()
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let input = ids(&["clip10.mp4", "clip2.mp4", "clip1.mp4"]);
        let sorted = natural_order(&input);
        assert_eq!(names(&sorted), ["clip1.mp4", "clip2.mp4", "clip10.mp4"]);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let input = ids(&["b.mp4", "A.mp4", "a2.mp4", "C1.mov"]);
        let sorted = natural_order(&input);
        // "a" is a prefix of "a.mp", so the numbered name sorts first.
        assert_eq!(names(&sorted), ["a2.mp4", "A.mp4", "b.mp4", "C1.mov"]);
    }

    #[test]
    fn test_equal_keys_keep_discovery_order() {
        let input = ids(&["Video01.mp4", "video1.mp4", "VIDEO001.mp4"]);
        let sorted = natural_order(&input);
        assert_eq!(names(&sorted), ["Video01.mp4", "video1.mp4", "VIDEO001.mp4"]);
    }

    #[test]
    fn test_leading_digits_and_long_runs() {
        let input = ids(&[
            "100000000000000000000000001.mp4",
            "99999999999999999999999999.mp4",
            "2.mp4",
            "x.mp4",
        ]);
        let sorted = natural_order(&input);
        assert_eq!(
            names(&sorted),
            [
                "2.mp4",
                "99999999999999999999999999.mp4",
                "100000000000000000000000001.mp4",
                "x.mp4",
            ]
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        let input = ids(&["clip1a.mp4", "clip1.mp4", "clip"]);
        let sorted = natural_order(&input);
        assert_eq!(names(&sorted), ["clip", "clip1.mp4", "clip1a.mp4"]);
    }

    #[test]
    fn test_catalog_keeps_discovery_order() {
        let catalog = Catalog::load(vec![
            PathBuf::from("/videos/b10.mp4"),
            PathBuf::from("/videos/b2.mp4"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().id.as_str(), "b10.mp4");
        assert_eq!(catalog.position(&VideoId::from("b2.mp4")), Some(1));
        assert_eq!(catalog.position(&VideoId::from("missing.mp4")), None);
    }
}
