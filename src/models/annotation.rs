// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-clip label assignments.
//!
//! Each clip of each video carries at most one label. Applying a label is a
//! toggle: applying the label a clip already has removes it, applying a
//! different one replaces it.

use crate::models::catalog::VideoId;
use crate::util::timecode::TimeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A class index chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub u8);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a call to [`AnnotationStore::set_label`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelChange {
    Assigned(Label),
    Cleared(Label),
    Replaced { previous: Label, current: Label },
}

/// Labels keyed by video, then by clip time key.
///
/// A video only has an entry while at least one of its clips is labeled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationStore {
    videos: BTreeMap<VideoId, BTreeMap<TimeKey, Label>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle or replace the label on one clip.
    pub fn set_label(&mut self, video: &VideoId, key: &TimeKey, label: Label) -> LabelChange {
        let clips = self.videos.entry(video.clone()).or_default();

        let change = match clips.remove(key) {
            None => {
                clips.insert(key.clone(), label);
                LabelChange::Assigned(label)
            }
            Some(previous) if previous == label => LabelChange::Cleared(label),
            Some(previous) => {
                clips.insert(key.clone(), label);
                LabelChange::Replaced {
                    previous,
                    current: label,
                }
            }
        };

        if clips.is_empty() {
            self.videos.remove(video);
        }

        change
    }

    pub fn get_label(&self, video: &VideoId, key: &TimeKey) -> Option<Label> {
        self.videos.get(video)?.get(key).copied()
    }

    /// Labeled clips of one video, in key order.
    pub fn clips(&self, video: &VideoId) -> impl Iterator<Item = (&TimeKey, Label)> {
        self.videos
            .get(video)
            .into_iter()
            .flat_map(|clips| clips.iter().map(|(key, label)| (key, *label)))
    }

    /// Videos with at least one labeled clip.
    pub fn videos(&self) -> impl Iterator<Item = &VideoId> {
        self.videos.keys()
    }

    pub fn contains_video(&self, video: &VideoId) -> bool {
        self.videos.contains_key(video)
    }

    /// Total number of labeled clips.
    pub fn len(&self) -> usize {
        self.videos.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}
