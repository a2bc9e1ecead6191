// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Splitting a video's timeline into fixed-length clips.
//!
//! Clips start at multiples of the interval. When the last clip would be
//! shorter than one interval it is folded into the clip before it, so the
//! penultimate clip may run longer than the interval but no clip is ever a
//! sliver.

use crate::util::timecode::TimeKey;
use std::num::NonZeroU64;

/// Clip length in milliseconds. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval(NonZeroU64);

impl Interval {
    pub fn from_millis(ms: u64) -> Option<Self> {
        NonZeroU64::new(ms).map(Self)
    }

    pub fn from_secs(secs: u64) -> Option<Self> {
        secs.checked_mul(1000).and_then(Self::from_millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0.get()
    }
}

impl Default for Interval {
    fn default() -> Self {
        const ONE_SECOND: NonZeroU64 = match NonZeroU64::new(1000) {
            Some(ms) => ms,
            None => unreachable!(),
        };
        Self(ONE_SECOND)
    }
}

/// The `[start, end)` range playback is held inside while looping a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopWindow {
    pub start: u64,
    pub end: u64,
}

impl LoopWindow {
    /// Where playback should jump to, if `position` has run past the end.
    pub fn rewind_target(&self, position: u64) -> Option<u64> {
        (position > self.end).then_some(self.start)
    }
}

/// Ordered clip start offsets for one video at one interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipList {
    starts: Vec<u64>,
    duration: u64,
}

impl ClipList {
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn starts(&self) -> &[u64] {
        &self.starts
    }

    pub fn start(&self, index: usize) -> Option<u64> {
        self.starts.get(index).copied()
    }

    pub fn key(&self, index: usize) -> Option<TimeKey> {
        self.start(index).map(TimeKey::from_millis)
    }

    /// Loop window for a clip: up to the next clip's start, or the end of
    /// the video for the last clip.
    pub fn window(&self, index: usize) -> Option<LoopWindow> {
        let start = self.start(index)?;
        let end = self.start(index + 1).unwrap_or(self.duration);
        Some(LoopWindow { start, end })
    }

    /// Index of the clip starting exactly at `ms`.
    pub fn position_of(&self, ms: u64) -> Option<usize> {
        self.starts.binary_search(&ms).ok()
    }
}

/// Cut `duration` milliseconds into clips of `interval`.
///
/// Returns an empty list only for a zero duration.
pub fn segment(duration: u64, interval: Interval) -> ClipList {
    let step = interval.as_millis();
    let count = duration.div_ceil(step);

    let mut starts: Vec<u64> = (0..count).map(|i| i * step).collect();

    if let Some(&last) = starts.last() {
        if starts.len() > 1 && duration - last < step {
            starts.pop();
        }
    }

    ClipList { starts, duration }
}
