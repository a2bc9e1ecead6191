// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Which video and which clip are selected.
//!
//! All moves clamp to the valid range instead of failing, so stepping past
//! either end of a list is a no-op.

use crate::models::clip::{ClipList, LoopWindow};
use crate::util::timecode::{self, FormatError, TimeKey};

/// Selection state over the catalog and the open video's clips.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    video: Option<usize>,
    clip: usize,
    clips: ClipList,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn video(&self) -> Option<usize> {
        self.video
    }

    pub fn clip(&self) -> usize {
        self.clip
    }

    pub fn clips(&self) -> &ClipList {
        &self.clips
    }

    /// Open a video by discovery index, clamped to the catalog.
    ///
    /// The clip list is dropped until the new video's duration is known.
    /// Returns the index actually selected, or `None` for an empty catalog.
    pub fn select_video(&mut self, index: usize, video_count: usize) -> Option<usize> {
        if video_count == 0 {
            return None;
        }
        let index = index.min(video_count - 1);
        self.video = Some(index);
        self.clip = 0;
        self.clips = ClipList::default();
        Some(index)
    }

    /// Step to the next video. `None` when already at the last one.
    pub fn next_video(&mut self, video_count: usize) -> Option<usize> {
        let next = match self.video {
            Some(current) if current + 1 < video_count => current + 1,
            Some(_) => return None,
            None => 0,
        };
        self.select_video(next, video_count)
    }

    /// Step to the previous video. `None` when already at the first one.
    pub fn prev_video(&mut self, video_count: usize) -> Option<usize> {
        match self.video {
            Some(current) if current > 0 => self.select_video(current - 1, video_count),
            _ => None,
        }
    }

    /// Replace the open video's clips and go back to the first clip.
    pub fn set_clips(&mut self, clips: ClipList) {
        self.clips = clips;
        self.clip = 0;
    }

    /// Select a clip, clamped to the list. `None` while the list is empty.
    pub fn select_clip(&mut self, index: usize) -> Option<LoopWindow> {
        if self.clips.is_empty() {
            return None;
        }
        self.clip = index.min(self.clips.len() - 1);
        self.loop_window()
    }

    /// Advance one clip. `None` at the last clip.
    pub fn next_clip(&mut self) -> Option<LoopWindow> {
        if self.clip + 1 >= self.clips.len() {
            return None;
        }
        self.select_clip(self.clip + 1)
    }

    /// Go back one clip. `None` at the first clip.
    pub fn prev_clip(&mut self) -> Option<LoopWindow> {
        if self.clip == 0 || self.clips.is_empty() {
            return None;
        }
        self.select_clip(self.clip - 1)
    }

    /// Select the clip a displayed key names.
    ///
    /// `Ok(None)` when no clip starts at that time.
    pub fn select_key(&mut self, key: &str) -> Result<Option<LoopWindow>, FormatError> {
        let start = timecode::from_key(key)?;
        Ok(self
            .clips
            .position_of(start)
            .and_then(|index| self.select_clip(index)))
    }

    /// Time key of the selected clip.
    pub fn current_key(&self) -> Option<TimeKey> {
        self.clips.key(self.clip)
    }

    /// Playback bounds of the selected clip.
    pub fn loop_window(&self) -> Option<LoopWindow> {
        self.clips.window(self.clip)
    }
}
