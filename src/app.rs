// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state and event dispatch.
//!
//! A [`Session`] owns everything a labeling run mutates: the catalog, the
//! cursor and the label store. Playback, file pickers and key bindings live
//! outside; they report what happened as [`SessionEvent`]s and receive
//! [`PlaybackCommand`]s back. Events are handled one at a time, each to
//! completion, so the state never sees interleaved updates.

use crate::config::{Config, INTERVAL_SECS_RANGE};
use crate::io::{discovery, export};
use crate::models::{
    annotation::{AnnotationStore, Label, LabelChange},
    catalog::{Catalog, CatalogEntry, VideoId},
    clip::{segment, Interval, LoopWindow},
    cursor::Cursor,
    project::ProjectData,
};
use crate::util::timecode::{self, FormatError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Something the outside world reports to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Open the video at this discovery index.
    VideoSelected { index: usize },
    NextVideo,
    PrevVideo,
    /// Playback learned how long a video is.
    DurationKnown { video: VideoId, millis: u64 },
    /// Operator picked a new clip length, in seconds.
    IntervalChanged { secs: u64 },
    /// Playback moved.
    PositionReport { millis: u64 },
    ClipSelected { index: usize },
    /// Operator picked a clip by its displayed `MM:SS.` key.
    ClipKeySelected { key: String },
    NextClip,
    PrevClip,
    LabelRequested { label: Label },
    LoopToggled { enabled: bool },
}

/// What the session asks playback to do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    Open(PathBuf),
    Seek(u64),
}

/// One labeling session over one folder of videos.
pub struct Session {
    config: Config,

    /// Folder the catalog was discovered in; exports go below it
    input_folder: Option<PathBuf>,

    catalog: Catalog,

    /// Every label assigned so far
    store: AnnotationStore,

    cursor: Cursor,

    /// Clip length applied the next time a clip list is built
    interval: Interval,

    /// Duration of the open video, once playback has reported it
    duration: Option<u64>,

    /// Hold playback inside the selected clip
    loop_enabled: bool,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let interval = config.interval();
        Self {
            config,
            input_folder: None,
            catalog: Catalog::default(),
            store: AnnotationStore::new(),
            cursor: Cursor::new(),
            interval,
            duration: None,
            loop_enabled: true,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Discover the videos in `dir` and open the first one.
    pub fn open_folder(&mut self, dir: &Path) -> Result<Option<PlaybackCommand>> {
        let paths = discovery::discover_videos(dir, &self.config.extensions)?;
        self.input_folder = Some(dir.to_path_buf());
        Ok(self.load_catalog(paths))
    }

    /// Replace the catalog and open its first video.
    ///
    /// Labels from earlier catalogs are kept.
    pub fn load_catalog(&mut self, paths: Vec<PathBuf>) -> Option<PlaybackCommand> {
        self.catalog = Catalog::load(paths);
        self.cursor = Cursor::new();
        self.duration = None;
        log::info!("Catalog loaded with {} videos", self.catalog.len());
        self.open_video(0)
    }

    /// The open video, if any.
    pub fn current_video(&self) -> Option<&CatalogEntry> {
        self.cursor.video().and_then(|i| self.catalog.get(i))
    }

    /// Label the selected clip currently carries, if any.
    ///
    /// Derived from the store on every call; label buttons mirror this.
    pub fn checked_label(&self) -> Option<Label> {
        let video = self.current_video()?;
        let key = self.cursor.current_key()?;
        self.store.get_label(&video.id, &key)
    }

    pub fn loop_window(&self) -> Option<LoopWindow> {
        self.cursor.loop_window()
    }

    /// Apply one event. Only a malformed clip key is reported as an error;
    /// every other invalid request is absorbed as a no-op.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<Option<PlaybackCommand>, FormatError> {
        log::debug!("Event: {:?}", event);

        let command = match event {
            SessionEvent::VideoSelected { index } => self.open_video(index),
            SessionEvent::NextVideo => {
                let index = self.cursor.next_video(self.catalog.len());
                index.and_then(|i| self.open_video(i))
            }
            SessionEvent::PrevVideo => {
                let index = self.cursor.prev_video(self.catalog.len());
                index.and_then(|i| self.open_video(i))
            }
            SessionEvent::DurationKnown { video, millis } => self.duration_known(&video, millis),
            SessionEvent::IntervalChanged { secs } => {
                self.change_interval(secs);
                None
            }
            SessionEvent::PositionReport { millis } => self.position_report(millis),
            SessionEvent::ClipSelected { index } => Self::seek_to(self.cursor.select_clip(index)),
            SessionEvent::ClipKeySelected { key } => {
                let window = self.cursor.select_key(&key)?;
                if window.is_none() {
                    log::warn!("No clip starts at {}", key);
                }
                Self::seek_to(window)
            }
            SessionEvent::NextClip => Self::seek_to(self.cursor.next_clip()),
            SessionEvent::PrevClip => Self::seek_to(self.cursor.prev_clip()),
            SessionEvent::LabelRequested { label } => {
                self.request_label(label);
                None
            }
            SessionEvent::LoopToggled { enabled } => {
                self.loop_enabled = enabled;
                log::debug!("Loop {}", if enabled { "on" } else { "off" });
                None
            }
        };

        Ok(command)
    }

    fn open_video(&mut self, index: usize) -> Option<PlaybackCommand> {
        let index = self.cursor.select_video(index, self.catalog.len())?;
        self.duration = None;
        let entry = self.catalog.get(index)?;
        log::info!("Opened video {} ({}/{})", entry.id, index + 1, self.catalog.len());
        Some(PlaybackCommand::Open(entry.path.clone()))
    }

    /// Build the open video's clips and start playback at the first one.
    fn duration_known(&mut self, video: &VideoId, millis: u64) -> Option<PlaybackCommand> {
        match self.current_video() {
            Some(entry) if &entry.id == video => {}
            _ => {
                log::warn!("Ignoring duration for {} which is not open", video);
                return None;
            }
        }
        self.duration = Some(millis);
        self.resegment();
        Some(PlaybackCommand::Seek(0))
    }

    fn change_interval(&mut self, secs: u64) {
        let Some(interval) = allowed_interval(secs) else {
            log::warn!("Ignoring interval of {} seconds", secs);
            return;
        };
        self.interval = interval;
        log::info!("Interval: {} sec", secs);
        self.resegment();
    }

    /// Rebuild the open video's clips. Other videos are untouched.
    fn resegment(&mut self) {
        let Some(duration) = self.duration else {
            return;
        };
        let clips = segment(duration, self.interval);
        log::info!(
            "Split {} into {} clips of {} ms",
            timecode::to_display(duration),
            clips.len(),
            self.interval.as_millis()
        );
        self.cursor.set_clips(clips);
    }

    fn position_report(&self, millis: u64) -> Option<PlaybackCommand> {
        if !self.loop_enabled {
            return None;
        }
        let target = self.cursor.loop_window()?.rewind_target(millis)?;
        Some(PlaybackCommand::Seek(target))
    }

    fn seek_to(window: Option<LoopWindow>) -> Option<PlaybackCommand> {
        window.map(|w| PlaybackCommand::Seek(w.start))
    }

    fn request_label(&mut self, label: Label) {
        if !self.config.has_label(label) {
            log::warn!("Ignoring unknown label {}", label);
            return;
        }
        let (Some(video), Some(key)) = (self.current_video(), self.cursor.current_key()) else {
            log::warn!("Ignoring label {} with no clip selected", label);
            return;
        };
        let video = video.id.clone();

        match self.store.set_label(&video, &key, label) {
            LabelChange::Assigned(l) => log::info!("{} {}: labeled {}", video, key, l),
            LabelChange::Cleared(l) => log::info!("{} {}: cleared {}", video, key, l),
            LabelChange::Replaced { previous, current } => {
                log::info!("{} {}: {} -> {}", video, key, previous, current)
            }
        }
    }

    /// Rows of the label table, as they would be exported now.
    pub fn export_rows(&self) -> Vec<export::ExportRow> {
        export::export(&self.catalog, &self.store)
    }

    /// Write the label table below the input folder.
    ///
    /// A blank or unsafe `name` falls back to the configured default.
    pub fn export(&self, name: &str) -> Result<PathBuf> {
        let folder = self
            .input_folder
            .as_deref()
            .context("No video folder is open")?;
        let name = export::sanitize_name(name, &self.config.output_name);
        export::write_csv_file(folder, name, &self.export_rows())
    }

    /// Capture labels for saving.
    pub fn snapshot(&self) -> ProjectData {
        let folder = self.input_folder.clone().unwrap_or_default();
        let mut project = ProjectData::new(folder, self.interval.as_millis());
        project.labels = self.store.clone();
        project
    }

    /// Resume from a saved snapshot, replacing the current labels.
    ///
    /// The snapshot's interval is adopted only when it is a whole number of
    /// seconds inside the allowed range.
    pub fn restore(&mut self, project: ProjectData) {
        let secs = project.interval_ms / 1000;
        match allowed_interval(secs) {
            Some(interval) if project.interval_ms % 1000 == 0 => self.interval = interval,
            _ => log::warn!(
                "Ignoring saved interval of {} ms, keeping {} ms",
                project.interval_ms,
                self.interval.as_millis()
            ),
        }
        self.store = project.labels;
        log::info!("Restored {} labels", self.store.len());
        self.resegment();
    }
}

fn allowed_interval(secs: u64) -> Option<Interval> {
    if INTERVAL_SECS_RANGE.contains(&secs) {
        Interval::from_secs(secs)
    } else {
        None
    }
}
