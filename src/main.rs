// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video Clips Labeler
//!
//! Splits each video in a folder into fixed-length clips, records at most
//! one label per clip, and exports every label to a CSV table.

mod app;
mod config;
mod io;
mod models;
mod util;

use anyhow::{Context, Result};
use app::{Session, SessionEvent};
use clap::{Parser, Subcommand};
use config::Config;
use models::catalog::{natural_order, VideoId};
use models::clip::{segment, Interval};
use models::project::ProjectData;
use std::path::PathBuf;
use util::timecode::TimeKey;

#[derive(Parser)]
#[command(name = "cliplabel")]
#[command(about = "Label fixed-length clips of videos and export them as CSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a video of the given length is split into clips
    Clips {
        /// Video duration in milliseconds
        #[arg(long)]
        duration_ms: u64,
        /// Clip interval in seconds
        #[arg(long, default_value = "1")]
        interval_secs: u64,
    },

    /// Print names in the order the export uses
    Sort {
        /// Video file names
        names: Vec<String>,
    },

    /// Replay a recorded event script against a folder and export the labels
    Replay {
        /// Folder containing the videos
        #[arg(short, long)]
        dir: PathBuf,
        /// Event script (.yaml, .yml or .json)
        #[arg(short, long)]
        events: PathBuf,
        /// Session config (.yaml, .yml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Clip interval in seconds, overriding the config
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Export file base name, written to <dir>/output/<name>.csv
        #[arg(short, long)]
        output: Option<String>,
        /// Project snapshot to resume labels from
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Save a project snapshot after the replay
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clips {
            duration_ms,
            interval_secs,
        } => {
            let interval = Interval::from_secs(interval_secs)
                .context("Interval must be a positive number of seconds")?;
            let clips = segment(duration_ms, interval);
            for (index, &start) in clips.starts().iter().enumerate() {
                let end = clips.window(index).map_or(duration_ms, |w| w.end);
                println!("{}\t{}-{}", TimeKey::from_millis(start), start, end);
            }
        }

        Commands::Sort { names } => {
            let ids: Vec<VideoId> = names.into_iter().map(VideoId::new).collect();
            for id in natural_order(&ids) {
                println!("{}", id);
            }
        }

        Commands::Replay {
            dir,
            events,
            config,
            interval_secs,
            output,
            resume,
            save,
        } => {
            let mut config = match config {
                Some(path) => Config::load(&path)?,
                None => Config::default(),
            };
            if let Some(secs) = interval_secs {
                config.interval_secs = secs;
            }
            config.validate()?;
            log::info!("{}", config.guide());

            let name = output.unwrap_or_else(|| config.output_name.clone());
            let mut session = Session::new(config);

            if let Some(path) = resume {
                session.restore(ProjectData::load(&path)?);
            }
            // The flag wins over a resumed snapshot's interval.
            if let Some(secs) = interval_secs {
                session.dispatch(SessionEvent::IntervalChanged { secs })?;
            }
            if let Some(command) = session.open_folder(&dir)? {
                log::debug!("Playback: {:?}", command);
            }
            if session.catalog().is_empty() {
                log::warn!("No videos found in {}", dir.display());
            }

            let script: Vec<SessionEvent> = io::serialization::import(&events)
                .with_context(|| format!("Failed to read event script {}", events.display()))?;
            log::info!("Replaying {} events", script.len());

            for event in script {
                match session.dispatch(event) {
                    Ok(Some(command)) => log::debug!("Playback: {:?}", command),
                    Ok(None) => {}
                    Err(e) => log::warn!("{}", e),
                }
                log_selection(&session);
            }

            log::info!(
                "{} labels across {} videos, {} ms clips",
                session.store().len(),
                session.catalog().len(),
                session.interval().as_millis()
            );
            if session.store().is_empty() {
                log::warn!("No labels to export");
            }
            let path = session.export(&name)?;
            println!("Labels saved to {}", path.display());

            if let Some(path) = save {
                session.snapshot().save(&path)?;
            }
        }
    }

    Ok(())
}

/// Log the selected clip and the label its button shows.
fn log_selection(session: &Session) {
    let Some(video) = session.current_video() else {
        return;
    };
    let Some(window) = session.loop_window() else {
        log::debug!("{}: no clips yet", video.id);
        return;
    };
    let cursor = session.cursor();
    let checked = session
        .checked_label()
        .map_or_else(|| "none".to_string(), |label| label.to_string());
    log::debug!(
        "{}: clip {}/{} [{}-{}] label {}",
        video.id,
        cursor.clip() + 1,
        cursor.clips().len(),
        window.start,
        window.end,
        checked
    );
}
