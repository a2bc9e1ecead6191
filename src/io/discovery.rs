// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Finding the videos to label in a folder.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// List video files directly inside `dir`.
///
/// Only files whose name ends in `.` plus one of `extensions`
/// (case-insensitively) are kept, including symlinks to such files and
/// names such as `.mp4`. The directory listing order is preserved.
pub fn discover_videos(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read video folder {}", dir.display()))?;

    let mut videos = Vec::new();
    for entry in entries {
        let path = entry?.path();
        // Follows symlinks, unlike DirEntry::file_type.
        if !path.is_file() {
            continue;
        }
        if has_video_extension(&path, extensions) {
            videos.push(path);
        }
    }

    log::info!("Found {} videos in {}", videos.len(), dir.display());
    Ok(videos)
}

fn has_video_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    extensions.iter().any(|wanted| {
        let suffix = format!(".{}", wanted.trim_start_matches('.').to_lowercase());
        name.ends_with(&suffix)
    })
}
