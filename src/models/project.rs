// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved labeling progress.
//!
//! A snapshot holds the labels gathered so far along with the folder and
//! interval they were made against, so a session can be resumed later.

use super::annotation::AnnotationStore;
use crate::io::serialization;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub input_folder: PathBuf,
    pub interval_ms: u64,
    #[serde(default)]
    pub labels: AnnotationStore,
}

impl ProjectData {
    /// Create a project with no labels yet.
    pub fn new(input_folder: PathBuf, interval_ms: u64) -> Self {
        Self {
            input_folder,
            interval_ms,
            labels: AnnotationStore::new(),
        }
    }

    /// Save as YAML or JSON, depending on the extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        serialization::export(self, path)
            .with_context(|| format!("Failed to save project {}", path.display()))?;
        log::info!("Saved {} labels to {}", self.labels.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let project: Self = serialization::import(path)
            .with_context(|| format!("Failed to load project {}", path.display()))?;
        log::info!("Loaded {} labels from {}", project.labels.len(), path.display());
        Ok(project)
    }
}
