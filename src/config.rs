// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Files are YAML or JSON, chosen by extension.

use crate::io::serialization;
use crate::models::annotation::Label;
use crate::models::clip::Interval;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Smallest and largest clip interval an operator may pick, in seconds.
pub const INTERVAL_SECS_RANGE: std::ops::RangeInclusive<u64> = 1..=10;

/// Base name used when the operator gives no usable export name.
pub const DEFAULT_OUTPUT_NAME: &str = "label";

/// One selectable class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub id: Label,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clip length in whole seconds.
    pub interval_secs: u64,
    pub labels: Vec<LabelSpec>,
    pub output_name: String,
    /// Video file extensions to pick up, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            labels: (0..3)
                .map(|id| LabelSpec {
                    id: Label(id),
                    description: format!("description for class {id}"),
                })
                .collect(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            extensions: ["mp4", "mov", "avi"].map(String::from).to_vec(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = serialization::import(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !INTERVAL_SECS_RANGE.contains(&self.interval_secs) {
            bail!(
                "Interval must be between {} and {} seconds, got {}",
                INTERVAL_SECS_RANGE.start(),
                INTERVAL_SECS_RANGE.end(),
                self.interval_secs
            );
        }
        if self.labels.is_empty() {
            bail!("At least one label must be configured");
        }
        let mut seen = HashSet::new();
        for spec in &self.labels {
            if !seen.insert(spec.id) {
                bail!("Label {} is configured more than once", spec.id);
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Interval {
        Interval::from_secs(self.interval_secs).unwrap_or_default()
    }

    pub fn has_label(&self, label: Label) -> bool {
        self.labels.iter().any(|spec| spec.id == label)
    }

    /// One-line guide listing every class, e.g. `[0] cat [1] dog`.
    pub fn guide(&self) -> String {
        self.labels
            .iter()
            .map(|spec| format!("[{}] {}", spec.id, spec.description))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
