// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label table export.
//!
//! Rows are grouped by video in natural order and, within a video, ordered
//! by time key. The result depends only on the stored labels and the set of
//! known videos, never on where the cursor has been.

use crate::config::DEFAULT_OUTPUT_NAME;
use crate::models::annotation::{AnnotationStore, Label};
use crate::models::catalog::{natural_order, Catalog, VideoId};
use crate::util::timecode::TimeKey;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Folder under the input folder that exports are written to.
pub const OUTPUT_DIR: &str = "output";

/// Column headers of the exported table.
pub const HEADER: [&str; 3] = ["Video", "TimeStamp", "Label"];

/// One labeled clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub video: VideoId,
    pub key: TimeKey,
    pub label: Label,
}

/// Flatten the store into ordered rows.
///
/// Videos that have labels but are no longer in the catalog are still
/// exported; they sort among the others by natural order.
pub fn export(catalog: &Catalog, store: &AnnotationStore) -> Vec<ExportRow> {
    let known = catalog.ids().filter(|id| store.contains_video(id));
    let orphaned = store.videos().filter(|id| catalog.position(id).is_none());

    natural_order(known.chain(orphaned))
        .into_iter()
        .flat_map(|video| {
            store
                .clips(&video)
                .map(|(key, label)| ExportRow {
                    video: video.clone(),
                    key: key.clone(),
                    label,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Write rows as CSV, header first.
pub fn write_csv<W: Write>(writer: W, rows: &[ExportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for row in rows {
        let label = row.label.to_string();
        wtr.write_record([row.video.as_str(), row.key.as_str(), label.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Base name to export under: the requested one as given, or the default
/// when it is blank or would escape the output folder.
pub fn sanitize_name<'a>(requested: &'a str, default: &'a str) -> &'a str {
    let blank = requested.trim().is_empty();
    let escapes = requested.contains(['/', '\\']) || matches!(requested, "." | "..");
    if blank || escapes {
        if default.trim().is_empty() {
            DEFAULT_OUTPUT_NAME
        } else {
            default
        }
    } else {
        requested
    }
}

/// `<input>/output/<name>.csv`
pub fn output_path(input_folder: &Path, name: &str) -> PathBuf {
    input_folder.join(OUTPUT_DIR).join(format!("{name}.csv"))
}

/// Render the table in memory, then write the whole file at once.
///
/// Returns the path written. On failure nothing in the session changes.
pub fn write_csv_file(input_folder: &Path, name: &str, rows: &[ExportRow]) -> Result<PathBuf> {
    let path = output_path(input_folder, name);
    let dir = input_folder.join(OUTPUT_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output folder {}", dir.display()))?;

    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;
    std::fs::write(&path, buffer)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("Labels saved to {} ({} rows)", path.display(), rows.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(entries: &[(&str, u64, u8)]) -> AnnotationStore {
        let mut store = AnnotationStore::new();
        for &(video, ms, label) in entries {
            store.set_label(&VideoId::from(video), &TimeKey::from_millis(ms), Label(label));
        }
        store
    }

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::load(names.iter().map(PathBuf::from).collect())
    }

    fn flat(rows: &[ExportRow]) -> Vec<(&str, &str, u8)> {
        rows.iter()
            .map(|r| (r.video.as_str(), r.key.as_str(), r.label.0))
            .collect()
    }

    #[test]
    fn test_single_label_exports_one_row() {
        let store = labeled(&[("a.mp4", 2_000, 1)]);
        let rows = export(&catalog(&["a.mp4"]), &store);
        assert_eq!(flat(&rows), [("a.mp4", "00:02.", 1)]);
    }

    #[test]
    fn test_rows_follow_natural_then_key_order() {
        let store = labeled(&[
            ("clip10.mp4", 0, 0),
            ("clip2.mp4", 12_000, 2),
            ("clip2.mp4", 3_000, 1),
            ("clip1.mp4", 61_000, 0),
        ]);
        let rows = export(&catalog(&["clip10.mp4", "clip2.mp4", "clip1.mp4", "clip3.mp4"]), &store);
        assert_eq!(
            flat(&rows),
            [
                ("clip1.mp4", "01:01.", 0),
                ("clip2.mp4", "00:03.", 1),
                ("clip2.mp4", "00:12.", 2),
                ("clip10.mp4", "00:00.", 0),
            ]
        );
    }

    #[test]
    fn test_videos_outside_catalog_are_kept() {
        let store = labeled(&[("old3.mp4", 0, 1), ("new.mp4", 0, 2)]);
        let rows = export(&catalog(&["new.mp4"]), &store);
        let videos: Vec<String> = rows.iter().map(|r| r.video.to_string()).collect();
        assert_eq!(videos, ["new.mp4", "old3.mp4"]);
    }

    #[test]
    fn test_export_is_repeatable() {
        let store = labeled(&[("b.mp4", 0, 1), ("a.mp4", 5_000, 0)]);
        let cat = catalog(&["b.mp4", "a.mp4"]);
        assert_eq!(export(&cat, &store), export(&cat, &store));
    }

    #[test]
    fn test_csv_layout() {
        let store = labeled(&[("a,b.mp4", 1_000, 2)]);
        let rows = export(&catalog(&[]), &store);

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "Video,TimeStamp,Label\n\"a,b.mp4\",00:01.,2\n");
    }

    #[test]
    fn test_empty_store_writes_header_only() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "Video,TimeStamp,Label\n");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("run1", "label"), "run1");
        assert_eq!(sanitize_name("  run1 ", "label"), "  run1 ");
        assert_eq!(sanitize_name("", "label"), "label");
        assert_eq!(sanitize_name("   ", "custom"), "custom");
        assert_eq!(sanitize_name("../escape", "label"), "label");
        assert_eq!(sanitize_name("..", "label"), "label");
        assert_eq!(sanitize_name("", ""), DEFAULT_OUTPUT_NAME);
    }

    #[test]
    fn test_write_csv_file_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let rows = export(&catalog(&["a.mp4"]), &labeled(&[("a.mp4", 2_000, 1)]));

        let path = write_csv_file(dir.path(), "label", &rows).unwrap();
        assert_eq!(path, dir.path().join("output").join("label.csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Video,TimeStamp,Label\na.mp4,00:02.,1\n");
    }
}
