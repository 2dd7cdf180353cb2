// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image label files.
//!
//! Each image `foo.png` has a sibling `foo.txt` holding one box per line:
//!
//! ```text
//! <label> <center_x> <center_y> <width> <height>
//! ```
//!
//! Coordinates are normalized by the image width (x, width) and height
//! (y, height). The file is always rewritten in full.

use crate::models::annotation::{Annotation, Rect};
use crate::util::geometry::{denormalize_rect, normalize_rect, NormalizedBox};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

const NUMERIC_FIELDS: [&str; 4] = ["center_x", "center_y", "width", "height"];

/// Why a line of a label file was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    #[error("expected at least 5 fields, found {found}")]
    TooFewFields { found: usize },

    #[error("field `{field}` is not a finite number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A line that was skipped while decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based line number in the file.
    pub line_number: usize,
    pub error: LineError,
}

/// A box read back from a label file, in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBox {
    pub label: String,
    pub rect: Rect,
}

/// Result of decoding a whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub boxes: Vec<DecodedBox>,
    pub skipped: Vec<SkippedLine>,
}

/// Label file path for an image: same path, extension replaced by `.txt`.
pub fn label_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Serialize annotations in order, one line each.
///
/// The label is written verbatim, so an unlabeled box produces a line that
/// starts with a space.
pub fn encode(annotations: &[Annotation], width: u32, height: u32) -> String {
    let mut out = String::new();
    for ann in annotations {
        let n = normalize_rect(&ann.rect(), width, height);
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            ann.label, n.center_x, n.center_y, n.width, n.height
        );
    }
    out
}

/// Parse a whole file. Malformed lines are skipped and reported, never fatal.
pub fn decode(text: &str, width: u32, height: u32) -> Decoded {
    let mut decoded = Decoded::default();
    for (idx, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some((label, norm))) => decoded.boxes.push(DecodedBox {
                label,
                rect: denormalize_rect(&norm, width, height),
            }),
            Ok(None) => {}
            Err(error) => {
                log::warn!("Skipping label line {}: {} ({:?})", idx + 1, error, line);
                decoded.skipped.push(SkippedLine {
                    line_number: idx + 1,
                    error,
                });
            }
        }
    }
    decoded
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// A line that begins with whitespace and carries exactly four fields is
/// what [`encode`] writes for an empty label, and is read back as one.
pub fn parse_line(line: &str) -> Result<Option<(String, NormalizedBox)>, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }

    let unlabeled = fields.len() == 4 && line.starts_with(char::is_whitespace);
    let (label, numbers) = if unlabeled {
        ("", &fields[..])
    } else if fields.len() >= 5 {
        (fields[0], &fields[1..5])
    } else {
        return Err(LineError::TooFewFields {
            found: fields.len(),
        });
    };

    let mut values = [0.0f64; 4];
    for ((slot, raw), name) in values.iter_mut().zip(numbers).zip(NUMERIC_FIELDS) {
        *slot = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| LineError::InvalidNumber {
                field: name,
                value: raw.to_string(),
            })?;
    }

    let [center_x, center_y, width, height] = values;
    Ok(Some((
        label.to_string(),
        NormalizedBox {
            center_x,
            center_y,
            width,
            height,
        },
    )))
}

/// Read a label file. A missing file is `Ok(None)`.
///
/// Invalid UTF-8 is replaced rather than rejected so the affected lines are
/// skipped by [`decode`] instead of failing the whole file.
pub fn read_label_file(path: &Path) -> Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Overwrite a label file with `text`.
pub fn write_label_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_expected_line() {
        let rect = Rect::from_corners(
            crate::models::annotation::Point::new(100.0, 100.0),
            crate::models::annotation::Point::new(300.0, 300.0),
        );
        let ann = Annotation::new(rect, "cat", 0);
        let text = encode(&[ann], 800, 600);
        assert_eq!(text, "cat 0.25 0.3333333333333333 0.25 0.3333333333333333\n");
    }

    #[test]
    fn test_encode_preserves_order() {
        let anns = vec![
            Annotation::new(Rect::new(0.0, 0.0, 10.0, 10.0), "a", 0),
            Annotation::new(Rect::new(0.0, 0.0, 10.0, 10.0), "b", 1),
            Annotation::new(Rect::new(0.0, 0.0, 10.0, 10.0), "c", 2),
        ];
        let labels: Vec<String> = encode(&anns, 100, 100)
            .lines()
            .map(|l| l.split(' ').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn test_encode_empty_is_empty_text() {
        assert_eq!(encode(&[], 640, 480), "");
    }

    #[test]
    fn test_round_trip_restores_rects() {
        let anns = vec![
            Annotation::new(Rect::new(12.5, 30.0, 101.0, 57.25), "dog", 0),
            Annotation::new(Rect::new(600.0, 410.0, 33.0, 21.0), "car", 1),
            Annotation::new(Rect::new(0.0, 0.0, 640.0, 480.0), "", 2),
        ];
        let decoded = decode(&encode(&anns, 640, 480), 640, 480);
        assert!(decoded.skipped.is_empty());
        assert_eq!(decoded.boxes.len(), anns.len());
        for (ann, b) in anns.iter().zip(&decoded.boxes) {
            let (r, d) = (ann.rect(), b.rect);
            assert_eq!(ann.label, b.label);
            assert!((r.left - d.left).abs() < 1e-6);
            assert!((r.top - d.top).abs() < 1e-6);
            assert!((r.width - d.width).abs() < 1e-6);
            assert!((r.height - d.height).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decode_skips_malformed_line() {
        let text = "cat 0.5 0.5 0.2 0.2\n\
                    dog abc 0.2 0.2 0.2\n\
                    bird 0.1 0.1 0.05 0.05\n\
                    \n\
                    fish 0.9 0.9 0.1 0.1\n";
        let decoded = decode(text, 100, 100);
        let labels: Vec<&str> = decoded.boxes.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["cat", "bird", "fish"]);
        assert_eq!(
            decoded.skipped,
            vec![SkippedLine {
                line_number: 2,
                error: LineError::InvalidNumber {
                    field: "center_x",
                    value: "abc".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_decode_denormalizes_to_top_left() {
        let decoded = decode("cat 0.25 0.5 0.25 0.5\n", 800, 600);
        assert_eq!(decoded.boxes[0].rect, Rect::new(100.0, 150.0, 200.0, 300.0));
    }

    #[test]
    fn test_short_lines_rejected() {
        assert_eq!(
            parse_line("cat 0.5 0.5 0.2"),
            Err(LineError::TooFewFields { found: 4 })
        );
        assert_eq!(
            parse_line("0.5 0.5 0.2 0.2"),
            Err(LineError::TooFewFields { found: 4 })
        );
    }

    #[test]
    fn test_leading_space_line_is_unlabeled() {
        let (label, norm) = parse_line(" 0.5 0.5 0.2 0.2").unwrap().unwrap();
        assert_eq!(label, "");
        assert_eq!(norm.width, 0.2);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let (label, norm) = parse_line("cat 0.5 0.5 0.2 0.2 0.97").unwrap().unwrap();
        assert_eq!(label, "cat");
        assert_eq!(norm.height, 0.2);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            parse_line("cat 0.5 NaN 0.2 0.2"),
            Err(LineError::InvalidNumber { field: "center_y", .. })
        ));
    }

    #[test]
    fn test_label_path_replaces_extension() {
        assert_eq!(
            label_path_for(Path::new("/data/set/img_001.jpeg")),
            PathBuf::from("/data/set/img_001.txt")
        );
        assert_eq!(
            label_path_for(Path::new("shots/frame")),
            PathBuf::from("shots/frame.txt")
        );
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_label_file(&dir.path().join("nope.txt")).unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_only_drops_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.txt");
        std::fs::write(&path, b"cat 0.5 0.5 0.2 0.2\ndog 0.\xff 0.5 0.2 0.2\n").unwrap();

        let text = read_label_file(&path).unwrap().unwrap();
        let decoded = decode(&text, 100, 100);
        assert_eq!(decoded.boxes.len(), 1);
        assert_eq!(decoded.boxes[0].label, "cat");
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].line_number, 2);
    }
}
