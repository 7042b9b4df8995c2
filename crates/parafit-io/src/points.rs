//! Text format for point clouds.
//!
//! One point per line, `x y z` separated by commas and/or whitespace:
//!
//! ```text
//! # trajectory samples
//! 0, 0, 0
//! 1 2 1.5
//! 2,4 ,4.2
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Every field on a
//! line must be a finite number; fields past the third are ignored.

use std::fs;
use std::path::Path;

use log::warn;
use parafit_core::{FitError, Result};
use parafit_math::Point3;

/// Points recovered by [`parse_points_lenient`] and the 1-based numbers of the lines it dropped.
#[derive(Debug, Clone, Default)]
pub struct LenientParse {
    pub points: Vec<Point3>,
    pub skipped_lines: Vec<usize>,
}

/// Parse a point cloud, failing on the first malformed line.
pub fn parse_points(input: &str) -> Result<Vec<Point3>> {
    let mut points = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        if let Some(point) = parse_line(line).map_err(|message| FitError::Parse {
            line: idx + 1,
            message,
        })? {
            points.push(point);
        }
    }
    Ok(points)
}

/// Parse a point cloud, skipping malformed lines.
pub fn parse_points_lenient(input: &str) -> LenientParse {
    let mut out = LenientParse::default();
    for (idx, line) in input.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(point)) => out.points.push(point),
            Ok(None) => {}
            Err(message) => {
                warn!("skipping line {}: {}", idx + 1, message);
                out.skipped_lines.push(idx + 1);
            }
        }
    }
    out
}

/// Read and strictly parse a point file.
pub fn read_points_file(path: &Path) -> Result<Vec<Point3>> {
    let text = fs::read_to_string(path)?;
    parse_points(&text)
}

/// `Ok(None)` for lines that carry no point.
fn parse_line(line: &str) -> std::result::Result<Option<Point3>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() < 3 {
        return Err(format!("expected 3 coordinates, found {}", fields.len()));
    }

    let mut values = Vec::with_capacity(fields.len());
    for field in &fields {
        let v: f64 = field
            .parse()
            .map_err(|_| format!("'{}' is not a number", field))?;
        if !v.is_finite() {
            return Err(format!("'{}' is not a finite number", field));
        }
        values.push(v);
    }

    Ok(Some(Point3::new(values[0], values[1], values[2])))
}
