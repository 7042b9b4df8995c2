//! Point-cloud input parsing and fit result export.

pub mod export;
pub mod points;

pub use export::{fit_to_json, polyline_to_csv, FitReport};
pub use points::{parse_points, parse_points_lenient, read_points_file, LenientParse};
