//! Parafit CLI
//!
//! Fits a parabola to each point file and prints the fit and its resampled curve.
//!
//! # Usage
//!
//! ```bash
//! # Summary followed by a 60-segment polyline as CSV
//! parafit points.txt
//!
//! # Fit reports of several curves as JSON
//! parafit --json left.txt right.txt
//!
//! # Adaptive polyline within 0.01 units of the curve
//! parafit --adaptive 0.01 points.txt
//! ```

use std::path::{Path, PathBuf};
use std::process;

use log::info;
use parafit_core::{FitConfig, FitError, Result};
use parafit_fit::tessellate::{curve_to_polyline, polyline_length};
use parafit_fit::FitResult;
use parafit_io::{parse_points_lenient, polyline_to_csv, read_points_file, FitReport};
use parafit_math::Point3;
use parafit_scene::{CurveRecord, CurveStore};

const DEFAULT_STEPS: usize = 60;

fn print_usage() {
    eprintln!(
        r#"Parafit - best-fit spatial parabola

USAGE:
    parafit [OPTIONS] <points-file>...

ARGS:
    <points-file>   Text file with one "x, y, z" point per line; each file is one curve

OPTIONS:
    --steps <N>         Number of polyline segments (default 60)
    --adaptive <TOL>    Adaptive polyline with maximum chord deviation TOL
    --json              Print the fit report as JSON instead of text
    --lenient           Skip malformed lines instead of failing
    --help              Show this help message

Set RUST_LOG=debug for fit diagnostics.
"#
    );
}

#[derive(Debug, PartialEq)]
struct Options {
    inputs: Vec<PathBuf>,
    steps: usize,
    adaptive: Option<f64>,
    json: bool,
    lenient: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Fit(Options),
}

fn parse_args(args: &[String]) -> std::result::Result<Command, String> {
    let mut inputs = Vec::new();
    let mut steps = DEFAULT_STEPS;
    let mut adaptive = None;
    let mut json = false;
    let mut lenient = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--json" => json = true,
            "--lenient" => lenient = true,
            "--steps" => {
                let value = iter.next().ok_or("--steps requires a value")?;
                steps = value
                    .parse()
                    .map_err(|_| format!("invalid step count '{}'", value))?;
                if steps == 0 {
                    return Err("--steps must be at least 1".into());
                }
            }
            "--adaptive" => {
                let value = iter.next().ok_or("--adaptive requires a value")?;
                let tol: f64 = value
                    .parse()
                    .map_err(|_| format!("invalid tolerance '{}'", value))?;
                if !(tol.is_finite() && tol > 0.0) {
                    return Err("--adaptive tolerance must be positive".into());
                }
                adaptive = Some(tol);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown option '{}'", other));
            }
            other => inputs.push(PathBuf::from(other)),
        }
    }

    if inputs.is_empty() {
        return Err("missing required argument <points-file>".into());
    }
    Ok(Command::Fit(Options {
        inputs,
        steps,
        adaptive,
        json,
        lenient,
    }))
}

fn load_points(path: &Path, lenient: bool) -> Result<Vec<Point3>> {
    if !lenient {
        return read_points_file(path);
    }
    let text = std::fs::read_to_string(path)?;
    let parsed = parse_points_lenient(&text);
    if !parsed.skipped_lines.is_empty() {
        eprintln!(
            "{}: skipped {} malformed line(s)",
            path.display(),
            parsed.skipped_lines.len()
        );
    }
    Ok(parsed.points)
}

fn curve_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Fit every input file; returns the number of curves that could not be fitted.
fn run(options: &Options) -> Result<usize> {
    let config = FitConfig::default();
    let mut store = CurveStore::with_config(config);

    let mut failed = 0;
    for path in &options.inputs {
        let points = load_points(path, options.lenient)?;
        info!("read {} points from {}", points.len(), path.display());
        let (_, fit_error) = store.add_curve(&curve_name(path), points)?;
        if let Some(err) = fit_error {
            eprintln!("{}: {}", path.display(), err);
            failed += 1;
        }
    }

    let fitted: Vec<(&CurveRecord, FitResult)> = store
        .iter()
        .filter_map(|(_, record)| record.fit.map(|fit| (record, fit)))
        .collect();

    if options.json {
        let reports: Vec<_> = fitted
            .iter()
            .map(|(record, fit)| FitReport::new(fit, &record.points, &config))
            .collect();
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| FitError::Serialization(e.to_string()))?;
        println!("{}", json);
        return Ok(failed);
    }

    for (record, fit) in &fitted {
        let report = FitReport::new(fit, &record.points, &config);
        let polyline = match options.adaptive {
            Some(tol) => curve_to_polyline(&fit.to_curve(&config), tol),
            None => fit.sample_with(options.steps, &config),
        };

        println!("== {}", record.name);
        println!("points:       {}", report.point_count);
        println!("centroid:     {:?}", report.centroid.to_array());
        println!("basis u:      {:?}", report.basis_u.to_array());
        println!("basis w:      {:?}", report.basis_w.to_array());
        println!(
            "w = a*u^2 + b*u + c:  a={} b={} c={}",
            report.coefficients.a, report.coefficients.b, report.coefficients.c
        );
        println!("u range:      {:?}", report.u_range);
        println!("rms residual: {}", report.rms_residual);
        println!(
            "polyline:     {} points, length {}",
            polyline.len(),
            polyline_length(&polyline)
        );
        println!();
        print!("{}", polyline_to_csv(&polyline));
        println!();
    }
    Ok(failed)
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            print_usage();
            return;
        }
        Ok(Command::Fit(options)) => options,
        Err(message) => {
            eprintln!("Error: {}\n", message);
            print_usage();
            process::exit(1);
        }
    };

    match run(&options) {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("Error: {} curve(s) could not be fitted", failed);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}
