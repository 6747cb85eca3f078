//! Band Inspection Tool - print calibrated power bands over a range of distances
//!
//! Sweeps the horizontal distance to the hoop for a fixed rim height and prints
//! the Perfect, Make and Backboard bands with the strategy that produced them.
//!
//! Usage:
//!   cargo run --bin bands
//!   cargo run --bin bands -- --rim 3.05 --from 2 --to 9 --step 0.5
//!   cargo run --bin bands -- --tuning config/shot_tuning.json --sampling

use bevy::prelude::*;

use hoopshot::calibration::{CalibrationResult, PowerCalibrator, Range01};
use hoopshot::geometry::ShotGeometry;
use hoopshot::tuning::{ShotTuning, load_shot_tuning_from_file};

fn main() {
    let config = BandsConfig::from_args();

    if config.show_help {
        print_help();
        return;
    }

    let mut tuning = match &config.tuning_file {
        Some(path) => match load_shot_tuning_from_file(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        },
        None => ShotTuning::default(),
    };
    if config.sampling {
        tuning.calibrator.use_sampling = true;
        tuning.calibrator.use_runtime = false;
    }
    if config.analytic_only {
        tuning.calibrator.use_runtime = false;
        tuning.calibrator.use_sampling = false;
        tuning.calibrator.use_analytic = true;
    }

    let calibrator = PowerCalibrator::new(tuning.calibrator.clone());
    let target = Vec3::new(0.0, config.rim_height, 0.0);

    println!(
        "Rim height {:.2}, release height {:.2}, max impulse {:.1}",
        config.rim_height, config.release_height, tuning.profile.max_impulse
    );
    println!(
        "{:>7}  {:>13}  {:>13}  {:>13}  {}",
        "dist", "perfect", "make", "backboard", "strategy"
    );

    let step = config.step.max(0.05);
    let mut distance = config.from;
    while distance <= config.to + 1e-4 {
        let origin = Vec3::new(0.0, config.release_height, -distance);
        let geometry = ShotGeometry::new(origin, target)
            .with_entry_offset(tuning.tolerances.entry_y_offset);
        let result = calibrator.calibrate(&geometry, &tuning.profile, &tuning.tolerances);
        print_row(distance, &result);
        distance += step;
    }
}

fn format_band(range: &Range01) -> String {
    if range.valid {
        format!("{:.3}-{:.3}", range.min, range.max)
    } else {
        "-".to_string()
    }
}

fn print_row(distance: f32, result: &CalibrationResult) {
    println!(
        "{:>7.2}  {:>13}  {:>13}  {:>13}  {:?}",
        distance,
        format_band(&result.perfect),
        format_band(&result.make),
        format_band(&result.backboard),
        result.strategy
    );
}

struct BandsConfig {
    rim_height: f32,
    release_height: f32,
    from: f32,
    to: f32,
    step: f32,
    tuning_file: Option<String>,
    sampling: bool,
    analytic_only: bool,
    show_help: bool,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            rim_height: 3.05,
            release_height: 2.0,
            from: 2.0,
            to: 8.0,
            step: 1.0,
            tuning_file: None,
            sampling: false,
            analytic_only: false,
            show_help: false,
        }
    }
}

impl BandsConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self::default();

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            let number = value.and_then(|v| v.parse::<f32>().ok());
            match (args[i].as_str(), number) {
                ("--rim", Some(v)) => {
                    config.rim_height = v;
                    i += 1;
                }
                ("--release", Some(v)) => {
                    config.release_height = v;
                    i += 1;
                }
                ("--from", Some(v)) => {
                    config.from = v;
                    i += 1;
                }
                ("--to", Some(v)) => {
                    config.to = v;
                    i += 1;
                }
                ("--step", Some(v)) => {
                    config.step = v;
                    i += 1;
                }
                ("--tuning", _) => {
                    if let Some(path) = value {
                        config.tuning_file = Some(path.clone());
                        i += 1;
                    }
                }
                ("--sampling", _) => config.sampling = true,
                ("--analytic", _) => config.analytic_only = true,
                ("--help" | "-h", _) => config.show_help = true,
                _ => {}
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Band Inspection Tool - print power bands over a distance sweep

USAGE:
    cargo run --bin bands -- [OPTIONS]

OPTIONS:
    --rim <Y>           Rim centre height (default: 3.05)
    --release <Y>       Release height (default: 2.0)
    --from <D>          First horizontal distance (default: 2.0)
    --to <D>            Last horizontal distance (default: 8.0)
    --step <D>          Distance step (default: 1.0)
    --tuning <FILE>     Load shot tuning JSON instead of defaults
    --sampling          Use volume sampling instead of the runtime solver
    --analytic          Use only the drag-free solver
    --help, -h          Show this help
"#
    );
}
