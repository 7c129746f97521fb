//! Command-line argument definitions for the mane CLI.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Classify a face shape from a photograph, or recommend hairstyles for it.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Path to the photograph to analyze.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Emit the ranked hairstyle recommendations instead of the top face shape.
    #[arg(long, action = ArgAction::SetTrue)]
    pub recommend: bool,

    /// Path to the SeetaFace detection model (defaults to the settings file value).
    #[arg(long)]
    pub detector_model: Option<PathBuf>,

    /// Path to the face-shape classifier ONNX model (defaults to the settings file value).
    #[arg(long)]
    pub classifier_model: Option<PathBuf>,

    /// Path to the SQLite hairstyle catalog (used with --recommend).
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Optional settings JSON. Defaults to `config/mane_settings.json` when present, otherwise built-in parameters.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the detector scale factor.
    #[arg(long)]
    pub scale_factor: Option<f32>,

    /// Override the minimum face size floor (pixels, applied to both sides).
    #[arg(long)]
    pub min_face_size: Option<u32>,

    /// Write results to a JSON file instead of stdout.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Enable telemetry timing logs (defaults to the settings file).
    #[arg(long, action = ArgAction::SetTrue)]
    pub telemetry: bool,

    /// Override the telemetry logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    pub telemetry_level: Option<String>,
}
