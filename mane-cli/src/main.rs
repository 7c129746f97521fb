//! Command-line front end for face-shape classification and hairstyle
//! recommendation.

mod args;
mod detector;
mod model;

use std::{fs::File, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use serde::Serialize;

use mane_core::{
    DetectionParams, FaceLocalizer, FaceShapeClassifier, MemoryCatalog, RecommendationPipeline,
    ShapePipeline,
};
use mane_utils::{
    config::{AppSettings, default_settings_path},
    configure_telemetry, init_logging, load_catalog, normalize_path,
};

use crate::args::CliArgs;
use crate::detector::SeetaFaceDetector;
use crate::model::OnnxShapeModel;

#[derive(Debug, Serialize)]
struct FaceShapeRecord {
    face_shape: String,
    probability: f32,
}

#[derive(Debug, Serialize)]
struct RecommendationRecord {
    hairstyle: String,
    image: String,
    probability: f32,
}

fn main() -> Result<()> {
    init_logging(log::LevelFilter::Info)?;
    let args = CliArgs::parse();

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);
    configure_telemetry(settings.telemetry.enabled, settings.telemetry.level_filter());

    let input_path = normalize_path(&args.input)?;
    let image = image::open(&input_path)
        .with_context(|| format!("failed to open image {}", input_path.display()))?
        .to_rgb8();

    let detector_path = resolve_path(
        args.detector_model.as_ref(),
        settings.detector_model_path.as_deref(),
        "detection model",
    )?;
    let classifier_path = resolve_path(
        args.classifier_model.as_ref(),
        settings.classifier_model_path.as_deref(),
        "classifier model",
    )?;

    info!("Loading detection model from {}", detector_path.display());
    let detector = SeetaFaceDetector::from_model_path(&detector_path)?;
    let localizer = Arc::new(FaceLocalizer::with_params(
        Box::new(detector),
        detection_params(&settings),
    ));

    info!("Loading classifier model from {}", classifier_path.display());
    let shape_model = OnnxShapeModel::load(&classifier_path)?;
    let classifier = Arc::new(FaceShapeClassifier::new(Box::new(shape_model)));

    if args.recommend {
        let catalog_path = resolve_path(
            args.catalog.as_ref(),
            settings.catalog_path.as_deref(),
            "hairstyle catalog",
        )?;
        let data = load_catalog(&catalog_path)?;
        let catalog = Arc::new(MemoryCatalog::new(data.featured, data.images));

        let pipeline = RecommendationPipeline::new(localizer, classifier, catalog);
        let recommendations = pipeline.recommend_hairstyles(&image)?;
        info!("{} hairstyle(s) recommended", recommendations.len());

        let records: Vec<RecommendationRecord> = recommendations
            .into_iter()
            .map(|r| RecommendationRecord {
                hairstyle: r.hairstyle,
                image: r.image,
                probability: r.probability,
            })
            .collect();
        emit(args.json.as_ref(), &records)
    } else {
        let pipeline = ShapePipeline::new(localizer, classifier);
        let top = pipeline.classify_face_shape(&image)?;
        info!("classified as {} ({:.3})", top.label, top.probability);

        emit(
            args.json.as_ref(),
            &FaceShapeRecord {
                face_shape: top.label,
                probability: top.probability,
            },
        )
    }
}

/// Load settings from an explicit path, the default settings file when it
/// exists, or built-in defaults.
fn load_settings(explicit: Option<&PathBuf>) -> Result<AppSettings> {
    if let Some(path) = explicit {
        return AppSettings::load_from_path(path);
    }
    let default_path = default_settings_path();
    if default_path.exists() {
        debug!("using settings from {}", default_path.display());
        return AppSettings::load_from_path(&default_path);
    }
    Ok(AppSettings::default())
}

fn apply_cli_overrides(settings: &mut AppSettings, args: &CliArgs) {
    if let Some(scale_factor) = args.scale_factor {
        settings.detection.scale_factor = scale_factor;
    }
    if let Some(min_face_size) = args.min_face_size {
        settings.detection.min_face_width = min_face_size;
        settings.detection.min_face_height = min_face_size;
    }
    if args.telemetry {
        settings.telemetry.enabled = true;
    }
    if let Some(level) = &args.telemetry_level {
        settings.telemetry.level = level.clone();
    }
}

fn detection_params(settings: &AppSettings) -> DetectionParams {
    DetectionParams {
        scale_factor: settings.detection.scale_factor,
        min_size: (
            settings.detection.min_face_width,
            settings.detection.min_face_height,
        ),
    }
}

/// Write `payload` as pretty JSON to `path`, or to stdout when absent.
fn emit<T: Serialize>(path: Option<&PathBuf>, payload: &T) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            serde_json::to_writer_pretty(file, payload)
                .with_context(|| format!("failed to write JSON to {}", path.display()))?;
            info!("results written to {}", path.display());
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(payload).context("failed to serialize results")?;
            println!("{rendered}");
        }
    }
    Ok(())
}

/// Prefer the CLI-provided path, then the configured one.
fn resolve_path(
    cli: Option<&PathBuf>,
    configured: Option<&str>,
    what: &str,
) -> Result<PathBuf> {
    if let Some(path) = cli {
        return Ok(path.clone());
    }
    if let Some(path) = configured {
        return Ok(PathBuf::from(path));
    }
    anyhow::bail!("no {what} path given on the command line or in the settings file")
}
