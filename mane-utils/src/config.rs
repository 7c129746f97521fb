//! Shared configuration consumed across the mane workspace.
//!
//! One serializable settings aggregate covers detection tuning, resource
//! paths, and telemetry preferences, so front ends load a single JSON file
//! and override individual fields from their own argument surfaces.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Detection tuning handed to the face localizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Coarse-to-fine search multiplier between detector scales.
    pub scale_factor: f32,
    /// Minimum face width in pixels; smaller detections are spurious.
    pub min_face_width: u32,
    /// Minimum face height in pixels.
    pub min_face_height: u32,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            scale_factor: 1.3,
            min_face_width: 100,
            min_face_height: 100,
        }
    }
}

/// Telemetry preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether timing logs are emitted.
    pub enabled: bool,
    /// Most verbose admitted level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }
}

/// Persistent application settings consumed by front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Path to the face detection model. `None` falls back to the default.
    pub detector_model_path: Option<String>,
    /// Path to the face-shape classifier ONNX model.
    pub classifier_model_path: Option<String>,
    /// Path to the SQLite hairstyle catalog.
    pub catalog_path: Option<String>,
    /// Detection tuning.
    pub detection: DetectionSettings,
    /// Telemetry preferences.
    pub telemetry: TelemetrySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            detector_model_path: Some("models/seeta_fd_frontal_v1.0.bin".into()),
            classifier_model_path: Some("models/face_shape_classifier.onnx".into()),
            catalog_path: Some("data/catalog.sqlite".into()),
            detection: DetectionSettings::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file.
    ///
    /// Missing fields fall back to their defaults, including the resource
    /// paths, so a partial settings file stays usable.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;

        let defaults = AppSettings::default();
        if settings.detector_model_path.is_none() {
            settings.detector_model_path = defaults.detector_model_path;
        }
        if settings.classifier_model_path.is_none() {
            settings.classifier_model_path = defaults.classifier_model_path;
        }

        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON, overwriting any
    /// existing file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}

/// Returns the default path for persisted settings (`config/mane_settings.json`).
pub fn default_settings_path() -> PathBuf {
    env::current_dir()
        .map(|dir| dir.join("config/mane_settings.json"))
        .unwrap_or_else(|_| PathBuf::from("config/mane_settings.json"))
}
