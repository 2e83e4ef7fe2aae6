use image::RgbImage;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::RawDetection;

/// Long-side input size the sorter model expects.
pub const DEFAULT_IMAGE_SIZE: u32 = 640;

/// Floor applied by the model itself before detections leave the source.
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.25;

/// Inference device requested for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CUDA when available, CPU otherwise.
    #[default]
    Auto,
    Cpu,
    Cuda,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Auto => write!(f, "auto"),
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda => write!(f, "cuda"),
        }
    }
}

/// Settings a source is constructed with. Fixed for the life of the source.
///
/// `image_size` and `device` are handed through to a model backend untouched;
/// the replay sources here carry them but do not use them.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Long-side resize applied by the model before inference.
    pub image_size: u32,
    pub confidence_floor: f32,
    pub verbose: bool,
    pub device: Device,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            image_size: DEFAULT_IMAGE_SIZE,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            verbose: false,
            device: Device::Auto,
        }
    }
}

/// The detection model: given a frame, return raw per-box detections.
///
/// Implementations never emit detections below `config().confidence_floor`.
/// Failures are returned as-is to the caller; nothing here retries.
pub trait RawDetectionSource {
    /// Source identifier, used in errors and logs.
    fn name(&self) -> &'static str;

    fn config(&self) -> &SourceConfig;

    fn infer(&mut self, frame: &RgbImage) -> Result<Vec<RawDetection>>;
}

impl<S: RawDetectionSource + ?Sized> RawDetectionSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn config(&self) -> &SourceConfig {
        (**self).config()
    }

    fn infer(&mut self, frame: &RgbImage) -> Result<Vec<RawDetection>> {
        (**self).infer(frame)
    }
}

fn apply_floor(detections: &[RawDetection], floor: f32) -> Vec<RawDetection> {
    detections
        .iter()
        .filter(|d| d.confidence >= floor)
        .cloned()
        .collect()
}

/// Replays a fixed list of detections for every frame.
#[derive(Debug, Clone)]
pub struct StaticSource {
    detections: Vec<RawDetection>,
    config: SourceConfig,
}

impl StaticSource {
    pub fn new(detections: Vec<RawDetection>) -> Self {
        Self::with_config(detections, SourceConfig::default())
    }

    pub fn with_config(detections: Vec<RawDetection>, config: SourceConfig) -> Self {
        Self { detections, config }
    }

    /// A source whose floor is disabled, so every detection comes through.
    pub fn unfiltered(detections: Vec<RawDetection>) -> Self {
        Self::with_config(
            detections,
            SourceConfig {
                confidence_floor: 0.0,
                ..SourceConfig::default()
            },
        )
    }
}

impl RawDetectionSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn infer(&mut self, _frame: &RgbImage) -> Result<Vec<RawDetection>> {
        Ok(apply_floor(&self.detections, self.config.confidence_floor))
    }
}

/// Replays detections exported by the model as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonSource {
    inner: StaticSource,
}

impl JsonSource {
    pub fn from_reader(reader: impl Read, config: SourceConfig) -> Result<Self> {
        let detections: Vec<RawDetection> =
            serde_json::from_reader(reader).map_err(|e| Error::Source {
                source_name: "json",
                message: format!("malformed detection export: {}", e),
            })?;

        if config.verbose {
            log::info!("loaded {} exported detections", detections.len());
        }

        Ok(Self {
            inner: StaticSource::with_config(detections, config),
        })
    }

    pub fn from_path(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::Source {
            source_name: "json",
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_reader(std::io::BufReader::new(file), config)
    }
}

impl RawDetectionSource for JsonSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn config(&self) -> &SourceConfig {
        self.inner.config()
    }

    fn infer(&mut self, frame: &RgbImage) -> Result<Vec<RawDetection>> {
        self.inner.infer(frame)
    }
}
