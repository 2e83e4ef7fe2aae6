use clap::{Parser, ValueEnum};
use image::ImageReader;
use std::path::PathBuf;

use deepcycle::detection::{Device, SourceConfig};
use deepcycle::{ClassCatalog, DebugRenderer, Detector, FileSink, JsonSource, RenderStyle};

#[derive(Parser)]
#[command(name = "deepcycle")]
#[command(about = "Pick and inspect recyclable-item detections for a frame")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Detections exported by the model for this image (JSON array)
    #[arg(short, long, value_name = "FILE")]
    detections: PathBuf,

    /// Class catalog (TOML) replacing the built-in recycling classes
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Floor the model applied before exporting
    #[arg(long, default_value_t = deepcycle::detection::DEFAULT_CONFIDENCE_FLOOR)]
    confidence_floor: f32,

    /// Threshold used when listing all detections
    #[arg(long, default_value_t = deepcycle::detection::DEFAULT_MIN_CONFIDENCE)]
    min_confidence: f32,

    /// Inference device the detections were produced on
    #[arg(long, value_enum, default_value = "auto")]
    device: DeviceArg,

    /// List every qualifying detection instead of only the best one
    #[arg(long)]
    all: bool,

    /// Write an annotated debug image to this path
    #[arg(long, value_name = "PATH")]
    debug_out: Option<PathBuf>,

    /// Show the annotated image in a window
    #[cfg(feature = "viewer")]
    #[arg(long)]
    show: bool,

    /// Font used for box labels (a system font is used otherwise)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DeviceArg {
    Auto,
    Cpu,
    Cuda,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Auto => Device::Auto,
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Cuda => Device::Cuda,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::debug!("loading image: {:?}", args.image_path);
    let frame = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?
        .to_rgb8();
    log::debug!("image loaded: {}x{}", frame.width(), frame.height());

    let catalog = match &args.catalog {
        Some(path) => ClassCatalog::from_path(path)?,
        None => ClassCatalog::recycling(),
    };

    let config = SourceConfig {
        confidence_floor: args.confidence_floor,
        verbose: args.verbose,
        device: args.device.into(),
        ..SourceConfig::default()
    };
    let source = JsonSource::from_path(&args.detections, config)?;

    let mut detector = Detector::new(source, catalog)
        .with_min_confidence(args.min_confidence)
        .with_verbose(args.verbose);

    let shown = if args.all {
        let detections = detector.detect_all(&frame)?;
        println!("\n=== Detections ===");
        println!("Total detections: {}", detections.len());
        for det in &detections {
            println!(
                "  {} at {:?} - confidence: {:.4}",
                detector.catalog().label_for(det.class_id),
                <[i32; 4]>::from(det.bbox),
                det.confidence
            );
        }
        detections
    } else {
        let selection = detector.detect(&frame)?;
        println!("\n=== Best Detection ===");
        match selection.detection() {
            Some(det) => println!(
                "  {} at {:?} - confidence: {:.4}",
                detector.catalog().label_for(det.class_id),
                <[i32; 4]>::from(det.bbox),
                det.confidence
            ),
            None => println!("No detection."),
        }
        selection.into_detection().into_iter().collect()
    };

    let (boxes, labels) = detector.annotate(&shown);

    if let Some(path) = &args.debug_out {
        let renderer = label_renderer(RenderStyle::file(), args.font.as_ref())?;
        renderer.render_to(&frame, &boxes, &labels, &FileSink::new(path))?;
    }

    #[cfg(feature = "viewer")]
    if args.show {
        let renderer = label_renderer(RenderStyle::viewer(), args.font.as_ref())?;
        let sink = deepcycle::ViewerSink::new("Debug");
        renderer.render_to(&frame, &boxes, &labels, &sink)?;
    }

    Ok(())
}

fn label_renderer(style: RenderStyle, font: Option<&PathBuf>) -> anyhow::Result<DebugRenderer> {
    let renderer = DebugRenderer::new(style);
    Ok(match font {
        Some(path) => renderer.with_font_path(path)?,
        None => renderer.with_system_font(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn device_flag_maps_to_source_device() {
        let args = Cli::try_parse_from(["deepcycle", "frame.png", "-d", "det.json"]).unwrap();
        assert_eq!(Device::from(args.device), Device::Auto);

        let args =
            Cli::try_parse_from(["deepcycle", "frame.png", "-d", "det.json", "--device", "cuda"])
                .unwrap();
        assert_eq!(Device::from(args.device), Device::Cuda);

        assert!(
            Cli::try_parse_from(["deepcycle", "frame.png", "-d", "det.json", "--device", "tpu"])
                .is_err()
        );
    }
}
