use clap::Parser;
use image::ImageReader;
use log::{debug, info};
use std::path::{Path, PathBuf};

use irtrack::annotate::load_font;
use irtrack::config::TrackerConfig;
use irtrack::{DetectionMode, FramePipeline, TargetDetector};

#[derive(Parser)]
#[command(name = "irtrack")]
#[command(about = "Track bright infrared targets and log their mapped coordinates")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Process a single image file instead of the camera
    #[arg(long, value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Write the annotated image here (with --image)
    #[arg(long, value_name = "FILE", requires = "image")]
    annotated_out: Option<PathBuf>,

    /// Camera index (default: 1 if available, else the lowest available)
    #[arg(long)]
    camera: Option<i32>,

    /// Number of camera indices to scan
    #[arg(long)]
    scan_count: Option<i32>,

    /// Detector variant
    #[arg(long, value_enum)]
    mode: Option<DetectionMode>,

    /// Brightness threshold (0-255)
    #[arg(long)]
    threshold: Option<u8>,

    /// Minimum blob area in pixels
    #[arg(long)]
    min_area: Option<f64>,

    /// Maximum number of targets in multi mode
    #[arg(long)]
    max_targets: Option<usize>,

    /// Width of the output coordinate space
    #[arg(long)]
    output_width: Option<f64>,

    /// Height of the output coordinate space
    #[arg(long)]
    output_height: Option<f64>,

    /// Directory for target_coordinates_NNN.txt
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Do not write a coordinate log
    #[arg(long)]
    no_log: bool,

    /// Delay between capture retries in milliseconds
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Consecutive capture failures tolerated before giving up
    #[arg(long)]
    max_retries: Option<u32>,

    /// Font used for target labels
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::load_json(path)?,
            None => TrackerConfig::default(),
        };
        if let Some(index) = self.camera {
            config.camera_index = Some(index);
        }
        if let Some(count) = self.scan_count {
            config.scan_count = count;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(threshold) = self.threshold {
            config.detector.threshold = threshold;
        }
        if let Some(min_area) = self.min_area {
            config.detector.min_area = min_area;
        }
        if let Some(max_targets) = self.max_targets {
            config.detector.max_targets = max_targets;
        }
        if let Some(width) = self.output_width {
            config.output_width = width;
        }
        if let Some(height) = self.output_height {
            config.output_height = height;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        if self.no_log {
            config.log_coordinates = false;
        }
        if let Some(ms) = self.retry_delay_ms {
            config.retry_delay_ms = ms;
        }
        if let Some(retries) = self.max_retries {
            config.max_capture_retries = retries;
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn build_pipeline(
    config: &TrackerConfig,
    debug_out: Option<PathBuf>,
) -> anyhow::Result<FramePipeline> {
    let detector = TargetDetector::new(config.detector, config.mode);
    let mut pipeline =
        FramePipeline::new(detector, config.output_size())?.with_marker(config.marker.clone());
    if let Some(path) = &config.font_path {
        debug!("Using label font {}", path.display());
        pipeline = pipeline.with_font(load_font(path)?);
    }
    if let Some(dir) = debug_out {
        pipeline = pipeline.with_debug(dir)?;
    }
    Ok(pipeline)
}

fn run_image(
    path: &Path,
    annotated_out: Option<&PathBuf>,
    pipeline: &FramePipeline,
) -> anyhow::Result<()> {
    info!("Loading image: {:?}", path);
    let img = ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    debug!("Image loaded: {}x{}", img.width(), img.height());

    let report = pipeline.process(0, &img.to_rgb8())?;

    println!("\n=== IR Target Detection Results ===");
    println!("Total targets detected: {}", report.targets.len());
    for (i, (target, point)) in report.targets.iter().zip(&report.mapped).enumerate() {
        println!(
            "  Target {} at ({}, {}) area {:.1} -> ({:.2}, {:.2})",
            i + 1,
            target.x,
            target.y,
            target.area,
            point.x,
            point.y
        );
    }

    if let Some(out) = annotated_out {
        report
            .annotated
            .save(out)
            .map_err(|e| anyhow::anyhow!("Failed to save annotated image: {}", e))?;
        info!("Annotated image written to {}", out.display());
    }
    Ok(())
}

#[cfg(feature = "camera")]
fn run_camera(config: &TrackerConfig, pipeline: FramePipeline) -> anyhow::Result<()> {
    use irtrack::camera::opencv::{HighGuiPreview, OpenCvCamera, list_available_cameras};
    use irtrack::camera::preferred_camera_index;
    use irtrack::coord_log::CoordinateLog;
    use irtrack::{TrackerError, TrackingSession};

    let index = match config.camera_index {
        Some(index) => index,
        None => {
            let available = list_available_cameras(config.scan_count);
            info!("Available camera indices: {:?}", available);
            preferred_camera_index(&available).ok_or(TrackerError::NoCameras)?
        }
    };

    let camera = OpenCvCamera::open(index)?;
    info!("Successfully opened camera with index {}. Press 'q' to quit.", camera.index());

    let preview = HighGuiPreview::new(&config.window_title)?;
    let mut session =
        TrackingSession::new(camera, preview, pipeline).with_retry(config.retry_policy());
    if config.log_coordinates {
        let log = CoordinateLog::create_in(&config.log_dir)?;
        info!("Coordinates are being saved to: {}", log.path().display());
        session = session.with_log(log);
    }

    let stats = session.run()?;
    info!(
        "Processed {} frames, {} with targets, {} capture failures, {} points logged",
        stats.frames, stats.frames_with_targets, stats.capture_failures, stats.logged_points
    );
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn run_camera(_config: &TrackerConfig, _pipeline: FramePipeline) -> anyhow::Result<()> {
    Err(irtrack::TrackerError::CameraSupportDisabled.into())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = args.resolve_config()?;
    debug!("Resolved configuration: {:?}", config);
    let pipeline = build_pipeline(&config, args.debug_out.clone())?;

    match &args.image {
        Some(path) => run_image(path, args.annotated_out.as_ref(), &pipeline),
        None => run_camera(&config, pipeline),
    }
}
