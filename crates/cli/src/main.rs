use std::path::PathBuf;
use std::process;

use clap::Parser;

use pulsecheck_core::detection::domain::face_detector::FaceDetector;
use pulsecheck_core::detection::infrastructure::fixed_region_detector::FixedRegionDetector;
use pulsecheck_core::detection::infrastructure::region_file_detector::RegionFileDetector;
use pulsecheck_core::pipeline::estimate_vitals_use_case::EstimateVitalsUseCase;
use pulsecheck_core::pipeline::heart_metrics_estimator::HeartMetricsEstimator;
use pulsecheck_core::pipeline::pipeline_logger::LogPipelineLogger;
use pulsecheck_core::shared::constants::{CAPTURE_FPS, MAX_FRAMES, MIN_VALID_FRAMES};
use pulsecheck_core::shared::parameters::EstimatorParameters;
use pulsecheck_core::shared::region::FaceRegion;
use pulsecheck_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;

/// Heart rate and HRV from a sequence of face images.
#[derive(Parser)]
#[command(name = "pulsecheck")]
struct Cli {
    /// Directory of captured frames, taken in file-name order.
    input: PathBuf,

    /// Capture frame rate [default: 10, or the config file's value].
    #[arg(long)]
    fps: Option<f64>,

    /// Fixed face box for every frame: x,y,width,height.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    face: Option<Vec<i32>>,

    /// JSON file of per-frame face boxes from an external detector.
    #[arg(long)]
    regions: Option<PathBuf>,

    /// JSON file of estimator parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum frames with a usable forehead region.
    #[arg(long, default_value_t = MIN_VALID_FRAMES)]
    min_frames: usize,

    /// Maximum frames to read.
    #[arg(long, default_value_t = MAX_FRAMES)]
    max_frames: usize,

    /// Write the JSON result here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit the detailed report (undetermined reasons, window and beat counts).
    #[arg(long)]
    report: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let params = build_parameters(&cli)?;
    log::info!(
        "Estimating at {} fps (window {} samples, stride {})",
        params.fps,
        params.window_length(),
        params.step_size()
    );

    let mut use_case = EstimateVitalsUseCase::new(
        Box::new(ImageSequenceReader::new(params.fps)),
        build_detector(&cli)?,
        HeartMetricsEstimator::new(params),
        Box::new(LogPipelineLogger::default()),
    )
    .with_frame_limits(cli.max_frames, cli.min_frames);

    let vitals = use_case.execute(&cli.input)?;
    log::info!(
        "Used {} of {} frames",
        vitals.extraction.accepted,
        vitals.frames_read
    );

    let json = if cli.report {
        serde_json::to_string_pretty(&vitals.estimation)?
    } else {
        serde_json::to_string_pretty(&vitals.result())?
    };
    match cli.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("Result written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn build_parameters(cli: &Cli) -> Result<EstimatorParameters, Box<dyn std::error::Error>> {
    let params = match &cli.config {
        Some(path) => EstimatorParameters::from_json_file(path)?,
        None => EstimatorParameters::new(CAPTURE_FPS),
    };
    Ok(match cli.fps {
        Some(fps) => EstimatorParameters { fps, ..params }.repaired(),
        None => params,
    })
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.regions {
        return Ok(Box::new(RegionFileDetector::from_file(path)?));
    }
    match cli.face.as_deref() {
        Some(&[x, y, w, h]) => Ok(Box::new(FixedRegionDetector::new(FaceRegion::new(
            x, y, w, h,
        )))),
        _ => Err("A face box is required: pass --face x,y,w,h or --regions FILE".into()),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input.display()).into());
    }
    if cli.face.is_some() && cli.regions.is_some() {
        return Err("--face and --regions are mutually exclusive".into());
    }
    if cli.face.is_none() && cli.regions.is_none() {
        return Err("One of --face or --regions is required".into());
    }
    if let Some(face) = &cli.face {
        if face.len() != 4 {
            return Err(format!(
                "--face takes exactly four values x,y,width,height, got {}",
                face.len()
            )
            .into());
        }
        if face[2] <= 0 || face[3] <= 0 {
            return Err(format!(
                "Face width and height must be positive, got {}x{}",
                face[2], face[3]
            )
            .into());
        }
    }
    if let Some(fps) = cli.fps {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(format!("FPS must be positive, got {fps}").into());
        }
    }
    if cli.max_frames == 0 {
        return Err("--max-frames must be at least 1".into());
    }
    if cli.min_frames > cli.max_frames {
        return Err(format!(
            "--min-frames ({}) cannot exceed --max-frames ({})",
            cli.min_frames, cli.max_frames
        )
        .into());
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Config file not found: {}", config.display()).into());
        }
    }
    Ok(())
}
