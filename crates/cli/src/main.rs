use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use camwatch_core::acquisition::infrastructure::fallback_image_source::FallbackImageSource;
use camwatch_core::acquisition::infrastructure::http_camera_client::HttpCameraClient;
use camwatch_core::alerting::domain::alert_sink::{AlertSink, LogAlertSink};
use camwatch_core::alerting::infrastructure::background_alert_sink::BackgroundAlertSink;
use camwatch_core::alerting::infrastructure::webhook_alert_sink::WebhookAlertSink;
use camwatch_core::detection::domain::detector::Detector;
use camwatch_core::detection::domain::face_recognition_detector::FaceRecognitionDetector;
use camwatch_core::detection::domain::person_detector::PersonDetector;
use camwatch_core::detection::infrastructure::onnx_face_locator::OnnxFaceLocator;
use camwatch_core::detection::infrastructure::onnx_object_detector::OnnxObjectDetector;
use camwatch_core::identity::infrastructure::arcface_encoder::{self, ArcFaceEncoder};
use camwatch_core::identity::infrastructure::face_registry::{content_type_for, FaceRegistry};
use camwatch_core::identity::infrastructure::known_identity_loader;
use camwatch_core::persistence::domain::artifact_persister::ArtifactPersister;
use camwatch_core::persistence::infrastructure::glyph_annotator::{default_font, load_font, GlyphAnnotator};
use camwatch_core::persistence::infrastructure::jpeg_file_writer::JpegFileWriter;
use camwatch_core::pipeline::check_camera_use_case::CheckCameraUseCase;
use camwatch_core::pipeline::monitor_config::{MonitorConfig, RawMonitorConfig};
use camwatch_core::pipeline::monitor_loop::MonitorLoop;
use camwatch_core::shared::clock::{Clock, SystemClock};
use camwatch_core::shared::constants::{
    DEFAULT_KNOWN_FACES_DIR, EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, FACE_MODEL_NAME,
    FACE_MODEL_URL,
};
use camwatch_core::shared::model_resolver::ModelResolver;

/// Periodic camera monitoring with face recognition or person detection.
#[derive(Parser)]
#[command(name = "camwatch", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize known faces in each snapshot.
    Faces(MonitorArgs),

    /// Report whenever a person is visible.
    Persons {
        #[command(flatten)]
        monitor: MonitorArgs,

        /// COCO-trained YOLO ONNX model.
        #[arg(long, env = "PERSON_MODEL")]
        person_model: Option<PathBuf>,
    },

    /// Add a reference photo to the known faces directory.
    Register {
        /// Name of the person in the photo.
        name: String,

        /// Image file to register.
        image: PathBuf,

        /// Directory holding reference photos.
        #[arg(long, env = "KNOWN_FACES_DIR", default_value = DEFAULT_KNOWN_FACES_DIR)]
        known_faces_dir: PathBuf,
    },
}

#[derive(Args)]
struct MonitorArgs {
    /// Camera snapshot URL.
    #[arg(long, env = "CAMERA_ENDPOINT")]
    camera_endpoint: Option<String>,

    /// Seconds between checks.
    #[arg(long, env = "CHECK_INTERVAL_SECONDS")]
    check_interval_seconds: Option<String>,

    /// Save annotated frames ("true" to enable, default true).
    #[arg(long, env = "SAVE_IMAGES")]
    save_images: Option<String>,

    /// Directory for annotated frames.
    #[arg(long, env = "IMAGES_DIR")]
    images_dir: Option<PathBuf>,

    /// Directory holding reference photos.
    #[arg(long, env = "KNOWN_FACES_DIR")]
    known_faces_dir: Option<PathBuf>,

    /// Stills used when the camera cannot be reached.
    #[arg(long, env = "FALLBACK_IMAGES_DIR")]
    fallback_images_dir: Option<PathBuf>,

    /// POST alerts as JSON to this URL instead of logging them.
    #[arg(long, env = "ALERT_WEBHOOK_URL")]
    alert_webhook_url: Option<String>,

    /// TrueType font for box labels; the bundled DejaVu Sans is used when unset.
    #[arg(long, env = "ANNOTATION_FONT")]
    annotation_font: Option<PathBuf>,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value = "0.25")]
    confidence: f64,
}

impl MonitorArgs {
    fn into_config(self) -> Result<(MonitorConfig, f64), Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            )
            .into());
        }
        let config = RawMonitorConfig {
            camera_endpoint: self.camera_endpoint,
            check_interval_seconds: self.check_interval_seconds,
            save_images: self.save_images,
            images_dir: self.images_dir,
            known_faces_dir: self.known_faces_dir,
            fallback_images_dir: self.fallback_images_dir,
            alert_webhook_url: self.alert_webhook_url,
            annotation_font: self.annotation_font,
        }
        .validate()?;
        Ok((config, self.confidence))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Faces(monitor) => run_faces(monitor),
        Command::Persons {
            monitor,
            person_model,
        } => run_persons(monitor, person_model),
        Command::Register {
            name,
            image,
            known_faces_dir,
        } => run_register(&name, &image, &known_faces_dir),
    }
}

fn run_faces(args: MonitorArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, confidence) = args.into_config()?;
    let shutdown = install_shutdown_handler()?;

    let resolver = ModelResolver::with_default_cache(None)?;
    log::info!("Resolving model: {FACE_MODEL_NAME}");
    let face_model = resolver.resolve(
        FACE_MODEL_NAME,
        FACE_MODEL_URL,
        Some(Box::new(download_progress("face detection"))),
    )?;
    log::info!("Resolving model: {EMBEDDING_MODEL_NAME}");
    let embedding_model = resolver.resolve(
        EMBEDDING_MODEL_NAME,
        EMBEDDING_MODEL_URL,
        Some(Box::new(download_progress("face embedding"))),
    )?;
    eprintln!();

    let mut locator = OnnxFaceLocator::new(&face_model, confidence)?;
    let encoder = ArcFaceEncoder::new(&embedding_model, arcface_encoder::DEFAULT_THRESHOLD)?;
    let known = known_identity_loader::load(&config.known_faces_dir, &mut locator, &encoder)?;
    if known.is_empty() {
        log::warn!("No known faces loaded, every face will be reported as unknown");
    }

    let detector = FaceRecognitionDetector::new(Box::new(locator), Box::new(encoder), Arc::new(known));
    run_monitor(config, Box::new(detector), shutdown)
}

fn run_persons(
    args: MonitorArgs,
    person_model: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, confidence) = args.into_config()?;
    let person_model = person_model.ok_or("PERSON_MODEL must point to a YOLO ONNX model")?;
    if !person_model.is_file() {
        return Err(format!("Person model not found: {}", person_model.display()).into());
    }
    let shutdown = install_shutdown_handler()?;

    let detector = PersonDetector::new(Box::new(OnnxObjectDetector::new(
        &person_model,
        confidence,
    )?));
    run_monitor(config, Box::new(detector), shutdown)
}

fn run_monitor(
    config: MonitorConfig,
    detector: Box<dyn Detector>,
    shutdown: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let camera = HttpCameraClient::new(&config.camera_endpoint)?;
    let source = FallbackImageSource::new(Box::new(camera), Some(config.fallback_images_dir));

    let persister = if config.save_images {
        let font = match config.annotation_font.as_deref() {
            Some(path) => load_font(path)?,
            None => default_font()?,
        };
        Some(ArtifactPersister::new(
            Box::new(GlyphAnnotator::new(font)),
            Box::new(JpegFileWriter::new()),
            Box::new(SystemClock),
            config.images_dir,
        ))
    } else {
        log::info!("Saving detection images is disabled");
        None
    };

    let sink: Box<dyn AlertSink> = match &config.alert_webhook_url {
        Some(url) => {
            log::info!("Sending alerts to {url}");
            Box::new(WebhookAlertSink::new(url)?)
        }
        None => Box::new(LogAlertSink),
    };
    let alert_sink = BackgroundAlertSink::new(sink)?;

    let mut use_case = CheckCameraUseCase::new(
        Box::new(source),
        detector,
        persister,
        Box::new(alert_sink),
        Box::new(SystemClock),
    );

    MonitorLoop::new(config.check_interval, shutdown).run(&mut use_case);
    Ok(())
}

fn run_register(
    name: &str,
    image: &Path,
    known_faces_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(image)
        .map_err(|e| format!("Cannot read {}: {e}", image.display()))?;
    let original_filename = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let registry = FaceRegistry::new(known_faces_dir);
    let registered = registry
        .register(
            name,
            content_type_for(image),
            &original_filename,
            &bytes,
            SystemClock.now(),
        )
        .map_err(|e| format!("Registration failed ({}): {e}", e.status_code()))?;

    log::info!(
        "Face registered successfully as {}; restart monitoring to pick it up",
        registered.filename
    );
    Ok(())
}

fn install_shutdown_handler() -> Result<Arc<AtomicBool>, Box<dyn std::error::Error>> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    ctrlc::set_handler(move || {
        log::info!("Shutdown requested, stopping after the current cycle");
        flag.store(true, Ordering::Relaxed);
    })?;
    Ok(shutdown)
}

fn download_progress(what: &'static str) -> impl Fn(u64, u64) + Send {
    move |downloaded, total| {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\rDownloading {what} model... {pct}%");
        } else {
            eprint!("\rDownloading {what} model... {downloaded} bytes");
        }
    }
}
