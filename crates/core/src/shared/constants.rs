use std::time::Duration;

pub const FACE_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const FACE_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Upper bound on a single camera snapshot request.
pub const CAMERA_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Monitor loop wake-up granularity.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const DEFAULT_IMAGES_DIR: &str = "detected_images";
pub const DEFAULT_KNOWN_FACES_DIR: &str = "known_faces";
pub const DEFAULT_FALLBACK_IMAGES_DIR: &str = "fallback_images";

pub const UNKNOWN_LABEL: &str = "Unknown";

/// Upper bound on a single webhook alert delivery.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
