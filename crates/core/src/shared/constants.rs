use std::time::Duration;

use crate::detection::domain::classifier::DetectParams;

/// Frame pull interval (~30 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

pub const DEFAULT_CAMERA_INDEX: u32 = 0;

pub const FACE_DETECT_PARAMS: DetectParams = DetectParams {
    scale_factor: 1.1,
    min_neighbors: 3,
    min_size: Some((30, 30)),
};

pub const EYE_DETECT_PARAMS: DetectParams = DetectParams {
    scale_factor: 1.1,
    min_neighbors: 2,
    min_size: None,
};

pub const CASCADE_DIR_NAME: &str = "haarcascades";
pub const FACE_CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";
pub const EYE_CASCADE_FILE: &str = "haarcascade_eye.xml";
/// Environment variable naming an OpenCV install with `etc/haarcascades`.
pub const OPENCV_DIR_ENV: &str = "OPENCV_DIR";

pub const FACE_LABEL: &str = "Face";
pub const FACE_COUNT_PREFIX: &str = "Detected Faces: ";
pub const FACE_COUNT_ORIGIN: (i32, i32) = (10, 30);

pub const SNAPSHOT_PREFIX: &str = "face_detection";
pub const SNAPSHOT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Overrides the overlay font lookup.
pub const FONT_ENV: &str = "FACECAM_FONT";
