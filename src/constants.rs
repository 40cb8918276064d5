//! Constants used throughout the application

use std::ops::Range;

/// Number of facial landmarks for full face
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Number of points in one eye contour
pub const EYE_CONTOUR_POINTS: usize = 6;

/// Landmark indices of the left eye contour (68-point model)
pub const LEFT_EYE_RANGE: Range<usize> = 36..42;

/// Landmark indices of the right eye contour (68-point model)
pub const RIGHT_EYE_RANGE: Range<usize> = 42..48;

/// EAR below this value counts as a closed eye
pub const DEFAULT_EAR_THRESHOLD: f64 = 0.2;

/// Blinks up to this long classify as a dot
pub const DEFAULT_DOT_MAX_SECS: f64 = 0.5;

/// Blinks up to this long (and longer than a dot) classify as a dash
pub const DEFAULT_DASH_MAX_SECS: f64 = 1.0;

/// Inactivity after the last blink before the pending sequence is decoded
pub const DEFAULT_LETTER_GAP_SECS: f64 = 3.0;

/// Default landmark model input size (square)
pub const DEFAULT_LANDMARK_INPUT_SIZE: i32 = 128;

/// Default JPEG encode quality for the MJPEG stream
pub const DEFAULT_JPEG_QUALITY: i32 = 80;

/// Multipart boundary used by the MJPEG stream
pub const MJPEG_BOUNDARY: &str = "frame";

/// Marker appended when a pending sequence has no Morse table entry
pub const UNKNOWN_SEQUENCE_MARKER: char = '?';
