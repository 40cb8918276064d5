//! Configuration management for the blink-to-Morse application

use crate::{constants, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model file paths
    pub models: ModelConfig,

    /// Face and landmark detection parameters
    pub detection: DetectionConfig,

    /// Blink classification and segmentation timing
    pub timing: TimingConfig,

    /// MJPEG streaming parameters
    pub stream: StreamConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the Haar cascade XML for face detection
    pub face_cascade: PathBuf,

    /// Path to the facial landmarks ONNX model (68 points)
    pub face_landmarks: PathBuf,
}

/// Detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// EAR below this value counts as a closed eye (0.0-1.0)
    pub ear_threshold: f64,

    /// Landmark model input size (square, pixels)
    pub landmark_input_size: i32,
}

/// Blink timing parameters, all in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Maximum blink duration for a dot
    pub dot_max_secs: f64,

    /// Maximum blink duration for a dash
    pub dash_max_secs: f64,

    /// Inactivity after the last blink before the pending sequence is decoded
    pub letter_gap_secs: f64,
}

/// MJPEG streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Bind address for the HTTP stream
    pub address: String,

    /// JPEG encode quality (1-100)
    pub jpeg_quality: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            detection: DetectionConfig::default(),
            timing: TimingConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_cascade: PathBuf::from("assets/haarcascade_frontalface_default.xml"),
            face_landmarks: PathBuf::from("assets/face_landmarks.onnx"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: constants::DEFAULT_EAR_THRESHOLD,
            landmark_input_size: constants::DEFAULT_LANDMARK_INPUT_SIZE,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dot_max_secs: constants::DEFAULT_DOT_MAX_SECS,
            dash_max_secs: constants::DEFAULT_DASH_MAX_SECS,
            letter_gap_secs: constants::DEFAULT_LETTER_GAP_SECS,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:5000".to_string(),
            jpeg_quality: constants::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration values and model paths
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.ear_threshold) {
            return Err(Error::ConfigError(
                "EAR threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.detection.landmark_input_size <= 0 {
            return Err(Error::ConfigError(
                "Landmark input size must be greater than 0".to_string(),
            ));
        }

        if self.timing.dot_max_secs <= 0.0 {
            return Err(Error::ConfigError("Dot duration must be greater than 0".to_string()));
        }
        if self.timing.dash_max_secs <= self.timing.dot_max_secs {
            return Err(Error::ConfigError(
                "Dash duration must be greater than the dot duration".to_string(),
            ));
        }
        if self.timing.letter_gap_secs <= 0.0 {
            return Err(Error::ConfigError("Letter gap must be greater than 0".to_string()));
        }

        if !(1..=100).contains(&self.stream.jpeg_quality) {
            return Err(Error::ConfigError(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }

        // Model files are startup resources; their absence is fatal
        if !self.models.face_cascade.exists() {
            return Err(Error::ConfigError(format!(
                "Face cascade not found: {}",
                self.models.face_cascade.display()
            )));
        }
        if !self.models.face_landmarks.exists() {
            return Err(Error::ConfigError(format!(
                "Face landmarks model not found: {}",
                self.models.face_landmarks.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Blink-to-Morse Configuration

# Model paths
models:
  face_cascade: "assets/haarcascade_frontalface_default.xml"
  face_landmarks: "assets/face_landmarks.onnx"

# Detection parameters
detection:
  ear_threshold: 0.2
  landmark_input_size: 128

# Blink timing (seconds)
timing:
  dot_max_secs: 0.5
  dash_max_secs: 1.0
  letter_gap_secs: 3.0

# MJPEG streaming
stream:
  address: "127.0.0.1:5000"
  jpeg_quality: 80
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_match_original_timings() {
        let config = Config::default();
        assert_eq!(config.detection.ear_threshold, 0.2);
        assert_eq!(config.timing.dot_max_secs, 0.5);
        assert_eq!(config.timing.dash_max_secs, 1.0);
        assert_eq!(config.timing.letter_gap_secs, 3.0);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.stream.address, "127.0.0.1:5000");
        assert_eq!(config.stream.jpeg_quality, 80);
    }

    #[test]
    fn test_validation_rejects_inverted_bands() {
        let mut config = Config::default();
        config.timing.dash_max_secs = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_threshold() {
        let mut config = Config::default();
        config.detection.ear_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_missing_models() {
        let mut config = Config::default();
        config.models.face_landmarks = PathBuf::from("/nonexistent/model.onnx");
        assert!(config.validate().is_err());
    }
}
