//! Blink-to-Morse communicator library.
//!
//! An assistive communication aid: voluntary eye blinks are detected from a
//! camera feed, classified by duration into Morse symbols, and translated
//! into text. The pipeline per frame is:
//!
//! 1. Face detection (Haar cascade) and 68-point landmark detection (`ONNX`
//!    Runtime) on the grayscale frame
//! 2. Eye aspect ratio (EAR) estimation per eye, averaged
//! 3. Blink event detection (open -> closed -> open cycle with duration)
//! 4. Symbol classification (dot / dash / ignored by duration band)
//! 5. Morse accumulation and letter segmentation on inactivity timeout
//! 6. Overlay drawing and presentation (window or MJPEG stream)
//!
//! # Examples
//!
//! ## Core state machine without a camera
//!
//! ```
//! use blink_morse::blink::BlinkDetector;
//! use blink_morse::morse::{classify_blink, MorseAccumulator};
//! use std::time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut detector = BlinkDetector::new(0.2, t0);
//! let mut morse = MorseAccumulator::new(Duration::from_secs(3));
//!
//! // One short blink: closed at t0, open again 300 ms later
//! detector.update(0.1, t0);
//! if let Some(event) = detector.update(0.3, t0 + Duration::from_millis(300)) {
//!     if let Some(symbol) = classify_blink(
//!         event.duration,
//!         Duration::from_secs_f64(0.5),
//!         Duration::from_secs_f64(1.0),
//!     ) {
//!         morse.push(symbol);
//!     }
//! }
//! assert_eq!(morse.pending(), ".");
//!
//! // After 3 s of inactivity the buffer decodes to a letter
//! let idle = detector.idle_time(t0 + Duration::from_secs(4));
//! assert_eq!(morse.tick(idle), Some('E'));
//! ```
//!
//! ## Full session
//!
//! ```no_run
//! use blink_morse::config::Config;
//! use blink_morse::session::{MorseSession, VideoSource};
//! use blink_morse::sink::WindowSink;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! config.validate()?;
//!
//! let mut session = MorseSession::start(&config, VideoSource::Camera(0))?;
//! let mut sink = WindowSink::new("Blink to Speak")?;
//! session.run(&mut sink)?;
//!
//! println!("Translated: {}", session.text());
//! # Ok(())
//! # }
//! ```

/// Blink event detection from the per-frame EAR stream
pub mod blink;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Eye aspect ratio estimation
pub mod ear;

/// Error types and result handling
pub mod error;

/// Face detection and 68-point facial landmarks
pub mod landmarks;

/// Morse symbol classification, lookup table, and segmentation
pub mod morse;

/// Overlay drawing onto annotated frames
pub mod overlay;

/// Detection session and main loop
pub mod session;

/// Presentation sinks (window, MJPEG stream, headless)
pub mod sink;

pub use error::{Error, Result};
