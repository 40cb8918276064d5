//! Detection session: owns the camera and all per-session state.
//!
//! One `MorseSession` is one camera session. It exclusively owns the capture
//! handle, the blink state machine, and the Morse buffers; nothing else
//! holds references to them. The loop is single-threaded: read a frame, run
//! every stage, produce one presentation output, repeat.

use crate::blink::{BlinkDetector, BlinkEvent};
use crate::config::Config;
use crate::ear::eye_aspect_ratio;
use crate::landmarks::{FaceLandmarks, LandmarkSource};
use crate::morse::{classify_blink, MorseAccumulator, Symbol};
use crate::overlay::{self, OverlayState};
use crate::sink::{PresentationSink, SinkSignal};
use crate::{Error, Result};
use log::{debug, info};
use opencv::core::Mat;
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE};
use std::time::{Duration, Instant};

/// Video source type
#[derive(Debug, Clone)]
pub enum VideoSource {
    /// Webcam index
    Camera(i32),
    /// Video file path
    File(String),
}

/// What one frame produced, for the overlay and for callers
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Faces detected this frame
    pub faces: Vec<FaceLandmarks>,
    /// Averaged EAR, if a usable measurement existed
    pub ear: Option<f64>,
    /// Blink event emitted this frame
    pub blink: Option<BlinkEvent>,
    /// Symbol appended this frame
    pub symbol: Option<Symbol>,
    /// Character decoded by the timeout check this frame
    pub decoded: Option<char>,
}

/// One blink-to-Morse detection session
pub struct MorseSession {
    source: VideoSource,
    capture: Option<VideoCapture>,
    landmarks: LandmarkSource,
    blink: BlinkDetector,
    morse: MorseAccumulator,
    dot_max: Duration,
    dash_max: Duration,
}

impl MorseSession {
    /// Acquire the camera and load models; fatal on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraError`] if the device or file cannot be
    /// opened, and [`Error::ModelError`] if a model resource is missing.
    pub fn start(config: &Config, source: VideoSource) -> Result<Self> {
        info!("Starting blink-to-Morse session");

        let landmarks = LandmarkSource::new(
            &config.models.face_cascade,
            &config.models.face_landmarks,
            config.detection.landmark_input_size,
        )?;

        let capture = match &source {
            VideoSource::Camera(index) => {
                info!("Opening camera {index}");
                let mut cap = VideoCapture::new(*index, videoio::CAP_ANY)?;
                if !cap.is_opened()? {
                    return Err(Error::CameraError(format!("Failed to open camera {index}")));
                }
                // Keep latency low; detection is tied 1:1 to frame cadence
                cap.set(CAP_PROP_BUFFERSIZE, 1.0)?;
                cap
            }
            VideoSource::File(path) => {
                info!("Opening video file: {path}");
                let cap = VideoCapture::from_file(path, videoio::CAP_ANY)?;
                if !cap.is_opened()? {
                    return Err(Error::CameraError(format!("Failed to open video file: {path}")));
                }
                cap
            }
        };

        let now = Instant::now();
        Ok(Self {
            source,
            capture: Some(capture),
            landmarks,
            blink: BlinkDetector::new(config.detection.ear_threshold, now),
            morse: MorseAccumulator::new(Duration::from_secs_f64(config.timing.letter_gap_secs)),
            dot_max: Duration::from_secs_f64(config.timing.dot_max_secs),
            dash_max: Duration::from_secs_f64(config.timing.dash_max_secs),
        })
    }

    /// Run one full pass over a BGR frame.
    ///
    /// Detection feeds the blink state machine only when a usable EAR
    /// measurement exists; the segmentation timeout check runs regardless,
    /// so letters keep flushing during face-tracking gaps.
    pub fn process_frame(&mut self, frame: &Mat, now: Instant) -> Result<FrameReport> {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let faces = self.landmarks.detect(&gray)?;
        let mut report = FrameReport {
            faces,
            ..FrameReport::default()
        };

        // Single-user system: only the first face drives the state machine
        if let Some(face) = report.faces.first() {
            let left = face.left_eye().and_then(|eye| eye_aspect_ratio(&eye));
            let right = face.right_eye().and_then(|eye| eye_aspect_ratio(&eye));

            // Degenerate geometry on either eye: skip transitions this frame
            if let (Some(left), Some(right)) = (left, right) {
                let ear = (left + right) / 2.0;
                report.ear = Some(ear);

                if let Some(event) = self.blink.update(ear, now) {
                    debug!("Blink duration: {:.2}s", event.duration.as_secs_f64());
                    report.blink = Some(event);

                    if let Some(symbol) = classify_blink(event.duration, self.dot_max, self.dash_max) {
                        self.morse.push(symbol);
                        report.symbol = Some(symbol);
                    }
                }
            }
        }

        report.decoded = self.morse.tick(self.blink.idle_time(now));

        Ok(report)
    }

    /// Run the detection loop until the sink requests a stop or the source
    /// ends, then release the camera.
    pub fn run(&mut self, sink: &mut dyn PresentationSink) -> Result<()> {
        info!("Entering detection loop");

        loop {
            let Some(capture) = self.capture.as_mut() else {
                break;
            };

            let mut frame = Mat::default();
            if !capture.read(&mut frame)? || frame.empty() {
                // End of stream: video EOF or the device stopped delivering
                info!("Video source ended");
                break;
            }

            let report = self.process_frame(&frame, Instant::now())?;

            overlay::draw(
                &mut frame,
                &OverlayState {
                    pending: self.morse.pending(),
                    text: self.morse.text(),
                    faces: &report.faces,
                },
            )?;

            if sink.present(&frame)? == SinkSignal::Stop {
                break;
            }
        }

        self.stop()?;
        info!("Session finished; translated text: {:?}", self.morse.text());
        Ok(())
    }

    /// Release the camera; idempotent, querying afterwards is a no-op.
    pub fn stop(&mut self) -> Result<()> {
        if let Some(mut capture) = self.capture.take() {
            info!("Releasing video source: {:?}", self.source);
            capture.release()?;
        }
        Ok(())
    }

    /// Whether the session still holds the video source
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.capture.is_some()
    }

    /// Translated text accumulated so far
    #[must_use]
    pub fn text(&self) -> &str {
        self.morse.text()
    }

    /// Current pending Morse buffer
    #[must_use]
    pub fn pending(&self) -> &str {
        self.morse.pending()
    }
}

impl Drop for MorseSession {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
