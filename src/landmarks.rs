//! Landmark source: face detection plus 68-point facial landmarks.
//!
//! Faces are located with an `OpenCV` Haar cascade; each face region is then
//! run through a pretrained `ONNX` landmark model to obtain the 68 ordered
//! points of the standard iBUG annotation. Indices 36-41 are the left eye
//! contour and 42-47 the right eye contour, in the order EAR estimation
//! expects. Both model files are startup resources: failure to load either
//! one is fatal.

use crate::constants::{EYE_CONTOUR_POINTS, LEFT_EYE_RANGE, NUM_FACIAL_LANDMARKS, RIGHT_EYE_RANGE};
use crate::ear::EyeContour;
use crate::{Error, Result};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Point2f, Rect, Size, Vector, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// One detected face: bounding rectangle and 68 landmarks in frame coordinates
#[derive(Debug, Clone)]
pub struct FaceLandmarks {
    /// Face bounding box in the frame
    pub bbox: Rect,
    /// 68 ordered landmark points in frame coordinates
    pub points: Vec<Point2f>,
}

impl FaceLandmarks {
    /// Left eye contour (landmarks 36-41), or `None` if landmarks are incomplete
    #[must_use]
    pub fn left_eye(&self) -> Option<EyeContour> {
        eye_contour(&self.points, LEFT_EYE_RANGE)
    }

    /// Right eye contour (landmarks 42-47), or `None` if landmarks are incomplete
    #[must_use]
    pub fn right_eye(&self) -> Option<EyeContour> {
        eye_contour(&self.points, RIGHT_EYE_RANGE)
    }
}

fn eye_contour(points: &[Point2f], range: Range<usize>) -> Option<EyeContour> {
    let slice = points.get(range)?;
    let mut eye = [(0.0f32, 0.0f32); EYE_CONTOUR_POINTS];
    for (dst, p) in eye.iter_mut().zip(slice) {
        *dst = (p.x, p.y);
    }
    Some(eye)
}

/// Face and landmark detector over a grayscale frame
pub struct LandmarkSource {
    face_cascade: CascadeClassifier,
    session: Session,
    input_size: i32,
}

impl LandmarkSource {
    /// Load the face cascade and the landmark model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelError`] if either file is missing or cannot be
    /// parsed, and propagates ONNX runtime initialization failures.
    pub fn new<P: AsRef<Path>>(cascade_path: P, model_path: P, input_size: i32) -> Result<Self> {
        let cascade_str = cascade_path
            .as_ref()
            .to_str()
            .ok_or_else(|| Error::ModelError("Cascade path is not valid UTF-8".to_string()))?;

        log::info!("Loading face cascade: {cascade_str}");
        let face_cascade = CascadeClassifier::new(cascade_str)
            .map_err(|e| Error::ModelError(format!("Failed to load face cascade {cascade_str}: {e}")))?;
        if face_cascade.empty()? {
            return Err(Error::ModelError(format!("Face cascade is empty: {cascade_str}")));
        }

        log::info!(
            "Loading landmark model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("landmark_source")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        Ok(Self {
            face_cascade,
            session,
            input_size,
        })
    }

    /// Detect faces in a grayscale frame and locate landmarks for each.
    ///
    /// Returns an empty vector when no face is found; that is a recoverable
    /// per-frame condition, not an error.
    pub fn detect(&mut self, gray: &Mat) -> Result<Vec<FaceLandmarks>> {
        let mut faces = Vector::<Rect>::new();
        self.face_cascade.detect_multi_scale(
            gray,
            &mut faces,
            1.1,
            5,
            0,
            Size::new(60, 60),
            Size::new(0, 0),
        )?;

        let mut results = Vec::with_capacity(faces.len());
        for bbox in faces {
            let roi = Mat::roi(gray, bbox)?.try_clone()?;
            let marks = self.landmarks_for_face(&roi)?;
            if marks.len() != NUM_FACIAL_LANDMARKS {
                log::warn!("Landmark model returned {} points, expected {}", marks.len(), NUM_FACIAL_LANDMARKS);
                continue;
            }

            // Map from model input coordinates back into the frame
            #[allow(clippy::cast_precision_loss)]
            let points = marks
                .iter()
                .map(|p| {
                    Point2f::new(
                        bbox.x as f32 + p.x * bbox.width as f32 / self.input_size as f32,
                        bbox.y as f32 + p.y * bbox.height as f32 / self.input_size as f32,
                    )
                })
                .collect();

            results.push(FaceLandmarks { bbox, points });
        }

        Ok(results)
    }

    /// Run the landmark model on one grayscale face region
    fn landmarks_for_face(&self, face_roi: &Mat) -> Result<Vec<Point2f>> {
        let input = self.preprocess(face_roi)?;
        let marks = self.forward(input)?;

        let mut points = Vec::with_capacity(NUM_FACIAL_LANDMARKS);
        for chunk in marks.chunks_exact(2).take(NUM_FACIAL_LANDMARKS) {
            points.push(Point2f::new(chunk[0], chunk[1]));
        }
        Ok(points)
    }

    /// Resize, expand to RGB, and normalize one face region for the model
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)] // input size is small
    fn preprocess(&self, face_roi: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            face_roi,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        // The model expects 3 channels; replicate the grayscale plane
        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_GRAY2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(row as i32, col as i32)?;
                for ch in 0..channels {
                    data[(row * size + col) * channels + ch] = pixel[ch];
                }
            }
        }

        Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::ModelError(format!("Failed to create input array: {e}")))
    }

    /// Run forward pass through the model
    fn forward(&self, inputs: Array4<f32>) -> Result<Vec<f32>> {
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let marks_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelError("No output from landmark model".to_string()))?;

        let marks_tensor = marks_output.try_extract::<f32>()?;
        let marks_view = marks_tensor.view();
        let marks_data = marks_view
            .as_slice()
            .ok_or_else(|| Error::ModelError("Failed to read landmark model output".to_string()))?;

        Ok(marks_data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_landmarks() -> FaceLandmarks {
        let mut points = vec![Point2f::new(0.0, 0.0); NUM_FACIAL_LANDMARKS];
        for (i, p) in points.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            {
                p.x = i as f32;
                p.y = i as f32 * 2.0;
            }
        }
        FaceLandmarks {
            bbox: Rect::new(0, 0, 100, 100),
            points,
        }
    }

    #[test]
    fn test_eye_contour_extraction() {
        let face = synthetic_landmarks();

        let left = face.left_eye().unwrap();
        assert_eq!(left[0], (36.0, 72.0));
        assert_eq!(left[5], (41.0, 82.0));

        let right = face.right_eye().unwrap();
        assert_eq!(right[0], (42.0, 84.0));
        assert_eq!(right[5], (47.0, 94.0));
    }

    #[test]
    fn test_eye_contour_incomplete_landmarks() {
        let face = FaceLandmarks {
            bbox: Rect::new(0, 0, 10, 10),
            points: vec![Point2f::new(0.0, 0.0); 40],
        };
        assert!(face.left_eye().is_some());
        assert!(face.right_eye().is_none());
    }

    #[test]
    fn test_landmark_eye_indices() {
        // iBUG 68-point annotation: left eye 36-41, right eye 42-47
        assert_eq!(LEFT_EYE_RANGE.len(), EYE_CONTOUR_POINTS);
        assert_eq!(RIGHT_EYE_RANGE.len(), EYE_CONTOUR_POINTS);
        assert_eq!(LEFT_EYE_RANGE.end, RIGHT_EYE_RANGE.start);
        assert!(RIGHT_EYE_RANGE.end <= NUM_FACIAL_LANDMARKS);
    }
}
