//! Eye aspect ratio (EAR) estimation from a 6-point eye contour.
//!
//! EAR is the ratio of the two vertical lid distances to the horizontal eye
//! width; it drops sharply when the eye closes, which makes a simple
//! threshold sufficient for blink detection.

use crate::constants::EYE_CONTOUR_POINTS;

/// One eye contour: exactly six ordered 2-D points.
///
/// The order matters: point 0 is the outer corner, 3 the inner corner,
/// 1/2 the upper lid and 5/4 the lower lid, matching landmark indices
/// 36-41 / 42-47 of the 68-point model.
pub type EyeContour = [(f32, f32); EYE_CONTOUR_POINTS];

/// Horizontal widths below this are treated as degenerate geometry
const MIN_EYE_WIDTH: f64 = 1e-6;

/// Compute the eye aspect ratio for one eye contour.
///
/// Returns `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`, or `None` when the
/// horizontal distance is effectively zero (failed landmark detection).
/// Callers must treat a `None` frame as "no usable measurement" and skip
/// blink-state transitions for it.
#[must_use]
pub fn eye_aspect_ratio(eye: &EyeContour) -> Option<f64> {
    let vertical_a = euclidean(eye[1], eye[5]);
    let vertical_b = euclidean(eye[2], eye[4]);
    let horizontal = euclidean(eye[0], eye[3]);

    if horizontal < MIN_EYE_WIDTH {
        return None;
    }

    Some((vertical_a + vertical_b) / (2.0 * horizontal))
}

fn euclidean(a: (f32, f32), b: (f32, f32)) -> f64 {
    let dx = f64::from(a.0) - f64::from(b.0);
    let dy = f64::from(a.1) - f64::from(b.1);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Roughly open-eye geometry: width 10, lid gaps 3
    fn open_eye() -> EyeContour {
        [
            (0.0, 0.0),
            (3.0, -1.5),
            (7.0, -1.5),
            (10.0, 0.0),
            (7.0, 1.5),
            (3.0, 1.5),
        ]
    }

    #[test]
    fn test_ear_open_eye() {
        let ear = eye_aspect_ratio(&open_eye()).unwrap();
        assert!(ear > 0.2, "open eye should be above the blink threshold, got {ear}");
    }

    #[test]
    fn test_ear_closed_eye() {
        // Lids nearly touching
        let eye: EyeContour = [
            (0.0, 0.0),
            (3.0, -0.1),
            (7.0, -0.1),
            (10.0, 0.0),
            (7.0, 0.1),
            (3.0, 0.1),
        ];
        let ear = eye_aspect_ratio(&eye).unwrap();
        assert!(ear < 0.2, "closed eye should be below the blink threshold, got {ear}");
    }

    #[test]
    fn test_ear_non_negative() {
        let ear = eye_aspect_ratio(&open_eye()).unwrap();
        assert!(ear >= 0.0);
    }

    #[test]
    fn test_ear_translation_invariant() {
        let base = eye_aspect_ratio(&open_eye()).unwrap();

        let mut shifted = open_eye();
        for p in &mut shifted {
            p.0 += 123.0;
            p.1 -= 456.0;
        }
        let moved = eye_aspect_ratio(&shifted).unwrap();

        assert!((base - moved).abs() < 1e-9);
    }

    #[test]
    fn test_ear_degenerate_width() {
        // All points collapsed onto one x coordinate
        let eye: EyeContour = [(5.0, 0.0); EYE_CONTOUR_POINTS];
        assert!(eye_aspect_ratio(&eye).is_none());
    }
}
