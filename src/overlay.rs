//! Overlay drawing: face boxes, eye landmarks, and the Morse/translation text.

use crate::constants::{LEFT_EYE_RANGE, RIGHT_EYE_RANGE};
use crate::landmarks::FaceLandmarks;
use crate::Result;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8};

/// State rendered on top of each frame
pub struct OverlayState<'a> {
    /// Current pending Morse symbol buffer
    pub pending: &'a str,
    /// Translated text so far
    pub text: &'a str,
    /// Faces detected this frame
    pub faces: &'a [FaceLandmarks],
}

/// Draw the overlay onto a BGR frame
pub fn draw(frame: &mut Mat, state: &OverlayState<'_>) -> Result<()> {
    if state.faces.is_empty() {
        imgproc::put_text(
            frame,
            "No faces detected!",
            Point::new(10, 30),
            FONT_HERSHEY_SIMPLEX,
            1.0,
            Scalar::new(0.0, 0.0, 255.0, 0.0),
            2,
            LINE_8,
            false,
        )?;
    }

    for face in state.faces {
        imgproc::rectangle(
            frame,
            face.bbox,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            2,
            LINE_8,
            0,
        )?;

        // Eye contour landmarks only; the rest of the 68 points are noise here
        for range in [LEFT_EYE_RANGE, RIGHT_EYE_RANGE] {
            for point in face.points.get(range).unwrap_or_default() {
                #[allow(clippy::cast_possible_truncation)]
                imgproc::circle(
                    frame,
                    Point::new(point.x as i32, point.y as i32),
                    2,
                    Scalar::new(0.0, 0.0, 255.0, 0.0),
                    -1,
                    LINE_8,
                    0,
                )?;
            }
        }
    }

    imgproc::put_text(
        frame,
        &format!("Morse: {}", state.pending),
        Point::new(10, 60),
        FONT_HERSHEY_SIMPLEX,
        1.0,
        Scalar::new(255.0, 0.0, 0.0, 0.0),
        2,
        LINE_8,
        false,
    )?;

    imgproc::put_text(
        frame,
        &format!("Translation: {}", state.text),
        Point::new(10, 100),
        FONT_HERSHEY_SIMPLEX,
        1.0,
        Scalar::new(0.0, 255.0, 0.0, 0.0),
        2,
        LINE_8,
        false,
    )?;

    Ok(())
}
