//! Presentation sinks: where annotated frames go.
//!
//! The detection loop is sink-agnostic; it hands every annotated frame to a
//! [`PresentationSink`] and stops when the sink asks it to. Three sinks
//! exist: a local `highgui` window, an MJPEG-over-HTTP stream, and a
//! headless sink for video files and tests.

use crate::constants::MJPEG_BOUNDARY;
use crate::{Error, Result};
use opencv::core::{Mat, Vector};
use opencv::highgui::{self, WINDOW_NORMAL};
use opencv::imgcodecs::{self, IMWRITE_JPEG_QUALITY};
use std::io::Write;

/// Control signal returned by a sink after each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkSignal {
    /// Keep processing
    Continue,
    /// Cooperative stop: finish this iteration, then exit the loop
    Stop,
}

/// One presentation output per loop iteration
pub trait PresentationSink {
    /// Present one annotated BGR frame
    fn present(&mut self, frame: &Mat) -> Result<SinkSignal>;
}

/// Local display window; `q` or ESC requests a stop
pub struct WindowSink {
    window_name: String,
}

impl WindowSink {
    /// Create the display window
    pub fn new(window_name: &str) -> Result<Self> {
        highgui::named_window(window_name, WINDOW_NORMAL)?;
        Ok(Self {
            window_name: window_name.to_string(),
        })
    }
}

impl PresentationSink for WindowSink {
    fn present(&mut self, frame: &Mat) -> Result<SinkSignal> {
        highgui::imshow(&self.window_name, frame)?;

        let key = highgui::wait_key(1)?;
        if key == 27 || key == i32::from(b'q') {
            log::info!("Exit requested by user");
            return Ok(SinkSignal::Stop);
        }
        Ok(SinkSignal::Continue)
    }
}

/// MJPEG stream over HTTP (`multipart/x-mixed-replace`).
///
/// Binds an HTTP server, blocks until one client connects, and then writes
/// one JPEG part per frame. The loop is tied 1:1 to frame cadence, so a slow
/// consumer stalls frame production; a disconnected consumer ends the
/// session gracefully.
pub struct MjpegSink {
    // Held so the listening socket outlives the client stream
    _server: tiny_http::Server,
    writer: Box<dyn Write + Send>,
    jpeg_quality: i32,
}

impl MjpegSink {
    /// Bind `address` and wait for a single HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamError`] if the address cannot be bound or the
    /// handshake with the first client fails.
    pub fn bind(address: &str, jpeg_quality: i32) -> Result<Self> {
        let server = tiny_http::Server::http(address)
            .map_err(|e| Error::StreamError(format!("Failed to bind {address}: {e}")))?;
        log::info!("Streaming on http://{address}/ (waiting for a client)");

        let request = server
            .recv()
            .map_err(|e| Error::StreamError(format!("Failed to accept client: {e}")))?;
        log::info!("Client connected: {} {}", request.method(), request.url());

        let mut writer = request.into_writer();
        writer.write_all(
            format!(
                "HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Type: multipart/x-mixed-replace; boundary={MJPEG_BOUNDARY}\r\n\r\n"
            )
            .as_bytes(),
        )?;
        writer.flush()?;

        Ok(Self {
            _server: server,
            writer,
            jpeg_quality,
        })
    }
}

impl PresentationSink for MjpegSink {
    fn present(&mut self, frame: &Mat) -> Result<SinkSignal> {
        let mut encoded = Vector::<u8>::new();
        let params = Vector::from_slice(&[IMWRITE_JPEG_QUALITY, self.jpeg_quality]);
        imgcodecs::imencode(".jpg", frame, &mut encoded, &params)?;

        let header = format!("--{MJPEG_BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n");
        let part = self
            .writer
            .write_all(header.as_bytes())
            .and_then(|()| self.writer.write_all(encoded.as_slice()))
            .and_then(|()| self.writer.write_all(b"\r\n"))
            .and_then(|()| self.writer.flush());

        // A broken pipe means the client went away; end the stream, not the process
        if let Err(e) = part {
            log::info!("Stream client disconnected: {e}");
            return Ok(SinkSignal::Stop);
        }
        Ok(SinkSignal::Continue)
    }
}

/// No-output sink for video files and tests
pub struct HeadlessSink;

impl PresentationSink for HeadlessSink {
    fn present(&mut self, _frame: &Mat) -> Result<SinkSignal> {
        Ok(SinkSignal::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sink_never_stops() {
        let mut sink = HeadlessSink;
        let frame = Mat::default();
        for _ in 0..3 {
            assert_eq!(sink.present(&frame).unwrap(), SinkSignal::Continue);
        }
    }
}
