//! Blink event detection from a per-frame EAR stream.
//!
//! A two-state machine (open/closed) driven by the averaged eye aspect
//! ratio. One complete open -> closed -> open cycle emits a single
//! [`BlinkEvent`] carrying the closed duration. Frames with no usable
//! measurement (no face, degenerate contour) must simply not be fed to
//! [`BlinkDetector::update`]; an in-progress blink spans such gaps and its
//! duration is still measured from the original closing instant.

use std::time::{Duration, Instant};

/// One complete open -> closed -> open cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkEvent {
    /// How long the eye stayed below the threshold
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EyeState {
    Open,
    Closed,
}

/// Stateful blink detector
///
/// Invariant: `blink_start` is `Some` exactly while the state is `Closed`.
pub struct BlinkDetector {
    ear_threshold: f64,
    state: EyeState,
    blink_start: Option<Instant>,
    last_blink_end: Instant,
}

impl BlinkDetector {
    /// Create a new detector in the open state.
    ///
    /// `now` seeds `last_blink_end`, so the letter-gap clock starts ticking
    /// from session start even before the first blink.
    #[must_use]
    pub fn new(ear_threshold: f64, now: Instant) -> Self {
        Self {
            ear_threshold,
            state: EyeState::Open,
            blink_start: None,
            last_blink_end: now,
        }
    }

    /// Feed one per-frame EAR measurement.
    ///
    /// Returns a [`BlinkEvent`] on the closed -> open transition, `None`
    /// otherwise. Repeated sub-threshold or above-threshold frames are
    /// no-ops; a single continuous closed interval never emits twice.
    pub fn update(&mut self, ear: f64, now: Instant) -> Option<BlinkEvent> {
        match self.state {
            EyeState::Open if ear < self.ear_threshold => {
                self.state = EyeState::Closed;
                self.blink_start = Some(now);
                None
            }
            EyeState::Closed if ear >= self.ear_threshold => {
                self.state = EyeState::Open;
                let start = self.blink_start.take()?;
                self.last_blink_end = now;
                Some(BlinkEvent {
                    duration: now.saturating_duration_since(start),
                })
            }
            _ => None,
        }
    }

    /// Whether the eye is currently below the threshold
    #[must_use]
    pub fn is_blinking(&self) -> bool {
        self.state == EyeState::Closed
    }

    /// Time since the last emitted blink event (or since session start)
    #[must_use]
    pub fn idle_time(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_blink_end)
    }

    /// Reset to the initial open state
    pub fn reset(&mut self, now: Instant) {
        self.state = EyeState::Open;
        self.blink_start = None;
        self.last_blink_end = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn test_simple_blink_cycle() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        assert!(detector.update(0.3, at(t0, 0)).is_none());
        assert!(detector.update(0.1, at(t0, 100)).is_none());
        assert!(detector.is_blinking());

        let event = detector.update(0.3, at(t0, 400)).expect("blink should be emitted on reopen");
        assert_eq!(event.duration, Duration::from_millis(300));
        assert!(!detector.is_blinking());
    }

    #[test]
    fn test_no_event_without_closure() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        // Eye never dips below the threshold
        for i in 0..10 {
            assert!(detector.update(0.25, at(t0, i * 33)).is_none());
        }
    }

    #[test]
    fn test_no_double_emit_for_one_closed_interval() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        detector.update(0.1, at(t0, 0));
        // Many consecutive closed frames, still one interval
        for i in 1..10 {
            assert!(detector.update(0.1, at(t0, i * 33)).is_none());
        }
        assert!(detector.update(0.3, at(t0, 330)).is_some());
        // Subsequent open frames produce nothing
        assert!(detector.update(0.3, at(t0, 363)).is_none());
    }

    #[test]
    fn test_blink_spans_missing_face_frames() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        detector.update(0.1, at(t0, 0));
        // Two frames with no detected face: update is simply not called.
        let event = detector.update(0.3, at(t0, 200)).expect("blink should survive the gap");
        assert_eq!(event.duration, Duration::from_millis(200));
    }

    #[test]
    fn test_idle_time_tracks_last_blink_end() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        assert_eq!(detector.idle_time(at(t0, 500)), Duration::from_millis(500));

        detector.update(0.1, at(t0, 1000));
        detector.update(0.3, at(t0, 1200));
        assert_eq!(detector.idle_time(at(t0, 4300)), Duration::from_millis(3100));
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut detector = BlinkDetector::new(0.2, t0);

        detector.update(0.1, at(t0, 0));
        detector.reset(at(t0, 100));
        assert!(!detector.is_blinking());
        // Reopening after a reset emits nothing; the half-open cycle is gone
        assert!(detector.update(0.3, at(t0, 200)).is_none());
    }
}
