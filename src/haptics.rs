//! Haptic feedback boundary.
//!
//! Maps application events (room found, navigation error, recenter, quick
//! tilt) to fixed vibration patterns and plays them through the
//! [`HapticSink`] port. The actuator is an external collaborator: this
//! module owns the vocabulary of patterns, not the vibration hardware.
//!
//! Everything degrades to inactive on platforms without an actuator: play
//! and stop report `false` and do nothing.

use log::debug;
use serde::{Deserialize, Serialize};

/// Double pulse confirming a successful lookup.
pub const SUCCESS_PATTERN: [u64; 3] = [80, 40, 80];

/// Heavier double pulse signalling a failure.
pub const ERROR_PATTERN: [u64; 3] = [150, 60, 150];

/// Triple pulse drawing attention without alarm.
pub const WARNING_PATTERN: [u64; 5] = [60, 40, 60, 40, 60];

const DEFAULT_PULSE_MS: u64 = 150;
const RECENTER_PULSE_MS: u64 = 80;

/// A vibration pattern: one pulse, or alternating vibrate/pause durations.
/// All durations are milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HapticPattern {
    /// A single vibration of the given duration.
    Once(u64),
    /// Alternating vibrate/pause durations, starting with a vibration.
    Sequence(Vec<u64>),
}

impl HapticPattern {
    /// The pattern as the flat timing list the actuator consumes.
    pub fn timings(&self) -> Vec<u64> {
        match self {
            HapticPattern::Once(duration_ms) => vec![*duration_ms],
            HapticPattern::Sequence(timings) => timings.clone(),
        }
    }

    /// Total wall-clock length of the pattern, pauses included.
    pub fn total_ms(&self) -> u64 {
        self.timings().iter().sum()
    }
}

/// Semantic feedback categories with their fixed patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Positive confirmation.
    Success,
    /// Failure notification.
    Error,
    /// Attention-drawing cue.
    Warning,
    /// A plain pulse of the given duration.
    Once { duration_ms: u64 },
    /// Caller-supplied timing sequence.
    Custom(Vec<u64>),
}

impl FeedbackKind {
    /// The concrete pattern for this feedback category.
    pub fn pattern(&self) -> HapticPattern {
        match self {
            FeedbackKind::Success => HapticPattern::Sequence(SUCCESS_PATTERN.to_vec()),
            FeedbackKind::Error => HapticPattern::Sequence(ERROR_PATTERN.to_vec()),
            FeedbackKind::Warning => HapticPattern::Sequence(WARNING_PATTERN.to_vec()),
            FeedbackKind::Once { duration_ms } => HapticPattern::Once(*duration_ms),
            FeedbackKind::Custom(timings) => HapticPattern::Sequence(timings.clone()),
        }
    }
}

impl Default for FeedbackKind {
    fn default() -> Self {
        FeedbackKind::Once {
            duration_ms: DEFAULT_PULSE_MS,
        }
    }
}

/// Application events the feedback layer responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A room lookup succeeded.
    RoomFound,
    /// Navigation could not complete.
    NavigationError,
    /// The map view was recentered on the user.
    RecenterMap,
    /// The quick-tilt gesture fired.
    QuickTiltDetected,
}

impl AppEvent {
    /// The feedback category this event maps to.
    pub fn feedback(&self) -> FeedbackKind {
        match self {
            AppEvent::RoomFound => FeedbackKind::Success,
            AppEvent::NavigationError => FeedbackKind::Error,
            AppEvent::RecenterMap => FeedbackKind::Once {
                duration_ms: RECENTER_PULSE_MS,
            },
            AppEvent::QuickTiltDetected => FeedbackKind::Warning,
        }
    }
}

/// Access to the platform vibration actuator.
pub trait HapticSink {
    /// True iff the platform exposes a vibration capability.
    fn is_supported(&self) -> bool;

    /// Plays the timing list; returns false if the actuator refused it.
    fn vibrate(&mut self, timings: &[u64]) -> bool;

    /// Cancels any in-progress pattern.
    fn cancel(&mut self) -> bool;
}

/// Feedback driver over a [`HapticSink`].
///
/// Never errors: on an unsupported platform every operation reports `false`
/// and does nothing.
pub struct HapticDriver<S: HapticSink> {
    sink: S,
}

impl<S: HapticSink> HapticDriver<S> {
    /// Creates a driver over `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// True iff the platform exposes a vibration capability.
    pub fn is_supported(&self) -> bool {
        self.sink.is_supported()
    }

    /// Plays a pattern. Returns false when unsupported or refused.
    pub fn play(&mut self, pattern: &HapticPattern) -> bool {
        if !self.sink.is_supported() {
            return false;
        }
        debug!("playing haptic pattern {:?}", pattern);
        self.sink.vibrate(&pattern.timings())
    }

    /// Cancels any in-progress pattern. Returns false when unsupported.
    pub fn stop(&mut self) -> bool {
        if !self.sink.is_supported() {
            return false;
        }
        self.sink.cancel()
    }

    /// Plays the fixed pattern for a feedback category.
    pub fn feedback(&mut self, kind: FeedbackKind) -> bool {
        self.play(&kind.pattern())
    }

    /// Plays the feedback mapped to an application event.
    pub fn on_event(&mut self, event: AppEvent) -> bool {
        self.feedback(event.feedback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Sink that records every call for inspection.
    struct RecordingSink {
        supported: bool,
        played: Rc<RefCell<Vec<Vec<u64>>>>,
        cancels: Rc<RefCell<usize>>,
    }

    impl RecordingSink {
        fn new(supported: bool) -> (Self, Rc<RefCell<Vec<Vec<u64>>>>, Rc<RefCell<usize>>) {
            let played = Rc::new(RefCell::new(Vec::new()));
            let cancels = Rc::new(RefCell::new(0));
            (
                Self {
                    supported,
                    played: Rc::clone(&played),
                    cancels: Rc::clone(&cancels),
                },
                played,
                cancels,
            )
        }
    }

    impl HapticSink for RecordingSink {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn vibrate(&mut self, timings: &[u64]) -> bool {
            self.played.borrow_mut().push(timings.to_vec());
            true
        }

        fn cancel(&mut self) -> bool {
            *self.cancels.borrow_mut() += 1;
            true
        }
    }

    #[test]
    fn test_fixed_patterns() {
        assert_eq!(FeedbackKind::Success.pattern().timings(), vec![80, 40, 80]);
        assert_eq!(FeedbackKind::Error.pattern().timings(), vec![150, 60, 150]);
        assert_eq!(
            FeedbackKind::Warning.pattern().timings(),
            vec![60, 40, 60, 40, 60]
        );
        assert_eq!(
            FeedbackKind::default().pattern(),
            HapticPattern::Once(150)
        );
    }

    #[test]
    fn test_pattern_total_length() {
        assert_eq!(HapticPattern::Once(200).total_ms(), 200);
        assert_eq!(HapticPattern::Sequence(vec![80, 40, 80]).total_ms(), 200);
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(AppEvent::RoomFound.feedback(), FeedbackKind::Success);
        assert_eq!(AppEvent::NavigationError.feedback(), FeedbackKind::Error);
        assert_eq!(
            AppEvent::RecenterMap.feedback(),
            FeedbackKind::Once { duration_ms: 80 }
        );
        assert_eq!(
            AppEvent::QuickTiltDetected.feedback(),
            FeedbackKind::Warning
        );
    }

    #[test]
    fn test_driver_plays_event_feedback() {
        let (sink, played, _cancels) = RecordingSink::new(true);
        let mut driver = HapticDriver::new(sink);

        assert!(driver.on_event(AppEvent::RoomFound));
        assert!(driver.on_event(AppEvent::QuickTiltDetected));
        assert!(driver.on_event(AppEvent::RecenterMap));

        let played = played.borrow();
        assert_eq!(played[0], vec![80, 40, 80]);
        assert_eq!(played[1], vec![60, 40, 60, 40, 60]);
        assert_eq!(played[2], vec![80]);
    }

    #[test]
    fn test_unsupported_sink_is_inert() {
        let (sink, played, cancels) = RecordingSink::new(false);
        let mut driver = HapticDriver::new(sink);

        assert!(!driver.is_supported());
        assert!(!driver.play(&HapticPattern::Once(100)));
        assert!(!driver.feedback(FeedbackKind::Error));
        assert!(!driver.stop());
        assert!(played.borrow().is_empty());
        assert_eq!(*cancels.borrow(), 0);
    }

    #[test]
    fn test_stop_cancels() {
        let (sink, _played, cancels) = RecordingSink::new(true);
        let mut driver = HapticDriver::new(sink);

        driver.feedback(FeedbackKind::Custom(vec![500, 100, 500]));
        assert!(driver.stop());
        assert_eq!(*cancels.borrow(), 1);
    }
}
