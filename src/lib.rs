//! Quick-Tilt Gesture Sensing Library
//!
//! Detects deliberate quick-tilt gestures in a mobile device's orientation
//! stream and maps application events to haptic feedback patterns.
//!
//! # Design Philosophy
//!
//! - **Pure detection core**: The state machine in [`detector`] consumes
//!   samples and produces outcomes; it owns no subscriptions and calls no
//!   callbacks, so every edge case is unit-testable.
//! - **Degrade, never raise**: Unsupported platforms, denied permissions,
//!   failed subscriptions, and panicking listeners all collapse to "feature
//!   inactive". Nothing in this crate is a fatal error.
//! - **Bounded memory**: Detection state is one baseline snapshot and one
//!   cooldown deadline; processing is O(1) per sample with no buffers.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use quicktilt::{OrientationMonitor, OrientationSample, TiltEvent};
//! use quicktilt::sensor::{OrientationSource, SensorError};
//!
//! struct AlwaysOnSource;
//!
//! impl OrientationSource for AlwaysOnSource {
//!     fn is_supported(&self) -> bool { true }
//!     fn subscribe(&mut self) -> Result<(), SensorError> { Ok(()) }
//!     fn unsubscribe(&mut self) {}
//! }
//!
//! let mut monitor = OrientationMonitor::new(AlwaysOnSource);
//! monitor.on_quick_tilt(Rc::new(|event: &TiltEvent| {
//!     println!("tilt of {:.0} degrees", event.peak_diff());
//! }));
//!
//! assert!(monitor.enable().is_enabled());
//! monitor.handle_sample(&OrientationSample::new(0, 0.0, 0.0));
//! monitor.handle_sample(&OrientationSample::new(100, 30.0, 0.0));
//! ```

pub mod detector;
pub mod haptics;
pub mod monitor;
pub mod sensor;
pub mod types;

#[cfg(test)]
mod integration_tests;

// Re-export commonly used types
pub use detector::{ConfigUpdate, Detection, DiscardReason, QuickTiltConfig, QuickTiltDetector};
pub use haptics::{AppEvent, FeedbackKind, HapticDriver, HapticPattern, HapticSink};
pub use monitor::{EnableOutcome, OrientationMonitor, SampleListener, TiltListener};
pub use sensor::{NullSource, OrientationSource, PermissionDecision, SensorError};
pub use types::{OrientationSample, SampleUpdate, TiltEvent};
