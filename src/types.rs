//! Core data types for quick-tilt sensing.
//!
//! This module defines the payload types that cross the crate's boundaries:
//! raw orientation samples coming in from the platform sensor, and the
//! per-sample / per-gesture notifications going out to listeners.
//!
//! Design principle: Types should make intent obvious. If a concept exists,
//! it gets a type. Never pass raw tuples or untyped collections across
//! boundaries.

use serde::{Deserialize, Serialize};

/// A single raw orientation sensor reading.
///
/// This is the minimal input contract: three Euler angles in degrees, each
/// nullable (the sensor occasionally emits incomplete frames), and a
/// monotonic arrival timestamp. Samples are transient and never persisted.
///
/// Design note: We use f32 for on-device execution to save memory and
/// battery. Degree-level precision is all gesture detection needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationSample {
    /// Compass heading component in degrees, if the platform reports one.
    pub alpha: Option<f32>,

    /// Front-to-back tilt in degrees. Absent in incomplete frames.
    pub beta: Option<f32>,

    /// Left-to-right tilt in degrees. Absent in incomplete frames.
    pub gamma: Option<f32>,

    /// Monotonic arrival timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl OrientationSample {
    /// Creates a complete sample with both tilt axes present and no heading.
    pub fn new(timestamp_ms: u64, beta: f32, gamma: f32) -> Self {
        Self {
            alpha: None,
            beta: Some(beta),
            gamma: Some(gamma),
            timestamp_ms,
        }
    }

    /// Creates a sample with whatever fields the sensor delivered.
    pub fn partial(
        timestamp_ms: u64,
        alpha: Option<f32>,
        beta: Option<f32>,
        gamma: Option<f32>,
    ) -> Self {
        Self {
            alpha,
            beta,
            gamma,
            timestamp_ms,
        }
    }

    /// True if both tilt axes are present and the sample can be diffed.
    pub fn has_tilt_axes(&self) -> bool {
        self.beta.is_some() && self.gamma.is_some()
    }
}

/// Notification payload delivered to every-sample listeners.
///
/// Carries the measured angles together with the deltas against the current
/// baseline, so listeners can observe the raw stream without re-deriving
/// detector state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleUpdate {
    /// Compass heading component, passed through unchanged.
    pub alpha: Option<f32>,
    /// Front-to-back tilt in degrees.
    pub beta: f32,
    /// Left-to-right tilt in degrees.
    pub gamma: f32,
    /// Time since the baseline sample in milliseconds (clamped to zero).
    pub dt_ms: u64,
    /// Absolute beta change against the baseline, in degrees.
    pub diff_beta: f32,
    /// Absolute gamma change against the baseline, in degrees.
    pub diff_gamma: f32,
}

/// Notification payload delivered to quick-tilt listeners when a gesture
/// fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltEvent {
    /// Absolute beta change that contributed to the fire decision, in degrees.
    pub diff_beta: f32,
    /// Absolute gamma change that contributed to the fire decision, in degrees.
    pub diff_gamma: f32,
}

impl TiltEvent {
    /// The larger of the two axis deltas, i.e. the magnitude of the gesture.
    pub fn peak_diff(&self) -> f32 {
        self.diff_beta.max(self.diff_gamma)
    }
}
