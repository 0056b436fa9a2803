//! Platform orientation sensor boundary.
//!
//! The monitor never talks to a concrete platform API; it goes through the
//! [`OrientationSource`] port so the same lifecycle logic runs against a
//! browser-style event source, a native IMU bridge, or a scripted test
//! double.
//!
//! Some platforms gate the sensor behind an explicit permission grant. The
//! prompt is modelled as a pollable decision: a source may answer
//! [`PermissionDecision::Pending`] while the prompt is on screen, and the
//! caller re-requests once it resolves.

use thiserror::Error;

/// Outcome of a permission request at the platform boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// The user granted sensor access.
    Granted,
    /// The user denied sensor access.
    Denied,
    /// The prompt is showing; no decision yet.
    Pending,
}

/// Failures at the sensor boundary.
///
/// These never escalate: the monitor maps every variant to a degraded
/// "feature inactive" outcome.
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("permission request failed: {0}")]
    PermissionRequest(String),

    #[error("subscription failed: {0}")]
    Subscribe(String),
}

/// Access to a platform orientation event stream.
///
/// Implementations deliver samples by calling the monitor's `handle_sample`
/// from their event context; this trait only covers capability, permission,
/// and subscription lifecycle.
pub trait OrientationSource {
    /// True iff the platform exposes an orientation-event capability.
    /// Pure query, no side effect.
    fn is_supported(&self) -> bool;

    /// Whether the platform requires an explicit grant before subscribing.
    /// Distinct from `is_supported`; most platforms do not.
    fn requires_permission(&self) -> bool {
        false
    }

    /// Requests (or re-polls) the permission grant.
    fn request_permission(&mut self) -> Result<PermissionDecision, SensorError> {
        Ok(PermissionDecision::Granted)
    }

    /// Starts delivering orientation events.
    fn subscribe(&mut self) -> Result<(), SensorError>;

    /// Stops delivering orientation events. Must be idempotent.
    fn unsubscribe(&mut self);
}

/// The degenerate source for platforms without an orientation capability.
///
/// Everything built on top degrades to inactive: `is_supported` is false and
/// subscribing fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSource;

impl OrientationSource for NullSource {
    fn is_supported(&self) -> bool {
        false
    }

    fn subscribe(&mut self) -> Result<(), SensorError> {
        Err(SensorError::Subscribe(
            "no orientation capability on this platform".to_string(),
        ))
    }

    fn unsubscribe(&mut self) {}
}
