//! Quick-Tilt Detection state machine.
//!
//! Distinguishes a fast intentional tilt from slow ambient drift by diffing
//! each orientation sample against a sliding baseline: a gesture fires when a
//! large angular change lands within a short time window. The decision is a
//! velocity threshold expressed without division, so a zero-millisecond gap
//! between samples is safe.
//!
//! After a fire the detector enters a cooldown: every sample inside the
//! window is discarded outright, baseline included, so the settling motion
//! that follows a tilt cannot re-trigger.
//!
//! The detector is pure state: it owns no subscriptions and dispatches no
//! callbacks. Feeding it samples and routing the resulting notifications is
//! the monitor's job (see `monitor.rs`), which keeps this module trivially
//! testable.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::{OrientationSample, SampleUpdate, TiltEvent};

/// Parameters for quick-tilt detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickTiltConfig {
    /// Angular change (degrees) a sample must exceed on either tilt axis.
    /// Strictly greater-than; must be positive.
    pub angle_threshold_deg: f32,

    /// Window (milliseconds) the change must land within. Strictly
    /// less-than; must be positive.
    pub time_threshold_ms: u64,

    /// Silence window (milliseconds) after a fired gesture during which all
    /// samples are discarded.
    pub cooldown_ms: u64,
}

impl Default for QuickTiltConfig {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 25.0,
            time_threshold_ms: 250,
            cooldown_ms: 500,
        }
    }
}

/// A partial, validated update to [`QuickTiltConfig`].
///
/// Each field is applied independently; out-of-domain values (non-finite or
/// non-positive where the config requires positive) are skipped per-field
/// rather than failing the whole update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigUpdate {
    /// New angle threshold in degrees, if provided.
    pub angle_threshold_deg: Option<f32>,
    /// New time window in milliseconds, if provided.
    pub time_threshold_ms: Option<u64>,
    /// New cooldown in milliseconds, if provided.
    pub cooldown_ms: Option<u64>,
}

impl ConfigUpdate {
    /// Applies every valid field of this update onto `config`.
    /// Unspecified or invalid fields retain the prior value.
    pub fn apply_to(&self, config: &mut QuickTiltConfig) {
        if let Some(angle) = self.angle_threshold_deg {
            if angle.is_finite() && angle > 0.0 {
                config.angle_threshold_deg = angle;
            }
        }
        if let Some(window) = self.time_threshold_ms {
            if window > 0 {
                config.time_threshold_ms = window;
            }
        }
        if let Some(cooldown) = self.cooldown_ms {
            config.cooldown_ms = cooldown;
        }
    }
}

/// Why a sample was dropped without touching detector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// One or both tilt axes were absent from the sensor frame.
    MissingAxes,
    /// The sample arrived inside the post-fire silence window.
    Cooldown,
}

/// Outcome of processing one orientation sample.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Sample dropped; no state change, no notification.
    Discarded(DiscardReason),
    /// First valid sample after reset; it seeded the baseline and can
    /// never itself fire.
    Seeded,
    /// Sample measured against the baseline without firing.
    Measured(SampleUpdate),
    /// Quick tilt fired. Carries both the per-sample update and the gesture
    /// event so the caller can notify both listener sets.
    Fired(SampleUpdate, TiltEvent),
}

impl Detection {
    /// True if this outcome is a fired gesture.
    pub fn fired(&self) -> bool {
        matches!(self, Detection::Fired(_, _))
    }

    /// The per-sample update, if this sample reached the measurement stage.
    pub fn update(&self) -> Option<&SampleUpdate> {
        match self {
            Detection::Measured(update) | Detection::Fired(update, _) => Some(update),
            _ => None,
        }
    }
}

/// The baseline snapshot used as the reference point for delta computation.
///
/// Held as a single value so the three fields are set and cleared together;
/// there is no state where only part of the baseline exists.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    beta: f32,
    gamma: f32,
    timestamp_ms: u64,
}

/// Quick-tilt detector.
///
/// States: Unseeded (no baseline), Seeded (baseline held, refreshed on every
/// accepted sample), and a cooldown overlay that silently drops samples
/// until it expires. `reset` returns to Unseeded; config survives resets.
pub struct QuickTiltDetector {
    config: QuickTiltConfig,
    baseline: Option<Baseline>,
    cooldown_until_ms: u64,
    fired_count: u64,
}

impl QuickTiltDetector {
    /// Creates a detector with the given configuration.
    pub fn new(config: QuickTiltConfig) -> Self {
        Self {
            config,
            baseline: None,
            cooldown_until_ms: 0,
            fired_count: 0,
        }
    }

    /// Creates a detector with default thresholds (25 deg / 250 ms / 500 ms).
    pub fn default_detector() -> Self {
        Self::new(QuickTiltConfig::default())
    }

    /// Processes one sample and returns what, if anything, it produced.
    pub fn process(&mut self, sample: &OrientationSample) -> Detection {
        let now = sample.timestamp_ms;

        // Incomplete frames would corrupt the delta computation.
        let (beta, gamma) = match (sample.beta, sample.gamma) {
            (Some(beta), Some(gamma)) => (beta, gamma),
            _ => return Detection::Discarded(DiscardReason::MissingAxes),
        };

        // Full silence window: the settling motion after a fire must not
        // re-trigger, so the baseline is not updated either.
        if now < self.cooldown_until_ms {
            return Detection::Discarded(DiscardReason::Cooldown);
        }

        let base = match self.baseline {
            Some(base) => base,
            None => {
                // Nothing to diff against; the first valid sample only seeds.
                self.baseline = Some(Baseline {
                    beta,
                    gamma,
                    timestamp_ms: now,
                });
                return Detection::Seeded;
            }
        };

        // Out-of-order delivery clamps to zero rather than underflowing.
        let dt_ms = now.saturating_sub(base.timestamp_ms);
        let diff_beta = (beta - base.beta).abs();
        let diff_gamma = (gamma - base.gamma).abs();

        let update = SampleUpdate {
            alpha: sample.alpha,
            beta,
            gamma,
            dt_ms,
            diff_beta,
            diff_gamma,
        };

        // Sliding-window differentiation: the baseline always advances to
        // the current sample, fired or not.
        self.baseline = Some(Baseline {
            beta,
            gamma,
            timestamp_ms: now,
        });

        let quick = dt_ms < self.config.time_threshold_ms
            && (diff_beta > self.config.angle_threshold_deg
                || diff_gamma > self.config.angle_threshold_deg);

        if quick {
            self.cooldown_until_ms = now + self.config.cooldown_ms;
            self.fired_count += 1;
            debug!(
                "quick tilt fired: diff_beta={:.1} diff_gamma={:.1} dt={}ms",
                diff_beta, diff_gamma, dt_ms
            );
            Detection::Fired(
                update,
                TiltEvent {
                    diff_beta,
                    diff_gamma,
                },
            )
        } else {
            Detection::Measured(update)
        }
    }

    /// Applies a validated partial configuration update.
    pub fn configure(&mut self, update: &ConfigUpdate) {
        update.apply_to(&mut self.config);
    }

    /// Replaces the configuration wholesale.
    pub fn set_config(&mut self, config: QuickTiltConfig) {
        self.config = config;
    }

    /// Current configuration.
    pub fn config(&self) -> &QuickTiltConfig {
        &self.config
    }

    /// True once a baseline has been recorded.
    pub fn is_seeded(&self) -> bool {
        self.baseline.is_some()
    }

    /// True if a sample arriving at `now_ms` would be silenced.
    pub fn in_cooldown(&self, now_ms: u64) -> bool {
        now_ms < self.cooldown_until_ms
    }

    /// Number of gestures fired since creation or the last reset.
    pub fn fired_count(&self) -> u64 {
        self.fired_count
    }

    /// Clears baseline, cooldown, and counters. Config is kept.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.cooldown_until_ms = 0;
        self.fired_count = 0;
    }
}

impl Default for QuickTiltDetector {
    fn default() -> Self {
        Self::default_detector()
    }
}
