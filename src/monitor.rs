//! Orientation Stream Monitor.
//!
//! Gates access to the platform orientation sensor behind the permission
//! handshake, manages exactly one active subscription, and routes each
//! incoming sample through the quick-tilt detector to the registered
//! listeners.
//!
//! # Lifecycle
//!
//! `enable` walks a small state machine (Disabled, PendingPermission,
//! Enabled). Subscription only ever happens in the call that observes a
//! granted permission from a non-disabled state, so repeated or overlapping
//! `enable` calls cannot create a second subscription or a second prompt.
//! `disable` is synchronous and idempotent: it unsubscribes, resets detector
//! state to unseeded, and keeps the configuration.
//!
//! # Listeners
//!
//! Two registries: every-sample listeners and quick-tilt listeners. Handles
//! are `Rc` closures compared by identity; registering the same handle twice
//! is a no-op. Dispatch iterates a snapshot and wraps each invocation in
//! `catch_unwind`, so a panicking listener is dropped for that invocation
//! only and never blocks delivery to the rest or corrupts detector state.
//! The `Rc` registries make the monitor single-threaded by construction,
//! which matches the callback-driven delivery model.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::detector::{ConfigUpdate, Detection, QuickTiltConfig, QuickTiltDetector};
use crate::sensor::{OrientationSource, PermissionDecision};
use crate::types::{OrientationSample, SampleUpdate, TiltEvent};

/// Handle for an every-sample listener.
pub type SampleListener = Rc<dyn Fn(&SampleUpdate)>;

/// Handle for a quick-tilt listener.
pub type TiltListener = Rc<dyn Fn(&TiltEvent)>;

/// Result of an `enable` call.
///
/// Every variant short of [`EnableOutcome::Enabled`] /
/// [`EnableOutcome::AlreadyEnabled`] means the feature stays inactive;
/// none of them is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    /// Subscription established by this call.
    Enabled,
    /// Monitor was already enabled; nothing changed.
    AlreadyEnabled,
    /// Platform exposes no orientation capability.
    Unsupported,
    /// Permission prompt is showing; call `enable` again once it resolves.
    PermissionPending,
    /// The user denied sensor access.
    PermissionDenied,
    /// The permission request itself failed.
    RequestFailed,
    /// The platform refused the subscription.
    SubscribeFailed,
}

impl EnableOutcome {
    /// Collapses the outcome to the "is the monitor running" view.
    pub fn is_enabled(&self) -> bool {
        matches!(self, EnableOutcome::Enabled | EnableOutcome::AlreadyEnabled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorState {
    Disabled,
    PendingPermission,
    Enabled,
}

/// Orientation stream monitor owning the detector and listener registries.
pub struct OrientationMonitor<S: OrientationSource> {
    source: S,
    state: MonitorState,
    detector: QuickTiltDetector,
    sample_listeners: Vec<SampleListener>,
    tilt_listeners: Vec<TiltListener>,
}

impl<S: OrientationSource> OrientationMonitor<S> {
    /// Creates a monitor over `source` with default detection thresholds.
    pub fn new(source: S) -> Self {
        Self::with_config(source, QuickTiltConfig::default())
    }

    /// Creates a monitor with explicit detection thresholds.
    pub fn with_config(source: S, config: QuickTiltConfig) -> Self {
        Self {
            source,
            state: MonitorState::Disabled,
            detector: QuickTiltDetector::new(config),
            sample_listeners: Vec::new(),
            tilt_listeners: Vec::new(),
        }
    }

    /// True iff the platform exposes an orientation-event capability.
    pub fn is_supported(&self) -> bool {
        self.source.is_supported()
    }

    /// True while a subscription is active.
    pub fn is_enabled(&self) -> bool {
        self.state == MonitorState::Enabled
    }

    /// Enables orientation monitoring.
    ///
    /// Idempotent: an enabled monitor reports [`EnableOutcome::AlreadyEnabled`]
    /// without touching the subscription. On permission-gated platforms the
    /// prompt may stay open across calls; each call re-polls the decision and
    /// only the one that observes a grant subscribes.
    pub fn enable(&mut self) -> EnableOutcome {
        if !self.source.is_supported() {
            return EnableOutcome::Unsupported;
        }
        if self.state == MonitorState::Enabled {
            return EnableOutcome::AlreadyEnabled;
        }

        if self.source.requires_permission() {
            // In-flight guard: the pending state is recorded before the
            // request so a disable() racing the prompt wins cleanly.
            self.state = MonitorState::PendingPermission;
            match self.source.request_permission() {
                Ok(PermissionDecision::Granted) => {}
                Ok(PermissionDecision::Pending) => {
                    debug!("orientation permission prompt pending");
                    return EnableOutcome::PermissionPending;
                }
                Ok(PermissionDecision::Denied) => {
                    info!("orientation permission denied");
                    self.state = MonitorState::Disabled;
                    return EnableOutcome::PermissionDenied;
                }
                Err(err) => {
                    warn!("orientation permission request failed: {}", err);
                    self.state = MonitorState::Disabled;
                    return EnableOutcome::RequestFailed;
                }
            }
        }

        match self.source.subscribe() {
            Ok(()) => {
                self.state = MonitorState::Enabled;
                info!("orientation monitoring enabled");
                EnableOutcome::Enabled
            }
            Err(err) => {
                warn!("orientation subscription failed: {}", err);
                self.state = MonitorState::Disabled;
                EnableOutcome::SubscribeFailed
            }
        }
    }

    /// Disables orientation monitoring. Idempotent.
    ///
    /// Unsubscribes, resets detector state (baseline and cooldown) to fully
    /// unseeded, and abandons any pending permission attempt. Configuration
    /// survives disable/enable cycles.
    pub fn disable(&mut self) {
        match self.state {
            MonitorState::Disabled => {}
            MonitorState::PendingPermission => {
                debug!("pending permission attempt abandoned");
                self.state = MonitorState::Disabled;
            }
            MonitorState::Enabled => {
                self.source.unsubscribe();
                self.detector.reset();
                self.state = MonitorState::Disabled;
                info!("orientation monitoring disabled");
            }
        }
    }

    /// Applies a validated partial configuration update.
    ///
    /// Usable whether or not the monitor is enabled; the configuration is
    /// independent of the subscription lifecycle.
    pub fn configure(&mut self, update: &ConfigUpdate) {
        self.detector.configure(update);
        debug!("detector config now {:?}", self.detector.config());
    }

    /// Current detection configuration.
    pub fn config(&self) -> &QuickTiltConfig {
        self.detector.config()
    }

    /// Read access to the detector, mainly for diagnostics.
    pub fn detector(&self) -> &QuickTiltDetector {
        &self.detector
    }

    /// The single internal sample handler.
    ///
    /// Platform glue calls this from its event-delivery context for each
    /// incoming frame. Samples arriving while the monitor is not enabled are
    /// ignored.
    pub fn handle_sample(&mut self, sample: &OrientationSample) {
        if self.state != MonitorState::Enabled {
            return;
        }

        match self.detector.process(sample) {
            Detection::Measured(update) => {
                self.notify_sample(&update);
            }
            Detection::Fired(update, event) => {
                self.notify_sample(&update);
                self.notify_tilt(&event);
            }
            Detection::Seeded | Detection::Discarded(_) => {}
        }
    }

    /// Registers an every-sample listener. Registering a handle that is
    /// already present is a no-op.
    pub fn on_sample(&mut self, listener: SampleListener) {
        if !self
            .sample_listeners
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &listener))
        {
            self.sample_listeners.push(listener);
        }
    }

    /// Unregisters an every-sample listener. Unknown handles are a no-op.
    pub fn off_sample(&mut self, listener: &SampleListener) {
        self.sample_listeners
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }

    /// Registers a quick-tilt listener. Registering a handle that is already
    /// present is a no-op.
    pub fn on_quick_tilt(&mut self, listener: TiltListener) {
        if !self
            .tilt_listeners
            .iter()
            .any(|existing| Rc::ptr_eq(existing, &listener))
        {
            self.tilt_listeners.push(listener);
        }
    }

    /// Unregisters a quick-tilt listener. Unknown handles are a no-op.
    pub fn off_quick_tilt(&mut self, listener: &TiltListener) {
        self.tilt_listeners
            .retain(|existing| !Rc::ptr_eq(existing, listener));
    }

    /// Number of registered every-sample listeners.
    pub fn sample_listener_count(&self) -> usize {
        self.sample_listeners.len()
    }

    /// Number of registered quick-tilt listeners.
    pub fn tilt_listener_count(&self) -> usize {
        self.tilt_listeners.len()
    }

    fn notify_sample(&self, update: &SampleUpdate) {
        // Snapshot: registry changes made by a listener take effect from the
        // next dispatch cycle.
        let listeners = self.sample_listeners.clone();
        for listener in &listeners {
            let delivery = catch_unwind(AssertUnwindSafe(|| listener(update)));
            if delivery.is_err() {
                warn!("sample listener panicked; dropped for this invocation");
            }
        }
    }

    fn notify_tilt(&self, event: &TiltEvent) {
        let listeners = self.tilt_listeners.clone();
        for listener in &listeners {
            let delivery = catch_unwind(AssertUnwindSafe(|| listener(event)));
            if delivery.is_err() {
                warn!("quick-tilt listener panicked; dropped for this invocation");
            }
        }
    }
}
