//! Integration tests for the complete quick-tilt sensing flow.
//! Exercises realistic orientation streams end to end: monitor lifecycle,
//! detection, listener dispatch, and haptic feedback wiring.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::detector::ConfigUpdate;
use crate::haptics::{AppEvent, HapticDriver, HapticSink};
use crate::monitor::{EnableOutcome, OrientationMonitor, SampleListener, TiltListener};
use crate::sensor::{OrientationSource, PermissionDecision, SensorError};
use crate::types::{OrientationSample, SampleUpdate, TiltEvent};

/// Always-supported source without a permission gate.
struct OpenSource;

impl OrientationSource for OpenSource {
    fn is_supported(&self) -> bool {
        true
    }

    fn subscribe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn unsubscribe(&mut self) {}
}

/// Permission-gated source whose prompt resolves after a fixed number of
/// polls.
struct GatedSource {
    polls_until_grant: u32,
}

impl OrientationSource for GatedSource {
    fn is_supported(&self) -> bool {
        true
    }

    fn requires_permission(&self) -> bool {
        true
    }

    fn request_permission(&mut self) -> Result<PermissionDecision, SensorError> {
        if self.polls_until_grant == 0 {
            Ok(PermissionDecision::Granted)
        } else {
            self.polls_until_grant -= 1;
            Ok(PermissionDecision::Pending)
        }
    }

    fn subscribe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn unsubscribe(&mut self) {}
}

/// Sink recording the timing lists it was asked to play.
struct RecordingSink {
    played: Rc<RefCell<Vec<Vec<u64>>>>,
}

impl HapticSink for RecordingSink {
    fn is_supported(&self) -> bool {
        true
    }

    fn vibrate(&mut self, timings: &[u64]) -> bool {
        self.played.borrow_mut().push(timings.to_vec());
        true
    }

    fn cancel(&mut self) -> bool {
        true
    }
}

fn sample(timestamp_ms: u64, beta: f32, gamma: f32) -> OrientationSample {
    OrientationSample::new(timestamp_ms, beta, gamma)
}

/// Helper: ambient drift profile, small angle steps at a lazy cadence.
fn drift_profile(start_ms: u64, steps: u64, step_ms: u64) -> Vec<OrientationSample> {
    (0..steps)
        .map(|i| {
            sample(
                start_ms + i * step_ms,
                (i as f32 * 0.7).sin() * 4.0,
                (i as f32 * 0.5).cos() * 3.0,
            )
        })
        .collect()
}

#[test]
fn test_reference_scenario() {
    // enable -> seed -> fire -> silenced -> post-cooldown measurement.
    let mut monitor = OrientationMonitor::new(OpenSource);

    let updates: Rc<RefCell<Vec<SampleUpdate>>> = Rc::new(RefCell::new(Vec::new()));
    let tilts: Rc<RefCell<Vec<TiltEvent>>> = Rc::new(RefCell::new(Vec::new()));

    let seen = Rc::clone(&updates);
    let sample_listener: SampleListener = Rc::new(move |update: &SampleUpdate| {
        seen.borrow_mut().push(*update);
    });
    let fired = Rc::clone(&tilts);
    let tilt_listener: TiltListener = Rc::new(move |event: &TiltEvent| {
        fired.borrow_mut().push(*event);
    });
    monitor.on_sample(sample_listener);
    monitor.on_quick_tilt(tilt_listener);

    assert_eq!(monitor.enable(), EnableOutcome::Enabled);

    monitor.handle_sample(&sample(0, 0.0, 0.0)); // seeds, no fire
    monitor.handle_sample(&sample(100, 30.0, 0.0)); // fires, cooldown until 600
    monitor.handle_sample(&sample(300, 0.0, 0.0)); // inside cooldown, discarded
    monitor.handle_sample(&sample(650, 0.0, 0.0)); // diff 30 but dt 550: no fire

    let tilts = tilts.borrow();
    assert_eq!(tilts.len(), 1);
    assert_eq!(tilts[0].diff_beta, 30.0);
    assert_eq!(tilts[0].diff_gamma, 0.0);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2, "seed and cooldown samples notify no one");
    assert_eq!(updates[0].dt_ms, 100);
    assert_eq!(updates[1].dt_ms, 550);
    assert_eq!(updates[1].diff_beta, 30.0);
}

#[test]
fn test_drift_never_fires_flick_always_does() {
    let mut monitor = OrientationMonitor::new(OpenSource);
    let tilt_count = Rc::new(Cell::new(0));
    let fired = Rc::clone(&tilt_count);
    monitor.on_quick_tilt(Rc::new(move |_: &TiltEvent| {
        fired.set(fired.get() + 1);
    }));

    monitor.enable();

    // Two seconds of ambient wobble.
    for s in drift_profile(0, 10, 200) {
        monitor.handle_sample(&s);
    }
    assert_eq!(tilt_count.get(), 0, "ambient drift must not trigger");

    // One deliberate flick 80ms after the last drift sample.
    let last_ms = 9 * 200;
    monitor.handle_sample(&sample(last_ms + 80, 45.0, 0.0));
    assert_eq!(tilt_count.get(), 1);

    // The settling motion lands in the cooldown and stays silent.
    monitor.handle_sample(&sample(last_ms + 200, 5.0, 0.0));
    assert_eq!(tilt_count.get(), 1);
}

#[test]
fn test_gesture_drives_haptic_feedback() {
    // The application wiring: quick-tilt listener plays the warning pattern,
    // even when another listener is broken.
    let played = Rc::new(RefCell::new(Vec::new()));
    let driver = Rc::new(RefCell::new(HapticDriver::new(RecordingSink {
        played: Rc::clone(&played),
    })));

    let mut monitor = OrientationMonitor::new(OpenSource);
    monitor.on_sample(Rc::new(|_: &SampleUpdate| {
        panic!("buggy listener");
    }));
    let haptics = Rc::clone(&driver);
    monitor.on_quick_tilt(Rc::new(move |_: &TiltEvent| {
        haptics.borrow_mut().on_event(AppEvent::QuickTiltDetected);
    }));

    monitor.enable();
    monitor.handle_sample(&sample(0, 0.0, 0.0));
    monitor.handle_sample(&sample(100, 0.0, 40.0));

    assert_eq!(*played.borrow(), vec![vec![60, 40, 60, 40, 60]]);

    // The rest of the event vocabulary goes straight through the driver.
    driver.borrow_mut().on_event(AppEvent::RoomFound);
    driver.borrow_mut().on_event(AppEvent::NavigationError);
    driver.borrow_mut().on_event(AppEvent::RecenterMap);
    let played = played.borrow();
    assert_eq!(played[1], vec![80, 40, 80]);
    assert_eq!(played[2], vec![150, 60, 150]);
    assert_eq!(played[3], vec![80]);
}

#[test]
fn test_reconfigure_mid_session() {
    let mut monitor = OrientationMonitor::new(OpenSource);
    let tilt_count = Rc::new(Cell::new(0));
    let fired = Rc::clone(&tilt_count);
    monitor.on_quick_tilt(Rc::new(move |_: &TiltEvent| {
        fired.set(fired.get() + 1);
    }));

    monitor.enable();
    monitor.handle_sample(&sample(0, 0.0, 0.0));
    monitor.handle_sample(&sample(100, 15.0, 0.0)); // below default 25 degrees
    assert_eq!(tilt_count.get(), 0);

    // Drop the threshold via the JSON the app layer ships.
    let update: ConfigUpdate = serde_json::from_str(r#"{"angleThresholdDeg": 10.0}"#)
        .expect("well-formed update");
    monitor.configure(&update);

    monitor.handle_sample(&sample(200, 30.0, 0.0)); // 15 degree step now fires
    assert_eq!(tilt_count.get(), 1);
}

#[test]
fn test_lifecycle_cycle_keeps_config_drops_state() {
    let mut monitor = OrientationMonitor::new(OpenSource);
    monitor.configure(&ConfigUpdate {
        angle_threshold_deg: Some(10.0),
        ..ConfigUpdate::default()
    });

    monitor.enable();
    monitor.handle_sample(&sample(0, 0.0, 0.0));
    monitor.handle_sample(&sample(100, 20.0, 0.0));
    assert_eq!(monitor.detector().fired_count(), 1);

    monitor.disable();
    monitor.enable();

    // Config survived, state did not.
    assert_eq!(monitor.config().angle_threshold_deg, 10.0);
    assert!(!monitor.detector().is_seeded());

    // First sample after re-enable seeds even with a huge value.
    monitor.handle_sample(&sample(200, 90.0, 0.0));
    assert_eq!(monitor.detector().fired_count(), 0);
}

#[test]
fn test_permission_gated_session() {
    let mut monitor = OrientationMonitor::new(GatedSource {
        polls_until_grant: 1,
    });
    let tilt_count = Rc::new(Cell::new(0));
    let fired = Rc::clone(&tilt_count);
    monitor.on_quick_tilt(Rc::new(move |_: &TiltEvent| {
        fired.set(fired.get() + 1);
    }));

    assert_eq!(monitor.enable(), EnableOutcome::PermissionPending);

    // Samples arriving while the prompt is open are ignored.
    monitor.handle_sample(&sample(0, 0.0, 0.0));
    monitor.handle_sample(&sample(50, 40.0, 0.0));
    assert_eq!(tilt_count.get(), 0);

    assert_eq!(monitor.enable(), EnableOutcome::Enabled);
    monitor.handle_sample(&sample(100, 0.0, 0.0));
    monitor.handle_sample(&sample(180, 40.0, 0.0));
    assert_eq!(tilt_count.get(), 1);
}
