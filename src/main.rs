//! Quick-Tilt Gesture Sensing
//!
//! Demo binary: replays a scripted orientation stream through the monitor
//! and plays the mapped haptic feedback on the console. For library use,
//! see lib.rs.

use std::cell::RefCell;
use std::rc::Rc;

use quicktilt::sensor::{OrientationSource, SensorError};
use quicktilt::{
    AppEvent, HapticDriver, HapticSink, OrientationMonitor, OrientationSample, SampleUpdate,
    TiltEvent,
};

/// Source standing in for a platform without a permission gate.
struct ScriptedSource;

impl OrientationSource for ScriptedSource {
    fn is_supported(&self) -> bool {
        true
    }

    fn subscribe(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn unsubscribe(&mut self) {}
}

/// Actuator that prints instead of vibrating.
struct ConsoleHaptics;

impl HapticSink for ConsoleHaptics {
    fn is_supported(&self) -> bool {
        true
    }

    fn vibrate(&mut self, timings: &[u64]) -> bool {
        println!("  [haptics] vibrate {:?}", timings);
        true
    }

    fn cancel(&mut self) -> bool {
        println!("  [haptics] cancel");
        true
    }
}

fn main() {
    env_logger::init();

    println!("Quick-Tilt Gesture Sensing v0.1.0");

    let mut monitor = OrientationMonitor::new(ScriptedSource);
    let haptics = Rc::new(RefCell::new(HapticDriver::new(ConsoleHaptics)));

    monitor.on_sample(Rc::new(|update: &SampleUpdate| {
        println!(
            "  sample: beta={:+6.1} gamma={:+6.1} dt={:3}ms diff=({:.1}, {:.1})",
            update.beta, update.gamma, update.dt_ms, update.diff_beta, update.diff_gamma
        );
    }));

    let driver = Rc::clone(&haptics);
    monitor.on_quick_tilt(Rc::new(move |event: &TiltEvent| {
        println!("  quick tilt! peak diff {:.1} degrees", event.peak_diff());
        driver.borrow_mut().on_event(AppEvent::QuickTiltDetected);
    }));

    let outcome = monitor.enable();
    println!("enable -> {:?}", outcome);

    // A stream with ambient drift, one deliberate flick, and its settling
    // motion inside the cooldown window.
    let stream = [
        OrientationSample::new(0, 0.0, 0.0),
        OrientationSample::new(120, 1.5, -0.5),
        OrientationSample::new(240, 2.0, 0.5),
        OrientationSample::new(340, 32.0, 1.0), // the flick
        OrientationSample::new(460, 12.0, 0.5), // settling, silenced
        OrientationSample::new(580, 3.0, 0.0),  // still silenced
        OrientationSample::new(900, 2.0, 0.0),  // cooldown over
        OrientationSample::partial(1020, None, None, Some(1.0)), // incomplete frame
        OrientationSample::new(1140, 1.0, 0.5),
    ];

    for sample in &stream {
        monitor.handle_sample(sample);
    }

    println!(
        "processed {} samples, {} gesture(s) fired",
        stream.len(),
        monitor.detector().fired_count()
    );

    haptics.borrow_mut().on_event(AppEvent::RoomFound);
    monitor.disable();
}
