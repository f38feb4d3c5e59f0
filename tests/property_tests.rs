//! Property tests for the debounce state machine.
//!
//! Drives the engine and the pool over arbitrary level sequences and step
//! cadences, checking the structural invariants that must hold for every
//! possible input. Host only.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use tactile::{ButtonEngine, ButtonEvent, ButtonId, ButtonPool};

/// Arbitrary `(delta_ms, level)` step sequences. Deltas cover sub-interval
/// jitter, regular cadence, and very late hosts.
fn arb_steps() -> impl Strategy<Value = Vec<(u32, bool)>> {
    proptest::collection::vec((0u32..=400u32, any::<bool>()), 1..=200)
}

proptest! {
    /// Pressed and Released strictly alternate, starting with Pressed, and
    /// the latched state always agrees with the event stream.
    #[test]
    fn press_and_release_alternate(steps in arb_steps()) {
        let mut engine = ButtonEngine::new();
        let mut now = 0u32;
        let mut pressed = false;

        for (delta, level) in steps {
            now += delta;
            let mut reader = move || level;
            match engine.step(now, &mut reader) {
                Some(ButtonEvent::Pressed) => {
                    prop_assert!(!pressed, "duplicate press at {now}");
                    pressed = true;
                }
                Some(ButtonEvent::Released) => {
                    prop_assert!(pressed, "release without press at {now}");
                    pressed = false;
                }
                _ => {}
            }
            prop_assert_eq!(engine.is_pressed(), pressed);
        }
    }

    /// Holding never fires before the repeat delay has elapsed since the
    /// press, and consecutive repeats are spaced by at least the rate.
    #[test]
    fn holding_respects_repeat_timing(steps in arb_steps()) {
        let mut engine = ButtonEngine::new();
        let param = engine.param();
        let mut now = 0u32;
        let mut pressed_at = 0u32;
        let mut last_holding: Option<u32> = None;

        for (delta, level) in steps {
            now += delta;
            let mut reader = move || level;
            match engine.step(now, &mut reader) {
                Some(ButtonEvent::Pressed) => {
                    pressed_at = now;
                    last_holding = None;
                }
                Some(ButtonEvent::Holding) => {
                    match last_holding {
                        None => prop_assert!(
                            now - pressed_at >= u32::from(param.repeat_delay_ms),
                            "first holding too early: pressed {pressed_at}, held {now}"
                        ),
                        Some(previous) => prop_assert!(
                            now - previous >= u32::from(param.repeat_rate_ms),
                            "repeat too fast: {previous} then {now}"
                        ),
                    }
                    last_holding = Some(now);
                }
                _ => {}
            }
        }
    }

    /// A step shorter than one sampling interval changes nothing: two
    /// engines fed the same script, one with sub-interval probes injected,
    /// emit identical events.
    #[test]
    fn sub_interval_probes_change_nothing(
        script in proptest::collection::vec(any::<bool>(), 1..=100),
        jitter in 1u32..10,
    ) {
        let mut plain = ButtonEngine::new();
        let mut probed = ButtonEngine::new();
        let mut plain_events = Vec::new();
        let mut probed_events = Vec::new();

        for (i, &level) in script.iter().enumerate() {
            let now = (i as u32 + 1) * 10;
            let mut reader = move || level;

            if let Some(event) = plain.step(now, &mut reader) {
                plain_events.push((now, event));
            }

            prop_assert_eq!(probed.step(now - 10 + jitter, &mut reader), None);
            if let Some(event) = probed.step(now, &mut reader) {
                probed_events.push((now, event));
            }
        }

        prop_assert_eq!(plain_events, probed_events);
    }

    /// Pool dispatch: every Released is immediately followed by exactly one
    /// Click, click counts start at one, and no Click appears elsewhere.
    #[test]
    fn released_click_pairing_holds(steps in arb_steps()) {
        let level = Rc::new(RefCell::new(false));
        let events: Rc<RefCell<Vec<ButtonEvent>>> = Rc::new(RefCell::new(Vec::new()));

        let reader_level = level.clone();
        let mut reader = move || *reader_level.borrow();
        let sink_events = events.clone();
        let mut sink = move |_id: ButtonId, event: ButtonEvent| {
            sink_events.borrow_mut().push(event);
        };

        let mut pool = ButtonPool::new();
        let id = pool.new_button(&mut reader, Some(&mut sink)).expect("pool slot");
        pool.enable(id).expect("enable");

        let mut now = 0u32;
        for (delta, sample) in steps {
            now += delta;
            *level.borrow_mut() = sample;
            pool.step(id, now).expect("step");
        }
        drop(pool);

        let recorded = events.borrow().clone();
        let mut releases = 0u32;
        let mut index = 0usize;
        while index < recorded.len() {
            match recorded[index] {
                ButtonEvent::Released => {
                    releases += 1;
                    match recorded.get(index + 1) {
                        Some(ButtonEvent::Click(count)) => {
                            prop_assert!(*count >= 1);
                            prop_assert!(u32::from(*count) <= releases, "click count exceeds releases");
                        }
                        other => {
                            prop_assert!(false, "release not followed by click: {:?}", other);
                        }
                    }
                    index += 2;
                }
                ButtonEvent::Click(_) => {
                    prop_assert!(false, "click without preceding release");
                }
                _ => index += 1,
            }
        }
    }

    /// After a long stretch of quiet up samples the engine reports not
    /// busy with the click count reset, and a clean press/release cycle
    /// afterwards always leaves it released again.
    #[test]
    fn quiet_input_settles_and_recovers(prefix in arb_steps()) {
        let mut engine = ButtonEngine::new();
        let mut now = 0u32;

        for (delta, level) in prefix {
            now += delta;
            let mut reader = move || level;
            engine.step(now, &mut reader);
        }

        // One click window plus a full waveform of up samples.
        let mut up = || false;
        for _ in 0..60 {
            now += 10;
            engine.step(now, &mut up);
        }

        prop_assert!(!engine.busy());
        prop_assert_eq!(engine.clicks(), 0);

        // A clean cycle at nominal cadence re-synchronises the latch even
        // if a very late prefix step skipped the release sentinel.
        let mut down = || true;
        for _ in 0..8 {
            now += 10;
            engine.step(now, &mut down);
        }
        for _ in 0..8 {
            now += 10;
            engine.step(now, &mut up);
        }
        prop_assert!(!engine.is_pressed());
        prop_assert!(!engine.busy());
    }
}
