//! Fuzz target: `ButtonEngine::step`
//!
//! Decodes the input as a sequence of (delta, level) pairs and drives the
//! engine through them, asserting that it never panics and that press and
//! release events strictly alternate no matter how jittery the cadence is.
//!
//! cargo fuzz run fuzz_engine_step

#![no_main]

use libfuzzer_sys::fuzz_target;
use tactile::{ButtonEngine, ButtonEvent};

fuzz_target!(|data: &[u8]| {
    let mut engine = ButtonEngine::new();
    let mut now = 0u32;
    let mut pressed = false;

    for pair in data.chunks(2) {
        let delta = u32::from(pair[0]);
        let level = pair.get(1).is_some_and(|byte| byte & 1 == 1);
        now = now.wrapping_add(delta);

        let mut reader = move || level;
        match engine.step(now, &mut reader) {
            Some(ButtonEvent::Pressed) => {
                assert!(!pressed, "duplicate press");
                pressed = true;
            }
            Some(ButtonEvent::Released) => {
                assert!(pressed, "release without press");
                pressed = false;
            }
            _ => {}
        }
        assert_eq!(engine.is_pressed(), pressed);
    }
});
