//! Per-button debounce and gesture state machine.
//!
//! Each step the engine works out how many sampling intervals elapsed since
//! the previous step, shifts that many fresh samples into the waveform
//! (re-reading the level once per skipped interval), classifies the result
//! and updates its bookkeeping:
//!
//! | Classification | Condition                              | Event      |
//! |----------------|----------------------------------------|------------|
//! | Pressed        | `n` stable down samples, was up        | `Pressed`  |
//! | Released       | clean up run after a held press        | `Released` |
//! | Down           | still held; repeat timing may fire     | `Holding`  |
//! | Up             | stable up                              | none       |
//! | Debouncing     | waveform neither stable nor an edge    | none       |
//!
//! The logical `pressed` latch keeps a steady-down waveform from emitting
//! duplicate press events. The pool layer pairs every `Released` with a
//! `Click` carrying the running count; hosts embedding a bare engine read
//! [`clicks`](ButtonEngine::clicks) after a release instead.

use crate::error::ButtonError;
use crate::event::ButtonEvent;
use crate::param::ButtonParam;
use crate::reader::LevelReader;
use crate::waveform::Waveform;

/// Classification of the waveform after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pressed,
    Released,
    Down,
    Up,
    Debouncing,
}

/// Freestanding button state machine.
///
/// [`ButtonPool`](crate::ButtonPool) wraps one of these per slot; hosts with
/// a single button can embed the engine directly and skip the pool.
#[derive(Debug, Clone)]
pub struct ButtonEngine {
    waveform: Waveform,
    param: ButtonParam,
    time_pressed: u32,
    time_released: u32,
    /// 0 sentinel: no repeat fired yet within the current press.
    time_repeat: u32,
    /// Time of the previous effective step.
    timestamp: u32,
    clicks: u8,
    pressed: bool,
}

impl Default for ButtonEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonEngine {
    /// Engine with the default timing block.
    pub fn new() -> Self {
        Self {
            waveform: Waveform::default(),
            param: ButtonParam::default(),
            time_pressed: 0,
            time_released: 0,
            time_repeat: 0,
            timestamp: 0,
            clicks: 0,
            pressed: false,
        }
    }

    /// Engine with a caller-supplied timing block.
    pub fn with_param(param: ButtonParam) -> Result<Self, ButtonError> {
        let mut engine = Self::new();
        engine.set_param(&param)?;
        Ok(engine)
    }

    /// Install a new timing block. A rejected block leaves the engine
    /// untouched.
    pub fn set_param(&mut self, param: &ButtonParam) -> Result<(), ButtonError> {
        if !param.is_valid() {
            return Err(ButtonError::IncorrectParam);
        }
        self.param = *param;
        Ok(())
    }

    /// Copy of the current timing block.
    pub fn param(&self) -> ButtonParam {
        self.param
    }

    /// Latched logical state: the most recent qualified edge was a press.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Running click count within the current click window.
    pub fn clicks(&self) -> u8 {
        self.clicks
    }

    /// Whether the waveform has left the steady-up state. Hosts can sleep
    /// while every button reports not busy.
    pub fn busy(&self) -> bool {
        !self.waveform.is_up(self.param.pulse_count())
    }

    /// Advance the machine to `now_ms`, sampling the level once per elapsed
    /// sampling interval.
    ///
    /// `now_ms` must be non-decreasing across calls. Deltas are computed
    /// with wrapping arithmetic, so the host must step at least once per
    /// half of the `u32` millisecond range. A step shorter than one
    /// sampling interval leaves the machine untouched.
    ///
    /// Returns the qualified edge or repeat event, if any.
    pub fn step(&mut self, now_ms: u32, reader: &mut dyn LevelReader) -> Option<ButtonEvent> {
        let elapsed = now_ms.wrapping_sub(self.timestamp);
        let pulses = elapsed / u32::from(self.param.sampling_interval_ms);
        if pulses == 0 {
            return None;
        }

        // A late host means the level has been this way across every skipped
        // interval; sample it once per interval.
        for _ in 0..pulses {
            self.waveform.shift_in(reader.level());
        }

        let n = self.param.pulse_count();
        let mut event = None;

        let state = if self.press_qualified(n) {
            self.time_pressed = now_ms;
            self.pressed = true;
            event = Some(ButtonEvent::Pressed);
            State::Pressed
        } else if self.release_qualified(n) {
            self.time_released = now_ms;
            self.pressed = false;
            self.clicks = self.clicks.wrapping_add(1);
            self.time_repeat = 0;
            event = Some(ButtonEvent::Released);
            State::Released
        } else if self.waveform.is_down(n) {
            if self.repeat_due(now_ms) {
                event = Some(ButtonEvent::Holding);
            }
            State::Down
        } else if self.waveform.is_up(n) {
            State::Up
        } else if self.waveform.window(n) != 0 {
            State::Debouncing
        } else {
            State::Idle
        };

        if !matches!(state, State::Pressed | State::Down | State::Debouncing)
            && self.click_window_closed(now_ms)
        {
            self.clicks = 0;
        }

        self.timestamp = now_ms;
        event
    }

    // ── Internal ──────────────────────────────────────────────

    fn press_qualified(&self, n: u16) -> bool {
        !self.pressed && self.waveform.is_down(n)
    }

    fn release_qualified(&self, n: u16) -> bool {
        self.pressed && self.waveform.is_release_edge(n)
    }

    fn click_window_closed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.time_released) >= u32::from(self.param.click_window_ms)
    }

    /// Auto-repeat: an initial hesitation of `repeat_delay_ms` after the
    /// press, then one `Holding` every `repeat_rate_ms`.
    fn repeat_due(&mut self, now_ms: u32) -> bool {
        let due = if self.time_repeat != 0 {
            now_ms.wrapping_sub(self.time_repeat) >= u32::from(self.param.repeat_rate_ms)
        } else {
            now_ms.wrapping_sub(self.time_pressed) >= u32::from(self.param.repeat_delay_ms)
        };
        if due {
            self.time_repeat = now_ms;
        }
        due
    }
}
