//! Button timing parameters.
//!
//! All durations are in milliseconds. A [`ButtonParam`] block is copied into
//! an instance on creation (with the defaults below) and can be replaced at
//! runtime through `set_param`; replacement is all-or-nothing and a rejected
//! block leaves the instance untouched.

use serde::{Deserialize, Serialize};

use crate::waveform::WAVEFORM_BITS;

/// Default spacing between level samples.
pub const DEFAULT_SAMPLING_INTERVAL_MS: u16 = 10;
/// Default debounce/qualify time for a press.
pub const DEFAULT_MIN_PRESS_TIME_MS: u16 = 60;
/// Default hold duration before the first `Holding` event.
pub const DEFAULT_REPEAT_DELAY_MS: u16 = 300;
/// Default spacing between subsequent `Holding` events.
pub const DEFAULT_REPEAT_RATE_MS: u16 = 200;
/// Default gap after a release that closes the click window.
pub const DEFAULT_CLICK_WINDOW_MS: u16 = 500;

// The qualify time must span more than one sampling interval.
const _: () = assert!(DEFAULT_MIN_PRESS_TIME_MS > DEFAULT_SAMPLING_INTERVAL_MS);

/// Timing block for one button instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonParam {
    /// Nominal spacing between level samples.
    pub sampling_interval_ms: u16,
    /// Debounce/qualify time; a press needs
    /// `min_press_time_ms / sampling_interval_ms` stable samples.
    pub min_press_time_ms: u16,
    /// Hold duration before the first `Holding` event.
    pub repeat_delay_ms: u16,
    /// Spacing between subsequent `Holding` events.
    pub repeat_rate_ms: u16,
    /// Gap from the last release after which the click count resets.
    pub click_window_ms: u16,
}

impl Default for ButtonParam {
    fn default() -> Self {
        Self {
            sampling_interval_ms: DEFAULT_SAMPLING_INTERVAL_MS,
            min_press_time_ms: DEFAULT_MIN_PRESS_TIME_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            repeat_rate_ms: DEFAULT_REPEAT_RATE_MS,
            click_window_ms: DEFAULT_CLICK_WINDOW_MS,
        }
    }
}

impl ButtonParam {
    /// Number of consecutive same-level samples that qualify a transition.
    pub fn pulse_count(&self) -> u16 {
        match self.sampling_interval_ms {
            // A zero interval never validates; report zero pulses instead of
            // dividing by it.
            0 => 0,
            interval => self.min_press_time_ms / interval,
        }
    }

    /// Whether this block is safe to install.
    ///
    /// All five durations must be nonzero, the qualify time must span at
    /// least one sampling interval, and the derived pulse count must leave
    /// head-room in the waveform for the release sentinel bit.
    pub fn is_valid(&self) -> bool {
        if self.sampling_interval_ms == 0
            || self.repeat_delay_ms == 0
            || self.repeat_rate_ms == 0
            || self.click_window_ms == 0
        {
            return false;
        }
        if self.min_press_time_ms < self.sampling_interval_ms {
            return false;
        }
        self.pulse_count() < WAVEFORM_BITS - 2
    }
}
