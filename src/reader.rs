//! Level sources.
//!
//! The engine polls the raw button level through [`LevelReader`]; `true`
//! means the button reads down. Closures work directly, and [`PinReader`]
//! adapts an `embedded-hal` input pin with either wiring polarity.

use embedded_hal::digital::InputPin;

/// Polled source of the raw button level.
///
/// Must be side-effect free with respect to debounce logic: the engine may
/// call it several times within one step when the host runs late.
pub trait LevelReader {
    /// Current raw level, `true` = down.
    fn level(&mut self) -> bool;
}

impl<F> LevelReader for F
where
    F: FnMut() -> bool,
{
    fn level(&mut self) -> bool {
        self()
    }
}

/// Electrical polarity of the switch wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pressing pulls the pin low (pull-up wiring).
    ActiveLow,
    /// Pressing drives the pin high (pull-down wiring).
    ActiveHigh,
}

/// [`LevelReader`] over an `embedded-hal` input pin.
///
/// A pin read fault reports the button as up.
pub struct PinReader<P> {
    pin: P,
    polarity: Polarity,
}

impl<P: InputPin> PinReader<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self { pin, polarity }
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> LevelReader for PinReader<P> {
    fn level(&mut self) -> bool {
        match self.polarity {
            Polarity::ActiveLow => self.pin.is_low().unwrap_or(false),
            Polarity::ActiveHigh => self.pin.is_high().unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{Error, ErrorKind, ErrorType};

    struct FakePin {
        high: bool,
        broken: bool,
    }

    #[derive(Debug)]
    struct FakeError;

    impl Error for FakeError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl ErrorType for FakePin {
        type Error = FakeError;
    }

    impl InputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            if self.broken {
                return Err(FakeError);
            }
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[test]
    fn active_low_maps_low_to_down() {
        let mut reader = PinReader::new(
            FakePin {
                high: false,
                broken: false,
            },
            Polarity::ActiveLow,
        );
        assert!(reader.level());

        let mut reader = PinReader::new(
            FakePin {
                high: true,
                broken: false,
            },
            Polarity::ActiveLow,
        );
        assert!(!reader.level());
    }

    #[test]
    fn active_high_maps_high_to_down() {
        let mut reader = PinReader::new(
            FakePin {
                high: true,
                broken: false,
            },
            Polarity::ActiveHigh,
        );
        assert!(reader.level());
    }

    #[test]
    fn read_fault_reports_up() {
        let mut reader = PinReader::new(
            FakePin {
                high: true,
                broken: true,
            },
            Polarity::ActiveLow,
        );
        assert!(!reader.level());
    }

    #[test]
    fn closures_are_level_readers() {
        let mut level = false;
        let mut reader = || {
            level = !level;
            level
        };
        assert!(LevelReader::level(&mut reader));
        assert!(!LevelReader::level(&mut reader));
    }
}
