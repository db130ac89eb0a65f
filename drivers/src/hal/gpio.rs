//! General-purpose pins.
//!
//! The firmware uses a single output pin for the status LED, but the
//! controller interface covers what the BCM2835 block can do with any pin.

use core::fmt;
use core::ops::Not;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinLevel {
    Low,
    High,
}

impl Not for PinLevel {
    type Output = PinLevel;

    fn not(self) -> PinLevel {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }
}

/// What drives a pin. The alternate functions keep the SoC's numbering.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Function {
    Input,
    Output,
    Alt0,
    Alt1,
    Alt2,
    Alt3,
    Alt4,
    Alt5,
}

/// Internal resistor on an input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PullMode {
    None,
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// No such pin on this controller.
    InvalidPin,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::InvalidPin => f.write_str("invalid GPIO pin"),
        }
    }
}

/// A bank of pins addressed by `Pin`.
pub trait GpioController {
    type Pin: Copy;
    type Error: fmt::Debug;

    fn set_function(&mut self, pin: Self::Pin, function: Function) -> Result<(), Self::Error>;

    fn set_pull(&mut self, pin: Self::Pin, pull: PullMode) -> Result<(), Self::Error>;

    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error>;

    /// Level currently seen on the pin, whatever its function.
    fn read(&self, pin: Self::Pin) -> Result<PinLevel, Self::Error>;

    /// Drive the opposite of the level read back from the pin.
    fn toggle(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        match !self.read(pin)? {
            PinLevel::High => self.set_high(pin),
            PinLevel::Low => self.set_low(pin),
        }
    }
}
