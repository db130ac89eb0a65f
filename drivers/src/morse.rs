//! Morse-code signalling on a single LED.
//!
//! Letters and digits map to fixed dot/dash sequences (ITU). A dot lights
//! the LED for one unit, a dash for three; symbols inside a character are
//! separated by one dark unit and characters by three.

use crate::hal::delay::Delay;
use crate::hal::gpio::GpioController;

/// One element of a Morse character.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Length of the lit pulse, in units.
    pub const fn units(self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
        }
    }
}

use Symbol::{Dash, Dot};

const LETTERS: [&[Symbol]; 26] = [
    &[Dot, Dash], // a
    &[Dash, Dot, Dot, Dot], // b
    &[Dash, Dot, Dash, Dot], // c
    &[Dash, Dot, Dot], // d
    &[Dot], // e
    &[Dot, Dot, Dash, Dot], // f
    &[Dash, Dash, Dot], // g
    &[Dot, Dot, Dot, Dot], // h
    &[Dot, Dot], // i
    &[Dot, Dash, Dash, Dash], // j
    &[Dash, Dot, Dash], // k
    &[Dot, Dash, Dot, Dot], // l
    &[Dash, Dash], // m
    &[Dash, Dot], // n
    &[Dash, Dash, Dash], // o
    &[Dot, Dash, Dash, Dot], // p
    &[Dash, Dash, Dot, Dash], // q
    &[Dot, Dash, Dot], // r
    &[Dot, Dot, Dot], // s
    &[Dash], // t
    &[Dot, Dot, Dash], // u
    &[Dot, Dot, Dot, Dash], // v
    &[Dot, Dash, Dash], // w
    &[Dash, Dot, Dot, Dash], // x
    &[Dash, Dot, Dash, Dash], // y
    &[Dash, Dash, Dot, Dot], // z
];

const DIGITS: [&[Symbol]; 10] = [
    &[Dash, Dash, Dash, Dash, Dash], // 0
    &[Dot, Dash, Dash, Dash, Dash], // 1
    &[Dot, Dot, Dash, Dash, Dash], // 2
    &[Dot, Dot, Dot, Dash, Dash], // 3
    &[Dot, Dot, Dot, Dot, Dash], // 4
    &[Dot, Dot, Dot, Dot, Dot], // 5
    &[Dash, Dot, Dot, Dot, Dot], // 6
    &[Dash, Dash, Dot, Dot, Dot], // 7
    &[Dash, Dash, Dash, Dot, Dot], // 8
    &[Dash, Dash, Dash, Dash, Dot], // 9
];

/// Look up the symbols for an ASCII letter (either case) or digit.
pub fn encode(c: u8) -> Option<&'static [Symbol]> {
    match c {
        b'a'..=b'z' => Some(LETTERS[(c - b'a') as usize]),
        b'A'..=b'Z' => Some(LETTERS[(c - b'A') as usize]),
        b'0'..=b'9' => Some(DIGITS[(c - b'0') as usize]),
        _ => None,
    }
}

/// Timing of the Morse output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MorseConfig {
    /// Length of one unit, in delay counts.
    pub unit: u32,
    /// Dark time after every character, in units.
    pub letter_gap_units: u32,
}

impl MorseConfig {
    pub const fn new(unit: u32) -> Self {
        Self {
            unit,
            letter_gap_units: 3,
        }
    }
}

impl Default for MorseConfig {
    /// One unit is a million spin-delay iterations.
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

/// Blinks characters on one output pin.
pub struct MorseLed<G: GpioController, D: Delay> {
    gpio: G,
    delay: D,
    pin: G::Pin,
    config: MorseConfig,
}

impl<G: GpioController, D: Delay> MorseLed<G, D> {
    /// Wrap a pin that has already been configured as an output.
    pub fn new(gpio: G, delay: D, pin: G::Pin, config: MorseConfig) -> Self {
        Self {
            gpio,
            delay,
            pin,
            config,
        }
    }

    /// Blink one character. Characters without an encoding leave the LED
    /// untouched.
    ///
    /// The LED is left lit at the end of the last symbol; [`Self::letter_gap`]
    /// turns it off.
    pub fn blink_char(&mut self, c: u8) -> Result<(), G::Error> {
        let Some(symbols) = encode(c) else {
            return Ok(());
        };

        self.gpio.set_high(self.pin)?;
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                self.gpio.toggle(self.pin)?;
                self.delay.delay(self.config.unit);
                self.gpio.toggle(self.pin)?;
            }
            self.delay.delay(symbol.units() * self.config.unit);
        }
        Ok(())
    }

    /// Turn the LED off and wait out the inter-character gap.
    pub fn letter_gap(&mut self) -> Result<(), G::Error> {
        self.gpio.set_low(self.pin)?;
        self.delay
            .delay(self.config.letter_gap_units * self.config.unit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::gpio::{Function, GpioError, PinLevel, PullMode};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Level(PinLevel),
        Wait(u32),
    }

    #[derive(Default)]
    struct Trace {
        level: bool,
        events: Vec<Event>,
    }

    impl GpioController for &mut Trace {
        type Pin = u8;
        type Error = GpioError;

        fn set_function(&mut self, _pin: u8, _function: Function) -> Result<(), GpioError> {
            Ok(())
        }

        fn set_pull(&mut self, _pin: u8, _pull: PullMode) -> Result<(), GpioError> {
            Ok(())
        }

        fn set_high(&mut self, pin: u8) -> Result<(), GpioError> {
            if pin > 53 {
                return Err(GpioError::InvalidPin);
            }
            self.level = true;
            self.events.push(Event::Level(PinLevel::High));
            Ok(())
        }

        fn set_low(&mut self, _pin: u8) -> Result<(), GpioError> {
            self.level = false;
            self.events.push(Event::Level(PinLevel::Low));
            Ok(())
        }

        fn read(&self, _pin: u8) -> Result<PinLevel, GpioError> {
            Ok(if self.level { PinLevel::High } else { PinLevel::Low })
        }
    }

    struct Clock(Vec<u32>);

    impl Delay for &mut Clock {
        fn delay(&mut self, count: u32) {
            self.0.push(count);
        }
    }

    #[test]
    fn table_covers_all_alphanumerics() {
        let encoded = (b'0'..=b'9')
            .chain(b'a'..=b'z')
            .filter(|&c| encode(c).is_some())
            .count();
        assert_eq!(encoded, 36);
        assert_eq!(encode(b'Q'), encode(b'q'));
        assert_eq!(encode(b' '), None);
        assert_eq!(encode(b'#'), None);
    }

    #[test]
    fn sos_letters() {
        assert_eq!(encode(b's'), Some(&[Symbol::Dot; 3][..]));
        assert_eq!(encode(b'o'), Some(&[Symbol::Dash; 3][..]));
    }

    #[test]
    fn blink_a_lights_dot_then_dash() {
        let mut trace = Trace::default();
        let mut clock = Clock(Vec::new());
        let mut led = MorseLed::new(&mut trace, &mut clock, 47, MorseConfig::new(10));
        led.blink_char(b'a').unwrap();
        led.letter_gap().unwrap();

        assert_eq!(clock.0, vec![10, 10, 30, 30]);
        assert_eq!(
            trace.events,
            vec![
                Event::Level(PinLevel::High),
                Event::Level(PinLevel::Low),
                Event::Level(PinLevel::High),
                Event::Level(PinLevel::Low),
            ]
        );
        assert!(!trace.level);
    }

    #[test]
    fn unencodable_character_only_waits_the_gap() {
        let mut trace = Trace::default();
        let mut clock = Clock(Vec::new());
        let mut led = MorseLed::new(&mut trace, &mut clock, 47, MorseConfig::new(10));
        led.blink_char(b'!').unwrap();
        led.letter_gap().unwrap();

        assert_eq!(clock.0, vec![30]);
        assert_eq!(trace.events, vec![Event::Level(PinLevel::Low)]);
    }

    #[test]
    fn gpio_errors_propagate() {
        let mut trace = Trace::default();
        let mut clock = Clock(Vec::new());
        let mut led = MorseLed::new(&mut trace, &mut clock, 99, MorseConfig::default());
        assert_eq!(led.blink_char(b'e'), Err(GpioError::InvalidPin));
    }
}

