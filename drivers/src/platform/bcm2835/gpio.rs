//! BCM2835 GPIO block.

use super::delay::delay_cycles;
use crate::hal::gpio::{Function, GpioController, GpioError, PinLevel, PullMode};
use core::ptr::{read_volatile, write_volatile};

pub const GPIO_BASE: usize = 0x2020_0000;

const PIN_COUNT: u8 = 54;

// Register offsets. The banked registers take the pin's bank times four.
const GPFSEL0: usize = 0x00;
const GPSET0: usize = 0x1c;
const GPCLR0: usize = 0x28;
const GPLEV0: usize = 0x34;
const GPPUD: usize = 0x94;
const GPPUDCLK0: usize = 0x98;

/// Cycles GPPUD and GPPUDCLK need to settle.
const PULL_SETTLE_CYCLES: u32 = 150;

/// Three-bit function select code.
fn fsel_code(function: Function) -> u32 {
    match function {
        Function::Input => 0b000,
        Function::Output => 0b001,
        Function::Alt0 => 0b100,
        Function::Alt1 => 0b101,
        Function::Alt2 => 0b110,
        Function::Alt3 => 0b111,
        Function::Alt4 => 0b011,
        Function::Alt5 => 0b010,
    }
}

fn pull_code(pull: PullMode) -> u32 {
    match pull {
        PullMode::None => 0b00,
        PullMode::Down => 0b01,
        PullMode::Up => 0b10,
    }
}

/// Offset of the GPFSEL register holding `pin` and the field's shift.
fn fsel_field(pin: u8) -> (usize, u32) {
    (GPFSEL0 + usize::from(pin / 10) * 4, u32::from(pin % 10) * 3)
}

/// Bank offset and bit mask of `pin` in the one-bit-per-pin registers.
fn bank_bit(pin: u8) -> Result<(usize, u32), GpioError> {
    if pin < PIN_COUNT {
        Ok((usize::from(pin / 32) * 4, 1 << (pin % 32)))
    } else {
        Err(GpioError::InvalidPin)
    }
}

/// Handle to the GPIO block.
#[derive(Debug)]
pub struct Bcm2835Gpio;

impl Bcm2835Gpio {
    /// # Safety
    ///
    /// The GPIO block must be mapped at [`GPIO_BASE`]. Handles do not
    /// coordinate read-modify-write of the function select registers.
    pub const unsafe fn new() -> Self {
        Self
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((GPIO_BASE + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((GPIO_BASE + offset) as *mut u32, value) }
    }
}

impl GpioController for Bcm2835Gpio {
    type Pin = u8;
    type Error = GpioError;

    fn set_function(&mut self, pin: u8, function: Function) -> Result<(), GpioError> {
        bank_bit(pin)?;
        let (offset, shift) = fsel_field(pin);
        let value = self.read_reg(offset) & !(0b111 << shift);
        self.write_reg(offset, value | fsel_code(function) << shift);
        Ok(())
    }

    /// The control signal is latched into the pin by pulsing its clock bit.
    fn set_pull(&mut self, pin: u8, pull: PullMode) -> Result<(), GpioError> {
        let (bank, bit) = bank_bit(pin)?;
        self.write_reg(GPPUD, pull_code(pull));
        delay_cycles(PULL_SETTLE_CYCLES);
        self.write_reg(GPPUDCLK0 + bank, bit);
        delay_cycles(PULL_SETTLE_CYCLES);
        self.write_reg(GPPUD, 0);
        self.write_reg(GPPUDCLK0 + bank, 0);
        Ok(())
    }

    fn set_high(&mut self, pin: u8) -> Result<(), GpioError> {
        let (bank, bit) = bank_bit(pin)?;
        self.write_reg(GPSET0 + bank, bit);
        Ok(())
    }

    fn set_low(&mut self, pin: u8) -> Result<(), GpioError> {
        let (bank, bit) = bank_bit(pin)?;
        self.write_reg(GPCLR0 + bank, bit);
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<PinLevel, GpioError> {
        let (bank, bit) = bank_bit(pin)?;
        Ok(if self.read_reg(GPLEV0 + bank) & bit != 0 {
            PinLevel::High
        } else {
            PinLevel::Low
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn act_led_lives_in_the_second_bank() {
        assert_eq!(bank_bit(47), Ok((4, 1 << 15)));
        assert_eq!(fsel_field(47), (0x10, 21));
    }

    #[test]
    fn uart_pins_share_a_function_register() {
        assert_eq!(fsel_field(14), (0x04, 12));
        assert_eq!(fsel_field(15), (0x04, 15));
    }

    #[test]
    fn pins_past_the_last_are_rejected() {
        assert_eq!(bank_bit(53).map(|(bank, _)| bank), Ok(4));
        assert_eq!(bank_bit(54), Err(GpioError::InvalidPin));
    }
}
