//! PrimeCell PL011 UART.
//!
//! The console of the BCM2835. Only 8N1 framing is supported; the
//! receive side reports line errors per character, and a break on the
//! line can raise an interrupt so the host can stop a running program.
//!
//! ```no_run
//! use drivers::peripheral::pl011::PL011;
//! use drivers::hal::serial::{SerialPort, SerialConfig};
//!
//! let mut uart = unsafe { PL011::new(0x2020_1000) };
//! uart.configure(SerialConfig::new_8n1(115200)).ok();
//! uart.write(b"> ").ok();
//! ```

use crate::hal::serial::{
    BreakDetect, DataBits, Parity, SerialConfig, SerialError, SerialPort, StopBits,
};
use bitflags::bitflags;
use core::ptr::{read_volatile, write_volatile};

/// Reference clock feeding the baud generator.
const UART_CLOCK_HZ: u32 = 48_000_000;

/// Register offsets from the block base.
mod reg {
    pub const DATA: usize = 0x00;
    pub const FLAGS: usize = 0x18;
    pub const INT_DIVISOR: usize = 0x24;
    pub const FRAC_DIVISOR: usize = 0x28;
    pub const LINE_CONTROL: usize = 0x2c;
    pub const CONTROL: usize = 0x30;
    pub const INT_MASK: usize = 0x38;
    pub const MASKED_STATUS: usize = 0x40;
    pub const INT_CLEAR: usize = 0x44;
}

bitflags! {
    /// Error bits above the character in the data register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct RxStatus: u32 {
        const FRAMING = 1 << 8;
        const PARITY = 1 << 9;
        const BREAK = 1 << 10;
        const OVERRUN = 1 << 11;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Flags: u32 {
        const BUSY = 1 << 3;
        const RX_EMPTY = 1 << 4;
        const TX_FULL = 1 << 5;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Control: u32 {
        const ENABLE = 1 << 0;
        const TX_ENABLE = 1 << 8;
        const RX_ENABLE = 1 << 9;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct LineControl: u32 {
        const FIFO_ENABLE = 1 << 4;
        const WORD_LENGTH_8 = 0b11 << 5;
    }

    /// Shared layout of the mask, status and clear registers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Interrupts: u32 {
        const BREAK_ERROR = 1 << 9;
        const ALL = 0x7ff;
    }
}

/// Split a data register read into the character or the first line error,
/// overrun taking precedence.
fn decode_rx(word: u32) -> Result<u8, SerialError> {
    let status = RxStatus::from_bits_truncate(word);
    if status.contains(RxStatus::OVERRUN) {
        Err(SerialError::Overrun)
    } else if status.contains(RxStatus::BREAK) {
        Err(SerialError::Break)
    } else if status.contains(RxStatus::PARITY) {
        Err(SerialError::Parity)
    } else if status.contains(RxStatus::FRAMING) {
        Err(SerialError::Framing)
    } else {
        Ok(word as u8)
    }
}

/// Integer and 1/64th fractional baud divisors for `baud_rate`.
fn baud_divisors(baud_rate: u32) -> Result<(u32, u32), SerialError> {
    if baud_rate == 0 {
        return Err(SerialError::InvalidConfig);
    }
    let scaled = (u64::from(UART_CLOCK_HZ) << 6) / (16 * u64::from(baud_rate));
    let (integer, fraction) = ((scaled >> 6) as u32, (scaled & 0x3f) as u32);
    match integer {
        1..=0xffff => Ok((integer, fraction)),
        _ => Err(SerialError::InvalidConfig),
    }
}

/// PL011 UART at a fixed base address.
pub struct PL011 {
    base: usize,
}

impl PL011 {
    /// # Safety
    ///
    /// `base` must be the mapped register block of a PL011, and no other
    /// handle to the same block may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&mut self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    fn flags(&self) -> Flags {
        Flags::from_bits_truncate(self.read_reg(reg::FLAGS))
    }

    fn spin_while(&self, flag: Flags) {
        while self.flags().contains(flag) {
            core::hint::spin_loop();
        }
    }

    fn update_mask(&mut self, f: impl FnOnce(Interrupts) -> Interrupts) {
        let mask = Interrupts::from_bits_truncate(self.read_reg(reg::INT_MASK));
        self.write_reg(reg::INT_MASK, f(mask).bits());
    }

    /// A masked break interrupt is waiting to be cleared.
    pub fn break_pending(&self) -> bool {
        Interrupts::from_bits_truncate(self.read_reg(reg::MASKED_STATUS))
            .contains(Interrupts::BREAK_ERROR)
    }
}

impl SerialPort for PL011 {
    type Error = SerialError;

    fn configure(&mut self, config: SerialConfig) -> Result<(), SerialError> {
        let framing = (config.data_bits, config.parity, config.stop_bits);
        if framing != (DataBits::Eight, Parity::None, StopBits::One) {
            return Err(SerialError::InvalidConfig);
        }
        let (integer, fraction) = baud_divisors(config.baud_rate)?;

        // Divisors and line control only latch while the block is off
        // and the FIFOs are flushed.
        self.write_reg(reg::CONTROL, 0);
        self.spin_while(Flags::BUSY);
        self.write_reg(reg::LINE_CONTROL, 0);

        self.write_reg(reg::INT_DIVISOR, integer);
        self.write_reg(reg::FRAC_DIVISOR, fraction);
        self.write_reg(
            reg::LINE_CONTROL,
            (LineControl::WORD_LENGTH_8 | LineControl::FIFO_ENABLE).bits(),
        );
        self.write_reg(reg::INT_CLEAR, Interrupts::ALL.bits());
        self.write_reg(reg::INT_MASK, 0);
        self.write_reg(
            reg::CONTROL,
            (Control::ENABLE | Control::TX_ENABLE | Control::RX_ENABLE).bits(),
        );

        log::debug!("pl011@{:#x}: {} baud 8N1", self.base, config.baud_rate);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        self.spin_while(Flags::TX_FULL);
        self.write_reg(reg::DATA, u32::from(byte));
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        self.spin_while(Flags::RX_EMPTY);
        decode_rx(self.read_reg(reg::DATA))
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        self.spin_while(Flags::BUSY);
        Ok(())
    }
}

impl BreakDetect for PL011 {
    fn enable_break_detect(&mut self) {
        // A break seen while the monitor owned the line must not fire.
        self.write_reg(reg::INT_CLEAR, Interrupts::BREAK_ERROR.bits());
        self.update_mask(|mask| mask | Interrupts::BREAK_ERROR);
    }

    fn disable_break_detect(&mut self) {
        self.update_mask(|mask| mask - Interrupts::BREAK_ERROR);
        self.write_reg(reg::INT_CLEAR, Interrupts::BREAK_ERROR.bits());
    }
}

// SAFETY: the handle is only an address; exclusive access is enforced by
// the owner.
unsafe impl Send for PL011 {}
unsafe impl Sync for PL011 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisors_for_115200() {
        // 48 MHz / (16 * 115200) = 26.04
        assert_eq!(baud_divisors(115200), Ok((26, 2)));
    }

    #[test]
    fn unreachable_baud_rates_are_rejected() {
        assert_eq!(baud_divisors(0), Err(SerialError::InvalidConfig));
        assert_eq!(baud_divisors(1), Err(SerialError::InvalidConfig));
        assert_eq!(baud_divisors(4_000_000), Err(SerialError::InvalidConfig));
    }

    #[test]
    fn clean_reads_yield_the_character() {
        assert_eq!(decode_rx(0x24), Ok(b'$'));
    }

    #[test]
    fn line_errors_replace_the_character() {
        assert_eq!(decode_rx(0x400), Err(SerialError::Break));
        assert_eq!(decode_rx(0x100 | 0x41), Err(SerialError::Framing));
        assert_eq!(decode_rx(0x200), Err(SerialError::Parity));
        assert_eq!(decode_rx(0xf00), Err(SerialError::Overrun));
    }
}
