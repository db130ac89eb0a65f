//! BCM2835 interrupt controller.
//!
//! Lines 0-63 are the GPU peripheral interrupts (the PL011 is line 57);
//! 64-71 are the ARM-local sources of the basic bank. The monitor only
//! routes the console, but any line can be enabled.

use crate::hal::interrupt::{InterruptController, IrqNumber};
use core::fmt;
use core::ptr::{read_volatile, write_volatile};

/// Interrupt controller base address.
pub const INT_CONTROLLER_BASE: usize = 0x2000_b200;

const BASIC_PENDING: usize = 0x00;
const PENDING_1: usize = 0x04;
const PENDING_2: usize = 0x08;
const ENABLE_1: usize = 0x10;
const ENABLE_2: usize = 0x14;
const ENABLE_BASIC: usize = 0x18;

/// Number of addressable lines.
const IRQ_COUNT: u32 = 72;

/// Register bank a line lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Bank {
    Gpu1,
    Gpu2,
    Basic,
}

impl Bank {
    fn locate(irq: IrqNumber) -> Result<(Bank, u32), InterruptError> {
        match irq {
            0..=31 => Ok((Bank::Gpu1, irq)),
            32..=63 => Ok((Bank::Gpu2, irq - 32)),
            64..IRQ_COUNT => Ok((Bank::Basic, irq - 64)),
            _ => Err(InterruptError::InvalidIrq(irq)),
        }
    }

    fn enable_offset(self) -> usize {
        match self {
            Bank::Gpu1 => ENABLE_1,
            Bank::Gpu2 => ENABLE_2,
            Bank::Basic => ENABLE_BASIC,
        }
    }
}

#[inline]
fn read_reg(offset: usize) -> u32 {
    unsafe { read_volatile((INT_CONTROLLER_BASE + offset) as *const u32) }
}

#[inline]
fn write_reg(offset: usize, value: u32) {
    unsafe { write_volatile((INT_CONTROLLER_BASE + offset) as *mut u32, value) }
}

/// Lowest pending line across the three banks.
pub fn pending_irq() -> Option<IrqNumber> {
    [(PENDING_1, 0), (PENDING_2, 32)]
        .into_iter()
        .map(|(offset, first)| (read_reg(offset), first))
        // Only the low byte of the basic bank is ARM-local; the rest mirrors
        // GPU lines already seen above.
        .chain(core::iter::once((read_reg(BASIC_PENDING) & 0xff, 64)))
        .find(|&(bits, _)| bits != 0)
        .map(|(bits, first)| first + bits.trailing_zeros())
}

// ============================================================================
// HAL Implementation
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InterruptError {
    /// No such line on this controller.
    InvalidIrq(IrqNumber),
}

impl fmt::Display for InterruptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterruptError::InvalidIrq(irq) => write!(f, "no interrupt line {irq}"),
        }
    }
}

/// BCM2835 interrupt controller.
#[derive(Debug)]
pub struct Bcm2835InterruptController;

impl Bcm2835InterruptController {
    /// Create a new interrupt controller.
    ///
    /// # Safety
    ///
    /// Only one handle may exist; the registers are written without locking.
    pub const unsafe fn new() -> Self {
        Self
    }
}

impl InterruptController for Bcm2835InterruptController {
    type Error = InterruptError;

    fn enable(&mut self, irq: IrqNumber) -> Result<(), InterruptError> {
        let (bank, bit) = Bank::locate(irq)?;
        write_reg(bank.enable_offset(), 1 << bit);
        log::debug!("irq {irq} enabled");
        Ok(())
    }

    fn next_pending(&self) -> Option<IrqNumber> {
        pending_irq()
    }
}
