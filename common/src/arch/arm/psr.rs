//! Program status register (CPSR/SPSR) layout.

use bitflags::bitflags;

/// Mask covering the mode field `M[4:0]`.
const MODE_MASK: u32 = 0b1_1111;

/// Processor operating mode, as encoded in `M[4:0]`.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProcessorMode {
    User = 0b10000,
    Fiq = 0b10001,
    Irq = 0b10010,
    Supervisor = 0b10011,
    Monitor = 0b10110,
    Abort = 0b10111,
    Hypervisor = 0b11010,
    Undefined = 0b11011,
    System = 0b11111,
}

impl ProcessorMode {
    /// Decode a mode field. Reserved encodings yield `None`.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & MODE_MASK {
            0b10000 => Some(Self::User),
            0b10001 => Some(Self::Fiq),
            0b10010 => Some(Self::Irq),
            0b10011 => Some(Self::Supervisor),
            0b10110 => Some(Self::Monitor),
            0b10111 => Some(Self::Abort),
            0b11010 => Some(Self::Hypervisor),
            0b11011 => Some(Self::Undefined),
            0b11111 => Some(Self::System),
            _ => None,
        }
    }
}

bitflags! {
    /// Condition flags and control bits of a program status register.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Psr: u32 {
        /// Negative.
        const N = 1 << 31;
        /// Zero.
        const Z = 1 << 30;
        /// Carry.
        const C = 1 << 29;
        /// Overflow.
        const V = 1 << 28;
        /// Sticky saturation.
        const Q = 1 << 27;
        /// IRQ disable.
        const I = 1 << 7;
        /// FIQ disable.
        const F = 1 << 6;
        /// Thumb state.
        const T = 1 << 5;

        // Mode and reserved bits round-trip untouched.
        const _ = !0;
    }
}

impl Psr {
    /// Status a freshly loaded program starts with: user mode, IRQ and FIQ
    /// unmasked, ARM state, flags clear.
    pub const RESET: Psr = Psr::from_bits_retain(ProcessorMode::User as u32);

    /// Current mode, if the mode field holds a valid encoding.
    pub const fn mode(self) -> Option<ProcessorMode> {
        ProcessorMode::from_bits(self.bits())
    }
}

impl Default for Psr {
    fn default() -> Self {
        Self::RESET
    }
}
