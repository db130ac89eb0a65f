//! Register file of the stopped program.
//!
//! The layout is the one the trampoline saves and restores and the one the
//! host reads with `g`: 42 words in fixed positions.
//!
//! | index  | contents                 |
//! |--------|--------------------------|
//! | 0-12   | r0-r12                   |
//! | 13     | sp                       |
//! | 14     | lr                       |
//! | 15     | pc                       |
//! | 16-23  | f0-f7                    |
//! | 24-39  | reserved                 |
//! | 40     | floating-point status    |
//! | 41     | cpsr                     |

use crate::codec::swap_endian;
use common::arch::arm::Psr;

/// Number of words in the register file.
pub const NUM_REGS: usize = 42;

/// Size of the register file on the wire, in bytes.
pub const REGISTER_FILE_BYTES: usize = NUM_REGS * 4;

pub const SP: usize = 13;
pub const PC: usize = 15;
pub const CPSR: usize = 41;

/// Saved CPU state of the user program.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    words: [u32; NUM_REGS],
}

impl RegisterFile {
    /// All registers zero, including the status word.
    pub const fn zeroed() -> Self {
        Self {
            words: [0; NUM_REGS],
        }
    }

    /// State a freshly loaded program starts from.
    pub const fn reset(stack_top: u32, entry: u32) -> Self {
        let mut words = [0; NUM_REGS];
        words[SP] = stack_top;
        words[PC] = entry;
        words[CPSR] = Psr::RESET.bits();
        Self { words }
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.words.get(index).copied()
    }

    /// Store `value` at `index`. Returns `false` and leaves the file
    /// untouched if the index is out of range.
    pub fn set(&mut self, index: usize, value: u32) -> bool {
        match self.words.get_mut(index) {
            Some(word) => {
                *word = value;
                true
            }
            None => false,
        }
    }

    /// Store a value received as big-endian text at `index`.
    ///
    /// The wire index is unbounded; out-of-range indices are ignored and
    /// reported as `false`.
    pub fn set_from_wire(&mut self, index: u32, wire_value: u32) -> bool {
        usize::try_from(index)
            .map(|index| self.set(index, swap_endian(wire_value)))
            .unwrap_or(false)
    }

    pub fn pc(&self) -> u32 {
        self.words[PC]
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.words[PC] = pc;
    }

    pub fn sp(&self) -> u32 {
        self.words[SP]
    }

    pub fn cpsr(&self) -> Psr {
        Psr::from_bits_retain(self.words[CPSR])
    }

    pub fn words(&self) -> &[u32; NUM_REGS] {
        &self.words
    }

    /// Serialize in declaration order, each word in the target's
    /// little-endian byte order.
    pub fn to_bytes(&self) -> [u8; REGISTER_FILE_BYTES] {
        let mut bytes = [0; REGISTER_FILE_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.words.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Inverse of [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8; REGISTER_FILE_BYTES]) -> Self {
        let mut words = [0; NUM_REGS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { words }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::arch::arm::ProcessorMode;

    #[test]
    fn reset_state() {
        let regs = RegisterFile::reset(0x8000, 0x10000);
        assert_eq!(regs.sp(), 0x8000);
        assert_eq!(regs.pc(), 0x10000);
        assert_eq!(regs.get(CPSR), Some(0x10));
        assert_eq!(regs.cpsr().mode(), Some(ProcessorMode::User));
        assert!(regs.words()[..SP].iter().all(|&w| w == 0));
    }

    #[test]
    fn byte_image_round_trips() {
        let mut regs = RegisterFile::zeroed();
        for i in 0..NUM_REGS {
            regs.set(i, (i as u32).wrapping_mul(0x0101_0101) ^ 0xa5a5_0000);
        }
        let bytes = regs.to_bytes();
        assert_eq!(RegisterFile::from_bytes(&bytes), regs);
    }

    #[test]
    fn bytes_are_little_endian_words() {
        let mut regs = RegisterFile::zeroed();
        regs.set(0, 0x1122_3344);
        assert_eq!(regs.to_bytes()[..4], [0x44, 0x33, 0x22, 0x11]);
    }

    #[test]
    fn wire_values_are_byte_swapped() {
        let mut regs = RegisterFile::zeroed();
        assert!(regs.set_from_wire(0, 0x0000_00ff));
        assert_eq!(regs.get(0), Some(0xff00_0000));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut regs = RegisterFile::reset(1, 2);
        let before = regs;
        assert!(!regs.set_from_wire(NUM_REGS as u32, 0xffff_ffff));
        assert!(!regs.set_from_wire(u32::MAX, 1));
        assert_eq!(regs, before);
        assert!(regs.set_from_wire(CPSR as u32, 0x1300_0000));
        assert_eq!(regs.get(CPSR), Some(0x13));
    }
}
