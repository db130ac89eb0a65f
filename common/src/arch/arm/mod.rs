//! ARM (ARMv6, ARM1176JZF-S) architecture definitions.

pub mod cache;
pub mod psr;

pub use psr::{ProcessorMode, Psr};

/// Instruction written over a breakpointed word.
///
/// Encodes `svc #0xaaaaaa`; the supervisor-call vector routes it back into
/// the monitor as a trap.
pub const TRAP_INSTRUCTION: u32 = 0xefaa_aaaa;

/// Returns `true` if `word` is the breakpoint trap instruction.
#[inline]
pub const fn is_trap_instruction(word: u32) -> bool {
    word == TRAP_INSTRUCTION
}
