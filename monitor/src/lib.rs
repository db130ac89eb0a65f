//! Resident debug monitor core.
//!
//! The monitor owns a stopped program's CPU state and talks to a host over a
//! serial line, one character at a time. The host can read and write the
//! register file and memory, place software breakpoints, step and resume.
//!
//! # Module Organization
//!
//! - [`codec`]: hex characters, checksums, endian swap
//! - [`registers`]: the 42-word register file shared with the trampoline
//! - [`breakpoint`]: the breakpoint table and trap patching
//! - [`memory`]: the raw memory capability the monitor is handed
//! - [`transfer`]: bulk hex transfer of byte ranges
//! - [`protocol`]: command framing and dispatch
//! - [`exec`]: the stopped/running state machine
//! - [`signal`]: stop reasons reported by `?`
//! - [`indicator`]: where `$pMORSE` blinks
//!
//! # Control flow
//!
//! The firmware calls [`enter`] every time the user program traps. `enter`
//! restores patched memory, then serves commands until the host asks to
//! continue or step. It returns a [`Resume`] token after arming breakpoints;
//! the firmware then performs the actual context switch, which never returns.
//!
//! # Trust boundary
//!
//! Memory commands reach any address the host names. Nothing is validated:
//! an address inside the monitor's own image can corrupt it. The intended
//! client is a cooperating debugger on a private link.

#![cfg_attr(not(test), no_std)]

pub mod breakpoint;
pub mod codec;
pub mod config;
pub mod error;
pub mod exec;
pub mod indicator;
pub mod memory;
pub mod protocol;
pub mod registers;
pub mod signal;
pub mod transfer;

#[cfg(test)]
mod testing;

pub use breakpoint::{BreakpointError, BreakpointTable};
pub use config::MonitorConfig;
pub use error::MonitorError;
pub use exec::{ExecState, MonitorContext, Resume};
pub use indicator::Indicator;
pub use memory::{PhysicalMemory, TargetMemory};
pub use protocol::Dispatcher;
pub use registers::RegisterFile;
pub use signal::Signal;

use drivers::hal::serial::BreakDetect;

/// Re-entry point: the user program stopped with `signal`.
///
/// Brings the context back to the stopped state and serves host commands
/// until one of them resumes the program.
pub fn enter<S, M, L>(
    ctx: &mut MonitorContext,
    signal: Signal,
    port: &mut S,
    memory: &mut M,
    indicator: &mut L,
    config: &MonitorConfig,
) -> Result<Resume, MonitorError<S::Error>>
where
    S: BreakDetect,
    M: TargetMemory,
    L: Indicator,
{
    ctx.stop(signal, port, memory);
    Dispatcher::new(ctx, port, memory, indicator, config).run()
}
