//! Execution control: the stopped/running state machine.

use crate::breakpoint::BreakpointTable;
use crate::memory::TargetMemory;
use crate::registers::RegisterFile;
use crate::signal::Signal;
use common::arch::arm::is_trap_instruction;
use drivers::hal::serial::BreakDetect;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExecState {
    /// The monitor owns the CPU and serves commands.
    Stopped,
    /// The user program owns the CPU; breakpoints are armed.
    Running,
}

/// Everything the monitor keeps between two stops of the user program.
#[derive(Debug, Clone)]
pub struct MonitorContext {
    pub registers: RegisterFile,
    pub breakpoints: BreakpointTable,
    last_signal: Signal,
    state: ExecState,
}

impl MonitorContext {
    /// A context for a program that has not run yet. The first status
    /// request reports a trap.
    pub const fn new(registers: RegisterFile) -> Self {
        Self {
            registers,
            breakpoints: BreakpointTable::new(),
            last_signal: Signal::Trap,
            state: ExecState::Stopped,
        }
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn last_signal(&self) -> Signal {
        self.last_signal
    }

    /// Running -> Stopped.
    ///
    /// Memory is only restored when breakpoints were actually armed, so the
    /// boot entry and a nested fault inside the monitor leave it alone. The
    /// step breakpoint is dropped whether or not it was hit.
    pub fn stop<S, M>(&mut self, signal: Signal, port: &mut S, memory: &mut M)
    where
        S: BreakDetect,
        M: TargetMemory,
    {
        port.disable_break_detect();
        if self.state == ExecState::Running {
            let pc = self.registers.pc();
            if signal == Signal::Trap && is_trap_instruction(memory.read_u32(pc)) {
                log::debug!("breakpoint hit at {pc:#010x}");
            }
            self.breakpoints.deactivate(memory);
        }
        self.breakpoints.clear_step();
        self.last_signal = signal;
        self.state = ExecState::Stopped;
        log::debug!("stopped by {signal} at pc {:#010x}", self.registers.pc());
    }

    /// Stopped -> Running. Arms every breakpoint and the break-detect
    /// interrupt; the caller transfers control right after.
    pub(crate) fn resume<S, M>(&mut self, port: &mut S, memory: &mut M) -> Resume
    where
        S: BreakDetect,
        M: TargetMemory,
    {
        self.breakpoints.activate(memory);
        port.enable_break_detect();
        self.state = ExecState::Running;
        let pc = self.registers.pc();
        log::debug!(
            "resuming at {pc:#010x} with {} breakpoints armed",
            self.breakpoints.len()
        );
        Resume { pc }
    }
}

/// Proof that the context is armed for running. The firmware answers it by
/// switching to the saved register file; nothing in the monitor may run
/// between the two.
#[must_use = "the user program only runs once the firmware switches to it"]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Resume {
    pc: u32,
}

impl Resume {
    /// Address execution continues at.
    pub fn pc(&self) -> u32 {
        self.pc
    }
}
