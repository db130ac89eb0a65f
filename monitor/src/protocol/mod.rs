//! Host protocol: command loop and handlers.
//!
//! Every command is answered in-band. Bad input is drained to the end of
//! the line without a reply; out-of-range register indices and unknown
//! breakpoint addresses are reported as success. Only a failing transport
//! ends the loop with an error.

pub mod command;
pub mod diag;
pub mod wire;

pub use command::Command;
pub use wire::Wire;

use crate::codec;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::exec::{MonitorContext, Resume};
use crate::indicator::Indicator;
use crate::memory::TargetMemory;
use crate::registers::{REGISTER_FILE_BYTES, RegisterFile};
use crate::transfer;
use drivers::hal::serial::BreakDetect;
use wire::{ERROR, OK};

/// Serves one stop of the user program.
pub struct Dispatcher<'a, S: BreakDetect, M: TargetMemory, L: Indicator> {
    ctx: &'a mut MonitorContext,
    wire: Wire<'a, S>,
    memory: &'a mut M,
    indicator: &'a mut L,
    config: &'a MonitorConfig,
}

impl<'a, S, M, L> Dispatcher<'a, S, M, L>
where
    S: BreakDetect,
    M: TargetMemory,
    L: Indicator,
{
    pub fn new(
        ctx: &'a mut MonitorContext,
        port: &'a mut S,
        memory: &'a mut M,
        indicator: &'a mut L,
        config: &'a MonitorConfig,
    ) -> Self {
        Self {
            ctx,
            wire: Wire::new(port),
            memory,
            indicator,
            config,
        }
    }

    /// Prompt, read and execute commands until one resumes the program.
    pub fn run(mut self) -> Result<Resume, MonitorError<S::Error>> {
        loop {
            self.wire.puts(self.config.prompt)?;
            let command = Command::read(&mut self.wire)?;
            log::debug!("command {command:?}");
            if let Some(resume) = self.execute(command)? {
                return Ok(resume);
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Option<Resume>, S::Error> {
        match command {
            Command::Status => self.status()?,
            Command::DecimalToBinary => diag::decimal_to_binary(&mut self.wire)?,
            Command::ChecksumDump => diag::checksum_dump(&mut self.wire, &*self.memory, self.config)?,
            Command::Search => diag::search(&mut self.wire, &*self.memory)?,
            Command::Echo => diag::echo(&mut self.wire)?,
            Command::Morse => diag::morse(&mut self.wire, &mut *self.indicator)?,
            Command::ReadRegisters => {
                self.wire.ack()?;
                let bytes = self.ctx.registers.to_bytes();
                transfer::send_bytes(&mut self.wire, bytes, self.config.line_width)?;
            }
            Command::WriteRegisters => self.write_registers()?,
            Command::WriteRegister => self.write_register()?,
            Command::ReadMemory => self.read_memory()?,
            Command::WriteMemory => self.write_memory()?,
            Command::Continue => {
                self.wire.ack()?;
                return Ok(Some(self.resume()));
            }
            Command::Step => {
                self.wire.ack()?;
                let next = self.ctx.registers.pc().wrapping_add(4);
                self.ctx.breakpoints.set_step(next);
                return Ok(Some(self.resume()));
            }
            Command::InsertBreakpoint => {
                let addr = self.breakpoint_address()?;
                match self.ctx.breakpoints.insert(addr) {
                    Ok(()) => self.wire.puts(OK)?,
                    Err(e) => {
                        log::warn!("breakpoint {addr:#010x} rejected: {e}");
                        self.wire.puts(ERROR)?;
                    }
                }
            }
            Command::RemoveBreakpoint => {
                let addr = self.breakpoint_address()?;
                if !self.ctx.breakpoints.remove(addr) {
                    log::debug!("no breakpoint at {addr:#010x}");
                }
                self.wire.puts(OK)?;
            }
            Command::Detach | Command::Kill => {
                self.wire.ack()?;
                self.wire.puts(OK)?;
            }
            Command::Empty => {}
            Command::Unrecognized(c) => self.wire.drain_line(c)?,
        }
        Ok(None)
    }

    fn resume(&mut self) -> Resume {
        self.ctx.resume(self.wire.port(), &mut *self.memory)
    }

    /// `?#`: `$S<signal>#<checksum>`.
    fn status(&mut self) -> Result<(), S::Error> {
        self.wire.ack()?;
        let [high, low] = codec::encode_byte(self.ctx.last_signal().code());
        self.wire.put_packet(&[b'S', high, low])
    }

    /// `G<hex>#`: the whole register image, no length on the wire.
    fn write_registers(&mut self) -> Result<(), S::Error> {
        let mut bytes = [0u8; REGISTER_FILE_BYTES];
        transfer::receive_into(&mut self.wire, &mut bytes)?;
        self.ctx.registers = RegisterFile::from_bytes(&bytes);
        self.wire.ack()?;
        self.wire.puts(OK)
    }

    /// `P<index>=<value>#<checksum>`.
    fn write_register(&mut self) -> Result<(), S::Error> {
        let index = self.wire.read_word(b'=')?;
        let value = self.wire.read_word(b'#')?;
        // Unlike every other packet, the checksum is consumed here.
        self.wire.getc()?;
        self.wire.getc()?;
        self.wire.putc(wire::ACK)?;
        if !self.ctx.registers.set_from_wire(index, value) {
            log::warn!("register index {index} out of range");
        }
        self.wire.puts(OK)
    }

    /// ` <addr> <size>\r`, shared by `m` and `M`.
    fn memory_range(&mut self) -> Result<(u32, u32), S::Error> {
        self.wire.skip(b' ')?;
        let addr = self.wire.read_word(b' ')?;
        let size = self.wire.read_word(b'\r')?;
        Ok((addr, size))
    }

    fn read_memory(&mut self) -> Result<(), S::Error> {
        let (addr, size) = self.memory_range()?;
        let memory = &*self.memory;
        let bytes = (0..size).map(|i| memory.read_u8(addr.wrapping_add(i)));
        transfer::send_bytes(&mut self.wire, bytes, self.config.line_width)?;
        Ok(())
    }

    fn write_memory(&mut self) -> Result<(), S::Error> {
        let (addr, size) = self.memory_range()?;
        let memory = &mut *self.memory;
        transfer::receive_each(&mut self.wire, size, |offset, byte| {
            memory.write_u8(addr.wrapping_add(offset), byte)
        })?;
        // The host may have loaded code.
        memory.sync_instructions();
        Ok(())
    }

    /// `,<addr>,` up to and including the packet end, acknowledged.
    fn breakpoint_address(&mut self) -> Result<u32, S::Error> {
        self.wire.getc()?;
        let addr = self.wire.read_word(b',')?;
        self.wire.ack()?;
        Ok(addr)
    }
}
