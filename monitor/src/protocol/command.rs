//! Command recognition.
//!
//! A command is identified by its first character. Extended commands
//! (`$p...`) and breakpoint commands (`Z0`, `z0`) are followed by a literal
//! tag that is matched one character at a time; the first character that
//! does not fit turns the whole line into [`Command::Unrecognized`].

use super::wire::Wire;
use drivers::hal::serial::SerialPort;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `?`
    Status,
    /// `$pBIN`
    DecimalToBinary,
    /// `$pCHK`
    ChecksumDump,
    /// `$pSCH`
    Search,
    /// `$pECHO`
    Echo,
    /// `$pMORSE`
    Morse,
    /// `g`
    ReadRegisters,
    /// `G`
    WriteRegisters,
    /// `P`
    WriteRegister,
    /// `m`
    ReadMemory,
    /// `M`
    WriteMemory,
    /// `c`
    Continue,
    /// `s`
    Step,
    /// `Z0`
    InsertBreakpoint,
    /// `z0`
    RemoveBreakpoint,
    /// `D`
    Detach,
    /// `k`
    Kill,
    /// A bare carriage return.
    Empty,
    /// Input that matches no command. Holds the character that gave it
    /// away, which is the first character of what remains to be drained.
    Unrecognized(u8),
}

impl Command {
    /// Read characters until a command is recognised or ruled out.
    pub fn read<S: SerialPort>(wire: &mut Wire<'_, S>) -> Result<Self, S::Error> {
        let command = match wire.getc()? {
            b'?' => Command::Status,
            b'$' => return Self::read_extended(wire),
            b'g' => Command::ReadRegisters,
            b'G' => Command::WriteRegisters,
            b'P' => Command::WriteRegister,
            b'm' => Command::ReadMemory,
            b'M' => Command::WriteMemory,
            b'c' => Command::Continue,
            b's' => Command::Step,
            b'Z' => return Self::tagged(wire, b"0", Command::InsertBreakpoint),
            b'z' => return Self::tagged(wire, b"0", Command::RemoveBreakpoint),
            b'D' => Command::Detach,
            b'k' => Command::Kill,
            b'\r' => Command::Empty,
            other => Command::Unrecognized(other),
        };
        Ok(command)
    }

    fn read_extended<S: SerialPort>(wire: &mut Wire<'_, S>) -> Result<Self, S::Error> {
        match wire.getc()? {
            b'p' => {}
            other => return Ok(Command::Unrecognized(other)),
        }

        let (rest, command) = match wire.getc()? {
            b'B' => (&b"IN"[..], Command::DecimalToBinary),
            b'C' => (&b"HK"[..], Command::ChecksumDump),
            b'S' => (&b"CH"[..], Command::Search),
            b'E' => (&b"CHO"[..], Command::Echo),
            b'M' => (&b"ORSE"[..], Command::Morse),
            other => return Ok(Command::Unrecognized(other)),
        };
        Self::tagged(wire, rest, command)
    }

    fn tagged<S: SerialPort>(
        wire: &mut Wire<'_, S>,
        tag: &[u8],
        command: Command,
    ) -> Result<Self, S::Error> {
        for &expected in tag {
            let c = wire.getc()?;
            if c != expected {
                return Ok(Command::Unrecognized(c));
            }
        }
        Ok(command)
    }
}
