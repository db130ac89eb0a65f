//! Stop reasons reported to the host.

use core::fmt;

/// Why the user program last handed control back to the monitor.
///
/// Codes follow the POSIX signal numbers GDB expects in a stop reply.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Signal {
    Hangup = 0x01,
    Interrupt = 0x02,
    Quit = 0x03,
    IllegalInstruction = 0x04,
    Trap = 0x05,
    Abort = 0x06,
    Kill = 0x09,
    BadSyscall = 0x0a,
    SegmentationFault = 0x0b,
    Terminate = 0x0f,
    Stop = 0x11,
}

impl Signal {
    /// Wire code of the signal.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Signal for a wire code, if it is one the monitor knows.
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => Signal::Hangup,
            0x02 => Signal::Interrupt,
            0x03 => Signal::Quit,
            0x04 => Signal::IllegalInstruction,
            0x05 => Signal::Trap,
            0x06 => Signal::Abort,
            0x09 => Signal::Kill,
            0x0a => Signal::BadSyscall,
            0x0b => Signal::SegmentationFault,
            0x0f => Signal::Terminate,
            0x11 => Signal::Stop,
            _ => return None,
        })
    }

    /// Conventional short name (`SIGTRAP` and friends).
    pub const fn name(self) -> &'static str {
        match self {
            Signal::Hangup => "SIGHUP",
            Signal::Interrupt => "SIGINT",
            Signal::Quit => "SIGQUIT",
            Signal::IllegalInstruction => "SIGILL",
            Signal::Trap => "SIGTRAP",
            Signal::Abort => "SIGABRT",
            Signal::Kill => "SIGKILL",
            Signal::BadSyscall => "SIGSYS",
            Signal::SegmentationFault => "SIGSEGV",
            Signal::Terminate => "SIGTERM",
            Signal::Stop => "SIGSTOP",
        }
    }
}

impl TryFrom<u8> for Signal {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, u8> {
        Signal::from_code(code).ok_or(code)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), self.code())
    }
}
