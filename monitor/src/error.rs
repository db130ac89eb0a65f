//! Monitor errors.
//!
//! Protocol-level failures (unknown commands, bad indices, full tables) are
//! answered in-band and never surface here. What remains is the transport
//! itself failing.

use core::fmt;

/// Failure that stops the command loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MonitorError<E> {
    /// The serial transport reported an error.
    Transport(E),
}

impl<E> From<E> for MonitorError<E> {
    fn from(error: E) -> Self {
        MonitorError::Transport(error)
    }
}

impl<E: fmt::Debug> fmt::Display for MonitorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Transport(e) => write!(f, "serial transport failed: {e:?}"),
        }
    }
}
