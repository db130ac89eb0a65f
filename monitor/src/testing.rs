//! In-memory serial line for unit tests.

use drivers::hal::serial::{BreakDetect, SerialConfig, SerialError, SerialPort};
use std::collections::VecDeque;

/// Serves scripted input and records output. Reading past the script
/// fails with [`SerialError::Closed`].
#[derive(Debug, Default)]
pub(crate) struct Line {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub break_detect: bool,
}

impl Line {
    pub fn with(input: &[u8]) -> Self {
        Self {
            rx: input.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn output(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap_or("<binary>")
    }
}

impl SerialPort for Line {
    type Error = SerialError;

    fn configure(&mut self, _config: SerialConfig) -> Result<(), SerialError> {
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        self.tx.push(byte);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        self.rx.pop_front().ok_or(SerialError::Closed)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        Ok(())
    }
}

impl BreakDetect for Line {
    fn enable_break_detect(&mut self) {
        self.break_detect = true;
    }

    fn disable_break_detect(&mut self) {
        self.break_detect = false;
    }
}
