//! Byte-oriented serial lines.
//!
//! [`SerialPort`] is what the monitor's protocol layer is written
//! against; [`BreakDetect`] adds the one interrupt source the monitor
//! needs while a program runs.

use core::fmt;

/// Line settings applied by [`SerialPort::configure`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Eight data bits, no parity, one stop bit.
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new_8n1(115200)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Line and configuration errors.
///
/// The receive-side variants are reported for the character they arrived
/// with; that character is lost.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    Framing,
    Parity,
    Overrun,
    /// The line was held low for longer than a frame.
    Break,
    InvalidConfig,
    /// End of input on a port that has a finite supply of bytes.
    Closed,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            SerialError::Framing => "framing error",
            SerialError::Parity => "parity error",
            SerialError::Overrun => "receive overrun",
            SerialError::Break => "break condition",
            SerialError::InvalidConfig => "invalid serial configuration",
            SerialError::Closed => "serial port closed",
        };
        f.write_str(what)
    }
}

/// Blocking byte transport.
pub trait SerialPort {
    type Error: fmt::Debug;

    /// Apply line settings. Called once before any transfer.
    fn configure(&mut self, config: SerialConfig) -> Result<(), Self::Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Send every byte of `bytes`, returning how many went out.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        bytes.iter().try_for_each(|&b| self.write_byte(b))?;
        Ok(bytes.len())
    }

    /// Send `s` as is. Unlike [`SerialWriter`], `\n` is not expanded.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write(s.as_bytes()).map(drop)
    }

    /// Wait for and return the next received byte.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Wait until everything written has left the wire.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Backs `write!` on a port: formatted text goes out as is and the
    /// first port error is returned rather than [`fmt::Error`].
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Self::Error>
    where
        Self: Sized,
    {
        let mut out = Verbatim {
            port: self,
            error: None,
        };
        match fmt::write(&mut out, args) {
            Ok(()) => Ok(()),
            Err(_) => match out.error {
                Some(e) => Err(e),
                // Only a failing `Display` impl gets here; nothing was lost
                // on the port.
                None => Ok(()),
            },
        }
    }
}

struct Verbatim<'a, T: SerialPort> {
    port: &'a mut T,
    error: Option<T::Error>,
}

impl<T: SerialPort> fmt::Write for Verbatim<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write(s.as_bytes()).map(drop).map_err(|e| {
            self.error = Some(e);
            fmt::Error
        })
    }
}

/// Ports that can interrupt the core when the line is held in break.
///
/// Armed while the program runs so the host can stop it, disarmed as
/// soon as the monitor has the line again.
pub trait BreakDetect: SerialPort {
    fn enable_break_detect(&mut self);

    /// Disarm and drop a break that is already latched.
    fn disable_break_detect(&mut self);
}

/// [`fmt::Write`] adapter for terminal output; `\n` goes out as `\r\n`.
pub struct SerialWriter<'a, T: SerialPort>(pub &'a mut T);

impl<T: SerialPort> fmt::Write for SerialWriter<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            let (text, newline) = match line.strip_suffix('\n') {
                Some(text) => (text, true),
                None => (line, false),
            };
            self.0.write(text.as_bytes()).map_err(|_| fmt::Error)?;
            if newline {
                self.0.write(b"\r\n").map_err(|_| fmt::Error)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    struct Sink(Vec<u8>);

    impl SerialPort for Sink {
        type Error = SerialError;

        fn configure(&mut self, _config: SerialConfig) -> Result<(), SerialError> {
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
            self.0.push(byte);
            Ok(())
        }

        fn read_byte(&mut self) -> Result<u8, SerialError> {
            Err(SerialError::Closed)
        }

        fn flush(&mut self) -> Result<(), SerialError> {
            Ok(())
        }
    }

    #[test]
    fn writer_expands_newlines() {
        let mut sink = Sink(Vec::new());
        write!(SerialWriter(&mut sink), "a\nb").unwrap();
        assert_eq!(sink.0, b"a\r\nb");
    }

    #[test]
    fn write_str_is_verbatim() {
        let mut sink = Sink(Vec::new());
        sink.write_str("$OK#9a\r\n").unwrap();
        assert_eq!(sink.0, b"$OK#9a\r\n");
    }

    #[test]
    fn formatted_port_output_is_verbatim() {
        let mut sink = Sink(Vec::new());
        SerialPort::write_fmt(&mut sink, format_args!("{:04x} {}\n", 0xbeef, 12)).unwrap();
        assert_eq!(sink.0, b"beef 12\n");
    }

    #[test]
    fn formatted_output_reports_the_port_error() {
        struct Full;

        impl SerialPort for Full {
            type Error = SerialError;

            fn configure(&mut self, _config: SerialConfig) -> Result<(), SerialError> {
                Ok(())
            }

            fn write_byte(&mut self, _byte: u8) -> Result<(), SerialError> {
                Err(SerialError::Overrun)
            }

            fn read_byte(&mut self) -> Result<u8, SerialError> {
                Err(SerialError::Closed)
            }

            fn flush(&mut self) -> Result<(), SerialError> {
                Ok(())
            }
        }

        assert_eq!(
            SerialPort::write_fmt(&mut Full, format_args!("{}", 1)),
            Err(SerialError::Overrun)
        );
    }

    #[test]
    fn default_config_is_115200_8n1() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
