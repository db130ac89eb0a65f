//! Character-level primitives of the host protocol.
//!
//! The link is half-duplex and unbuffered: every helper reads exactly the
//! characters it needs and nothing past them.

use crate::codec::{self, Checksum};
use drivers::hal::serial::SerialPort;

pub(crate) const OK: &str = "$OK#9a";
/// Sent as is; the trailer is not the checksum of `E01`.
pub(crate) const ERROR: &str = "$E01#a5";
pub(crate) const ACK: u8 = b'+';

pub struct Wire<'a, S: SerialPort> {
    port: &'a mut S,
}

impl<'a, S: SerialPort> Wire<'a, S> {
    pub fn new(port: &'a mut S) -> Self {
        Self { port }
    }

    pub fn port(&mut self) -> &mut S {
        &mut *self.port
    }

    pub fn getc(&mut self) -> Result<u8, S::Error> {
        self.port.read_byte()
    }

    pub fn putc(&mut self, c: u8) -> Result<(), S::Error> {
        self.port.write_byte(c)
    }

    pub fn puts(&mut self, s: &str) -> Result<(), S::Error> {
        self.port.write_str(s)
    }

    /// Send `byte` as two hex characters and return their checksum.
    pub fn put_hex_byte(&mut self, byte: u8) -> Result<u8, S::Error> {
        let chars = codec::encode_byte(byte);
        let mut sum = Checksum::new();
        for c in chars {
            self.putc(c)?;
            sum.add(c);
        }
        Ok(sum.value())
    }

    /// Receive one byte sent as two hex characters.
    pub fn get_hex_byte(&mut self) -> Result<u8, S::Error> {
        let high = self.getc()?;
        let low = self.getc()?;
        Ok(codec::decode_byte(high, low))
    }

    /// Discard characters up to and including `delim`.
    pub fn skip(&mut self, delim: u8) -> Result<(), S::Error> {
        while self.getc()? != delim {}
        Ok(())
    }

    /// Consume the rest of a packet up to its `#` and acknowledge it. The
    /// checksum characters that follow are left in the stream.
    pub fn ack(&mut self) -> Result<(), S::Error> {
        self.skip(b'#')?;
        self.putc(ACK)
    }

    /// Accumulate hex digits until `delim`. Longer inputs keep the last
    /// eight digits.
    pub fn read_word(&mut self, delim: u8) -> Result<u32, S::Error> {
        let mut value = 0u32;
        loop {
            let c = self.getc()?;
            if c == delim {
                return Ok(value);
            }
            value = (value << 4) | u32::from(codec::hex_value(c));
        }
    }

    /// Throw away the rest of a line, starting with `c` which was already
    /// read.
    pub fn drain_line(&mut self, mut c: u8) -> Result<(), S::Error> {
        while c != b'\r' {
            c = self.getc()?;
        }
        Ok(())
    }

    /// A `$<body>#<checksum>` packet.
    pub fn put_packet(&mut self, body: &[u8]) -> Result<(), S::Error> {
        self.putc(b'$')?;
        for &c in body {
            self.putc(c)?;
        }
        let mut sum = Checksum::new();
        sum.add_all(body);
        self.putc(b'#')?;
        self.put_hex_byte(sum.value())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Line;
    use drivers::hal::serial::SerialError;

    #[test]
    fn read_word_stops_at_delimiter() {
        let mut line = Line::with(b"1A2b,rest");
        let mut wire = Wire::new(&mut line);
        assert_eq!(wire.read_word(b','), Ok(0x1a2b));
        assert_eq!(wire.getc(), Ok(b'r'));
    }

    #[test]
    fn read_word_keeps_low_digits() {
        let mut line = Line::with(b"123456789\r");
        let mut wire = Wire::new(&mut line);
        assert_eq!(wire.read_word(b'\r'), Ok(0x2345_6789));
    }

    #[test]
    fn ack_leaves_checksum_in_stream() {
        let mut line = Line::with(b"junk#5f");
        let mut wire = Wire::new(&mut line);
        wire.ack().unwrap();
        assert_eq!(wire.getc(), Ok(b'5'));
        assert_eq!(line.tx, b"+");
    }

    #[test]
    fn packets_carry_their_checksum() {
        let mut line = Line::default();
        let mut wire = Wire::new(&mut line);
        wire.put_packet(b"OK").unwrap();
        wire.put_packet(b"E01").unwrap();
        assert_eq!(line.tx, b"$OK#9a$E01#a6");
        assert_eq!(OK, "$OK#9a");
    }

    #[test]
    fn error_reply_is_a_fixed_string() {
        // Hosts expect this exact reply, whose trailer is not the sum of
        // its body.
        assert_eq!(ERROR, "$E01#a5");
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut line = Line::with(b"ab");
        let mut wire = Wire::new(&mut line);
        assert_eq!(wire.skip(b'#'), Err(SerialError::Closed));
    }
}
