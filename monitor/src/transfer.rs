//! Bulk hex transfer of memory and register images.

use crate::codec::Checksum;
use crate::protocol::wire::Wire;
use drivers::hal::serial::SerialPort;

/// Send every byte as two hex characters, breaking the line after each
/// `line_width` bytes. No break follows the last byte. Returns the checksum
/// of the hex characters, which the protocol does not transmit.
pub fn send_bytes<S, I>(
    wire: &mut Wire<'_, S>,
    bytes: I,
    line_width: usize,
) -> Result<u8, S::Error>
where
    S: SerialPort,
    I: IntoIterator<Item = u8>,
{
    let mut sum = Checksum::new();
    let mut on_line = 0;
    for byte in bytes {
        if line_width != 0 && on_line == line_width {
            wire.puts("\r\n")?;
            on_line = 0;
        }
        sum.add(wire.put_hex_byte(byte)?);
        on_line += 1;
    }
    Ok(sum.value())
}

/// Fill `buf` with bytes read as hex pairs. The length is implied by the
/// buffer; nothing delimits it on the wire.
pub fn receive_into<S: SerialPort>(wire: &mut Wire<'_, S>, buf: &mut [u8]) -> Result<(), S::Error> {
    for slot in buf.iter_mut() {
        *slot = wire.get_hex_byte()?;
    }
    Ok(())
}

/// Read `count` hex-encoded bytes and hand each to `store` with its offset.
pub fn receive_each<S, F>(wire: &mut Wire<'_, S>, count: u32, mut store: F) -> Result<(), S::Error>
where
    S: SerialPort,
    F: FnMut(u32, u8),
{
    for offset in 0..count {
        store(offset, wire.get_hex_byte()?);
    }
    Ok(())
}
