//! The `$p` diagnostic commands.

use super::wire::{ACK, Wire};
use crate::codec;
use crate::config::{MonitorConfig, TEXT_LIMIT};
use crate::indicator::Indicator;
use crate::memory::TargetMemory;
use crate::transfer;
use drivers::hal::serial::SerialPort;

/// Free-text argument of `$pECHO` and `$pMORSE`.
pub(crate) struct Text {
    buf: [u8; TEXT_LIMIT],
    len: usize,
}

impl Text {
    /// Skip to the space after the tag and collect up to [`TEXT_LIMIT`]
    /// characters. Reading stops at CR or after the character following
    /// a full buffer, whichever comes first.
    pub fn read<S: SerialPort>(wire: &mut Wire<'_, S>) -> Result<Self, S::Error> {
        wire.skip(b' ')?;
        let mut text = Text {
            buf: [0; TEXT_LIMIT],
            len: 0,
        };
        let mut c = wire.getc()?;
        while c != b'\r' && text.len < TEXT_LIMIT {
            text.buf[text.len] = c;
            text.len += 1;
            c = wire.getc()?;
        }
        Ok(text)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// `$pBIN <decimal>\r`: print the 32-bit two's complement pattern.
pub(crate) fn decimal_to_binary<S: SerialPort>(wire: &mut Wire<'_, S>) -> Result<(), S::Error> {
    wire.skip(b' ')?;

    let mut c = wire.getc()?;
    let negative = c == b'-';
    if negative {
        c = wire.getc()?;
    }

    // Digits go through the hex decoder, so stray letters count as their
    // hex value and anything else as zero.
    let mut value = 0i32;
    while c != b'\r' {
        value = value
            .wrapping_mul(10)
            .wrapping_add(i32::from(codec::hex_value(c)));
        c = wire.getc()?;
    }
    if negative {
        value = value.wrapping_neg();
    }

    wire.putc(b'>')?;
    let bits = value as u32;
    for i in (0..32).rev() {
        wire.putc(if bits & (1 << i) != 0 { b'1' } else { b'0' })?;
    }
    if negative {
        wire.puts(" (two's complement)")?;
    }
    wire.puts("\r\n")
}

/// `$pCHK`: dump the fixed low-memory region.
pub(crate) fn checksum_dump<S, M>(
    wire: &mut Wire<'_, S>,
    memory: &M,
    config: &MonitorConfig,
) -> Result<(), S::Error>
where
    S: SerialPort,
    M: TargetMemory,
{
    let start = config.checksum_dump_address;
    let bytes = (0..config.checksum_dump_len).map(|i| memory.read_u8(start.wrapping_add(i)));
    transfer::send_bytes(wire, bytes, config.line_width)?;
    Ok(())
}

/// `$pSCH <pattern> <addr> <size>\r`: count packed matches of a 16-bit
/// pattern.
pub(crate) fn search<S, M>(wire: &mut Wire<'_, S>, memory: &M) -> Result<(), S::Error>
where
    S: SerialPort,
    M: TargetMemory,
{
    wire.skip(b' ')?;
    let mut pattern = 0u32;
    for _ in 0..4 {
        pattern = (pattern << 4) | u32::from(codec::hex_value(wire.getc()?));
    }
    wire.skip(b' ')?;
    let start = wire.read_word(b' ')?;
    let size = wire.read_word(b'\r')?;

    let count = count_packed_matches(memory, pattern, start, size);
    log::debug!("search {pattern:04x} in {start:#010x}+{size:#x}: {count}");

    write!(
        wire.port(),
        "word {pattern:04x} appears {count} times in the searched area."
    )
}

/// Count the positions in `start..start + size` whose packed value equals
/// `pattern`.
///
/// The packed value at `p` is built from the sixteen bytes `p..p + 16`:
/// each group of four contributes `m0 << 3 | m1 << 2 | m2 << 1 | m3`,
/// truncated to a byte, and the four groups form a big-endian word. The
/// window therefore reads up to fifteen bytes past the end of the range.
/// The count wraps at 256.
pub fn count_packed_matches<M: TargetMemory>(memory: &M, pattern: u32, start: u32, size: u32) -> u8 {
    let byte = |addr: u32| memory.read_u8(addr);
    let group = |addr: u32| -> u8 {
        (byte(addr) << 3)
            | (byte(addr.wrapping_add(1)) << 2)
            | (byte(addr.wrapping_add(2)) << 1)
            | byte(addr.wrapping_add(3))
    };

    let mut count = 0u8;
    for offset in 0..size {
        let p = start.wrapping_add(offset);
        let packed = (0..4).fold(0u32, |acc, k| {
            (acc << 8) | u32::from(group(p.wrapping_add(4 * k)))
        });
        if packed == pattern {
            count = count.wrapping_add(1);
        }
    }
    count
}

/// `$pECHO <text>\r`.
pub(crate) fn echo<S: SerialPort>(wire: &mut Wire<'_, S>) -> Result<(), S::Error> {
    let text = Text::read(wire)?;
    wire.putc(ACK)?;
    for &c in text.as_bytes() {
        wire.putc(c)?;
    }
    wire.puts("\r\n")
}

/// `$pMORSE <text>\r`: signal each character, echoing it as it finishes.
pub(crate) fn morse<S, L>(wire: &mut Wire<'_, S>, indicator: &mut L) -> Result<(), S::Error>
where
    S: SerialPort,
    L: Indicator,
{
    let text = Text::read(wire)?;
    wire.putc(ACK)?;
    for &c in text.as_bytes() {
        indicator.show(c);
        wire.putc(c)?;
        indicator.gap();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWindow;
    use crate::testing::Line;

    fn binary(input: &[u8]) -> String {
        let mut line = Line::with(input);
        decimal_to_binary(&mut Wire::new(&mut line)).unwrap();
        line.output().to_owned()
    }

    #[test]
    fn binary_of_positive_and_negative_numbers() {
        assert_eq!(binary(b" 5\r"), format!(">{:032b}\r\n", 5));
        assert_eq!(
            binary(b" -1\r"),
            format!(">{} (two's complement)\r\n", "1".repeat(32))
        );
        assert_eq!(binary(b" 0\r"), format!(">{}\r\n", "0".repeat(32)));
    }

    #[test]
    fn binary_wraps_past_i32() {
        // 2147483648 wraps to i32::MIN.
        assert_eq!(binary(b" 2147483648\r"), format!(">1{}\r\n", "0".repeat(31)));
    }

    #[test]
    fn packed_match_needs_leading_zero_groups() {
        // Groups of four bytes {0,0,0,1} pack to 1; {1,0,0,0} pack to 8.
        let mut ram = [0u8; 32];
        ram[11] = 1; // group 2 -> 0x01
        ram[12] = 1; // group 3 -> 0x08
        let mem = MemoryWindow::new(0, &mut ram);
        assert_eq!(count_packed_matches(&mem, 0x0108, 0, 1), 1);
        assert_eq!(count_packed_matches(&mem, 0x0108, 1, 1), 0);
        // All-zero windows match a zero pattern.
        assert_eq!(count_packed_matches(&mem, 0, 13, 4), 4);
    }

    #[test]
    fn search_reports_decimal_count() {
        let mut ram = [0u8; 64];
        let mem = MemoryWindow::new(0x100, &mut ram);
        let mut line = Line::with(b" 0000 100 c\r");
        search(&mut Wire::new(&mut line), &mem).unwrap();
        assert_eq!(line.output(), "word 0000 appears 12 times in the searched area.");
    }

    #[test]
    fn echo_stops_at_carriage_return() {
        let mut line = Line::with(b" hello world\rnext");
        echo(&mut Wire::new(&mut line)).unwrap();
        assert_eq!(line.output(), "+hello world\r\n");
        assert_eq!(line.rx, b"next");
    }

    #[test]
    fn text_is_capped() {
        let mut input = vec![b' '];
        input.extend(std::iter::repeat_n(b'a', 99));
        input.extend_from_slice(b"bc\r");
        let mut line = Line::with(&input);
        let text = Text::read(&mut Wire::new(&mut line)).unwrap();
        assert_eq!(text.as_bytes().len(), TEXT_LIMIT);
        assert!(text.as_bytes().iter().all(|&c| c == b'a'));
        assert_eq!(line.rx, b"c\r");
    }

    #[test]
    fn full_buffer_swallows_the_carriage_return() {
        let mut input = vec![b' '];
        input.extend(std::iter::repeat_n(b'x', TEXT_LIMIT));
        input.extend_from_slice(b"\rnext");
        let mut line = Line::with(&input);
        let text = Text::read(&mut Wire::new(&mut line)).unwrap();
        assert_eq!(text.as_bytes(), [b'x'; TEXT_LIMIT]);
        assert_eq!(line.rx, b"next");
    }
}
