//! Monitor tunables.

/// Longest free-text payload (`$pECHO`, `$pMORSE`) the monitor buffers.
/// The character after a full buffer is dropped; the rest stays in the
/// stream.
pub const TEXT_LIMIT: usize = 99;

/// Knobs of the command loop and its replies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Encoded bytes per line in hex dumps before a line break.
    pub line_width: usize,
    /// Start of the region dumped by `$pCHK`.
    pub checksum_dump_address: u32,
    /// Length of the region dumped by `$pCHK`.
    pub checksum_dump_len: u32,
    /// Emitted before reading every command.
    pub prompt: &'static str,
}

impl MonitorConfig {
    pub const fn new() -> Self {
        Self {
            line_width: 15,
            checksum_dump_address: 400,
            checksum_dump_len: 32,
            prompt: "\r\n> ",
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}
