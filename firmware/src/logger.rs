//! In-memory log.
//!
//! The serial line belongs to the host protocol, so records go to a
//! fixed RAM ring instead. The host reads it back with `m`; the banner
//! prints where it lives.

use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

pub const CAPACITY: usize = 4096;

struct Ring {
    buf: [u8; CAPACITY],
    next: usize,
}

impl Ring {
    const fn new() -> Self {
        Self {
            buf: [0; CAPACITY],
            next: 0,
        }
    }
}

impl Write for Ring {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.buf[self.next] = byte;
            self.next = (self.next + 1) % CAPACITY;
        }
        Ok(())
    }
}

pub struct RingLogger {
    ring: Mutex<Ring>,
}

static LOGGER: RingLogger = RingLogger {
    ring: Mutex::new(Ring::new()),
};

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Records raised while the ring is held are dropped.
        if let Some(mut ring) = self.ring.try_lock() {
            let _ = writeln!(ring, "[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Start address of the ring, and the offset the next record goes to.
pub fn position() -> (usize, usize) {
    let ring = LOGGER.ring.lock();
    (ring.buf.as_ptr() as usize, ring.next)
}
