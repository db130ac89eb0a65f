//! Scripted host link and sparse target memory for protocol tests.

#![allow(dead_code)]

use drivers::hal::serial::{BreakDetect, SerialConfig, SerialError, SerialPort};
use monitor::indicator::Indicator;
use monitor::memory::TargetMemory;
use monitor::{MonitorConfig, MonitorContext, MonitorError, RegisterFile, Resume, Signal};
use std::collections::{BTreeMap, VecDeque};

pub const LOAD_ADDRESS: u32 = 0x8000;
pub const STACK_TOP: u32 = 0x8000;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host side of the serial line. Input runs out with [`SerialError::Closed`],
/// which ends a session.
#[derive(Debug, Default)]
pub struct HostLink {
    input: VecDeque<u8>,
    output: Vec<u8>,
    pub break_detect: bool,
}

impl HostLink {
    pub fn new(script: &str) -> Self {
        Self {
            input: script.bytes().collect(),
            ..Self::default()
        }
    }

    pub fn send(&mut self, script: &str) {
        self.input.extend(script.bytes());
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Everything the monitor wrote so far, cleared.
    pub fn take_output(&mut self) -> String {
        String::from_utf8(std::mem::take(&mut self.output)).expect("monitor output is ASCII")
    }
}

impl SerialPort for HostLink {
    type Error = SerialError;

    fn configure(&mut self, _config: SerialConfig) -> Result<(), SerialError> {
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), SerialError> {
        self.output.push(byte);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, SerialError> {
        self.input.pop_front().ok_or(SerialError::Closed)
    }

    fn flush(&mut self) -> Result<(), SerialError> {
        Ok(())
    }
}

impl BreakDetect for HostLink {
    fn enable_break_detect(&mut self) {
        self.break_detect = true;
    }

    fn disable_break_detect(&mut self) {
        self.break_detect = false;
    }
}

/// Byte-addressed memory where unwritten addresses read as zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SparseMemory {
    bytes: BTreeMap<u32, u8>,
    pub syncs: usize,
}

impl SparseMemory {
    pub fn with_words(words: &[(u32, u32)]) -> Self {
        let mut memory = Self::default();
        for &(addr, value) in words {
            memory.write_u32(addr, value);
        }
        memory.syncs = 0;
        memory
    }

    pub fn fill(&mut self, addr: u32, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.write_u8(addr + offset as u32, byte);
        }
    }

    /// Contents ignoring sync bookkeeping.
    pub fn snapshot(&self) -> BTreeMap<u32, u8> {
        self.bytes.clone()
    }
}

impl TargetMemory for SparseMemory {
    fn read_u8(&self, addr: u32) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        self.bytes.insert(addr, value);
    }

    fn read_u32(&self, addr: u32) -> u32 {
        u32::from_le_bytes(std::array::from_fn(|i| self.read_u8(addr + i as u32)))
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_u8(addr + i as u32, byte);
        }
    }

    fn sync_instructions(&mut self) {
        self.syncs += 1;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Blink {
    Show(u8),
    Gap,
}

/// Records what would have been shown on the LED.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    pub events: Vec<Blink>,
}

impl Indicator for RecordingIndicator {
    fn show(&mut self, c: u8) {
        self.events.push(Blink::Show(c));
    }

    fn gap(&mut self) {
        self.events.push(Blink::Gap);
    }
}

/// Monitor plus the hardware it talks to.
pub struct Target {
    pub ctx: MonitorContext,
    pub link: HostLink,
    pub memory: SparseMemory,
    pub indicator: RecordingIndicator,
    pub config: MonitorConfig,
}

impl Target {
    pub fn boot(memory: SparseMemory) -> Self {
        init_logging();
        Self {
            ctx: MonitorContext::new(RegisterFile::reset(STACK_TOP, LOAD_ADDRESS)),
            link: HostLink::default(),
            memory,
            indicator: RecordingIndicator::default(),
            config: MonitorConfig::default(),
        }
    }

    /// Feed `script` and enter the monitor as the program stopping with
    /// `signal`. Runs until a command resumes or the script runs out.
    pub fn enter(&mut self, signal: Signal, script: &str) -> Result<Resume, MonitorError<SerialError>> {
        self.link.send(script);
        monitor::enter(
            &mut self.ctx,
            signal,
            &mut self.link,
            &mut self.memory,
            &mut self.indicator,
            &self.config,
        )
    }

    /// Run `script` to exhaustion and return what the monitor wrote.
    pub fn session(&mut self, script: &str) -> String {
        let result = self.enter(Signal::Trap, script);
        assert_eq!(result, Err(MonitorError::Transport(SerialError::Closed)));
        self.link.take_output()
    }
}
