//! Hardware Driver Subsystem
//!
//! This crate provides the hardware layer the debug monitor is built on:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions (serial, GPIO, delay,
//!   interrupt controller)
//! - [`morse`]: Morse-code LED signalling on top of the GPIO and delay traits
//! - [`peripheral`]: Reusable peripheral drivers (PL011 UART)
//! - [`platform`]: SoC-level drivers, selected by Cargo feature
//!
//! # Usage Example
//!
//! ```no_run
//! use drivers::hal::serial::{SerialConfig, SerialPort};
//! use drivers::peripheral::pl011::PL011;
//!
//! let mut uart = unsafe { PL011::new(0x2020_1000) };
//! uart.configure(SerialConfig::default()).ok();
//! uart.write(b"> ").ok();
//! ```

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod morse;
pub mod peripheral;
pub mod platform;

// Re-export commonly used types
pub use hal::delay::Delay;
pub use hal::gpio::{Function, GpioController, PinLevel, PullMode};
pub use hal::interrupt::InterruptController;
pub use hal::serial::{BreakDetect, SerialConfig, SerialPort};
