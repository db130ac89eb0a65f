//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! These traits are implemented by the platform drivers and by the test
//! doubles of the monitor crate, so the monitor never names a register.
//!
//! # Available Interfaces
//!
//! - [`serial`]: Serial port (UART) communication and break detection
//! - [`gpio`]: General Purpose Input/Output control
//! - [`delay`]: Busy-wait delays
//! - [`interrupt`]: Interrupt controller management

pub mod delay;
pub mod gpio;
pub mod interrupt;
pub mod serial;
