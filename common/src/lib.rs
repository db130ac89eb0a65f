//! Definitions shared by the drivers, the monitor core and the firmware.

#![cfg_attr(not(test), no_std)]

pub mod arch;
