//! Peripheral blocks shared between SoCs.
//!
//! [`pl011`] is the UART the monitor talks to the host over.

pub mod pl011;
