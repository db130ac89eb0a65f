//! Interrupt routing.
//!
//! The monitor takes a single interrupt, the console's line break, so the
//! controller interface is limited to unmasking a line and finding out
//! which one fired.

/// Controller line number.
pub type IrqNumber = u32;

/// A controller that can route individual lines to the IRQ exception.
pub trait InterruptController {
    type Error: core::fmt::Debug;

    /// Route `irq` to the core.
    fn enable(&mut self, irq: IrqNumber) -> Result<(), Self::Error>;

    /// Lowest-numbered line currently asserted.
    fn next_pending(&self) -> Option<IrqNumber>;
}
