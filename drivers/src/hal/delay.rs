//! Busy-wait delay Hardware Abstraction Layer.

/// Busy-wait delay source.
///
/// The unit is whatever the implementation counts: loop iterations for a
/// spin delay, microseconds for a timer-backed one. Callers that only need
/// relative timing (Morse pulses, settling times) stay unit-agnostic.
pub trait Delay {
    /// Block for `count` units.
    fn delay(&mut self, count: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay(&mut self, count: u32) {
        (**self).delay(count)
    }
}
