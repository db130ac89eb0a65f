use crate::hal::delay::Delay;

/// Counts down in a `nop` loop; one count is a handful of cycles.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl Delay for SpinDelay {
    fn delay(&mut self, count: u32) {
        delay_cycles(count)
    }
}

/// Simple busy-wait delay loop.
///
/// This is used for short hardware timing requirements and
/// provides no guarantees about real-time accuracy.
#[inline(always)]
pub(crate) fn delay_cycles(mut count: u32) {
    while count != 0 {
        unsafe { core::arch::asm!("nop", options(nomem, nostack, preserves_flags)) };
        count -= 1;
    }
}
