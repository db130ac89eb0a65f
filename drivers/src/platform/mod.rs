//! SoC support.
//!
//! A [`Platform`] names the concrete console, GPIO, delay and interrupt
//! drivers of one SoC and hands out their handles. The firmware picks one
//! through [`CurrentPlatform`] at build time.
//!
//! ```ignore
//! use drivers::platform::{CurrentPlatform as Platform, Platform as PlatformTrait};
//!
//! unsafe { Platform::early_init() };
//! let mut console = unsafe { Platform::console() };
//! ```

use crate::hal::delay::Delay;
use crate::hal::gpio::GpioController;
use crate::hal::interrupt::InterruptController;
use crate::hal::serial::BreakDetect;

/// Fixed address layout of the SoC.
#[derive(Debug, Clone, Copy)]
pub struct MemoryMap {
    pub ram_start: usize,
    pub ram_size: usize,
    pub peripheral_base: usize,
    pub peripheral_size: usize,
    /// Where the boot loader places the firmware image.
    pub load_address: usize,
}

/// Drivers and fixed facts of one SoC.
///
/// The handle constructors are `unsafe` because the drivers assume
/// exclusive ownership of their register blocks; each may only be called
/// once.
pub trait Platform {
    type Console: BreakDetect;
    /// Drives the status LED.
    type Gpio: GpioController<Pin = u8>;
    type Delay: Delay;
    type Interrupts: InterruptController;

    fn name() -> &'static str;

    /// Pin muxing the console needs before it is configured.
    ///
    /// # Safety
    /// Once, before any handle is created.
    unsafe fn early_init();

    fn memory_map() -> MemoryMap;

    /// # Safety
    /// See the trait documentation.
    unsafe fn console() -> Self::Console;

    /// # Safety
    /// See the trait documentation.
    unsafe fn gpio() -> Self::Gpio;

    /// # Safety
    /// See the trait documentation.
    unsafe fn interrupts() -> Self::Interrupts;

    fn delay() -> Self::Delay;

    /// Interrupt controller line of the console UART.
    fn console_irq() -> u32;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2835")] {
        pub mod bcm2835;
        pub use bcm2835::Bcm2835Platform as CurrentPlatform;
    } else {
        compile_error!("no SoC selected; enable the `bcm2835` feature");
    }
}
