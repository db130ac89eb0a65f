mod delay;
mod gpio;
mod interrupt;

pub use delay::SpinDelay;
pub use gpio::Bcm2835Gpio;
pub use interrupt::Bcm2835InterruptController;

use super::{MemoryMap, Platform};
use crate::hal::gpio::{Function, GpioController, PullMode};
use crate::peripheral::pl011::PL011;

pub const PERIPHERAL_BASE: usize = 0x2000_0000;
pub const UART0_BASE: usize = PERIPHERAL_BASE + 0x20_1000;

/// PL011 interrupt line (GPU IRQ 57).
pub const IRQ_UART0: u32 = 57;

pub struct Bcm2835Platform;

impl Platform for Bcm2835Platform {
    type Console = PL011;
    type Gpio = Bcm2835Gpio;
    type Delay = SpinDelay;
    type Interrupts = Bcm2835InterruptController;

    fn name() -> &'static str {
        "BCM2835 (Raspberry Pi 1/Zero)"
    }

    unsafe fn early_init() {
        // Configure GPIO pins for UART0
        let mut gpio = unsafe { Bcm2835Gpio::new() };
        gpio.set_function(14, Function::Alt0).ok(); // TX
        gpio.set_pull(14, PullMode::None).ok();
        gpio.set_function(15, Function::Alt0).ok(); // RX
        gpio.set_pull(15, PullMode::Up).ok();
    }

    fn memory_map() -> MemoryMap {
        MemoryMap {
            ram_start: 0x0000_0000,
            ram_size: 512 * 1024 * 1024,
            peripheral_base: PERIPHERAL_BASE,
            peripheral_size: 16 * 1024 * 1024,
            load_address: 0x8000,
        }
    }

    unsafe fn console() -> PL011 {
        unsafe { PL011::new(UART0_BASE) }
    }

    unsafe fn gpio() -> Bcm2835Gpio {
        unsafe { Bcm2835Gpio::new() }
    }

    unsafe fn interrupts() -> Bcm2835InterruptController {
        unsafe { Bcm2835InterruptController::new() }
    }

    fn delay() -> SpinDelay {
        SpinDelay
    }

    fn console_irq() -> u32 {
        IRQ_UART0
    }
}
