#![no_std]
#![no_main]

mod boot;
mod config;
mod logger;
mod trap;

use config::FirmwareConfig;
use core::fmt::{self, Write};
use core::panic::PanicInfo;
use drivers::hal::gpio::{Function, GpioController};
use drivers::hal::interrupt::InterruptController;
use drivers::hal::serial::{SerialPort, SerialWriter};
use drivers::morse::MorseLed;
pub use drivers::platform::{CurrentPlatform as Platform, Platform as PlatformTrait};
use drivers::Delay;
use monitor::{MonitorContext, PhysicalMemory, RegisterFile, Signal};
use spin::Mutex;

type Console = <Platform as PlatformTrait>::Console;
type Gpio = <Platform as PlatformTrait>::Gpio;
type Interrupts = <Platform as PlatformTrait>::Interrupts;
type Led = MorseLed<Gpio, <Platform as PlatformTrait>::Delay>;

// ============================================================================
// Linker Symbols
// ============================================================================

unsafe extern "C" {
    static __program_load: u8;
    static __program_stack_top: u8;
}

// ============================================================================
// Monitor State
// ============================================================================

/// Everything the monitor needs across stops of the program.
pub struct Firmware {
    ctx: MonitorContext,
    console: Console,
    interrupts: Interrupts,
    memory: PhysicalMemory,
    led: Led,
    config: FirmwareConfig,
}

pub static FIRMWARE: Mutex<Option<Firmware>> = Mutex::new(None);

#[derive(Debug)]
enum BootError {
    Serial(<Console as SerialPort>::Error),
    Gpio(<Gpio as GpioController>::Error),
    Banner,
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::Serial(e) => write!(f, "console: {e:?}"),
            BootError::Gpio(e) => write!(f, "LED pin: {e:?}"),
            BootError::Banner => f.write_str("banner could not be written"),
        }
    }
}

// ============================================================================
// Boot
// ============================================================================

#[unsafe(no_mangle)]
pub extern "C" fn firmware_main() -> ! {
    let config = FirmwareConfig::new();
    logger::init(config.log_level);
    log::info!("booting on {}", Platform::name());

    let firmware = match bring_up(config) {
        Ok(firmware) => firmware,
        Err(e) => {
            log::error!("bring-up failed: {e}");
            halt();
        }
    };
    *FIRMWARE.lock() = Some(firmware);

    let entry = core::ptr::addr_of!(__program_load) as u32;
    // The program gets its own stack rather than the monitor's: every trap
    // entry resets the monitor stack, so sharing it would clobber the
    // program's frames.
    let stack_top = core::ptr::addr_of!(__program_stack_top) as u32;
    trap::load_initial_state(RegisterFile::reset(stack_top, entry));
    log::debug!("program area at {entry:#010x}, stack top {stack_top:#010x}");

    trap::monitor_entry(u32::from(Signal::Trap.code()))
}

fn bring_up(config: FirmwareConfig) -> Result<Firmware, BootError> {
    // SAFETY: runs once, before anything else touches the hardware.
    let (mut console, mut gpio, mut interrupts) = unsafe {
        Platform::early_init();
        (Platform::console(), Platform::gpio(), Platform::interrupts())
    };

    console.configure(config.serial).map_err(BootError::Serial)?;
    gpio.set_function(config.led_pin, Function::Output)
        .map_err(BootError::Gpio)?;

    let mut delay = Platform::delay();
    delay.delay(config.settle_delay);

    for line in config.banner {
        console.write_str(line).map_err(BootError::Serial)?;
    }
    let (log_addr, _) = logger::position();
    writeln!(
        SerialWriter(&mut console),
        "log ring at {log_addr:#010x}, {} bytes",
        logger::CAPACITY
    )
    .map_err(|_| BootError::Banner)?;

    // The break interrupt is masked at the UART until the first resume.
    let irq = Platform::console_irq();
    if let Err(e) = interrupts.enable(irq) {
        log::warn!("cannot route IRQ {irq}: {e:?}");
    }

    let map = Platform::memory_map();
    log::debug!(
        "RAM {:#x}+{:#x}, peripherals {:#x}, image at {:#x}",
        map.ram_start,
        map.ram_size,
        map.peripheral_base,
        map.load_address
    );

    Ok(Firmware {
        ctx: MonitorContext::new(RegisterFile::zeroed()),
        console,
        interrupts,
        // SAFETY: the host is trusted with the whole address space.
        memory: unsafe { PhysicalMemory::new() },
        led: MorseLed::new(gpio, delay, config.led_pin, config.morse),
        config,
    })
}

// ============================================================================
// Halting
// ============================================================================

pub fn halt() -> ! {
    loop {
        unsafe { core::arch::asm!("wfe", options(nomem, nostack, preserves_flags)) };
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    log::error!("{info}");
    halt()
}
