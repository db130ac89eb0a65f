//! Board configuration.

use drivers::hal::serial::SerialConfig;
use drivers::morse::MorseConfig;
use log::LevelFilter;
use monitor::MonitorConfig;

cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2835")] {
        /// Green ACT LED on the Pi 1 B+/A+ and Zero.
        const ACT_LED: u8 = 47;
    }
}

pub struct FirmwareConfig {
    pub serial: SerialConfig,
    pub led_pin: u8,
    pub morse: MorseConfig,
    pub monitor: MonitorConfig,
    pub log_level: LevelFilter,
    /// Spin count between bring-up and the banner.
    pub settle_delay: u32,
    pub banner: &'static [&'static str],
}

impl FirmwareConfig {
    pub const fn new() -> Self {
        Self {
            serial: SerialConfig::new_8n1(115_200),
            led_pin: ACT_LED,
            morse: MorseConfig::new(1_000_000),
            monitor: MonitorConfig::new(),
            log_level: LevelFilter::Debug,
            settle_delay: 100,
            banner: &[
                "PiCLIs - Raspberry Pi CLI!\r\n",
                "by Henrique Murakami, Italo Lui and Rafael Tamasi\r\n",
            ],
        }
    }
}
