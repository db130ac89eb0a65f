//! Visual output for the `$pMORSE` command.

use drivers::hal::delay::Delay;
use drivers::hal::gpio::GpioController;
use drivers::morse::MorseLed;

/// Something that can show characters to a person standing next to the
/// board.
pub trait Indicator {
    /// Signal one character. Characters without an encoding show nothing.
    fn show(&mut self, c: u8);

    /// Pause between two characters.
    fn gap(&mut self);
}

impl<L: Indicator + ?Sized> Indicator for &mut L {
    fn show(&mut self, c: u8) {
        (**self).show(c)
    }

    fn gap(&mut self) {
        (**self).gap()
    }
}

// A failing LED must not take the debug link down with it.
impl<G: GpioController, D: Delay> Indicator for MorseLed<G, D> {
    fn show(&mut self, c: u8) {
        if let Err(e) = self.blink_char(c) {
            log::warn!("morse LED: {e:?}");
        }
    }

    fn gap(&mut self) {
        if let Err(e) = self.letter_gap() {
            log::warn!("morse LED: {e:?}");
        }
    }
}
