//! Output side: the digital potentiometer wired into the head unit's key input.

/// Digitally-controlled potentiometer.
///
/// The core never reads a result back; drivers clamp or quantise `ohms` to
/// their wiper steps as they see fit.
pub trait Potentiometer {
    fn set_resistance(&mut self, ohms: u32);
}

impl<P: Potentiometer + ?Sized> Potentiometer for &mut P {
    fn set_resistance(&mut self, ohms: u32) {
        (**self).set_resistance(ohms)
    }
}
