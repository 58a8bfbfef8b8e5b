//! Pin direction control used when a PWM channel is enabled

use crate::error::HalResult;

/// GPIO pin modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input (floating)
    Input,
    /// Output (push-pull), required for the compare unit to drive the pin
    Output,
}

/// Digital pin capability
pub trait PinControl {
    /// Configure the direction of `pin`
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> HalResult<()>;
}

impl<T: PinControl + ?Sized> PinControl for &mut T {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> HalResult<()> {
        T::set_mode(self, pin, mode)
    }
}
