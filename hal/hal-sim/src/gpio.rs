//! Simulated pin direction registers

use std::sync::{Arc, Mutex};

use timer2_hal::{HalError, HalResult, PinControl, PinMode};

/// Number of Arduino pins modelled (D0-D13, A0-A5)
pub const PIN_COUNT: usize = 20;

/// Shared handle to simulated pin directions
#[derive(Clone, Default)]
pub struct SimPins {
    modes: Arc<Mutex<[Option<PinMode>; PIN_COUNT]>>,
}

impl SimPins {
    /// Create pins that have never been configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode last configured for `pin`
    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        let modes = self.modes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        modes.get(usize::from(pin)).copied().flatten()
    }
}

impl PinControl for SimPins {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> HalResult<()> {
        let mut modes = self.modes.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let slot = modes
            .get_mut(usize::from(pin))
            .ok_or(HalError::InvalidPin(pin))?;
        *slot = Some(mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_query_mode() {
        let mut pins = SimPins::new();
        assert_eq!(pins.mode(3), None);
        pins.set_mode(3, PinMode::Output).unwrap();
        assert_eq!(pins.mode(3), Some(PinMode::Output));
    }

    #[test]
    fn test_unknown_pin() {
        let mut pins = SimPins::new();
        assert_eq!(pins.set_mode(42, PinMode::Output), Err(HalError::InvalidPin(42)));
    }
}
