//! ATmega328P pin direction control with Arduino pin numbering

use core::ptr::{read_volatile, write_volatile};

use timer2_hal::{HalError, HalResult, PinControl, PinMode};

/// DDRB data-space address
pub const DDRB: usize = 0x24;
/// DDRC data-space address
pub const DDRC: usize = 0x27;
/// DDRD data-space address
pub const DDRD: usize = 0x2A;

/// Data direction register and bit of an Arduino pin
fn direction_bit(pin: u8) -> HalResult<(usize, u8)> {
    match pin {
        0..=7 => Ok((DDRD, pin)),
        8..=13 => Ok((DDRB, pin - 8)),
        14..=19 => Ok((DDRC, pin - 14)),
        _ => Err(HalError::InvalidPin(pin)),
    }
}

/// Exclusive handle to the data direction registers
#[derive(Debug)]
pub struct ArduinoPins {
    _private: (),
}

impl ArduinoPins {
    /// Create the handle.
    ///
    /// # Safety
    ///
    /// No other code may modify DDRB, DDRC or DDRD outside a critical section.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl PinControl for ArduinoPins {
    fn set_mode(&mut self, pin: u8, mode: PinMode) -> HalResult<()> {
        let (ddr, bit) = direction_bit(pin)?;
        let ddr = ddr as *mut u8;
        critical_section::with(|_| {
            // SAFETY: DDRx is a valid I/O location and the update runs with interrupts masked
            unsafe {
                let value = read_volatile(ddr);
                let value = match mode {
                    PinMode::Output => value | (1 << bit),
                    PinMode::Input => value & !(1 << bit),
                };
                write_volatile(ddr, value);
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_pins_map_to_ports() {
        // OC2A is PB3 (pin 11), OC2B is PD3 (pin 3)
        assert_eq!(direction_bit(11), Ok((DDRB, 3)));
        assert_eq!(direction_bit(3), Ok((DDRD, 3)));
        assert_eq!(direction_bit(14), Ok((DDRC, 0)));
    }

    #[test]
    fn test_invalid_pin() {
        assert_eq!(direction_bit(20), Err(HalError::InvalidPin(20)));
    }
}
