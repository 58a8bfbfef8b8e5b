//! ATmega328P Timer/Counter2 registers

use core::ptr::{read_volatile, write_volatile};

use timer2_hal::{Register, RegisterBlock};

/// TCCR2A data-space address
pub const TCCR2A: usize = 0xB0;
/// TCCR2B data-space address
pub const TCCR2B: usize = 0xB1;
/// TCNT2 data-space address
pub const TCNT2: usize = 0xB2;
/// OCR2A data-space address
pub const OCR2A: usize = 0xB3;
/// OCR2B data-space address
pub const OCR2B: usize = 0xB4;
/// TIMSK2 data-space address
pub const TIMSK2: usize = 0x70;
/// TIFR2 data-space address
pub const TIFR2: usize = 0x37;

#[inline(always)]
fn address(register: Register) -> *mut u8 {
    let addr = match register {
        Register::ControlA => TCCR2A,
        Register::ControlB => TCCR2B,
        Register::Counter => TCNT2,
        Register::CompareA => OCR2A,
        Register::CompareB => OCR2B,
        Register::InterruptMask => TIMSK2,
        Register::InterruptFlags => TIFR2,
    };
    addr as *mut u8
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// Exclusive handle to Timer/Counter2
#[derive(Debug)]
pub struct Timer2 {
    _private: (),
}

impl Timer2 {
    /// Create the handle.
    ///
    /// # Safety
    ///
    /// Only one handle may exist, and the code must run on an ATmega328P where
    /// the Timer2 registers are mapped at the addresses above.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl RegisterBlock for Timer2 {
    fn read(&mut self, register: Register) -> u8 {
        // SAFETY: the handle owns the register and the address is a valid I/O location
        unsafe { read_volatile(address(register)) }
    }

    fn write(&mut self, register: Register, value: u8) {
        // SAFETY: see `read`
        unsafe { write_volatile(address(register), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_addresses() {
        assert_eq!(address(Register::ControlA) as usize, 0xB0);
        assert_eq!(address(Register::Counter) as usize, 0xB2);
        assert_eq!(address(Register::CompareB) as usize, 0xB4);
        assert_eq!(address(Register::InterruptMask) as usize, 0x70);
        assert_eq!(address(Register::InterruptFlags) as usize, 0x37);
    }
}
