//! ATmega328P HAL implementation
//!
//! Memory-mapped implementation of the Timer2 HAL traits for the ATmega328P
//! (Arduino Uno, Nano, Pro Mini). Register accesses are single volatile byte
//! loads and stores at the chip's data-space addresses.
//!
//! ## Example
//! ```no_run
//! use timer2_hal::{PinControl, PinMode, Timer2Registers};
//! use timer2_hal_avr::{ArduinoPins, Timer2};
//!
//! let mut regs = unsafe { Timer2::steal() };
//! let mut pins = unsafe { ArduinoPins::steal() };
//! pins.set_mode(3, PinMode::Output).unwrap();
//! let count = regs.counter();
//! ```

#![no_std]

pub mod gpio;
pub mod timer;

// Re-export commonly used types
pub use gpio::ArduinoPins;
pub use timer::Timer2;
