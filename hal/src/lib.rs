//! Hardware Abstraction Layer (HAL) for the Timer2 driver
//!
//! This crate describes the hardware the driver consumes, without tying it to
//! a particular chip or to real hardware at all:
//! - [`registers`]: raw register access plus named bit-field accessors
//! - [`gpio`]: pin direction control for PWM outputs
//! - [`interrupt`]: the overflow vector slot invoked from interrupt context
//!
//! Vendor crates (`timer2-hal-avr`, `timer2-hal-sim`) implement the traits.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod gpio;
pub mod interrupt;
pub mod registers;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use gpio::{PinControl, PinMode};
pub use interrupt::{OverflowCallback, OverflowVector};
pub use registers::{Register, RegisterBlock, Timer2Registers};
