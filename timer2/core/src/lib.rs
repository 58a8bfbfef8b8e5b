#![no_std]
#![forbid(unsafe_code)]

//! # Timer2 Core
//!
//! Core types and timing arithmetic for the Timer2 periodic timer driver.
//! Timer2 is an 8-bit up/down counter with seven clock prescalers. This crate
//! holds everything that does not touch hardware: prescaler and channel
//! tables, lifecycle states, the error taxonomy and the conversions between
//! microseconds and counter ticks.

use core::fmt;

pub mod clock;
pub mod config;
pub mod mode;
pub mod period;
pub mod state;

pub use clock::*;
pub use config::*;
pub use mode::*;
pub use period::*;
pub use state::*;

#[cfg(feature = "std")]
extern crate std;

/// Number of bits in the Timer2 counter
pub const COUNTER_BITS: u32 = 8;

/// Number of distinct counter values (2^bits)
pub const RESOLUTION: u32 = 1 << COUNTER_BITS;

/// Largest value the counter and the TOP register can hold
pub const MAX_TOP: u8 = (RESOLUTION - 1) as u8;

/// Result type used throughout the driver
pub type TimerResult<T> = Result<T, TimerError>;

/// Error types for Timer2 operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Operation is not legal in the current lifecycle state
    InvalidState(TimerState),
    /// Requested period cannot be represented; the fallback setting was applied
    PeriodOutOfRange {
        /// Requested period in microseconds
        requested: u32,
        /// Largest representable period in microseconds
        max: u32,
    },
    /// Duty cycle exceeds `RESOLUTION - 1`
    DutyOutOfRange(u16),
    /// PWM channel cannot be driven in the active counting mode
    UnsupportedChannel(PwmChannel),
    /// Output pin of a PWM channel could not be configured
    PinUnavailable(u8),
    /// No overflow callback was supplied
    MissingCallback,
    /// Clock-select holds no prescaler, so ticks cannot be converted
    ClockStopped,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidState(state) => {
                write!(f, "Operation not allowed in state {}", state)
            }
            TimerError::PeriodOutOfRange { requested, max } => {
                write!(f, "Period {}us exceeds maximum of {}us", requested, max)
            }
            TimerError::DutyOutOfRange(duty) => {
                write!(f, "Duty cycle {} exceeds {}", duty, MAX_TOP)
            }
            TimerError::UnsupportedChannel(channel) => {
                write!(f, "PWM channel {} is unusable in this counting mode", channel)
            }
            TimerError::PinUnavailable(pin) => write!(f, "Pin {} cannot be used as output", pin),
            TimerError::MissingCallback => write!(f, "No overflow callback supplied"),
            TimerError::ClockStopped => write!(f, "Timer clock is not selected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TimerError::InvalidState(state) => defmt::write!(fmt, "InvalidState({})", state),
            TimerError::PeriodOutOfRange { requested, max } => {
                defmt::write!(fmt, "PeriodOutOfRange({=u32}us > {=u32}us)", *requested, *max)
            }
            TimerError::DutyOutOfRange(duty) => defmt::write!(fmt, "DutyOutOfRange({=u16})", *duty),
            TimerError::UnsupportedChannel(channel) => {
                defmt::write!(fmt, "UnsupportedChannel({})", channel)
            }
            TimerError::PinUnavailable(pin) => defmt::write!(fmt, "PinUnavailable({=u8})", *pin),
            TimerError::MissingCallback => defmt::write!(fmt, "MissingCallback"),
            TimerError::ClockStopped => defmt::write!(fmt, "ClockStopped"),
        }
    }
}

impl embedded_hal::pwm::Error for TimerError {
    fn kind(&self) -> embedded_hal::pwm::ErrorKind {
        embedded_hal::pwm::ErrorKind::Other
    }
}
