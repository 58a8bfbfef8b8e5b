#![no_std]
#![forbid(unsafe_code)]

//! # Timer2
//!
//! Driver for the 8-bit Timer/Counter2 running in phase-correct PWM mode.
//! One [`PeriodicTimer`] owns the register block and offers:
//!
//! - a periodic overflow interrupt with a microsecond period,
//! - PWM on the compare channel that is not used as TOP,
//! - the time elapsed within the current period.
//!
//! ```no_run
//! use timer2::{OverflowVector, PeriodicTimer, PwmChannel, TimerConfig};
//! use timer2_hal_avr::{ArduinoPins, Timer2};
//!
//! static OVERFLOW: OverflowVector = OverflowVector::new();
//!
//! fn tick() {}
//!
//! let regs = unsafe { Timer2::steal() };
//! let pins = unsafe { ArduinoPins::steal() };
//! let mut timer = PeriodicTimer::new(regs, pins, &OVERFLOW, TimerConfig::ATMEGA328P_16MHZ);
//! timer.init(1000, Some(tick)).ok();
//! timer.enable_pwm(PwmChannel::B, 128).ok();
//! timer.start().ok();
//! ```

#[macro_use]
mod fmt;

mod pwm;
mod readback;
mod settings;
mod timer;

pub use pwm::{ChannelState, PwmOutput};
pub use timer::PeriodicTimer;

pub use timer2_core::{
    ClockSelect, CountDirection, PeriodSetting, PwmChannel, TimerConfig, TimerError, TimerResult,
    TimerState,
};
pub use timer2_hal::{OverflowCallback, OverflowVector, PinControl, RegisterBlock};
