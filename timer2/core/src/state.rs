//! Lifecycle states and counting direction

use core::fmt;

/// Lifecycle state of the driver
///
/// `Uninitialized -> Idle -> Running <-> Stopped`. There is no way back to
/// `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Constructed, `init` not yet called
    Uninitialized,
    /// Configured, counter not started
    Idle,
    /// Counter ticking
    Running,
    /// Counter halted in place
    Stopped,
}

impl TimerState {
    /// True once `init` has run
    pub const fn is_initialized(self) -> bool {
        !matches!(self, TimerState::Uninitialized)
    }

    /// True when the counter holds a meaningful value
    pub const fn has_count(self) -> bool {
        matches!(self, TimerState::Running | TimerState::Stopped)
    }

    /// True when `start` may be called
    pub const fn can_start(self) -> bool {
        matches!(self, TimerState::Idle | TimerState::Stopped)
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerState::Uninitialized => write!(f, "Uninitialized"),
            TimerState::Idle => write!(f, "Idle"),
            TimerState::Running => write!(f, "Running"),
            TimerState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TimerState::Uninitialized => defmt::write!(fmt, "Uninitialized"),
            TimerState::Idle => defmt::write!(fmt, "Idle"),
            TimerState::Running => defmt::write!(fmt, "Running"),
            TimerState::Stopped => defmt::write!(fmt, "Stopped"),
        }
    }
}

/// Direction the triangle counter is moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDirection {
    /// BOTTOM towards TOP
    Up,
    /// TOP towards BOTTOM
    Down,
}

impl CountDirection {
    /// Direction implied by two consecutive, different samples
    pub fn from_samples(first: u8, second: u8) -> Self {
        if second < first {
            CountDirection::Down
        } else {
            CountDirection::Up
        }
    }
}

impl fmt::Display for CountDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountDirection::Up => write!(f, "up"),
            CountDirection::Down => write!(f, "down"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CountDirection {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CountDirection::Up => defmt::write!(fmt, "Up"),
            CountDirection::Down => defmt::write!(fmt, "Down"),
        }
    }
}
