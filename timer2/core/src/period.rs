//! Conversions between microseconds, prescaler selection and counter ticks
//!
//! In phase-correct mode the counter sweeps BOTTOM -> TOP -> BOTTOM and the
//! overflow interrupt fires once per round trip, so one period is two
//! half-sweeps of `cycles` clock ticks each.

use core::fmt;

use crate::clock::ClockSelect;
use crate::{MAX_TOP, RESOLUTION};

const MICROS_PER_HALF_SWEEP: u64 = 2_000_000;

/// Prescaler and TOP value programmed for a period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSetting {
    /// Prescaler written to the clock-select field while running
    pub clock_select: ClockSelect,
    /// Counter upper bound
    pub top: u8,
}

impl PeriodSetting {
    /// Setting used when the requested period cannot be represented
    pub const FALLBACK: PeriodSetting = PeriodSetting {
        clock_select: ClockSelect::MAX,
        top: MAX_TOP,
    };

    /// Period in microseconds this setting produces at `clock_hz`
    pub fn micros(&self, clock_hz: u32) -> u32 {
        let shift = self.clock_select.shift().unwrap_or(0);
        let cycles = u64::from(self.top) << shift;
        (cycles * MICROS_PER_HALF_SWEEP / u64::from(clock_hz)) as u32
    }
}

impl fmt::Display for PeriodSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} top={}", self.clock_select, self.top)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeriodSetting {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} top={=u8}", self.clock_select, self.top);
    }
}

/// Outcome of fitting a period into the prescaler table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFit {
    /// The period is represented to within one prescaled tick
    Exact(PeriodSetting),
    /// The period is too long; the fallback setting is returned
    Clamped(PeriodSetting),
}

impl PeriodFit {
    /// Setting to program regardless of the outcome
    pub const fn setting(&self) -> PeriodSetting {
        match self {
            PeriodFit::Exact(setting) | PeriodFit::Clamped(setting) => *setting,
        }
    }

    /// True when the requested period was honored
    pub const fn is_exact(&self) -> bool {
        matches!(self, PeriodFit::Exact(_))
    }
}

/// Clock ticks of one half-sweep for a period of `micros`
pub fn half_period_cycles(clock_hz: u32, micros: u32) -> u64 {
    u64::from(clock_hz) * u64::from(micros) / MICROS_PER_HALF_SWEEP
}

/// Pick the finest prescaler whose scaled cycle count fits the counter
pub fn fit_period(clock_hz: u32, micros: u32) -> PeriodFit {
    let cycles = half_period_cycles(clock_hz, micros);
    ClockSelect::PRESCALED
        .iter()
        .find_map(|&clock_select| {
            let shift = clock_select.shift()?;
            let scaled = cycles >> shift;
            (scaled < u64::from(RESOLUTION)).then(|| PeriodSetting {
                clock_select,
                top: scaled as u8,
            })
        })
        .map_or(PeriodFit::Clamped(PeriodSetting::FALLBACK), PeriodFit::Exact)
}

/// Largest period in microseconds that `fit_period` represents exactly
pub const fn period_max(clock_hz: u32) -> u32 {
    let limit = RESOLUTION as u64 * 1024 * MICROS_PER_HALF_SWEEP;
    let clock = clock_hz as u64;
    ((limit + clock - 1) / clock - 1) as u32
}

/// Convert a linearized tick count to microseconds
///
/// Multiplies by 1000 before dividing by the clock in kHz and only then scales
/// by the prescaler, matching the register-level readback of the hardware.
pub fn ticks_to_micros(ticks: u32, clock_hz: u32, clock_select: ClockSelect) -> Option<u32> {
    let shift = clock_select.shift()?;
    let clock_khz = u64::from(clock_hz / 1_000);
    Some((((u64::from(ticks) * 1_000) / clock_khz) << shift) as u32)
}
