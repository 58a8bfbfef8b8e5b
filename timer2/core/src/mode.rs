//! Counting mode, compare units and PWM channel table

use core::fmt;

/// Output compare unit of Timer2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareUnit {
    /// OCR2A / OC2A
    A,
    /// OCR2B / OC2B
    B,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CompareUnit {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CompareUnit::A => defmt::write!(fmt, "A"),
            CompareUnit::B => defmt::write!(fmt, "B"),
        }
    }
}

/// Compare output mode of a unit (COM2x1:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOutput {
    /// Normal port operation, OC2x disconnected
    Disconnected,
    /// Clear OC2x on match when up-counting, set when down-counting
    NonInverting,
}

impl CompareOutput {
    /// Raw two-bit COM2x field value
    pub const fn bits(self) -> u8 {
        match self {
            CompareOutput::Disconnected => 0b00,
            CompareOutput::NonInverting => 0b10,
        }
    }
}

/// Waveform generation mode of the counter
///
/// Only the symmetric up/down mode is supported. The enum exists so the TOP
/// register and mode bits are looked up from one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingMode {
    /// Mode 5: phase-correct PWM, TOP = OCR2A, overflow at BOTTOM
    PhaseCorrect,
}

impl CountingMode {
    /// Compare unit whose register holds the TOP value in this mode
    pub const fn top_register(self) -> CompareUnit {
        match self {
            CountingMode::PhaseCorrect => CompareUnit::A,
        }
    }

    /// WGM22:0 bits
    pub const fn wgm_bits(self) -> u8 {
        match self {
            CountingMode::PhaseCorrect => 0b101,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CountingMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CountingMode::PhaseCorrect => defmt::write!(fmt, "PhaseCorrect"),
        }
    }
}

/// PWM output channel of Timer2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PwmChannel {
    /// Channel A (OC2A)
    A,
    /// Channel B (OC2B)
    B,
}

impl fmt::Display for PwmChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmChannel::A => write!(f, "A"),
            PwmChannel::B => write!(f, "B"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmChannel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PwmChannel::A => defmt::write!(fmt, "A"),
            PwmChannel::B => defmt::write!(fmt, "B"),
        }
    }
}

/// One row of the channel table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel identifier
    pub channel: PwmChannel,
    /// Compare unit driving the channel
    pub compare: CompareUnit,
    /// Output pin driven by the compare unit
    pub pin: u8,
}

impl ChannelInfo {
    /// Create a table row
    pub const fn new(channel: PwmChannel, compare: CompareUnit, pin: u8) -> Self {
        Self { channel, compare, pin }
    }

    /// A channel is usable unless its compare register is the mode's TOP
    pub const fn usable_in(&self, mode: CountingMode) -> bool {
        !matches!(
            (self.compare, mode.top_register()),
            (CompareUnit::A, CompareUnit::A) | (CompareUnit::B, CompareUnit::B)
        )
    }
}

/// Channel table of the ATmega328P (Arduino Uno/Nano pin numbering)
pub const ATMEGA328P_CHANNELS: [ChannelInfo; 2] = [
    ChannelInfo::new(PwmChannel::A, CompareUnit::A, 11),
    ChannelInfo::new(PwmChannel::B, CompareUnit::B, 3),
];
