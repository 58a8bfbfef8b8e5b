//! Build-time configuration of the timer unit

pub use embedded_time::rate::Hertz;

use crate::mode::{ChannelInfo, CountingMode, PwmChannel, ATMEGA328P_CHANNELS};
use crate::period::period_max;

/// Static description of one Timer2 unit
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    clock: Hertz<u32>,
    mode: CountingMode,
    channels: &'static [ChannelInfo],
}

impl TimerConfig {
    /// Lowest supported system clock
    pub const MIN_CLOCK_HZ: u32 = 1_000_000;

    /// Arduino Uno / Nano at 16 MHz
    pub const ATMEGA328P_16MHZ: TimerConfig = TimerConfig::new(Hertz(16_000_000));

    /// 3.3 V Pro Mini at 8 MHz
    pub const ATMEGA328P_8MHZ: TimerConfig = TimerConfig::new(Hertz(8_000_000));

    /// Create a configuration with the ATmega328P channel table
    ///
    /// # Panics
    ///
    /// Panics when `clock` is below 1 MHz. Used in a `const` item this is a
    /// compile error.
    pub const fn new(clock: Hertz<u32>) -> Self {
        assert!(clock.0 >= Self::MIN_CLOCK_HZ, "timer clock must be at least 1 MHz");
        Self {
            clock,
            mode: CountingMode::PhaseCorrect,
            channels: &ATMEGA328P_CHANNELS,
        }
    }

    /// Replace the channel table
    pub const fn with_channels(mut self, channels: &'static [ChannelInfo]) -> Self {
        self.channels = channels;
        self
    }

    /// System clock feeding the prescaler
    pub const fn clock(&self) -> Hertz<u32> {
        self.clock
    }

    /// System clock in hertz
    pub const fn clock_hz(&self) -> u32 {
        self.clock.0
    }

    /// Counting mode programmed by `init`
    pub const fn mode(&self) -> CountingMode {
        self.mode
    }

    /// Largest representable period in microseconds
    pub const fn period_max(&self) -> u32 {
        period_max(self.clock.0)
    }

    /// Table row for `channel`, if the unit has it at all
    pub fn channel(&self, channel: PwmChannel) -> Option<&ChannelInfo> {
        self.channels.iter().find(|info| info.channel == channel)
    }

    /// Table row for `channel` if it can be driven in the counting mode
    pub fn usable_channel(&self, channel: PwmChannel) -> Option<&ChannelInfo> {
        self.channel(channel).filter(|info| info.usable_in(self.mode))
    }

    /// Whole channel table
    pub fn channels(&self) -> &'static [ChannelInfo] {
        self.channels
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::ATMEGA328P_16MHZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_16mhz() {
        assert_eq!(TimerConfig::default().clock_hz(), 16_000_000);
    }

    #[test]
    fn test_usable_channel_lookup() {
        let config = TimerConfig::ATMEGA328P_16MHZ;
        assert!(config.channel(PwmChannel::A).is_some());
        assert!(config.usable_channel(PwmChannel::A).is_none());
        assert_eq!(config.usable_channel(PwmChannel::B).map(|c| c.pin), Some(3));
    }

    #[test]
    fn test_custom_channel_table() {
        static ONLY_B: [ChannelInfo; 1] =
            [ChannelInfo::new(PwmChannel::B, crate::CompareUnit::B, 5)];
        let config = TimerConfig::ATMEGA328P_16MHZ.with_channels(&ONLY_B);
        assert!(config.channel(PwmChannel::A).is_none());
        assert_eq!(config.usable_channel(PwmChannel::B).map(|c| c.pin), Some(5));
    }

    #[test]
    #[should_panic]
    fn test_slow_clock_rejected() {
        let _ = TimerConfig::new(Hertz(500_000));
    }
}
