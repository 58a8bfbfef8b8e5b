//! PWM on the compare channels
//!
//! Duty is given on a `0..=255` scale and written as the matching fraction of
//! TOP, so the output frequency stays tied to the programmed period.

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use timer2_core::{
    ChannelInfo, CompareOutput, PwmChannel, TimerError, TimerResult, COUNTER_BITS, MAX_TOP,
};
use timer2_hal::{PinControl, PinMode, RegisterBlock, Timer2Registers};

use crate::PeriodicTimer;

/// Last duty and output state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// Waveform output connected to the pin
    pub enabled: bool,
    /// Duty on the `0..=255` scale
    pub duty: u8,
}

/// Compare value producing `duty / 256` of a `top` period
pub(crate) fn compare_value(top: u8, duty: u8) -> u8 {
    ((u16::from(top) * u16::from(duty)) >> COUNTER_BITS) as u8
}

impl<'v, R, P> PeriodicTimer<'v, R, P>
where
    R: RegisterBlock,
    P: PinControl,
{
    /// Drive `channel` with `duty` and connect its output pin
    pub fn enable_pwm(&mut self, channel: PwmChannel, duty: u16) -> TimerResult<()> {
        let (info, duty) = self.pwm_target("enable_pwm", channel, duty)?;
        self.pins
            .set_mode(info.pin, PinMode::Output)
            .map_err(|_| TimerError::PinUnavailable(info.pin))?;

        self.regs.set_compare_output(info.compare, CompareOutput::NonInverting);
        self.regs.set_compare(info.compare, compare_value(self.setting.top, duty));
        self.store_channel(channel, true, duty);
        debug!("timer2: pwm {} enabled, duty {}", channel, duty);
        Ok(())
    }

    /// Disconnect the output of `channel`; the pin keeps its direction
    pub fn disable_pwm(&mut self, channel: PwmChannel) -> TimerResult<()> {
        self.check_state("disable_pwm", self.is_configured())?;
        let info = self.usable_channel(channel)?;

        self.regs.set_compare_output(info.compare, CompareOutput::Disconnected);
        if let Some(state) = self.pwm.get_mut(&channel) {
            state.enabled = false;
        }
        debug!("timer2: pwm {} disabled", channel);
        Ok(())
    }

    /// Change the duty of `channel` without touching its output connection
    pub fn set_pwm_duty(&mut self, channel: PwmChannel, duty: u16) -> TimerResult<()> {
        let (info, duty) = self.pwm_target("set_pwm_duty", channel, duty)?;

        self.regs.set_compare(info.compare, compare_value(self.setting.top, duty));
        let enabled = self.is_pwm_enabled(channel);
        self.store_channel(channel, enabled, duty);
        trace!("timer2: pwm {} duty {}", channel, duty);
        Ok(())
    }

    /// True when the output of `channel` is connected
    pub fn is_pwm_enabled(&self, channel: PwmChannel) -> bool {
        self.pwm.get(&channel).map_or(false, |state| state.enabled)
    }

    /// Last duty written to `channel`
    pub fn pwm_duty(&self, channel: PwmChannel) -> Option<u8> {
        self.pwm.get(&channel).map(|state| state.duty)
    }

    /// `embedded-hal` view of one channel
    ///
    /// The channel must be usable and the driver initialized. Duty changes
    /// made through the handle go through [`set_pwm_duty`](Self::set_pwm_duty).
    pub fn pwm_output(&mut self, channel: PwmChannel) -> TimerResult<PwmOutput<'_, 'v, R, P>> {
        self.check_state("pwm_output", self.is_configured())?;
        self.usable_channel(channel)?;
        Ok(PwmOutput {
            timer: self,
            channel,
        })
    }

    /// Rewrite every stored duty against the current TOP
    pub(crate) fn rescale_pwm(&mut self) {
        let top = self.setting.top;
        for (channel, state) in self.pwm.iter() {
            if let Some(info) = self.config.usable_channel(*channel) {
                self.regs.set_compare(info.compare, compare_value(top, state.duty));
            }
        }
    }

    /// Validate state, channel and duty before anything is written
    fn pwm_target(
        &self,
        operation: &'static str,
        channel: PwmChannel,
        duty: u16,
    ) -> TimerResult<(ChannelInfo, u8)> {
        self.check_state(operation, self.is_configured())?;
        let info = self.usable_channel(channel)?;
        let duty = u8::try_from(duty).map_err(|_| {
            warn!("timer2: {} duty {} above {}", operation, duty, MAX_TOP);
            TimerError::DutyOutOfRange(duty)
        })?;
        Ok((info, duty))
    }

    fn usable_channel(&self, channel: PwmChannel) -> TimerResult<ChannelInfo> {
        self.config.usable_channel(channel).copied().ok_or_else(|| {
            warn!("timer2: pwm channel {} unusable", channel);
            TimerError::UnsupportedChannel(channel)
        })
    }

    fn store_channel(&mut self, channel: PwmChannel, enabled: bool, duty: u8) {
        // Keys are `PwmChannel` variants, so the map cannot fill up.
        let _ = self.pwm.insert(channel, ChannelState { enabled, duty });
    }
}

/// One PWM channel as an [`embedded_hal::pwm::SetDutyCycle`] implementor
pub struct PwmOutput<'a, 'v, R, P> {
    timer: &'a mut PeriodicTimer<'v, R, P>,
    channel: PwmChannel,
}

impl<R, P> PwmOutput<'_, '_, R, P> {
    /// Channel this handle drives
    pub fn channel(&self) -> PwmChannel {
        self.channel
    }
}

impl<R, P> ErrorType for PwmOutput<'_, '_, R, P> {
    type Error = TimerError;
}

impl<R, P> SetDutyCycle for PwmOutput<'_, '_, R, P>
where
    R: RegisterBlock,
    P: PinControl,
{
    fn max_duty_cycle(&self) -> u16 {
        u16::from(MAX_TOP)
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.timer.set_pwm_duty(self.channel, duty)
    }
}
