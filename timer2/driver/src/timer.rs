//! Driver state and lifecycle

use core::convert::Infallible;

use heapless::LinearMap;
use timer2_core::{
    ClockSelect, CountDirection, PeriodSetting, PwmChannel, TimerConfig, TimerError, TimerResult,
    TimerState,
};
use timer2_hal::{OverflowCallback, OverflowVector, PinControl, RegisterBlock, Timer2Registers};

use crate::pwm::ChannelState;
use crate::readback::{direction_after, unfold};

/// One slot per [`PwmChannel`] variant
pub(crate) const PWM_SLOTS: usize = 2;

/// Periodic interrupt, PWM and readback driver for Timer2
///
/// Generic over the register backend `R` and the pin controller `P`. The
/// overflow vector is borrowed so that the interrupt handler can reach the
/// registered callback without going through the driver.
pub struct PeriodicTimer<'v, R, P> {
    pub(crate) regs: R,
    pub(crate) pins: P,
    pub(crate) vector: &'v OverflowVector,
    pub(crate) config: TimerConfig,
    pub(crate) state: TimerState,
    pub(crate) setting: PeriodSetting,
    pub(crate) pwm: LinearMap<PwmChannel, ChannelState, PWM_SLOTS>,
    pub(crate) halted_direction: CountDirection,
}

impl<'v, R, P> PeriodicTimer<'v, R, P>
where
    R: RegisterBlock,
    P: PinControl,
{
    /// Create a driver in `Uninitialized`
    ///
    /// No register is touched. Any callback left in `vector` is dropped.
    pub fn new(regs: R, pins: P, vector: &'v OverflowVector, config: TimerConfig) -> Self {
        vector.clear();
        Self {
            regs,
            pins,
            vector,
            config,
            state: TimerState::Uninitialized,
            setting: PeriodSetting {
                clock_select: ClockSelect::NoClock,
                top: 0,
            },
            pwm: LinearMap::new(),
            halted_direction: CountDirection::Up,
        }
    }

    /// Configure the unit for phase-correct counting with `period_us`
    ///
    /// Control registers are cleared, so the counter stays halted until
    /// [`start`](Self::start). An unrepresentable period still completes the
    /// transition to `Idle` with the fallback setting applied, and the range
    /// error is returned.
    pub fn init(&mut self, period_us: u32, callback: Option<OverflowCallback>) -> TimerResult<()> {
        self.check_state("init", self.state == TimerState::Uninitialized)?;

        self.regs.clear_control();
        self.regs.set_counting_mode(self.config.mode());
        let period = self.program_period(period_us);
        if let Some(callback) = callback {
            self.vector.register(callback);
        }
        self.transition(TimerState::Idle);

        info!(
            "timer2: init {}us ({}) at {}Hz",
            period_us,
            self.setting,
            self.config.clock_hz()
        );
        period
    }

    /// Reset the counter and start counting with the programmed prescaler
    ///
    /// The overflow interrupt is disabled across the reset. With a callback
    /// registered it is armed again only once the counter has left BOTTOM.
    pub fn start(&mut self) -> TimerResult<()> {
        self.check_state("start", self.state.can_start() && self.is_configured())?;

        self.regs.set_overflow_interrupt(false);
        self.regs.set_counter(0);
        self.regs.set_clock_select(self.setting.clock_select);
        if self.vector.is_registered() {
            self.arm_overflow_interrupt();
        }
        self.transition(TimerState::Running);
        Ok(())
    }

    /// Halt the counter in place and move to `Stopped`
    ///
    /// Always clears the clock-select field. When running, the direction of
    /// the halted count is worked out from the last sample taken before the
    /// halt, so a stop next to TOP or BOTTOM reads back correctly.
    ///
    /// Stopping before `init` still moves to `Stopped`, after which `init`
    /// is rejected.
    pub fn stop(&mut self) {
        match self.state {
            TimerState::Running => {
                let top = self.setting.top;
                let (_, direction, latest) = self.sample_direction();
                let reached = unfold(latest, direction, top);
                self.regs.set_clock_select(ClockSelect::NoClock);
                let halted = self.regs.counter();
                self.halted_direction = direction_after(reached, halted, top);
            }
            TimerState::Stopped => self.regs.set_clock_select(ClockSelect::NoClock),
            _ => {
                self.halted_direction = CountDirection::Up;
                self.regs.set_clock_select(ClockSelect::NoClock);
            }
        }

        if self.state != TimerState::Stopped {
            self.transition(TimerState::Stopped);
        }
    }

    /// Continue counting from the halted value
    pub fn resume(&mut self) -> TimerResult<()> {
        self.check_state("resume", self.state == TimerState::Stopped && self.is_configured())?;

        self.regs.set_clock_select(self.setting.clock_select);
        if self.vector.is_registered() && !self.regs.overflow_interrupt_enabled() {
            self.arm_overflow_interrupt();
        }
        self.transition(TimerState::Running);
        Ok(())
    }

    /// Register the overflow callback, replacing any previous one
    ///
    /// The interrupt is enabled immediately when running, otherwise on the
    /// next `start` or `resume`.
    pub fn attach_interrupt(&mut self, callback: Option<OverflowCallback>) -> TimerResult<()> {
        let Some(callback) = callback else {
            warn!("timer2: attach_interrupt without a callback");
            return Err(TimerError::MissingCallback);
        };

        self.vector.register(callback);
        if self.state == TimerState::Running {
            self.regs.set_overflow_interrupt(true);
        }
        debug!("timer2: callback attached");
        Ok(())
    }

    /// Disable the overflow interrupt and drop the callback
    pub fn detach_interrupt(&mut self) {
        self.regs.set_overflow_interrupt(false);
        self.vector.clear();
        debug!("timer2: callback detached");
    }

    /// Current lifecycle state
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Prescaler and TOP currently programmed
    pub fn setting(&self) -> PeriodSetting {
        self.setting
    }

    /// Prescaler used while running
    pub fn clock_select(&self) -> ClockSelect {
        self.setting.clock_select
    }

    /// Counter upper bound
    pub fn top(&self) -> u8 {
        self.setting.top
    }

    /// Period the programmed setting produces, in microseconds
    pub fn period(&self) -> u32 {
        self.setting.micros(self.config.clock_hz())
    }

    /// Largest period `set_period` accepts, in microseconds
    pub fn period_max(&self) -> u32 {
        self.config.period_max()
    }

    /// Build-time configuration
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// True when an overflow callback is registered
    pub fn has_callback(&self) -> bool {
        self.vector.is_registered()
    }

    /// Give back the register block and pin controller
    pub fn release(self) -> (R, P) {
        (self.regs, self.pins)
    }

    /// True once `init` has programmed a period
    ///
    /// `init` always selects a real prescaler and nothing else does before
    /// it, so a stop before `init` leaves this false.
    pub(crate) fn is_configured(&self) -> bool {
        self.state.is_initialized() && self.setting.clock_select.is_running()
    }

    pub(crate) fn check_state(&self, operation: &'static str, allowed: bool) -> TimerResult<()> {
        if allowed {
            Ok(())
        } else {
            warn!("timer2: {} rejected in state {}", operation, self.state);
            Err(TimerError::InvalidState(self.state))
        }
    }

    fn transition(&mut self, next: TimerState) {
        debug!("timer2: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Enable the overflow interrupt once the counter is off BOTTOM
    ///
    /// Arming at BOTTOM would fire an interrupt for a period that never ran.
    /// With TOP at zero the counter never leaves BOTTOM.
    fn arm_overflow_interrupt(&mut self) {
        if self.setting.top != 0 {
            nb::block!(self.counter_moved_from(0)).unwrap_or_else(|never| match never {});
        }
        self.regs.set_overflow_interrupt(true);
    }

    /// Poll for a counter value different from `previous`
    pub(crate) fn counter_moved_from(&mut self, previous: u8) -> nb::Result<u8, Infallible> {
        match self.regs.counter() {
            current if current == previous => Err(nb::Error::WouldBlock),
            current => Ok(current),
        }
    }
}
