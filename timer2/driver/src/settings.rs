//! Period programming

use timer2_core::{fit_period, PeriodFit, TimerError, TimerResult, TimerState};
use timer2_hal::{PinControl, RegisterBlock, Timer2Registers};

use crate::PeriodicTimer;

impl<'v, R, P> PeriodicTimer<'v, R, P>
where
    R: RegisterBlock,
    P: PinControl,
{
    /// Program the overflow period in microseconds
    ///
    /// Picks the finest prescaler whose TOP fits in eight bits and writes TOP.
    /// The clock-select field is only touched while running; otherwise the
    /// prescaler is applied on the next `start`. Enabled PWM channels keep
    /// their duty as a fraction of the new TOP.
    ///
    /// When `period_us` exceeds [`period_max`](Self::period_max) the coarsest
    /// prescaler with TOP 255 is programmed and
    /// [`TimerError::PeriodOutOfRange`] is returned.
    ///
    /// Rejected with [`TimerError::InvalidState`] until `init` has run; the
    /// first period is the one given to `init`.
    pub fn set_period(&mut self, period_us: u32) -> TimerResult<()> {
        self.check_state("set_period", self.is_configured())?;
        self.program_period(period_us)
    }

    pub(crate) fn program_period(&mut self, period_us: u32) -> TimerResult<()> {
        let fit = fit_period(self.config.clock_hz(), period_us);
        let setting = fit.setting();

        self.setting = setting;
        self.regs.set_compare(self.config.mode().top_register(), setting.top);
        if self.state == TimerState::Running {
            self.regs.set_clock_select(setting.clock_select);
        }
        self.rescale_pwm();

        match fit {
            PeriodFit::Exact(_) => {
                debug!("timer2: period {}us -> {}", period_us, setting);
                Ok(())
            }
            PeriodFit::Clamped(_) => {
                let max = self.config.period_max();
                warn!("timer2: period {}us above {}us, using {}", period_us, max, setting);
                Err(TimerError::PeriodOutOfRange {
                    requested: period_us,
                    max,
                })
            }
        }
    }
}
