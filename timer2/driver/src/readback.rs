//! Elapsed time within the current period

use timer2_core::{ticks_to_micros, CountDirection, TimerError, TimerResult, TimerState};
use timer2_hal::{PinControl, RegisterBlock, Timer2Registers};

use crate::PeriodicTimer;

/// Map a triangle-wave sample onto a monotonic tick count
///
/// Up-counting samples are used as-is. Down-counting samples continue past
/// TOP, giving `0..=2*TOP` over one period.
pub(crate) fn unfold(count: u8, direction: CountDirection, top: u8) -> u32 {
    match direction {
        CountDirection::Up => u32::from(count),
        CountDirection::Down => u32::from(top.saturating_sub(count)) + u32::from(top),
    }
}

/// Direction of `count` when it was reached from the unfolded position `from`
///
/// Picks the reading of `count` that lies the shortest distance ahead of
/// `from` within one period, so a halt that lands just past TOP or BOTTOM is
/// attributed to the right half of the sweep.
pub(crate) fn direction_after(from: u32, count: u8, top: u8) -> CountDirection {
    let period = 2 * u32::from(top);
    if period == 0 {
        return CountDirection::Up;
    }
    let ahead = |ticks: u32| (ticks + period - from % period) % period;
    let up = ahead(unfold(count, CountDirection::Up, top));
    let down = ahead(unfold(count, CountDirection::Down, top));
    if up <= down {
        CountDirection::Up
    } else {
        CountDirection::Down
    }
}

impl<'v, R, P> PeriodicTimer<'v, R, P>
where
    R: RegisterBlock,
    P: PinControl,
{
    /// Microseconds elapsed since the start of the current period
    ///
    /// While running this busy-waits for the counter to move once in order to
    /// learn its direction, so it spends at least one prescaled tick. While
    /// stopped the direction recorded by [`stop`](Self::stop) is used and no
    /// waiting takes place.
    pub fn read(&mut self) -> TimerResult<u32> {
        self.check_state("read", self.state.has_count() && self.is_configured())?;
        let clock_select = self.setting.clock_select;

        let (count, direction) = if self.state == TimerState::Stopped {
            (self.regs.counter(), self.halted_direction)
        } else {
            let (first, direction, _) = self.sample_direction();
            (first, direction)
        };
        let ticks = unfold(count, direction, self.setting.top);
        trace!("timer2: read count={} dir={} ticks={}", count, direction, ticks);

        ticks_to_micros(ticks, self.config.clock_hz(), clock_select).ok_or(TimerError::ClockStopped)
    }

    /// Sample the counter and wait for the next change to find the direction
    ///
    /// Returns the first sample, the direction and the changed sample. With
    /// TOP at zero the counter cannot move and is reported as counting up.
    pub(crate) fn sample_direction(&mut self) -> (u8, CountDirection, u8) {
        let first = self.regs.counter();
        if self.setting.top == 0 {
            return (first, CountDirection::Up, first);
        }
        let second =
            nb::block!(self.counter_moved_from(first)).unwrap_or_else(|never| match never {});
        (first, CountDirection::from_samples(first, second), second)
    }
}
