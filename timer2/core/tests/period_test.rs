//! Period engine tests for timer2-core
//! These run on the host with std, against the same no_std arithmetic the driver uses

use timer2_core::{fit_period, period_max, ticks_to_micros, ClockSelect, TimerConfig};

const CLOCKS: [u32; 4] = [16_000_000, 8_000_000, 20_000_000, 1_000_000];

fn periods(clock_hz: u32) -> impl Iterator<Item = u32> {
    let max = period_max(clock_hz);
    let step = (max / 20_000).max(1);
    (0..=max).step_by(step as usize).chain(core::iter::once(max))
}

#[test]
fn test_every_valid_period_fits() {
    for clock in CLOCKS {
        for period in periods(clock) {
            assert!(fit_period(clock, period).is_exact(), "{}us at {}Hz", period, clock);
        }
    }
}

#[test]
fn test_period_round_trip_within_one_step() {
    for clock in CLOCKS {
        for period in periods(clock) {
            let setting = fit_period(clock, period).setting();
            let ratio = u64::from(setting.clock_select.ratio().unwrap());
            let actual = setting.micros(clock);
            assert!(actual <= period);
            let error = u64::from(period - actual) * u64::from(clock);
            assert!(
                error < (ratio + 1) * 2_000_000 + u64::from(clock),
                "{}us at {}Hz came back as {}us",
                period,
                clock,
                actual
            );
        }
    }
}

#[test]
fn test_prescaler_monotonic_in_period() {
    for clock in CLOCKS {
        let mut previous = ClockSelect::Div1;
        for period in periods(clock) {
            let selected = fit_period(clock, period).setting().clock_select;
            assert!(selected >= previous, "{}us at {}Hz", period, clock);
            previous = selected;
        }
    }
}

#[test]
fn test_beyond_max_is_clamped() {
    for clock in CLOCKS {
        let max = period_max(clock);
        for period in [max + 1, max.saturating_mul(2), u32::MAX] {
            let fit = fit_period(clock, period);
            assert!(!fit.is_exact());
            assert_eq!(fit.setting().clock_select, ClockSelect::Div1024);
            assert_eq!(fit.setting().top, 255);
        }
    }
}

#[test]
fn test_config_period_max_matches_formula() {
    // (resolution / clock_MHz) * max_prescaler * 2 - 1
    let config = TimerConfig::ATMEGA328P_16MHZ;
    assert_eq!(config.period_max(), (256 / 16) * 1024 * 2 - 1);
}

#[test]
fn test_full_sweep_readback_at_max_prescaler() {
    // 510 ticks at clk/1024 on 16 MHz: 510 * 1000 / 16000 = 31, << 10
    assert_eq!(ticks_to_micros(510, 16_000_000, ClockSelect::Div1024), Some(31 << 10));
}
