//! Toggle a virtual LED from the overflow interrupt, drive PWM on channel B
//! and read the elapsed time, all on the simulated peripheral.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use timer2::{OverflowVector, PeriodicTimer, PwmChannel, TimerConfig, TimerResult};
use timer2_hal_sim::{SimPins, SimTimer2};

static OVERFLOW: OverflowVector = OverflowVector::new();
static LED: AtomicBool = AtomicBool::new(false);
static TOGGLES: AtomicU32 = AtomicU32::new(0);

fn toggle_led() {
    LED.fetch_xor(true, Ordering::Relaxed);
    TOGGLES.fetch_add(1, Ordering::Relaxed);
}

fn main() -> TimerResult<()> {
    let config = TimerConfig::ATMEGA328P_16MHZ;
    let sim = SimTimer2::new().with_vector(&OVERFLOW);
    let mut timer = PeriodicTimer::new(sim.clone(), SimPins::new(), &OVERFLOW, config);

    timer.init(timer.period_max(), Some(toggle_led))?;
    timer.enable_pwm(PwmChannel::B, 127)?;
    timer.start()?;
    println!("period {}us ({})", timer.period(), timer.setting());

    // 20 ms at 16 MHz
    sim.advance(config.clock_hz() / 1000 * 20);
    let elapsed = timer.read()?;
    println!("elapsed {}us since the last overflow", elapsed);

    sim.advance(config.clock_hz() / 10);
    println!(
        "after 100 ms more: {} toggles, led {}",
        TOGGLES.load(Ordering::Relaxed),
        if LED.load(Ordering::Relaxed) { "on" } else { "off" }
    );

    timer.stop();
    Ok(())
}
