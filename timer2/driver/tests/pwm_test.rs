//! PWM channel handling against the simulator

use embedded_hal::pwm::SetDutyCycle;
use timer2::{OverflowVector, PeriodicTimer, PwmChannel, TimerConfig, TimerError};
use timer2_hal::{PinMode, Register};
use timer2_hal_sim::{SimPins, SimTimer2};

type SimDriver = PeriodicTimer<'static, SimTimer2, SimPins>;

/// Initialized driver with a 1000us period (TOP 250)
fn rig(vector: &'static OverflowVector) -> (SimDriver, SimTimer2, SimPins) {
    let sim = SimTimer2::new();
    let pins = SimPins::new();
    let mut timer = PeriodicTimer::new(
        sim.clone(),
        pins.clone(),
        vector,
        TimerConfig::ATMEGA328P_16MHZ,
    );
    timer.init(1000, None).unwrap();
    (timer, sim, pins)
}

const COM2B_NON_INVERTING: u8 = 0b10 << 4;

#[test]
fn test_enable_channel_b() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, pins) = rig(&VECTOR);

    timer.enable_pwm(PwmChannel::B, 128).unwrap();
    assert_eq!(pins.mode(3), Some(PinMode::Output));
    assert_eq!(sim.peek(Register::ControlA) & (0b11 << 4), COM2B_NON_INVERTING);
    assert_eq!(sim.peek(Register::CompareB), 125);
    assert!(timer.is_pwm_enabled(PwmChannel::B));
    assert_eq!(timer.pwm_duty(PwmChannel::B), Some(128));
}

#[test]
fn test_channel_a_is_top() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, pins) = rig(&VECTOR);
    let before = sim.snapshot();

    let expected = Err(TimerError::UnsupportedChannel(PwmChannel::A));
    assert_eq!(timer.enable_pwm(PwmChannel::A, 10), expected);
    assert_eq!(timer.set_pwm_duty(PwmChannel::A, 10), expected);
    assert_eq!(timer.disable_pwm(PwmChannel::A), expected);
    assert!(timer.pwm_output(PwmChannel::A).is_err());

    assert_eq!(sim.snapshot(), before);
    assert_eq!(sim.peek(Register::CompareA), 250);
    assert_eq!(pins.mode(11), None);
}

#[test]
fn test_duty_out_of_range_has_no_effect() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, pins) = rig(&VECTOR);
    let before = sim.snapshot();

    assert_eq!(
        timer.enable_pwm(PwmChannel::B, 256),
        Err(TimerError::DutyOutOfRange(256))
    );
    assert_eq!(sim.snapshot(), before);
    assert_eq!(pins.mode(3), None);
    assert!(!timer.is_pwm_enabled(PwmChannel::B));

    timer.enable_pwm(PwmChannel::B, 64).unwrap();
    let before = sim.snapshot();
    assert_eq!(
        timer.set_pwm_duty(PwmChannel::B, 1000),
        Err(TimerError::DutyOutOfRange(1000))
    );
    assert_eq!(sim.snapshot(), before);
    assert_eq!(timer.pwm_duty(PwmChannel::B), Some(64));
}

#[test]
fn test_duty_extremes() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, _) = rig(&VECTOR);

    timer.enable_pwm(PwmChannel::B, 0).unwrap();
    assert_eq!(sim.peek(Register::CompareB), 0);
    timer.set_pwm_duty(PwmChannel::B, 255).unwrap();
    assert_eq!(sim.peek(Register::CompareB), 249);
}

#[test]
fn test_disable_keeps_pin_direction() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, pins) = rig(&VECTOR);
    timer.enable_pwm(PwmChannel::B, 128).unwrap();

    timer.disable_pwm(PwmChannel::B).unwrap();
    assert_eq!(sim.peek(Register::ControlA) & (0b11 << 4), 0);
    assert_eq!(pins.mode(3), Some(PinMode::Output));
    assert!(!timer.is_pwm_enabled(PwmChannel::B));
    assert_eq!(timer.pwm_duty(PwmChannel::B), Some(128));
}

#[test]
fn test_set_duty_does_not_connect_output() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, _) = rig(&VECTOR);

    timer.set_pwm_duty(PwmChannel::B, 200).unwrap();
    assert_eq!(sim.peek(Register::CompareB), 195);
    assert_eq!(sim.peek(Register::ControlA) & (0b11 << 4), 0);
    assert!(!timer.is_pwm_enabled(PwmChannel::B));
}

#[test]
fn test_period_change_rescales_duty() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, _) = rig(&VECTOR);
    timer.enable_pwm(PwmChannel::B, 128).unwrap();
    assert_eq!(sim.peek(Register::CompareB), 125);

    timer.set_period(500).unwrap();
    assert_eq!(timer.top(), 125);
    assert_eq!(sim.peek(Register::CompareB), 62);
    assert!(timer.is_pwm_enabled(PwmChannel::B));
}

#[test]
fn test_pwm_output_handle() {
    static VECTOR: OverflowVector = OverflowVector::new();
    let (mut timer, sim, _) = rig(&VECTOR);

    {
        let mut output = timer.pwm_output(PwmChannel::B).unwrap();
        assert_eq!(output.channel(), PwmChannel::B);
        assert_eq!(output.max_duty_cycle(), 255);
        output.set_duty_cycle_percent(50).unwrap();
    }
    assert_eq!(timer.pwm_duty(PwmChannel::B), Some(127));

    {
        let mut output = timer.pwm_output(PwmChannel::B).unwrap();
        output.set_duty_cycle_fully_on().unwrap();
        assert_eq!(output.set_duty_cycle(300), Err(TimerError::DutyOutOfRange(300)));
    }
    assert_eq!(timer.pwm_duty(PwmChannel::B), Some(255));
    assert_eq!(sim.peek(Register::CompareB), 249);
}

#[test]
fn test_unknown_pin_reported() {
    use timer2_core::{ChannelInfo, CompareUnit};

    static VECTOR: OverflowVector = OverflowVector::new();
    static FAR_PIN: [ChannelInfo; 1] = [ChannelInfo::new(PwmChannel::B, CompareUnit::B, 42)];

    let sim = SimTimer2::new();
    let config = TimerConfig::ATMEGA328P_16MHZ.with_channels(&FAR_PIN);
    let mut timer = PeriodicTimer::new(sim.clone(), SimPins::new(), &VECTOR, config);
    timer.init(1000, None).unwrap();
    let before = sim.snapshot();

    assert_eq!(
        timer.enable_pwm(PwmChannel::B, 10),
        Err(TimerError::PinUnavailable(42))
    );
    assert_eq!(sim.snapshot(), before);
}
