//! Timer2 register capability
//!
//! Backends implement [`RegisterBlock`] (whole-register read and write). The
//! bit, field and named accessors of [`Timer2Registers`] are provided on top
//! of it for every backend. Read-modify-write sequences run inside a critical
//! section so they cannot interleave with the overflow interrupt.

use timer2_core::{ClockSelect, CompareOutput, CompareUnit, CountingMode};

/// Timer2 registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// TCCR2A: compare output modes, WGM21:0
    ControlA,
    /// TCCR2B: WGM22, clock select
    ControlB,
    /// TCNT2: live counter
    Counter,
    /// OCR2A: compare A, TOP in phase-correct mode
    CompareA,
    /// OCR2B: compare B
    CompareB,
    /// TIMSK2: interrupt enables
    InterruptMask,
    /// TIFR2: interrupt flags, write one to clear
    InterruptFlags,
}

impl Register {
    /// Compare register of `unit`
    pub const fn compare(unit: CompareUnit) -> Self {
        match unit {
            CompareUnit::A => Register::CompareA,
            CompareUnit::B => Register::CompareB,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Register {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Register::ControlA => defmt::write!(fmt, "TCCR2A"),
            Register::ControlB => defmt::write!(fmt, "TCCR2B"),
            Register::Counter => defmt::write!(fmt, "TCNT2"),
            Register::CompareA => defmt::write!(fmt, "OCR2A"),
            Register::CompareB => defmt::write!(fmt, "OCR2B"),
            Register::InterruptMask => defmt::write!(fmt, "TIMSK2"),
            Register::InterruptFlags => defmt::write!(fmt, "TIFR2"),
        }
    }
}

/// Bit positions and field masks
pub mod bits {
    /// TCCR2A: WGM20
    pub const WGM20: u8 = 0;
    /// TCCR2A: WGM21
    pub const WGM21: u8 = 1;
    /// TCCR2A: COM2B1:0 field position
    pub const COM2B_POS: u8 = 4;
    /// TCCR2A: COM2A1:0 field position
    pub const COM2A_POS: u8 = 6;
    /// Width mask of a COM2x field
    pub const COM_MASK: u8 = 0b11;
    /// TCCR2B: WGM22
    pub const WGM22: u8 = 3;
    /// TCCR2B: CS22:0 field position
    pub const CS_POS: u8 = 0;
    /// Width mask of the clock-select field
    pub const CS_MASK: u8 = 0b111;
    /// TIMSK2: overflow interrupt enable
    pub const TOIE2: u8 = 0;
    /// TIFR2: overflow flag
    pub const TOV2: u8 = 0;
}

/// Raw access to the Timer2 register set
pub trait RegisterBlock {
    /// Read a whole register
    fn read(&mut self, register: Register) -> u8;

    /// Write a whole register
    fn write(&mut self, register: Register, value: u8);
}

impl<T: RegisterBlock + ?Sized> RegisterBlock for &mut T {
    fn read(&mut self, register: Register) -> u8 {
        T::read(self, register)
    }

    fn write(&mut self, register: Register, value: u8) {
        T::write(self, register, value)
    }
}

/// Bit-field and named accessors over a [`RegisterBlock`]
pub trait Timer2Registers: RegisterBlock {
    /// Read one bit
    fn read_bit(&mut self, register: Register, bit: u8) -> bool {
        self.read(register) & (1 << bit) != 0
    }

    /// Set or clear one bit, leaving the others untouched
    fn write_bit(&mut self, register: Register, bit: u8, set: bool) {
        critical_section::with(|_| {
            let value = self.read(register);
            let value = if set { value | (1 << bit) } else { value & !(1 << bit) };
            self.write(register, value);
        });
    }

    /// Read a field of `mask` width at `pos`
    fn read_field(&mut self, register: Register, mask: u8, pos: u8) -> u8 {
        (self.read(register) >> pos) & mask
    }

    /// Replace a field of `mask` width at `pos`
    fn write_field(&mut self, register: Register, mask: u8, pos: u8, value: u8) {
        critical_section::with(|_| {
            let current = self.read(register) & !(mask << pos);
            self.write(register, current | ((value & mask) << pos));
        });
    }

    /// Clear both control registers (no clock, normal mode, outputs off)
    fn clear_control(&mut self) {
        self.write(Register::ControlA, 0);
        self.write(Register::ControlB, 0);
    }

    /// Program the waveform generation mode
    fn set_counting_mode(&mut self, mode: CountingMode) {
        let wgm = mode.wgm_bits();
        self.write_bit(Register::ControlA, bits::WGM20, wgm & 0b001 != 0);
        self.write_bit(Register::ControlA, bits::WGM21, wgm & 0b010 != 0);
        self.write_bit(Register::ControlB, bits::WGM22, wgm & 0b100 != 0);
    }

    /// Write the clock-select field; a real prescaler restarts the divider
    fn set_clock_select(&mut self, clock_select: ClockSelect) {
        self.write_field(Register::ControlB, bits::CS_MASK, bits::CS_POS, clock_select.bits());
    }

    /// Current clock-select field
    fn clock_select(&mut self) -> ClockSelect {
        ClockSelect::from_bits(self.read_field(Register::ControlB, bits::CS_MASK, bits::CS_POS))
    }

    /// Live counter value
    fn counter(&mut self) -> u8 {
        self.read(Register::Counter)
    }

    /// Overwrite the live counter
    fn set_counter(&mut self, value: u8) {
        self.write(Register::Counter, value);
    }

    /// Compare register of `unit`
    fn compare(&mut self, unit: CompareUnit) -> u8 {
        self.read(Register::compare(unit))
    }

    /// Write the compare register of `unit`
    fn set_compare(&mut self, unit: CompareUnit, value: u8) {
        self.write(Register::compare(unit), value);
    }

    /// Connect or disconnect the waveform output of `unit`
    fn set_compare_output(&mut self, unit: CompareUnit, output: CompareOutput) {
        let pos = match unit {
            CompareUnit::A => bits::COM2A_POS,
            CompareUnit::B => bits::COM2B_POS,
        };
        self.write_field(Register::ControlA, bits::COM_MASK, pos, output.bits());
    }

    /// Enable or disable the overflow interrupt
    fn set_overflow_interrupt(&mut self, enabled: bool) {
        self.write_bit(Register::InterruptMask, bits::TOIE2, enabled);
    }

    /// True when the overflow interrupt is enabled
    fn overflow_interrupt_enabled(&mut self) -> bool {
        self.read_bit(Register::InterruptMask, bits::TOIE2)
    }
}

impl<T: RegisterBlock + ?Sized> Timer2Registers for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Plain {
        regs: [u8; 7],
    }

    fn index(register: Register) -> usize {
        match register {
            Register::ControlA => 0,
            Register::ControlB => 1,
            Register::Counter => 2,
            Register::CompareA => 3,
            Register::CompareB => 4,
            Register::InterruptMask => 5,
            Register::InterruptFlags => 6,
        }
    }

    impl RegisterBlock for Plain {
        fn read(&mut self, register: Register) -> u8 {
            self.regs[index(register)]
        }

        fn write(&mut self, register: Register, value: u8) {
            self.regs[index(register)] = value;
        }
    }

    #[test]
    fn test_phase_correct_mode_bits() {
        let mut regs = Plain::default();
        regs.set_counting_mode(CountingMode::PhaseCorrect);
        assert_eq!(regs.read(Register::ControlA), 0b0000_0001);
        assert_eq!(regs.read(Register::ControlB), 0b0000_1000);
    }

    #[test]
    fn test_clock_select_preserves_mode() {
        let mut regs = Plain::default();
        regs.set_counting_mode(CountingMode::PhaseCorrect);
        regs.set_clock_select(ClockSelect::Div64);
        assert_eq!(regs.read(Register::ControlB), 0b0000_1100);
        assert_eq!(regs.clock_select(), ClockSelect::Div64);

        regs.set_clock_select(ClockSelect::NoClock);
        assert_eq!(regs.read(Register::ControlB), 0b0000_1000);
    }

    #[test]
    fn test_compare_output_fields() {
        let mut regs = Plain::default();
        regs.set_compare_output(CompareUnit::B, CompareOutput::NonInverting);
        assert_eq!(regs.read(Register::ControlA), 0b0010_0000);
        regs.set_compare_output(CompareUnit::A, CompareOutput::NonInverting);
        assert_eq!(regs.read(Register::ControlA), 0b1010_0000);
        regs.set_compare_output(CompareUnit::B, CompareOutput::Disconnected);
        assert_eq!(regs.read(Register::ControlA), 0b1000_0000);
    }

    #[test]
    fn test_overflow_interrupt_bit() {
        let mut regs = Plain::default();
        regs.set_overflow_interrupt(true);
        assert!(regs.overflow_interrupt_enabled());
        regs.set_overflow_interrupt(false);
        assert!(!regs.overflow_interrupt_enabled());
    }
}
