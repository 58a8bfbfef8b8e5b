//! Simulated Timer/Counter2 register set

use std::sync::{Arc, Mutex, MutexGuard};

use timer2_core::{ClockSelect, CountDirection};
use timer2_hal::registers::bits;
use timer2_hal::{OverflowVector, Register, RegisterBlock};

/// CPU cycles consumed by one read of the counter register
pub const DEFAULT_POLL_CYCLES: u32 = 4;

struct SimState {
    control_a: u8,
    control_b: u8,
    compare_a: u8,
    compare_b: u8,
    interrupt_mask: u8,
    interrupt_flags: u8,
    counter: u8,
    direction: CountDirection,
    residue: u32,
    poll_cycles: u32,
    held_reads: u32,
    counter_reads: u64,
    overflows: u64,
    phantom_arms: u32,
    vector: Option<&'static OverflowVector>,
}

impl SimState {
    fn new() -> Self {
        Self {
            control_a: 0,
            control_b: 0,
            compare_a: 0,
            compare_b: 0,
            interrupt_mask: 0,
            interrupt_flags: 0,
            counter: 0,
            direction: CountDirection::Up,
            residue: 0,
            poll_cycles: DEFAULT_POLL_CYCLES,
            held_reads: 0,
            counter_reads: 0,
            overflows: 0,
            phantom_arms: 0,
            vector: None,
        }
    }

    fn clock_select(&self) -> ClockSelect {
        ClockSelect::from_bits(self.control_b >> bits::CS_POS)
    }

    fn overflow_enabled(&self) -> bool {
        self.interrupt_mask & (1 << bits::TOIE2) != 0
    }

    /// Counter at BOTTOM with the overflow interrupt already live
    fn at_armed_bottom(&self) -> bool {
        self.counter == 0 && self.overflow_enabled()
    }

    /// Run `cycles` CPU cycles, returning how many overflow interrupts to dispatch
    fn advance(&mut self, cycles: u32) -> u32 {
        let Some(ratio) = self.clock_select().ratio() else {
            return 0;
        };
        let total = u64::from(self.residue) + u64::from(cycles);
        self.residue = (total % u64::from(ratio)) as u32;
        let ticks = total / u64::from(ratio);

        let mut interrupts = 0;
        for _ in 0..ticks {
            if self.step() {
                self.overflows += 1;
                if self.overflow_enabled() {
                    interrupts += 1;
                } else {
                    self.interrupt_flags |= 1 << bits::TOV2;
                }
            }
        }
        interrupts
    }

    /// One prescaled tick; true when the counter reached BOTTOM
    fn step(&mut self) -> bool {
        let top = self.compare_a;
        if top == 0 {
            self.counter = 0;
            return true;
        }
        match self.direction {
            CountDirection::Up if self.counter < top => {
                self.counter += 1;
                false
            }
            _ => {
                self.direction = CountDirection::Down;
                self.counter = self.counter.saturating_sub(1);
                if self.counter == 0 {
                    self.direction = CountDirection::Up;
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Shared handle to a simulated Timer/Counter2
///
/// Clones refer to the same simulated peripheral, so a test can keep one
/// handle for inspection while the driver owns another.
#[derive(Clone)]
pub struct SimTimer2 {
    state: Arc<Mutex<SimState>>,
}

impl SimTimer2 {
    /// Create a peripheral in its reset state
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState::new())),
        }
    }

    /// Set the CPU cycles consumed by each counter read
    pub fn with_poll_cycles(self, cycles: u32) -> Self {
        self.lock().poll_cycles = cycles;
        self
    }

    /// Dispatch `vector` whenever an enabled overflow interrupt fires
    pub fn with_vector(self, vector: &'static OverflowVector) -> Self {
        self.lock().vector = Some(vector);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Let `cycles` CPU cycles pass
    pub fn advance(&self, cycles: u32) {
        let (interrupts, vector) = {
            let mut state = self.lock();
            (state.advance(cycles), state.vector)
        };
        if interrupts > 0 {
            log::trace!("sim: {} overflow interrupt(s)", interrupts);
        }
        if let Some(vector) = vector {
            for _ in 0..interrupts {
                vector.dispatch();
            }
        }
    }

    /// Make the next `reads` counter reads report zero without advancing
    pub fn hold_counter_at_zero(&self, reads: u32) {
        self.lock().held_reads = reads;
    }

    /// Current counter value, without consuming cycles
    pub fn counter(&self) -> u8 {
        self.lock().counter
    }

    /// Current counting direction
    pub fn direction(&self) -> CountDirection {
        self.lock().direction
    }

    /// Register value, without side effects
    pub fn peek(&self, register: Register) -> u8 {
        let state = self.lock();
        match register {
            Register::ControlA => state.control_a,
            Register::ControlB => state.control_b,
            Register::Counter => state.counter,
            Register::CompareA => state.compare_a,
            Register::CompareB => state.compare_b,
            Register::InterruptMask => state.interrupt_mask,
            Register::InterruptFlags => state.interrupt_flags,
        }
    }

    /// Clock-select field currently programmed
    pub fn clock_select(&self) -> ClockSelect {
        self.lock().clock_select()
    }

    /// True when the overflow interrupt is enabled
    pub fn overflow_interrupt_enabled(&self) -> bool {
        self.lock().overflow_enabled()
    }

    /// Number of reads of the counter register so far
    pub fn counter_reads(&self) -> u64 {
        self.lock().counter_reads
    }

    /// Number of times the counter reached BOTTOM
    pub fn overflows(&self) -> u64 {
        self.lock().overflows
    }

    /// Times a running counter sat at zero with the overflow interrupt just enabled
    ///
    /// Counts enabling the interrupt at BOTTOM, starting the clock at BOTTOM
    /// with the interrupt enabled, and resetting a running, armed counter.
    pub fn phantom_arms(&self) -> u32 {
        self.lock().phantom_arms
    }

    /// Snapshot of every register, for before/after comparisons
    pub fn snapshot(&self) -> [u8; 7] {
        [
            Register::ControlA,
            Register::ControlB,
            Register::Counter,
            Register::CompareA,
            Register::CompareB,
            Register::InterruptMask,
            Register::InterruptFlags,
        ]
        .map(|register| self.peek(register))
    }
}

impl Default for SimTimer2 {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBlock for SimTimer2 {
    fn read(&mut self, register: Register) -> u8 {
        if register != Register::Counter {
            return self.peek(register);
        }

        let (value, poll_cycles) = {
            let mut state = self.lock();
            state.counter_reads += 1;
            if state.held_reads > 0 {
                state.held_reads -= 1;
                return 0;
            }
            (state.counter, state.poll_cycles)
        };
        self.advance(poll_cycles);
        value
    }

    fn write(&mut self, register: Register, value: u8) {
        let mut state = self.lock();
        match register {
            Register::ControlA => state.control_a = value,
            Register::ControlB => {
                if (state.control_b ^ value) & (bits::CS_MASK << bits::CS_POS) != 0 {
                    state.residue = 0;
                }
                let was_running = state.clock_select().is_running();
                state.control_b = value;
                if !was_running && state.clock_select().is_running() && state.at_armed_bottom() {
                    state.phantom_arms += 1;
                }
            }
            Register::Counter => {
                state.counter = value;
                state.direction = CountDirection::Up;
                if state.clock_select().is_running() && state.at_armed_bottom() {
                    state.phantom_arms += 1;
                }
            }
            Register::CompareA => state.compare_a = value,
            Register::CompareB => state.compare_b = value,
            Register::InterruptMask => {
                let arming = value & (1 << bits::TOIE2) != 0 && !state.overflow_enabled();
                if arming && state.counter == 0 && state.clock_select().is_running() {
                    state.phantom_arms += 1;
                }
                state.interrupt_mask = value;
            }
            Register::InterruptFlags => state.interrupt_flags &= !value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timer2_hal::Timer2Registers;

    fn running(top: u8, clock_select: ClockSelect) -> SimTimer2 {
        let mut sim = SimTimer2::new();
        sim.set_compare(timer2_core::CompareUnit::A, top);
        sim.set_clock_select(clock_select);
        sim
    }

    #[test]
    fn test_no_clock_does_not_tick() {
        let sim = SimTimer2::new();
        sim.advance(10_000);
        assert_eq!(sim.counter(), 0);
    }

    #[test]
    fn test_triangle_sweep() {
        let sim = running(3, ClockSelect::Div1);
        let mut seen = Vec::new();
        for _ in 0..7 {
            sim.advance(1);
            seen.push(sim.counter());
        }
        assert_eq!(seen, [1, 2, 3, 2, 1, 0, 1]);
        assert_eq!(sim.overflows(), 1);
    }

    #[test]
    fn test_prescaler_divides_ticks() {
        let sim = running(200, ClockSelect::Div8);
        sim.advance(7);
        assert_eq!(sim.counter(), 0);
        sim.advance(1);
        assert_eq!(sim.counter(), 1);
        sim.advance(80);
        assert_eq!(sim.counter(), 11);
    }

    #[test]
    fn test_counter_read_consumes_cycles() {
        let mut sim = running(100, ClockSelect::Div1).with_poll_cycles(2);
        assert_eq!(Timer2Registers::counter(&mut sim), 0);
        assert_eq!(Timer2Registers::counter(&mut sim), 2);
        assert_eq!(sim.counter_reads(), 2);
    }

    #[test]
    fn test_held_reads_report_zero() {
        let mut sim = running(100, ClockSelect::Div1);
        sim.advance(10);
        sim.hold_counter_at_zero(2);
        assert_eq!(Timer2Registers::counter(&mut sim), 0);
        assert_eq!(Timer2Registers::counter(&mut sim), 0);
        assert_eq!(Timer2Registers::counter(&mut sim), 10);
    }

    #[test]
    fn test_phantom_windows_detected() {
        let mut sim = running(100, ClockSelect::Div1);
        sim.set_overflow_interrupt(true);
        assert_eq!(sim.phantom_arms(), 1);

        sim.set_clock_select(ClockSelect::NoClock);
        sim.set_clock_select(ClockSelect::Div1);
        assert_eq!(sim.phantom_arms(), 2);

        sim.advance(10);
        sim.set_counter(0);
        assert_eq!(sim.phantom_arms(), 3);
    }

    #[test]
    fn test_overflow_flag_set_when_interrupt_disabled() {
        let sim = running(2, ClockSelect::Div1);
        sim.advance(4);
        assert_eq!(sim.peek(Register::InterruptFlags) & 1, 1);
    }
}
