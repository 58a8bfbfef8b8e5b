//! Timer/Counter2 simulation for host testing
//!
//! Provides cycle-driven implementations of the Timer2 HAL traits so the
//! driver can be exercised without hardware. The simulated counter follows
//! the phase-correct triangle (BOTTOM -> TOP -> BOTTOM) at the prescaled rate,
//! raises the overflow at BOTTOM and dispatches the registered vector when
//! the overflow interrupt is enabled.
//!
//! Every read of the counter register consumes a configurable number of CPU
//! cycles, which is what lets the driver's poll-until-change loops make
//! progress.

pub mod gpio;
pub mod timer;

pub use gpio::SimPins;
pub use timer::SimTimer2;
