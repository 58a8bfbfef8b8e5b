//! Overflow interrupt vector slot
//!
//! The slot lives in a `static` next to the interrupt handler. The driver
//! registers and clears the callback, the handler calls [`OverflowVector::dispatch`].

use core::cell::Cell;

use critical_section::Mutex;

/// Overflow callback invoked from interrupt context
///
/// Must be short and must not call back into the driver's configuration API.
pub type OverflowCallback = fn();

/// Callback slot shared between the driver and the overflow interrupt
pub struct OverflowVector {
    handler: Mutex<Cell<Option<OverflowCallback>>>,
}

impl OverflowVector {
    /// Create an empty vector
    pub const fn new() -> Self {
        Self {
            handler: Mutex::new(Cell::new(None)),
        }
    }

    /// Install `callback`, replacing any previous one
    pub fn register(&self, callback: OverflowCallback) {
        critical_section::with(|cs| self.handler.borrow(cs).set(Some(callback)));
    }

    /// Remove the installed callback
    pub fn clear(&self) {
        critical_section::with(|cs| self.handler.borrow(cs).set(None));
    }

    /// Currently installed callback
    pub fn handler(&self) -> Option<OverflowCallback> {
        critical_section::with(|cs| self.handler.borrow(cs).get())
    }

    /// True when a callback is installed
    pub fn is_registered(&self) -> bool {
        self.handler().is_some()
    }

    /// Invoke the installed callback, returning whether one ran
    ///
    /// Call this from the overflow interrupt handler. The callback runs outside
    /// the critical section.
    pub fn dispatch(&self) -> bool {
        match self.handler() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl Default for OverflowVector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    static HITS: AtomicU32 = AtomicU32::new(0);

    fn on_overflow() {
        HITS.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_dispatch_without_handler() {
        let vector = OverflowVector::new();
        assert!(!vector.is_registered());
        assert!(!vector.dispatch());
    }

    #[test]
    fn test_register_dispatch_clear() {
        let vector = OverflowVector::new();
        vector.register(on_overflow);
        assert!(vector.dispatch());
        assert!(vector.dispatch());
        assert_eq!(HITS.load(Ordering::Relaxed), 2);

        vector.clear();
        assert!(!vector.dispatch());
        assert_eq!(HITS.load(Ordering::Relaxed), 2);
    }
}
