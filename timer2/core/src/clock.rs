//! Clock-select (prescaler) values of Timer2

use core::fmt;

/// Value of the three-bit clock-select field (CS22:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ClockSelect {
    /// No clock source, the counter is halted
    NoClock = 0,
    /// clk/1
    Div1 = 1,
    /// clk/8
    Div8 = 2,
    /// clk/32
    Div32 = 3,
    /// clk/64
    Div64 = 4,
    /// clk/128
    Div128 = 5,
    /// clk/256
    Div256 = 6,
    /// clk/1024
    Div1024 = 7,
}

impl ClockSelect {
    /// Every real prescaler, finest first
    pub const PRESCALED: [ClockSelect; 7] = [
        ClockSelect::Div1,
        ClockSelect::Div8,
        ClockSelect::Div32,
        ClockSelect::Div64,
        ClockSelect::Div128,
        ClockSelect::Div256,
        ClockSelect::Div1024,
    ];

    /// Coarsest prescaler, used as the out-of-range fallback
    pub const MAX: ClockSelect = ClockSelect::Div1024;

    /// Raw field bits
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the raw field, ignoring bits above the field width
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            1 => ClockSelect::Div1,
            2 => ClockSelect::Div8,
            3 => ClockSelect::Div32,
            4 => ClockSelect::Div64,
            5 => ClockSelect::Div128,
            6 => ClockSelect::Div256,
            7 => ClockSelect::Div1024,
            _ => ClockSelect::NoClock,
        }
    }

    /// log2 of the division ratio, `None` for `NoClock`
    pub const fn shift(self) -> Option<u32> {
        match self {
            ClockSelect::NoClock => None,
            ClockSelect::Div1 => Some(0),
            ClockSelect::Div8 => Some(3),
            ClockSelect::Div32 => Some(5),
            ClockSelect::Div64 => Some(6),
            ClockSelect::Div128 => Some(7),
            ClockSelect::Div256 => Some(8),
            ClockSelect::Div1024 => Some(10),
        }
    }

    /// Division ratio, `None` for `NoClock`
    pub const fn ratio(self) -> Option<u32> {
        match self.shift() {
            Some(shift) => Some(1 << shift),
            None => None,
        }
    }

    /// True for any value that makes the counter tick
    pub const fn is_running(self) -> bool {
        !matches!(self, ClockSelect::NoClock)
    }
}

impl fmt::Display for ClockSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ratio() {
            Some(ratio) => write!(f, "clk/{}", ratio),
            None => write!(f, "no clock"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockSelect {
    fn format(&self, fmt: defmt::Formatter) {
        match self.ratio() {
            Some(ratio) => defmt::write!(fmt, "clk/{=u32}", ratio),
            None => defmt::write!(fmt, "no clock"),
        }
    }
}
