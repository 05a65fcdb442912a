//! Inclusive bit ranges and extraction from a [`Value`].

use crate::value::Value;
use num_bigint::BigUint;
use num_traits::One;
use std::fmt;

/// Inclusive bit range `[low, high]`, always normalized so `low <= high`.
///
/// Indices are unsigned, so negative positions cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    low: u64,
    high: u64,
}

impl BitField {
    /// Build a range from two bit positions in either order.
    pub fn new(a: u64, b: u64) -> Self {
        BitField {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    /// `high - low + 1`, saturating for the full `0..=u64::MAX` range.
    pub fn width(&self) -> u64 {
        (self.high - self.low).saturating_add(1)
    }

    /// `(v >> low) & ((1 << width) - 1)`. Bits above `v` read as zero.
    pub fn extract(&self, v: &Value) -> Value {
        let shifted: BigUint = v.as_biguint() >> self.low;
        if shifted.bits() <= self.width() {
            return Value::from(shifted);
        }
        let mask = (BigUint::one() << self.width()) - 1u32;
        Value::from(shifted & mask)
    }
}

impl fmt::Display for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bit {}-{}", self.low, self.high)
    }
}

/// Result of pulling a bit range out of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub value: Value,
    pub field: BitField,
}

impl Extraction {
    pub fn low(&self) -> u64 {
        self.field.low()
    }

    pub fn high(&self) -> u64 {
        self.field.high()
    }

    /// `0b` followed by the value zero-padded to the field width.
    ///
    /// Padding is built by hand: `format!` width arguments stop at `u16::MAX`.
    pub fn binary(&self) -> String {
        let digits = format!("{:b}", self.value);
        let width = usize::try_from(self.field.width()).unwrap_or(usize::MAX);
        let pad = width.saturating_sub(digits.len());
        let mut out = String::with_capacity(2 + pad + digits.len());
        out.push_str("0b");
        out.push_str(&"0".repeat(pad));
        out.push_str(&digits);
        out
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (dec = {})", self.binary(), self.value)
    }
}

/// Extract the inclusive range between bit positions `a` and `b` (any order).
pub fn extract(v: &Value, a: u64, b: u64) -> Extraction {
    let field = BitField::new(a, b);
    Extraction {
        value: field.extract(v),
        field,
    }
}
