//! Canonical values and their little-endian byte/word decomposition.

use byteorder::{ByteOrder, LittleEndian};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::fmt;

/// A non-negative integer of unbounded width.
///
/// Literals may declare widths far beyond 64 bits, so every shift and mask
/// goes through [`BigUint`].
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Value(BigUint);

impl Value {
    pub fn zero() -> Self {
        Value(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Number of significant bits (0 for zero).
    pub fn bit_length(&self) -> u64 {
        self.0.bits()
    }

    /// Bit `i` (0 = least significant). Bits above the value read as 0.
    pub fn bit(&self, i: u64) -> bool {
        self.0.bit(i)
    }

    /// Minimal little-endian byte sequence: `[0]` for zero, otherwise
    /// `ceil(bit_length / 8)` bytes with index 0 the least significant.
    pub fn to_bytes(&self) -> ByteSequence {
        if self.0.is_zero() {
            return ByteSequence(vec![0]);
        }
        ByteSequence(self.0.to_bytes_le())
    }

    /// Reassemble from little-endian bytes (trailing zero bytes are ignored).
    pub fn from_bytes_le(bytes: &[u8]) -> Self {
        Value(BigUint::from_bytes_le(bytes))
    }
}

impl From<BigUint> for Value {
    fn from(v: BigUint) -> Self {
        Value(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value(BigUint::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value(BigUint::from(v))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

/// Little-endian bytes of a [`Value`]; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteSequence(Vec<u8>);

impl ByteSequence {
    /// Wrap raw little-endian bytes. An empty input becomes `[0]`.
    pub fn from_le_bytes(mut bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            bytes.push(0);
        }
        ByteSequence(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Number of 32-bit words needed to hold every byte.
    pub fn word_count(&self) -> usize {
        self.0.len().div_ceil(4)
    }

    /// Word `index` assembled as `b0 | b1<<8 | b2<<16 | b3<<24`; missing
    /// high bytes read as zero.
    pub fn word(&self, index: usize) -> u32 {
        let mut buf = [0u8; 4];
        let start = index.saturating_mul(4);
        if let Some(chunk) = self.0.get(start..) {
            let n = chunk.len().min(4);
            buf[..n].copy_from_slice(&chunk[..n]);
        }
        LittleEndian::read_u32(&buf)
    }

    pub fn words(&self) -> Vec<u32> {
        (0..self.word_count()).map(|i| self.word(i)).collect()
    }

    pub fn to_value(&self) -> Value {
        Value::from_bytes_le(&self.0)
    }
}

impl AsRef<[u8]> for ByteSequence {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&Value> for ByteSequence {
    fn from(v: &Value) -> Self {
        v.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_one_byte() {
        assert_eq!(Value::zero().to_bytes().as_slice(), &[0]);
    }

    #[test]
    fn bytes_are_little_endian_and_minimal() {
        assert_eq!(Value::from(256u64).to_bytes().as_slice(), &[0, 1]);
        assert_eq!(Value::from(0x1234_5678u64).to_bytes().as_slice(), &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(Value::from(0xffu64).to_bytes().len(), 1);
        assert_eq!(Value::from(0x100u64).to_bytes().len(), 2);
    }

    #[test]
    fn words_pad_high_bytes() {
        let bytes = Value::from(0x01_0203_0405u64).to_bytes();
        assert_eq!(bytes.word_count(), 2);
        assert_eq!(bytes.words(), vec![0x0203_0405, 0x01]);
        assert_eq!(bytes.word(7), 0);
    }

    #[test]
    fn wide_value_bytes() {
        let v = Value::from(BigUint::from(1u8) << 200u32);
        let bytes = v.to_bytes();
        assert_eq!(bytes.len(), 26);
        assert_eq!(bytes.get(25), Some(1));
        assert_eq!(bytes.to_value(), v);
    }

    #[test]
    fn empty_raw_bytes_become_zero() {
        let b = ByteSequence::from_le_bytes(Vec::new());
        assert_eq!(b.as_slice(), &[0]);
        assert!(b.to_value().is_zero());
    }
}
