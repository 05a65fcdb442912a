//! Parse Verilog-style literals and bit-range commands using PEST.
//!
//! Literal forms, per input radix (input is trimmed and lower-cased first):
//!
//! - hex: `[width]'h<hex digits and _>` or bare hex digits (`8'hFF`, `'hDE_AD`, `ff`)
//! - bin: `[width]'b<0/1 and _>` or bare binary digits (`'b1010`, `1010`)
//! - dec: decimal digits only, no sign, no underscores
//!
//! A prefixed literal is found anywhere in the line, so text pasted from
//! Verilog source works: `assign x = 8'hFF;` reads as `0xFF`. The digit run
//! ends at the first character that is not a digit or `_`.
//!
//! The width prefix is advisory: the value comes from the digit string alone,
//! it is neither checked against the width nor truncated/extended to it.

use crate::error::{AnalyzerError, Result};
use crate::value::Value;
use num_bigint::BigUint;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::fmt;
use std::str::FromStr;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct LiteralParser;

/// Input radix of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Hex,
    Dec,
    Bin,
}

impl Radix {
    pub const ALL: [Radix; 3] = [Radix::Hex, Radix::Dec, Radix::Bin];

    pub fn name(self) -> &'static str {
        match self {
            Radix::Hex => "hex",
            Radix::Dec => "dec",
            Radix::Bin => "bin",
        }
    }

    fn base(self) -> u32 {
        match self {
            Radix::Hex => 16,
            Radix::Dec => 10,
            Radix::Bin => 2,
        }
    }

    fn rules(self) -> (Rule, Rule) {
        match self {
            Radix::Hex => (Rule::hex_literal, Rule::hex_digits),
            Radix::Dec => (Rule::dec_literal, Rule::dec_digits),
            Radix::Bin => (Rule::bin_literal, Rule::bin_digits),
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Radix {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Radix::Hex),
            "dec" => Ok(Radix::Dec),
            "bin" => Ok(Radix::Bin),
            other => Err(AnalyzerError::UnknownMode(other.to_string())),
        }
    }
}

/// Parse a literal in the given radix into a canonical unsigned value.
pub fn parse_literal(input: &str, radix: Radix) -> Result<Value> {
    let folded = input.trim().to_ascii_lowercase();
    let invalid = || AnalyzerError::InvalidLiteral {
        input: input.to_string(),
        radix,
    };
    let (literal_rule, digits_rule) = radix.rules();
    let pairs = LiteralParser::parse(literal_rule, &folded).map_err(|_| invalid())?;
    let digits = pairs
        .flatten()
        .find(|p| p.as_rule() == digits_rule)
        .map(|p| p.as_str().replace('_', ""))
        .ok_or_else(invalid)?;
    if digits.is_empty() {
        return Err(invalid());
    }
    BigUint::parse_bytes(digits.as_bytes(), radix.base())
        .map(Value::from)
        .ok_or_else(invalid)
}

fn bit_range_from(rule: Rule, text: &str) -> Option<Result<(u64, u64)>> {
    let pairs = LiteralParser::parse(rule, text).ok()?;
    let mut indices = pairs.flatten().filter(|p| p.as_rule() == Rule::bit_index);
    let mut next_index = || -> Result<u64> {
        let s = indices
            .next()
            .map(|p| p.as_str())
            .ok_or_else(|| AnalyzerError::InvalidBitRange(text.to_string()))?;
        s.parse::<u64>()
            .map_err(|_| AnalyzerError::InvalidBitRange(format!("{} (index {} out of range)", text, s)))
    };
    let first = next_index();
    Some(first.and_then(|a| next_index().map(|b| (a, b))))
}

/// Match the shell form `r<low>-<high>`.
///
/// Returns `None` when `text` is not a range command at all, and an error when
/// it is one but an index does not fit in 64 bits.
pub fn parse_range_command(text: &str) -> Option<Result<(u64, u64)>> {
    bit_range_from(Rule::range_command, text.trim())
}

/// Parse a range typed into an extract box: `<low>-<high>`, or the shell form.
pub fn parse_range_spec(text: &str) -> Result<(u64, u64)> {
    let t = text.trim().to_ascii_lowercase();
    bit_range_from(Rule::range_spec, &t)
        .or_else(|| bit_range_from(Rule::range_command, &t))
        .unwrap_or_else(|| Err(AnalyzerError::InvalidBitRange(text.to_string())))
}
