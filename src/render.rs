//! Render a byte sequence as aligned bytes or 32-bit little-endian words in
//! hex, decimal or binary, optionally overlaying a bit diff against a
//! reference sequence.
//!
//! Binary output lays each bit in a 6-column cell under its label:
//!
//! ```text
//! byte0:
//!     bit7  bit6  bit5  bit4  bit3  bit2  bit1  bit0
//!        0     0     0     1     0     0     0     1
//!                        ^
//! ```
//!
//! The diff row marks `^` where the bit differs from the reference, blank
//! where it matches, and `-` where the reference has no byte for that bit.

use crate::error::{AnalyzerError, Result};
use crate::value::ByteSequence;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ROW_WIDTH: usize = 16;
const WORD_BITS: usize = 32;
const CELL: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayFormat {
    Hex,
    Dec,
    Bin,
}

impl DisplayFormat {
    pub fn name(self) -> &'static str {
        match self {
            DisplayFormat::Hex => "hex",
            DisplayFormat::Dec => "dec",
            DisplayFormat::Bin => "bin",
        }
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim().to_ascii_lowercase();
        match t.strip_prefix("to_").unwrap_or(&t) {
            "hex" => Ok(DisplayFormat::Hex),
            "dec" => Ok(DisplayFormat::Dec),
            "bin" => Ok(DisplayFormat::Bin),
            _ => Err(AnalyzerError::UnknownMode(s.to_string())),
        }
    }
}

/// Grouping granularity: one row per byte, or per 4-byte little-endian word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignMode {
    Byte,
    Word,
}

impl AlignMode {
    pub fn name(self) -> &'static str {
        match self {
            AlignMode::Byte => "byte_align",
            AlignMode::Word => "dw_align",
        }
    }

    /// Bits per group.
    pub fn group_bits(self) -> usize {
        match self {
            AlignMode::Byte => 8,
            AlignMode::Word => WORD_BITS,
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlignMode {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "byte_align" | "byte" => Ok(AlignMode::Byte),
            "dw_align" | "dw" | "word" => Ok(AlignMode::Word),
            _ => Err(AnalyzerError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: DisplayFormat,
    pub align: AlignMode,
    /// Bits per row for binary word output; clamped to `1..=32`.
    pub row_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            format: DisplayFormat::Hex,
            align: AlignMode::Byte,
            row_width: DEFAULT_ROW_WIDTH,
        }
    }
}

/// Bit comparison of one byte or word against its reference.
///
/// Bit `i` of `known` is set when the reference supplies that bit; `differs`
/// is always a subset of `known`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDiff {
    pub known: u32,
    pub differs: u32,
}

impl GroupDiff {
    fn mark(&self, bit: usize) -> char {
        let m = 1u32 << bit;
        if self.known & m == 0 {
            '-'
        } else if self.differs & m != 0 {
            '^'
        } else {
            ' '
        }
    }
}

/// Per-group diff of a primary sequence against a reference, grouped the same
/// way the primary is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffMask {
    pub align: AlignMode,
    pub groups: Vec<GroupDiff>,
}

impl DiffMask {
    pub fn any(&self) -> bool {
        self.groups.iter().any(|g| g.differs != 0)
    }

    /// Differing bit positions, counted from bit 0 of byte 0.
    pub fn differing_bits(&self) -> Vec<usize> {
        let width = self.align.group_bits();
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(g, diff)| {
                (0..width)
                    .filter(move |b| diff.differs & (1u32 << b) != 0)
                    .map(move |b| g * width + b)
            })
            .collect()
    }
}

/// Compare `primary` with `reference` group by group.
///
/// Missing reference bytes count as zero when a word is assembled but are
/// reported as unknown, never as differences.
pub fn diff_mask(primary: &ByteSequence, reference: &ByteSequence, align: AlignMode) -> DiffMask {
    let groups = match align {
        AlignMode::Byte => (0..primary.len())
            .map(|i| match (primary.get(i), reference.get(i)) {
                (Some(p), Some(r)) => GroupDiff {
                    known: 0xFF,
                    differs: u32::from(p ^ r),
                },
                _ => GroupDiff { known: 0, differs: 0 },
            })
            .collect(),
        AlignMode::Word => (0..primary.word_count())
            .map(|i| {
                let known = (0..4)
                    .filter(|k| i * 4 + k < reference.len())
                    .fold(0u32, |acc, k| acc | (0xFF << (8 * k)));
                GroupDiff {
                    known,
                    differs: (primary.word(i) ^ reference.word(i)) & known,
                }
            })
            .collect(),
    };
    DiffMask { align, groups }
}

fn cells<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    items
        .into_iter()
        .map(|x| format!("{:>width$}", x.to_string(), width = CELL))
        .collect()
}

fn render_byte_rows(bytes: &ByteSequence, format: DisplayFormat, mask: Option<&DiffMask>, out: &mut Vec<String>) {
    for (i, &b) in bytes.as_slice().iter().enumerate() {
        match format {
            DisplayFormat::Hex => out.push(format!("byte{}: 8'h{:02x}", i, b)),
            DisplayFormat::Dec => out.push(format!("byte{}: {}", i, b)),
            DisplayFormat::Bin => {
                out.push(format!("byte{}:", i));
                out.push(format!("  {}", cells((0..8).rev().map(|j| format!("bit{}", j)))));
                out.push(format!("  {}", cells((0..8).rev().map(|j| (b >> j) & 1))));
                if let Some(group) = mask.and_then(|m| m.groups.get(i)) {
                    out.push(format!("  {}", cells((0..8).rev().map(|j| group.mark(j)))));
                }
            }
        }
    }
    out.push(format!("--- Total {} bytes ---", bytes.len()));
}

fn render_word_rows(
    bytes: &ByteSequence,
    format: DisplayFormat,
    row_width: usize,
    mask: Option<&DiffMask>,
    out: &mut Vec<String>,
) {
    let row_width = row_width.clamp(1, WORD_BITS);
    let words = bytes.words();
    for (i, &word) in words.iter().enumerate() {
        match format {
            DisplayFormat::Hex => out.push(format!("dw{}: 32'h{:08x}", i, word)),
            DisplayFormat::Dec => out.push(format!("dw{}: {}", i, word)),
            DisplayFormat::Bin => {
                out.push(format!("dw{}:", i));
                let group = mask.and_then(|m| m.groups.get(i));
                // Bit positions MSB first, split into rows without resetting labels.
                let positions: Vec<usize> = (0..WORD_BITS).rev().collect();
                for row in positions.chunks(row_width) {
                    out.push(format!("  {}", cells(row.iter().map(|b| format!("b{}", b)))));
                    out.push(format!("  {}", cells(row.iter().map(|&b| (word >> b) & 1))));
                    if let Some(group) = group {
                        out.push(format!("  {}", cells(row.iter().map(|&b| group.mark(b)))));
                    }
                }
            }
        }
    }
    out.push(format!(
        "--- Total {} bytes, {} x 32-bit words ---",
        bytes.len(),
        words.len()
    ));
}

/// Render `bytes` according to `options`.
///
/// With a `reference`, binary output gains a diff row under every byte or word
/// row; hex and decimal output are unaffected.
pub fn render(bytes: &ByteSequence, options: &RenderOptions, reference: Option<&ByteSequence>) -> String {
    let mask = reference.map(|r| diff_mask(bytes, r, options.align));
    render_with_mask(bytes, options, mask.as_ref())
}

pub(crate) fn render_with_mask(bytes: &ByteSequence, options: &RenderOptions, mask: Option<&DiffMask>) -> String {
    let mut out = Vec::new();
    match options.align {
        AlignMode::Byte => render_byte_rows(bytes, options.format, mask, &mut out),
        AlignMode::Word => render_word_rows(bytes, options.format, options.row_width, mask, &mut out),
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn seq(v: u64) -> ByteSequence {
        Value::from(v).to_bytes()
    }

    fn opts(format: DisplayFormat, align: AlignMode) -> RenderOptions {
        RenderOptions {
            format,
            align,
            row_width: DEFAULT_ROW_WIDTH,
        }
    }

    #[test]
    fn byte_hex_and_dec() {
        let text = render(&seq(0x1234), &opts(DisplayFormat::Hex, AlignMode::Byte), None);
        assert_eq!(text, "byte0: 8'h34\nbyte1: 8'h12\n--- Total 2 bytes ---");
        let text = render(&seq(0x1234), &opts(DisplayFormat::Dec, AlignMode::Byte), None);
        assert_eq!(text, "byte0: 52\nbyte1: 18\n--- Total 2 bytes ---");
    }

    #[test]
    fn byte_bin_layout() {
        let text = render(&seq(0x81), &opts(DisplayFormat::Bin, AlignMode::Byte), None);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "byte0:");
        assert_eq!(lines[1], "    bit7  bit6  bit5  bit4  bit3  bit2  bit1  bit0");
        assert_eq!(lines[2], "       1     0     0     0     0     0     0     1");
        assert_eq!(lines[3], "--- Total 1 bytes ---");
    }

    #[test]
    fn byte_bin_diff_row() {
        let text = render(&seq(0x01), &opts(DisplayFormat::Bin, AlignMode::Byte), Some(&seq(0x11)));
        let lines: Vec<_> = text.lines().collect();
        let expected = format!("  {}     ^{}", " ".repeat(18), " ".repeat(24));
        assert_eq!(lines[3], expected);
    }

    #[test]
    fn missing_reference_byte_is_dashes() {
        let text = render(&seq(0x0101), &opts(DisplayFormat::Bin, AlignMode::Byte), Some(&seq(0x00)));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[3], format!("  {}     ^", " ".repeat(42)));
        assert_eq!(lines[7], "       -     -     -     -     -     -     -     -");
    }

    #[test]
    fn word_hex_pads_last_word() {
        let text = render(&seq(0x01_0203_0405), &opts(DisplayFormat::Hex, AlignMode::Word), None);
        assert_eq!(
            text,
            "dw0: 32'h02030405\ndw1: 32'h00000001\n--- Total 5 bytes, 2 x 32-bit words ---"
        );
    }

    #[test]
    fn word_bin_rows_keep_global_labels() {
        let text = render(&seq(0x8000_0001), &opts(DisplayFormat::Bin, AlignMode::Word), None);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "dw0:");
        assert!(lines[1].trim_start().starts_with("b31"));
        assert!(lines[1].trim_end().ends_with("b16"));
        assert!(lines[3].trim_start().starts_with("b15"));
        assert!(lines[3].trim_end().ends_with("b0"));
        assert_eq!(lines[2].trim_start().chars().next(), Some('1'));
        assert_eq!(lines[4].trim_end().chars().last(), Some('1'));
    }

    #[test]
    fn word_bin_row_width_is_clamped() {
        let mut o = opts(DisplayFormat::Bin, AlignMode::Word);
        o.row_width = 0;
        assert_eq!(render(&seq(1), &o, None).lines().count(), 1 + 32 * 2 + 1);
        o.row_width = 64;
        assert_eq!(render(&seq(1), &o, None).lines().count(), 1 + 2 + 1);
    }

    #[test]
    fn word_diff_unknown_high_bytes_are_not_marked() {
        // Reference covers only byte 0; its missing bytes are zero but unknown.
        let mask = diff_mask(&seq(0xFF00_0001), &seq(0x03), AlignMode::Word);
        assert_eq!(mask.groups, vec![GroupDiff { known: 0xFF, differs: 0x02 }]);
        assert_eq!(mask.differing_bits(), vec![1]);
    }

    #[test]
    fn word_diff_row_marks_and_dashes() {
        let mut o = opts(DisplayFormat::Bin, AlignMode::Word);
        o.row_width = 8;
        let text = render(&seq(0x0000_0100), &o, Some(&seq(0x00)));
        let lines: Vec<_> = text.lines().collect();
        // Rows: b31..b24, b23..b16, b15..b8, b7..b0; each label/value/diff.
        assert_eq!(lines[3].trim(), "-     -     -     -     -     -     -     -");
        assert_eq!(lines[12].trim(), "");
    }

    #[test]
    fn mode_names_parse() {
        assert_eq!("to_bin".parse::<DisplayFormat>().unwrap(), DisplayFormat::Bin);
        assert_eq!("dec".parse::<DisplayFormat>().unwrap(), DisplayFormat::Dec);
        assert_eq!("dw_align".parse::<AlignMode>().unwrap(), AlignMode::Word);
        assert!("oct".parse::<DisplayFormat>().is_err());
        assert!("nibble_align".parse::<AlignMode>().is_err());
    }
}
