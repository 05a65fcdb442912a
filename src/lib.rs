//! # Verilog Byte Analyzer
//!
//! Decode integer literals written in Verilog notation, lay them out as
//! little-endian bytes or 32-bit words, pull out named or ad-hoc bit ranges,
//! and diff two values field by field and bit by bit.
//!
//! ## Pipeline
//!
//! - [`parse_literal`]: `8'hFF`, `'b1010`, `ff`, `123` → [`Value`] (arbitrary width)
//! - [`Value::to_bytes`]: minimal little-endian [`ByteSequence`]
//! - [`extract`]: inclusive bit range → [`Extraction`]
//! - [`FieldRegistry`]: named ranges, reserved-word gating, atomic JSON import
//! - [`render`]: byte/word rows in hex, dec or bin, with optional diff overlay
//! - [`compare`]: differing fields plus a binary overlay of `a` against `b`
//!
//! ## Example
//!
//! ```
//! use verilog_byte_analyzer::{compare, parse_literal, FieldMap, Radix};
//!
//! let a = parse_literal("32'h0000_0001", Radix::Hex).unwrap();
//! let b = parse_literal("'b1_0001", Radix::Bin).unwrap();
//! let diff = compare(&a, &b, &FieldMap::default());
//! assert_eq!(diff.field_names(), ["flag"]);
//! ```
//!
//! The `vba` binary wraps this in an interactive shell; see [`session`].

pub mod command;
pub mod compare;
pub mod error;
pub mod field;
pub mod field_map;
pub mod parser;
pub mod render;
pub mod session;
pub mod value;

pub use command::{parse_command, Command};
pub use compare::{compare, compare_with, CompareOptions, DiffResult, FieldDiff};
pub use error::{AnalyzerError, Result};
pub use field::{extract, BitField, Extraction};
pub use field_map::{is_reserved, load_field_map, FieldMap, FieldReading, FieldRegistry, RESERVED_WORDS};
pub use parser::{parse_literal, parse_range_command, parse_range_spec, Radix};
pub use render::{diff_mask, render, AlignMode, DiffMask, DisplayFormat, GroupDiff, RenderOptions, DEFAULT_ROW_WIDTH};
pub use session::{Reply, Session};
pub use value::{ByteSequence, Value};
