//! Field-by-field and bit-by-bit comparison of two values.

use crate::field::BitField;
use crate::field_map::FieldMap;
use crate::render::{diff_mask, render_with_mask, AlignMode, DiffMask, DisplayFormat, RenderOptions, DEFAULT_ROW_WIDTH};
use crate::value::Value;

/// A field whose value differs between the two inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub name: String,
    pub field: BitField,
    pub value_in_a: Value,
    pub value_in_b: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Differing fields, ascending by low bit (map order among equal lows).
    pub fields: Vec<FieldDiff>,
    /// Bit diff of `a`'s bytes against `b`'s, in the rendered grouping.
    pub mask: DiffMask,
    /// Binary rendering of `a` with the diff overlay.
    pub rendering: String,
}

impl DiffResult {
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// True when no field and no rendered bit differs.
    pub fn is_identical(&self) -> bool {
        self.fields.is_empty() && !self.mask.any()
    }

    /// One line per differing field: `name (bit l-h): a -> b`.
    pub fn summary(&self) -> String {
        if self.fields.is_empty() {
            return "No field differs.".to_string();
        }
        self.fields
            .iter()
            .map(|f| format!("  {} ({}): {:#x} -> {:#x}", f.name, f.field, f.value_in_a, f.value_in_b))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Grouping for the overlay; the format is always binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub align: AlignMode,
    pub row_width: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            align: AlignMode::Byte,
            row_width: DEFAULT_ROW_WIDTH,
        }
    }
}

impl From<&RenderOptions> for CompareOptions {
    fn from(o: &RenderOptions) -> Self {
        CompareOptions {
            align: o.align,
            row_width: o.row_width,
        }
    }
}

/// Compare `a` and `b` over every field of `map`, byte-aligned.
pub fn compare(a: &Value, b: &Value, map: &FieldMap) -> DiffResult {
    compare_with(a, b, map, &CompareOptions::default())
}

pub fn compare_with(a: &Value, b: &Value, map: &FieldMap, options: &CompareOptions) -> DiffResult {
    let mut ordered: Vec<(&str, BitField)> = map.iter().collect();
    ordered.sort_by_key(|(_, f)| f.low());

    let fields = ordered
        .into_iter()
        .filter_map(|(name, field)| {
            let value_in_a = field.extract(a);
            let value_in_b = field.extract(b);
            (value_in_a != value_in_b).then(|| FieldDiff {
                name: name.to_string(),
                field,
                value_in_a,
                value_in_b,
            })
        })
        .collect();

    let a_bytes = a.to_bytes();
    let b_bytes = b.to_bytes();
    let mask = diff_mask(&a_bytes, &b_bytes, options.align);
    let render_options = RenderOptions {
        format: DisplayFormat::Bin,
        align: options.align,
        row_width: options.row_width,
    };
    let rendering = render_with_mask(&a_bytes, &render_options, Some(&mask));

    DiffResult {
        fields,
        mask,
        rendering,
    }
}
