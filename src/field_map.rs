//! Named bit fields: the ordered name → range map, its JSON import, and the
//! registry that swaps whole maps atomically.
//!
//! ## Import format
//!
//! A JSON object whose values are `[low, high]` pairs, with `//` line comments
//! allowed:
//!
//! ```text
//! {
//!   // control word
//!   "opcode": [8, 12],
//!   "valid": [0, 3]
//! }
//! ```
//!
//! Entries keep document order. A key repeated in the document keeps its first
//! position and its last range.

use crate::error::{AnalyzerError, Result};
use crate::field::{BitField, Extraction};
use crate::value::Value;
use serde_json::{Map, Value as Json};
use std::path::Path;
use std::sync::Arc;

/// Tokens of the command surface; never resolved as field names.
pub const RESERVED_WORDS: [&str; 10] = [
    "hex", "dec", "bin", "to_hex", "to_bin", "to_dec", "byte_align", "dw_align", "list", "q",
];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Ordered mapping from field name to bit range; names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, BitField)>,
}

impl Default for FieldMap {
    /// The built-in control-word layout.
    fn default() -> Self {
        let mut map = FieldMap::new();
        map.insert("opcode", BitField::new(8, 12));
        map.insert("valid", BitField::new(0, 3));
        map.insert("flag", BitField::new(4, 7));
        map.insert("address", BitField::new(16, 23));
        map.insert("immediate", BitField::new(24, 31));
        map
    }
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap { entries: Vec::new() }
    }

    /// Insert or overwrite; an existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, field: BitField) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.entries.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<BitField> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, f)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BitField)> + '_ {
        self.entries.iter().map(|(n, f)| (n.as_str(), *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate an already-parsed JSON object. Every value must be a
    /// two-element array of non-negative integers; the first bad entry fails
    /// the whole map.
    pub fn from_json_map(object: &Map<String, Json>) -> Result<Self> {
        let mut map = FieldMap::new();
        for (name, spec) in object {
            map.insert(name.clone(), field_from_json(name, spec)?);
        }
        Ok(map)
    }

    /// Strip `//` comments, parse the JSON object, then validate it.
    pub fn from_commented_json(text: &str) -> Result<Self> {
        let stripped = strip_line_comments(text);
        if stripped.trim().is_empty() {
            return Err(AnalyzerError::InvalidFieldMap(
                "document is empty or contains only comments".to_string(),
            ));
        }
        let doc: Json = serde_json::from_str(&stripped)
            .map_err(|e| AnalyzerError::InvalidFieldMap(format!("JSON: {}", e)))?;
        match doc {
            Json::Object(object) => FieldMap::from_json_map(&object),
            other => Err(AnalyzerError::InvalidFieldMap(format!(
                "expected an object of name: [low, high], found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Read a commented-JSON field map from disk.
pub fn load_field_map(path: impl AsRef<Path>) -> Result<FieldMap> {
    let text = std::fs::read_to_string(path)?;
    FieldMap::from_commented_json(&text)
}

fn field_from_json(name: &str, spec: &Json) -> Result<BitField> {
    let bad = |reason: String| AnalyzerError::InvalidFieldSpec {
        name: name.to_string(),
        reason,
    };
    let items = spec
        .as_array()
        .ok_or_else(|| bad(format!("expected [low, high], found {}", json_kind(spec))))?;
    if items.len() != 2 {
        return Err(bad(format!("expected 2 bit indices, found {}", items.len())));
    }
    let index = |item: &Json| {
        item.as_u64()
            .ok_or_else(|| bad(format!("bit index {} is not a non-negative integer", item)))
    };
    Ok(BitField::new(index(&items[0])?, index(&items[1])?))
}

fn json_kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

/// Remove `//` comments outside of JSON strings.
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = line.len();
        let bytes = line.as_bytes();
        for (i, &c) in bytes.iter().enumerate() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else if c == b'"' {
                in_string = true;
            } else if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
                cut = i;
                break;
            }
        }
        out.push_str(&line[..cut]);
        out.push('\n');
    }
    out
}

/// A field and its value within a parsed literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReading {
    pub name: String,
    pub extraction: Extraction,
}

/// Owner of the current [`FieldMap`].
///
/// Readers take [`FieldRegistry::snapshot`]; replacement swaps the whole map
/// in one assignment, so a snapshot is always entirely old or entirely new.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    current: Arc<FieldMap>,
}

impl FieldRegistry {
    pub fn new(map: FieldMap) -> Self {
        FieldRegistry {
            current: Arc::new(map),
        }
    }

    pub fn snapshot(&self) -> Arc<FieldMap> {
        Arc::clone(&self.current)
    }

    /// Resolve a field name. Reserved words never resolve, even when the map
    /// defines them.
    pub fn lookup(&self, name: &str) -> Result<BitField> {
        if is_reserved(name) {
            return Err(AnalyzerError::UnknownField(format!("{} (reserved word)", name)));
        }
        self.current
            .get(name)
            .ok_or_else(|| AnalyzerError::UnknownField(name.to_string()))
    }

    /// Install a validated map, discarding the previous one.
    pub fn replace(&mut self, map: FieldMap) {
        self.current = Arc::new(map);
    }

    /// Validate `object` fully, then swap it in. On error nothing changes.
    pub fn replace_from_json(&mut self, object: &Map<String, Json>) -> Result<()> {
        let map = FieldMap::from_json_map(object)?;
        self.replace(map);
        Ok(())
    }

    /// Parse and validate a commented-JSON document, then swap it in.
    pub fn import_str(&mut self, text: &str) -> Result<()> {
        let map = FieldMap::from_commented_json(text)?;
        self.replace(map);
        Ok(())
    }

    /// Fields in map order, for display before any value exists.
    pub fn list_default(&self) -> Vec<(String, BitField)> {
        self.current
            .iter()
            .map(|(name, field)| (name.to_string(), field))
            .collect()
    }

    /// Every field extracted from `v`, in map order.
    pub fn list_for_value(&self, v: &Value) -> Vec<FieldReading> {
        self.current
            .iter()
            .map(|(name, field)| FieldReading {
                name: name.to_string(),
                extraction: Extraction {
                    value: field.extract(v),
                    field,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_order_and_ranges() {
        let reg = FieldRegistry::default();
        let names: Vec<_> = reg.list_default().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["opcode", "valid", "flag", "address", "immediate"]);
        assert_eq!(reg.lookup("opcode").unwrap(), BitField::new(8, 12));
    }

    #[test]
    fn reserved_word_never_resolves() {
        let mut map = FieldMap::new();
        map.insert("list", BitField::new(0, 1));
        map.insert("q", BitField::new(2, 3));
        let reg = FieldRegistry::new(map);
        assert!(matches!(reg.lookup("list"), Err(AnalyzerError::UnknownField(_))));
        assert!(matches!(reg.lookup("q"), Err(AnalyzerError::UnknownField(_))));
    }

    #[test]
    fn missing_field_is_unknown() {
        let reg = FieldRegistry::default();
        assert!(matches!(reg.lookup("nope"), Err(AnalyzerError::UnknownField(n)) if n == "nope"));
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut map = FieldMap::default();
        map.insert("valid", BitField::new(1, 1));
        assert_eq!(map.len(), 5);
        assert_eq!(map.iter().nth(1), Some(("valid", BitField::new(1, 1))));
    }

    #[test]
    fn comments_stripped_outside_strings() {
        let text = "{\n  // header\n  \"a//b\": [1, 2], // trailing\n  \"c\": [3, 4]\n}\n";
        let map = FieldMap::from_commented_json(text).unwrap();
        assert_eq!(map.get("a//b"), Some(BitField::new(1, 2)));
        assert_eq!(map.get("c"), Some(BitField::new(3, 4)));
    }

    #[test]
    fn escaped_quote_inside_key() {
        let text = r#"{ "x\"//y": [0, 0] }"#;
        let map = FieldMap::from_commented_json(text).unwrap();
        assert_eq!(map.get("x\"//y"), Some(BitField::new(0, 0)));
    }

    #[test]
    fn import_keeps_document_order() {
        let map = FieldMap::from_commented_json(r#"{"z": [0, 1], "a": [2, 3], "m": [5, 4]}"#).unwrap();
        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["z", "a", "m"]);
        assert_eq!(map.get("m"), Some(BitField::new(4, 5)));
    }

    #[test]
    fn bad_shapes_name_the_key() {
        for (doc, key) in [
            (r#"{"a": [1]}"#, "a"),
            (r#"{"a": [0, 1], "b": [1, 2, 3]}"#, "b"),
            (r#"{"c": "0-3"}"#, "c"),
            (r#"{"d": [-1, 3]}"#, "d"),
            (r#"{"e": [1.5, 3]}"#, "e"),
        ] {
            match FieldMap::from_commented_json(doc) {
                Err(AnalyzerError::InvalidFieldSpec { name, .. }) => assert_eq!(name, key, "{}", doc),
                other => panic!("{}: expected InvalidFieldSpec, got {:?}", doc, other),
            }
        }
    }

    #[test]
    fn empty_or_non_object_documents() {
        for doc in ["", "   \n", "// only a comment\n// another"] {
            assert!(matches!(
                FieldMap::from_commented_json(doc),
                Err(AnalyzerError::InvalidFieldMap(_))
            ));
        }
        assert!(matches!(
            FieldMap::from_commented_json("[[0, 1]]"),
            Err(AnalyzerError::InvalidFieldMap(_))
        ));
        assert!(matches!(
            FieldMap::from_commented_json("{ not json"),
            Err(AnalyzerError::InvalidFieldMap(_))
        ));
    }

    #[test]
    fn failed_import_leaves_registry_untouched() {
        let mut reg = FieldRegistry::default();
        let before = reg.snapshot();
        let err = reg.import_str(r#"{"new": [0, 7], "broken": [1]}"#);
        assert!(err.is_err());
        assert_eq!(*reg.snapshot(), *before);
        assert!(reg.lookup("new").is_err());
        assert_eq!(reg.lookup("flag").unwrap(), BitField::new(4, 7));
    }

    #[test]
    fn snapshot_survives_replacement() {
        let mut reg = FieldRegistry::default();
        let old = reg.snapshot();
        reg.import_str(r#"{"lo": [0, 7]}"#).unwrap();
        assert_eq!(old.len(), 5);
        assert_eq!(reg.snapshot().len(), 1);
        assert!(reg.lookup("opcode").is_err());
    }

    #[test]
    fn list_for_value_extracts_every_field() {
        let reg = FieldRegistry::default();
        let readings = reg.list_for_value(&Value::from(0x1234_1F5Au64));
        let got: Vec<_> = readings
            .iter()
            .map(|r| (r.name.as_str(), r.extraction.value.to_u64().unwrap()))
            .collect();
        assert_eq!(
            got,
            [("opcode", 0x1F), ("valid", 0xA), ("flag", 0x5), ("address", 0x34), ("immediate", 0x12)]
        );
    }
}
