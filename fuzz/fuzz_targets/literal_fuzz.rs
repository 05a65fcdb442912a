//! Literal/command fuzz target: feed arbitrary text to the literal parser in
//! every radix, to the command classifier, and to the field-map importer.
//! None of them may panic. Build with: cargo fuzz run literal_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    use verilog_byte_analyzer::{parse_command, parse_literal, parse_range_spec, FieldMap, Radix};
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    for radix in Radix::ALL {
        if let Ok(v) = parse_literal(s, radix) {
            let _ = v.to_bytes();
        }
    }
    let _ = parse_command(s);
    let _ = parse_range_spec(s);
    let _ = FieldMap::from_commented_json(s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run literal_fuzz");
}
