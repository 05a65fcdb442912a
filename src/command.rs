//! Interactive command surface.
//!
//! | Input                       | Command                      |
//! |-----------------------------|------------------------------|
//! | `hex` / `dec` / `bin`       | switch input radix           |
//! | `to_hex` / `to_dec` / `to_bin` | switch output format      |
//! | `byte_align` / `dw_align`   | switch alignment             |
//! | `list`                      | list fields                  |
//! | `r<low>-<high>`             | extract a bit range          |
//! | `q`                         | quit                         |
//! | anything else               | field name or literal        |

use crate::error::Result;
use crate::parser::{parse_range_command, Radix};
use crate::render::{AlignMode, DisplayFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    SetRadix(Radix),
    SetFormat(DisplayFormat),
    SetAlign(AlignMode),
    List,
    Range(u64, u64),
    /// Not a keyword: resolved later as a field name, else as a literal.
    Word(String),
}

/// Classify one line of input. The line is trimmed and lower-cased.
///
/// Only a range command whose indices overflow `u64` fails here.
pub fn parse_command(line: &str) -> Result<Command> {
    let input = line.trim().to_ascii_lowercase();
    let cmd = match input.as_str() {
        "q" => Command::Quit,
        "hex" => Command::SetRadix(Radix::Hex),
        "dec" => Command::SetRadix(Radix::Dec),
        "bin" => Command::SetRadix(Radix::Bin),
        "to_hex" => Command::SetFormat(DisplayFormat::Hex),
        "to_dec" => Command::SetFormat(DisplayFormat::Dec),
        "to_bin" => Command::SetFormat(DisplayFormat::Bin),
        "byte_align" => Command::SetAlign(AlignMode::Byte),
        "dw_align" => Command::SetAlign(AlignMode::Word),
        "list" => Command::List,
        _ => match parse_range_command(&input) {
            Some(range) => {
                let (a, b) = range?;
                Command::Range(a, b)
            }
            None => Command::Word(input),
        },
    };
    Ok(cmd)
}
