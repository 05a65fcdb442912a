//! Caller-side session state for the interactive shell: current modes, the
//! field registry and the last parsed value.
//!
//! The analysis functions themselves are stateless; this is the layer that
//! remembers a value between commands.

use crate::command::{parse_command, Command};
use crate::error::{AnalyzerError, Result};
use crate::field::{extract, Extraction};
use crate::field_map::FieldRegistry;
use crate::parser::{parse_literal, Radix};
use crate::render::{render, RenderOptions};
use crate::value::Value;

/// What the shell should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub radix: Radix,
    pub options: RenderOptions,
    registry: FieldRegistry,
    last_value: Option<Value>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(FieldRegistry::default())
    }
}

impl Session {
    pub fn new(registry: FieldRegistry) -> Self {
        Session {
            radix: Radix::Hex,
            options: RenderOptions::default(),
            registry,
            last_value: None,
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FieldRegistry {
        &mut self.registry
    }

    pub fn last_value(&self) -> Option<&Value> {
        self.last_value.as_ref()
    }

    fn require_value(&self) -> Result<&Value> {
        self.last_value.as_ref().ok_or(AnalyzerError::NoValueAvailable)
    }

    pub fn status(&self) -> String {
        format!(
            "Current settings: input = {}, output = {}, alignment = {}",
            self.radix, self.options.format, self.options.align
        )
    }

    /// Run one line of input.
    pub fn handle(&mut self, line: &str) -> Result<Reply> {
        let text = match parse_command(line)? {
            Command::Quit => return Ok(Reply::Quit),
            Command::SetRadix(r) => {
                self.radix = r;
                format!("Input mode changed to: {}\n{}", r, self.status())
            }
            Command::SetFormat(f) => {
                self.options.format = f;
                format!("Output format changed to: {}\n{}", f, self.status())
            }
            Command::SetAlign(a) => {
                self.options.align = a;
                format!("Alignment mode changed to: {}\n{}", a, self.status())
            }
            Command::List => self.list(),
            Command::Range(a, b) => format_extraction(&self.extract_range(a, b)?, None),
            Command::Word(word) => match self.registry.lookup(&word) {
                Ok(field) => {
                    let e = extract(self.require_value()?, field.low(), field.high());
                    format_extraction(&e, Some(&word))
                }
                Err(_) => self.analyze(&word)?,
            },
        };
        Ok(Reply::Text(text))
    }

    /// Parse `input` in the current radix, remember it, and render it.
    pub fn analyze(&mut self, input: &str) -> Result<String> {
        let value = parse_literal(input, self.radix)?;
        let rendered = render(&value.to_bytes(), &self.options, None);
        self.last_value = Some(value);
        Ok(format!(
            "[Result] Input mode = {}, Output = {}, Alignment = {}\n{}",
            self.radix, self.options.format, self.options.align, rendered
        ))
    }

    pub fn extract_range(&self, a: u64, b: u64) -> Result<Extraction> {
        Ok(extract(self.require_value()?, a, b))
    }

    pub fn extract_field(&self, name: &str) -> Result<Extraction> {
        let field = self.registry.lookup(name)?;
        self.extract_range(field.low(), field.high())
    }

    /// Field ranges before any value is parsed; field values afterwards.
    pub fn list(&self) -> String {
        let mut lines = Vec::new();
        match &self.last_value {
            Some(v) => {
                lines.push("Last parsed value per field:".to_string());
                for r in self.registry.list_for_value(v) {
                    lines.push(format!("  {}: {}", r.name, r.extraction));
                }
            }
            None => {
                lines.push("Predefined bit fields:".to_string());
                for (name, field) in self.registry.list_default() {
                    lines.push(format!("  {}: {}", name, field));
                }
            }
        }
        lines.join("\n")
    }
}

/// `bit l-h [name] = 0b... (dec = n)`
pub fn format_extraction(e: &Extraction, name: Option<&str>) -> String {
    match name {
        Some(n) => format!("{} [{}] = {}", e.field, n, e),
        None => format!("{} = {}", e.field, e),
    }
}
