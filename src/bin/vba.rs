//! Verilog byte analyzer CLI.
//!
//! Usage:
//!   vba [OPTIONS]                          interactive shell
//!   vba [OPTIONS] show <LITERAL>           render one literal
//!   vba [OPTIONS] extract <LITERAL> <RANGE|FIELD>
//!   vba [OPTIONS] compare <A> <B>          differing fields + bit overlay
//!   vba [OPTIONS] fields                   list the active field map
//!
//! Options:
//!   --mode hex|dec|bin            input radix (default hex)
//!   --format hex|dec|bin          output format (default hex)
//!   --align byte_align|dw_align   alignment (default byte_align)
//!   --row-width N                 bits per row for binary words (default 16)
//!   --fields FILE                 field map (JSON with // comments)
//!   --verbose, -v                 diagnostics on stderr

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use verilog_byte_analyzer::session::format_extraction;
use verilog_byte_analyzer::{
    compare_with, load_field_map, parse_literal, parse_range_spec, render, AlignMode, CompareOptions,
    DisplayFormat, FieldRegistry, Radix, RenderOptions, Reply, Session, DEFAULT_ROW_WIDTH,
};

#[derive(Parser)]
#[command(name = "vba", about = "Decode Verilog literals into bytes, words and bit fields")]
struct Cli {
    #[arg(long, default_value = "hex")]
    mode: Radix,
    #[arg(long, default_value = "hex")]
    format: DisplayFormat,
    #[arg(long, default_value = "byte_align")]
    align: AlignMode,
    #[arg(long, default_value_t = DEFAULT_ROW_WIDTH)]
    row_width: usize,
    #[arg(long)]
    fields: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Render one literal in the selected format and alignment.
    Show { literal: String },
    /// Extract `<low>-<high>`, `r<low>-<high>` or a field name from a literal.
    Extract { literal: String, target: String },
    /// Compare two literals field by field and bit by bit.
    Compare { a: String, b: String },
    /// List the active field map.
    Fields,
}

const HELP: &str = "\
Commands:
  hex / dec / bin          - Switch input mode
  to_hex / to_bin / to_dec - Switch output format
  byte_align / dw_align    - Switch alignment mode
  r<low>-<high>            - Extract bit range from last value
  <field_name>             - Extract predefined field (if not a reserved word)
  list                     - Show predefined bit field names
  q                        - Quit";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut registry = FieldRegistry::default();
    if let Some(path) = &cli.fields {
        let map = load_field_map(path).with_context(|| format!("loading field map {}", path.display()))?;
        if cli.verbose {
            eprintln!("fields: {} ({} entries)", path.display(), map.len());
        }
        registry.replace(map);
    } else if cli.verbose {
        eprintln!("fields: built-in default");
    }

    let options = RenderOptions {
        format: cli.format,
        align: cli.align,
        row_width: cli.row_width,
    };
    if cli.verbose {
        eprintln!(
            "input = {}, output = {}, alignment = {}, row width = {}",
            cli.mode, options.format, options.align, options.row_width
        );
    }

    match cli.command {
        None => {
            let mut session = Session::new(registry);
            session.radix = cli.mode;
            session.options = options;
            run_shell(&mut session)
        }
        Some(Cmd::Show { literal }) => {
            let value = parse_literal(&literal, cli.mode)?;
            println!("{}", render(&value.to_bytes(), &options, None));
            Ok(())
        }
        Some(Cmd::Extract { literal, target }) => {
            let value = parse_literal(&literal, cli.mode)?;
            let (a, b, name) = match parse_range_spec(&target) {
                Ok((a, b)) => (a, b, None),
                Err(range_err) => {
                    let name = target.trim().to_ascii_lowercase();
                    let field = registry
                        .lookup(&name)
                        .with_context(|| format!("'{}' is not a bit range ({}) or a known field", target, range_err))?;
                    (field.low(), field.high(), Some(name))
                }
            };
            let e = verilog_byte_analyzer::extract(&value, a, b);
            println!("{}", format_extraction(&e, name.as_deref()));
            Ok(())
        }
        Some(Cmd::Compare { a, b }) => {
            let va = parse_literal(&a, cli.mode)?;
            let vb = parse_literal(&b, cli.mode)?;
            let diff = compare_with(&va, &vb, &registry.snapshot(), &CompareOptions::from(&options));
            println!("Differing fields:");
            println!("{}", diff.summary());
            println!();
            println!("{}", diff.rendering);
            if cli.verbose {
                eprintln!("differing bits: {:?}", diff.mask.differing_bits());
            }
            Ok(())
        }
        Some(Cmd::Fields) => {
            for (name, field) in registry.list_default() {
                println!("  {}: {}", name, field);
            }
            Ok(())
        }
    }
}

fn run_shell(session: &mut Session) -> anyhow::Result<()> {
    println!("Verilog Byte Analyzer (Terminal Mode)");
    println!();
    println!("{}", HELP);
    println!("{}", session.status());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Input or Command: ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        match session.handle(&line) {
            Ok(Reply::Quit) => {
                println!("Exiting.");
                break;
            }
            Ok(Reply::Text(text)) => println!("{}", text),
            Err(e) => println!("error: {}", e),
        }
    }
    Ok(())
}
