//! Command-line front end: path-addressed inspection and editing of JSON and
//! YAML documents.
//!
//! The CLI is a consumer of the library and preserves its fail-soft
//! contract: a path that does not resolve prints the absent marker (`null`)
//! and exits zero. Only I/O and codec failures exit non-zero, rendered as
//! miette reports.

use std::io::Write;
use std::{fs, path::PathBuf, process};

use clap::{Parser, Subcommand};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::codec;
use crate::error::BurrowError;
use crate::path::Path;
use crate::tree::Value;

// ============================================================================
// CLI ARGUMENTS
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "burrow",
    version,
    about = "Path-addressed inspection and editing of JSON and YAML documents."
)]
pub struct BurrowArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Print the value at a path, or null when it does not resolve.
    Get {
        /// The JSON or YAML document to read.
        file: PathBuf,
        /// Dotted chain such as `a.b[1].c`.
        chain: String,
    },
    /// Report whether an element exists at a path.
    Has {
        file: PathBuf,
        chain: String,
    },
    /// Assign a value at a path and print the resulting document.
    Set {
        file: PathBuf,
        chain: String,
        /// Parsed as JSON; anything unparsable is taken as a bare string.
        value: String,
        /// Rewrite the document file instead of printing.
        #[arg(long)]
        in_place: bool,
    },
    /// Remove the element at a path and print it.
    Del {
        file: PathBuf,
        chain: String,
        /// Rewrite the document file without the removed element.
        #[arg(long)]
        in_place: bool,
    },
    /// Merge a second document into the first and print the result.
    Merge {
        file: PathBuf,
        overlay: PathBuf,
        /// Rewrite the first document file with the merge result.
        #[arg(long)]
        in_place: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocFormat {
    Json,
    Yaml,
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = BurrowArgs::parse();

    match args.command {
        ArgsCommand::Get { file, chain } => {
            let (doc, format) = load_or_exit(&file);
            let value = doc.get(&Path::parse(&chain)).cloned().unwrap_or(Value::Nil);
            print_value(&value, format);
        }

        ArgsCommand::Has { file, chain } => {
            let (doc, _) = load_or_exit(&file);
            print_verdict(doc.contains(&Path::parse(&chain)));
        }

        ArgsCommand::Set {
            file,
            chain,
            value,
            in_place,
        } => {
            let (mut doc, format) = load_or_exit(&file);
            doc.set(&Path::parse(&chain), parse_value_arg(&value));
            finish_document(&file, &doc, format, in_place);
        }

        ArgsCommand::Del {
            file,
            chain,
            in_place,
        } => {
            let (mut doc, format) = load_or_exit(&file);
            let removed = doc.pop(&Path::parse(&chain)).unwrap_or(Value::Nil);
            if in_place {
                write_or_exit(&file, &doc, format);
            }
            print_value(&removed, format);
        }

        ArgsCommand::Merge {
            file,
            overlay,
            in_place,
        } => {
            let (mut doc, format) = load_or_exit(&file);
            let (source, _) = load_or_exit(&overlay);
            doc.merge_from(&source);
            finish_document(&file, &doc, format, in_place);
        }
    }
}

// ============================================================================
// DOCUMENT HELPERS
// ============================================================================

fn detect_format(file: &PathBuf) -> Result<DocFormat, BurrowError> {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(DocFormat::Json),
        Some("yaml") | Some("yml") => Ok(DocFormat::Yaml),
        _ => Err(BurrowError::UnsupportedFormat {
            path: file.display().to_string(),
        }),
    }
}

fn load(file: &PathBuf) -> Result<(Value, DocFormat), BurrowError> {
    let format = detect_format(file)?;
    let source = fs::read_to_string(file)?;
    let doc = match format {
        DocFormat::Json => codec::from_json_str(&source)?,
        DocFormat::Yaml => codec::from_yaml_str(&source)?,
    };
    Ok((doc, format))
}

fn load_or_exit(file: &PathBuf) -> (Value, DocFormat) {
    load(file).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}

fn emit(value: &Value, format: DocFormat) -> Result<String, BurrowError> {
    match format {
        DocFormat::Json => codec::to_json_string_pretty(value),
        DocFormat::Yaml => codec::to_yaml_string(value),
    }
}

fn print_value(value: &Value, format: DocFormat) {
    let rendered = emit(value, format).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    });
    println!("{}", rendered.trim_end());
}

fn write_or_exit(file: &PathBuf, doc: &Value, format: DocFormat) {
    let result = emit(doc, format).and_then(|rendered| {
        let mut rendered = rendered;
        if !rendered.ends_with('\n') {
            rendered.push('\n');
        }
        fs::write(file, rendered).map_err(BurrowError::from)
    });
    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

fn finish_document(file: &PathBuf, doc: &Value, format: DocFormat, in_place: bool) {
    if in_place {
        write_or_exit(file, doc, format);
    } else {
        print_value(doc, format);
    }
}

/// A set value is JSON when it parses as JSON; otherwise it is the literal
/// string (so `burrow set cfg.json user.name alice` needs no extra quoting).
fn parse_value_arg(raw: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from(json),
        Err(_) => Value::String(raw.to_string()),
    }
}

// ============================================================================
// OUTPUT FUNCTIONS
// ============================================================================

fn print_error(err: BurrowError) {
    let report = miette::Report::new(err);
    eprintln!("{report:?}");
}

fn print_verdict(found: bool) {
    let choice = if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    let color = if found { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = writeln!(&mut stdout, "{}", found);
    let _ = stdout.reset();
}
