//! The crate error type.
//!
//! Accessor operations never produce errors: absence and mid-walk type
//! mismatches are reported through `Option`/`bool`/no-op returns. Errors
//! exist only at the I/O and codec boundary, and are rendered as miette
//! diagnostics by the CLI.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BurrowError {
    #[error("I/O error: {0}")]
    #[diagnostic(code(burrow::io))]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(burrow::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    #[diagnostic(code(burrow::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported document format: {path}")]
    #[diagnostic(
        code(burrow::format),
        help("supported extensions are .json, .yaml and .yml")
    )]
    UnsupportedFormat { path: String },
}
