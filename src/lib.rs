//! # sqlport — MySQL to Dameng SQL conversion
//!
//! Converts MySQL scripts statement by statement. Each statement is first
//! translated structurally; if that fails, a fixed set of textual rewrites
//! is applied to its original text and the translation is retried.
//! Statements that still fail are left out of the output and reported in
//! the diagnostics stream.
//!
//! ## Quick Example
//!
//! ```
//! let sql = sqlport::convert("SELECT * FROM users LIMIT 10 OFFSET 5;");
//! assert_eq!(sql, "SELECT\n  *\nFROM users\nLIMIT 10\nOFFSET 5;\n");
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Input → Output |
//! |-------|--------|----------------|
//! | charset rewrite | [`preprocess`] | script → script |
//! | split | [`parser`] | script → statements |
//! | direct attempt | [`parser`], [`transpiler`] | statement → target SQL |
//! | fallback | [`preprocess`], then direct again | statement → target SQL |
//! | report | [`engine`], [`diagnostics`] | results → output + stats |
//!
//! Target dialects are layered override tables ([`dialect`]): Dameng
//! inherits from Oracle, which inherits from a generic default.

pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod parser;
pub mod preprocess;
pub mod surface;
pub mod transpiler;
pub mod types;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::diagnostics::{
        DiagnosticEvent, Diagnostics, DiagnosticsSink, JsonLinesSink, MemorySink, TracingSink,
    };
    pub use crate::dialect::{ConstructKind, DialectDefinition, LimitStyle, Rendering};
    pub use crate::engine::{
        ConversionReport, ConversionResult, ConversionStats, Converter, OutcomeKind,
        StatementReport,
    };
    pub use crate::error::*;
    pub use crate::parser::{split_script, SourceStatement};
    pub use crate::preprocess::Preprocessor;
    pub use crate::transpiler::{GeneratorOptions, Transpile};
    pub use crate::types::AbstractType;
}

/// Convert a MySQL script to Dameng with default options, returning only
/// the output script.
///
/// # Example
///
/// ```
/// let sql = sqlport::convert("CREATE TABLE t (id INT AUTO_INCREMENT) ENGINE=InnoDB;");
/// assert_eq!(sql, "CREATE TABLE t (\n  id INT IDENTITY\n);\n");
/// ```
pub fn convert(script: &str) -> String {
    engine::Converter::default()
        .convert_script(script, &mut diagnostics::Diagnostics::new())
        .output
}
