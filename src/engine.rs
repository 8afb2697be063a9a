//! Conversion pipeline.
//!
//! Each statement runs through a small state machine:
//!
//! ```text
//! Unrecognized ─────────────────────────────────────────► Failed
//! Parsed ─► direct ─┬─► DirectSuccess
//!                   └─► preprocess ─► retry ─┬─► PreprocessedSuccess
//!                                            └─► Failed
//! ```
//!
//! Statements are independent: the only shared state is the immutable
//! dialect, so a script can be split across blocking workers and the
//! results put back in source order.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{DiagnosticEvent, Diagnostics, PREVIEW_CHARS};
use crate::dialect::DialectDefinition;
use crate::error::{ConvertError, ConvertResult};
use crate::parser::{self, ParseOutcome, SourceStatement};
use crate::preprocess::{self, Normalized, Preprocessor};
use crate::transpiler::{GeneratorOptions, Transpile, STATEMENT_SEPARATOR};

/// Terminal outcome of one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    DirectSuccess(String),
    PreprocessedSuccess(String),
    /// The terminal error message.
    Failed(String),
}

impl ConversionResult {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::DirectSuccess(_) => OutcomeKind::DirectSuccess,
            Self::PreprocessedSuccess(_) => OutcomeKind::PreprocessedSuccess,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Rendered target text, for successes.
    pub fn rendered(&self) -> Option<&str> {
        match self {
            Self::DirectSuccess(sql) | Self::PreprocessedSuccess(sql) => Some(sql),
            Self::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    DirectSuccess,
    PreprocessedSuccess,
    Failed,
}

/// Pipeline stage of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parse,
    Direct,
    Preprocessed,
}

/// One step taken for a statement; `error` is `None` when it succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub stage: Stage,
    pub error: Option<String>,
}

impl Attempt {
    fn failed(stage: Stage, error: &ConvertError) -> Self {
        Self {
            stage,
            error: Some(error.to_string()),
        }
    }

    fn succeeded(stage: Stage) -> Self {
        Self { stage, error: None }
    }
}

/// Everything known about one statement after conversion.
#[derive(Debug, Clone)]
pub struct StatementReport {
    pub statement: SourceStatement,
    pub result: ConversionResult,
    pub attempts: Vec<Attempt>,
    /// Fallback rewrite, when the preprocessor ran.
    pub normalized: Option<Normalized>,
}

impl StatementReport {
    pub fn preprocessor_invoked(&self) -> bool {
        self.normalized.is_some()
    }
}

/// Aggregate counters. `total == direct_success + preprocessed_success + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub total: usize,
    pub direct_success: usize,
    pub preprocessed_success: usize,
    pub failed: usize,
}

impl ConversionStats {
    pub fn record(&mut self, outcome: OutcomeKind) {
        self.total += 1;
        match outcome {
            OutcomeKind::DirectSuccess => self.direct_success += 1,
            OutcomeKind::PreprocessedSuccess => self.preprocessed_success += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.direct_success += other.direct_success;
        self.preprocessed_success += other.preprocessed_success;
        self.failed += other.failed;
    }

    pub fn succeeded(&self) -> usize {
        self.direct_success + self.preprocessed_success
    }

    /// Percentage of statements converted; `None` for an empty script.
    pub fn success_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.succeeded() as f64 / self.total as f64 * 100.0)
    }
}

/// Result of converting a whole script.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    /// Successful statements in source order, each terminated by `;\n`.
    pub output: String,
    pub results: Vec<StatementReport>,
    pub stats: ConversionStats,
    /// Charset rewrites made before parsing.
    pub replacements: usize,
}

impl ConversionReport {
    pub fn failures(&self) -> impl Iterator<Item = &StatementReport> {
        self.results.iter().filter(|r| !r.result.is_success())
    }
}

/// Direct-then-fallback converter bound to one target dialect.
#[derive(Debug, Clone)]
pub struct Converter {
    dialect: Arc<DialectDefinition>,
    options: GeneratorOptions,
    preprocessor: Preprocessor,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DialectDefinition::dameng(), GeneratorOptions::default())
    }
}

impl Converter {
    pub fn new(dialect: Arc<DialectDefinition>, options: GeneratorOptions) -> Self {
        Self {
            dialect,
            options,
            preprocessor: Preprocessor::default(),
        }
    }

    pub fn dialect(&self) -> &DialectDefinition {
        &self.dialect
    }

    pub fn options(&self) -> GeneratorOptions {
        self.options
    }

    /// Render every tree of a statement text, joined by the separator.
    fn render(&self, trees: &[sqlparser::ast::Statement]) -> ConvertResult<String> {
        let mut out = Vec::with_capacity(trees.len());
        for tree in trees {
            out.extend(tree.transpile(&self.dialect, &self.options)?);
        }
        Ok(out.join(STATEMENT_SEPARATOR))
    }

    fn attempt(&self, text: &str) -> ConvertResult<String> {
        match parser::parse_statement(text) {
            ParseOutcome::Tree(trees) => self.render(&trees),
            ParseOutcome::Rejected(e) | ParseOutcome::Unrecognized(e) => Err(e),
        }
    }

    /// Run one statement through the state machine. Pure: no logging.
    pub fn convert_statement(&self, statement: &SourceStatement) -> StatementReport {
        let mut attempts = Vec::new();

        let direct = match parser::parse_statement(&statement.text) {
            ParseOutcome::Unrecognized(e) => {
                attempts.push(Attempt::failed(Stage::Parse, &e));
                return StatementReport {
                    statement: statement.clone(),
                    result: ConversionResult::Failed(e.to_string()),
                    attempts,
                    normalized: None,
                };
            }
            ParseOutcome::Rejected(e) => {
                attempts.push(Attempt::failed(Stage::Parse, &e));
                Err(e)
            }
            ParseOutcome::Tree(trees) => {
                attempts.push(Attempt::succeeded(Stage::Parse));
                self.render(&trees)
            }
        };

        let direct_error = match direct {
            Ok(sql) => {
                attempts.push(Attempt::succeeded(Stage::Direct));
                return StatementReport {
                    statement: statement.clone(),
                    result: ConversionResult::DirectSuccess(sql),
                    attempts,
                    normalized: None,
                };
            }
            Err(e) => e,
        };
        attempts.push(Attempt::failed(Stage::Direct, &direct_error));

        let normalized = self.preprocessor.normalize(&statement.text);
        // Unchanged text would fail the same way again.
        let retry = if normalized.changed() {
            self.attempt(&normalized.text)
        } else {
            Err(direct_error)
        };

        let result = match retry {
            Ok(sql) => {
                attempts.push(Attempt::succeeded(Stage::Preprocessed));
                ConversionResult::PreprocessedSuccess(sql)
            }
            Err(e) => {
                attempts.push(Attempt::failed(Stage::Preprocessed, &e));
                ConversionResult::Failed(e.to_string())
            }
        };

        StatementReport {
            statement: statement.clone(),
            result,
            attempts,
            normalized: Some(normalized),
        }
    }

    /// Convert a whole script sequentially.
    pub fn convert_script(&self, script: &str, diagnostics: &mut Diagnostics) -> ConversionReport {
        let (statements, replacements) = self.prepare(script, diagnostics);

        let mut stats = ConversionStats::default();
        let reports: Vec<StatementReport> = statements
            .iter()
            .map(|statement| {
                let report = self.convert_statement(statement);
                stats.record(report.result.kind());
                report
            })
            .collect();

        self.assemble(reports, stats, replacements, diagnostics)
    }

    /// Convert a script over `jobs` blocking workers. Each worker takes a
    /// contiguous chunk, so concatenating the chunk results restores
    /// source order; per-worker counters are summed.
    pub async fn convert_script_concurrent(
        &self,
        script: &str,
        jobs: usize,
        diagnostics: &mut Diagnostics,
    ) -> ConvertResult<ConversionReport> {
        let (statements, replacements) = self.prepare(script, diagnostics);
        let chunk_size = statements.len().div_ceil(jobs.max(1)).max(1);

        let mut handles = Vec::new();
        for chunk in statements.chunks(chunk_size) {
            let converter = self.clone();
            let chunk = chunk.to_vec();
            handles.push(tokio::task::spawn_blocking(move || {
                let mut stats = ConversionStats::default();
                let reports: Vec<StatementReport> = chunk
                    .iter()
                    .map(|statement| {
                        let report = converter.convert_statement(statement);
                        stats.record(report.result.kind());
                        report
                    })
                    .collect();
                (reports, stats)
            }));
        }

        let mut reports = Vec::with_capacity(statements.len());
        let mut stats = ConversionStats::default();
        for handle in handles {
            let (chunk, partial) = handle
                .await
                .map_err(|e| ConvertError::Worker(e.to_string()))?;
            reports.extend(chunk);
            stats.merge(&partial);
        }

        Ok(self.assemble(reports, stats, replacements, diagnostics))
    }

    /// Read, convert and write a script file.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        diagnostics: &mut Diagnostics,
    ) -> ConvertResult<ConversionReport> {
        let script = read_script(input)?;
        let report = self.convert_script(&script, diagnostics);
        std::fs::write(output, &report.output)?;
        Ok(report)
    }

    /// Global normalization and splitting.
    fn prepare(&self, script: &str, diagnostics: &mut Diagnostics) -> (Vec<SourceStatement>, usize) {
        let charset = self.dialect.charset_name();
        let global = preprocess::normalize_script(script, charset);
        if global.replacements > 0 {
            diagnostics.emit(DiagnosticEvent::ScriptNormalized {
                charset: charset.to_string(),
                replacements: global.replacements,
            });
        }

        let statements = parser::split_script(&global.text);
        debug!(statements = statements.len(), "script split");
        (statements, global.replacements)
    }

    fn assemble(
        &self,
        reports: Vec<StatementReport>,
        stats: ConversionStats,
        replacements: usize,
        diagnostics: &mut Diagnostics,
    ) -> ConversionReport {
        let mut output = String::new();
        for report in &reports {
            emit_report(report, diagnostics);
            // Statements rendered to nothing (all clauses omitted) add no text.
            if let Some(sql) = report.result.rendered().filter(|sql| !sql.is_empty()) {
                output.push_str(sql);
                output.push_str(STATEMENT_SEPARATOR);
            }
        }

        diagnostics.emit(DiagnosticEvent::Summary {
            stats,
            success_rate: stats.success_rate(),
        });

        ConversionReport {
            output,
            results: reports,
            stats,
            replacements,
        }
    }
}

fn emit_report(report: &StatementReport, diagnostics: &mut Diagnostics) {
    let index = report.statement.index;

    for attempt in &report.attempts {
        let Some(error) = &attempt.error else {
            continue;
        };
        match attempt.stage {
            Stage::Parse => diagnostics.emit(DiagnosticEvent::ParseFailed {
                index,
                preview: report.statement.preview(PREVIEW_CHARS),
                error: error.clone(),
            }),
            Stage::Direct => diagnostics.emit(DiagnosticEvent::DirectFailed {
                index,
                error: error.clone(),
            }),
            Stage::Preprocessed => {}
        }
    }

    if let Some(normalized) = report.normalized.as_ref().filter(|n| n.changed()) {
        diagnostics.emit(DiagnosticEvent::Preprocessed {
            index,
            rules: normalized.applied.iter().map(|r| r.to_string()).collect(),
            before: report.statement.preview(PREVIEW_CHARS),
            after: parser::preview(&normalized.text, PREVIEW_CHARS),
        });
    }

    let (statement, error) = match &report.result {
        ConversionResult::Failed(error) => (Some(report.statement.text.clone()), Some(error.clone())),
        _ => (None, None),
    };
    diagnostics.emit(DiagnosticEvent::Outcome {
        index,
        outcome: report.result.kind(),
        statement,
        error,
    });
}

/// Read a script, failing on missing files and invalid UTF-8.
pub fn read_script(path: impl AsRef<Path>) -> ConvertResult<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).map_err(|e| ConvertError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;
    use pretty_assertions::assert_eq;

    fn converter() -> Converter {
        Converter::new(DialectDefinition::dameng(), GeneratorOptions::compact())
    }

    #[test]
    fn test_direct_success_skips_preprocessor() {
        let report = converter().convert_statement(&SourceStatement::new(1, "SELECT a FROM t"));
        assert_eq!(report.result, ConversionResult::DirectSuccess("SELECT a FROM t".to_string()));
        assert!(!report.preprocessor_invoked());
        assert_eq!(report.attempts.len(), 2);
    }

    #[test]
    fn test_fallback_records_attempts() {
        let report = converter().convert_statement(&SourceStatement::new(
            1,
            "CREATE TABLE t (id INT) ROW_FORMAT=DYNAMIC",
        ));
        assert_eq!(
            report.result,
            ConversionResult::PreprocessedSuccess("CREATE TABLE t (id INT)".to_string())
        );
        let stages: Vec<Stage> = report.attempts.iter().map(|a| a.stage).collect();
        assert_eq!(stages, vec![Stage::Parse, Stage::Direct, Stage::Preprocessed]);
        assert!(report.attempts[1].error.is_some());
    }

    #[test]
    fn test_unrecognized_short_circuits() {
        let report = converter().convert_statement(&SourceStatement::new(1, "FROBNICATE everything"));
        assert!(matches!(report.result, ConversionResult::Failed(_)));
        assert!(!report.preprocessor_invoked());
        assert_eq!(report.attempts.len(), 1);
    }

    #[test]
    fn test_failure_without_applicable_rule() {
        let report = converter().convert_statement(&SourceStatement::new(1, "INSERT IGNORE INTO t (a) VALUES (1)"));
        assert_eq!(
            report.result,
            ConversionResult::Failed("Unsupported construct: INSERT IGNORE".to_string())
        );
        assert!(report.preprocessor_invoked());
    }

    #[test]
    fn test_stats() {
        let mut stats = ConversionStats::default();
        assert_eq!(stats.success_rate(), None);
        stats.record(OutcomeKind::DirectSuccess);
        stats.record(OutcomeKind::Failed);
        let mut other = ConversionStats::default();
        other.record(OutcomeKind::PreprocessedSuccess);
        other.record(OutcomeKind::DirectSuccess);
        stats.merge(&other);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.succeeded(), 3);
        assert_eq!(stats.success_rate(), Some(75.0));
    }

    #[test]
    fn test_script_diagnostics() {
        let memory = MemorySink::new();
        let mut diagnostics = Diagnostics::new().with_sink(memory.clone());
        let report = converter().convert_script("SELECT 1; garbage here; SELECT 2;", &mut diagnostics);

        assert_eq!(report.output, "SELECT 1;\nSELECT 2;\n");
        let events = memory.events();
        assert!(events.iter().any(|e| matches!(
            e,
            DiagnosticEvent::Outcome { index: 2, outcome: OutcomeKind::Failed, statement: Some(s), .. }
                if s == "garbage here"
        )));
        assert!(matches!(events.last(), Some(DiagnosticEvent::Summary { .. })));
    }
}
