//! Per-run diagnostics stream.
//!
//! A conversion run reports into an explicitly constructed [`Diagnostics`]
//! value instead of a process-wide logger, so concurrent runs never share
//! log state. `Diagnostics` fans each event out to its sinks:
//!
//! - [`MemorySink`] keeps events for inspection (tests, summaries)
//! - [`TracingSink`] forwards to `tracing` at the matching level
//! - [`JsonLinesSink`] writes one timestamped JSON object per line

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::engine::{ConversionStats, OutcomeKind};
use crate::error::{ConvertError, ConvertResult};

/// Characters of statement text kept in warning previews.
pub const PREVIEW_CHARS: usize = 100;

/// One entry of the diagnostics stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    /// The script-level charset rewrite changed the input.
    ScriptNormalized { charset: String, replacements: usize },
    /// The front-end could not produce a tree.
    ParseFailed {
        index: usize,
        preview: String,
        error: String,
    },
    /// The direct attempt failed; the fallback runs next.
    DirectFailed { index: usize, error: String },
    /// Fallback rules rewrote the statement text.
    Preprocessed {
        index: usize,
        rules: Vec<String>,
        before: String,
        after: String,
    },
    /// Terminal outcome of one statement. Failures carry the full text.
    Outcome {
        index: usize,
        outcome: OutcomeKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        statement: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// End-of-run counters.
    Summary {
        #[serde(flatten)]
        stats: ConversionStats,
        success_rate: Option<f64>,
    },
}

/// A consumer of diagnostic events.
pub trait DiagnosticsSink: Send {
    fn record(&mut self, event: &DiagnosticEvent) -> ConvertResult<()>;

    fn flush(&mut self) -> ConvertResult<()> {
        Ok(())
    }
}

/// Fan-out over the sinks of one run.
#[derive(Default)]
pub struct Diagnostics {
    sinks: Vec<Box<dyn DiagnosticsSink>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Diagnostics::add`].
    pub fn with_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.add(sink);
        self
    }

    pub fn add(&mut self, sink: impl DiagnosticsSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Deliver an event to every sink. A failing sink does not stop the
    /// others or the run.
    pub fn emit(&mut self, event: DiagnosticEvent) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.record(&event) {
                warn!(error = %e, "diagnostics sink rejected event");
            }
        }
    }

    /// Flush all sinks, returning the first error.
    pub fn finish(&mut self) -> ConvertResult<()> {
        let mut first = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }
}

/// Keeps events in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&mut self, event: &DiagnosticEvent) -> ConvertResult<()> {
        self.events
            .lock()
            .map_err(|_| ConvertError::Worker("memory sink poisoned".to_string()))?
            .push(event.clone());
        Ok(())
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, event: &DiagnosticEvent) -> ConvertResult<()> {
        match event {
            DiagnosticEvent::ScriptNormalized {
                charset,
                replacements,
            } => info!(charset = %charset, replacements, "charset rewritten"),
            DiagnosticEvent::ParseFailed {
                index,
                preview,
                error,
            } => warn!(index, error = %error, "parse failed: {}", preview),
            DiagnosticEvent::DirectFailed { index, error } => {
                warn!(index, error = %error, "direct conversion failed, trying preprocessed")
            }
            DiagnosticEvent::Preprocessed {
                index,
                rules,
                before,
                after,
            } => info!(index, rules = ?rules, "preprocessed: {} => {}", before, after),
            DiagnosticEvent::Outcome {
                index,
                outcome: OutcomeKind::Failed,
                statement,
                error,
            } => error!(
                index,
                error = error.as_deref().unwrap_or(""),
                "conversion failed:\n{}",
                statement.as_deref().unwrap_or("")
            ),
            DiagnosticEvent::Outcome { index, outcome, .. } => {
                tracing::debug!(index, outcome = ?outcome, "converted")
            }
            DiagnosticEvent::Summary {
                stats,
                success_rate,
            } => info!(
                total = stats.total,
                direct_success = stats.direct_success,
                preprocessed_success = stats.preprocessed_success,
                failed = stats.failed,
                success_rate = success_rate.unwrap_or(0.0),
                "conversion finished"
            ),
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Line<'a> {
    timestamp: String,
    #[serde(flatten)]
    event: &'a DiagnosticEvent,
}

/// Writes JSON lines with an RFC 3339 timestamp.
pub struct JsonLinesSink<W: Write + Send> {
    writer: BufWriter<W>,
}

impl JsonLinesSink<File> {
    /// Create (or truncate) a log file.
    pub fn create(path: impl AsRef<Path>) -> ConvertResult<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    pub fn into_inner(self) -> ConvertResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| ConvertError::Io(e.into_error()))
    }
}

impl<W: Write + Send> DiagnosticsSink for JsonLinesSink<W> {
    fn record(&mut self, event: &DiagnosticEvent) -> ConvertResult<()> {
        let line = Line {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
        };
        serde_json::to_writer(&mut self.writer, &line).map_err(std::io::Error::from)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> ConvertResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_event() -> DiagnosticEvent {
        DiagnosticEvent::Outcome {
            index: 3,
            outcome: OutcomeKind::Failed,
            statement: Some("FOO BAR".to_string()),
            error: Some("Unrecognized statement: FOO BAR".to_string()),
        }
    }

    #[test]
    fn test_memory_sink_shares_buffer() {
        let memory = MemorySink::new();
        let mut diagnostics = Diagnostics::new().with_sink(memory.clone());
        diagnostics.emit(failed_event());
        assert_eq!(memory.events(), vec![failed_event()]);
    }

    #[test]
    fn test_json_lines_shape() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.record(&failed_event()).unwrap();
        sink.record(&DiagnosticEvent::Summary {
            stats: ConversionStats {
                total: 2,
                direct_success: 1,
                preprocessed_success: 0,
                failed: 1,
            },
            success_rate: Some(50.0),
        })
        .unwrap();
        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "outcome");
        assert_eq!(lines[0]["outcome"], "failed");
        assert_eq!(lines[0]["statement"], "FOO BAR");
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["event"], "summary");
        assert_eq!(lines[1]["failed"], 1);
        assert_eq!(lines[1]["success_rate"], 50.0);
    }

    #[test]
    fn test_success_outcome_omits_text() {
        let event = DiagnosticEvent::Outcome {
            index: 1,
            outcome: OutcomeKind::DirectSuccess,
            statement: None,
            error: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("statement").is_none());
        assert_eq!(value["outcome"], "direct_success");
    }
}
