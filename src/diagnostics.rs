//! Diagnostics for the weft compiler
//!
//! Append-only error/warning collector keyed by node identity and pipeline
//! stage, plus the per-stage wall-clock tracker. Nothing in the pipeline is
//! allowed to escape as a panic; every failure mode lands here instead.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Input,
    Analysis,
    Utility,
    Framework,
    Styling,
    Render,
    Output,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Analysis => "analysis",
            Stage::Utility => "utility",
            Stage::Framework => "framework",
            Stage::Styling => "styling",
            Stage::Render => "render",
            Stage::Output => "output",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub extension_key: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", self.stage.as_str(), label, self.message)?;
        if let Some(node) = &self.node_id {
            write!(f, " (node {})", node)?;
        }
        if let Some(key) = &self.extension_key {
            write!(f, " (extension '{}')", key)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COLLECTOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCollector {
    entries: Vec<Diagnostic>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn warning(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            stage,
            message: message.into(),
            node_id: None,
            extension_key: None,
        });
    }

    pub fn error(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Error,
            stage,
            message: message.into(),
            node_id: None,
            extension_key: None,
        });
    }

    pub fn node_warning(
        &mut self,
        stage: Stage,
        node_id: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            stage,
            message: message.into(),
            node_id: Some(node_id.into()),
            extension_key: None,
        });
    }

    pub fn extension_error(
        &mut self,
        stage: Stage,
        extension_key: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic {
            severity: Severity::Error,
            stage,
            message: message.into(),
            node_id: None,
            extension_key: Some(extension_key.into()),
        });
    }

    /// Move every entry of `other` into this collector, preserving order.
    pub fn merge(&mut self, other: ErrorCollector) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count_by(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_by(Severity::Warning)
    }

    pub fn count_by(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mirror every entry to the diagnostic log stream. Verbose mode only;
    /// never alters the collected data.
    pub fn log_all(&self) {
        for entry in &self.entries {
            match entry.severity {
                Severity::Warning => log::warn!("{}", entry),
                Severity::Error => log::error!("{}", entry),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURAL ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Input shape invalid. The only fatal failure: it short-circuits the call
/// before any extension runs, producing an empty result.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralError {
    pub message: String,
}

impl StructuralError {
    pub fn new(message: impl Into<String>) -> Self {
        StructuralError {
            message: message.into(),
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "structural error: {}", self.message)
    }
}

impl std::error::Error for StructuralError {}

// ═══════════════════════════════════════════════════════════════════════════════
// PERFORMANCE TRACKING
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_ms: f64,
    pub stages: IndexMap<String, f64>,
}

/// Wall-clock timer for the pipeline. One instance per `process` call;
/// stages are recorded in invocation order.
#[derive(Debug)]
pub struct PerformanceTracker {
    begun: Instant,
    stages: IndexMap<String, f64>,
    current: Option<(String, Instant)>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        PerformanceTracker {
            begun: Instant::now(),
            stages: IndexMap::new(),
            current: None,
        }
    }

    /// Begin timing a stage, closing out any stage still open.
    pub fn begin_stage(&mut self, name: &str) {
        self.end_stage();
        self.current = Some((name.to_string(), Instant::now()));
    }

    pub fn end_stage(&mut self) {
        if let Some((name, started)) = self.current.take() {
            let elapsed = started.elapsed().as_secs_f64() * 1000.0;
            *self.stages.entry(name).or_insert(0.0) += elapsed;
        }
    }

    pub fn finish(mut self) -> PerformanceMetrics {
        self.end_stage();
        PerformanceMetrics {
            total_ms: self.begun.elapsed().as_secs_f64() * 1000.0,
            stages: self.stages,
        }
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}
