//! Diagnostics for identifier resolution.
//!
//! This module provides:
//! - Target names for filtering this crate's `tracing` output
//! - The [`DiagnosticSink`] trait that receives one [`ResolutionRecord`] per
//!   resolved node when debug logging is on
//! - Sinks: [`NoopSink`] (default), [`TracingSink`], [`RecordingSink`]
//!
//! # The debug-logging gate
//!
//! Resolution happens on the UI redraw path. The applicator only builds a
//! record and calls the sink when
//! [`ComplianceConfig::debug_logging`](crate::ComplianceConfig::debug_logging)
//! is `true`; with the flag off the sink is never invoked, whatever the
//! subscriber's level.
//!
//! # Tracing Integration
//!
//! [`TracingSink`] forwards records as `tracing` events. Install a subscriber
//! to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_lattice_compliance::resolution=debug")
//!     .init();
//! ```

use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;

use crate::applicator::ComplianceLevel;
use crate::overrides::OverrideFlags;
use crate::resolver::{PrecedenceRule, ResolvedName};

/// Target names for log filtering.
pub mod targets {
    /// Per-node resolution records.
    pub const RESOLUTION: &str = "horizon_lattice_compliance::resolution";
    /// Configuration loading.
    pub const CONFIG: &str = "horizon_lattice_compliance::config";
    /// Build pass lifecycle.
    pub const PASS: &str = "horizon_lattice_compliance::pass";
    /// Audit reports.
    pub const AUDIT: &str = "horizon_lattice_compliance::audit";
}

/// Span names used for build-pass tracing.
pub mod span_names {
    /// One tree-build pass.
    pub const BUILD_PASS: &str = "horizon_lattice_compliance::build_pass";
}

/// Everything known about one resolution, for diagnosing precedence bugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRecord {
    /// Sanitized breadcrumb of the node.
    pub breadcrumb: Vec<String>,
    /// The node's component name (the inferred base name).
    pub component: String,
    pub flags: OverrideFlags,
    pub level: ComplianceLevel,
    pub rule: PrecedenceRule,
    /// Both force flags were set.
    pub ambiguous: bool,
    pub decision: ResolvedName,
    /// The identifier attached, if one was generated.
    pub identifier: Option<String>,
}

impl fmt::Display for ResolutionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} -> ", self.breadcrumb.join("."), self.component)?;
        match &self.identifier {
            Some(id) => write!(f, "{id}")?,
            None => f.write_str("(suppressed)")?,
        }
        write!(f, " via {}", self.rule)?;
        if self.ambiguous {
            f.write_str(" (ambiguous flags)")?;
        }
        Ok(())
    }
}

/// Receiver of resolution diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Accept one record.
    fn record(&self, record: &ResolutionRecord);
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn record(&self, _record: &ResolutionRecord) {}
}

/// A sink that emits `tracing` events on [`targets::RESOLUTION`].
///
/// Every record is a `debug` event. Ambiguous flag combinations carry
/// `ambiguous = true` so they can be picked out without raising the level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, record: &ResolutionRecord) {
        let breadcrumb = record.breadcrumb.join(".");
        let identifier = record.identifier.as_deref().unwrap_or("");

        tracing::debug!(
            target: targets::RESOLUTION,
            breadcrumb = %breadcrumb,
            component = %record.component,
            rule = %record.rule,
            suppressed = record.decision.is_suppressed(),
            ambiguous = record.ambiguous,
            identifier,
            "resolved"
        );
    }
}

/// A sink that keeps records in memory, for tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ResolutionRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record received so far.
    pub fn records(&self) -> Vec<ResolutionRecord> {
        self.records.lock().clone()
    }

    /// Number of records received.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return every record.
    pub fn take(&self) -> Vec<ResolutionRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, record: &ResolutionRecord) {
        self.records.lock().push(record.clone());
    }
}
