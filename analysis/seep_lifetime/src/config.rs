//! Scanner configuration.

use seep_diagnostic::Severity;

use crate::lookahead::DEFAULT_MAX_DEPTH;

/// Configuration for one analysis run.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ScanConfig {
    /// Maximum nesting of lookahead scans (0 disables lookahead).
    pub max_lookahead_depth: usize,
    /// Report handles that were opened but never stored into a slot.
    pub report_unstored: bool,
    /// Emit a `W1001` note when a callee looked into from the analyzed
    /// method cannot be resolved.
    pub report_unresolved: bool,
    /// Severity of "resource not released" findings.
    pub severity: Severity,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            max_lookahead_depth: DEFAULT_MAX_DEPTH,
            report_unstored: true,
            report_unresolved: false,
            severity: Severity::Error,
        }
    }
}

impl ScanConfig {
    #[must_use]
    pub fn with_max_lookahead_depth(mut self, depth: usize) -> Self {
        self.max_lookahead_depth = depth;
        self
    }

    #[must_use]
    pub fn with_report_unstored(mut self, report: bool) -> Self {
        self.report_unstored = report;
        self
    }

    #[must_use]
    pub fn with_report_unresolved(mut self, report: bool) -> Self {
        self.report_unresolved = report;
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}
