//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Report limits to prevent overwhelming output
//! - Deduplication of identical findings (same code, method, and location)
//! - Stable ordering by class, method, and bytecode offset

use std::collections::HashSet;

use seep_ir::Location;

use crate::Diagnostic;

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct QueueConfig {
    /// Maximum number of diagnostics kept (0 = unlimited).
    pub limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            limit: 0,
            deduplicate: true,
        }
    }
}

impl QueueConfig {
    /// A config with no limits and no dedup (for testing).
    pub fn unlimited() -> Self {
        QueueConfig {
            limit: 0,
            deduplicate: false,
        }
    }
}

/// Identity of a finding for deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct FindingKey {
    code: &'static str,
    class_name: String,
    method_name: String,
    location: Option<Location>,
}

impl FindingKey {
    fn of(diag: &Diagnostic) -> Self {
        FindingKey {
            code: diag.code.as_str(),
            class_name: diag.class_name.clone(),
            method_name: diag.method_name.clone(),
            location: diag.primary_location(),
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.extend(analyzer.analyze_methods(&methods));
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    seen: HashSet<FindingKey>,
    error_count: usize,
    config: QueueConfig,
}

impl DiagnosticQueue {
    /// Create a new queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QueueConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic.
    ///
    /// Returns `true` if it was queued, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic) -> bool {
        if self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && !self.seen.insert(FindingKey::of(&diag)) {
            return false;
        }
        if diag.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Check if the report limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.limit > 0 && self.diagnostics.len() >= self.config.limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sort diagnostics by class, method, and offset, and return them.
    ///
    /// Clears the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by(|a, b| {
            let pc = |d: &Diagnostic| d.primary_location().map_or(0, Location::pc);
            (&a.class_name, &a.method_name, pc(a)).cmp(&(&b.class_name, &b.method_name, pc(b)))
        });

        self.seen.clear();
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Get diagnostics without clearing the queue.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl Extend<Diagnostic> for DiagnosticQueue {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diag in iter {
            self.add(diag);
        }
    }
}

#[cfg(test)]
mod tests;
