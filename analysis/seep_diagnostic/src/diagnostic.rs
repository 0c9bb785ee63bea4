//! Core diagnostic types for structured reporting.
//!
//! Defines [`Diagnostic`], [`Label`], and [`Severity`]. Diagnostics are
//! plain data: the scanner produces them, the host decides how to render
//! or persist them.

use std::fmt;

use seep_ir::Location;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled location with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub location: Location,
    pub message: String,
    /// Whether this is the primary location.
    pub is_primary: bool,
}

impl Label {
    pub fn primary(location: Location, message: impl Into<String>) -> Self {
        Label {
            location,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(location: Location, message: impl Into<String>) -> Self {
        Label {
            location,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A diagnostic about one method.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// Enclosing class, binary name.
    pub class_name: String,
    /// Enclosing method name.
    pub method_name: String,
    pub source_file: Option<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            class_name: String::new(),
            method_name: String::new(),
            source_file: None,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Create a diagnostic with an explicit severity.
    pub fn with_severity_of(code: ErrorCode, severity: Severity) -> Self {
        Self::new_with_severity(code, severity)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the enclosing class and method.
    pub fn in_method(
        mut self,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        self.class_name = class_name.into();
        self.method_name = method_name.into();
        self
    }

    pub fn with_source_file(mut self, file: Option<String>) -> Self {
        self.source_file = file;
        self
    }

    /// Add a primary label.
    pub fn with_label(mut self, location: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(location, message));
        self
    }

    pub fn with_secondary_label(mut self, location: Location, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(location, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Location of the first primary label.
    pub fn primary_location(&self) -> Option<Location> {
        self.labels
            .iter()
            .find(|l| l.is_primary)
            .map(|l| l.location)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;
        write!(f, "\n  in {}.{}", self.class_name, self.method_name)?;
        if let Some(file) = &self.source_file {
            write!(f, " ({file})")?;
        }

        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            write!(f, "\n  {} {}: {}", marker, label.location, label.message)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}

/// Create a "resource not released" diagnostic.
///
/// `opened_by` names the call that produced the resource and `resource`
/// the registered resource type it was matched against.
pub fn resource_not_released(
    class_name: &str,
    method_name: &str,
    location: Location,
    opened_by: &str,
    resource: &str,
) -> Diagnostic {
    Diagnostic::error(ErrorCode::E1001)
        .with_message(format!("{resource} opened here is never released"))
        .in_method(class_name, method_name)
        .with_label(location, format!("`{opened_by}` acquires a resource"))
        .with_note("close the resource on every path, or return it to the caller")
}

/// Create a "lookahead skipped" diagnostic for an unresolvable callee.
pub fn lookahead_skipped(
    class_name: &str,
    method_name: &str,
    location: Location,
    callee: &str,
    reason: &str,
) -> Diagnostic {
    Diagnostic::with_severity_of(ErrorCode::W1001, Severity::Note)
        .with_message(format!("could not look into `{callee}`"))
        .in_method(class_name, method_name)
        .with_label(location, reason.to_string())
}

#[cfg(test)]
mod tests;
