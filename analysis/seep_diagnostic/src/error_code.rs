//! Error codes for all scanner diagnostics.
//!
//! Each code is a stable identifier used for suppression lists and
//! documentation lookups.

use std::fmt;

/// Error codes for all scanner diagnostics.
///
/// Format: letter + four digits.
/// - E1xxx: resource lifetime errors
/// - W1xxx: analysis warnings (incomplete evidence)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Resource acquired in a method but not released on exit
    E1001,
    /// Callee could not be resolved for lookahead
    W1001,
}

impl ErrorCode {
    /// All codes, in documentation order.
    pub const ALL: &'static [ErrorCode] = &[ErrorCode::E1001, ErrorCode::W1001];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::W1001 => "W1001",
        }
    }

    /// Short kind name shown next to the code.
    pub fn kind(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "resource not released",
            ErrorCode::W1001 => "lookahead skipped",
        }
    }

    /// Long-form explanation.
    pub fn explanation(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => {
                "A resource (stream, reader, connection, socket, ...) was opened in this \
                 method, stored in a local variable, and neither closed nor returned \
                 before the method exits. Close it on every path, or return it so the \
                 caller takes ownership."
            }
            ErrorCode::W1001 => {
                "A call looked like it opens or closes a resource, but the callee's class \
                 or method body was not available. The call was treated as neither, which \
                 can hide a leak."
            }
        }
    }

    /// Check if this is a resource lifetime error (E1xxx range).
    pub fn is_lifetime_error(&self) -> bool {
        matches!(self, ErrorCode::E1001)
    }

    /// Check if this is a warning code (W prefix).
    pub fn is_warning(&self) -> bool {
        matches!(self, ErrorCode::W1001)
    }

    /// Look a code up by its string form.
    pub fn parse(code: &str) -> Option<ErrorCode> {
        Self::ALL.iter().copied().find(|c| c.as_str() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
