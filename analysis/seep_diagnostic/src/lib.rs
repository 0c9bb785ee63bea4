//! Diagnostic system for the seep resource-leak scanner.
//!
//! - Error codes for suppression lists and documentation lookups
//! - Clear messages (what leaked)
//! - Primary location (where it was acquired)
//! - Enclosing class and method
//!
//! Diagnostics are data, never errors: analysis failures degrade to "no
//! evidence" and only confirmed findings reach this crate.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{lookahead_skipped, resource_not_released, Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticQueue, QueueConfig};
