//! Errors raised inside a lookahead.
//!
//! None of these escape a scan: the engine logs them and treats the
//! callee as providing no evidence.

use std::any::Any;

use crate::{OperationIdentity, OperationRole, ResolveError};

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// The `(identity, role)` pair is already being looked into further up.
    #[error("lookahead cycle through `{identity}` ({role})")]
    Cycle {
        identity: OperationIdentity,
        role: OperationRole,
    },
    #[error("lookahead depth limit of {limit} reached")]
    DepthExceeded { limit: usize },
    /// A host collaborator panicked while the callee was being scanned.
    #[error("lookahead panicked: {message}")]
    Panicked { message: String },
}

impl ScanError {
    /// Whether the verdict for the callee may be cached.
    ///
    /// Resolution failures are deterministic for a given class path; cycle
    /// and depth outcomes depend on the path that reached the callee.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, ScanError::Resolve(_))
    }

    /// Wrap a panic payload caught at the lookahead boundary.
    pub fn panicked(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic".to_string()
        };
        ScanError::Panicked { message }
    }
}
