//! Bookkeeping for nested lookahead scans.
//!
//! Each nested scan owns its own context on the Rust call stack; this stack
//! only records which `(identity, role)` pairs are in flight so recursion
//! through mutually calling helpers terminates.

use smallvec::SmallVec;

use crate::{OperationIdentity, OperationRole, ScanError};

/// Default bound on nested lookahead depth.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Minimum stack space to keep available (100KB red zone).
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if little remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// In-flight lookaheads on one worker, innermost last.
#[derive(Clone, Debug)]
pub struct LookaheadStack {
    frames: SmallVec<[(OperationIdentity, OperationRole); 8]>,
    max_depth: usize,
}

impl LookaheadStack {
    pub fn new(max_depth: usize) -> Self {
        LookaheadStack {
            frames: SmallVec::new(),
            max_depth,
        }
    }

    /// Push a lookahead for `(identity, role)`.
    ///
    /// Fails without pushing when the pair is already in flight or the
    /// depth limit is reached. Every successful `enter` must be paired with
    /// an [`exit`](Self::exit).
    pub fn enter(
        &mut self,
        identity: &OperationIdentity,
        role: OperationRole,
    ) -> Result<(), ScanError> {
        if self.contains(identity, role) {
            return Err(ScanError::Cycle {
                identity: identity.clone(),
                role,
            });
        }
        if self.frames.len() >= self.max_depth {
            return Err(ScanError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.frames.push((identity.clone(), role));
        Ok(())
    }

    pub fn exit(&mut self) {
        let popped = self.frames.pop();
        debug_assert!(popped.is_some(), "LookaheadStack::exit without enter");
    }

    pub fn contains(&self, identity: &OperationIdentity, role: OperationRole) -> bool {
        self.frames
            .iter()
            .any(|(id, r)| *r == role && id == identity)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for LookaheadStack {
    fn default() -> Self {
        LookaheadStack::new(DEFAULT_MAX_DEPTH)
    }
}
