//! Resource lifetime tracking for JVM method bodies.
//!
//! Detects method-local resources (streams, sockets, connections) that are
//! acquired but never released. Each method is scanned once, instruction by
//! instruction, tracking which local slots hold open handles. Call sites
//! are classified as opening or closing a resource; when the descriptor
//! heuristic flags a call that is not yet settled, the callee's own body is
//! scanned to decide, and the verdict is cached for every later call site
//! with the same identity.
//!
//! # Architecture
//!
//! - [`ResourceRegistry`]: which classes are resources and how they are
//!   released.
//! - [`ClassificationCache`]: shared, append-only open/close verdicts.
//! - [`ResourceInstanceCapturer`]: per-scan slot bookkeeping.
//! - [`scan`]: the per-instruction state machine and nested lookahead.
//! - [`LookaheadStack`]: cycle detection and depth bound for lookahead.
//! - [`ClassResolver`]: where callee bodies come from; [`ClassPath`] is
//!   the in-memory implementation.
//! - [`LeakAnalyzer`]: the entry point, sequential or parallel.
//!
//! # Debugging
//!
//! Call [`init_tracing`] and set `RUST_LOG=seep_lifetime=debug` to see
//! lookahead verdicts, or `=trace` for per-instruction transitions.

mod analyzer;
mod cache;
mod capture;
mod config;
mod error;
mod lookahead;
mod operation;
mod registry;
mod resolve;
pub mod scan;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use analyzer::LeakAnalyzer;
#[cfg(feature = "cache")]
pub use cache::CacheError;
pub use cache::{CacheEntry, ClassificationCache};
pub use capture::{ResourceInstance, ResourceInstanceCapturer};
pub use config::ScanConfig;
pub use error::ScanError;
pub use lookahead::{ensure_sufficient_stack, LookaheadStack, DEFAULT_MAX_DEPTH};
pub use operation::{Classification, OperationIdentity, OperationRole};
pub use registry::{
    ClassHierarchy, ResourceRegistry, ResourceType, TypeHierarchy, DEFAULT_RELEASE_METHOD,
};
pub use resolve::{ClassPath, ClassResolver, ResolveError};
pub use scan::{ScanContext, ScanLevel};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, or
/// when another global subscriber is already installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
