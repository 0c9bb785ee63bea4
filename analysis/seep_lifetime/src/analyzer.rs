//! Front door: analyze methods for resources that are never released.

use std::borrow::Borrow;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use seep_diagnostic::Diagnostic;
use seep_ir::MethodBody;

use crate::scan::{MethodScan, ScanEnv, ScanLevel};
use crate::{
    ClassPath, ClassResolver, ClassificationCache, LookaheadStack, ResourceRegistry, ScanConfig,
    ScanError,
};

/// Resource leak analyzer.
///
/// Holds the shared inputs of one analysis run. Each analyzed method gets
/// its own scan state; only the classification cache is written to, and
/// it is safe to share across threads.
///
/// # Example
///
/// ```text
/// let registry = ResourceRegistry::jdk_defaults();
/// let cache = ClassificationCache::new();
/// let analyzer = LeakAnalyzer::new(&registry, &class_path, &cache);
/// let findings = analyzer.analyze_class_path(&class_path);
/// ```
pub struct LeakAnalyzer<'a> {
    registry: &'a ResourceRegistry,
    resolver: &'a dyn ClassResolver,
    cache: &'a ClassificationCache,
    config: ScanConfig,
}

impl<'a> LeakAnalyzer<'a> {
    pub fn new(
        registry: &'a ResourceRegistry,
        resolver: &'a dyn ClassResolver,
        cache: &'a ClassificationCache,
    ) -> Self {
        LeakAnalyzer {
            registry,
            resolver,
            cache,
            config: ScanConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn cache(&self) -> &'a ClassificationCache {
        self.cache
    }

    fn env(&self) -> ScanEnv<'_> {
        ScanEnv {
            registry: self.registry,
            cache: self.cache,
            resolver: self.resolver,
            config: &self.config,
        }
    }

    /// Analyze one method body.
    ///
    /// Returns one "resource not released" diagnostic per handle still open
    /// when the body ends, followed by any lookahead notes. An empty
    /// registry, or a body without code, yields nothing. A panic from a host
    /// collaborator abandons this method only.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(class = %method.class_name, method = %method.name)
    )]
    pub fn analyze_method(&self, method: &MethodBody) -> Vec<Diagnostic> {
        if self.registry.is_empty() || !method.has_code() {
            return Vec::new();
        }

        let scan = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut lookahead = LookaheadStack::new(self.config.max_lookahead_depth);
            MethodScan::new(self.env(), method, ScanLevel::Raw, &mut lookahead).run_raw()
        }));
        let diagnostics = match scan {
            Ok(diagnostics) => diagnostics,
            Err(payload) => {
                let err = ScanError::panicked(payload.as_ref());
                tracing::warn!(error = %err, "method analysis abandoned");
                return Vec::new();
            }
        };
        tracing::debug!(findings = diagnostics.len(), "method analyzed");
        diagnostics
    }

    /// Analyze methods in parallel.
    ///
    /// Results are in input order, as if each method were analyzed in turn.
    #[tracing::instrument(level = "debug", skip_all, fields(methods = methods.len()))]
    pub fn analyze_methods<M>(&self, methods: &[M]) -> Vec<Diagnostic>
    where
        M: Borrow<MethodBody> + Sync,
    {
        methods
            .par_iter()
            .flat_map_iter(|m| {
                let method: &MethodBody = m.borrow();
                self.analyze_method(method)
            })
            .collect()
    }

    /// Analyze every method of a class path, sorted by class and method.
    pub fn analyze_class_path(&self, class_path: &ClassPath) -> Vec<Diagnostic> {
        let mut methods: Vec<_> = class_path.methods().collect();
        methods.sort_by(|a, b| {
            (&a.class_name, &a.name, &a.descriptor).cmp(&(&b.class_name, &b.name, &b.descriptor))
        });
        methods
            .par_iter()
            .flat_map_iter(|m| self.analyze_method(m))
            .collect()
    }
}
