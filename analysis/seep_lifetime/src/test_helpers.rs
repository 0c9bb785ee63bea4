//! Shared test utilities for scan and analyzer tests.
//!
//! Method bodies here mirror what `javac` emits for the Java snippet in
//! each doc comment. Only compiled in test builds.

use std::sync::Arc;

use seep_diagnostic::Diagnostic;
use seep_ir::{opcode, MethodBody, MethodBuilder};

use crate::{
    ClassPath, ClassResolver, ClassificationCache, LeakAnalyzer, ResolveError, ResourceRegistry,
    ResourceType, ScanConfig,
};

pub(crate) const FIS: &str = "java/io/FileInputStream";
pub(crate) const FIS_INIT: &str = "(Ljava/lang/String;)V";
pub(crate) const INPUT_STREAM: &str = "java/io/InputStream";
pub(crate) const VOID: &str = "()V";

pub(crate) const FILES: &str = "demo/Files";
pub(crate) const WRAP_DESC: &str = "(Ljava/lang/String;)Ljava/io/InputStream;";
pub(crate) const CLOSER_DESC: &str = "(Ljava/io/InputStream;)V";

/// JDK defaults plus `demo.Resource`.
pub(crate) fn registry() -> ResourceRegistry {
    ResourceRegistry::jdk_defaults().with_type(ResourceType::new("demo.Resource"))
}

/// Emit `new FileInputStream(<local name_slot>)`, leaving it on the stack.
pub(crate) fn new_fis(b: MethodBuilder, name_slot: u16) -> MethodBuilder {
    b.other(opcode::NEW)
        .other(opcode::DUP)
        .load(name_slot)
        .invoke_special(FIS, "<init>", FIS_INIT)
}

/// `static InputStream wrap(String name) { return new FileInputStream(name); }`
pub(crate) fn wrap_method() -> MethodBody {
    new_fis(
        MethodBuilder::new(FILES, "wrap", WRAP_DESC).static_method(),
        0,
    )
    .areturn()
    .build()
}

/// `void closer(InputStream in) { in.close(); }`
pub(crate) fn closer_method() -> MethodBody {
    MethodBuilder::new(FILES, "closer", CLOSER_DESC)
        .load(1)
        .invoke_virtual(INPUT_STREAM, "close", VOID)
        .ret()
        .build()
}

/// Analyze `method` against `class_path` with a fresh cache.
pub(crate) fn analyze(class_path: &ClassPath, method: &MethodBody) -> Vec<Diagnostic> {
    let cache = ClassificationCache::new();
    analyze_with(class_path, &cache, ScanConfig::default(), method)
}

pub(crate) fn analyze_with(
    class_path: &ClassPath,
    cache: &ClassificationCache,
    config: ScanConfig,
    method: &MethodBody,
) -> Vec<Diagnostic> {
    let registry = registry();
    LeakAnalyzer::new(&registry, class_path, cache)
        .with_config(config)
        .analyze_method(method)
}

/// A resolver that panics on every lookup.
pub(crate) struct PanickingResolver;

impl ClassResolver for PanickingResolver {
    fn resolve_method(
        &self,
        class_name: &str,
        method_name: &str,
        _descriptor: &str,
    ) -> Result<Arc<MethodBody>, ResolveError> {
        panic!("class path unreadable at {class_name}.{method_name}");
    }
}
