//! Method lookup for interprocedural lookahead.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use seep_ir::{to_binary_name, MethodBody};

/// Why a callee's body could not be obtained.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("class `{class_name}` not found")]
    ClassNotFound { class_name: String },
    #[error("method `{class_name}.{method_name}{descriptor}` not found")]
    MethodNotFound {
        class_name: String,
        method_name: String,
        descriptor: String,
    },
    #[error("method `{class_name}.{method_name}` has no code")]
    NoCode {
        class_name: String,
        method_name: String,
    },
}

/// Source of callee bodies.
///
/// Shared across analysis workers, so implementations must be `Sync`.
pub trait ClassResolver: Send + Sync {
    /// Find the body of `class_name.method_name` with `descriptor`.
    ///
    /// Bodies without code (abstract, native) resolve to
    /// [`ResolveError::NoCode`].
    fn resolve_method(
        &self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
    ) -> Result<Arc<MethodBody>, ResolveError>;
}

/// In-memory [`ClassResolver`] over a fixed set of method bodies.
///
/// Lookup prefers an exact descriptor match and falls back to the first
/// method with the same name.
#[derive(Clone, Debug, Default)]
pub struct ClassPath {
    classes: FxHashMap<String, Vec<Arc<MethodBody>>>,
}

impl ClassPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method body under its declaring class.
    pub fn add_method(&mut self, body: MethodBody) -> &mut Self {
        self.classes
            .entry(body.class_name.clone())
            .or_default()
            .push(Arc::new(body));
        self
    }

    /// Builder form of [`add_method`](Self::add_method).
    #[must_use]
    pub fn with_method(mut self, body: MethodBody) -> Self {
        self.add_method(body);
        self
    }

    /// Declare a class with no methods, so lookups report `MethodNotFound`
    /// rather than `ClassNotFound`.
    pub fn add_class(&mut self, class_name: &str) -> &mut Self {
        self.classes
            .entry(to_binary_name(class_name).into_owned())
            .or_default();
        self
    }

    pub fn contains_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(&*to_binary_name(class_name))
    }

    /// All method bodies, grouped by class in no particular order.
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodBody>> {
        self.classes.values().flatten()
    }

    /// Number of method bodies.
    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<MethodBody> for ClassPath {
    fn from_iter<I: IntoIterator<Item = MethodBody>>(iter: I) -> Self {
        let mut class_path = ClassPath::new();
        for body in iter {
            class_path.add_method(body);
        }
        class_path
    }
}

impl ClassResolver for ClassPath {
    fn resolve_method(
        &self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
    ) -> Result<Arc<MethodBody>, ResolveError> {
        let class_name = to_binary_name(class_name);
        let methods = self
            .classes
            .get(&*class_name)
            .ok_or_else(|| ResolveError::ClassNotFound {
                class_name: class_name.to_string(),
            })?;

        let body = methods
            .iter()
            .find(|m| m.name == method_name && m.descriptor == descriptor)
            .or_else(|| methods.iter().find(|m| m.name == method_name))
            .ok_or_else(|| ResolveError::MethodNotFound {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
                descriptor: descriptor.to_string(),
            })?;

        if !body.has_code() {
            return Err(ResolveError::NoCode {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
            });
        }
        Ok(Arc::clone(body))
    }
}
