//! Registry of resource types.
//!
//! A class is a resource when it equals, or is assignable to, a registered
//! [`ResourceType`]. Assignability is answered by a [`TypeHierarchy`]; the
//! registry itself never loads classes.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{smallvec, SmallVec};

use seep_ir::to_binary_name;

/// Method name that releases a resource unless configured otherwise.
pub const DEFAULT_RELEASE_METHOD: &str = "close";

/// Supertype lookup for assignability checks.
pub trait TypeHierarchy: Send + Sync {
    /// Direct superclass and interfaces of `class_name` (dotted).
    ///
    /// `None` when the class is unknown to the hierarchy; it is then
    /// treated as having no supertypes.
    fn direct_supertypes(&self, class_name: &str) -> Option<Vec<String>>;
}

/// In-memory [`TypeHierarchy`] built from explicit edges.
#[derive(Clone, Debug, Default)]
pub struct ClassHierarchy {
    supertypes: FxHashMap<String, Vec<String>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the direct supertypes of a class, appending to any recorded
    /// earlier.
    pub fn add<S: AsRef<str>>(
        &mut self,
        class_name: &str,
        supertypes: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        let entry = self
            .supertypes
            .entry(to_binary_name(class_name).into_owned())
            .or_default();
        for sup in supertypes {
            let sup = to_binary_name(sup.as_ref()).into_owned();
            if !entry.contains(&sup) {
                entry.push(sup);
            }
        }
        self
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with<S: AsRef<str>>(
        mut self,
        class_name: &str,
        supertypes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.add(class_name, supertypes);
        self
    }

    pub fn len(&self) -> usize {
        self.supertypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supertypes.is_empty()
    }

    /// Subtype edges of the common JDK closeables.
    pub fn jdk() -> Self {
        let mut h = ClassHierarchy::new();
        h.add("java.io.FileInputStream", ["java.io.InputStream"])
            .add("java.io.FilterInputStream", ["java.io.InputStream"])
            .add("java.io.BufferedInputStream", ["java.io.FilterInputStream"])
            .add("java.io.DataInputStream", ["java.io.FilterInputStream"])
            .add("java.io.ObjectInputStream", ["java.io.InputStream"])
            .add("java.io.FileOutputStream", ["java.io.OutputStream"])
            .add("java.io.FilterOutputStream", ["java.io.OutputStream"])
            .add("java.io.BufferedOutputStream", ["java.io.FilterOutputStream"])
            .add("java.io.DataOutputStream", ["java.io.FilterOutputStream"])
            .add("java.io.PrintStream", ["java.io.FilterOutputStream"])
            .add("java.io.ObjectOutputStream", ["java.io.OutputStream"])
            .add("java.io.InputStreamReader", ["java.io.Reader"])
            .add("java.io.FileReader", ["java.io.InputStreamReader"])
            .add("java.io.BufferedReader", ["java.io.Reader"])
            .add("java.io.LineNumberReader", ["java.io.BufferedReader"])
            .add("java.io.OutputStreamWriter", ["java.io.Writer"])
            .add("java.io.FileWriter", ["java.io.OutputStreamWriter"])
            .add("java.io.BufferedWriter", ["java.io.Writer"])
            .add("java.io.PrintWriter", ["java.io.Writer"])
            .add("java.util.zip.InflaterInputStream", ["java.io.FilterInputStream"])
            .add("java.util.zip.ZipInputStream", ["java.util.zip.InflaterInputStream"])
            .add("java.util.zip.GZIPInputStream", ["java.util.zip.InflaterInputStream"])
            .add("java.util.zip.DeflaterOutputStream", ["java.io.FilterOutputStream"])
            .add("java.util.zip.ZipOutputStream", ["java.util.zip.DeflaterOutputStream"])
            .add("java.util.zip.GZIPOutputStream", ["java.util.zip.DeflaterOutputStream"])
            .add("java.util.jar.JarFile", ["java.util.zip.ZipFile"])
            .add("java.nio.channels.FileChannel", ["java.nio.channels.Channel"])
            .add("java.nio.channels.SocketChannel", ["java.nio.channels.Channel"])
            .add("java.nio.channels.ServerSocketChannel", ["java.nio.channels.Channel"])
            .add("java.sql.PreparedStatement", ["java.sql.Statement"])
            .add("java.sql.CallableStatement", ["java.sql.PreparedStatement"]);
        h
    }
}

impl TypeHierarchy for ClassHierarchy {
    fn direct_supertypes(&self, class_name: &str) -> Option<Vec<String>> {
        self.supertypes.get(class_name).cloned()
    }
}

/// A registered resource type and the methods that release it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ResourceType {
    name: String,
    release_methods: SmallVec<[String; 2]>,
}

impl ResourceType {
    /// A resource type released by `close()`.
    pub fn new(name: &str) -> Self {
        ResourceType {
            name: to_binary_name(name).into_owned(),
            release_methods: smallvec![DEFAULT_RELEASE_METHOD.to_string()],
        }
    }

    /// Add a release method name.
    #[must_use]
    pub fn with_release_method(mut self, method: impl Into<String>) -> Self {
        let method = method.into();
        if !self.release_methods.contains(&method) {
            self.release_methods.push(method);
        }
        self
    }

    /// Dotted binary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn release_methods(&self) -> &[String] {
        &self.release_methods
    }

    pub fn is_released_by(&self, method_name: &str) -> bool {
        self.release_methods.iter().any(|m| m == method_name)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The set of resource types the scanner tracks.
///
/// Immutable once analysis starts and shared by reference across workers.
pub struct ResourceRegistry {
    types: Vec<ResourceType>,
    by_name: FxHashMap<String, usize>,
    /// Interfaces whose zero-argument release method releases any resource
    /// reached through them (`Closeable.close()`).
    release_interfaces: FxHashSet<String>,
    hierarchy: Box<dyn TypeHierarchy>,
}

impl ResourceRegistry {
    /// An empty registry over the given hierarchy.
    pub fn new(hierarchy: impl TypeHierarchy + 'static) -> Self {
        ResourceRegistry {
            types: Vec::new(),
            by_name: FxHashMap::default(),
            release_interfaces: FxHashSet::default(),
            hierarchy: Box::new(hierarchy),
        }
    }

    /// The common JDK closeables over [`ClassHierarchy::jdk`].
    pub fn jdk_defaults() -> Self {
        let mut registry = ResourceRegistry::new(ClassHierarchy::jdk());
        for name in [
            "java.io.InputStream",
            "java.io.OutputStream",
            "java.io.Reader",
            "java.io.Writer",
            "java.io.RandomAccessFile",
            "java.net.Socket",
            "java.net.ServerSocket",
            "java.nio.channels.Channel",
            "java.sql.Connection",
            "java.sql.Statement",
            "java.sql.ResultSet",
            "java.util.zip.ZipFile",
        ] {
            registry.register(ResourceType::new(name));
        }
        registry
            .add_release_interface("java.io.Closeable")
            .add_release_interface("java.lang.AutoCloseable");
        registry
    }

    /// Register a type. Re-registering a name replaces its release methods.
    pub fn register(&mut self, ty: ResourceType) -> &mut Self {
        if let Some(&idx) = self.by_name.get(ty.name()) {
            self.types[idx] = ty;
        } else {
            self.by_name.insert(ty.name().to_string(), self.types.len());
            self.types.push(ty);
        }
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_type(mut self, ty: ResourceType) -> Self {
        self.register(ty);
        self
    }

    pub fn add_release_interface(&mut self, name: &str) -> &mut Self {
        self.release_interfaces
            .insert(to_binary_name(name).into_owned());
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// An empty registry disables analysis.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[ResourceType] {
        &self.types
    }

    /// Whether `class_name` is, or is assignable to, a registered type.
    pub fn is_resource_type(&self, class_name: &str) -> bool {
        self.matching_type(class_name).is_some()
    }

    /// The registered type `class_name` resolves to.
    ///
    /// Supertypes are walked breadth-first, so the nearest registered
    /// ancestor wins. Unknown classes and cyclic hierarchies terminate with
    /// `None`.
    pub fn matching_type(&self, class_name: &str) -> Option<&ResourceType> {
        if self.types.is_empty() {
            return None;
        }

        let start = to_binary_name(class_name).into_owned();
        let mut visited: FxHashSet<String> = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(start.clone());
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if let Some(&idx) = self.by_name.get(&current) {
                return Some(&self.types[idx]);
            }
            for sup in self.hierarchy.direct_supertypes(&current).unwrap_or_default() {
                if visited.insert(sup.clone()) {
                    queue.push_back(sup);
                }
            }
        }
        None
    }

    /// Whether `method_name` on `class_name` is a zero-argument release
    /// method known without looking at its body.
    pub fn is_release_method(&self, class_name: &str, method_name: &str) -> bool {
        let class_name = to_binary_name(class_name);
        if method_name == DEFAULT_RELEASE_METHOD && self.release_interfaces.contains(&*class_name) {
            return true;
        }
        self.matching_type(&class_name)
            .is_some_and(|ty| ty.is_released_by(method_name))
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        ResourceRegistry::new(ClassHierarchy::new())
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("types", &self.types)
            .field("release_interfaces", &self.release_interfaces)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
