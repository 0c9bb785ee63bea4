//! Class-name normalisation.
//!
//! Bytecode refers to classes by their *internal* name (`java/io/File`),
//! while configuration and reports use the *binary* name (`java.io.File`).
//! Everything inside seep is keyed by the binary form.

use std::borrow::Cow;

/// Method name of instance constructors.
pub const CONSTRUCTOR: &str = "<init>";

/// Method name of static class initializers.
pub const CLASS_INITIALIZER: &str = "<clinit>";

/// Convert an internal class name to its binary (dotted) form.
///
/// Borrows when the name is already dotted.
pub fn to_binary_name(name: &str) -> Cow<'_, str> {
    if name.contains('/') {
        Cow::Owned(name.replace('/', "."))
    } else {
        Cow::Borrowed(name)
    }
}

/// The unqualified part of a class name (`java.io.File` → `File`).
pub fn simple_name(name: &str) -> &str {
    name.rsplit(['.', '/']).next().unwrap_or(name)
}

/// The package part of a class name, or `""` for the default package.
pub fn package_name(name: &str) -> &str {
    match name.rfind(['.', '/']) {
        Some(idx) => &name[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests;
