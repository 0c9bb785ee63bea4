//! Call-site identity and the classification vocabulary stored in the cache.

use std::fmt;

use seep_ir::{to_binary_name, MethodDescriptor, MethodRef, CONSTRUCTOR};

/// The identity of a callable operation: declaring class, name, descriptor.
///
/// Overriding is not distinguished. Two call sites naming the same triple
/// share one classification.
#[derive(Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationIdentity {
    /// Dotted binary name of the declaring class.
    pub declaring_class: String,
    pub method_name: String,
    /// Raw JVM descriptor, e.g. `(Ljava/lang/String;)V`.
    pub descriptor: String,
}

impl OperationIdentity {
    pub fn new(
        declaring_class: impl AsRef<str>,
        method_name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        OperationIdentity {
            declaring_class: to_binary_name(declaring_class.as_ref()).into_owned(),
            method_name: method_name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.method_name == CONSTRUCTOR
    }

    /// Parse the descriptor, or `None` when it is malformed.
    ///
    /// A call with a malformed descriptor is negative for every heuristic.
    pub fn descriptor(&self) -> Option<MethodDescriptor> {
        match MethodDescriptor::parse(&self.descriptor) {
            Ok(desc) => Some(desc),
            Err(err) => {
                tracing::debug!(operation = %self, error = %err, "unparseable descriptor");
                None
            }
        }
    }
}

impl From<&MethodRef> for OperationIdentity {
    fn from(target: &MethodRef) -> Self {
        OperationIdentity::new(&target.class_name, &target.name, &target.descriptor)
    }
}

impl fmt::Display for OperationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.declaring_class, self.method_name, self.descriptor)
    }
}

/// What a call site is being classified as.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationRole {
    /// Produces a fresh resource handle.
    Open,
    /// Releases the handle passed to it.
    Close,
}

impl fmt::Display for OperationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationRole::Open => write!(f, "open"),
            OperationRole::Close => write!(f, "close"),
        }
    }
}

/// A settled verdict for one `(identity, role)` pair.
///
/// There is no "unknown" variant: unknown is the absence of a cache entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Classification {
    /// Confirmed to perform the role.
    Whitelisted,
    /// Confirmed not to perform the role.
    Blacklisted,
}

impl Classification {
    #[inline]
    pub fn from_verdict(verdict: bool) -> Self {
        if verdict {
            Classification::Whitelisted
        } else {
            Classification::Blacklisted
        }
    }

    #[inline]
    pub fn is_whitelisted(self) -> bool {
        matches!(self, Classification::Whitelisted)
    }
}

#[cfg(test)]
mod tests;
