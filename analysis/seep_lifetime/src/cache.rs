//! Process-wide classification cache.
//!
//! Maps `(OperationIdentity, OperationRole)` to a settled [`Classification`].
//! Entries are append-only: the first writer for a key wins and later
//! writers observe the stored verdict. Safe for concurrent readers and
//! writers across analysis workers.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::{Classification, OperationIdentity, OperationRole};

/// Settled verdicts for one identity, one slot per role.
#[derive(Copy, Clone, Debug, Default)]
struct RoleVerdicts {
    open: Option<Classification>,
    close: Option<Classification>,
}

impl RoleVerdicts {
    fn get(&self, role: OperationRole) -> Option<Classification> {
        match role {
            OperationRole::Open => self.open,
            OperationRole::Close => self.close,
        }
    }

    fn slot_mut(&mut self, role: OperationRole) -> &mut Option<Classification> {
        match role {
            OperationRole::Open => &mut self.open,
            OperationRole::Close => &mut self.close,
        }
    }

    fn count(&self) -> usize {
        usize::from(self.open.is_some()) + usize::from(self.close.is_some())
    }
}

/// One exported cache entry.
pub type CacheEntry = (OperationIdentity, OperationRole, Classification);

/// Shared, append-only classification cache.
///
/// # Example
///
/// ```text
/// let cache = ClassificationCache::with_entries(previous.snapshot());
/// let analyzer = LeakAnalyzer::new(&registry, &class_path, &cache);
/// ```
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: DashMap<OperationIdentity, RoleVerdicts, FxBuildHasher>,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated from a previous run.
    ///
    /// Duplicate keys keep the first occurrence.
    pub fn with_entries(entries: impl IntoIterator<Item = CacheEntry>) -> Self {
        let cache = ClassificationCache::new();
        for (identity, role, classification) in entries {
            cache.insert(&identity, role, classification);
        }
        cache
    }

    /// The stored verdict, or `None` when unknown.
    pub fn lookup(
        &self,
        identity: &OperationIdentity,
        role: OperationRole,
    ) -> Option<Classification> {
        self.entries
            .get(identity)
            .and_then(|v| v.value().get(role))
    }

    /// Record a verdict unless one is already stored.
    ///
    /// Returns the classification in effect after the call, which is the
    /// earlier writer's when the key was already settled.
    pub fn classify(
        &self,
        identity: &OperationIdentity,
        role: OperationRole,
        verdict: bool,
    ) -> Classification {
        self.insert(identity, role, Classification::from_verdict(verdict))
    }

    fn insert(
        &self,
        identity: &OperationIdentity,
        role: OperationRole,
        classification: Classification,
    ) -> Classification {
        // Fast path avoids cloning the key when the identity is known.
        if let Some(mut verdicts) = self.entries.get_mut(identity) {
            return *verdicts.value_mut().slot_mut(role).get_or_insert(classification);
        }
        let mut verdicts = self.entries.entry(identity.clone()).or_default();
        *verdicts.value_mut().slot_mut(role).get_or_insert(classification)
    }

    /// Number of settled `(identity, role)` pairs.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.value().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export every settled entry, sorted by identity then role.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        let mut out = Vec::with_capacity(self.entries.len() * 2);
        for entry in &self.entries {
            for role in [OperationRole::Open, OperationRole::Close] {
                if let Some(classification) = entry.value().get(role) {
                    out.push((entry.key().clone(), role, classification));
                }
            }
        }
        out.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
        out
    }
}

/// Errors from cache persistence.
#[cfg(feature = "cache")]
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to encode classification cache: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode classification cache: {0}")]
    Decode(#[source] bincode::Error),
}

#[cfg(feature = "cache")]
impl ClassificationCache {
    /// Serialize a snapshot with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CacheError> {
        bincode::serialize(&self.snapshot()).map_err(CacheError::Encode)
    }

    /// Rebuild a cache from [`to_bytes`](Self::to_bytes) output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        let entries: Vec<CacheEntry> = bincode::deserialize(bytes).map_err(CacheError::Decode)?;
        Ok(ClassificationCache::with_entries(entries))
    }
}
