//! Per-scan tracking of which local slots hold open resource handles.

use rustc_hash::{FxHashMap, FxHashSet};

use seep_diagnostic::Diagnostic;
use seep_ir::{Location, Slot};

use crate::OperationIdentity;

/// One acquired resource handle.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ResourceInstance {
    /// Registered resource type the handle was matched against.
    pub resource: String,
    /// The call that produced the handle.
    pub opened_by: OperationIdentity,
    pub location: Location,
    /// Pre-built report, present only for top-level scans.
    pub diagnostic: Option<Diagnostic>,
}

impl ResourceInstance {
    pub fn new(
        resource: impl Into<String>,
        opened_by: OperationIdentity,
        location: Location,
    ) -> Self {
        ResourceInstance {
            resource: resource.into(),
            opened_by,
            location,
            diagnostic: None,
        }
    }

    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

/// Slot-to-instance bookkeeping for one method scan.
///
/// An opening call leaves its handle on the operand stack, so the instance
/// is first held as *pending* and bound to the slot of the next store.
/// Each slot holds at most one instance.
#[derive(Clone, Debug, Default)]
pub struct ResourceInstanceCapturer {
    bound: FxHashMap<Slot, ResourceInstance>,
    tracked: FxHashSet<Slot>,
    pending: Vec<ResourceInstance>,
}

impl ResourceInstanceCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a store into `slot`.
    ///
    /// Binds the most recent pending instance to the slot. Whatever the slot
    /// held before is dropped without being released and returned to the
    /// caller.
    pub fn mark_store_target(&mut self, slot: Slot) -> Option<ResourceInstance> {
        self.tracked.insert(slot);
        match self.pending.pop() {
            Some(instance) => self.bound.insert(slot, instance),
            None => self.bound.remove(&slot),
        }
    }

    /// Queue a freshly opened instance until the next store.
    pub fn bind_instance(&mut self, instance: ResourceInstance) {
        self.pending.push(instance);
    }

    /// Take back the most recent pending instance, e.g. when a wrapping
    /// constructor takes ownership of it.
    pub fn pop_pending(&mut self) -> Option<ResourceInstance> {
        self.pending.pop()
    }

    /// Release whatever `slot` holds.
    pub fn release(&mut self, slot: Slot) -> Option<ResourceInstance> {
        self.bound.remove(&slot)
    }

    /// Whether `slot` currently holds an instance.
    pub fn holds(&self, slot: Slot) -> bool {
        self.bound.contains_key(&slot)
    }

    /// Whether any store into `slot` has been seen.
    pub fn is_tracked(&self, slot: Slot) -> bool {
        self.tracked.contains(&slot)
    }

    /// Instances still open: bound ones in slot order, then pending ones in
    /// opening order.
    pub fn remaining(&self) -> Vec<&ResourceInstance> {
        let mut slots: Vec<&Slot> = self.bound.keys().collect();
        slots.sort_unstable();
        slots
            .into_iter()
            .filter_map(|slot| self.bound.get(slot))
            .chain(self.pending.iter())
            .collect()
    }

    /// Drain every open instance in [`remaining`](Self::remaining) order,
    /// leaving the capturer empty.
    pub fn take_remaining(&mut self) -> Vec<ResourceInstance> {
        let mut bound: Vec<(Slot, ResourceInstance)> = self.bound.drain().collect();
        bound.sort_unstable_by_key(|(slot, _)| *slot);
        let out = bound
            .into_iter()
            .map(|(_, instance)| instance)
            .chain(self.pending.drain(..))
            .collect();
        self.tracked.clear();
        out
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of open instances, bound or pending.
    pub fn len(&self) -> usize {
        self.bound.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty() && self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.bound.clear();
        self.tracked.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests;
