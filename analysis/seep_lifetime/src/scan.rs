//! The per-method scan engine.
//!
//! A scan walks one method body in instruction order and tracks which
//! local slots hold open resource handles. Call sites are classified as
//! opening or closing through the shared [`ClassificationCache`], built-in
//! knowledge of the registered types, and a descriptor heuristic. A call
//! the heuristic flags but the cache cannot settle is resolved by scanning
//! the callee's body at a deeper [`ScanLevel`].
//!
//! # Levels
//!
//! - [`ScanLevel::Raw`]: the method under analysis. Handles still open at
//!   the end of the body are reported.
//! - [`ScanLevel::LookIntoOpen`]: a callee suspected of returning a fresh
//!   handle. The outcome is whether it does.
//! - [`ScanLevel::LookIntoClose`]: a callee suspected of closing its sole
//!   parameter. The outcome is whether it does. Only loads and calls are
//!   tracked, and no further lookahead is started.
//!
//! Every level owns its own [`ScanContext`]. Nested scans borrow the
//! enclosing scan's [`LookaheadStack`] for cycle and depth bookkeeping and
//! nothing else.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use seep_diagnostic::{lookahead_skipped, resource_not_released, Diagnostic};
use seep_ir::{opcode, CodeUnit, Instruction, Location, MethodBody, MethodRef, Slot};

use crate::lookahead::ensure_sufficient_stack;
use crate::{
    ClassResolver, ClassificationCache, LookaheadStack, OperationIdentity, OperationRole,
    ResourceInstance, ResourceInstanceCapturer, ResourceRegistry, ScanConfig, ScanError,
};

/// Depth of a scan in the lookahead chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScanLevel {
    Raw,
    LookIntoOpen,
    LookIntoClose,
}

impl ScanLevel {
    /// The role a lookahead at this level decides, `None` for `Raw`.
    pub fn role(self) -> Option<OperationRole> {
        match self {
            ScanLevel::Raw => None,
            ScanLevel::LookIntoOpen => Some(OperationRole::Open),
            ScanLevel::LookIntoClose => Some(OperationRole::Close),
        }
    }

    pub fn for_role(role: OperationRole) -> Self {
        match role {
            OperationRole::Open => ScanLevel::LookIntoOpen,
            OperationRole::Close => ScanLevel::LookIntoClose,
        }
    }

    /// Whether stores and object returns are tracked at this level.
    #[inline]
    fn tracks_slots(self) -> bool {
        !matches!(self, ScanLevel::LookIntoClose)
    }
}

impl fmt::Display for ScanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanLevel::Raw => write!(f, "raw"),
            ScanLevel::LookIntoOpen => write!(f, "look-into-open"),
            ScanLevel::LookIntoClose => write!(f, "look-into-close"),
        }
    }
}

/// Mutable state of one scan.
#[derive(Debug)]
pub struct ScanContext<'m> {
    pub method: &'m MethodBody,
    pub level: ScanLevel,
    pub capturer: ResourceInstanceCapturer,
    /// Slot of the most recent load.
    pub last_loaded: Option<Slot>,
    /// Lookahead verdict; unused at `Raw`.
    pub outcome: bool,
    /// Objects allocated with `new` whose constructor has not run yet.
    uninitialized: u32,
}

impl<'m> ScanContext<'m> {
    pub fn new(method: &'m MethodBody, level: ScanLevel) -> Self {
        ScanContext {
            method,
            level,
            capturer: ResourceInstanceCapturer::new(),
            last_loaded: None,
            outcome: false,
            uninitialized: 0,
        }
    }
}

/// Read-only inputs shared by every scan of one analysis run.
#[derive(Copy, Clone)]
pub(crate) struct ScanEnv<'a> {
    pub registry: &'a ResourceRegistry,
    pub cache: &'a ClassificationCache,
    pub resolver: &'a dyn ClassResolver,
    pub config: &'a ScanConfig,
}

/// Result of a lookahead scan.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct Lookahead {
    pub outcome: bool,
    /// False when some call in the callee was left unclassified, so a
    /// negative outcome is not final.
    pub complete: bool,
}

/// One scan in progress.
pub(crate) struct MethodScan<'a, 'm, 's> {
    env: ScanEnv<'a>,
    cx: ScanContext<'m>,
    lookahead: &'s mut LookaheadStack,
    /// A call was treated as neither open nor close without a cached verdict.
    incomplete: bool,
    /// `W1001` notes, collected at `Raw` only.
    notes: Vec<Diagnostic>,
}

impl<'a, 'm, 's> MethodScan<'a, 'm, 's> {
    pub(crate) fn new(
        env: ScanEnv<'a>,
        method: &'m MethodBody,
        level: ScanLevel,
        lookahead: &'s mut LookaheadStack,
    ) -> Self {
        MethodScan {
            env,
            cx: ScanContext::new(method, level),
            lookahead,
            incomplete: false,
            notes: Vec::new(),
        }
    }

    /// Scan the method under analysis and report what it leaks.
    pub(crate) fn run_raw(mut self) -> Vec<Diagnostic> {
        self.walk();
        self.finish()
    }

    /// Scan a callee and return the lookahead outcome.
    pub(crate) fn run_lookahead(mut self) -> Lookahead {
        self.walk();
        Lookahead {
            outcome: self.cx.outcome,
            complete: !self.incomplete,
        }
    }

    fn walk(&mut self) {
        let method = self.cx.method;
        for (idx, unit) in method.code.iter().enumerate() {
            if self.cx.level == ScanLevel::LookIntoClose && self.cx.outcome {
                break;
            }
            self.step(&method.code, idx, unit);
        }
    }

    fn step(&mut self, code: &[CodeUnit], idx: usize, unit: &CodeUnit) {
        match &unit.instr {
            Instruction::Store { slot } if self.cx.level.tracks_slots() => {
                if let Some(dropped) = self.cx.capturer.mark_store_target(*slot) {
                    tracing::trace!(
                        slot,
                        opened_by = %dropped.opened_by,
                        "slot overwritten while holding a resource"
                    );
                }
            }
            Instruction::Load { slot } => self.cx.last_loaded = Some(*slot),
            Instruction::ReturnObject if self.cx.level.tracks_slots() => {
                self.on_return(code, idx);
            }
            Instruction::Invoke { target, .. } => {
                self.on_invoke(code, idx, unit.location, target);
            }
            Instruction::Other { opcode: opcode::NEW } => self.cx.uninitialized += 1,
            _ => {}
        }
    }

    /// `areturn` directly after a load hands the loaded handle to the caller.
    fn on_return(&mut self, code: &[CodeUnit], idx: usize) {
        let after_load = idx
            .checked_sub(1)
            .and_then(|prev| code.get(prev))
            .is_some_and(|prev| prev.instr.is_load());
        if !after_load {
            return;
        }
        let Some(slot) = self.cx.last_loaded else {
            return;
        };

        let released = self.cx.capturer.release(slot);
        if self.cx.level == ScanLevel::LookIntoOpen {
            if released.is_some() {
                self.cx.outcome = true;
            }
            self.cx.last_loaded = None;
        }
    }

    fn on_invoke(
        &mut self,
        code: &[CodeUnit],
        idx: usize,
        location: Location,
        target: &MethodRef,
    ) {
        let identity = OperationIdentity::from(target);

        if self.cx.level == ScanLevel::LookIntoClose {
            if self.is_known_close(&identity) {
                let closed = self.cx.last_loaded.take();
                if closed == Some(self.cx.method.first_param_slot()) {
                    self.cx.outcome = true;
                }
            }
            return;
        }

        if identity.is_constructor() && !self.allocates(&identity) {
            return;
        }

        if self.resolve(&identity, OperationRole::Open, location) {
            let returned = code
                .get(idx + 1)
                .is_some_and(|next| next.instr.is_return_object());
            if returned {
                if self.cx.level == ScanLevel::LookIntoOpen {
                    self.cx.outcome = true;
                }
            } else {
                self.absorb_wrapped(&identity);
                let instance = self.open_instance(identity, location);
                self.cx.capturer.bind_instance(instance);
            }
            return;
        }

        if self.resolve(&identity, OperationRole::Close, location) {
            let held = self
                .cx
                .last_loaded
                .take()
                .and_then(|slot| self.cx.capturer.release(slot));
            // Closed straight off the operand stack, never stored.
            let released = held.or_else(|| self.cx.capturer.pop_pending());
            if let Some(released) = released {
                tracing::trace!(opened_by = %released.opened_by, "released");
            }
        }
    }

    /// Whether a constructor call initializes a freshly allocated object.
    ///
    /// Inside a constructor, `<init>` calls with no outstanding `new` are
    /// `super(..)` or `this(..)` delegation and allocate nothing.
    fn allocates(&mut self, identity: &OperationIdentity) -> bool {
        if self.cx.uninitialized > 0 {
            self.cx.uninitialized -= 1;
            return true;
        }
        if self.cx.method.is_constructor() {
            tracing::trace!(operation = %identity, "constructor delegation");
            return false;
        }
        true
    }

    /// A wrapping constructor takes ownership of the handle passed to it.
    fn absorb_wrapped(&mut self, identity: &OperationIdentity) {
        if !identity.is_constructor() || !self.takes_resource(identity) {
            return;
        }
        let absorbed = match self.cx.capturer.pop_pending() {
            Some(inner) => Some(inner),
            None => self
                .cx
                .last_loaded
                .and_then(|slot| self.cx.capturer.release(slot)),
        };
        if let Some(inner) = absorbed {
            tracing::trace!(wrapper = %identity, inner = %inner.opened_by, "wrapped");
        }
    }

    fn takes_resource(&self, identity: &OperationIdentity) -> bool {
        identity.descriptor().is_some_and(|desc| {
            desc.params().iter().any(|p| {
                p.object_class()
                    .is_some_and(|class| self.env.registry.is_resource_type(class))
            })
        })
    }

    fn open_instance(&self, identity: OperationIdentity, location: Location) -> ResourceInstance {
        let resource = self.resource_name(&identity);
        let instance = ResourceInstance::new(resource, identity, location);
        if self.cx.level != ScanLevel::Raw {
            return instance;
        }

        let method = self.cx.method;
        let mut diag = resource_not_released(
            &method.class_name,
            &method.name,
            location,
            &instance.opened_by.to_string(),
            &instance.resource,
        )
        .with_source_file(method.source_file.clone());
        diag.severity = self.env.config.severity;
        instance.with_diagnostic(diag)
    }

    /// Registered type of the handle an opening call produces.
    fn resource_name(&self, identity: &OperationIdentity) -> String {
        let produced = if identity.is_constructor() {
            identity.declaring_class.clone()
        } else {
            identity
                .descriptor()
                .and_then(|desc| desc.object_return_class().map(str::to_string))
                .unwrap_or_else(|| identity.declaring_class.clone())
        };
        match self.env.registry.matching_type(&produced) {
            Some(ty) => ty.name().to_string(),
            None => produced,
        }
    }

    /// Classify a call site for `role`, settling unknown verdicts.
    fn resolve(
        &mut self,
        identity: &OperationIdentity,
        role: OperationRole,
        location: Location,
    ) -> bool {
        let cache = self.env.cache;
        if let Some(classification) = cache.lookup(identity, role) {
            return classification.is_whitelisted();
        }
        if self.is_builtin(identity, role) {
            return cache.classify(identity, role, true).is_whitelisted();
        }
        if !self.looks_like(identity, role) {
            return cache.classify(identity, role, false).is_whitelisted();
        }
        match self.look_into(identity, ScanLevel::for_role(role), location) {
            Some(verdict) => cache.classify(identity, role, verdict).is_whitelisted(),
            None => {
                self.incomplete = true;
                false
            }
        }
    }

    /// Close classification without lookahead, for `LookIntoClose`.
    fn is_known_close(&mut self, identity: &OperationIdentity) -> bool {
        let cache = self.env.cache;
        if let Some(classification) = cache.lookup(identity, OperationRole::Close) {
            return classification.is_whitelisted();
        }
        if self.is_builtin(identity, OperationRole::Close) {
            return cache
                .classify(identity, OperationRole::Close, true)
                .is_whitelisted();
        }
        if self.looks_like(identity, OperationRole::Close) {
            self.incomplete = true;
        }
        false
    }

    /// Verdicts known from the registry alone.
    fn is_builtin(&self, identity: &OperationIdentity, role: OperationRole) -> bool {
        let registry = self.env.registry;
        match role {
            OperationRole::Open => {
                identity.is_constructor() && registry.is_resource_type(&identity.declaring_class)
            }
            OperationRole::Close => {
                !identity.is_constructor()
                    && registry
                        .is_release_method(&identity.declaring_class, &identity.method_name)
                    && identity.descriptor().is_some_and(|d| d.params().is_empty())
            }
        }
    }

    /// The descriptor heuristic.
    ///
    /// Open: the declared return type is a resource type. Close: returns
    /// void, is not a constructor, and takes exactly one parameter, which
    /// is a resource type.
    fn looks_like(&self, identity: &OperationIdentity, role: OperationRole) -> bool {
        let Some(desc) = identity.descriptor() else {
            return false;
        };
        let registry = self.env.registry;
        match role {
            OperationRole::Open => desc
                .object_return_class()
                .is_some_and(|class| registry.is_resource_type(class)),
            OperationRole::Close => {
                !identity.is_constructor()
                    && desc.is_void()
                    && matches!(
                        desc.params(),
                        [only] if only.object_class().is_some_and(|c| registry.is_resource_type(c))
                    )
            }
        }
    }

    /// Scan the callee at `level`.
    ///
    /// `None` means no verdict may be recorded: a cycle, the depth limit,
    /// or a panicking collaborator cut the lookahead short, or a negative
    /// outcome rests on such a cut further down.
    fn look_into(
        &mut self,
        identity: &OperationIdentity,
        level: ScanLevel,
        location: Location,
    ) -> Option<bool> {
        let role = level.role()?;
        let result = self.lookahead.enter(identity, role).and_then(|()| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.scan_callee(identity, level)
            }))
            .unwrap_or_else(|payload| Err(ScanError::panicked(payload.as_ref())));
            self.lookahead.exit();
            result
        });

        match result {
            Ok(Lookahead { outcome, complete }) => {
                if !outcome && !complete {
                    tracing::debug!(operation = %identity, %role, "lookahead inconclusive");
                    return None;
                }
                tracing::debug!(
                    operation = %identity,
                    %role,
                    verdict = outcome,
                    "lookahead settled"
                );
                Some(outcome)
            }
            Err(err @ ScanError::Cycle { .. }) => {
                tracing::debug!(operation = %identity, %role, error = %err, "lookahead skipped");
                None
            }
            Err(err) => {
                tracing::warn!(operation = %identity, %role, error = %err, "lookahead abandoned");
                if matches!(err, ScanError::Resolve(_))
                    && self.cx.level == ScanLevel::Raw
                    && self.env.config.report_unresolved
                {
                    let method = self.cx.method;
                    self.notes.push(lookahead_skipped(
                        &method.class_name,
                        &method.name,
                        location,
                        &identity.to_string(),
                        &err.to_string(),
                    ));
                }
                err.is_cacheable().then_some(false)
            }
        }
    }

    fn scan_callee(
        &mut self,
        identity: &OperationIdentity,
        level: ScanLevel,
    ) -> Result<Lookahead, ScanError> {
        let body = self.env.resolver.resolve_method(
            &identity.declaring_class,
            &identity.method_name,
            &identity.descriptor,
        )?;
        let nested = MethodScan::new(self.env, &body, level, &mut *self.lookahead);
        Ok(ensure_sufficient_stack(|| nested.run_lookahead()))
    }

    /// Turn every handle still open into a finding.
    fn finish(mut self) -> Vec<Diagnostic> {
        let unstored = self.cx.capturer.pending_len();
        let remaining = self.cx.capturer.take_remaining();
        let keep = if self.env.config.report_unstored {
            remaining.len()
        } else {
            remaining.len() - unstored
        };

        let mut out: Vec<Diagnostic> = remaining
            .into_iter()
            .take(keep)
            .filter_map(|instance| instance.diagnostic)
            .collect();
        out.append(&mut self.notes);
        out
    }
}
