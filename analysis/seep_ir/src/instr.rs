//! Decoded instructions.
//!
//! The lifetime tracker does not simulate the operand stack, so it only
//! distinguishes the handful of opcodes that move references between the
//! stack and local slots, return them, or call methods. All other opcodes
//! are kept as [`Instruction::Other`] so that "the previous instruction" and
//! "the next instruction" stay meaningful.

use std::fmt;

use crate::class_name::{to_binary_name, CONSTRUCTOR};
use crate::descriptor::{DescriptorError, MethodDescriptor};
use crate::Location;

/// Index of a local-variable slot.
pub type Slot = u16;

/// Raw JVM opcodes recognised by [`Instruction::from_opcode`].
pub mod opcode {
    pub const ALOAD: u8 = 0x19;
    pub const ALOAD_0: u8 = 0x2a;
    pub const ALOAD_3: u8 = 0x2d;
    pub const ASTORE: u8 = 0x3a;
    pub const ASTORE_0: u8 = 0x4b;
    pub const ASTORE_3: u8 = 0x4e;
    pub const ARETURN: u8 = 0xb0;
    pub const RETURN: u8 = 0xb1;
    pub const INVOKEVIRTUAL: u8 = 0xb6;
    pub const INVOKESPECIAL: u8 = 0xb7;
    pub const INVOKESTATIC: u8 = 0xb8;
    pub const INVOKEINTERFACE: u8 = 0xb9;
    pub const NEW: u8 = 0xbb;
    pub const DUP: u8 = 0x59;
    pub const POP: u8 = 0x57;
}

/// Dispatch kind of a call instruction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
}

impl InvokeKind {
    fn from_opcode(op: u8) -> Option<Self> {
        match op {
            opcode::INVOKEVIRTUAL => Some(InvokeKind::Virtual),
            opcode::INVOKESPECIAL => Some(InvokeKind::Special),
            opcode::INVOKESTATIC => Some(InvokeKind::Static),
            opcode::INVOKEINTERFACE => Some(InvokeKind::Interface),
            _ => None,
        }
    }
}

/// Symbolic reference to a called method, as found in the constant pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// Declaring class, binary name.
    pub class_name: String,
    pub name: String,
    /// Raw JVM descriptor, e.g. `(Ljava/lang/String;)V`.
    pub descriptor: String,
}

impl MethodRef {
    /// Create a reference; internal class names are normalised.
    pub fn new(
        class_name: impl AsRef<str>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        MethodRef {
            class_name: to_binary_name(class_name.as_ref()).into_owned(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    /// Parse the descriptor.
    pub fn parse_descriptor(&self) -> Result<MethodDescriptor, DescriptorError> {
        MethodDescriptor::parse(&self.descriptor)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class_name, self.name, self.descriptor)
    }
}

/// A decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `astore`/`astore_<n>`: pop a reference into a local slot.
    Store { slot: Slot },
    /// `aload`/`aload_<n>`: push a reference from a local slot.
    Load { slot: Slot },
    /// `areturn`.
    ReturnObject,
    /// Any ordinary method invocation.
    Invoke { kind: InvokeKind, target: MethodRef },
    /// Every other opcode.
    Other { opcode: u8 },
}

impl Instruction {
    /// Map a raw JVM opcode and its decoded operands onto an instruction.
    ///
    /// `local` is the explicit slot operand of `aload`/`astore` (ignored for
    /// the `_<n>` short forms) and `target` the resolved constant-pool method
    /// reference for invocations. Missing operands degrade to `Other`.
    pub fn from_opcode(op: u8, local: Option<Slot>, target: Option<MethodRef>) -> Self {
        match op {
            opcode::ALOAD => match local {
                Some(slot) => Instruction::Load { slot },
                None => Instruction::Other { opcode: op },
            },
            opcode::ALOAD_0..=opcode::ALOAD_3 => Instruction::Load {
                slot: Slot::from(op - opcode::ALOAD_0),
            },
            opcode::ASTORE => match local {
                Some(slot) => Instruction::Store { slot },
                None => Instruction::Other { opcode: op },
            },
            opcode::ASTORE_0..=opcode::ASTORE_3 => Instruction::Store {
                slot: Slot::from(op - opcode::ASTORE_0),
            },
            opcode::ARETURN => Instruction::ReturnObject,
            _ => match (InvokeKind::from_opcode(op), target) {
                (Some(kind), Some(target)) => Instruction::Invoke { kind, target },
                _ => Instruction::Other { opcode: op },
            },
        }
    }

    #[inline]
    pub fn is_load(&self) -> bool {
        matches!(self, Instruction::Load { .. })
    }

    #[inline]
    pub fn is_return_object(&self) -> bool {
        matches!(self, Instruction::ReturnObject)
    }

    /// The invoked method, for call instructions.
    pub fn invoke_target(&self) -> Option<&MethodRef> {
        match self {
            Instruction::Invoke { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// An instruction together with its location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeUnit {
    pub location: Location,
    pub instr: Instruction,
}

impl CodeUnit {
    pub fn new(location: Location, instr: Instruction) -> Self {
        CodeUnit { location, instr }
    }
}

#[cfg(test)]
mod tests;
