//! Decoded bytecode model for the seep resource-leak scanner.
//!
//! This crate provides:
//!
//! - **Instructions** ([`Instruction`], [`CodeUnit`], [`MethodRef`]): the
//!   reduced instruction set the lifetime tracker cares about (reference
//!   stores and loads, object returns, method invocations). Everything
//!   else collapses into [`Instruction::Other`].
//!
//! - **Descriptors** ([`MethodDescriptor`], [`FieldType`]): parsed JVM
//!   method descriptors, so call sites can be classified by their declared
//!   return and parameter types.
//!
//! - **Method bodies** ([`MethodBody`], [`MethodBuilder`]): one method's
//!   decoded code plus the metadata needed to report on it.
//!
//! # Crate Dependencies
//!
//! No dependency on a class-file reader. Hosts decode bytecode with whatever
//! reader they already have and map opcodes through
//! [`Instruction::from_opcode`].

pub mod class_name;
pub mod descriptor;
pub mod instr;
mod location;
pub mod method;

pub use class_name::{to_binary_name, CLASS_INITIALIZER, CONSTRUCTOR};
pub use descriptor::{BaseType, DescriptorError, FieldType, MethodDescriptor, ReturnType};
pub use instr::{opcode, CodeUnit, Instruction, InvokeKind, MethodRef, Slot};
pub use location::Location;
pub use method::{MethodAccess, MethodBody, MethodBuilder};
