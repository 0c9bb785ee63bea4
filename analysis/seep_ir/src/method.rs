//! Decoded method bodies.

use std::fmt;

use bitflags::bitflags;

use crate::class_name::{to_binary_name, CONSTRUCTOR};
use crate::instr::{opcode, CodeUnit, Instruction, InvokeKind, MethodRef, Slot};
use crate::Location;

bitflags! {
    /// `access_flags` of a `method_info` structure.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MethodAccess: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

/// One method's decoded code and the metadata reports need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBody {
    /// Declaring class, binary name.
    pub class_name: String,
    pub name: String,
    pub descriptor: String,
    pub access: MethodAccess,
    /// `SourceFile` attribute of the declaring class, if present.
    pub source_file: Option<String>,
    /// Instructions in linear layout order.
    pub code: Vec<CodeUnit>,
}

impl MethodBody {
    pub fn is_static(&self) -> bool {
        self.access.contains(MethodAccess::STATIC)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }

    /// Whether there is any bytecode to scan.
    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
            && !self
                .access
                .intersects(MethodAccess::ABSTRACT | MethodAccess::NATIVE)
    }

    /// Slot holding the first declared parameter.
    ///
    /// Instance methods keep `this` in slot 0.
    pub fn first_param_slot(&self) -> Slot {
        if self.is_static() {
            0
        } else {
            1
        }
    }

    /// Symbolic reference to this method.
    pub fn reference(&self) -> MethodRef {
        MethodRef::new(&self.class_name, self.name.clone(), self.descriptor.clone())
    }
}

impl fmt::Display for MethodBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class_name, self.name, self.descriptor)
    }
}

/// Fluent construction of a [`MethodBody`].
///
/// Each appended instruction advances the program counter by one unless an
/// explicit offset is set with [`at_pc`](Self::at_pc). Line numbers stick
/// until changed, mirroring a line-number table.
///
/// ```text
/// let body = MethodBuilder::new("demo.Files", "open", "(Ljava/lang/String;)V")
///     .line(10)
///     .invoke_special("java/io/FileInputStream", "<init>", "(Ljava/lang/String;)V")
///     .store(1)
///     .ret()
///     .build();
/// ```
#[derive(Clone, Debug)]
pub struct MethodBuilder {
    body: MethodBody,
    pc: u32,
    line: u32,
}

impl MethodBuilder {
    pub fn new(
        class_name: impl AsRef<str>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        MethodBuilder {
            body: MethodBody {
                class_name: to_binary_name(class_name.as_ref()).into_owned(),
                name: name.into(),
                descriptor: descriptor.into(),
                access: MethodAccess::PUBLIC,
                source_file: None,
                code: Vec::new(),
            },
            pc: 0,
            line: 0,
        }
    }

    #[must_use]
    pub fn access(mut self, access: MethodAccess) -> Self {
        self.body.access = access;
        self
    }

    /// Mark the method `static`.
    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.body.access |= MethodAccess::STATIC;
        self
    }

    #[must_use]
    pub fn source_file(mut self, file: impl Into<String>) -> Self {
        self.body.source_file = Some(file.into());
        self
    }

    /// Set the source line for subsequent instructions.
    #[must_use]
    pub fn line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Set the bytecode offset of the next instruction.
    #[must_use]
    pub fn at_pc(mut self, pc: u32) -> Self {
        self.pc = pc;
        self
    }

    #[must_use]
    pub fn push(mut self, instr: Instruction) -> Self {
        let location = Location::new(self.pc, self.line);
        self.body.code.push(CodeUnit::new(location, instr));
        self.pc += 1;
        self
    }

    #[must_use]
    pub fn store(self, slot: Slot) -> Self {
        self.push(Instruction::Store { slot })
    }

    #[must_use]
    pub fn load(self, slot: Slot) -> Self {
        self.push(Instruction::Load { slot })
    }

    /// `areturn`.
    #[must_use]
    pub fn areturn(self) -> Self {
        self.push(Instruction::ReturnObject)
    }

    /// Plain `return`.
    #[must_use]
    pub fn ret(self) -> Self {
        self.other(opcode::RETURN)
    }

    #[must_use]
    pub fn other(self, opcode: u8) -> Self {
        self.push(Instruction::Other { opcode })
    }

    #[must_use]
    pub fn invoke(
        self,
        kind: InvokeKind,
        class_name: &str,
        name: &str,
        descriptor: &str,
    ) -> Self {
        self.push(Instruction::Invoke {
            kind,
            target: MethodRef::new(class_name, name, descriptor),
        })
    }

    #[must_use]
    pub fn invoke_virtual(self, class_name: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(InvokeKind::Virtual, class_name, name, descriptor)
    }

    #[must_use]
    pub fn invoke_special(self, class_name: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(InvokeKind::Special, class_name, name, descriptor)
    }

    #[must_use]
    pub fn invoke_static(self, class_name: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(InvokeKind::Static, class_name, name, descriptor)
    }

    #[must_use]
    pub fn invoke_interface(self, class_name: &str, name: &str, descriptor: &str) -> Self {
        self.invoke(InvokeKind::Interface, class_name, name, descriptor)
    }

    pub fn build(self) -> MethodBody {
        self.body
    }
}
