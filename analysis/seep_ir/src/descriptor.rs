//! JVM method descriptor parsing.
//!
//! A method descriptor encodes parameter and return types, e.g.
//! `(Ljava/lang/String;I)Ljava/io/InputStream;`. The lifetime tracker only
//! needs to know whether a type is a class reference and which class, so
//! object types are stored by binary name and arrays keep their element type.

use std::fmt;

use smallvec::SmallVec;

use crate::class_name::to_binary_name;

/// Primitive field types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    fn tag(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
        }
    }

    /// `long` and `double` occupy two local-variable slots.
    pub fn slot_width(self) -> u16 {
        match self {
            BaseType::Long | BaseType::Double => 2,
            _ => 1,
        }
    }
}

/// A parameter or return value type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Class or interface reference, stored by binary name.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    /// The referenced class when this is a plain (non-array) object type.
    pub fn object_class(&self) -> Option<&str> {
        match self {
            FieldType::Object(name) => Some(name),
            FieldType::Base(_) | FieldType::Array(_) => None,
        }
    }

    /// Number of local-variable slots a value of this type occupies.
    pub fn slot_width(&self) -> u16 {
        match self {
            FieldType::Base(base) => base.slot_width(),
            FieldType::Object(_) | FieldType::Array(_) => 1,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{}", base.tag()),
            FieldType::Object(name) => write!(f, "L{};", name.replace('.', "/")),
            FieldType::Array(elem) => write!(f, "[{elem}"),
        }
    }
}

/// The return part of a method descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Void,
    Value(FieldType),
}

/// A parsed method descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    params: SmallVec<[FieldType; 4]>,
    return_type: ReturnType,
}

/// Error parsing a method descriptor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("method descriptor must start with `(`")]
    MissingParameterList,
    #[error("descriptor ended unexpectedly at byte {0}")]
    UnexpectedEnd(usize),
    #[error("invalid type tag `{tag}` at byte {pos}")]
    InvalidTag { tag: char, pos: usize },
    #[error("empty class name at byte {0}")]
    EmptyClassName(usize),
    #[error("`void` is only valid as a return type (byte {0})")]
    VoidParameter(usize),
    #[error("trailing input after return type at byte {0}")]
    TrailingInput(usize),
}

impl MethodDescriptor {
    /// Parse a JVM method descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let mut parser = Parser {
            bytes: descriptor.as_bytes(),
            pos: 0,
        };
        parser.method()
    }

    pub fn params(&self) -> &[FieldType] {
        &self.params
    }

    pub fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    pub fn is_void(&self) -> bool {
        self.return_type == ReturnType::Void
    }

    /// Class of the returned object, if the method returns a plain object.
    pub fn object_return_class(&self) -> Option<&str> {
        match &self.return_type {
            ReturnType::Value(ty) => ty.object_class(),
            ReturnType::Void => None,
        }
    }

    /// Total slots taken by the declared parameters (excluding `this`).
    pub fn param_slots(&self) -> u16 {
        self.params.iter().map(FieldType::slot_width).sum()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        match &self.return_type {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Value(ty) => write!(f, "{ty}"),
        }
    }
}

/// Byte cursor over a descriptor string.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn method(&mut self) -> Result<MethodDescriptor, DescriptorError> {
        if self.bytes.first() != Some(&b'(') {
            return Err(DescriptorError::MissingParameterList);
        }
        self.pos = 1;

        let mut params = SmallVec::new();
        loop {
            match self.peek()? {
                b')' => {
                    self.pos += 1;
                    break;
                }
                b'V' => return Err(DescriptorError::VoidParameter(self.pos)),
                _ => params.push(self.field()?),
            }
        }

        let return_type = if self.peek()? == b'V' {
            self.pos += 1;
            ReturnType::Void
        } else {
            ReturnType::Value(self.field()?)
        };

        if self.pos != self.bytes.len() {
            return Err(DescriptorError::TrailingInput(self.pos));
        }
        Ok(MethodDescriptor {
            params,
            return_type,
        })
    }

    fn peek(&self) -> Result<u8, DescriptorError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(DescriptorError::UnexpectedEnd(self.pos))
    }

    fn field(&mut self) -> Result<FieldType, DescriptorError> {
        let start = self.pos;
        let tag = self.peek()?;
        self.pos += 1;
        if let Some(base) = BaseType::from_tag(tag) {
            return Ok(FieldType::Base(base));
        }
        match tag {
            b'L' => {
                let name_start = self.pos;
                let len = self.bytes[name_start..]
                    .iter()
                    .position(|&b| b == b';')
                    .ok_or(DescriptorError::UnexpectedEnd(self.bytes.len()))?;
                if len == 0 {
                    return Err(DescriptorError::EmptyClassName(name_start));
                }
                self.pos = name_start + len + 1;
                let raw = String::from_utf8_lossy(&self.bytes[name_start..name_start + len]);
                Ok(FieldType::Object(to_binary_name(&raw).into_owned()))
            }
            b'[' => Ok(FieldType::Array(Box::new(self.field()?))),
            b'V' => Err(DescriptorError::VoidParameter(start)),
            other => Err(DescriptorError::InvalidTag {
                tag: char::from(other),
                pos: start,
            }),
        }
    }
}
