//! Source locations inside a method body.
//!
//! Compact 8-byte representation: the bytecode offset is always known,
//! the source line only when the class carries a line-number table.

use std::fmt;

/// Position of an instruction within its method.
///
/// Layout: 8 bytes total
/// - pc: u32 - bytecode offset
/// - line: u32 - 1-based source line, 0 when unknown
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(C)]
pub struct Location {
    pc: u32,
    line: u32,
}

impl Location {
    /// Location with no line information.
    #[inline]
    pub const fn at_pc(pc: u32) -> Self {
        Location { pc, line: 0 }
    }

    /// Location with a known source line.
    #[inline]
    pub const fn new(pc: u32, line: u32) -> Self {
        Location { pc, line }
    }

    #[inline]
    pub const fn pc(self) -> u32 {
        self.pc
    }

    /// The source line, if the line-number table covered this offset.
    #[inline]
    pub const fn line(self) -> Option<u32> {
        if self.line == 0 {
            None
        } else {
            Some(self.line)
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pc {}:{}", self.pc, self.line)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => write!(f, "line {line} (pc {})", self.pc),
            None => write!(f, "pc {}", self.pc),
        }
    }
}

#[cfg(test)]
mod tests;
