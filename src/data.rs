use std::fmt::{Display, Formatter};
use std::ops;

/// Accumulator and memory cell contents.
pub type Value = i64;

/// Byte offset into a binary artifact.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct CodePtr(pub usize);

impl Display for CodePtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "CODE[{}]", self.0)
    }
}

impl ops::Add<usize> for CodePtr {
    type Output = CodePtr;

    fn add(self, rhs: usize) -> CodePtr {
        CodePtr(self.0 + rhs)
    }
}

impl ops::AddAssign<usize> for CodePtr {
    fn add_assign(&mut self, rhs: usize) {
        self.0 += rhs
    }
}

impl From<CodePtr> for usize {
    fn from(value: CodePtr) -> Self {
        value.0
    }
}

/// Index into machine memory, always already reduced modulo the memory size.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MemPtr(pub usize);

impl Display for MemPtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "MEM[{}]", self.0)
    }
}

impl From<MemPtr> for usize {
    fn from(value: MemPtr) -> Self {
        value.0
    }
}
