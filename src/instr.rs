use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::codec::RECORD_SIZE;

/// Every instruction carries exactly one operand of this width.
pub type Operand = u32;

/// The closed set of machine operations. Serializes as its mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    #[serde(rename = "LOAD_CONST")]
    LoadConst,
    #[serde(rename = "LOAD_MEM")]
    LoadMem,
    #[serde(rename = "STORE_MEM")]
    StoreMem,
    #[serde(rename = "NEG")]
    Neg,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [
        Opcode::LoadConst,
        Opcode::LoadMem,
        Opcode::StoreMem,
        Opcode::Neg,
    ];

    pub const fn tag(self) -> u8 {
        match self {
            Opcode::LoadConst => 0x20,
            Opcode::LoadMem => 0xC4,
            Opcode::StoreMem => 0x40,
            Opcode::Neg => 0x41,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| op.tag() == tag)
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::LoadMem => "LOAD_MEM",
            Opcode::StoreMem => "STORE_MEM",
            Opcode::Neg => "NEG",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.mnemonic())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    LoadConst(Operand),
    LoadMem(Operand),
    StoreMem(Operand),
    /// The operand is ignored by the machine but still encoded.
    Neg(Operand),
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Operand) -> Instruction {
        match opcode {
            Opcode::LoadConst => Instruction::LoadConst(operand),
            Opcode::LoadMem => Instruction::LoadMem(operand),
            Opcode::StoreMem => Instruction::StoreMem(operand),
            Opcode::Neg => Instruction::Neg(operand),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::LoadConst(_) => Opcode::LoadConst,
            Instruction::LoadMem(_) => Opcode::LoadMem,
            Instruction::StoreMem(_) => Opcode::StoreMem,
            Instruction::Neg(_) => Opcode::Neg,
        }
    }

    pub fn operand(&self) -> Operand {
        match *self {
            Instruction::LoadConst(operand)
            | Instruction::LoadMem(operand)
            | Instruction::StoreMem(operand)
            | Instruction::Neg(operand) => operand,
        }
    }

    /// Size in bytes of the encoded record.
    pub fn size(&self) -> usize {
        RECORD_SIZE
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{} {}", self.opcode(), self.operand())
    }
}
