//! Fixed-width record encoding shared by the assembler and the machine.
//!
//! A record is `[tag:8][operand:32]`, operand little-endian. Artifacts are
//! a bare concatenation of records with no header.

use crate::data::CodePtr;
use crate::instr::{Instruction, Opcode, Operand};
use crate::machine::{MachineError, MachineResult};

pub const RECORD_SIZE: usize = 5;

pub fn encode_instruction(instruction: &Instruction) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[0] = instruction.opcode().tag();
    record[1..].copy_from_slice(&instruction.operand().to_le_bytes());
    record
}

pub fn encode_program(instructions: &[Instruction]) -> Vec<u8> {
    let mut code = Vec::with_capacity(instructions.len() * RECORD_SIZE);
    for instruction in instructions {
        code.extend_from_slice(&encode_instruction(instruction));
    }
    code
}

/// Rejects artifacts whose length is not a whole number of records.
pub fn check_alignment(code: &[u8]) -> MachineResult<()> {
    match code.len() % RECORD_SIZE {
        0 => Ok(()),
        rem => Err(MachineError::TruncatedStream {
            len: code.len(),
            pc: CodePtr(code.len() - rem),
        }),
    }
}

pub fn decode_record(code: &[u8], pc: CodePtr) -> MachineResult<Instruction> {
    let record = code
        .get(pc.0..pc.0 + RECORD_SIZE)
        .ok_or(MachineError::TruncatedStream {
            len: code.len(),
            pc,
        })?;
    let tag = record[0];
    let operand = Operand::from_le_bytes([record[1], record[2], record[3], record[4]]);
    let opcode = Opcode::from_tag(tag).ok_or(MachineError::UnknownOpcode { tag, pc })?;
    Ok(Instruction::new(opcode, operand))
}

pub fn decode_program(code: &[u8]) -> MachineResult<Vec<Instruction>> {
    check_alignment(code)?;
    (0..code.len())
        .step_by(RECORD_SIZE)
        .map(|offset| decode_record(code, CodePtr(offset)))
        .collect()
}
