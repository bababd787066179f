//! Turns a binary artifact back into a listing the assembler accepts.

use crate::codec::{check_alignment, decode_program, decode_record, RECORD_SIZE};
use crate::data::CodePtr;
use crate::instr::Instruction;
use crate::machine::MachineResult;

pub fn disassemble(code: &[u8]) -> MachineResult<Vec<Instruction>> {
    decode_program(code)
}

/// Pairs every decoded record with its byte offset.
pub fn annotate(code: &[u8]) -> MachineResult<Vec<(CodePtr, Instruction)>> {
    check_alignment(code)?;
    (0..code.len())
        .step_by(RECORD_SIZE)
        .map(|offset| decode_record(code, CodePtr(offset)).map(|instr| (CodePtr(offset), instr)))
        .collect()
}

/// One `MNEMONIC operand` line per instruction.
pub fn write_listing(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|instruction| format!("{instruction}\n"))
        .collect()
}
