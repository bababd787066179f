use serde::{Deserialize, Serialize};

use crate::codec::encode_instruction;
use crate::instr::{Instruction, Opcode, Operand};

/// One line of the assembly log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "instruction")]
    pub opcode: Opcode,
    pub operand: Operand,
}

impl From<&Instruction> for LogEntry {
    fn from(instruction: &Instruction) -> Self {
        LogEntry {
            opcode: instruction.opcode(),
            operand: instruction.operand(),
        }
    }
}

/// The output of a successful assembly run: the binary artifact and its log,
/// one log entry per encoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assembly {
    binary: Vec<u8>,
    log: Vec<LogEntry>,
}

impl Assembly {
    pub fn binary(&self) -> &[u8] {
        &self.binary
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<LogEntry>) {
        (self.binary, self.log)
    }

    pub fn log_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.log)
    }
}

/// Accumulates records and log entries side by side. Only [AssemblyBuilder::finish]
/// hands them out, so a failed run never exposes a partial log.
#[derive(Debug, Default)]
pub struct AssemblyBuilder {
    binary: Vec<u8>,
    log: Vec<LogEntry>,
}

impl AssemblyBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, instruction: &Instruction) {
        self.binary.extend_from_slice(&encode_instruction(instruction));
        self.log.push(instruction.into());
    }

    pub fn finish(self) -> Assembly {
        Assembly {
            binary: self.binary,
            log: self.log,
        }
    }
}
