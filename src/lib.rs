pub mod asm;
pub mod assembler;
pub mod codec;
pub mod data;
pub mod disasm;
pub mod error;
pub mod instr;
pub mod machine;
pub mod toolchain;
pub mod util;

use std::fs;
use std::path::Path;

pub use asm::{Assembly, LogEntry};
pub use assembler::{assemble, AsmError};
pub use data::{CodePtr, MemPtr, Value};
pub use error::{Error, Result};
pub use instr::{Instruction, Opcode, Operand};
pub use machine::{interpret, Machine, MachineError, MachineState, DEFAULT_MEMORY_SIZE};

use assembler::assemble_line;
use codec::encode_program;
use disasm::write_listing;

/// Interactive state: a live machine plus every instruction typed so far.
#[derive(Debug)]
pub struct Session {
    pub machine: Machine,
    pub history: Vec<Instruction>,
    pub immediate_execution: bool,
}

impl Session {
    pub fn new(machine: Machine) -> Session {
        Session {
            machine,
            history: vec![],
            immediate_execution: true,
        }
    }

    /// Assembles one typed line into the history. With immediate execution
    /// on, the instruction is also applied and the new accumulator returned.
    pub fn enter(&mut self, line: &str) -> Result<Option<Value>> {
        let Some(instruction) = assemble_line(line)? else {
            return Ok(None);
        };
        self.history.push(instruction);
        if self.immediate_execution {
            self.machine.apply(instruction);
            Ok(Some(self.machine.get_acc()))
        } else {
            Ok(None)
        }
    }

    /// Loads the typed history as the machine's code.
    pub fn load_history(&mut self) -> Result<()> {
        Ok(self.machine.load(&encode_program(&self.history))?)
    }

    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let code = toolchain::load_code(path)?;
        Ok(self.machine.load(&code)?)
    }

    /// Runs the loaded code to the end, reporting every executed instruction.
    pub fn run<F>(&mut self, mut on_step: F) -> Result<usize>
    where
        F: FnMut(&Machine, Instruction),
    {
        let steps = self
            .machine
            .execute()
            .with_step_hook(|machine, instruction| {
                on_step(machine, instruction);
                Ok(())
            })
            .run()?;
        Ok(steps)
    }

    pub fn listing(&self) -> String {
        write_listing(&self.history)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, encode_program(&self.history)).map_err(Error::io(path))
    }

    pub fn reset(&mut self) {
        self.machine.reset();
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Machine::default())
    }
}
