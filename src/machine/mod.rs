pub mod state;

use std::fmt::Write;

use thiserror::Error;
use tracing::trace;

use crate::codec::{check_alignment, decode_program, decode_record};
use crate::data::{CodePtr, MemPtr, Value};
use crate::instr::{Instruction, Operand};
use crate::util::writeout;

pub use self::state::MachineState;

pub const DEFAULT_MEMORY_SIZE: usize = 1024;

#[derive(Debug, Clone)]
pub struct Machine {
    code: Vec<u8>,
    memory: Vec<Value>,
    accumulator: Value,
    pc: CodePtr, // next record to decode
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            code: vec![],
            memory: vec![0; DEFAULT_MEMORY_SIZE],
            accumulator: 0,
            pc: CodePtr(0),
        }
    }

    /// Fails with `InvalidConfiguration` for zero, or for a size that
    /// cannot be allocated.
    pub fn with_memory_size(memory_size: usize) -> MachineResult<Machine> {
        let invalid = || {
            MachineError::InvalidConfiguration(i64::try_from(memory_size).unwrap_or(i64::MAX))
        };
        if memory_size == 0 {
            return Err(invalid());
        }
        let mut memory: Vec<Value> = Vec::new();
        memory.try_reserve_exact(memory_size).map_err(|_| invalid())?;
        memory.resize(memory_size, 0);
        Ok(Machine {
            code: vec![],
            memory,
            accumulator: 0,
            pc: CodePtr(0),
        })
    }

    /// Replaces the loaded code and rewinds the program counter. Accumulator
    /// and memory are left as they are.
    pub fn load(&mut self, code: &[u8]) -> MResult {
        check_alignment(code)?;
        self.code = code.to_vec();
        self.pc = CodePtr(0);
        Ok(())
    }

    /// Zeroes the accumulator and memory and unloads the code.
    pub fn reset(&mut self) {
        self.code.clear();
        self.memory.iter_mut().for_each(|cell| *cell = 0);
        self.accumulator = 0;
        self.pc = CodePtr(0);
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn get_code(&self) -> MachineResult<Vec<Instruction>> {
        decode_program(&self.code)
    }

    pub fn get_p(&self) -> CodePtr {
        self.pc
    }

    pub fn get_acc(&self) -> Value {
        self.accumulator
    }

    pub fn set_acc(&mut self, value: Value) {
        self.accumulator = value
    }

    pub fn memory_size(&self) -> usize {
        self.memory.len()
    }

    pub fn get_mem(&self, MemPtr(index): MemPtr) -> Value {
        self.memory[index]
    }

    pub fn set_mem(&mut self, MemPtr(index): MemPtr, value: Value) {
        self.memory[index] = value
    }

    pub fn iter_mem(&self) -> impl ExactSizeIterator<Item = (MemPtr, &Value)> {
        self.memory
            .iter()
            .enumerate()
            .map(|(idx, value)| (MemPtr(idx), value))
    }

    /// Reduces a raw address into `0..memory_size`, never negative.
    pub fn wrap_address(&self, raw: Value) -> MemPtr {
        MemPtr(raw.rem_euclid(self.memory.len() as Value) as usize)
    }

    pub fn is_halted(&self) -> bool {
        self.pc.0 >= self.code.len()
    }

    pub fn current_instruction(&self) -> MachineResult<Option<Instruction>> {
        if self.is_halted() {
            Ok(None)
        } else {
            decode_record(&self.code, self.pc).map(Some)
        }
    }

    /// Decodes the record at P, advances P past it, then applies it.
    pub fn step(&mut self) -> MachineResult<Instruction> {
        let instruction = self.current_instruction()?.ok_or(MachineError::Halted)?;
        let pc = self.pc;
        self.pc += instruction.size();
        self.apply(instruction);
        trace!(%pc, %instruction, accumulator = self.accumulator, "step");
        Ok(instruction)
    }

    /// Applies an instruction to the accumulator and memory without touching P.
    pub fn apply(&mut self, instruction: Instruction) {
        execute_instruction(self, instruction)
    }

    pub fn execute(&mut self) -> ExecutionEnvironment {
        ExecutionEnvironment::new(self)
    }

    pub fn state(&self) -> MachineState {
        MachineState {
            accumulator: self.accumulator,
            memory: self.memory.clone(),
        }
    }

    pub fn into_state(self) -> MachineState {
        MachineState {
            accumulator: self.accumulator,
            memory: self.memory,
        }
    }

    pub fn dbg(&self) -> String {
        fn dbg_impl(machine: &Machine) -> Result<String, std::fmt::Error> {
            let mut str = String::new();
            writeln!(str, "p: {}", machine.get_p())?;
            writeln!(str, "acc: {}", machine.get_acc())?;
            writeln!(str, "halted: {}", machine.is_halted())?;
            match machine.get_code() {
                Ok(code) => writeln!(str, "code:\n{}", writeout(code.iter()))?,
                Err(e) => writeln!(str, "code: {e}")?,
            }
            writeln!(str, "memory ({} cells):", machine.memory_size())?;
            for (ptr, value) in machine.iter_mem().filter(|(_, value)| **value != 0) {
                writeln!(str, "{ptr}\t{value}")?;
            }
            Ok(str)
        }

        dbg_impl(self).unwrap_or_else(|e| format!("{e}"))
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum MachineError {
    #[error("unknown opcode {tag:#04x} at {pc}")]
    UnknownOpcode { tag: u8, pc: CodePtr },
    #[error("record at {pc} runs past the end of a {len}-byte stream")]
    TruncatedStream { len: usize, pc: CodePtr },
    #[error("memory size must be positive, got {0}")]
    InvalidConfiguration(i64),
    #[error("program counter is past the end of the code")]
    Halted,
}

pub type MResult = Result<(), MachineError>;
pub type MachineResult<T> = Result<T, MachineError>;

/// Validates a requested memory size as given on the command line.
pub fn checked_memory_size(requested: i64) -> MachineResult<usize> {
    usize::try_from(requested)
        .ok()
        .filter(|&size| size > 0)
        .ok_or(MachineError::InvalidConfiguration(requested))
}

/// Runs `code` on a fresh machine until the program counter leaves the
/// stream and returns the final accumulator and memory.
pub fn interpret(code: &[u8], memory_size: usize) -> MachineResult<MachineState> {
    let mut machine = Machine::with_memory_size(memory_size)?;
    machine.load(code)?;
    machine.execute().run()?;
    Ok(machine.into_state())
}

type MachineHook<'a> = dyn FnMut(&Machine, Instruction) -> MResult + 'a;

pub struct ExecutionEnvironment<'a> {
    machine: &'a mut Machine,
    step_hook: Option<Box<MachineHook<'a>>>,
}

impl<'a> ExecutionEnvironment<'a> {
    pub fn new(machine: &'a mut Machine) -> Self {
        Self {
            machine,
            step_hook: None,
        }
    }

    /// Steps until the program counter reaches the end of the code.
    /// Returns the number of instructions executed.
    pub fn run(mut self) -> MachineResult<usize> {
        let mut steps = 0;
        while !self.machine.is_halted() {
            let instruction = self.machine.step()?;
            steps += 1;
            if let Some(hook) = self.step_hook.as_mut() {
                hook(self.machine, instruction)?;
            }
        }
        Ok(steps)
    }

    /// Registers a hook called after every executed instruction.
    pub fn with_step_hook<F>(mut self, step_hook: F) -> Self
    where
        F: FnMut(&Machine, Instruction) -> MResult + 'a,
    {
        self.step_hook = Some(Box::new(step_hook));
        self
    }

}

fn load_const(machine: &mut Machine, operand: Operand) {
    machine.set_acc(Value::from(operand));
}

fn load_mem(machine: &mut Machine, offset: Operand) {
    let address = machine.wrap_address(machine.get_acc().wrapping_add(Value::from(offset)));
    machine.set_acc(machine.get_mem(address));
}

fn store_mem(machine: &mut Machine, address: Operand) {
    let address = machine.wrap_address(Value::from(address));
    machine.set_mem(address, machine.get_acc());
}

fn neg(machine: &mut Machine) {
    machine.set_acc(machine.get_acc().wrapping_neg());
}

fn execute_instruction(machine: &mut Machine, instruction: Instruction) {
    match instruction {
        Instruction::LoadConst(operand) => load_const(machine, operand),
        Instruction::LoadMem(offset) => load_mem(machine, offset),
        Instruction::StoreMem(address) => store_mem(machine, address),
        Instruction::Neg(_) => neg(machine),
    }
}
