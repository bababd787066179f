//! File-level entry points. Inputs are read and the core runs to completion
//! before any output file is touched.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::asm::Assembly;
use crate::assembler::assemble;
use crate::disasm::{disassemble, write_listing};
use crate::error::{Error, Result};
use crate::machine::{interpret, MachineState};

pub fn assemble_file(input: &Path, binary_path: &Path, log_path: &Path) -> Result<Assembly> {
    let listing = fs::read_to_string(input).map_err(Error::io(input))?;
    let assembly = assemble(&listing)?;
    let log_json = assembly.log_json()?;

    fs::write(binary_path, assembly.binary()).map_err(Error::io(binary_path))?;
    if let Err(err) = fs::write(log_path, log_json) {
        // the binary alone is not a valid result
        if let Err(cleanup) = fs::remove_file(binary_path) {
            warn!(binary = %binary_path.display(), "could not remove binary: {cleanup}");
        }
        return Err(Error::io(log_path)(err));
    }
    debug!(
        records = assembly.len(),
        binary = %binary_path.display(),
        log = %log_path.display(),
        "wrote assembly outputs"
    );
    Ok(assembly)
}

pub fn interpret_file(input: &Path, state_path: &Path, memory_size: usize) -> Result<MachineState> {
    let code = fs::read(input).map_err(Error::io(input))?;
    let state = interpret(&code, memory_size)?;
    let state_json = state.to_json()?;

    fs::write(state_path, state_json).map_err(Error::io(state_path))?;
    debug!(state = %state_path.display(), memory_size, "wrote final state");
    Ok(state)
}

pub fn disassemble_file(input: &Path) -> Result<String> {
    let code = fs::read(input).map_err(Error::io(input))?;
    Ok(write_listing(&disassemble(&code)?))
}

/// Reads a program for the REPL and debugger: `.asm` files are assembled on
/// the fly, anything else is taken as a binary artifact.
pub fn load_code(path: &Path) -> Result<Vec<u8>> {
    if path.extension().map_or(false, |ext| ext == "asm") {
        let listing = fs::read_to_string(path).map_err(Error::io(path))?;
        Ok(assemble(&listing)?.into_parts().0)
    } else {
        fs::read(path).map_err(Error::io(path))
    }
}
