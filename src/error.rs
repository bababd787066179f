use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assembler::AsmError;
use crate::machine::MachineError;

/// Everything that can go wrong between reading inputs and writing outputs.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Asm(#[from] AsmError),
    #[error(transparent)]
    Machine(#[from] MachineError),
    #[error("{}: {}", path.display(), source)]
    Io { path: PathBuf, source: io::Error },
    #[error("could not serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line editor: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("terminal: {0}")]
    Terminal(#[from] io::Error),
}

impl Error {
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
