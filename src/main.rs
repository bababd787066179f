use std::fs;
use std::path::PathBuf;
use std::process;

use accvm::{
    machine::checked_memory_size,
    toolchain::{assemble_file, disassemble_file, interpret_file},
    Error, Machine, Result, Session, DEFAULT_MEMORY_SIZE,
};
use app::{debugmode::start_debugmode, repl::start_repl};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod app;

#[derive(Parser, Debug)]
#[command(name = "accvm")]
#[command(about = "Assembler, interpreter and debugger for a four-opcode accumulator machine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a listing into a binary artifact and a JSON log
    Assemble {
        /// Source listing, one `MNEMONIC operand` per line
        input: PathBuf,
        /// Binary artifact to write
        output: PathBuf,
        /// JSON log to write
        log: PathBuf,
    },
    /// Execute a binary artifact and dump the final machine state as JSON
    Interpret {
        input: PathBuf,
        /// JSON state dump to write
        output: PathBuf,
        #[command(flatten)]
        memory: MemoryArgs,
    },
    /// Print the listing encoded in a binary artifact
    Disassemble {
        input: PathBuf,
        /// Write the listing here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Type instructions and run them against a live machine
    Repl {
        #[command(flatten)]
        memory: MemoryArgs,
    },
    /// Step through a binary artifact (or `.asm` listing) in a terminal UI
    Debug {
        input: PathBuf,
        #[command(flatten)]
        memory: MemoryArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct MemoryArgs {
    /// Number of memory cells
    #[arg(
        long,
        env = "ACCVM_MEMORY_SIZE",
        default_value_t = DEFAULT_MEMORY_SIZE as i64,
        allow_negative_numbers = true
    )]
    memory_size: i64,
}

impl MemoryArgs {
    fn machine(&self) -> Result<Machine> {
        Ok(Machine::with_memory_size(checked_memory_size(
            self.memory_size,
        )?)?)
    }
}

/// Honours `RUST_LOG`; defaults to `info`. Logs go to stderr so stdout
/// stays free for listings.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = Args::parse();
    if let Err(err) = run(args.command) {
        error!("{err}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Assemble { input, output, log } => {
            let assembly = assemble_file(&input, &output, &log)?;
            info!(
                "Assembled {} -> {} ({} records, {} bytes), log in {}",
                input.display(),
                output.display(),
                assembly.len(),
                assembly.binary().len(),
                log.display()
            );
        }
        Command::Interpret {
            input,
            output,
            memory,
        } => {
            let memory_size = checked_memory_size(memory.memory_size)?;
            let state = interpret_file(&input, &output, memory_size)?;
            info!(
                "Interpreted {} -> {} (accumulator = {})",
                input.display(),
                output.display(),
                state.accumulator
            );
        }
        Command::Disassemble { input, output } => {
            let listing = disassemble_file(&input)?;
            match output {
                Some(path) => fs::write(&path, listing).map_err(Error::io(&path))?,
                None => print!("{listing}"),
            }
        }
        Command::Repl { memory } => start_repl(Session::new(memory.machine()?))?,
        Command::Debug { input, memory } => {
            let mut session = Session::new(memory.machine()?);
            session.load_path(&input)?;
            start_debugmode(&mut session)?;
        }
    }
    Ok(())
}
