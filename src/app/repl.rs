use std::path::Path;

use accvm::{Result, Session};
use rustyline::{error::ReadlineError, Editor};
use tracing::warn;

use super::debugmode::start_debugmode;

const HELP: &str = "\
<MNEMONIC> <operand>  assemble the line (and execute it when +x)
+x / -x              enable / disable immediate execution
load                 load the typed lines as code
load <file>          load a .bin artifact or .asm listing as code
run                  run the loaded code to the end
debug                step through the loaded code
listing              print the typed lines
save <file>          write the typed lines as a binary artifact
dbg                  dump the machine
reset                clear machine and history
exit";

pub fn start_repl(mut session: Session) -> Result<()> {
    let mut rl = Editor::<()>::new()?;
    loop {
        match rl.readline("> ") {
            Ok(str) => {
                match str.trim() {
                    "exit" => break,
                    "" => (),
                    "help" => println!("{HELP}"),
                    "+x" => {
                        session.immediate_execution = true;
                        println!("Immediate execution: enabled");
                    }
                    "-x" => {
                        session.immediate_execution = false;
                        println!("Immediate execution: disabled");
                    }
                    "dbg" => println!("{}", session.machine.dbg()),
                    "listing" => print!("{}", session.listing()),
                    "reset" => session.reset(),
                    "load" => succeed(session.load_history()),
                    "run" => succeed(run_and_output(&mut session)),
                    "debug" => succeed(start_debugmode(&mut session)),
                    load_cmd if load_cmd.starts_with("load ") => {
                        succeed(session.load_path(Path::new(load_cmd[5..].trim())))
                    }
                    save_cmd if save_cmd.starts_with("save ") => {
                        succeed(session.save(Path::new(save_cmd[5..].trim())))
                    }
                    line => match session.enter(line) {
                        Ok(Some(acc)) => println!("acc = {acc}"),
                        Ok(None) => (),
                        Err(err) => println!("{err}"),
                    },
                }
                rl.add_history_entry(str);
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_and_output(session: &mut Session) -> Result<()> {
    let steps = session.run(|machine, instruction| {
        println!("{:<16} acc = {}", instruction.to_string(), machine.get_acc())
    })?;
    println!("{steps} instructions, acc = {}", session.machine.get_acc());
    Ok(())
}

fn succeed<T: ToString>(result: std::result::Result<(), T>) {
    if let Err(e) = result {
        warn!("{}", e.to_string());
    }
}
