pub mod debugmode;
pub mod repl;
