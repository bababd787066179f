use thiserror::Error;

use crate::asm::{Assembly, AssemblyBuilder};
use crate::instr::{Instruction, Opcode, Operand};

/// A source line split into its mnemonic and operand tokens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command(pub String, pub Vec<String>);

type Line = Option<Command>;

peg::parser!(
    grammar listing_parser() for str {
        rule whitespace()
            = [c if c.is_whitespace() && c != '\n']

        rule comment()
            = ("#" / ";") [^'\n']*

        rule _()
            = whitespace()* comment()?

        rule token() -> String
            = s:$([c if !c.is_whitespace() && c != '#' && c != ';']+) { s.to_string() }

        rule cmd() -> Command
            = nm:token() args:(whitespace()+ t:token() { t })* { Command(nm, args) }

        rule line() -> Line
            = whitespace()* l:cmd()? _ { l }

        pub rule lines() -> Vec<Line>
            = line() ** "\n"
    }
);

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum AsmError {
    #[error("line {line}: unknown opcode {mnemonic}")]
    UnknownOpcode { line: usize, mnemonic: String },
    #[error("line {line}: malformed operand: {message}")]
    MalformedOperand { line: usize, message: String },
    #[error("line {line}: operand {literal} does not fit in an unsigned 32-bit field")]
    OperandOutOfRange { line: usize, literal: String },
}

impl AsmError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownOpcode { line, .. }
            | Self::MalformedOperand { line, .. }
            | Self::OperandOutOfRange { line, .. } => *line,
        }
    }
}

pub type AsmResult<T> = Result<T, AsmError>;

/// Splits a listing into commands, paired with their 1-based line numbers.
/// Blank and comment-only lines are dropped.
pub fn parse_listing(listing: &str) -> AsmResult<Vec<(usize, Command)>> {
    match listing_parser::lines(listing) {
        Ok(lines) => Ok(lines
            .into_iter()
            .enumerate()
            .filter_map(|(idx, line)| line.map(|cmd| (idx + 1, cmd)))
            .collect()),
        // every line matches `line()`, so this only guards grammar changes
        Err(e) => Err(AsmError::MalformedOperand {
            line: e.location.line,
            message: format!("unreadable line, expected {}", e.expected),
        }),
    }
}

pub fn compile_listing(listing: &str) -> AsmResult<Vec<Instruction>> {
    parse_listing(listing)?
        .into_iter()
        .map(|(line, command)| command_to_instr(line, command))
        .collect()
}

/// Translates a listing into its binary artifact and log. Stops at the first
/// bad line; nothing is returned for a listing that fails anywhere.
pub fn assemble(listing: &str) -> AsmResult<Assembly> {
    let mut builder = AssemblyBuilder::new();
    for instruction in compile_listing(listing)? {
        builder.push(&instruction);
    }
    Ok(builder.finish())
}

/// Assembles a single source line. Blank lines yield `None`.
pub fn assemble_line(text: &str) -> AsmResult<Option<Instruction>> {
    Ok(compile_listing(text)?.into_iter().next())
}

fn command_to_instr(line: usize, command: Command) -> AsmResult<Instruction> {
    let Command(mnemonic, args) = command;
    let opcode = match Opcode::from_mnemonic(&mnemonic) {
        Some(opcode) => opcode,
        None => return Err(AsmError::UnknownOpcode { line, mnemonic }),
    };

    match &args[..] {
        [operand] => Ok(Instruction::new(opcode, parse_operand(line, operand)?)),
        [] => Err(AsmError::MalformedOperand {
            line,
            message: format!("{opcode} expects an operand"),
        }),
        [_, extra, ..] => Err(AsmError::MalformedOperand {
            line,
            message: format!("unexpected {extra} after the operand of {opcode}"),
        }),
    }
}

/// Accepts an optionally signed base-10 literal. Anything negative other
/// than zero is out of range rather than reinterpreted.
fn parse_operand(line: usize, literal: &str) -> AsmResult<Operand> {
    let negative = literal.starts_with('-');
    let digits = literal
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(literal);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AsmError::MalformedOperand {
            line,
            message: format!("{literal} is not a base-10 integer"),
        });
    }

    let out_of_range = || AsmError::OperandOutOfRange {
        line,
        literal: literal.to_string(),
    };
    match digits.parse::<Operand>() {
        Ok(0) => Ok(0),
        Ok(_) if negative => Err(out_of_range()),
        Ok(value) => Ok(value),
        Err(_) => Err(out_of_range()),
    }
}

#[test]
fn test_listing_does_parse() {
    const PROGRAM: &str = "
  LOAD_CONST 5   # five
\tSTORE_MEM\t10
; nothing here

NEG 0 1";

    assert_eq!(
        parse_listing(PROGRAM),
        Ok(vec![
            (2, Command("LOAD_CONST".to_string(), vec!["5".to_string()])),
            (3, Command("STORE_MEM".to_string(), vec!["10".to_string()])),
            (
                6,
                Command("NEG".to_string(), vec!["0".to_string(), "1".to_string()])
            ),
        ])
    )
}

#[test]
fn test_any_text_splits_into_lines() {
    for text in ["\u{0}\u{1b}", "¬ ∀ λ", ";;##", "\r\r\n\n", "a\u{85}b\u{a0}c", "\u{1f}"] {
        assert!(parse_listing(text).is_ok(), "{text:?}");
    }
}

#[test]
fn test_unicode_whitespace_separates_tokens() {
    assert_eq!(
        compile_listing("LOAD_CONST\u{0c}5\nNEG\u{0b}0\u{a0}\nSTORE_MEM\u{2003}7"),
        Ok(vec![
            Instruction::LoadConst(5),
            Instruction::Neg(0),
            Instruction::StoreMem(7)
        ])
    )
}

#[test]
fn test_crlf_listing() {
    assert_eq!(
        compile_listing("LOAD_CONST 1\r\nNEG 0\r\n"),
        Ok(vec![Instruction::LoadConst(1), Instruction::Neg(0)])
    )
}

#[test]
fn test_operand_literals() {
    assert_eq!(parse_operand(1, "0"), Ok(0));
    assert_eq!(parse_operand(1, "+17"), Ok(17));
    assert_eq!(parse_operand(1, "-0"), Ok(0));
    assert_eq!(parse_operand(1, "007"), Ok(7));
    assert_eq!(parse_operand(1, "4294967295"), Ok(u32::MAX));
    assert!(matches!(
        parse_operand(1, "4294967296"),
        Err(AsmError::OperandOutOfRange { .. })
    ));
    assert!(matches!(
        parse_operand(1, "-1"),
        Err(AsmError::OperandOutOfRange { .. })
    ));
    assert!(matches!(
        parse_operand(1, "99999999999999999999999"),
        Err(AsmError::OperandOutOfRange { .. })
    ));
    for bad in ["x", "1.5", "0x10", "-", "+", "1e3", "5a"] {
        assert!(
            matches!(parse_operand(1, bad), Err(AsmError::MalformedOperand { .. })),
            "{bad}"
        );
    }
}

#[test]
fn test_error_lines() {
    let err = assemble("LOAD_CONST 1\n\nJMP 3\n").unwrap_err();
    assert_eq!(
        err,
        AsmError::UnknownOpcode {
            line: 3,
            mnemonic: "JMP".to_string()
        }
    );
    assert_eq!(err.line(), 3);
    assert_eq!(err.to_string(), "line 3: unknown opcode JMP");
}

#[test]
fn test_assemble_line() {
    assert_eq!(assemble_line("   "), Ok(None));
    assert_eq!(assemble_line("NEG 0"), Ok(Some(Instruction::Neg(0))));
    assert!(assemble_line("NEG").is_err());
}
