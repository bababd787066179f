extern crate accvm;
extern crate insta;
extern crate parameterized;

#[cfg(test)]
mod asmtests {
    use accvm::{
        assemble,
        assembler::compile_listing,
        codec::RECORD_SIZE,
        util::{case, collapse},
        AsmError, Instruction, LogEntry, Opcode,
    };
    use insta::assert_snapshot;
    use parameterized::parameterized;
    use crate::testutil::load_sample;

    const BAD_OPCODE: &str = "LOAD_CONST 1\nJMP 4\n";
    const LOWERCASE: &str = "load_const 1\n";
    const MISSING_OPERAND: &str = "LOAD_CONST 1\nSTORE_MEM\n";
    const TEXT_OPERAND: &str = "LOAD_CONST five\n";
    const HEX_OPERAND: &str = "LOAD_CONST 0x10\n";
    const EXTRA_TOKEN: &str = "NEG 0 0\n";
    const NEGATIVE: &str = "LOAD_CONST -1\n";
    const TOO_BIG: &str = "\n\nSTORE_MEM 4294967296\n";

    #[parameterized(input = {
        BAD_OPCODE,
        LOWERCASE,
        MISSING_OPERAND,
        TEXT_OPERAND,
        HEX_OPERAND,
        EXTRA_TOKEN,
        NEGATIVE,
        TOO_BIG,
    }, expected = {
        "error: line 2: unknown opcode JMP",
        "error: line 1: unknown opcode load_const",
        "error: line 2: malformed operand: STORE_MEM expects an operand",
        "error: line 1: malformed operand: five is not a base-10 integer",
        "error: line 1: malformed operand: 0x10 is not a base-10 integer",
        "error: line 1: malformed operand: unexpected 0 after the operand of NEG",
        "error: line 1: operand -1 does not fit in an unsigned 32-bit field",
        "error: line 3: operand 4294967296 does not fit in an unsigned 32-bit field",
    })]
    fn test_assembler_rejects(input: &str, expected: &str) {
        let result = assemble(input).map(|assembly| format!("{} bytes", assembly.binary().len()));
        assert_eq!(collapse(result), expected);
    }

    #[parameterized(input = {
        "",
        "\n\n\n",
        "# only a comment",
        "LOAD_CONST 5",
        "LOAD_CONST 5\nSTORE_MEM 10\nLOAD_CONST 0\nLOAD_MEM 10\n",
        "  NEG 0  ; indented, commented\n\n\tLOAD_MEM 3\n",
    }, count = {
        0,
        0,
        0,
        1,
        4,
        2,
    })]
    fn test_sizes_follow_instruction_count(input: &str, count: usize) {
        let assembly = assemble(input).unwrap();
        assert_eq!(assembly.binary().len(), RECORD_SIZE * count);
        assert_eq!(assembly.log().len(), count);
    }

    #[test]
    fn test_unknown_opcode_produces_nothing() {
        let listing = load_sample("bad_opcode.asm");
        assert_eq!(
            assemble(&listing),
            Err(AsmError::UnknownOpcode {
                line: 2,
                mnemonic: "JMP".to_string()
            })
        );
    }

    #[test]
    fn test_neg_keeps_its_operand() {
        let assembly = assemble("NEG 258\n").unwrap();
        assert_eq!(assembly.binary(), &[0x41, 0x02, 0x01, 0x00, 0x00]);
        assert_eq!(
            assembly.log(),
            &[LogEntry {
                opcode: Opcode::Neg,
                operand: 258
            }]
        );
    }

    #[test]
    fn test_binary_layout() {
        let assembly = assemble("LOAD_CONST 5\nLOAD_MEM 1\nSTORE_MEM 65536\nNEG 0\n").unwrap();
        assert_eq!(
            assembly.binary(),
            &[
                0x20, 5, 0, 0, 0, //
                0xC4, 1, 0, 0, 0, //
                0x40, 0, 0, 1, 0, //
                0x41, 0, 0, 0, 0,
            ]
        );
    }

    #[test]
    fn test_log_keeps_line_order() {
        let listing = load_sample("swap.asm");
        let instructions = compile_listing(&listing).unwrap();
        let assembly = assemble(&listing).unwrap();
        let logged = assembly
            .log()
            .iter()
            .map(|entry| Instruction::new(entry.opcode, entry.operand))
            .collect::<Vec<_>>();
        assert_eq!(logged, instructions);
        assert_eq!(instructions.len(), 14);
    }

    #[test]
    fn test_scenario_a_log() {
        let listing = load_sample("scenario_a.asm");
        let assembly = assemble(&listing).unwrap();
        assert_snapshot!(assembly.log_json().unwrap(), @r###"
        [
          {
            "instruction": "LOAD_CONST",
            "operand": 5
          },
          {
            "instruction": "STORE_MEM",
            "operand": 10
          },
          {
            "instruction": "LOAD_CONST",
            "operand": 0
          },
          {
            "instruction": "LOAD_MEM",
            "operand": 10
          }
        ]
        "###);
    }

    #[test]
    fn test_listing_case() {
        let listing = "LOAD_CONST 7\nNEG 0";
        let output = compile_listing(listing)
            .unwrap()
            .iter()
            .map(|instr| format!("{:?}", instr))
            .collect::<Vec<_>>()
            .join("\n");
        assert_snapshot!(case(listing, output), @r###"
        LOAD_CONST 7
        NEG 0
        -----
        LoadConst(7)
        Neg(0)
        "###);
    }
}
