extern crate accvm;
extern crate insta;

#[cfg(test)]
mod disasmtests {
    use accvm::{
        assemble,
        assembler::compile_listing,
        disasm::{disassemble, write_listing},
        CodePtr, MachineError,
    };
    use insta::assert_snapshot;

    use crate::testutil::load_sample;

    #[test]
    fn listing_reassembles_to_the_same_bytes() {
        for sample in ["scenario_a.asm", "negate.asm", "wraparound.asm", "swap.asm"] {
            let assembly = assemble(&load_sample(sample)).unwrap();
            let listing = write_listing(&disassemble(assembly.binary()).unwrap());
            let again = assemble(&listing).unwrap();
            assert_eq!(again.binary(), assembly.binary(), "{sample}");
            assert_eq!(again.log(), assembly.log(), "{sample}");
        }
    }

    #[test]
    fn swap_listing() {
        let assembly = assemble(&load_sample("swap.asm")).unwrap();
        let listing = write_listing(&disassemble(assembly.binary()).unwrap());
        assert_snapshot!(listing.trim_end(), @r###"
        LOAD_CONST 11
        STORE_MEM 0
        LOAD_CONST 22
        STORE_MEM 1
        LOAD_CONST 0
        LOAD_MEM 0
        NEG 0
        STORE_MEM 2
        LOAD_CONST 0
        LOAD_MEM 1
        STORE_MEM 0
        LOAD_CONST 0
        LOAD_MEM 2
        STORE_MEM 1
        "###);
    }

    #[test]
    fn decoding_matches_parsing() {
        let listing = load_sample("swap.asm");
        let assembly = assemble(&listing).unwrap();
        assert_eq!(
            disassemble(assembly.binary()).unwrap(),
            compile_listing(&listing).unwrap()
        );
    }

    #[test]
    fn rejects_what_the_machine_rejects() {
        assert_eq!(
            disassemble(&[0x20, 1, 0, 0, 0, 0x41]),
            Err(MachineError::TruncatedStream {
                len: 6,
                pc: CodePtr(5)
            })
        );
        assert_eq!(
            disassemble(&[0x00, 1, 0, 0, 0]),
            Err(MachineError::UnknownOpcode {
                tag: 0x00,
                pc: CodePtr(0)
            })
        );
    }
}
