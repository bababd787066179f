extern crate accvm;
extern crate insta;

#[cfg(test)]
mod tests {
    use accvm::{
        codec::encode_program, util::writeout, CodePtr, Error, Instruction, Machine, MachineError,
        MemPtr, Session,
    };
    use insta::assert_snapshot;

    use crate::testutil::scratch_dir;

    fn new_session(memory_size: usize) -> Session {
        Session::new(Machine::with_memory_size(memory_size).unwrap())
    }

    #[test]
    fn immediate_mode_applies_each_line() {
        let mut session = new_session(16);
        assert_eq!(session.enter("LOAD_CONST 5").unwrap(), Some(5));
        assert_eq!(session.enter("STORE_MEM 10").unwrap(), Some(5));
        assert_eq!(session.enter("NEG 0").unwrap(), Some(-5));
        assert_eq!(session.enter("LOAD_MEM 5").unwrap(), Some(0));
        assert_eq!(session.machine.get_mem(MemPtr(10)), 5);
        assert_eq!(session.history.len(), 4);
        // nothing was loaded, only applied
        assert_eq!(session.machine.get_p(), CodePtr(0));
    }

    #[test]
    fn deferred_mode_only_records() {
        let mut session = new_session(16);
        session.immediate_execution = false;
        assert_eq!(session.enter("LOAD_CONST 5").unwrap(), None);
        assert_eq!(session.enter("NEG 0").unwrap(), None);
        assert_eq!(session.machine.get_acc(), 0);
        assert_eq!(
            session.history,
            vec![Instruction::LoadConst(5), Instruction::Neg(0)]
        );
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let mut session = new_session(16);
        assert_eq!(session.enter("   ").unwrap(), None);
        assert_eq!(session.enter("# note").unwrap(), None);
        assert!(session.history.is_empty());
    }

    #[test]
    fn bad_lines_leave_history_alone() {
        let mut session = new_session(16);
        session.enter("LOAD_CONST 1").unwrap();
        let err = session.enter("JMP 3").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unknown opcode JMP");
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn load_history_and_run() {
        let mut session = new_session(16);
        session.immediate_execution = false;
        for line in ["LOAD_CONST 3", "STORE_MEM 1", "LOAD_CONST 7", "NEG 0"] {
            session.enter(line).unwrap();
        }
        session.load_history().unwrap();

        let mut seen = vec![];
        let steps = session
            .run(|machine, instruction| seen.push((instruction, machine.get_acc())))
            .unwrap();
        assert_eq!(steps, 4);
        assert_eq!(
            seen,
            vec![
                (Instruction::LoadConst(3), 3),
                (Instruction::StoreMem(1), 3),
                (Instruction::LoadConst(7), 7),
                (Instruction::Neg(0), -7),
            ]
        );
        assert!(session.machine.is_halted());
        assert_eq!(session.machine.get_mem(MemPtr(1)), 3);
    }

    #[test]
    fn run_reports_decode_errors() {
        let mut session = new_session(16);
        session.machine.load(&[0x99, 0, 0, 0, 0]).unwrap();
        let result = session.run(|_, _| {});
        assert!(matches!(
            result,
            Err(Error::Machine(MachineError::UnknownOpcode {
                tag: 0x99,
                pc: CodePtr(0)
            }))
        ));
    }

    #[test]
    fn listing_and_reset() {
        let mut session = new_session(16);
        session.enter("LOAD_CONST 2").unwrap();
        session.enter("STORE_MEM 4").unwrap();
        assert_snapshot!(session.listing().trim_end(), @r###"
        LOAD_CONST 2
        STORE_MEM 4
        "###);

        session.reset();
        assert!(session.history.is_empty());
        assert_eq!(session.machine.get_acc(), 0);
        assert_eq!(session.machine.get_mem(MemPtr(4)), 0);
        assert_eq!(session.machine.memory_size(), 16);
    }

    #[test]
    fn save_then_load_path() {
        let dir = scratch_dir("save_then_load_path");
        let path = dir.join("typed.bin");

        let mut session = new_session(8);
        session.immediate_execution = false;
        session.enter("LOAD_CONST 6").unwrap();
        session.enter("STORE_MEM 9").unwrap();
        session.save(&path).unwrap();
        assert_eq!(
            std::fs::read(&path).unwrap(),
            encode_program(&session.history)
        );

        let mut fresh = new_session(8);
        fresh.load_path(&path).unwrap();
        fresh.run(|_, _| {}).unwrap();
        assert_eq!(fresh.machine.get_mem(MemPtr(1)), 6);
    }

    #[test]
    fn code_listing_snapshot() {
        let code = encode_program(&[
            Instruction::LoadConst(5),
            Instruction::StoreMem(10),
            Instruction::LoadConst(0),
            Instruction::LoadMem(10),
        ]);
        let mut machine = Machine::new();
        machine.load(&code).unwrap();
        assert_eq!(
            writeout(machine.get_code().unwrap().iter()),
            "000\tLOAD_CONST 5\n001\tSTORE_MEM 10\n002\tLOAD_CONST 0\n003\tLOAD_MEM 10\n"
        );
    }
}
