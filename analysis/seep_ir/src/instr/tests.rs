use pretty_assertions::assert_eq;

use super::*;

fn close_ref() -> MethodRef {
    MethodRef::new("java/io/InputStream", "close", "()V")
}

#[test]
fn short_form_loads_and_stores() {
    assert_eq!(
        Instruction::from_opcode(opcode::ALOAD_0, None, None),
        Instruction::Load { slot: 0 }
    );
    assert_eq!(
        Instruction::from_opcode(opcode::ALOAD_3, None, None),
        Instruction::Load { slot: 3 }
    );
    assert_eq!(
        Instruction::from_opcode(opcode::ASTORE_0 + 1, None, None),
        Instruction::Store { slot: 1 }
    );
}

#[test]
fn wide_loads_and_stores_need_an_operand() {
    assert_eq!(
        Instruction::from_opcode(opcode::ALOAD, Some(9), None),
        Instruction::Load { slot: 9 }
    );
    assert_eq!(
        Instruction::from_opcode(opcode::ASTORE, Some(300), None),
        Instruction::Store { slot: 300 }
    );
    assert_eq!(
        Instruction::from_opcode(opcode::ASTORE, None, None),
        Instruction::Other {
            opcode: opcode::ASTORE
        }
    );
}

#[test]
fn invocations_carry_their_target() {
    let instr = Instruction::from_opcode(opcode::INVOKEVIRTUAL, None, Some(close_ref()));
    assert_eq!(instr.invoke_target(), Some(&close_ref()));
    assert!(matches!(
        instr,
        Instruction::Invoke {
            kind: InvokeKind::Virtual,
            ..
        }
    ));

    let missing = Instruction::from_opcode(opcode::INVOKESTATIC, None, None);
    assert_eq!(
        missing,
        Instruction::Other {
            opcode: opcode::INVOKESTATIC
        }
    );
}

#[test]
fn unrelated_opcodes_are_other() {
    for op in [opcode::NEW, opcode::DUP, opcode::RETURN, 0x15 /* iload */] {
        let instr = Instruction::from_opcode(op, Some(1), Some(close_ref()));
        assert_eq!(instr, Instruction::Other { opcode: op });
        assert!(!instr.is_load());
    }
    assert!(Instruction::from_opcode(opcode::ARETURN, None, None).is_return_object());
}

#[test]
fn method_ref_normalises_class_name() {
    let target = close_ref();
    assert_eq!(target.class_name, "java.io.InputStream");
    assert!(!target.is_constructor());
    assert_eq!(target.to_string(), "java.io.InputStream.close()V");
    assert!(MethodRef::new("java.io.File", "<init>", "()V").is_constructor());
}
