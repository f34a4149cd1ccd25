use qubla_core::{ComplexExpr, QubitId, Rational};
use qubla_logic::{QuantumLogic, Step};
use qubla_opt::{join_steps, reduce, unitarize, JoinConfig, JoinMode};

fn cplx(re: i64) -> ComplexExpr {
    ComplexExpr::real(Rational::int(re))
}

fn not_step(qb_in: QubitId, qb_out: QubitId) -> Step {
    Step::ApplyTbl {
        qb_in: vec![qb_in],
        qb_out: vec![qb_out],
        copy_in: vec![true],
        table: vec![1, 0],
    }
}

#[test]
fn reduce_prunes_dead_output_column() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    logic.add_step(Step::Init {
        qubits: vec![q_in],
        amplitudes: vec![cplx(1), cplx(0)],
    });
    let apptbl_idx = logic.add_step(not_step(q_in, q_out));
    // q_out is never referenced again and is not an output: the reducer
    // should remove the whole step (its only output column becomes dead).
    let stats = reduce(&mut logic);
    assert!(logic.step(apptbl_idx).is_none() || matches!(logic.step(apptbl_idx), Some(Step::ApplyTbl { qb_out, .. }) if qb_out.is_empty()));
    assert_eq!(stats.unused_new, 1);
}

#[test]
fn reduce_keeps_declared_output() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    logic.add_step(Step::Init {
        qubits: vec![q_in],
        amplitudes: vec![cplx(1), cplx(0)],
    });
    let apptbl_idx = logic.add_step(not_step(q_in, q_out));
    logic.set_output(&qubla_core::Value::QBit(q_out));
    reduce(&mut logic);
    assert!(matches!(logic.step(apptbl_idx), Some(Step::ApplyTbl { qb_out, .. }) if qb_out == &vec![q_out]));
}

#[test]
fn unitarize_is_noop_on_already_reversible_step() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    logic.add_step(not_step(q_in, q_out));
    let fixed = unitarize(&mut logic);
    assert_eq!(fixed, 0);
}

#[test]
fn unitarize_adds_tie_break_bit_for_colliding_table() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    // A constant-1 table: both enumerations collide on the same output.
    logic.add_step(Step::ApplyTbl {
        qb_in: vec![q_in],
        qb_out: vec![q_out],
        copy_in: vec![false],
        table: vec![1, 1],
    });
    let fixed = unitarize(&mut logic);
    assert_eq!(fixed, 1);
    if let Some(Step::ApplyTbl { qb_out, table, .. }) = logic.step(0) {
        assert!(qb_out.len() >= 2, "a tie-break bit must have been appended");
        let mut seen = std::collections::HashSet::new();
        for &v in table {
            assert!(seen.insert(v), "table must be injective after unitarize");
        }
    } else {
        panic!("expected an ApplyTbl step");
    }
}

#[test]
fn fusion_respects_max_in_qb_bound() {
    // Two adjacent ApplyTbl steps whose merged input width is 4 distinct
    // qubits (q0, q1, q3, q4): must stay separate under max_in_qb=3 and
    // fuse under max_in_qb=4 (end-to-end scenario 6).
    let mut logic2 = QuantumLogic::default();
    let q0 = logic2.alloc_qubit(None).unwrap();
    let q1 = logic2.alloc_qubit(None).unwrap();
    let q3 = logic2.alloc_qubit(None).unwrap();
    let q2 = logic2.alloc_qubit(None).unwrap();
    let s1 = logic2.add_step(Step::ApplyTbl {
        qb_in: vec![q0, q1],
        qb_out: vec![q2],
        copy_in: vec![true, true],
        table: vec![0, 1, 1, 0],
    });
    let q5 = logic2.alloc_qubit(None).unwrap();
    let q4 = logic2.alloc_qubit(None).unwrap();
    let s2 = logic2.add_step(Step::ApplyTbl {
        qb_in: vec![q2, q3, q4],
        qb_out: vec![q5],
        copy_in: vec![true, true, true],
        table: vec![0, 1, 1, 0, 1, 0, 0, 1],
    });
    let too_tight = JoinConfig { max_in_qb: 3, max_out_qb: None };
    let fused2 = join_steps(&mut logic2, &JoinMode::Single(s1, s2), too_tight);
    assert_eq!(fused2, 0, "merged width of 4 must not fit max_in_qb=3");

    let loose = JoinConfig { max_in_qb: 4, max_out_qb: None };
    let fused3 = join_steps(&mut logic2, &JoinMode::Single(s1, s2), loose);
    assert_eq!(fused3, 1, "merged width of 4 must fuse when max_in_qb=4");

    // q2 is s1's only output and s2 reads it with copy_in=true, so it must
    // survive into the fused step's outputs alongside q5, and its value
    // must still be produced by the fused table.
    if let Some(Step::ApplyTbl { qb_in, qb_out, table, .. }) = logic2.step(s2) {
        assert_eq!(qb_in, &vec![q0, q1, q3, q4]);
        assert_eq!(qb_out, &vec![q2, q5], "preserved pass-through q2 must survive as an output");
        for enum_val in 0..16usize {
            let q0b = (enum_val & 1) as u64;
            let q1b = ((enum_val >> 1) & 1) as u64;
            let q3b = ((enum_val >> 2) & 1) as u64;
            let q4b = ((enum_val >> 3) & 1) as u64;
            let expect_q2 = q0b ^ q1b;
            let expect_q5 = expect_q2 ^ q3b ^ q4b;
            let got = table[enum_val];
            assert_eq!(got & 1, expect_q2, "bit0 (q2) mismatch at input {enum_val}");
            assert_eq!((got >> 1) & 1, expect_q5, "bit1 (q5) mismatch at input {enum_val}");
        }
    } else {
        panic!("expected the fused ApplyTbl step to live at s2");
    }
}
