use qubla_core::{CoreError, QubitId, Rational, TableFunction, Value};
use qubla_logic::{QuantumLogic, Step};
use qubla_synth::table_fn::TblArg;
use qubla_synth::{applyop, qbinit, qstate, synthesize_call};

/// A 1-argument NOT gate: `f(x) = !x`.
struct Not;
impl TableFunction for Not {
    fn eval(&self, key: u64) -> u64 {
        (!key) & 1
    }
    fn in_bits(&self) -> usize {
        1
    }
    fn out_bits(&self) -> usize {
        1
    }
}

/// A 2-argument AND gate whose every output column is constant 0 when the
/// second argument is fixed to 0.
struct AndWithConstSecondArg;
impl TableFunction for AndWithConstSecondArg {
    fn eval(&self, key: u64) -> u64 {
        (key & 1) & ((key >> 1) & 1)
    }
    fn in_bits(&self) -> usize {
        2
    }
    fn out_bits(&self) -> usize {
        1
    }
}

/// A 2-argument XOR gate, used to exercise the shared-qubit fan-out case.
struct Xor;
impl TableFunction for Xor {
    fn eval(&self, key: u64) -> u64 {
        ((key & 1) ^ ((key >> 1) & 1)) & 1
    }
    fn in_bits(&self) -> usize {
        2
    }
    fn out_bits(&self) -> usize {
        1
    }
}

fn cplx_rect(re: i64, im: i64) -> qubla_core::ComplexExpr {
    qubla_core::ComplexExpr::rect(Rational::int(re), Rational::int(im))
}

#[test]
fn bit_copy_synthesizes_single_apptbl_step() {
    let mut logic = QuantumLogic::default();
    let q = logic.alloc_input_qubit();
    let results = synthesize_call(&mut logic, &Not, &[TblArg::Qubit(q)]);
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Value::QBit(_)));

    let apptbl_count = logic
        .steps()
        .iter()
        .filter(|s| matches!(s, Some(Step::ApplyTbl { .. })))
        .count();
    assert_eq!(apptbl_count, 1);
    if let Some(Step::ApplyTbl { table, qb_in, qb_out, .. }) =
        logic.steps().iter().flatten().find(|s| matches!(s, Step::ApplyTbl { .. }))
    {
        assert_eq!(qb_in.len(), 1);
        assert_eq!(qb_out.len(), 1);
        assert_eq!(table, &vec![1, 0]);
    } else {
        panic!("expected an ApplyTbl step");
    }
}

#[test]
fn constant_output_emits_no_apptbl_step() {
    let mut logic = QuantumLogic::default();
    let q = logic.alloc_input_qubit();
    let results = synthesize_call(
        &mut logic,
        &AndWithConstSecondArg,
        &[TblArg::Qubit(q), TblArg::Classical(false)],
    );
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Value::Bit(false)));
    assert!(logic.steps().iter().flatten().all(|s| !matches!(s, Step::ApplyTbl { .. })));
}

#[test]
fn shared_qubit_fan_out_collapses_to_one_input() {
    let mut logic = QuantumLogic::default();
    let q = logic.alloc_input_qubit();
    let results = synthesize_call(&mut logic, &Xor, &[TblArg::Qubit(q), TblArg::Qubit(q)]);
    assert_eq!(results.len(), 1);
    // q xor q is always 0: a constant column, no ApplyTbl needed.
    assert!(matches!(results[0], Value::Bit(false)));
}

#[test]
fn applyop_rejects_non_unitary_matrix() {
    let mut logic = QuantumLogic::default();
    let q0 = logic.alloc_input_qubit();
    let q1 = logic.alloc_input_qubit();
    let one = cplx_rect(1, 0);
    let two = cplx_rect(2, 0);
    let zero = qubla_core::ComplexExpr::ZERO;
    let matrix = vec![
        vec![one.clone(), zero.clone(), zero.clone(), zero.clone()],
        vec![zero.clone(), one.clone(), zero.clone(), zero.clone()],
        vec![zero.clone(), zero.clone(), one.clone(), zero.clone()],
        vec![zero.clone(), zero.clone(), zero.clone(), two],
    ];
    let err = applyop(&mut logic, &[q0, q1], matrix).unwrap_err();
    assert!(matches!(err, CoreError::Unitarity { .. }));
    assert_eq!(err.to_string(), "operator failed unitarity test");
}

#[test]
fn qstate_rejects_non_power_of_two_length() {
    let mut logic = QuantumLogic::default();
    let amplitudes = vec![cplx_rect(1, 0), cplx_rect(0, 0), cplx_rect(0, 0)];
    let err = qstate(&mut logic, amplitudes).unwrap_err();
    assert!(matches!(err, CoreError::ShapeMismatch { .. }));
}

#[test]
fn qbinit_rejects_reinitialisation() {
    let mut logic = QuantumLogic::default();
    let q: QubitId = logic.alloc_qubit(None).unwrap();
    qbinit(&mut logic, &[q], vec![cplx_rect(1, 0), cplx_rect(0, 0)]).unwrap();
    let err = qbinit(&mut logic, &[q], vec![cplx_rect(1, 0), cplx_rect(0, 0)]).unwrap_err();
    assert!(matches!(err, CoreError::Initialisation { .. }));
}
