use qubla_core::QubitId;
use qubla_logic::{QuantumLogic, Step};

#[test]
fn alloc_qubit_fills_holes_before_advancing_freeidx() {
    let mut logic = QuantumLogic::default();
    let q0 = logic.alloc_qubit(None).unwrap();
    let q1 = logic.alloc_qubit(None).unwrap();
    assert_eq!(q0, QubitId(0));
    assert_eq!(q1, QubitId(1));

    logic.add_step(Step::Init {
        qubits: vec![q0],
        amplitudes: vec![],
    });
    logic.del_step(0);
    logic.clean_qubits();

    let q2 = logic.alloc_qubit(None).unwrap();
    assert_eq!(q2, QubitId(0), "freed slot 0 should be reused before extending the pool");
}

#[test]
fn del_step_never_shifts_other_step_indices() {
    let mut logic = QuantumLogic::default();
    let q0 = logic.alloc_qubit(None).unwrap();
    let q1 = logic.alloc_qubit(None).unwrap();
    let s0 = logic.add_step(Step::Init {
        qubits: vec![q0],
        amplitudes: vec![],
    });
    let s1 = logic.add_step(Step::Init {
        qubits: vec![q1],
        amplitudes: vec![],
    });
    logic.del_step(s0);

    assert!(logic.step(s0).is_none());
    assert!(logic.step(s1).is_some());
    assert_eq!(logic.steps().len(), 2, "deleting a step must not shrink the step list");
}

#[test]
fn hedge_nesting_discards_empty_hedges() {
    let mut logic = QuantumLogic::default();
    logic.start_hedge();
    logic.end_hedge().unwrap();
    // No steps were added between start/end, so the hedge markers should
    // have been discarded entirely.
    assert!(logic.steps().iter().all(Option::is_none) || logic.steps().is_empty());
}

#[test]
fn end_hedge_without_start_is_an_error() {
    let mut logic = QuantumLogic::default();
    assert!(logic.end_hedge().is_err());
}

#[test]
fn set_output_marks_contained_qubit() {
    let mut logic = QuantumLogic::default();
    let q0 = logic.alloc_qubit(None).unwrap();
    logic.set_output(&qubla_core::Value::QBit(q0));
    assert!(logic.qubit(q0).unwrap().is_output);
    assert_eq!(logic.outputs(), &[q0]);
}
