use qubla_core::{ComplexExpr, Rational, Value};
use qubla_logic::{QuantumLogic, Step};
use qubla_sim::{get_stat, simulate};
use std::f64::consts::FRAC_1_SQRT_2;

fn cplx(re: i64) -> ComplexExpr {
    ComplexExpr::real(Rational::int(re))
}

fn not_step(qb_in: qubla_core::QubitId, qb_out: qubla_core::QubitId) -> Step {
    Step::ApplyTbl {
        qb_in: vec![qb_in],
        qb_out: vec![qb_out],
        copy_in: vec![true],
        table: vec![1, 0],
    }
}

#[test]
fn not_gate_flips_a_zero_initialised_qubit() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    logic.add_step(Step::Init {
        qubits: vec![q_in],
        amplitudes: vec![cplx(1), cplx(0)],
    });
    logic.add_step(not_step(q_in, q_out));
    logic.set_output(&Value::QBit(q_out));

    let state = simulate(&mut logic);
    assert_eq!(state.num_qubits(), 2);
    let out_pos = state.order.iter().position(|&q| q == q_out).unwrap();
    let in_pos = state.order.iter().position(|&q| q == q_in).unwrap();
    // q_in stays 0 (copy_in), q_out becomes 1: basis word has bit out_pos
    // set and bit in_pos clear.
    let expected_word = 1usize << out_pos;
    for (b, amp) in state.amplitudes.iter().enumerate() {
        let matches_expected = b == expected_word;
        if matches_expected {
            assert!((amp.re - 1.0).abs() < 1e-9 && amp.im.abs() < 1e-9);
        } else {
            assert!(amp.norm_sqr() < 1e-9);
        }
    }
    let _ = in_pos;
    assert!((state.norm_sqr() - 1.0).abs() < 1e-6);
}

#[test]
fn bell_pair_via_apply_op_has_unit_norm_and_two_peaks() {
    // Hadamard on a fresh |0> qubit, then a CNOT (as a 2-qubit ApplyOp)
    // onto a second fresh |0> qubit, producing (|00> + |11>)/sqrt(2).
    let mut logic = QuantumLogic::default();
    let q0 = logic.alloc_qubit(None).unwrap();
    let q1 = logic.alloc_qubit(None).unwrap();
    logic.add_step(Step::Init {
        qubits: vec![q0],
        amplitudes: vec![cplx(1), cplx(0)],
    });
    let h = Rational::decimal(7071, 10000);
    let hadamard = vec![
        vec![ComplexExpr::real(h), ComplexExpr::real(h)],
        vec![ComplexExpr::real(h), ComplexExpr::real(-h)],
    ];
    logic.add_step(Step::ApplyOp {
        qubits: vec![q0],
        matrix: hadamard,
    });
    let cnot = vec![
        vec![cplx(1), cplx(0), cplx(0), cplx(0)],
        vec![cplx(0), cplx(1), cplx(0), cplx(0)],
        vec![cplx(0), cplx(0), cplx(0), cplx(1)],
        vec![cplx(0), cplx(0), cplx(1), cplx(0)],
    ];
    logic.add_step(Step::ApplyOp {
        qubits: vec![q0, q1],
        matrix: cnot,
    });
    logic.set_output(&Value::QBit(q0));
    logic.set_output(&Value::QBit(q1));

    let state = simulate(&mut logic);
    assert!((state.norm_sqr() - 1.0).abs() < 1e-6);
    let peaks: Vec<usize> = state
        .amplitudes
        .iter()
        .enumerate()
        .filter(|(_, amp)| amp.norm_sqr() > 1e-6)
        .map(|(b, _)| b)
        .collect();
    assert_eq!(peaks.len(), 2, "a Bell pair has exactly two populated basis words");
    for &b in &peaks {
        let amp = state.amplitudes[b];
        assert!((amp.re.abs() - FRAC_1_SQRT_2).abs() < 1e-3);
    }
}

#[test]
fn get_stat_counts_step_kinds_and_qubit_bounds() {
    let mut logic = QuantumLogic::default();
    let q_in = logic.alloc_qubit(None).unwrap();
    let q_out = logic.alloc_qubit(None).unwrap();
    logic.add_step(Step::Init {
        qubits: vec![q_in],
        amplitudes: vec![cplx(1), cplx(0)],
    });
    logic.add_step(not_step(q_in, q_out));
    logic.set_output(&Value::QBit(q_out));

    let stats = get_stat(&logic);
    assert_eq!(stats.live_qubits, 2);
    assert_eq!(stats.step_kind_counts.get("INIT"), Some(&1));
    assert_eq!(stats.step_kind_counts.get("APPTBL"), Some(&1));
    assert_eq!(stats.max_input_qubits_per_step, 1);
    assert_eq!(stats.max_output_qubits_per_step, 1);
}
