// Copyright 2024 The Qubla Developers
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License.You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the License
// is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express
// or implied. See the License for the specific language governing permissions and limitations under
// the License.

use qubla_core::{ComplexExpr, CoreError, CoreResult, QubitId, Value, Word, WordBit};
use qubla_logic::{QuantumLogic, Step};

const UNITARITY_TOLERANCE: f64 = 1e-4;

/// `input(type)` (§4.2): allocates one fresh input qubit, or `n` of them
/// for an all-quantum word type of fixed width `n`.
pub fn input_qbit(logic: &mut QuantumLogic) -> Value {
    Value::QBit(logic.alloc_input_qubit())
}

pub fn input_word(logic: &mut QuantumLogic, width: usize, signed: bool) -> Value {
    let bits = (0..width)
        .map(|_| WordBit::Quantum(logic.alloc_input_qubit()))
        .collect();
    Value::Word(Word { bits, signed })
}

fn is_power_of_two_len(n: usize) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// `qbinit(qubits, state)` (§4.2): initialise qubits not yet referenced,
/// from a literal bit, an amplitude list (power-of-two length) or a
/// sparse dict of amplitudes (remaining entries zero).
///
/// # Errors
/// `Initialisation` if any qubit already has a reference or is an input;
/// `ShapeMismatch` if the amplitude vector's length is not `2^qubits.len()`.
pub fn qbinit(
    logic: &mut QuantumLogic,
    qubits: &[QubitId],
    amplitudes: Vec<ComplexExpr>,
) -> CoreResult<()> {
    for &q in qubits {
        if let Some(data) = logic.qubit(q) {
            if data.is_input || !data.steps_referencing.is_empty() {
                return Err(CoreError::initialisation(format!(
                    "qubit {q} is already initialised"
                )));
            }
        }
    }
    let expected = 1usize << qubits.len();
    if amplitudes.len() != expected {
        return Err(CoreError::shape_mismatch(format!(
            "initial state needs {expected} amplitudes for {} qubits, got {}",
            qubits.len(),
            amplitudes.len()
        )));
    }
    logic.add_step(Step::Init {
        qubits: qubits.to_vec(),
        amplitudes,
    });
    Ok(())
}

/// `qstate(state)` (§4.2): allocate `k` fresh qubits from the amplitude
/// vector's length and initialise them, returning the qubits as a list.
///
/// # Errors
/// `ShapeMismatch` if `amplitudes.len()` is not a power of two.
pub fn qstate(logic: &mut QuantumLogic, amplitudes: Vec<ComplexExpr>) -> CoreResult<Vec<QubitId>> {
    if !is_power_of_two_len(amplitudes.len()) {
        return Err(CoreError::shape_mismatch(
            "initial state vector must have a length of a power of 2",
        ));
    }
    let k = amplitudes.len().trailing_zeros() as usize;
    let qubits: Vec<QubitId> = (0..k)
        .map(|_| logic.alloc_qubit(None).expect("free-index allocation cannot fail"))
        .collect();
    logic.add_step(Step::Init {
        qubits: qubits.clone(),
        amplitudes,
    });
    Ok(qubits)
}

/// `applyop(qubits, matrix)` (§4.2): admit a generic unitary after passing
/// the tolerance-bounded unitarity test (I4/P4).
///
/// # Errors
/// `ShapeMismatch` if the matrix is not `2^k` square for `qubits.len() == k`;
/// `Unitarity` if any row-pair inner product deviates from `δ_{i,k}` by
/// more than `1e-4` on the squared residual.
pub fn applyop(
    logic: &mut QuantumLogic,
    qubits: &[QubitId],
    matrix: Vec<Vec<ComplexExpr>>,
) -> CoreResult<()> {
    let n = 1usize << qubits.len();
    if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
        return Err(CoreError::shape_mismatch(format!(
            "operator matrix must be {n}x{n} for {} qubits",
            qubits.len()
        )));
    }
    check_unitary(&matrix, n)?;
    logic.add_step(Step::ApplyOp {
        qubits: qubits.to_vec(),
        matrix,
    });
    Ok(())
}

fn check_unitary(matrix: &[Vec<ComplexExpr>], n: usize) -> CoreResult<()> {
    let evaluated: Vec<Vec<num_complex::Complex64>> = matrix
        .iter()
        .map(|row| row.iter().map(ComplexExpr::evaluate).collect())
        .collect();
    for i in 0..n {
        for k in 0..n {
            let mut inner = num_complex::Complex64::new(0.0, 0.0);
            for s in 0..n {
                inner += evaluated[i][s] * evaluated[k][s].conj();
            }
            let delta = if i == k { 1.0 } else { 0.0 };
            let residual = (inner.re - delta).powi(2) + inner.im.powi(2);
            if residual > UNITARITY_TOLERANCE {
                return Err(CoreError::unitarity("operator failed unitarity test"));
            }
        }
    }
    Ok(())
}
