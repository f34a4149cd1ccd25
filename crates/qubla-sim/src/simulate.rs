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

use log::trace;
use num_complex::Complex64;
use qubla_core::QubitId;
use qubla_logic::{QuantumLogic, Step};
use std::collections::HashSet;

/// A dense amplitude vector over the compressed (live) qubit ordering.
#[derive(Debug, Clone)]
pub struct StateVector {
    pub amplitudes: Vec<Complex64>,
    /// `order[i]` is the qubit occupying compressed bit position `i`.
    pub order: Vec<QubitId>,
}

impl StateVector {
    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(num_complex::Complex::norm_sqr).sum()
    }
}

/// Initial product/entangled factor: a subset of qubits and their joint
/// amplitude vector, in the bit order given by `qubits`.
struct Factor {
    qubits: Vec<QubitId>,
    amplitudes: Vec<Complex64>,
}

/// Run the compiled program to a dense state vector (§4.7).
#[must_use]
pub fn simulate(logic: &mut QuantumLogic) -> StateVector {
    let order = logic.compr_qubits();
    let n = order.len();
    let size = 1usize << n;

    let pos_of: std::collections::HashMap<QubitId, usize> = order
        .iter()
        .enumerate()
        .map(|(i, &q)| (q, i))
        .collect();

    let factors = collect_init_factors(logic, &order);
    let mut state = vec![Complex64::new(0.0, 0.0); size];
    fold_factors(&mut state, &factors, &pos_of, size);

    for step_idx in 0..logic.steps().len() {
        let Some(step) = logic.step(step_idx) else {
            continue;
        };
        match step {
            Step::ApplyTbl { .. } => {
                apply_tbl(&mut state, step, &pos_of, n);
                trace!("simulated step[{step_idx}] (APPTBL)");
            }
            Step::ApplyOp { qubits, matrix } => {
                apply_op(&mut state, qubits, matrix, &pos_of, n);
                trace!("simulated step[{step_idx}] (APPOP)");
            }
            Step::Init { .. } | Step::HedgeStart { .. } | Step::HedgeEnd { .. } => {}
        }
    }

    StateVector {
        amplitudes: state,
        order,
    }
}

/// Locate each live qubit's first-referencing step and group qubits that
/// share an `Init` factor; qubits first touched by an `ApplyTbl` (whether
/// as a freshly-allocated output or an external input never wrapped in an
/// `Init`) are deemed individually initialised to |0⟩.
fn collect_init_factors(logic: &QuantumLogic, order: &[QubitId]) -> Vec<Factor> {
    let mut visited: HashSet<QubitId> = HashSet::new();
    let mut factors = Vec::new();
    for &qid in order {
        if visited.contains(&qid) {
            continue;
        }
        let first_step = logic.qubit(qid).and_then(|qb| qb.steps_referencing.first().copied());
        let init_step = first_step.and_then(|idx| match logic.step(idx) {
            Some(Step::Init { qubits, amplitudes }) => Some((qubits.clone(), amplitudes.clone())),
            _ => None,
        });
        if let Some((qubits, amplitudes)) = init_step {
            let values: Vec<Complex64> = amplitudes.iter().map(qubla_core::ComplexExpr::evaluate).collect();
            for &q in &qubits {
                visited.insert(q);
            }
            factors.push(Factor {
                qubits,
                amplitudes: values,
            });
        } else {
            visited.insert(qid);
            factors.push(Factor {
                qubits: vec![qid],
                amplitudes: vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            });
        }
    }
    factors
}

fn fold_factors(
    state: &mut [Complex64],
    factors: &[Factor],
    pos_of: &std::collections::HashMap<QubitId, usize>,
    size: usize,
) {
    for b in 0..size {
        let mut amp = Complex64::new(1.0, 0.0);
        for factor in factors {
            let mut sub_idx = 0usize;
            for (k, &q) in factor.qubits.iter().enumerate() {
                let pos = pos_of[&q];
                let bit = (b >> pos) & 1;
                sub_idx |= bit << k;
            }
            amp *= factor.amplitudes[sub_idx];
        }
        state[b] = amp;
    }
}

fn apply_tbl(
    state: &mut [Complex64],
    step: &Step,
    pos_of: &std::collections::HashMap<QubitId, usize>,
    n: usize,
) {
    let Step::ApplyTbl { qb_in, qb_out, table, .. } = step else {
        return;
    };
    let arrqb = step.qubits();
    let positions: Vec<usize> = arrqb.iter().map(|q| pos_of[q]).collect();
    let k_total = arrqb.len();
    let k_in = qb_in.len();
    let size = 1usize << n;

    let mut inv: Vec<Option<usize>> = vec![None; 1 << k_total];
    for i in 0..(1usize << k_in) {
        let out_val = table.get(i).copied().unwrap_or(0) as usize;
        let mut o = 0usize;
        for (local_pos, q) in arrqb.iter().enumerate() {
            let bit = if let Some(out_idx) = qb_out.iter().position(|oq| oq == q) {
                (out_val >> out_idx) & 1
            } else {
                let in_idx = qb_in.iter().position(|iq| iq == q).expect("qubit in arrqb came from qb_in or qb_out");
                (i >> in_idx) & 1
            };
            o |= bit << local_pos;
        }
        inv[o] = Some(i);
    }

    let mut new_state = vec![Complex64::new(0.0, 0.0); size];
    for b in 0..size {
        let mut o = 0usize;
        for (local_pos, &pos) in positions.iter().enumerate() {
            o |= ((b >> pos) & 1) << local_pos;
        }
        let Some(i) = inv[o] else { continue };
        let mut b_src = b;
        for (local_pos, &pos) in positions.iter().enumerate() {
            let bit = if local_pos < k_in { (i >> local_pos) & 1 } else { 0 };
            b_src = (b_src & !(1 << pos)) | (bit << pos);
        }
        new_state[b] = state[b_src];
    }
    state.copy_from_slice(&new_state);
}

fn apply_op(
    state: &mut [Complex64],
    qubits: &[QubitId],
    matrix: &[Vec<qubla_core::ComplexExpr>],
    pos_of: &std::collections::HashMap<QubitId, usize>,
    n: usize,
) {
    let positions: Vec<usize> = qubits.iter().map(|q| pos_of[q]).collect();
    let k = positions.len();
    let dim = 1usize << k;
    let size = 1usize << n;
    let values: Vec<Vec<Complex64>> = matrix
        .iter()
        .map(|row| row.iter().map(qubla_core::ComplexExpr::evaluate).collect())
        .collect();

    let mut other_mask = (1usize << n) - 1;
    for &pos in &positions {
        other_mask &= !(1 << pos);
    }

    for base in 0..size {
        if base & !other_mask != 0 {
            continue;
        }
        let mut indices = vec![0usize; dim];
        for (sub, idx) in indices.iter_mut().enumerate() {
            let mut b = base;
            for (local_pos, &pos) in positions.iter().enumerate() {
                b |= ((sub >> local_pos) & 1) << pos;
            }
            *idx = b;
        }
        let sub_vec: Vec<Complex64> = indices.iter().map(|&idx| state[idx]).collect();
        for (row, &idx) in indices.iter().enumerate() {
            let mut acc = Complex64::new(0.0, 0.0);
            for (col, &amp) in sub_vec.iter().enumerate() {
                acc += values[row][col] * amp;
            }
            state[idx] = acc;
        }
    }
}
