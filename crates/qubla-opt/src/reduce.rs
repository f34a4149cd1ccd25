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
use qubla_core::QubitId;
use qubla_logic::{QuantumLogic, Step};

/// Counters returned by [`reduce`], mirroring the original's `cntunusednew`
/// / `cntreusedold` diagnostic fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReduceStats {
    pub unused_new: usize,
    pub reused_old: usize,
}

/// Remove output bit `col` from an `ApplyTbl` step. Returns `true` if the
/// qubit was also dropped from the step entirely (it was not also an
/// input), mirroring `StepApplyTbl.delOutQB`.
fn del_out_qb(step: &mut Step, qid: QubitId) -> bool {
    let Step::ApplyTbl { qb_in, qb_out, table, .. } = step else {
        return false;
    };
    let idx = qb_out.iter().position(|&q| q == qid).expect("qid must be an output of this step");
    let mask_lo: u64 = (1u64 << idx) - 1;
    let mask_hi: u64 = !mask_lo << 1;
    for val in table.iter_mut() {
        *val = (*val & mask_lo) | ((*val & mask_hi) >> 1);
    }
    qb_out.remove(idx);
    !qb_in.contains(&qid)
}

/// For every non-preserved, non-output input of `step`, try to rename a
/// freshly-allocated output qubit to that input, eliminating the separate
/// wire downstream (the `reuseTblInps` optimisation).
pub(crate) fn reuse_tbl_inps(logic: &mut QuantumLogic, step_idx: usize) -> usize {
    let mut reused = 0;
    let Some(Step::ApplyTbl { qb_in, qb_out, copy_in, .. }) = logic.step(step_idx).cloned() else {
        return 0;
    };
    let mut qb_out = qb_out;
    for in_idx in 0..qb_in.len() {
        let q1 = qb_in[in_idx];
        if qb_out.contains(&q1) || copy_in[in_idx] {
            continue;
        }
        let Some(out_pos) = qb_out.iter().position(|q2| !qb_in.contains(q2)) else {
            continue;
        };
        let q2 = qb_out[out_pos];

        let is_output2 = logic.qubit(q2).is_some_and(|qb| qb.is_output);
        if let Some(qb1) = logic.qubit_mut(q1) {
            qb1.is_output = is_output2;
        }
        if let Some(qb2) = logic.qubit_mut(q2) {
            qb2.is_output = false;
        }
        let rest: Vec<usize> = logic
            .qubit(q2)
            .map(|qb| qb.steps_referencing.iter().skip(1).copied().collect())
            .unwrap_or_default();
        for &next_idx in &rest {
            if let Some(step) = logic.step_mut(next_idx) {
                step.reindex(q2, q1);
            }
        }
        logic.reindex_output(q2, q1);
        logic.splice_steps_referencing(q1, &rest);
        if let Some(qb2) = logic.qubit_mut(q2) {
            qb2.steps_referencing.clear();
        }
        qb_out[out_pos] = q1;
        reused += 1;
        break;
    }
    if let Some(Step::ApplyTbl { qb_out: stored, .. }) = logic.step_mut(step_idx) {
        *stored = qb_out;
    }
    reused
}

/// Single reverse pass pruning dead `APPTBL` output columns, dead
/// `INIT`/`APPOP` steps and reusing freshly-allocated output qubits in
/// place of disposable inputs (§4.4).
pub fn reduce(logic: &mut QuantumLogic) -> ReduceStats {
    let mut stats = ReduceStats::default();
    let mut step_idx = logic.steps().len();
    while step_idx > 0 {
        step_idx -= 1;
        if logic.step(step_idx).is_none() {
            continue;
        }
        let mut to_del = false;
        let is_apptbl = matches!(logic.step(step_idx), Some(Step::ApplyTbl { .. }));
        if is_apptbl {
            let qubits: Vec<QubitId> = logic.step(step_idx).expect("checked above").qubits();
            for qid in qubits {
                let qb_out_contains = matches!(
                    logic.step(step_idx),
                    Some(Step::ApplyTbl { qb_out, .. }) if qb_out.contains(&qid)
                );
                let is_last_ref_here = logic
                    .qubit(qid)
                    .is_some_and(|qb| qb.steps_referencing.last() == Some(&step_idx) && !qb.is_output);
                if !is_last_ref_here {
                    continue;
                }
                if qb_out_contains {
                    let dropped = if let Some(step) = logic.step_mut(step_idx) {
                        del_out_qb(step, qid)
                    } else {
                        false
                    };
                    if dropped {
                        stats.unused_new += 1;
                        logic.pop_step_qb(step_idx, qid);
                        trace!("popping qubit {qid} from step {step_idx}");
                    }
                } else if let Some(Step::ApplyTbl { qb_in, copy_in, .. }) = logic.step_mut(step_idx) {
                    if let Some(pos) = qb_in.iter().position(|&q| q == qid) {
                        copy_in[pos] = false;
                    }
                }
            }
            stats.reused_old += reuse_tbl_inps(logic, step_idx);
            if let Some(Step::ApplyTbl { qb_out, .. }) = logic.step(step_idx) {
                if qb_out.is_empty() {
                    to_del = true;
                }
            }
        }

        if !to_del {
            to_del = true;
            if let Some(step) = logic.step(step_idx) {
                for qid in step.qubits() {
                    let keeps_alive = logic
                        .qubit(qid)
                        .is_some_and(|qb| qb.is_output || qb.steps_referencing.last() != Some(&step_idx));
                    if keeps_alive {
                        to_del = false;
                        break;
                    }
                }
            }
        }
        if to_del {
            trace!("deleting step {step_idx}");
            logic.del_step(step_idx);
        }
    }
    logic.clean_qubits();
    stats
}
