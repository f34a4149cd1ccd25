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

use qubla_logic::{QuantumLogic, Step};
use serde::Serialize;
use std::collections::BTreeMap;

/// Program statistics (§4.8), mirroring the original's `getStat`/`__str__`
/// dump.
///
/// `Serialize`-only (not `Deserialize`): this is for machine-readable stats
/// export, not a stable interchange format (spec.md §6).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub live_qubits: usize,
    /// Step count by kind (`"INIT"`, `"APPTBL"`, `"APPOP"`, ...).
    pub step_kind_counts: BTreeMap<&'static str, usize>,
    pub max_qubits_per_step: usize,
    pub max_input_qubits_per_step: usize,
    pub max_output_qubits_per_step: usize,
    pub worst_case_cnot_depth: usize,
    pub best_case_cnot_depth: usize,
}

/// Walk the step list once and compute [`Stats`].
#[must_use]
pub fn get_stat(logic: &QuantumLogic) -> Stats {
    let mut stats = Stats {
        live_qubits: logic.num_live_qubits(),
        ..Stats::default()
    };

    for step in logic.steps().iter().flatten() {
        *stats.step_kind_counts.entry(step.kind()).or_insert(0) += 1;
        let nqb = step.qubits().len();
        stats.max_qubits_per_step = stats.max_qubits_per_step.max(nqb);

        if let Step::ApplyTbl { qb_in, qb_out, copy_in, .. } = step {
            let nin = qb_in.len();
            let nout = qb_out.len();
            let nstqbout = nout + copy_in.iter().filter(|&&c| c).count();
            stats.max_input_qubits_per_step = stats.max_input_qubits_per_step.max(nin);
            stats.max_output_qubits_per_step = stats.max_output_qubits_per_step.max(nstqbout);
            stats.worst_case_cnot_depth += ((1usize << nin).saturating_sub(1)) * nout;
            stats.best_case_cnot_depth += best_case_step_depth(nqb, nin, nstqbout);
        }
    }
    stats
}

/// Per-step lower bound on CNOT depth, from the degrees of freedom of the
/// step's truth table against the `nqb*(nqb-1)` elementary two-qubit gate
/// slots available at each depth level: `ceil(ln(2^df + 1) / ln(nqb*(nqb-1))) - 1`.
fn best_case_step_depth(nqb: usize, nin: usize, nstqbout: usize) -> usize {
    if nqb <= 1 {
        return 0;
    }
    let cnot = (f64::from((nqb * (nqb - 1)) as u32)).ln();
    let df = (1u64 << nin) as f64 * nstqbout as f64;
    // ln(2^df + 1) overflows an f64 once df is large; it is within 2^-20 of
    // df * ln(2) by then, which is exactly where the original switches.
    let ln_num_maps = if df <= 20.0 {
        (2f64.powf(df) + 1.0).ln()
    } else {
        df * std::f64::consts::LN_2
    };
    ((ln_num_maps / cnot).ceil() - 1.0).max(0.0) as usize
}
