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

//! State-vector simulation and program statistics (§4.7–4.8).

pub mod simulate;
pub mod stats;

pub use simulate::{simulate, StateVector};
pub use stats::{get_stat, Stats};

use qubla_logic::QuantumLogic;
use std::fmt::Write as _;

/// Human-readable diagnostic dump: `step[i] = <kind>(...)` per live step,
/// then qubit/input/output listings. Not a stable interchange format.
#[must_use]
pub fn dump(logic: &QuantumLogic) -> String {
    let mut out = String::from("QuantumLogic:\nSteps:\n");
    for (i, step) in logic.steps().iter().enumerate() {
        if let Some(step) = step {
            let _ = writeln!(out, "step[{i}] = {step}");
        }
    }
    let _ = writeln!(out, "Number of qubits: {}", logic.max_qubit_index());
    out.push_str("Inputs:\n");
    for qid in logic.inputs() {
        let _ = writeln!(out, "{qid}");
    }
    out.push_str("Outputs:\n");
    for qid in logic.outputs() {
        let _ = writeln!(out, "{qid}");
    }
    out
}
