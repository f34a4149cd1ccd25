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

use crate::hedge::HedgeId;
use qubla_core::{ComplexExpr, QubitId};

/// One instruction in a compiled program (§3).
///
/// `qubits()` returns the full set of qubits this step touches, which is
/// what `QuantumLogic::add_step`/`del_step` use to keep each qubit's
/// `steps_referencing` list in sync (I1).
#[derive(Debug, Clone)]
pub enum Step {
    /// Initialise the listed qubits in a product or entangled pure state.
    /// `amplitudes` has length `2^qubits.len()`.
    Init {
        qubits: Vec<QubitId>,
        amplitudes: Vec<ComplexExpr>,
    },
    /// A reversible classical gate over `qb_in ∪ qb_out`.
    ApplyTbl {
        qb_in: Vec<QubitId>,
        qb_out: Vec<QubitId>,
        copy_in: Vec<bool>,
        /// `table[j]` is the `qb_out.len()`-bit output word for the input
        /// enumeration `j` of `qb_in`, length `2^qb_in.len()`.
        table: Vec<u64>,
    },
    /// A generic `2^k x 2^k` unitary over `qubits`, row-major.
    ApplyOp {
        qubits: Vec<QubitId>,
        matrix: Vec<Vec<ComplexExpr>>,
    },
    HedgeStart { hedge: HedgeId },
    HedgeEnd { hedge: HedgeId },
}

impl Step {
    /// The distinct qubits this step references, in the order used to
    /// build `steps_referencing` links.
    #[must_use]
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Step::Init { qubits, .. } | Step::ApplyOp { qubits, .. } => qubits.clone(),
            Step::ApplyTbl { qb_in, qb_out, .. } => {
                let mut all = qb_in.clone();
                for q in qb_out {
                    if !all.contains(q) {
                        all.push(*q);
                    }
                }
                all
            }
            Step::HedgeStart { .. } | Step::HedgeEnd { .. } => Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Init { .. } => "INIT",
            Step::ApplyTbl { .. } => "APPTBL",
            Step::ApplyOp { .. } => "APPOP",
            Step::HedgeStart { .. } => "HDGSTART",
            Step::HedgeEnd { .. } => "HDGEND",
        }
    }

    /// Rewrite every occurrence of `old` to `new` in this step's qubit
    /// lists (used by `reuse`/reindexing passes).
    pub fn reindex(&mut self, old: QubitId, new: QubitId) {
        match self {
            Step::Init { qubits, .. } | Step::ApplyOp { qubits, .. } => {
                for q in qubits.iter_mut() {
                    if *q == old {
                        *q = new;
                    }
                }
            }
            Step::ApplyTbl { qb_in, qb_out, .. } => {
                for q in qb_in.iter_mut().chain(qb_out.iter_mut()) {
                    if *q == old {
                        *q = new;
                    }
                }
            }
            Step::HedgeStart { .. } | Step::HedgeEnd { .. } => {}
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Init { qubits, .. } => write!(f, "qbinit({qubits:?})"),
            Step::ApplyTbl {
                qb_in,
                qb_out,
                copy_in,
                ..
            } => write!(
                f,
                "applytbl(qbin={qb_in:?}, qbout={qb_out:?}, copyin={copy_in:?})"
            ),
            Step::ApplyOp { qubits, .. } => write!(f, "applyop({qubits:?})"),
            Step::HedgeStart { .. } => write!(f, "starthedge()"),
            Step::HedgeEnd { .. } => write!(f, "endhedge()"),
        }
    }
}
