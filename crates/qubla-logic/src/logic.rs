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

use crate::hedge::{Hedge, HedgeId};
use crate::qubit::QubitData;
use crate::step::Step;
use log::{debug, trace};
use qubla_core::{CoreError, CoreResult, QubitId, Value};

/// Embedding configuration: import search path and preload module list,
/// mirroring the CLI/embedding contract (`imppath`, `preload`).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub import_path: Vec<String>,
    pub preload: Vec<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            import_path: Vec::new(),
            preload: vec!["base".to_string()],
        }
    }
}

/// Authoritative store of qubits, steps and hedges: the quantum logic
/// model (§4.1).
///
/// Qubit and step slots are stable: deletion never shifts another slot's
/// index (§5). `qubits` and `steps` are therefore `Vec<Option<_>>`-backed
/// tombstoned pools rather than plain vectors.
#[derive(Debug, Clone)]
pub struct QuantumLogic {
    qubits: Vec<Option<QubitData>>,
    freeidx: usize,
    steps: Vec<Option<Step>>,
    hedges: Vec<Hedge>,
    curr_hedge: HedgeId,
    inputs: Vec<QubitId>,
    outputs: Vec<QubitId>,
    pub config: EmbeddingConfig,
}

impl Default for QuantumLogic {
    fn default() -> Self {
        Self::new(EmbeddingConfig::default())
    }
}

impl QuantumLogic {
    #[must_use]
    pub fn new(config: EmbeddingConfig) -> Self {
        QuantumLogic {
            qubits: Vec::new(),
            freeidx: 0,
            steps: Vec::new(),
            hedges: vec![Hedge::root()],
            curr_hedge: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn num_live_qubits(&self) -> usize {
        self.qubits.iter().filter(|q| q.is_some()).count()
    }

    #[must_use]
    pub fn qubit(&self, id: QubitId) -> Option<&QubitData> {
        self.qubits.get(id.index()).and_then(Option::as_ref)
    }

    pub fn qubit_mut(&mut self, id: QubitId) -> Option<&mut QubitData> {
        self.qubits.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn steps(&self) -> &[Option<Step>] {
        &self.steps
    }

    #[must_use]
    pub fn step(&self, idx: usize) -> Option<&Step> {
        self.steps.get(idx).and_then(Option::as_ref)
    }

    pub fn step_mut(&mut self, idx: usize) -> Option<&mut Step> {
        self.steps.get_mut(idx).and_then(Option::as_mut)
    }

    /// Replace the step slot at `idx` outright (used by the fuser to write
    /// a joined step in place of `s2`).
    pub fn set_step(&mut self, idx: usize, step: Option<Step>) {
        if idx >= self.steps.len() {
            self.steps.resize_with(idx + 1, || None);
        }
        self.steps[idx] = step;
    }

    /// Append `extra` step indices to `qid`'s reference list and restore
    /// ascending order (the joiner and input-reuse rewrite splice in
    /// indices that are not necessarily already sorted relative to the
    /// existing list).
    pub fn splice_steps_referencing(&mut self, qid: QubitId, extra: &[usize]) {
        if let Some(qb) = self.qubit_mut(qid) {
            qb.steps_referencing.extend_from_slice(extra);
            qb.steps_referencing.sort_unstable();
            qb.steps_referencing.dedup();
        }
    }

    #[must_use]
    pub fn inputs(&self) -> &[QubitId] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[QubitId] {
        &self.outputs
    }

    #[must_use]
    pub fn hedges(&self) -> &[Hedge] {
        &self.hedges
    }

    /// Allocate a qubit slot. With `idx = None`, uses and advances the
    /// free-index watermark; with `idx = Some(i)`, claims exactly that
    /// slot (extending the pool with holes as needed) and fails if it is
    /// already occupied.
    pub fn alloc_qubit(&mut self, idx: Option<usize>) -> Option<QubitId> {
        let idx = idx.unwrap_or(self.freeidx);
        let len = self.qubits.len();
        if idx >= len {
            self.qubits.resize_with(idx, || None);
            self.qubits.push(Some(QubitData::new(QubitId(idx))));
            if self.freeidx == idx {
                self.freeidx += 1;
            }
        } else {
            if self.qubits[idx].is_some() {
                return None;
            }
            self.qubits[idx] = Some(QubitData::new(QubitId(idx)));
            if self.freeidx == idx {
                while self.freeidx < self.qubits.len() && self.qubits[self.freeidx].is_some() {
                    self.freeidx += 1;
                }
            }
        }
        trace!("allocated qubit {idx}");
        Some(QubitId(idx))
    }

    pub fn alloc_input_qubit(&mut self) -> QubitId {
        let id = self.alloc_qubit(None).expect("free-index allocation cannot fail");
        self.qubit_mut(id).expect("just allocated").is_input = true;
        self.inputs.push(id);
        id
    }

    /// Append a step: assigns its qubit back-references, allocating any
    /// qubit in `step.qubits()` that is not yet in the pool.
    pub fn add_step(&mut self, step: Step) -> usize {
        let step_idx = self.steps.len();
        for qid in step.qubits() {
            if self.qubit(qid).is_none() {
                let allocated = self.alloc_qubit(Some(qid.index()));
                debug_assert_eq!(allocated, Some(qid));
            }
            self.qubit_mut(qid)
                .expect("allocated above")
                .push_step(step_idx);
        }
        debug!("step[{step_idx}] = {step}");
        self.steps.push(Some(step));
        step_idx
    }

    pub fn pop_step_qb(&mut self, step_idx: usize, qid: QubitId) {
        if let Some(qb) = self.qubit_mut(qid) {
            qb.remove_step(step_idx);
        }
    }

    /// Tombstone a step slot. Never shifts any other step or qubit index.
    pub fn del_step(&mut self, step_idx: usize) {
        let Some(step) = self.steps.get(step_idx).cloned().flatten() else {
            return;
        };
        for qid in step.qubits() {
            self.pop_step_qb(step_idx, qid);
        }
        self.steps[step_idx] = None;
    }

    /// Mark every qubit directly or transitively contained in `value` as
    /// an output.
    pub fn set_output(&mut self, value: &Value) {
        match value {
            Value::QBit(q) => {
                if let Some(qb) = self.qubit_mut(*q) {
                    qb.is_output = true;
                }
                if !self.outputs.contains(q) {
                    self.outputs.push(*q);
                }
            }
            Value::Word(w) => {
                for q in w.bits.iter().filter_map(|b| b.as_qubit()) {
                    self.set_output(&Value::QBit(q));
                }
            }
            Value::StructuredWord(w) => {
                for q in w.bits.iter().filter_map(|b| b.as_qubit()) {
                    self.set_output(&Value::QBit(q));
                }
            }
            Value::List(items) => {
                for item in items.borrow().iter() {
                    self.set_output(item);
                }
            }
            _ => {}
        }
    }

    /// Rewrite `old` to `new` wherever it occurs among the recorded
    /// outputs (used by the optimizer's input-reuse rewrite).
    pub fn reindex_output(&mut self, old: QubitId, new: QubitId) {
        for out in &mut self.outputs {
            if *out == old {
                *out = new;
            }
        }
    }

    pub fn start_hedge(&mut self) -> HedgeId {
        let new_id = self.hedges.len();
        self.hedges.push(Hedge::child(self.curr_hedge));
        self.hedges[self.curr_hedge].children.push(new_id);
        self.hedges[new_id].start_idx = Some(self.steps.len());
        self.curr_hedge = new_id;
        self.add_step(Step::HedgeStart { hedge: new_id });
        new_id
    }

    /// # Errors
    /// Returns `CoreError::Initialisation` if there is no open hedge.
    pub fn end_hedge(&mut self) -> CoreResult<()> {
        if self.hedges[self.curr_hedge].is_root() {
            return Err(CoreError::initialisation(
                "endhedge doesn't have a preceding starthedge call",
            ));
        }
        let hedge_id = self.curr_hedge;
        let end_idx = self.steps.len();
        let start_idx = self.hedges[hedge_id].start_idx.unwrap_or(end_idx);
        if end_idx > start_idx + 1 {
            self.hedges[hedge_id].end_idx = Some(end_idx);
            self.add_step(Step::HedgeEnd { hedge: hedge_id });
        } else {
            self.discard_empty_hedge(hedge_id);
        }
        self.curr_hedge = self.hedges[hedge_id].parent.unwrap_or(0);
        Ok(())
    }

    fn discard_empty_hedge(&mut self, hedge_id: usize) {
        if let Some(start) = self.hedges[hedge_id].start_idx {
            self.steps[start] = None;
        }
        if let Some(end) = self.hedges[hedge_id].end_idx {
            self.steps[end] = None;
        }
        while matches!(self.steps.last(), Some(None)) {
            self.steps.pop();
        }
        if let Some(parent) = self.hedges[hedge_id].parent {
            self.hedges[parent].children.pop();
        }
    }

    /// Remove qubits with an empty reference list that are not outputs;
    /// lowers the free-index watermark to the smallest freed slot.
    pub fn clean_qubits(&mut self) {
        for i in 0..self.qubits.len() {
            let dead = self.qubits[i].as_ref().is_some_and(QubitData::is_dead);
            if dead {
                self.qubits[i] = None;
                if self.freeidx > i {
                    self.freeidx = i;
                }
            }
        }
    }

    /// Assign a dense `compressed_index` to every live qubit in pool
    /// order; returns the assignment for callers (simulator, `get_stat`).
    pub fn compr_qubits(&mut self) -> Vec<QubitId> {
        let mut order = Vec::new();
        for (i, slot) in self.qubits.iter_mut().enumerate() {
            if let Some(qb) = slot {
                qb.compressed_index = Some(order.len());
                order.push(QubitId(i));
            }
        }
        order
    }

    #[must_use]
    pub fn max_qubit_index(&self) -> usize {
        self.qubits.len()
    }
}
