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

use qubla_core::QubitId;

/// Bookkeeping for one live qubit slot in the pool.
///
/// `steps_referencing` is kept ascending (I1/P2): callers append only
/// through [`crate::QuantumLogic::add_step`] and remove only through
/// [`crate::QuantumLogic::del_step`], both of which preserve the ordering.
#[derive(Debug, Clone)]
pub struct QubitData {
    pub id: QubitId,
    pub steps_referencing: Vec<usize>,
    pub is_input: bool,
    pub is_output: bool,
    pub compressed_index: Option<usize>,
}

impl QubitData {
    #[must_use]
    pub fn new(id: QubitId) -> Self {
        QubitData {
            id,
            steps_referencing: Vec::new(),
            is_input: false,
            is_output: false,
            compressed_index: None,
        }
    }

    pub fn push_step(&mut self, step_idx: usize) {
        debug_assert!(self.steps_referencing.last().map_or(true, |&last| last < step_idx));
        self.steps_referencing.push(step_idx);
    }

    pub fn remove_step(&mut self, step_idx: usize) {
        if let Some(pos) = self.steps_referencing.iter().position(|&s| s == step_idx) {
            self.steps_referencing.remove(pos);
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.steps_referencing.is_empty() && !self.is_output
    }
}
