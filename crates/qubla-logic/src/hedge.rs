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

/// Index of a [`Hedge`] inside `QuantumLogic::hedges`. The root hedge is
/// always index 0 and has no parent.
pub type HedgeId = usize;

/// A textually demarcated region of the step list inside which the
/// optimizer may reorder or fuse steps, but across whose boundary it may
/// not (I2).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Hedge {
    pub parent: Option<HedgeId>,
    pub children: Vec<HedgeId>,
    pub start_idx: Option<usize>,
    pub end_idx: Option<usize>,
}

impl Hedge {
    #[must_use]
    pub fn root() -> Self {
        Hedge {
            parent: None,
            children: Vec::new(),
            start_idx: None,
            end_idx: None,
        }
    }

    #[must_use]
    pub fn child(parent: HedgeId) -> Self {
        Hedge {
            parent: Some(parent),
            children: Vec::new(),
            start_idx: None,
            end_idx: None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
