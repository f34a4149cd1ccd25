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

//! The quantum logic model: qubit pool, step list and hedge tree (§4.1).

pub mod hedge;
pub mod logic;
pub mod qubit;
pub mod step;

pub use hedge::{Hedge, HedgeId};
pub use logic::{EmbeddingConfig, QuantumLogic};
pub use qubit::QubitData;
pub use step::Step;
