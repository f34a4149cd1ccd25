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

//! Facade crate: compile, optimise and simulate reversible quantum-classical
//! programs through one dependency.
//!
//! A typical pipeline: build a [`QuantumLogic`] from an [`EmbeddingConfig`],
//! drive it with a [`ScriptProgram`], then run [`reduce`]/[`unitarize`]/
//! [`join_steps`] before [`simulate`] or [`get_stat`].

pub mod prelude;

// re-exporting qubla-core
pub use qubla_core::{
    ComplexExpr, CoreError, CoreResult, Dict, ObjType, QubitId, Rational, SourcePos,
    StructuredWord, TableFunction, Value, Word, WordBit,
};

// re-exporting qubla-logic
pub use qubla_logic::{EmbeddingConfig, Hedge, HedgeId, QuantumLogic, QubitData, Step};

// re-exporting qubla-synth
pub use qubla_synth::{applyop, compile_source, input_qbit, input_word, qbinit, qstate, synthesize_call, ScriptProgram, TblArg};

// re-exporting qubla-opt
pub use qubla_opt::{join_steps, join_tbl_pair, reduce, unitarize, JoinConfig, JoinMode, ReduceStats};

// re-exporting qubla-sim
pub use qubla_sim::{dump, get_stat, simulate, StateVector, Stats};
