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

//! Glob-importable surface for embedders: `use qubla::prelude::*;`.

pub use crate::{
    applyop, compile_source, dump, get_stat, input_qbit, input_word, join_steps, join_tbl_pair,
    qbinit, qstate, reduce, simulate, synthesize_call, unitarize, CoreError, CoreResult,
    EmbeddingConfig, JoinConfig, JoinMode, QuantumLogic, QubitId, ReduceStats, ScriptProgram,
    SourcePos, StateVector, Stats, TableFunction, TblArg, Value,
};
