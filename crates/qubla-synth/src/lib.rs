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

//! Synthesis of quantum logic steps from high-level calls: qubit
//! allocation/initialisation, operator admission, and reversible
//! table-function compilation (§4.2, §4.3).

pub mod builtins;
pub mod table_fn;

pub use builtins::{applyop, input_qbit, input_word, qbinit, qstate};
pub use table_fn::{synthesize_call, TblArg};

use qubla_core::{CoreResult, Value};
use qubla_logic::QuantumLogic;

/// The lexer/parser/evaluator collaborator for a compiled program: out of
/// core scope, but this is the seam through which it drives synthesis.
pub trait ScriptProgram {
    /// Run the program against `logic`, returning its top-level results.
    ///
    /// # Errors
    /// Any `CoreError` raised by a built-in call during evaluation.
    fn run(&self, logic: &mut QuantumLogic) -> CoreResult<Vec<Value>>;
}

/// `compile_source(...)` (§6 CLI/embedding contract): hand a parsed
/// program to the logic model and collect its results.
///
/// # Errors
/// Propagates any error raised while running `program`.
pub fn compile_source(logic: &mut QuantumLogic, program: &dyn ScriptProgram) -> CoreResult<Vec<Value>> {
    program.run(logic)
}
