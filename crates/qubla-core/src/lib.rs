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

//! Numeric kernel and value model shared by every Qubla crate: exact
//! rationals, a lazy complex expression tree, qubit identity, the tagged
//! value model, and the core error taxonomy.

pub mod complex_expr;
pub mod error;
pub mod qubit_id;
pub mod rational;
pub mod value;

pub use complex_expr::ComplexExpr;
pub use error::{CoreError, CoreResult, SourcePos};
pub use qubit_id::QubitId;
pub use rational::Rational;
pub use value::{Dict, ObjType, StructuredWord, TableFunction, Value, Word, WordBit};
