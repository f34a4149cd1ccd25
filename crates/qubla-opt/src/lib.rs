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

//! Post-processing passes over a compiled program: dead-step reduction,
//! unitarization of colliding table steps, and step-pair fusion (§4.4–4.6).

pub mod join;
pub mod reduce;
pub mod unitarize;

pub use join::{join_steps, join_tbl_pair, JoinConfig, JoinMode};
pub use reduce::{reduce, ReduceStats};
pub use unitarize::unitarize;
