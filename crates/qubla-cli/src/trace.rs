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

//! A JSON call trace played back through [`qubla::ScriptProgram`].
//!
//! The lexer, parser and tree-walking evaluator for the surrounding
//! scripting language are external collaborators (out of core scope); this
//! is the CLI's stand-in front end, the analogue of feeding already-compiled
//! IR to a backend rather than parsing source text itself. Each op names
//! its operands by the index of an earlier op's result in `registers`.

use qubla::{ComplexExpr, CoreError, CoreResult, Rational, ScriptProgram, Value};
use qubla_logic::QuantumLogic;
use serde::Deserialize;

/// `[re, im]` as floating-point literals, converted to an exact decimal
/// [`Rational`] pair at six digits of precision.
pub type ReIm = [f64; 2];

fn to_complex(pair: ReIm) -> ComplexExpr {
    ComplexExpr::rect(to_rational(pair[0]), to_rational(pair[1]))
}

fn to_rational(x: f64) -> Rational {
    Rational::decimal((x * 1_000_000.0).round() as i64, 1_000_000)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Allocate one fresh, uninitialised qubit register.
    AllocQubit,
    /// Allocate one fresh input qubit register.
    InputQubit,
    /// `qbinit`: initialise the named (already-allocated) registers.
    QbInit {
        qubits: Vec<usize>,
        amplitudes: Vec<ReIm>,
    },
    /// `qstate`: allocate and initialise `log2(amplitudes.len())` fresh
    /// registers at once.
    QState { amplitudes: Vec<ReIm> },
    /// `applytbl`: a reversible classical gate over named registers.
    ApplyTbl {
        qb_in: Vec<usize>,
        qb_out: Vec<usize>,
        copy_in: Vec<bool>,
        table: Vec<u64>,
    },
    /// `applyop`: a generic unitary over named registers.
    ApplyOp {
        qubits: Vec<usize>,
        matrix: Vec<Vec<ReIm>>,
    },
    /// Mark a register as a program output.
    SetOutput { register: usize },
}

/// A parsed JSON call trace, ready to replay via [`ScriptProgram::run`].
#[derive(Debug, Deserialize)]
pub struct Trace {
    pub ops: Vec<Op>,
}

impl ScriptProgram for Trace {
    fn run(&self, logic: &mut QuantumLogic) -> CoreResult<Vec<Value>> {
        let mut registers: Vec<Value> = Vec::new();
        let qubit_at = |registers: &[Value], idx: usize| -> CoreResult<qubla::QubitId> {
            match registers.get(idx) {
                Some(Value::QBit(q)) => Ok(*q),
                _ => Err(CoreError::type_mismatch(format!(
                    "register {idx} is not a qubit"
                ))),
            }
        };

        for op in &self.ops {
            match op {
                Op::AllocQubit => {
                    let q = logic.alloc_qubit(None).ok_or_else(|| {
                        CoreError::initialisation("qubit pool allocation failed")
                    })?;
                    registers.push(Value::QBit(q));
                }
                Op::InputQubit => {
                    registers.push(qubla::input_qbit(logic));
                }
                Op::QbInit { qubits, amplitudes } => {
                    let qs: Vec<qubla::QubitId> = qubits
                        .iter()
                        .map(|&i| qubit_at(&registers, i))
                        .collect::<CoreResult<_>>()?;
                    let amps = amplitudes.iter().copied().map(to_complex).collect();
                    qubla::qbinit(logic, &qs, amps)?;
                }
                Op::QState { amplitudes } => {
                    let amps = amplitudes.iter().copied().map(to_complex).collect();
                    let qs = qubla::qstate(logic, amps)?;
                    registers.extend(qs.into_iter().map(Value::QBit));
                }
                Op::ApplyTbl {
                    qb_in,
                    qb_out,
                    copy_in,
                    table,
                } => {
                    let qb_in: Vec<qubla::QubitId> = qb_in
                        .iter()
                        .map(|&i| qubit_at(&registers, i))
                        .collect::<CoreResult<_>>()?;
                    let qb_out: Vec<qubla::QubitId> = qb_out
                        .iter()
                        .map(|&i| qubit_at(&registers, i))
                        .collect::<CoreResult<_>>()?;
                    logic.add_step(qubla::Step::ApplyTbl {
                        qb_in,
                        qb_out,
                        copy_in: copy_in.clone(),
                        table: table.clone(),
                    });
                }
                Op::ApplyOp { qubits, matrix } => {
                    let qs: Vec<qubla::QubitId> = qubits
                        .iter()
                        .map(|&i| qubit_at(&registers, i))
                        .collect::<CoreResult<_>>()?;
                    let rows = matrix
                        .iter()
                        .map(|row| row.iter().copied().map(to_complex).collect())
                        .collect();
                    qubla::applyop(logic, &qs, rows)?;
                }
                Op::SetOutput { register } => {
                    let value = registers
                        .get(*register)
                        .cloned()
                        .ok_or_else(|| CoreError::IndexOutOfRange {
                            pos: None,
                            index: *register as i64,
                        })?;
                    logic.set_output(&value);
                }
            }
        }
        Ok(registers)
    }
}
