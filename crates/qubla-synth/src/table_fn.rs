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

use qubla_core::{QubitId, TableFunction, Value};
use qubla_logic::{QuantumLogic, Step};

/// One call-site argument: either a compile-time classical bit or a wire
/// into the qubit pool.
#[derive(Debug, Clone, Copy)]
pub enum TblArg {
    Classical(bool),
    Qubit(QubitId),
}

/// Synthesize a call to a user-defined table function (§4.3).
///
/// Classical arguments fold into the compile-time value `cval`; qubit
/// arguments are deduplicated (duplicated positions referencing the same
/// qubit collapse to one enumeration bit — end-to-end scenario 3). The
/// per-position results are returned in call order, as qubits for
/// positions whose output column survived elimination and as classical
/// bits for positions eliminated as constants.
pub fn synthesize_call(logic: &mut QuantumLogic, func: &dyn TableFunction, args: &[TblArg]) -> Vec<Value> {
    let nargs = args.len();
    let mut cval: u64 = 0;
    let mut qbit_positions: Vec<(QubitId, Vec<usize>)> = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        match arg {
            TblArg::Classical(bit) => {
                if *bit {
                    cval |= 1 << i;
                }
            }
            TblArg::Qubit(q) => {
                if let Some(entry) = qbit_positions.iter_mut().find(|(existing, _)| existing == q) {
                    entry.1.push(i);
                } else {
                    qbit_positions.push((*q, vec![i]));
                }
            }
        }
    }

    let k_in = qbit_positions.len();
    let m = func.out_bits();

    if k_in == 0 {
        let out = func.eval(cval);
        return (0..m).map(|i| Value::Bit((out >> i) & 1 == 1)).collect();
    }

    let arrqbin: Vec<QubitId> = qbit_positions.iter().map(|(q, _)| *q).collect();
    // `nitem` can reach 256 (max_in_qb default 8), so the per-enumeration
    // bit-columns below are plain bit vectors rather than machine words.
    let nitem = 1usize << k_in;

    let mut out_vals = vec![0u64; nitem];
    let mut in_vecs = vec![vec![false; nitem]; k_in];
    let mut out_vecs = vec![vec![false; nitem]; m];
    for i in 0..nitem {
        let mut key = cval;
        for (k, (_, positions)) in qbit_positions.iter().enumerate() {
            let bitval = (i >> k) & 1;
            if bitval == 1 {
                in_vecs[k][i] = true;
            }
            for &pos in positions {
                key |= (bitval as u64) << pos;
            }
        }
        let out = func.eval(key);
        out_vals[i] = out;
        for (c, out_vec) in out_vecs.iter_mut().enumerate() {
            out_vec[i] = (out >> c) & 1 == 1;
        }
    }

    let mut result = vec![None; m];
    let mut retained_vecs: Vec<Vec<bool>> = Vec::new();
    let mut arrqbout: Vec<QubitId> = Vec::new();

    for c in 0..m {
        let out_vec = &out_vecs[c];
        let is_const = out_vec.iter().all(|&b| !b) || out_vec.iter().all(|&b| b);
        let matches_input = in_vecs.iter().position(|v| v == out_vec);
        let matches_earlier = retained_vecs.iter().position(|v| v == out_vec);

        if is_const {
            compact_column(&mut out_vals, retained_vecs.len());
            result[c] = Some(Value::Bit(out_vec.iter().any(|&b| b)));
        } else if let Some(inp_idx) = matches_input {
            compact_column(&mut out_vals, retained_vecs.len());
            result[c] = Some(Value::QBit(arrqbin[inp_idx]));
        } else if let Some(earlier_col) = matches_earlier {
            compact_column(&mut out_vals, retained_vecs.len());
            result[c] = result[earlier_col].clone();
        } else {
            let owned = out_vec.clone();
            let qb = logic.alloc_qubit(None).expect("free-index allocation cannot fail");
            arrqbout.push(qb);
            retained_vecs.push(owned);
            result[c] = Some(Value::QBit(qb));
        }
    }

    if !arrqbout.is_empty() {
        let copy_in = vec![true; k_in];
        logic.add_step(Step::ApplyTbl {
            qb_in: arrqbin,
            qb_out: arrqbout,
            copy_in,
            table: out_vals,
        });
    }

    result.into_iter().map(|r| r.expect("every result position is assigned")).collect()
}

/// Remove bit position `col` from every entry of `table`, shifting the
/// higher bits down by one (the output-elimination compaction step).
fn compact_column(table: &mut [u64], col: usize) {
    let mask_lo: u64 = (1u64 << col) - 1;
    let mask_hi: u64 = !mask_lo << 1;
    for val in table.iter_mut() {
        *val = (*val & mask_lo) | ((*val & mask_hi) >> 1);
    }
}
