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

use log::trace;
use qubla_logic::{QuantumLogic, Step};
use std::collections::BTreeMap;

fn ceil_log2(n: usize) -> usize {
    let mut bits = 0;
    let mut cap = 1usize;
    while cap < n {
        cap *= 2;
        bits += 1;
    }
    bits
}

/// Restore reversibility (I3) on every `APPTBL` step whose output
/// elimination left colliding enumerations, by appending tie-break bits
/// (§4.5). Returns the number of steps that needed tie-break bits.
pub fn unitarize(logic: &mut QuantumLogic) -> usize {
    let mut fixed = 0;
    for idx in 0..logic.steps().len() {
        if matches!(logic.step(idx), Some(Step::ApplyTbl { .. })) && unitarize_step(logic, idx) {
            fixed += 1;
        }
    }
    fixed
}

fn unitarize_step(logic: &mut QuantumLogic, step_idx: usize) -> bool {
    let Some(step_ref) = logic.step(step_idx) else {
        return false;
    };
    let Step::ApplyTbl {
        qb_in,
        qb_out,
        copy_in,
        table,
    } = step_ref.clone()
    else {
        return false;
    };

    let k_in = qb_in.len();
    let nout = qb_out.len();
    let copied_positions: Vec<usize> = (0..k_in).filter(|&i| copy_in[i]).collect();
    let nitem = 1usize << k_in;

    let eff = |i: usize| -> u128 {
        let mut copy_bits: u64 = 0;
        for (j, &pos) in copied_positions.iter().enumerate() {
            copy_bits |= (((i >> pos) & 1) as u64) << j;
        }
        u128::from(table[i]) | (u128::from(copy_bits) << nout)
    };

    let mut groups: BTreeMap<u128, Vec<usize>> = BTreeMap::new();
    for i in 0..nitem {
        groups.entry(eff(i)).or_default().push(i);
    }
    let g_max = groups.values().map(Vec::len).max().unwrap_or(1);
    if g_max <= 1 {
        return false;
    }

    let extra_bits_needed = ceil_log2(g_max);
    let mut qb_out = qb_out;
    let mut copy_in = copy_in;
    let mut table = table;
    let mut bits_available = 0usize;

    for i in 0..k_in {
        if bits_available >= extra_bits_needed {
            break;
        }
        if !qb_out.contains(&qb_in[i]) {
            qb_out.push(qb_in[i]);
            copy_in[i] = false;
            bits_available += 1;
        }
    }
    while bits_available < extra_bits_needed {
        let q = logic
            .alloc_qubit(None)
            .expect("free-index allocation cannot fail");
        if let Some(qb) = logic.qubit_mut(q) {
            qb.push_step(step_idx);
        }
        qb_out.push(q);
        bits_available += 1;
    }

    for members in groups.values() {
        for (rank, &i) in members.iter().enumerate() {
            table[i] |= (rank as u64) << nout;
        }
    }

    trace!("unitarizing step {step_idx}: added {extra_bits_needed} tie-break bit(s)");
    logic.set_step(
        step_idx,
        Some(Step::ApplyTbl {
            qb_in,
            qb_out,
            copy_in,
            table,
        }),
    );
    true
}
