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

use crate::reduce::reuse_tbl_inps;
use log::trace;
use qubla_core::QubitId;
use qubla_logic::{HedgeId, QuantumLogic, Step};

/// Fusion bounds (§4.6): the merged step's input (and optionally output)
/// width may not exceed these.
#[derive(Debug, Clone, Copy)]
pub struct JoinConfig {
    pub max_in_qb: usize,
    pub max_out_qb: Option<usize>,
}

impl Default for JoinConfig {
    fn default() -> Self {
        JoinConfig {
            max_in_qb: 8,
            max_out_qb: None,
        }
    }
}

/// Scope over which `join_steps` looks for fusible pairs.
pub enum JoinMode {
    /// Depth-first over the hedge tree; candidates are only fused within
    /// the same leaf hedge.
    Hedged,
    /// A single linear sweep over the whole program, ignoring hedge
    /// boundaries.
    Unhedged,
    /// Fuse exactly this caller-supplied pair.
    Single(usize, usize),
}

/// The `joinTblPair` contract (§4.6.1): fuse two `ApplyTbl` steps into
/// one. Returns `None` if the merged width exceeds `config`'s bounds.
///
/// Qubits of `s2`'s inputs that `s1` produces become internal wires. A
/// shared input read directly by both steps keeps `s1`'s slot but adopts
/// `s2`'s `copy_in` flag for it. The merged output list is `s1`'s
/// surviving outputs (those `s2` neither re-outputs nor consumes without
/// preserving), followed by `s2`'s outputs, and the fused table's bit
/// positions follow that same list order.
#[allow(clippy::too_many_arguments)]
pub fn join_tbl_pair(
    s1_in: &[QubitId],
    s1_out: &[QubitId],
    s1_copy_in: &[bool],
    s1_table: &[u64],
    s2_in: &[QubitId],
    s2_out: &[QubitId],
    s2_copy_in: &[bool],
    s2_table: &[u64],
    config: JoinConfig,
) -> Option<(Vec<QubitId>, Vec<QubitId>, Vec<bool>, Vec<u64>)> {
    enum Source {
        S1Out(usize),
        MergedIn(usize),
    }

    let mut merged_in = s1_in.to_vec();
    let mut merged_copy_in = s1_copy_in.to_vec();
    let mut in_map: Vec<Source> = Vec::with_capacity(s2_in.len());
    for (i, q) in s2_in.iter().enumerate() {
        if let Some(pos) = s1_out.iter().position(|o| o == q) {
            in_map.push(Source::S1Out(pos));
        } else if let Some(pos) = s1_in.iter().position(|o| o == q) {
            merged_copy_in[pos] = s2_copy_in[i];
            in_map.push(Source::MergedIn(pos));
        } else {
            let pos = merged_in.len();
            merged_in.push(*q);
            merged_copy_in.push(s2_copy_in[i]);
            in_map.push(Source::MergedIn(pos));
        }
    }
    if merged_in.len() > config.max_in_qb {
        return None;
    }

    // s1 output qubit survives unless s2 re-outputs it, or consumes it as
    // an input without preserving it (copy_in = false).
    let survivors: Vec<QubitId> = s1_out
        .iter()
        .filter(|q| {
            if s2_out.contains(q) {
                return false;
            }
            match s2_in.iter().position(|x| x == *q) {
                Some(pos) => s2_copy_in[pos],
                None => true,
            }
        })
        .copied()
        .collect();
    let mut merged_out = survivors.clone();
    merged_out.extend_from_slice(s2_out);
    if let Some(max_out) = config.max_out_qb {
        if merged_out.len() > max_out {
            return None;
        }
    }

    let k1 = s1_in.len();
    let nitem = 1usize << merged_in.len();
    let mut table = vec![0u64; nitem];
    for (enum_val, slot) in table.iter_mut().enumerate() {
        let row1 = enum_val & ((1usize << k1) - 1);
        let s1_out_val = s1_table.get(row1).copied().unwrap_or(0);

        let mut row2: u64 = 0;
        for (j, src) in in_map.iter().enumerate() {
            let bit = match *src {
                Source::S1Out(pos) => (s1_out_val >> pos) & 1,
                Source::MergedIn(pos) => ((enum_val >> pos) & 1) as u64,
            };
            row2 |= bit << j;
        }
        let s2_out_val = s2_table.get(row2 as usize).copied().unwrap_or(0);

        let mut combined: u64 = 0;
        for (pos, q) in survivors.iter().enumerate() {
            let src_pos = s1_out.iter().position(|o| o == q).expect("survivor came from s1_out");
            combined |= ((s1_out_val >> src_pos) & 1) << pos;
        }
        combined |= s2_out_val << survivors.len();
        *slot = combined;
    }

    Some((merged_in, merged_out, merged_copy_in, table))
}

/// Per-qubit lookup of the step adjacent to `stepidx` in that qubit's own
/// `steps_referencing` list: the predecessor (`search_next = false`,
/// bounded below by `limst`) or the successor (`search_next = true`,
/// bounded above by `limst`). Mirrors `findClosestSteps`.
fn find_closest_steps(logic: &QuantumLogic, stepidx: usize, limst: usize, search_next: bool) -> Vec<usize> {
    let Some(step) = logic.step(stepidx) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for qid in step.qubits() {
        let Some(qb) = logic.qubit(qid) else { continue };
        let Some(curr_ord) = qb.steps_referencing.iter().position(|&s| s == stepidx) else {
            continue;
        };
        if search_next {
            if curr_ord + 1 < qb.steps_referencing.len() {
                let closest = qb.steps_referencing[curr_ord + 1];
                if closest <= limst {
                    out.push(closest);
                }
            }
        } else if curr_ord > 0 {
            let closest = qb.steps_referencing[curr_ord - 1];
            if closest >= limst {
                out.push(closest);
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

/// Propagate signed hop-distance-from-pivot values across
/// `[stepidx1, stepidx2]`: backward (`upcnt = false`, seeded with `1` at
/// `stepidx2`) or forward (`upcnt = true`, seeded from a prior backward
/// pass via `arr_ord` with position 0 forced to `-1`). A step reachable
/// from the pivot through a chain of shared-qubit references gets an
/// entry; everything else stays `None`. Mirrors `traverseSteps`.
fn traverse_steps(
    logic: &QuantumLogic,
    stepidx1: usize,
    stepidx2: usize,
    upcnt: bool,
    arr_ord: Option<&[Option<i64>]>,
) -> Vec<Option<i64>> {
    let n = stepidx2 - stepidx1;
    let dorder: i64 = if upcnt { 1 } else { -1 };
    let lim_st_idx = if upcnt { stepidx2 } else { stepidx1 };
    let mut ret: Vec<Option<i64>> = if upcnt {
        let seed = arr_ord.expect("forward traversal requires a seed order array");
        let start = seed.len() - n - 1;
        let mut tail = seed[start..].to_vec();
        tail[0] = Some(-1);
        tail
    } else {
        let mut v = vec![None; n + 1];
        v[n] = Some(1);
        v
    };

    for i in 0..n {
        let idx = if upcnt { i } else { n - i };
        let order = if i > 0 { ret[idx] } else { Some(dorder) };
        let Some(order) = order else { continue };
        if upcnt && order <= 0 {
            continue;
        }
        let curr_stidx = stepidx1 + idx;
        for clsstidx in find_closest_steps(logic, curr_stidx, lim_st_idx, upcnt) {
            if !upcnt || clsstidx != lim_st_idx {
                ret[clsstidx - stepidx1] = Some(order + dorder);
            }
        }
    }
    ret
}

/// Physically reorder the step slots in `[stepidx1, stepidx1 + arr_ord.len())`
/// so that steps with a more negative order value sit earlier, bringing
/// the chosen fusion candidate and the pivot as close together as the
/// qubit-dependency graph allows. Updates every touched qubit's
/// `steps_referencing` entries to the new physical positions. Returns the
/// pair's new `(candidate, pivot)` slots. Mirrors `alignSteps`.
fn align_steps(logic: &mut QuantumLogic, stepidx1: usize, arr_ord: &[Option<i64>]) -> (usize, usize) {
    let present: Vec<usize> = (0..arr_ord.len()).filter(|&i| arr_ord[i].is_some()).collect();
    let old_step_idx: Vec<usize> = present.iter().map(|&i| stepidx1 + i).collect();
    let clamped: Vec<i64> = present
        .iter()
        .map(|&i| match arr_ord[i].expect("filtered above") {
            v if v > 1 => 2,
            v if v < -1 => -2,
            v => v,
        })
        .collect();
    let nnn = clamped.len();

    let mut rank: Vec<usize> = (0..nnn).collect();
    rank.sort_by_key(|&i| (clamped[i], i));

    let mut new_step_idx = vec![0usize; nnn];
    for (r, &orig) in rank.iter().enumerate() {
        new_step_idx[orig] = old_step_idx[r];
    }

    // Snapshot every step in the window before any writes: the permutation
    // below reassigns content between slots that are themselves part of
    // the window, so a write-then-read would clobber a slot's content
    // before it has been copied out.
    let snapshot: Vec<Option<Step>> = old_step_idx.iter().map(|&s| logic.step(s).cloned()).collect();
    let mut touched: Vec<QubitId> = Vec::new();
    for st in snapshot.iter().flatten() {
        for q in st.qubits() {
            if !touched.contains(&q) {
                touched.push(q);
            }
        }
    }

    for (i, st) in snapshot.into_iter().enumerate() {
        logic.set_step(new_step_idx[i], st);
    }

    for qid in touched {
        if let Some(qb) = logic.qubit_mut(qid) {
            for s in &mut qb.steps_referencing {
                if let Some(pos) = old_step_idx.iter().position(|&o| o == *s) {
                    *s = new_step_idx[pos];
                }
            }
            debug_assert!(
                qb.steps_referencing.windows(2).all(|w| w[0] < w[1]),
                "alignment broke ascending step order for qubit {qid}"
            );
        }
    }

    (new_step_idx[0], *new_step_idx.last().expect("at least candidate and pivot are present"))
}

/// Commit an already-validated fuse at the (possibly just-realigned) slots
/// `new_s1`/`new_s2`: drop stale references into the old `s1` slot, fold
/// survivors into `new_s2`'s reference set, and write the fused step.
#[allow(clippy::too_many_arguments)]
fn apply_join(
    logic: &mut QuantumLogic,
    new_s1: usize,
    new_s2: usize,
    s2_in: &[QubitId],
    s2_out: &[QubitId],
    merged_in: Vec<QubitId>,
    merged_out: Vec<QubitId>,
    copy_in: Vec<bool>,
    table: Vec<u64>,
) {
    let mut fused_qubits = merged_in.clone();
    for q in &merged_out {
        if !fused_qubits.contains(q) {
            fused_qubits.push(*q);
        }
    }
    let old_s2_qubits: Vec<QubitId> = s2_in
        .iter()
        .chain(s2_out.iter())
        .copied()
        .filter(|q| !fused_qubits.contains(q))
        .collect();

    logic.del_step(new_s1);
    for q in old_s2_qubits {
        logic.pop_step_qb(new_s2, q);
    }
    for q in &fused_qubits {
        logic.splice_steps_referencing(*q, &[new_s2]);
    }
    logic.set_step(
        new_s2,
        Some(Step::ApplyTbl {
            qb_in: merged_in,
            qb_out: merged_out,
            copy_in,
            table,
        }),
    );
    reuse_tbl_inps(logic, new_s2);
}

/// Try to fuse `pivot` with a qubit-dependency predecessor found within
/// `[range_lo, pivot)`. With `forced_candidate` set (`SINGLE` mode), that
/// candidate is used directly instead of scanning for back-distance-2
/// steps. Returns whether a fuse happened.
fn process_pivot(
    logic: &mut QuantumLogic,
    pivot: usize,
    range_lo: usize,
    forced_candidate: Option<usize>,
    config: JoinConfig,
) -> bool {
    if !matches!(logic.step(pivot), Some(Step::ApplyTbl { .. })) {
        return false;
    }
    let closest = find_closest_steps(logic, pivot, range_lo, false);
    if closest.is_empty() {
        return false;
    }
    let stmin = *closest.iter().min().expect("checked non-empty above");
    let dn = traverse_steps(logic, stmin, pivot, false, None);

    let candidates: Vec<usize> = match forced_candidate {
        Some(c) => vec![c],
        None => {
            let mut c: Vec<usize> = (0..dn.len())
                .filter(|&i| dn[i] == Some(-2) && matches!(logic.step(i + stmin), Some(Step::ApplyTbl { .. })))
                .map(|i| i + stmin)
                .collect();
            c.sort_unstable_by(|a, b| b.cmp(a));
            c
        }
    };

    for cand in candidates {
        if cand < stmin || cand >= pivot {
            continue;
        }
        let (Some(Step::ApplyTbl { qb_in: s1_in, qb_out: s1_out, copy_in: s1_copy_in, table: s1_table }), Some(Step::ApplyTbl { qb_in: s2_in, qb_out: s2_out, copy_in: s2_copy_in, table: s2_table })) =
            (logic.step(cand).cloned(), logic.step(pivot).cloned())
        else {
            continue;
        };
        let Some((merged_in, merged_out, copy_in, table)) =
            join_tbl_pair(&s1_in, &s1_out, &s1_copy_in, &s1_table, &s2_in, &s2_out, &s2_copy_in, &s2_table, config)
        else {
            continue;
        };

        let up = traverse_steps(logic, cand, pivot, true, Some(&dn));
        let (new_s1, new_s2) = align_steps(logic, cand, &up);
        apply_join(logic, new_s1, new_s2, &s2_in, &s2_out, merged_in, merged_out, copy_in, table);
        trace!("fused step {cand} into step {pivot} (now at step {new_s2})");
        return true;
    }
    false
}

/// Right-to-left pivot scan over `[lo, hi)`: repeatedly tries to fuse the
/// current pivot with a back-distance-2 predecessor, re-testing the same
/// pivot slot after a successful fuse (its new content may have a fresh
/// predecessor) before moving on.
fn scan_range(logic: &mut QuantumLogic, lo: usize, hi: usize, config: JoinConfig) -> usize {
    if hi <= lo {
        return 0;
    }
    let mut fused_count = 0;
    let mut pivot = hi - 1;
    loop {
        if process_pivot(logic, pivot, lo, None, config) {
            fused_count += 1;
            continue;
        }
        if pivot == lo {
            break;
        }
        pivot -= 1;
    }
    fused_count
}

/// Run the fuser over `mode`, returning the number of fused pairs.
pub fn join_steps(logic: &mut QuantumLogic, mode: &JoinMode, config: JoinConfig) -> usize {
    match mode {
        JoinMode::Single(i1, i2) => usize::from(process_pivot(logic, *i2, *i1, Some(*i1), config)),
        JoinMode::Unhedged => scan_range(logic, 0, logic.steps().len(), config),
        JoinMode::Hedged => {
            let mut leaves = Vec::new();
            collect_leaf_hedges(logic, 0, &mut leaves);
            let mut total = 0;
            for hedge_id in leaves.into_iter().rev() {
                let hedge = &logic.hedges()[hedge_id];
                let (Some(start), Some(end)) = (hedge.start_idx, hedge.end_idx) else {
                    continue;
                };
                total += scan_range(logic, start + 1, end, config);
            }
            total
        }
    }
}

fn collect_leaf_hedges(logic: &QuantumLogic, hedge: HedgeId, out: &mut Vec<HedgeId>) {
    let children = logic.hedges()[hedge].children.clone();
    if children.is_empty() {
        if hedge != 0 {
            out.push(hedge);
        }
    } else {
        for child in children {
            collect_leaf_hedges(logic, child, out);
        }
    }
}
