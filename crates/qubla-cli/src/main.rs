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

mod trace;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use qubla::prelude::*;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qubla",
    version = env!("CARGO_PKG_VERSION"),
    about = "Compile, optimise and simulate reversible quantum-classical programs",
    long_about = None
)]
struct Cli {
    /// Path to a JSON call trace (see `trace.rs` for the op schema).
    program: PathBuf,

    /// Module import search path, colon-separated.
    #[arg(long)]
    import_path: Option<String>,

    /// Preload module list, comma-separated (default: "base").
    #[arg(long)]
    preload: Option<String>,

    /// Run the dead-step reducer after compiling.
    #[arg(long)]
    reduce: bool,

    /// Restore reversibility on colliding table steps after reducing.
    #[arg(long)]
    unitarize: bool,

    /// Fuse adjacent table steps; `none` skips fusion.
    #[arg(long, value_enum, default_value_t = JoinArg::None)]
    join: JoinArg,

    /// Input-width bound for step fusion.
    #[arg(long, default_value_t = 8)]
    max_in_qb: usize,

    /// Optional output-width bound for step fusion.
    #[arg(long)]
    max_out_qb: Option<usize>,

    /// Print the `step[i] = ...` diagnostic dump.
    #[arg(long)]
    dump: bool,

    /// Print program statistics (§4.8).
    #[arg(long)]
    stat: bool,

    /// Simulate the compiled circuit and print the state vector's nonzero
    /// amplitudes.
    #[arg(long)]
    simulate: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum JoinArg {
    None,
    Hedged,
    Unhedged,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.program)
        .map_err(|e| format!("reading {}: {e}", cli.program.display()))?;
    let parsed: trace::Trace = serde_json::from_str(&text)
        .map_err(|e| format!("parsing {}: {e}", cli.program.display()))?;

    let config = EmbeddingConfig {
        import_path: cli
            .import_path
            .map(|s| s.split(':').map(str::to_string).collect())
            .unwrap_or_default(),
        preload: cli
            .preload
            .map(|s| s.split(',').map(str::to_string).collect())
            .unwrap_or_else(|| vec!["base".to_string()]),
    };
    let mut logic = QuantumLogic::new(config);

    debug!("compiling {}", cli.program.display());
    compile_source(&mut logic, &parsed)?;
    info!("compiled {} step(s)", logic.steps().iter().flatten().count());

    if cli.reduce {
        let stats = reduce(&mut logic);
        info!(
            "reduce: {} output column(s) dropped, {} input(s) reused",
            stats.unused_new, stats.reused_old
        );
    }
    if cli.unitarize {
        let fixed = unitarize(&mut logic);
        info!("unitarize: {fixed} step(s) gained a tie-break bit");
    }
    let join_config = JoinConfig {
        max_in_qb: cli.max_in_qb,
        max_out_qb: cli.max_out_qb,
    };
    match cli.join {
        JoinArg::None => {}
        JoinArg::Hedged => {
            let fused = join_steps(&mut logic, &JoinMode::Hedged, join_config);
            info!("join (hedged): {fused} pair(s) fused");
        }
        JoinArg::Unhedged => {
            let fused = join_steps(&mut logic, &JoinMode::Unhedged, join_config);
            info!("join (unhedged): {fused} pair(s) fused");
        }
    }

    if cli.dump {
        print!("{}", dump(&logic));
    }
    if cli.stat {
        print_stat(&get_stat(&logic));
    }
    if cli.simulate {
        print_simulation(&simulate(&mut logic));
    }

    Ok(())
}

fn print_stat(stats: &Stats) {
    println!("live qubits: {}", stats.live_qubits);
    for (kind, count) in &stats.step_kind_counts {
        println!("  {kind}: {count}");
    }
    println!("max qubits/step: {}", stats.max_qubits_per_step);
    println!("max input qubits/step: {}", stats.max_input_qubits_per_step);
    println!("max output qubits/step: {}", stats.max_output_qubits_per_step);
    println!("CNOT depth worst-case: {}", stats.worst_case_cnot_depth);
    println!("CNOT depth best-case: {}", stats.best_case_cnot_depth);
}

fn print_simulation(state: &StateVector) {
    println!("qubits (compressed order): {:?}", state.order);
    for (b, amp) in state.amplitudes.iter().enumerate() {
        if amp.norm_sqr() > 1e-9 {
            println!("|{b:0width$b}> : {amp}", width = state.num_qubits().max(1));
        }
    }
    println!("norm^2: {:.9}", state.norm_sqr());
}
