use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn compiles_reduces_and_simulates_a_not_gate() -> Result<(), Box<dyn std::error::Error>> {
    let mut path = std::env::temp_dir();
    path.push(format!("qubla-cli-not-gate-{}.json", std::process::id()));
    std::fs::File::create(&path)?.write_all(
        br#"{
            "ops": [
                {"op": "alloc_qubit"},
                {"op": "alloc_qubit"},
                {"op": "qb_init", "qubits": [0], "amplitudes": [[1.0, 0.0], [0.0, 0.0]]},
                {"op": "apply_tbl", "qb_in": [0], "qb_out": [1], "copy_in": [true], "table": [1, 0]},
                {"op": "set_output", "register": 1}
            ]
        }"#,
    )?;

    let mut cmd = Command::cargo_bin("qubla")?;
    cmd.arg(&path)
        .arg("--reduce")
        .arg("--stat")
        .arg("--simulate")
        .assert()
        .success()
        .stdout(predicate::str::contains("live qubits: 2"))
        .stdout(predicate::str::contains("norm^2: 1."));

    std::fs::remove_file(&path)?;
    Ok(())
}
