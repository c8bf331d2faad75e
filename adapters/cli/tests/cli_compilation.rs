use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "community-maze"])
        .status()
        .expect("failed to invoke cargo check for community-maze CLI binary");

    assert!(
        status.success(),
        "cargo check --bin community-maze should succeed"
    );
}

#[test]
fn cli_runs_a_short_seeded_round() {
    let output = Command::new(env!("CARGO_BIN_EXE_community-maze"))
        .args(["--seed", "5", "--frames", "30", "--render-every", "0"])
        .output()
        .expect("failed to run community-maze");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Welcome to Community Maze."));
    assert!(stdout.contains("frame 30 | normal"));
    assert!(stdout.contains("collected"));
}
