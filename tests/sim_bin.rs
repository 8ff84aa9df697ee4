use std::process::Command;

fn run_sim(args: &[&str]) -> serde_json::Value {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(args)
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    serde_json::from_str(stdout.trim()).expect("invalid json")
}

#[test]
fn sim_binary_smoke() {
    let v = run_sim(&["1", "2"]);
    assert!(v["winner"].is_string());
    assert!(v["player1"]["shots"].as_u64().unwrap() > 0);
}

#[test]
fn sim_binary_is_reproducible() {
    let a = run_sim(&["5", "6", "normal", "hard"]);
    let b = run_sim(&["5", "6", "normal", "hard"]);
    assert_eq!(a, b);
    assert_eq!(a["player2"]["difficulty"], "hard");
}

#[test]
fn sim_binary_rejects_bad_difficulty() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args(["1", "2", "easy", "hard"])
        .output()
        .expect("failed to run sim binary");
    assert!(!output.status.success());
}
