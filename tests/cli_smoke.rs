use std::path::PathBuf;

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_framesweep")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "framesweep.exe"
            } else {
                "framesweep"
            });
            p
        })
}

#[test]
fn cli_validate_accepts_the_fixture() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let spec_path = dir.join("sweep.json");
    std::fs::write(&spec_path, include_str!("data/studio_sweep.json")).unwrap();

    let status = std::process::Command::new(bin_path())
        .args(["validate", "--in"])
        .arg(&spec_path)
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn cli_validate_rejects_garbage() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let spec_path = dir.join("garbage.json");
    std::fs::write(&spec_path, "{ nope").unwrap();

    let status = std::process::Command::new(bin_path())
        .args(["validate", "--in"])
        .arg(&spec_path)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn cli_dump_default_emits_the_plan_as_json() {
    let output = std::process::Command::new(bin_path())
        .arg("dump-default")
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: framesweep::TestPlan = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan.len(), framesweep::default_plan().len());
    plan.validate().unwrap();
}

#[test]
fn cli_run_sweeps_the_fixture_to_completion() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let spec_path = dir.join("run_sweep.json");
    std::fs::write(&spec_path, include_str!("data/studio_sweep.json")).unwrap();

    let output = std::process::Command::new(bin_path())
        .args(["run", "--fps", "120", "--in"])
        .arg(&spec_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3 capture point(s)"), "stderr: {stderr}");
}
