use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn create_haystack(dir: &TempDir, name: &str, content: &[u8]) -> Result<String> {
    let path = dir.path().join(name);
    fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

#[test]
fn test_search_reports_matches() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "haystack.bin", b"ABABDABACDABABCABAB")?;

    for algorithm in ["kmp", "simd"] {
        let mut cmd = Command::cargo_bin("bytescout-cli")?;
        cmd.args(["search", "-p", "ABABCABAB", "-f", &file, "-a", algorithm, "-j", "4"]);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Found 1 matches"))
            .stdout(predicate::str::contains("0x0000000a"));
    }
    Ok(())
}

#[test]
fn test_search_stats_only() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "overlap.bin", b"AAAA")?;

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-p", "AA", "-f", &file, "--stats", "--verify"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 3 matches"))
        .stdout(predicate::str::contains("0x").not());
    Ok(())
}

#[test]
fn test_search_json_output() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "haystack.bin", b"xxneedlexxneedle")?;

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-p", "needle", "-f", &file, "--json", "-j", "2"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(json["offsets"], serde_json::json!([2, 10]));
    assert_eq!(json["total_matches"], 2);
    Ok(())
}

#[test]
fn test_search_reads_config_file() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "haystack.bin", b"--marker--marker--")?;
    let config_path = dir.path().join("bytescout.yaml");
    fs::write(
        &config_path,
        format!("pattern: \"marker\"\ninput: \"{}\"\nalgorithm: kmp\n", file),
    )?;

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-c", config_path.to_str().unwrap(), "--stats"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Found 2 matches"));
    Ok(())
}

#[test]
fn test_missing_file_fails() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.bin");

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-p", "x", "-f", missing.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("FileNotFound"));
    Ok(())
}

#[test]
fn test_missing_pattern_fails() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "haystack.bin", b"data")?;

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-f", &file]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("pattern is required"));
    Ok(())
}

#[test]
fn test_unknown_algorithm_rejected() -> Result<()> {
    let dir = tempdir()?;
    let file = create_haystack(&dir, "haystack.bin", b"data")?;

    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args(["search", "-p", "a", "-f", &file, "-a", "regex"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown algorithm"));
    Ok(())
}

#[test]
fn test_bench_verifies_planted_matches() -> Result<()> {
    let mut cmd = Command::cargo_bin("bytescout-cli")?;
    cmd.args([
        "bench", "--size", "1MiB", "--count", "100", "-j", "4", "--seed", "42",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100 planted copies"))
        .stdout(predicate::str::contains("kmp"))
        .stdout(predicate::str::contains("simd"))
        .stdout(predicate::str::contains("100 matches"));
    Ok(())
}
