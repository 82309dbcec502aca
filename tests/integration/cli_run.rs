//! End-to-end tests for the dirhash binary

use super::test_utils::sample_tree;
use dirhash::tree::builder::TreeBuilder;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn dirhash() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dirhash"))
}

#[test]
fn test_writes_results_in_working_directory() {
    let (temp_dir, root) = sample_tree();
    let work = TempDir::new().unwrap();

    let output = dirhash()
        .arg(&root)
        .current_dir(work.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("input path: "));
    assert!(stdout.trim_end().ends_with(&*root.to_string_lossy()));
    // Logging is off by default
    assert!(output.stderr.is_empty());

    let tree = TreeBuilder::new(root).build().unwrap();
    let text = fs::read_to_string(work.path().join("results")).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert_eq!(text.lines().next().unwrap(), format!("R {}", tree.root_digest));
    drop(temp_dir);
}

#[test]
fn test_output_flag_and_sequential_agree() {
    let (temp_dir, root) = sample_tree();
    let parallel_out = temp_dir.path().join("parallel");
    let sequential_out = temp_dir.path().join("sequential");

    let status = dirhash()
        .arg(&root)
        .arg("--output")
        .arg(&parallel_out)
        .status()
        .unwrap();
    assert!(status.success());
    let status = dirhash()
        .arg(&root)
        .arg("--sequential")
        .arg("--output")
        .arg(&sequential_out)
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(
        fs::read_to_string(parallel_out).unwrap(),
        fs::read_to_string(sequential_out).unwrap()
    );
}

#[test]
fn test_missing_argument_fails() {
    let output = dirhash().output().unwrap();
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_missing_root_fails_without_results() {
    let work = TempDir::new().unwrap();
    let output = dirhash()
        .arg(work.path().join("absent"))
        .current_dir(work.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("absent"));
    assert!(!work.path().join("results").exists());
}

#[test]
fn test_config_file_sets_output() {
    let (temp_dir, root) = sample_tree();
    let config_path = temp_dir.path().join("dirhash.toml");
    let out = temp_dir.path().join("from-config");
    fs::write(
        &config_path,
        format!("[output]\npath = {:?}\n", out.to_str().unwrap()),
    )
    .unwrap();

    let status = dirhash()
        .arg(&root)
        .arg("--config")
        .arg(&config_path)
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read_to_string(out).unwrap().lines().count(), 4);
}
