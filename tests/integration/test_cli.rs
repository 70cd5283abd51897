//! Exit codes and messages of the binary

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};

use crate::fixtures::{trees, write_file};

fn treecheck() -> Command {
    Command::new(env!("CARGO_BIN_EXE_treecheck"))
}

#[test]
fn findings_still_exit_zero() {
    let (src, dst) = trees(&[("a.txt", 100), ("b.txt", 1)], &[("a.txt", 50)]);
    let output = treecheck().arg(src.path()).arg(dst.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SUMMARY:"));
    assert!(stdout.contains("  Files missing from target directory: 1"));
}

#[test]
fn missing_source_exits_one_without_scanning() {
    let dst = TempDir::new().unwrap();
    let nope = dst.path().join("does-not-exist");
    let output = treecheck().arg(&nope).arg(dst.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("source path"));
    assert!(stderr.contains("does-not-exist"));
    assert!(stderr.contains("does not exist"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("SCANNING"));
}

#[test]
fn file_target_exits_one() {
    let src = TempDir::new().unwrap();
    let file = NamedTempFile::new().unwrap();
    let output = treecheck().arg(src.path()).arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("target path"));
    assert!(stderr.contains("is not a directory"));
}

#[test]
fn usage_errors_exit_one() {
    let output = treecheck().arg("only-one").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_zero() {
    let output = treecheck().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--verbose"));
}

#[cfg(unix)]
#[test]
fn interrupt_exits_one() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    for i in 0..5000 {
        write_file(src.path(), &format!("batch{}/file{i:05}.dat", i % 10), 1);
    }

    // Verbose output into a pipe nobody drains keeps the scan blocked mid-way.
    let mut child = treecheck()
        .arg(src.path())
        .arg(dst.path())
        .arg("-v")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let stdout = child.stdout.take();
    thread::sleep(Duration::from_millis(1000));

    let sent = Command::new("kill")
        .arg("-INT")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(sent.success());

    let status = child.wait().unwrap();
    let mut partial = String::new();
    stdout.unwrap().read_to_string(&mut partial).unwrap();
    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(stderr.contains("Operation cancelled by user."));
    assert!(!partial.contains("SUMMARY:"));
}
