//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn filehash() -> Command {
    Command::cargo_bin("filehash").unwrap()
}

fn write(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_algos_lists_catalog() {
    filehash()
        .arg("algos")
        .assert()
        .success()
        .stdout(predicate::str::contains("sha256"))
        .stdout(predicate::str::contains("BLAKE2b-512"))
        .stdout(predicate::str::contains("SHA-512/224"));
}

#[test]
fn test_algos_json_output() {
    filehash()
        .arg("algos")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"sha256\""))
        .stdout(predicate::str::contains("\"enabled\": true"));
}

#[test]
fn test_generate_then_check_finds_duplicate() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("digests.db");
    let original = write(dir.path(), "original.txt", b"duplicate payload");
    let copy = write(dir.path(), "copy.txt", b"duplicate payload");
    let unrelated = write(dir.path(), "unrelated.txt", b"different payload");

    filehash()
        .arg("--db")
        .arg(&db)
        .arg("generate")
        .arg("--no-progress")
        .arg(&original)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 1 file(s)"));

    // Same content, different file: reported as a duplicate, exit code 1.
    filehash()
        .arg("--db")
        .arg(&db)
        .arg("check")
        .arg(&copy)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("duplicate"));

    filehash()
        .arg("--db")
        .arg(&db)
        .arg("check")
        .arg(&unrelated)
        .assert()
        .success()
        .stdout(predicate::str::contains("No duplicates found."));
}

#[test]
fn test_generate_directory_recurses() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("digests.db");
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write(&data, "a.txt", b"first");
    std::fs::create_dir(data.join("nested")).unwrap();
    write(&data.join("nested"), "b.txt", b"second");

    filehash()
        .arg("--db")
        .arg(&db)
        .arg("generate")
        .arg("--no-progress")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 file(s)"));
}

#[test]
fn test_generate_missing_path_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    filehash()
        .arg("--db")
        .arg(dir.path().join("digests.db"))
        .arg("generate")
        .arg("/no/such/path")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file or directory"));
}
