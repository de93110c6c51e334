//! Integration tests for `vitrine products`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn vitrine(store: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_vitrine"));
    cmd.env("RUST_LOG", "warn").env("VITRINE_STORE", store);
    cmd
}

fn add(store: &std::path::Path, args: &[&str]) -> Value {
    let output = vitrine(store)
        .args(["--format", "json", "products", "add"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_add_list_update_delete() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("products.json");

    let caneca = add(&store, &["--name", "Caneca Azul", "--sku", "CAN-AZ", "--ncm", "69120000"]);
    let prato = add(&store, &["--name", "Prato Raso", "--ean", "7891234567895"]);
    assert_eq!(caneca["origin"], "076");

    vitrine(&store)
        .args(["products", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ncm=6912.00.00"))
        .stdout(predicate::str::contains("2 product(s) [Todos]"));

    let caneca_id = caneca["id"].as_str().unwrap();
    vitrine(&store)
        .args(["products", "update", caneca_id, "--ean", "7890000000001"])
        .assert()
        .success();

    let output = vitrine(&store)
        .args(["--format", "json", "products", "list"])
        .output()
        .unwrap();
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["id"], prato["id"], "newest first");
    assert_eq!(listed[1]["ean"], "7890000000001");

    vitrine(&store)
        .args(["products", "delete", prato["id"].as_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("deleted "));

    vitrine(&store)
        .args(["products", "delete", prato["id"].as_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("product not found"));
}

#[test]
fn test_list_filter_and_search() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("products.json");

    add(&store, &["--name", "Caneca Azul", "--sku", "CAN-AZ"]);
    add(&store, &["--name", "Caneca Verde", "--ean", "7891234567895"]);
    add(&store, &["--name", "Prato"]);

    let output = vitrine(&store)
        .args(["--format", "json", "products", "list", "--filter", "no_ean", "--search", "caneca"])
        .output()
        .unwrap();
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Caneca Azul"]);

    vitrine(&store)
        .args(["products", "list", "--filter", "no_price"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown filter"));
}

#[test]
fn test_drive_link_sets_thumbnail() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("products.json");

    let record = add(
        &store,
        &[
            "--name",
            "Caneca",
            "--photos-url",
            "https://drive.google.com/file/d/1AbC_d-9/view",
        ],
    );
    assert_eq!(
        record["thumbnail"],
        "https://drive.google.com/thumbnail?id=1AbC_d-9&sz=w400"
    );
}

#[test]
fn test_add_requires_name() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("products.json");

    vitrine(&store)
        .args(["products", "add", "--sku", "X"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--name is required"));
    assert!(!store.exists());
}

#[test]
fn test_update_unknown_record() {
    let tmp = TempDir::new().unwrap();
    let store = tmp.path().join("products.json");
    add(&store, &["--name", "Caneca"]);

    vitrine(&store)
        .args([
            "products",
            "update",
            "6f1c1b1e-0000-4000-8000-000000000001",
            "--sku",
            "X",
        ])
        .assert()
        .code(1);
}
