use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};

fn catalog_cmd(db: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog"));
    cmd.arg("--db").arg(db).arg("--prefix").arg("test_");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(db: &Path, args: &[&str]) -> Output {
    catalog_cmd(db)
        .args(args)
        .output()
        .expect("failed to execute catalog")
}

fn migrated_db(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let db = dir.path().join("catalog.db");
    let output = run(&db, &["migrate", "up"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    db
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

const DVD: &str = r#"{"sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700}"#;

#[test]
fn test_migrate_status_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("catalog.db");

    let before = run(&db, &["migrate", "status"]);
    assert!(before.status.success());
    assert!(String::from_utf8_lossy(&before.stdout).contains("Tables exist: no"));

    let db = migrated_db(&dir);
    run(&db, &["create", "--json", DVD]);
    let after = run(&db, &["migrate", "status"]);
    let stdout = String::from_utf8_lossy(&after.stdout);
    assert!(stdout.contains("Tables exist: yes"));
    assert!(stdout.contains("Product count: 1"));
    assert!(stdout.contains("DVD count: 1"));
}

#[test]
fn test_migrate_offers_no_drop() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);
    run(&db, &["create", "--json", DVD]);

    for operation in ["down", "refresh"] {
        let output = run(&db, &["migrate", operation]);
        assert!(!output.status.success(), "migrate {operation} should not exist");
    }
    let status = run(&db, &["migrate", "status"]);
    assert!(String::from_utf8_lossy(&status.stdout).contains("Product count: 1"));
}

#[test]
fn test_create_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);

    let created = run(&db, &["create", "--json", DVD]);
    assert!(created.status.success(), "{}", String::from_utf8_lossy(&created.stderr));
    assert_eq!(stdout_json(&created)["id"], json!(1));

    let listed = run(&db, &["list"]);
    assert!(listed.status.success());
    assert_eq!(
        stdout_json(&listed),
        json!([{"id": 1, "sku": "AB12", "name": "Widget", "price": 9.99, "type": "DVD", "size": 700}])
    );
}

#[test]
fn test_create_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);

    let mut child = catalog_cmd(&db)
        .arg("create")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"sku": "B1", "name": "Novel", "price": 3, "type": "Book", "weight": 1}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["weight"], json!(1));
}

#[test]
fn test_validation_failure_exits_nonzero_with_error_map() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);

    let output = run(&db, &["create", "--json", r#"{"sku": "X", "type": "Book", "weight": 1}"#]);
    assert!(!output.status.success());
    let errors = stdout_json(&output);
    assert_eq!(
        errors["name"],
        json!("Field 'name' of type 'text' is required.")
    );
    assert!(errors.get("price").is_some());
    assert!(String::from_utf8_lossy(&output.stderr).contains("status 400"));
}

#[test]
fn test_invalid_json_is_input_shape_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);

    let output = run(&db, &["create", "--json", "{not json"]);
    assert!(!output.status.success());
    assert_eq!(stdout_json(&output), json!("Input must be a valid JSON object"));
}

#[test]
fn test_update_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);
    run(&db, &["create", "--json", DVD]);

    let updated = run(&db, &["update", "--json", r#"{"id": 1, "name": "Renamed"}"#]);
    assert!(updated.status.success());
    assert_eq!(stdout_json(&updated)["name"], json!("Renamed"));

    let missing = run(&db, &["update", "--json", r#"{"id": 9, "name": "x"}"#]);
    assert!(!missing.status.success());
    assert_eq!(stdout_json(&missing), json!("Product not found"));

    let deleted = run(&db, &["delete", "--json", "[1, 9999]"]);
    assert!(deleted.status.success());
    assert!(deleted.stdout.is_empty());
    assert_eq!(stdout_json(&run(&db, &["list"])), json!([]));
}

#[test]
fn test_seed_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = migrated_db(&dir);
    let source = dir.path().join("products.json");
    fs::write(
        &source,
        r#"[
            {"sku": "D1", "name": "Disc", "price": 5, "type": "DVD", "size": 700},
            {"sku": "F1", "name": "Desk", "price": 80, "type": "Furniture", "height": 70, "width": 120, "length": 60},
            {"sku": "Z1", "name": "Odd", "price": 1, "type": "Vinyl"}
        ]"#,
    )
    .unwrap();

    let output = run(&db, &["migrate", "seed", "--source", source.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Products inserted: 2"));
    assert!(stdout.contains("Products rejected: 1"));

    let listed = stdout_json(&run(&db, &["list"]));
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[test]
fn test_config_file_supplies_database_and_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("catalog.yml");
    let db = dir.path().join("from_config.db");
    fs::write(
        &config,
        format!("database: {}\nprefix: cfg_\n", db.display()),
    )
    .unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog"));
    let output = cmd
        .args(["--config", config.to_str().unwrap(), "migrate", "up"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(db.exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("prefix 'cfg_'"));
}

#[test]
fn test_invalid_prefix_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_catalog"))
        .arg("--db")
        .arg(dir.path().join("x.db"))
        .args(["--prefix", "bad-prefix", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid prefix"));
}
