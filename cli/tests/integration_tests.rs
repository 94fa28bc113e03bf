use std::fs;
use std::path::PathBuf;
use std::process::Output;

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "schema_compose_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn write_document(dir: &TempDir, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap())
        .expect("failed to write document");
    path
}

fn run(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_schema-compose"))
        .args(args)
        .output()
        .expect("failed to run schema-compose")
}

fn person_documents(dir: &TempDir) -> Vec<PathBuf> {
    let a = write_document(
        dir,
        "a.json",
        serde_json::json!({
            "name": "a",
            "classes": [{
                "name": "Person",
                "features": [
                    {"kind": "attribute", "name": "name", "type": {"primitive": "Int"}}
                ]
            }]
        }),
    );
    let b = write_document(
        dir,
        "b.json",
        serde_json::json!({
            "name": "b",
            "classes": [{
                "name": "Person",
                "features": [
                    {"kind": "attribute", "name": "name", "type": {"primitive": "String"}},
                    {"kind": "reference", "name": "address", "target": {"class": "Address"}}
                ]
            }]
        }),
    );
    let c = write_document(
        dir,
        "c.json",
        serde_json::json!({"name": "c", "classes": [{"name": "Address"}]}),
    );
    vec![a, b, c]
}

#[test]
fn test_compose_writes_schema_and_provenance() {
    let dir = TempDir::new("compose");
    let docs = person_documents(&dir);
    let output = dir.join("merged.json");

    let result = run(&[
        "compose",
        docs[0].to_str().unwrap(),
        docs[1].to_str().unwrap(),
        docs[2].to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Composed 3 document(s) into 2 class(es)"));
    assert!(stdout.contains("1 widened to String"));

    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(merged["name"], "composed");
    assert_eq!(merged["classes"][0]["name"], "Person");
    assert_eq!(merged["classes"][0]["features"][0]["type"]["primitive"], "String");
    assert_eq!(merged["classes"][0]["features"][1]["target"]["class"], "Address");
    assert_eq!(merged["classes"][1]["name"], "Address");
    assert_eq!(merged["classes"].as_array().unwrap().len(), 2);

    for stem in ["a", "b", "c"] {
        assert!(dir.join(&format!("merged.{stem}.provenance.json")).exists());
    }
}

#[test]
fn test_compose_without_provenance() {
    let dir = TempDir::new("no_prov");
    let doc = write_document(
        &dir,
        "orders.json",
        serde_json::json!({
            "classes": [{
                "name": "Order",
                "features": [
                    {"kind": "reference", "name": "customer", "target": {"class": "Customer"}}
                ]
            }]
        }),
    );
    let output = dir.join("merged.json");

    let result = run(&[
        "compose",
        doc.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--no-provenance",
        "--unknown-class",
        "Missing",
    ]);
    assert!(result.status.success());

    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(merged["classes"][1]["name"], "Missing");
    assert_eq!(merged["classes"][0]["features"][0]["target"]["class"], "Missing");
    assert!(!dir.join("merged.orders.provenance.json").exists());
}

#[test]
fn test_compose_fails_on_broken_document() {
    let dir = TempDir::new("broken");
    let broken = dir.join("broken.json");
    fs::write(&broken, "{ nope").unwrap();
    let output = dir.join("merged.json");

    let result = run(&[
        "compose",
        broken.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("failed to load schema document"));
    assert!(!output.exists());
}

#[test]
fn test_validate_accepts_good_documents() {
    let dir = TempDir::new("validate_ok");
    let docs = person_documents(&dir);

    let result = run(&["validate", docs[0].to_str().unwrap(), docs[1].to_str().unwrap()]);
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("Validated 2 schema document(s)"));
}

#[test]
fn test_validate_rejects_duplicate_classes() {
    let dir = TempDir::new("validate_dup");
    let doc = write_document(
        &dir,
        "dup.json",
        serde_json::json!({"classes": [{"name": "Person"}, {"name": "Person"}]}),
    );

    let result = run(&["validate", doc.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("duplicate class: Person"));
}
