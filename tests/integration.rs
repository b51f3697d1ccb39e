use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_apidoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn graph_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// -- html --

#[test]
fn html_page_created() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index.html");

    cmd()
        .args(["-r", "api", "-o", out.to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .success();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>API Reference</title>"));

    // Index order: lowercase group, then uppercase group
    let order = ["#add\"", "#relu\"", "#zeros\"", "#DType\"", "#Tensor\"", "#Tensor.add\""];
    let positions: Vec<usize> = order.iter().map(|a| html.find(a).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);

    // Not exported and unreachable, private, or skipped
    assert!(!html.contains("Internal"));
    assert!(!html.contains("Tensor.bar"));
    assert!(!html.contains("id=\"config\""));
    assert!(!html.contains("id=\"Options\""));
    assert!(!html.contains("id=\"Shape\""));
    assert!(!html.contains("id=\"plus\""));

    // Example block promoted from the docstring
    assert!(html.contains("<pre class=\"example\"><code>add(a, b);\n</code></pre>"));
}

#[test]
fn html_verbose_includes_params() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index.html");

    cmd()
        .args(["-r", "api", "-v", "-o", out.to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .success();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<h3>Parameters</h3>"));
    assert!(html.contains("<p>Dimensions of the result.</p>"));
}

#[test]
fn html_page_shell_options() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index.html");

    cmd()
        .args(["-r", "api", "-o", out.to_str().unwrap()])
        .args(["--title", "Tensor API", "--stylesheet", "/site.css"])
        .args(["--analytics-id", "G-TEST"])
        .arg(fixture_path("tensor.json"))
        .assert()
        .success();

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains("<title>Tensor API</title>"));
    assert!(html.contains("href=\"/site.css\""));
    assert!(html.contains("gtag('config', 'G-TEST');"));
}

#[test]
fn output_directory_created() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("site/docs/index.html");

    cmd()
        .args(["-r", "api", "-o", out.to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .success();

    assert!(out.exists());
}

// -- json --

#[test]
fn json_entries_in_discovery_order() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("entries.json");

    cmd()
        .args(["-r", "api", "-f", "json", "-o", out.to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "add",
            "zeros",
            "Tensor",
            "Tensor.constructor",
            "Tensor.add",
            "Tensor.shape",
            "Tensor.rank",
            "Tensor.dtype",
            "relu",
            "DType"
        ]
    );
    assert_eq!(value[0]["kind"], "method");
    assert_eq!(value[0]["typestr"], "(a: Tensor, b: Tensor) => Tensor");
    assert_eq!(
        value[0]["docstr"],
        "<p>Adds two tensors element-wise.\n\n</p><pre class=\"example\"><code>add(a, b);\n</code></pre>"
    );
    assert_eq!(value[1]["args"][0]["docstr"], "<p>Dimensions of the result.</p>");
    assert_eq!(value[5]["kind"], "property");
    assert!(value[5].get("args").is_none());
}

// -- inputs --

#[test]
fn fragments_from_directory_are_merged() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ops.json"),
        r#"{
            "modules": { "api": ["ones"] },
            "symbols": { "ones": { "declarations": ["ones"] } },
            "declarations": { "ones": { "kind": "function", "signature": { "returns": "Tensor" } } },
            "types": { "Tensor": { "display": "Tensor", "symbol": "Tensor" } }
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("tensor.json"),
        r#"{
            "symbols": { "Tensor": { "declarations": ["Tensor"] } },
            "declarations": { "Tensor": { "kind": "class" } },
            "types": { "Tensor": { "display": "Tensor", "symbol": "Tensor" } }
        }"#,
    )
    .unwrap();
    let out = dir.path().join("out.json");

    cmd()
        .args(["-r", "api", "-f", "json", "-o", out.to_str().unwrap()])
        .arg(dir.path().to_str().unwrap())
        .assert()
        .success();

    let output = std::fs::read_to_string(&out).unwrap();
    assert!(output.contains("\"ones\""));
    assert!(output.contains("\"Tensor\""));
}

// -- fatal conditions --

#[test]
fn requires_output() {
    cmd()
        .args(["-r", "api"])
        .arg(fixture_path("tensor.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unknown_root_module_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index.html");

    cmd()
        .args(["-r", "nope", "-o", out.to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("root module not found: nope"));

    assert!(!out.exists());
}

#[test]
fn unknown_declaration_kind_aborts() {
    let graph = graph_file(
        r#"{
            "modules": { "api": ["ok", "Color"] },
            "symbols": {
                "ok": { "declarations": ["ok"] },
                "Color": { "declarations": ["Color"] }
            },
            "declarations": {
                "ok": { "kind": "function" },
                "Color": { "kind": "enum" }
            }
        }"#,
    );
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("index.html");

    cmd()
        .args(["-r", "api", "-o", out.to_str().unwrap()])
        .arg(graph.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported declaration kind 'enum' for 'Color'"));

    assert!(!out.exists());
}

#[test]
fn unknown_format_rejected() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-r", "api", "-f", "pdf"])
        .args(["-o", dir.path().join("x").to_str().unwrap()])
        .arg(fixture_path("tensor.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: pdf"));
}

#[test]
fn no_matching_inputs() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["-r", "api", "-o", dir.path().join("x").to_str().unwrap()])
        .arg("/nonexistent/graphs/*.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no semantic graph files found"));
}
