use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const CROSSREF: &str = r#"<div id="swrlrules"><h2>Rules</h2>
<div class="entity"><h3 id="r1">Has Part</h3>
<p>Part(?p) ^ whole(?p, ?w) -> hasPart(?w, ?p)</p>
</div>
</div>"#;

const INDEX: &str = r#"<html><head><script>$(function(){ loadTOC(); });</script></head><body></body></html>"#;

fn write_tree(root: &Path) {
    fs::create_dir_all(root.join("sections")).unwrap();
    fs::create_dir_all(root.join("swrlrules")).unwrap();
    fs::write(root.join("sections/crossref-en.html"), CROSSREF).unwrap();
    fs::write(root.join("index-en.html"), INDEX).unwrap();
    fs::write(
        root.join("swrlrules/rule_1-body.svg"),
        r#"<svg width="120pt" height="200pt"></svg>"#,
    )
    .unwrap();
    fs::write(
        root.join("swrlrules/rule_1-head.svg"),
        r#"<svg width="80pt" height="50pt"></svg>"#,
    )
    .unwrap();
}

#[test]
fn test_cli_processes_directory() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path());

    let assert = Command::cargo_bin("swrlimg")
        .unwrap()
        .arg(tmp.path())
        .args(["--report", "json", "-q"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(r#""pairs_scaled": 1"#), "stdout: {stdout}");

    let crossref = fs::read_to_string(tmp.path().join("sections/crossref-en.html")).unwrap();
    assert!(crossref.contains("swrlrules/rule_1-body.svg"));
    let index = fs::read_to_string(tmp.path().join("index-en.html")).unwrap();
    assert!(index.contains("resources/swrl-image.css"));
    assert!(tmp.path().join("resources/swrl-image-scale.js").exists());
}

#[test]
fn test_cli_name_mode() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path());

    Command::cargo_bin("swrlimg")
        .unwrap()
        .arg("process")
        .arg(tmp.path())
        .args(["--name", "--no-scale", "--no-resources", "-q"])
        .assert()
        .success();

    let crossref = fs::read_to_string(tmp.path().join("sections/crossref-en.html")).unwrap();
    assert!(crossref.contains("swrlrules/rule_Has_Part-body.svg"));
    assert!(!tmp.path().join("resources").exists());
}

#[test]
fn test_cli_missing_directory() {
    let assert = Command::cargo_bin("swrlimg")
        .unwrap()
        .arg("/nonexistent/widoco/doc")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("is not a directory"), "stderr: {stderr}");
}

#[test]
fn test_cli_missing_asset_fails() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path());
    fs::remove_file(tmp.path().join("swrlrules/rule_1-head.svg")).unwrap();

    let assert = Command::cargo_bin("swrlimg")
        .unwrap()
        .arg(tmp.path())
        .arg("-q")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("Asset not found"), "stderr: {stderr}");
}

#[test]
fn test_cli_scale_command() {
    let tmp = tempfile::tempdir().unwrap();
    write_tree(tmp.path());

    let assert = Command::cargo_bin("swrlimg")
        .unwrap()
        .arg("scale")
        .arg(tmp.path().join("swrlrules"))
        .args(["1", "--height", "50"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("rule_1"), "stdout: {stdout}");

    let body = fs::read_to_string(tmp.path().join("swrlrules/rule_1-body.svg")).unwrap();
    assert!(body.contains(r#"height="50px""#));
}
