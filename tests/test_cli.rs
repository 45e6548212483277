/// End-to-end tests for the `validate-agents` binary: exit codes, report
/// formats and the `config` subcommands.
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID: &str = "---\nname: helper\ndescription: Helps with focused tasks. Use proactively.\ntools: Read, Grep\n---\n\n\
# Helper\n\n## Core Expertise\n- Reading code\n\n## Working Principles\n- Be brief\n\n\
## Task Approach\n- Start with the failing case\n\n```bash\nls\n```\n";

/// A working directory with an isolated HOME so no user config leaks in.
fn workspace() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::create_dir(temp.path().join("home")).unwrap();
    fs::create_dir(temp.path().join("agents")).unwrap();
    temp
}

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("validate-agents"));
    cmd.current_dir(dir)
        .env("HOME", dir.join("home"))
        .env_remove("VALIDATE_AGENTS_STRICT")
        .env_remove("VALIDATE_AGENTS_NAMING")
        .env_remove("VALIDATE_AGENTS_LOG");
    cmd
}

#[test]
fn test_valid_directory_exits_zero() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();

    cmd(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ helper.md"))
        .stdout(predicate::str::contains("Total agents: 1"))
        .stdout(predicate::str::contains("✓ All agents passed validation!"));
}

#[test]
fn test_failing_file_exits_one() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();
    fs::write(ws.path().join("agents/bar.md"), "no frontmatter\n").unwrap();

    cmd(ws.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ bar.md"))
        .stdout(predicate::str::contains(
            "ERROR: File must start with YAML frontmatter (---)",
        ))
        .stdout(predicate::str::contains("✗ 1 agents failed validation"));
}

#[test]
fn test_missing_path_exits_two() {
    let ws = workspace();
    cmd(ws.path())
        .arg("does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_empty_directory() {
    let ws = workspace();

    cmd(ws.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No agent definitions found"));

    cmd(ws.path())
        .arg("--allow-empty")
        .assert()
        .success()
        .stdout(predicate::str::contains("No agent definitions found"));
}

#[test]
fn test_json_report() {
    let ws = workspace();
    fs::write(ws.path().join("agents/baz.md"), VALID.replace("name: helper", "name: qux")).unwrap();

    let output = cmd(ws.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(json["summary"]["total"], 1);
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["files"][0]["status"], "fail");
    assert_eq!(json["files"][0]["findings"][0]["kind"], "naming_mismatch");
}

#[test]
fn test_output_file() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();

    cmd(ws.path())
        .args(["--format", "json", "-o", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(ws.path().join("report.json")).unwrap();
    assert!(report.contains("\"passed\": 1"));
}

#[test]
fn test_naming_flag_and_project_config() {
    let ws = workspace();
    fs::write(ws.path().join("agents/baz.md"), VALID.replace("name: helper", "name: qux")).unwrap();

    cmd(ws.path())
        .args(["--naming", "warn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: Name 'qux' does not match filename 'baz.md'"));

    fs::write(ws.path().join(".validate-agents.toml"), "naming = \"off\"\n").unwrap();
    cmd(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("does not match").not());

    // CLI beats the project config
    cmd(ws.path()).args(["--naming", "error"]).assert().code(1);
}

#[test]
fn test_strict_flag_and_env() {
    let ws = workspace();
    fs::write(
        ws.path().join("agents/helper.md"),
        "---\nname: helper\ndescription: Short one\n---\n\nTiny body.\n",
    )
    .unwrap();

    cmd(ws.path()).assert().success();
    cmd(ws.path()).arg("--strict").assert().code(1);
    cmd(ws.path())
        .env("VALIDATE_AGENTS_STRICT", "true")
        .assert()
        .code(1);
}

#[test]
fn test_invalid_config_exits_two() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();
    fs::write(ws.path().join(".validate-agents.toml"), "naming = \"sometimes\"\n").unwrap();

    cmd(ws.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_explicit_config_file() {
    let ws = workspace();
    fs::create_dir(ws.path().join("prompts")).unwrap();
    fs::write(ws.path().join("prompts/helper.md"), VALID).unwrap();
    fs::write(ws.path().join("ci.toml"), "path = \"prompts\"\n").unwrap();

    cmd(ws.path())
        .args(["--config", "ci.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total agents: 1"));

    cmd(ws.path())
        .args(["--config", "missing.toml"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_and_validate() {
    let ws = workspace();
    fs::write(ws.path().join(".validate-agents.toml"), "[rules]\nextra_tools = [\"Deploy\"]\n").unwrap();

    cmd(ws.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("naming: error"))
        .stdout(predicate::str::contains("Deploy"));

    cmd(ws.path())
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Configuration is valid!"));

    fs::write(ws.path().join("bad.toml"), "[rules]\nbody_min_chars = 900\nbody_max_chars = 10\n").unwrap();
    cmd(ws.path())
        .args(["config", "validate", "bad.toml"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("✗ Configuration is invalid!"));
}

#[test]
fn test_verbose_logs_config_loading() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();
    fs::write(ws.path().join(".validate-agents.toml"), "naming = \"warn\"\n").unwrap();

    cmd(ws.path())
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded config file"))
        .stderr(predicate::str::contains("starting validation"));

    cmd(ws.path())
        .args(["config", "show", "-v"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded config file"));

    cmd(ws.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded config file").not());
}

#[test]
fn test_basic_parser_flag() {
    let ws = workspace();
    let nested = VALID.replace("tools: Read, Grep\n", "tools: Read, Grep\nmetadata:\n  owner: platform\n");
    fs::write(ws.path().join("agents/helper.md"), nested).unwrap();

    cmd(ws.path())
        .arg("--basic-parser")
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING: Basic parser skipped line"));

    cmd(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Basic parser skipped line").not());
}

#[test]
fn test_quiet_hides_passing_files() {
    let ws = workspace();
    fs::write(ws.path().join("agents/helper.md"), VALID).unwrap();
    fs::write(ws.path().join("agents/bar.md"), "no frontmatter\n").unwrap();

    cmd(ws.path())
        .arg("--quiet")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("helper.md").not())
        .stdout(predicate::str::contains("✗ bar.md"))
        .stdout(predicate::str::contains("Passed: 1"))
        .stdout(predicate::str::contains("Failed: 1"));
}

#[test]
fn test_help_and_version() {
    let ws = workspace();
    cmd(ws.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXIT CODES"));

    cmd(ws.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("validate-agents "));
}

#[test]
fn test_unknown_flag_exits_two() {
    let ws = workspace();
    cmd(ws.path()).arg("--bogus").assert().code(2);
}
