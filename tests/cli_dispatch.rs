use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use uuid::Uuid;

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

fn taskboard(root: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_taskboard"));
    command
        .arg("--db")
        .arg(root.join("state.sqlite"))
        .arg("--config")
        .arg(root.join("config.toml"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    command
}

fn run(root: &Path, args: &[&str]) -> Output {
    taskboard(root)
        .args(args)
        .output()
        .expect("taskboard command should run")
}

fn run_with_stdin(root: &Path, args: &[&str], stdin: &str) -> Output {
    let mut child = taskboard(root)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("taskboard command should spawn");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("stdin should be writable");
    child.wait_with_output().expect("taskboard should finish")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success but failed.\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure but command succeeded.\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(output.status.code(), Some(1));
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn add(root: &Path, name: &str, date: &str, priority: &str) -> i64 {
    let output = run(
        root,
        &["add", name, "--date", date, "--priority", priority],
    );
    assert_success(&output);
    let listed = json(&run(root, &["ls", "--json"]));
    listed
        .as_array()
        .and_then(|rows| rows.iter().find(|row| row["name"] == name))
        .and_then(|row| row["id"].as_i64())
        .expect("added task should be listed")
}

#[test]
fn add_persists_task_and_activity_across_runs() {
    let root = unique_workspace("taskboard-cli-add");
    let output = run(
        &root,
        &[
            "add",
            "Write report",
            "--date",
            "2024-12-01",
            "--priority",
            "High",
            "--desc",
            "Q3 summary",
        ],
    );
    assert_success(&output);
    assert!(stdout(&output).contains("Task \"Write report\" added"));

    let rows = json(&run(&root, &["ls", "--json"]));
    let rows = rows.as_array().expect("ls json should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Write report");
    assert_eq!(rows[0]["desc"], "Q3 summary");
    assert_eq!(rows[0]["date"], "2024-12-01");
    assert_eq!(rows[0]["priority"], "High");
    assert_eq!(rows[0]["completed"], false);

    let summary = json(&run(&root, &["summary", "--json"]));
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["pending"], 1);

    let activity = json(&run(&root, &["activity", "--json"]));
    assert_eq!(activity["entries"][0], "Task \"Write report\" added");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn done_rename_and_rm_report_activity() {
    let root = unique_workspace("taskboard-cli-mutations");
    let id = add(&root, "Draft", "2024-05-01", "Low");
    let id_arg = id.to_string();

    let output = run(&root, &["done", &id_arg]);
    assert_success(&output);
    assert!(stdout(&output).contains("Task \"Draft\" marked completed"));

    let stats = json(&run(&root, &["stats", "--json"]));
    assert_eq!(stats["completion_rate"], 100);

    let output = run(&root, &["rename", &id_arg, "Final"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Task \"Draft\" renamed to \"Final\""));

    let output = run(&root, &["rm", &id_arg]);
    assert_success(&output);
    assert!(stdout(&output).contains("Task \"Final\" deleted"));

    let rows = json(&run(&root, &["ls", "--json"]));
    assert_eq!(rows.as_array().map(Vec::len), Some(0));

    let activity = json(&run(&root, &["activity", "--json"]));
    let entries = activity["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0], "Task \"Final\" deleted");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn rename_without_name_prompts_on_stdin() {
    let root = unique_workspace("taskboard-cli-prompt");
    let id = add(&root, "Old name", "2024-05-01", "Medium");

    let output = run_with_stdin(&root, &["rename", &id.to_string()], "New name\n");
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Edit Task Name: [Old name]"));
    assert!(out.contains("Task \"Old name\" renamed to \"New name\""));

    let output = run_with_stdin(&root, &["rename", &id.to_string()], "");
    assert_success(&output);
    assert!(stdout(&output).contains("nothing changed"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn missing_ids_and_invalid_input_exit_with_error() {
    let root = unique_workspace("taskboard-cli-errors");

    let output = run(&root, &["done", "42"]);
    assert_failure(&output);
    assert!(stderr(&output).contains("task '42' not found"));

    let output = run(
        &root,
        &["add", "x", "--date", "tomorrow", "--priority", "High"],
    );
    assert_failure(&output);
    assert!(stderr(&output).contains("invalid due date 'tomorrow'"));

    let output = run(
        &root,
        &["add", "x", "--date", "2024-01-01", "--priority", "urgent"],
    );
    assert_failure(&output);
    assert!(stderr(&output).contains("invalid priority 'urgent'"));

    let output = run(&root, &["ls", "--sort", "random"]);
    assert_failure(&output);
    assert!(stderr(&output).contains("invalid sort 'random'"));

    let summary = json(&run(&root, &["summary", "--json"]));
    assert_eq!(summary["total"], 0);

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn ls_filters_and_sorts_with_config_defaults_and_flag_overrides() {
    let root = unique_workspace("taskboard-cli-ls");
    let beta = add(&root, "beta", "2024-03-01", "High");
    add(&root, "alpha", "2024-01-01", "Low");
    add(&root, "gamma", "2024-02-01", "High");
    assert_success(&run(&root, &["done", &beta.to_string()]));

    std::fs::write(
        root.join("config.toml"),
        "[view]\nstatus = \"pending\"\nsort = \"date\"\n",
    )
    .expect("config should be writable");

    let rows = json(&run(&root, &["ls", "--json"]));
    let names = rows
        .as_array()
        .expect("rows")
        .iter()
        .map(|row| row["name"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["alpha", "gamma"]);

    let rows = json(&run(
        &root,
        &["ls", "--status", "all", "--priority", "high", "--sort", "name", "--json"],
    ));
    let names = rows
        .as_array()
        .expect("rows")
        .iter()
        .map(|row| row["name"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["beta", "gamma"]);

    let output = run(&root, &["ls"]);
    assert_success(&output);
    assert!(stdout(&output).contains("filters: status=pending priority=all sort=date"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn invalid_config_is_reported() {
    let root = unique_workspace("taskboard-cli-config");
    std::fs::write(root.join("config.toml"), "[view]\nsort = \"random\"\n")
        .expect("config should be writable");
    let output = run(&root, &["ls"]);
    assert_failure(&output);
    assert!(stderr(&output).contains("config error"));
    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn dashboard_and_chart_render_every_surface() {
    let root = unique_workspace("taskboard-cli-dashboard");
    let output = run(&root, &["dashboard"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("no tasks matched"));
    assert!(out.contains("No recent activity yet."));
    assert!(out.contains("Completed vs pending"));

    let first = add(&root, "one", "2024-01-01", "High");
    add(&root, "two", "2024-01-02", "Low");
    assert_success(&run(&root, &["done", &first.to_string()]));

    let frame = json(&run(&root, &["dashboard", "--json"]));
    assert_eq!(frame["summary"]["completed"], 1);
    assert_eq!(frame["analytics"]["completion_rate"], 50);
    assert_eq!(frame["analytics"]["high_priority"], 1);
    assert_eq!(frame["chart"]["slices"][0]["label"], "Completed");
    assert_eq!(frame["chart"]["slices"][0]["color"], "#2f9e44");
    assert_eq!(frame["query"]["priority"], "all");

    let output = run(&root, &["chart"]);
    assert_success(&output);
    assert!(stdout(&output).contains("■ Completed 1   ■ Pending 1"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn shell_session_runs_scripted_commands() {
    let root = unique_workspace("taskboard-cli-shell");
    let output = run_with_stdin(
        &root,
        &["shell"],
        "add\nShell task\n\n2024-06-01\nmedium\nsort name\nquit\n",
    );
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("Task \"Shell task\" added"));
    assert!(out.contains("sort=name"));

    let rows = json(&run(&root, &["ls", "--json"]));
    assert_eq!(rows[0]["priority"], "Medium");
    let _ = std::fs::remove_dir_all(root);
}
