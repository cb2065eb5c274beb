// Shared test helpers for integration tests.
// Used by cli_contract.rs and cli_flows.rs.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::{NamedTempFile, TempDir};

pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_rtk-hook"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// A directory holding an executable `rtk` that does nothing, for use as
/// the whole of `PATH`.
pub fn fake_tool_dir() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    let tool = dir.path().join("rtk");
    std::fs::write(&tool, "#!/bin/sh\nexit 0\n").expect("failed to write fake tool");
    make_executable(&tool);
    dir
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod fake tool");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Runs the binary with `args`, `stdin`, and `PATH` set to `path`.
pub fn run(args: &[&str], stdin_input: &str, path: &Path) -> Output {
    let output = Command::new(binary_path())
        .args(args)
        .env("PATH", path)
        .env_remove("RTK_HOOK_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .and_then(|mut child| {
            use std::io::ErrorKind;
            let write_result = child
                .stdin
                .take()
                .unwrap()
                .write_all(stdin_input.as_bytes());
            if let Err(e) = write_result {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
            child.wait_with_output()
        })
        .expect("failed to execute binary");

    Output {
        stdout: String::from_utf8(output.stdout).expect("stdout not valid UTF-8"),
        stderr: String::from_utf8(output.stderr).expect("stderr not valid UTF-8"),
        code: output.status.code().unwrap_or(-1),
    }
}

/// Runs `hook` with the fake tool on `PATH`.
pub fn run_hook(stdin_input: &str) -> Output {
    let tools = fake_tool_dir();
    run(&["hook"], stdin_input, tools.path())
}

pub fn run_hook_with_config(stdin_input: &str, config_content: &str) -> Output {
    let config = write_config(config_content);
    let tools = fake_tool_dir();
    let config_path = config.path().to_str().unwrap().to_string();
    run(&["hook", "--config", &config_path], stdin_input, tools.path())
}

pub fn write_config(content: &str) -> NamedTempFile {
    let mut tmpfile = NamedTempFile::new().expect("failed to create temp config");
    tmpfile
        .write_all(content.as_bytes())
        .expect("failed to write config");
    tmpfile
}

pub fn make_input_json(tool_name: &str, tool_input: serde_json::Value) -> String {
    serde_json::json!({
        "session_id": "sess-e2e-test",
        "transcript_path": "/tmp/transcript.json",
        "cwd": "/tmp/test",
        "permission_mode": "default",
        "hook_event_name": "PreToolUse",
        "tool_name": tool_name,
        "tool_input": tool_input,
        "tool_use_id": "toolu_e2e"
    })
    .to_string()
}

pub fn bash_input_json(command: &str) -> String {
    make_input_json("Bash", serde_json::json!({"command": command}))
}

/// Parses the hook output JSON.
pub fn parse_hook_output(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout.trim()).expect("stdout should be valid JSON")
}

/// A temp directory with a settings file holding `content`.
pub fn settings_dir(content: &serde_json::Value) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, serde_json::to_string_pretty(content).unwrap())
        .expect("failed to write settings");
    (dir, path)
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("failed to read file"))
        .expect("file should be valid JSON")
}
