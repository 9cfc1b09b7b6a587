//! Binary-level checks of mode resolution and exit codes.

use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

fn supervisor() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_salsa-supervisor"));
    cmd.env_remove("MODE")
        .env_remove("SUPERVISOR_CONFIG")
        .env("RUST_LOG", "error");
    cmd
}

fn dry_run(mode: Option<&str>) -> String {
    let mut cmd = supervisor();
    cmd.arg("--dry-run");
    if let Some(mode) = mode {
        cmd.env("MODE", mode);
    }
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

fn temp_config(contents: &str) -> std::path::PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let name = format!(
        "salsa-supervisor-cli-{}-{}.toml",
        nanos,
        NEXT.fetch_add(1, Ordering::SeqCst)
    );
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_dry_run_defaults_to_prod() {
    let out = dry_run(None);
    assert!(out.contains("mode:     prod"), "{out}");
    assert!(out.contains("--env prod"), "{out}");
    assert!(out.contains("--host 0.0.0.0 --port 8001"), "{out}");
    assert!(out.contains("--frontend-port 3000 --backend-port 8000"), "{out}");
}

#[test]
fn test_dry_run_dev_mode() {
    let out = dry_run(Some("dev"));
    assert!(out.contains("mode:     dev"), "{out}");
    assert!(out.contains("--env dev"), "{out}");
    assert!(out.contains("--frontend-port 3000 --backend-port 8000"), "{out}");
}

#[test]
fn test_dry_run_unrecognized_mode_is_prod() {
    for value in ["DEV", "staging", "production"] {
        let out = dry_run(Some(value));
        assert!(out.contains("--env prod"), "MODE={value}: {out}");
    }
}

#[test]
fn test_invalid_config_exits_with_usage_code() {
    let path = temp_config("[backend]\nport = 0\n");
    let output = supervisor()
        .arg("--config")
        .arg(&path)
        .arg("--dry-run")
        .output()
        .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_backend_program_exits_nonzero() {
    let path = temp_config(
        "[backend]\nprogram = \"/nonexistent/uvicorn\"\n\n[liveness]\nenabled = false\n",
    );
    let output = supervisor().arg("--config").arg(&path).output().unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(127));
}

/// Config running `sh` children; the frontend exits with `frontend_code`.
fn sh_children_config(frontend_code: i32) -> std::path::PathBuf {
    temp_config(&format!(
        r#"
[backend]
program = "sh"
args = ["-c", "exec sleep 30"]

[frontend]
program = "sh"
args = ["-c", "exit {}"]

[readiness]
enabled = false

[liveness]
enabled = false
"#,
        frontend_code
    ))
}

#[test]
fn test_exit_code_follows_frontend() {
    let path = sh_children_config(7);
    let output = supervisor().arg("--config").arg(&path).output().unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(7));
}

fn status_output(mode: Option<&str>) -> String {
    let path = sh_children_config(0);
    let mut cmd = supervisor();
    cmd.env("RUST_LOG", "info").arg("--config").arg(&path);
    if let Some(mode) = mode {
        cmd.env("MODE", mode);
    }
    let output = cmd.output().unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_status_line_names_resolved_mode() {
    for (mode, expected) in [(None, "prod"), (Some("dev"), "dev"), (Some("staging"), "prod")] {
        let out = status_output(mode);
        let status = format!("Starting SALSA in {} mode", expected);

        let status_at = out.find(&status).unwrap_or_else(|| panic!("missing `{status}`: {out}"));
        let frontend_at = out.find("Starting frontend").expect("frontend status line");
        assert!(status_at < frontend_at, "{out}");
        assert!(!out.contains('\u{1b}'), "colour codes in piped output: {out}");
    }
}
