use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Settings that point at a port nothing listens on, so the connection
/// check fails fast.
fn write_unreachable_config(path: &Path) {
    std::fs::write(
        path,
        r#"{
  "pivot": "openbravo",
  "dbUser": "tad",
  "dbPwd": "tad",
  "dbHost": "127.0.0.1",
  "dbPort": 1
}"#,
    )
    .unwrap();
}

/// Runs the shell with `input` piped on stdin.
fn run_shell(config: &Path, save_dir: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_etshell"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "--save-dir",
            save_dir.to_str().unwrap(),
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run etshell");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[test]
fn help_flag_lists_options() {
    let output = Command::new(env!("CARGO_BIN_EXE_etshell"))
        .arg("--help")
        .output()
        .expect("failed to run etshell");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--save-dir"));
    assert!(stdout.contains("--log-level"));
}

#[test]
fn version_flag_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_etshell"))
        .arg("--version")
        .output()
        .expect("failed to run etshell");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn help_then_exit_without_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("configuration.json");
    write_unreachable_config(&config);

    let output = run_shell(&config, dir.path(), ":help\n:exit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pool can not be initialized."));
    assert!(stdout.contains(":table"));
    assert!(stdout.contains(":query"));
}

#[test]
fn missing_config_is_created_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("configuration.json");

    // Closing stdin ends the session straight away.
    let output = run_shell(&config, dir.path(), "");
    assert!(output.status.success());

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(saved["pivot"], "openbravo");
    assert_eq!(saved["dbUser"], "tad");
}

#[test]
fn unknown_command_does_not_end_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("configuration.json");
    write_unreachable_config(&config);

    let output = run_shell(&config, dir.path(), ":tables\n:help\n:exit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid command. Try :help to check all commands available."));
    assert!(stdout.contains("Bye!"));
}

#[test]
fn printed_drop_is_not_saved_or_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("configuration.json");
    write_unreachable_config(&config);
    let before = std::fs::read_to_string(&config).unwrap();

    let output = run_shell(
        &config,
        dir.path(),
        ":pivot etendo\n:table drop tst_orders\nY\nP\n:exit\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DROP TABLE public.tst_orders;"));

    // :pivot is session-only.
    assert_eq!(std::fs::read_to_string(&config).unwrap(), before);
    let sql_files = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "sql"))
        .count();
    assert_eq!(sql_files, 0);
}

#[test]
fn saved_drop_lands_in_save_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("configuration.json");
    write_unreachable_config(&config);
    let scripts = dir.path().join("scripts");

    let output = run_shell(
        &config,
        &scripts,
        ":table drop tst_orders\nY\nS\ndrop.sql\n:exit\n",
    );
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(scripts.join("drop.sql")).unwrap(),
        "DROP TABLE public.tst_orders;\n"
    );
}
