use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("finanza_cli")
        .unwrap()
        .env("FINANZA_CLI_SCRIPT", "1")
        .env("FINANZA_HOME", home)
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_records_and_lists_movements() {
    let home = TempDir::new().unwrap();
    let input = "\
login juan@example.com 123456
movement add expense 89.90 \"Streaming\" --date 2023-06-02 --desc \"Monthly plan\"
movement list --category stream --from 2023-06-01 --to 2023-06-30
exit
";

    script(home.path(), input)
        .success()
        .stdout(contains("Welcome, Juan Pérez (user)."))
        .stdout(contains("Streaming"))
        .stdout(contains("Monthly plan"))
        .stdout(contains("1 movement(s). Income 0.00 MXN / Expenses 89.90 MXN"));

    let categories =
        std::fs::read_to_string(home.path().join("store/finanzapro_categories.json")).unwrap();
    assert!(categories.contains("\"name\":\"Streaming\""));
}

#[test]
fn failed_login_prints_message_and_keeps_running() {
    let home = TempDir::new().unwrap();
    script(home.path(), "login juan@example.com nope\nwhoami\n")
        .success()
        .stdout(contains("Invalid username or password"))
        .stdout(contains("Not logged in."));
}

#[test]
fn session_persists_between_runs() {
    let home = TempDir::new().unwrap();
    script(home.path(), "login admin@example.com admin123 admin\n").success();
    script(home.path(), "whoami\nuser list\n")
        .success()
        .stdout(contains("Administrador <admin@example.com> (admin) id=admin"))
        .stdout(contains("maria@example.com"));
    script(home.path(), "logout\nwhoami\n")
        .success()
        .stdout(contains("Logged out."))
        .stdout(contains("Not logged in."));
}

#[test]
fn summary_reports_totals_and_shares() {
    let home = TempDir::new().unwrap();
    let input = "\
login carlos@example.com 123456
movement add income 1000 Salario --date 2023-01-10
movement add expense 250 Alimentacion --date 2023-01-12
movement add expense 250 Transporte --date 2023-01-20
summary 2023-01
";

    script(home.path(), input)
        .success()
        .stdout(contains("=== Summary 2023-01 ==="))
        .stdout(contains("Income   : 1000.00 MXN"))
        .stdout(contains("Balance  : 500.00 MXN"))
        .stdout(contains("50.00%"));
}

#[test]
fn empty_month_prints_unsigned_zero() {
    let home = TempDir::new().unwrap();
    script(home.path(), "login maria@example.com 123456\nsummary 2020-01\n")
        .success()
        .stdout(contains("Income   : 0.00 MXN"))
        .stdout(contains("Expenses : 0.00 MXN"))
        .stdout(contains("Balance  : 0.00 MXN"))
        .stdout(contains("-0.00").not());
}

#[test]
fn commands_without_session_point_to_login() {
    let home = TempDir::new().unwrap();
    script(home.path(), "movement list\n")
        .success()
        .stdout(contains("No active session. Log in first."))
        .stdout(contains("hint: Use `login"));
}

#[test]
fn help_version_and_suggestions() {
    let home = TempDir::new().unwrap();
    script(home.path(), "help\nhelp movement\nversion\nsumary\n")
        .success()
        .stdout(contains("=== Available commands ==="))
        .stdout(contains("movement add <income|expense> <amount> <category>"))
        .stdout(contains("Options: --type --amount --category --from --to --date --desc"))
        .stdout(contains("FinanzaPro"))
        .stdout(contains("Suggestion: `summary`?"))
        .stdout(contains("\u{1b}[").not());
}

#[test]
fn config_set_is_saved_under_home() {
    let home = TempDir::new().unwrap();
    script(home.path(), "config set currency USD\nconfig show\n")
        .success()
        .stdout(contains("currency         : USD"));

    let saved = std::fs::read_to_string(home.path().join("config/config.json")).unwrap();
    assert!(saved.contains("\"currency\": \"USD\""));
}
