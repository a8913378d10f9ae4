//! Console E2E tests.
//!
//! Drive the binary's stdin with a script of commands and check what it prints.
//! The config directory points somewhere empty so defaults apply.

use assert_cmd::Command;
use predicates::prelude::*;

fn studyhelper(script: &str) -> assert_cmd::assert::Assert {
    studyhelper_bytes(script.as_bytes())
}

fn studyhelper_bytes(script: &[u8]) -> assert_cmd::assert::Assert {
    Command::cargo_bin("studyhelper")
        .expect("binary is built")
        .env("XDG_CONFIG_HOME", "/nonexistent/studyhelper-e2e")
        .env("RUST_LOG", "off")
        .write_stdin(script.to_vec())
        .assert()
}

#[test]
fn test_startup_lists_builtins_and_greets() {
    studyhelper("quit\n")
        .success()
        .stdout(predicate::str::contains("Study Helper started! Add reminders to begin."))
        .stdout(predicate::str::contains("Built-in Reminders"))
        .stdout(predicate::str::contains("Hydrate (every 30 min)"))
        .stdout(predicate::str::contains("Bye!"));
}

#[test]
fn test_eof_exits_cleanly() {
    studyhelper("list\n").success().stdout(predicate::str::contains("Bye!"));
}

#[test]
fn test_start_and_stop_builtin() {
    studyhelper("start 1\nlist\nstop 1\nquit\n")
        .success()
        .stdout(predicate::str::contains("Started Hydrate_30 (every 30 min)"))
        .stdout(predicate::str::contains("running, next at"))
        .stdout(predicate::str::contains("Stopped Hydrate_30"));
}

#[test]
fn test_reset_inactive_reports_notice() {
    studyhelper("reset Hydrate_30\nquit\n")
        .success()
        .stdout(predicate::str::contains("Hydrate_30 reminder is not running; start it first."));
}

#[test]
fn test_add_custom_reminder() {
    studyhelper("add Posture \"Check your posture\" 20\nlist\nremove custom_Posture_20\nquit\n")
        .success()
        .stdout(predicate::str::contains("Added custom reminder: Posture"))
        .stdout(predicate::str::contains("Custom Reminders"))
        .stdout(predicate::str::contains("Posture (every 20 min)"))
        .stdout(predicate::str::contains("Removed custom reminder: Posture"));
}

#[test]
fn test_add_custom_rejects_zero_minutes() {
    studyhelper("add Posture \"Check your posture\" 0\nlist\nquit\n")
        .success()
        .stdout(predicate::str::contains("Please enter valid minutes!"))
        .stdout(predicate::str::contains("Custom Reminders").not());
}

#[test]
fn test_unknown_command_keeps_running() {
    studyhelper("frobnicate\nconfig notifications.title\nquit\n")
        .success()
        .stdout(predicate::str::contains("Study Reminder"))
        .stdout(predicate::str::contains("Bye!"));
}

#[test]
fn test_invalid_utf8_line_keeps_running() {
    studyhelper_bytes(b"list\n\xff\xfe\nlist\nquit\n")
        .success()
        .stdout(predicate::str::contains("Built-in Reminders").count(3))
        .stdout(predicate::str::contains("Bye!"));
}
