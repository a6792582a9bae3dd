//! End-to-end tests for the `kifab completions` command.
//!
//! These tests verify the CLI behavior of the `completions` command by
//! invoking the binary directly and checking its output.

#[allow(dead_code)]
mod common;
#[allow(unused_imports)]
use common::prelude::*;

#[test]
fn test_completions_help() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        // Bash completions should contain the completion function
        .stdout(predicate::str::contains("_kifab()"))
        // And should reference our subcommands
        .stdout(predicate::str::contains("gerbers"))
        .stdout(predicate::str::contains("pcb_pdf"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("zsh")
        .assert()
        .success()
        // Zsh completions should start with compdef
        .stdout(predicate::str::contains("#compdef kifab"))
        // And should reference subcommands
        .stdout(predicate::str::contains("gerbers"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_completions_fish() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("fish")
        .assert()
        .success()
        // Fish completions use function syntax
        .stdout(predicate::str::contains("function __fish_kifab"))
        // And should reference subcommands
        .stdout(predicate::str::contains("gerbers"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_completions_powershell() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("powershell")
        .assert()
        .success()
        // PowerShell uses Register-ArgumentCompleter
        .stdout(predicate::str::contains("Register-ArgumentCompleter"))
        .stdout(predicate::str::contains("kifab"));
}

#[test]
fn test_completions_elvish() {
    let mut cmd = cargo_bin_cmd!("kifab");
    cmd.arg("completions")
        .arg("elvish")
        .assert()
        .success()
        // Elvish sets up completion in edit:completion
        .stdout(predicate::str::contains(
            "edit:completion:arg-completer[kifab]",
        ))
        // And should contain command completions
        .stdout(predicate::str::contains("gerbers"));
}
