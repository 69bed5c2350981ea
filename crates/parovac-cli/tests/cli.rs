//! Integration smoke tests for the parovac binary.
//!
//! Only offline commands are exercised; nothing here talks to a service.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn parovac() -> Command {
    Command::cargo_bin("parovac").expect("binary built")
}

#[test]
fn test_help_lists_commands() {
    parovac()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("invoices"))
        .stdout(predicate::str::contains("statements"))
        .stdout(predicate::str::contains("mark-paid"));
}

#[test]
fn test_mark_paid_rejects_non_numeric_id_offline() {
    parovac()
        .args(["mark-paid", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a positive integer"));
}

#[test]
fn test_mark_paid_rejects_zero_offline() {
    parovac()
        .args(["mark-paid", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive integer"));
}

#[test]
fn test_statements_extracts_payments_from_eml_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("001.eml"),
        "From: administrator@tbs.csob.cz\n\
         Subject: Avizo\n\
         \n\
         dne 5.3.2021 byla zauctovana částka +1500,00 CZK, VS 123456\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("002.eml"),
        "From: newsletter@example.com\n\
         Subject: Hello\n\
         \n\
         dne 5.3.2021 částka +9999,00 VS 777\n",
    )
    .unwrap();

    parovac()
        .args(["statements", "--format", "json", "--mailbox"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("123456"))
        .stdout(predicate::str::contains("2021-03-05"))
        .stdout(predicate::str::contains("777").not());
}

#[test]
fn test_invoices_without_credentials_is_a_config_error() {
    let config = tempfile::NamedTempFile::new().unwrap();
    fs::write(config.path(), "{}").unwrap();

    parovac()
        .args(["invoices", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
