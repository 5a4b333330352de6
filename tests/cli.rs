//! E2E tests driving the built binary over the fixture files

use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn check_flags_cash_ceiling_and_exits_nonzero() {
    let output = run(&["check", "-e", "tests/data/expenses.csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    // The 6,000,000 cash purchase breaches the 100 UVT ceiling
    assert_eq!(output.status.code(), Some(1), "expected audit failure exit");
    assert!(stdout.contains("CASH_CEILING"));
    assert!(stdout.contains("HIGH"));
    assert!(stdout.contains("1 high"));
}

#[test]
fn check_clean_file_exits_zero() {
    let output = run(&["check", "-e", "tests/data/expenses_clean.csv"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 high"));
}

#[test]
fn check_json_output() {
    let output = run(&["check", "-e", "tests/data/expenses.csv", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["record_count"], 5);
    assert_eq!(parsed["high_count"], 1);
    assert!(parsed["verdicts"].as_array().unwrap().len() == 5);
}

#[test]
fn check_verify_nit_appends_check_digits() {
    let output = run(&[
        "check",
        "-e",
        "tests/data/expenses_clean.csv",
        "--verify-nit",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("900123456-8"));
}

#[test]
fn payroll_reports_cap_violation() {
    let output = run(&["payroll", "-p", "tests/data/payroll.csv", "-t"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("E-003"));
    assert!(stdout.contains("EXCEEDED"));
    assert!(stdout.contains("1 over the 40% non-salary cap"));
}

#[test]
fn reconcile_matches_first_fit_and_lists_leftovers() {
    let output = run(&[
        "reconcile",
        "--bank",
        "tests/data/bank.csv",
        "--book",
        "tests/data/book.csv",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    // M-101 takes CB-01 (in window, first in input order); CB-02 stays
    // unmatched; M-103 has no counterpart
    assert_eq!(output.status.code(), Some(1), "leftovers mean nonzero exit");
    assert!(stdout.contains("2 matched"));
    assert!(stdout.contains("1 bank unmatched"));
    assert!(stdout.contains("1 book unmatched"));
    assert!(stdout.contains("CB-02"));
    assert!(stdout.contains("M-103"));
}

#[test]
fn reconcile_json_output() {
    let output = run(&[
        "reconcile",
        "--bank",
        "tests/data/bank.csv",
        "--book",
        "tests/data/book.csv",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(parsed["matched_count"], 2);
    assert_eq!(parsed["fully_reconciled"], false);
    assert_eq!(parsed["result"]["matched"][0]["bank"]["id"], "M-101");
    assert_eq!(parsed["result"]["matched"][0]["book"]["id"], "CB-01");
}

#[test]
fn nit_prints_check_digits() {
    let output = run(&["nit", "900123456", "800197268"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("900123456-8"));
    assert!(stdout.contains("800197268-4"));
}

#[test]
fn nit_rejects_non_numeric_input() {
    let output = run(&["nit", "90O123"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("non-digit"));
}

#[test]
fn schema_prints_expense_header() {
    let output = run(&["schema", "expenses-csv", "--header-only"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("date,nit,concept,amount,payment_method"));
}
