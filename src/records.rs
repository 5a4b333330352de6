//! Typed import boundary. Raw CSV cells are parsed exactly once, here;
//! the evaluators only ever see the typed records from `fiscal`.
//!
//! Per-row problems become [`ImportIssue`] values and the row is excluded,
//! with one exception: a ledger row with an unparseable date is kept as an
//! undated entry so the matcher can route it to the unmatched bucket.
//! Structural problems (unreadable input, missing columns) fail the whole
//! batch.

use crate::fiscal::{ExpenseRecord, LedgerEntry, LedgerSide, PaymentMethod, PayrollRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One excluded input row and why.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ImportIssue {
    /// 1-based data row number (header not counted)
    pub row: usize,
    pub message: String,
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// Parsed batch plus the rows that did not make it.
#[derive(Debug)]
pub struct Import<T> {
    pub records: Vec<T>,
    pub issues: Vec<ImportIssue>,
}

pub const EXPENSE_CSV_COLUMNS: &[&str] = &["date", "nit", "concept", "amount", "payment_method"];
pub const PAYROLL_CSV_COLUMNS: &[&str] =
    &["employee_id", "base_salary", "non_salary_compensation"];
pub const LEDGER_CSV_COLUMNS: &[&str] = &["id", "date", "amount", "description"];

#[derive(Debug, Deserialize)]
struct ExpenseCsvRecord {
    date: String,
    nit: String,
    concept: String,
    amount: Decimal,
    payment_method: String,
}

#[derive(Debug, Deserialize)]
struct PayrollCsvRecord {
    employee_id: String,
    base_salary: Decimal,
    non_salary_compensation: Decimal,
}

#[derive(Debug, Deserialize)]
struct LedgerCsvRecord {
    id: String,
    date: String,
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y"))
        .ok()
}

/// Accepts the accounting-package export vocabulary in either language.
fn parse_payment_method(s: &str) -> Option<PaymentMethod> {
    match s.trim().to_lowercase().as_str() {
        "cash" | "efectivo" => Some(PaymentMethod::Cash),
        "transfer" | "transferencia" => Some(PaymentMethod::Transfer),
        "check" | "cheque" => Some(PaymentMethod::Check),
        "other" | "otro" => Some(PaymentMethod::Other),
        _ => None,
    }
}

fn check_headers(headers: &csv::StringRecord, required: &[&str]) -> anyhow::Result<()> {
    for column in required {
        if !headers.iter().any(|h| h.trim() == *column) {
            anyhow::bail!(
                "missing required column '{}' (found: {})",
                column,
                headers.iter().collect::<Vec<_>>().join(", ")
            );
        }
    }
    Ok(())
}

/// Read an expense ledger export.
pub fn read_expense_csv<R: Read>(reader: R) -> anyhow::Result<Import<ExpenseRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    check_headers(rdr.headers()?, EXPENSE_CSV_COLUMNS)?;

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (i, row) in rdr.deserialize::<ExpenseCsvRecord>().enumerate() {
        let row_num = i + 1;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                issues.push(ImportIssue {
                    row: row_num,
                    message: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        let Some(date) = parse_date(&raw.date) else {
            issues.push(ImportIssue {
                row: row_num,
                message: format!("invalid date '{}'", raw.date),
            });
            continue;
        };
        let Some(payment_method) = parse_payment_method(&raw.payment_method) else {
            issues.push(ImportIssue {
                row: row_num,
                message: format!("unknown payment method '{}'", raw.payment_method),
            });
            continue;
        };
        if raw.amount < Decimal::ZERO {
            issues.push(ImportIssue {
                row: row_num,
                message: format!("negative amount {}", raw.amount),
            });
            continue;
        }

        records.push(ExpenseRecord {
            date,
            counterparty_id: raw.nit.trim().to_string(),
            concept: raw.concept,
            amount: raw.amount,
            payment_method,
        });
    }

    Ok(Import { records, issues })
}

/// Read a payroll export.
pub fn read_payroll_csv<R: Read>(reader: R) -> anyhow::Result<Import<PayrollRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    check_headers(rdr.headers()?, PAYROLL_CSV_COLUMNS)?;

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (i, row) in rdr.deserialize::<PayrollCsvRecord>().enumerate() {
        let row_num = i + 1;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                issues.push(ImportIssue {
                    row: row_num,
                    message: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        if raw.base_salary < Decimal::ZERO || raw.non_salary_compensation < Decimal::ZERO {
            issues.push(ImportIssue {
                row: row_num,
                message: "negative compensation".to_string(),
            });
            continue;
        }

        records.push(PayrollRecord {
            employee_id: raw.employee_id,
            base_salary: raw.base_salary,
            non_salary_compensation: raw.non_salary_compensation,
        });
    }

    Ok(Import { records, issues })
}

/// Read one side of a ledger. Rows with an unparseable date are kept as
/// undated entries; the matcher routes them to the unmatched bucket.
pub fn read_ledger_csv<R: Read>(reader: R, side: LedgerSide) -> anyhow::Result<Import<LedgerEntry>> {
    let mut rdr = csv::Reader::from_reader(reader);
    check_headers(rdr.headers()?, LEDGER_CSV_COLUMNS)?;

    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (i, row) in rdr.deserialize::<LedgerCsvRecord>().enumerate() {
        let row_num = i + 1;
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                issues.push(ImportIssue {
                    row: row_num,
                    message: format!("unreadable row: {}", e),
                });
                continue;
            }
        };

        if raw.amount < Decimal::ZERO {
            issues.push(ImportIssue {
                row: row_num,
                message: format!("negative amount {}", raw.amount),
            });
            continue;
        }

        let date = parse_date(&raw.date);
        if date.is_none() {
            log::warn!(
                "ledger row {} ({:?} '{}'): invalid date '{}', entry kept but unmatchable",
                row_num,
                side,
                raw.id,
                raw.date
            );
        }

        records.push(LedgerEntry {
            id: raw.id,
            date,
            amount: raw.amount,
            description: raw.description.unwrap_or_default(),
            side,
        });
    }

    Ok(Import { records, issues })
}
