//! Check command - audit an expense export against the fiscal thresholds

use crate::cmd::{load_constants, open_input, print_issues};
use crate::engine::ComplianceEngine;
use crate::fiscal::{ExpenseRecord, RiskVerdict, Severity, TaxId};
use crate::records::read_expense_csv;
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// CSV file with expense rows (or "-" for stdin)
    #[arg(short, long)]
    expenses: PathBuf,

    /// Fiscal year for the built-in constants
    #[arg(short, long, default_value_t = 2025)]
    year: i32,

    /// JSON file overriding the built-in fiscal constants
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Compute and show the check digit for each counterparty NIT
    #[arg(long)]
    verify_nit: bool,

    /// Only show records at or above this severity
    #[arg(short, long, value_enum)]
    min_severity: Option<SeverityArg>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
        }
    }
}

/// Row for the audit table output
#[derive(Debug, Clone, Tabled, Serialize)]
struct CheckRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    row_num: usize,

    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "NIT")]
    nit: String,

    #[tabled(rename = "Concept")]
    concept: String,

    #[tabled(rename = "Amount")]
    amount: String,

    #[tabled(rename = "Method")]
    method: String,

    #[tabled(rename = "Severity")]
    severity: String,

    #[tabled(rename = "Findings")]
    findings: String,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    record_count: usize,
    excluded_rows: usize,
    high_count: usize,
    medium_count: usize,
    low_count: usize,
    verdicts: Vec<VerdictOutput>,
}

#[derive(Debug, Serialize)]
struct VerdictOutput {
    index: usize,
    date: String,
    nit: String,
    concept: String,
    amount: String,
    #[serde(flatten)]
    verdict: RiskVerdict,
}

impl CheckCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let constants = load_constants(self.year, self.constants.as_deref())?;
        let import = read_expense_csv(open_input(&self.expenses)?)?;
        print_issues("expense file", &import.issues);

        let engine = ComplianceEngine::new(constants);
        let report = engine.audit_expenses(&import.records);

        let min_severity: Severity = self.min_severity.map_or(Severity::Low, Into::into);

        if self.json {
            self.print_json(&import.records, &report, import.issues.len())?;
        } else {
            let rows = build_rows(&import.records, &report, min_severity, self.verify_nit);
            if self.csv {
                write_csv(&rows)?;
            } else {
                print_table(&rows, &report);
            }
        }

        // Nonzero exit when the audit found a High-severity record
        if report.max_severity() == Severity::High {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_json(
        &self,
        records: &[ExpenseRecord],
        report: &crate::engine::ExpenseAuditReport,
        excluded_rows: usize,
    ) -> anyhow::Result<()> {
        let verdicts = report
            .outcomes
            .iter()
            .map(|o| {
                let record = &records[o.index];
                VerdictOutput {
                    index: o.index,
                    date: record.date.format("%Y-%m-%d").to_string(),
                    nit: record.counterparty_id.clone(),
                    concept: record.concept.clone(),
                    amount: record.amount.to_string(),
                    verdict: o.verdict.clone(),
                }
            })
            .collect();

        let output = CheckOutput {
            record_count: records.len(),
            excluded_rows,
            high_count: report.count_at(Severity::High),
            medium_count: report.count_at(Severity::Medium),
            low_count: report.count_at(Severity::Low),
            verdicts,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn display_nit(raw: &str, verify: bool) -> String {
    if !verify {
        return raw.to_string();
    }
    match TaxId::parse(raw) {
        Ok(id) => format!("{}-{}", id, id.check_digit()),
        Err(_) => format!("{} (invalid)", raw),
    }
}

fn build_rows(
    records: &[ExpenseRecord],
    report: &crate::engine::ExpenseAuditReport,
    min_severity: Severity,
    verify_nit: bool,
) -> Vec<CheckRow> {
    report
        .outcomes
        .iter()
        .filter(|o| o.verdict.severity >= min_severity)
        .map(|o| {
            let record = &records[o.index];
            let findings = o
                .verdict
                .findings
                .iter()
                .map(|f| f.code.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            CheckRow {
                row_num: o.index + 1,
                date: record.date.format("%Y-%m-%d").to_string(),
                nit: display_nit(&record.counterparty_id, verify_nit),
                concept: record.concept.clone(),
                amount: record.amount.to_string(),
                method: format!("{:?}", record.payment_method),
                severity: o.verdict.severity.to_string(),
                findings,
            }
        })
        .collect()
}

fn print_table(rows: &[CheckRow], report: &crate::engine::ExpenseAuditReport) {
    if rows.is_empty() {
        println!("No records matching filters");
    } else {
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();
    println!(
        "{} record(s): {} high, {} medium, {} low",
        report.outcomes.len(),
        report.count_at(Severity::High),
        report.count_at(Severity::Medium),
        report.count_at(Severity::Low)
    );
}

fn write_csv(rows: &[CheckRow]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
