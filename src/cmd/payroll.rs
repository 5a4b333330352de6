//! Payroll command - 40% cap verdicts and employer cost projection

use crate::cmd::{load_constants, open_input, print_issues};
use crate::engine::{ComplianceEngine, PayrollReport};
use crate::fiscal::EmployerCostOptions;
use crate::records::read_payroll_csv;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct PayrollCommand {
    /// CSV file with payroll rows (or "-" for stdin)
    #[arg(short, long)]
    payroll: PathBuf,

    /// Fiscal year for the built-in constants
    #[arg(short, long, default_value_t = 2025)]
    year: i32,

    /// JSON file overriding the built-in fiscal constants
    #[arg(long)]
    constants: Option<PathBuf>,

    /// ARL occupational risk class for the batch
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
    risk_class: u8,

    /// Employees earn the statutory transport allowance
    #[arg(short, long)]
    transport_allowance: bool,

    /// Employer is exempt from health and SENA/ICBF contributions
    #[arg(long)]
    exempt: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Row for the payroll table output
#[derive(Debug, Tabled)]
struct PayrollRow {
    #[tabled(rename = "Employee")]
    employee: String,

    #[tabled(rename = "Base Salary")]
    base_salary: String,

    #[tabled(rename = "Non-Salary")]
    non_salary: String,

    #[tabled(rename = "IBC")]
    contribution_base: String,

    #[tabled(rename = "Excess")]
    excess: String,

    #[tabled(rename = "40% Cap")]
    cap: String,

    #[tabled(rename = "Employer Total")]
    total: String,

    #[tabled(rename = "Hidden Burden")]
    burden: String,
}

#[derive(Debug, Serialize)]
struct PayrollOutput {
    record_count: usize,
    excluded_rows: usize,
    non_compliant_count: usize,
    outcomes: Vec<crate::engine::PayrollOutcome>,
}

impl PayrollCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let constants = load_constants(self.year, self.constants.as_deref())?;
        let import = read_payroll_csv(open_input(&self.payroll)?)?;
        print_issues("payroll file", &import.issues);

        let options = EmployerCostOptions {
            has_transport_allowance: self.transport_allowance,
            occupational_risk_class: self.risk_class,
            exempt_from_health_contribution: self.exempt,
        };

        let engine = ComplianceEngine::new(constants);
        let report = engine.evaluate_payroll(&import.records, &options);

        if self.json {
            let output = PayrollOutput {
                record_count: import.records.len(),
                excluded_rows: import.issues.len(),
                non_compliant_count: report.non_compliant_count(),
                outcomes: report.outcomes.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            self.print_table(&import.records, &report);
        }
        Ok(())
    }

    fn print_table(&self, records: &[crate::fiscal::PayrollRecord], report: &PayrollReport) {
        if report.outcomes.is_empty() {
            println!("No payroll records");
            return;
        }

        let rows: Vec<PayrollRow> = report
            .outcomes
            .iter()
            .map(|o| {
                let record = &records[o.index];
                let (total, burden) = match &o.employer_cost {
                    Some(breakdown) => (
                        format_cop(breakdown.total),
                        format_cop(breakdown.employer_burden),
                    ),
                    None => (
                        o.cost_error.clone().unwrap_or_else(|| "-".to_string()),
                        "-".to_string(),
                    ),
                };
                PayrollRow {
                    employee: o.employee_id.clone(),
                    base_salary: format_cop(record.base_salary),
                    non_salary: format_cop(record.non_salary_compensation),
                    contribution_base: format_cop(o.cap_verdict.adjusted_base_for_contributions),
                    excess: format_cop(o.cap_verdict.excess_amount),
                    cap: if o.cap_verdict.compliant {
                        "ok".to_string()
                    } else {
                        "EXCEEDED".to_string()
                    },
                    total,
                    burden,
                }
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
        println!(
            "{} employee(s), {} over the 40% non-salary cap",
            report.outcomes.len(),
            report.non_compliant_count()
        );
    }
}

fn format_cop(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
