//! Schema command - print expected input formats

use crate::fiscal::FiscalConstants;
use crate::records::{EXPENSE_CSV_COLUMNS, LEDGER_CSV_COLUMNS, PAYROLL_CSV_COLUMNS};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Which input format to describe
    #[arg(value_enum, default_value = "expenses-csv")]
    format: SchemaFormat,

    /// Print only the CSV header row
    #[arg(long)]
    header_only: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// Expense export columns
    ExpensesCsv,
    /// Payroll export columns
    PayrollCsv,
    /// Bank/book ledger columns
    LedgerCsv,
    /// JSON Schema for a fiscal constants file
    ConstantsJson,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::ExpensesCsv => {
                self.print_csv(EXPENSE_CSV_COLUMNS, EXPENSE_FIELD_DESCRIPTIONS)
            }
            SchemaFormat::PayrollCsv => {
                self.print_csv(PAYROLL_CSV_COLUMNS, PAYROLL_FIELD_DESCRIPTIONS)
            }
            SchemaFormat::LedgerCsv => self.print_csv(LEDGER_CSV_COLUMNS, LEDGER_FIELD_DESCRIPTIONS),
            SchemaFormat::ConstantsJson => {
                let schema = schema_for!(FiscalConstants);
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
        }
    }

    fn print_csv(
        &self,
        columns: &[&str],
        descriptions: &[(&str, bool, &str)],
    ) -> anyhow::Result<()> {
        if self.header_only {
            println!("{}", columns.join(","));
            return Ok(());
        }
        println!("CSV Input Format");
        println!("================");
        println!();
        for (name, required, description) in descriptions {
            let req = if *required { "required" } else { "optional" };
            println!("{:28} ({:8})  {}", name, req, description);
        }
        Ok(())
    }
}

const EXPENSE_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("date", true, "Expense date (YYYY-MM-DD or DD/MM/YYYY)"),
    ("nit", true, "Counterparty NIT body, without check digit"),
    ("concept", true, "Free-text expense concept"),
    ("amount", true, "Amount in COP, non-negative"),
    (
        "payment_method",
        true,
        "Cash/Efectivo, Transfer/Transferencia, Check/Cheque, Other/Otro",
    ),
];

const PAYROLL_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("employee_id", true, "Employee identifier"),
    ("base_salary", true, "Monthly salary in COP"),
    (
        "non_salary_compensation",
        true,
        "Non-salary pay in COP (bonuses, aids)",
    ),
];

const LEDGER_FIELD_DESCRIPTIONS: &[(&str, bool, &str)] = &[
    ("id", true, "Entry identifier, unique within its file"),
    (
        "date",
        true,
        "Entry date; an unparseable value keeps the row but it can never match",
    ),
    ("amount", true, "Amount in COP, non-negative"),
    ("description", false, "Free-text description"),
];
