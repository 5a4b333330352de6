//! Reconcile command - match a bank extract against book entries

use crate::cmd::{open_input, print_issues};
use crate::fiscal::{reconcile, LedgerEntry, LedgerSide, ReconciliationResult};
use crate::records::read_ledger_csv;
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ReconcileCommand {
    /// CSV file with the bank extract
    #[arg(long)]
    bank: PathBuf,

    /// CSV file with the book entries
    #[arg(long)]
    book: PathBuf,

    /// Maximum date difference, in days, for a match
    #[arg(short, long, default_value_t = crate::fiscal::DEFAULT_DATE_TOLERANCE_DAYS)]
    tolerance: i64,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Output matched pairs as CSV instead of formatted tables
    #[arg(long)]
    csv: bool,
}

/// Row for the matched-pairs table
#[derive(Debug, Tabled, Serialize)]
struct PairRow {
    #[tabled(rename = "Bank Id")]
    bank_id: String,

    #[tabled(rename = "Bank Date")]
    bank_date: String,

    #[tabled(rename = "Book Id")]
    book_id: String,

    #[tabled(rename = "Book Date")]
    book_date: String,

    #[tabled(rename = "Amount")]
    amount: String,
}

/// Row for an unmatched-entries table
#[derive(Debug, Tabled)]
struct UnmatchedRow {
    #[tabled(rename = "Id")]
    id: String,

    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Amount")]
    amount: String,

    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Debug, Serialize)]
struct ReconcileOutput {
    bank_count: usize,
    book_count: usize,
    excluded_bank_rows: usize,
    excluded_book_rows: usize,
    matched_count: usize,
    total_matched_amount: String,
    fully_reconciled: bool,
    result: ReconciliationResult,
}

impl ReconcileCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let bank = read_ledger_csv(open_input(&self.bank)?, LedgerSide::Bank)?;
        let book = read_ledger_csv(open_input(&self.book)?, LedgerSide::Book)?;
        print_issues("bank file", &bank.issues);
        print_issues("book file", &book.issues);

        let result = reconcile(&bank.records, &book.records, self.tolerance);

        if self.json {
            let output = ReconcileOutput {
                bank_count: bank.records.len(),
                book_count: book.records.len(),
                excluded_bank_rows: bank.issues.len(),
                excluded_book_rows: book.issues.len(),
                matched_count: result.matched.len(),
                total_matched_amount: result.total_matched_amount().to_string(),
                fully_reconciled: result.is_fully_reconciled(),
                result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let pair_rows: Vec<PairRow> = result
            .matched
            .iter()
            .map(|p| PairRow {
                bank_id: p.bank.id.clone(),
                bank_date: display_date(&p.bank),
                book_id: p.book.id.clone(),
                book_date: display_date(&p.book),
                amount: p.bank.amount.to_string(),
            })
            .collect();

        if self.csv {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for row in &pair_rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        } else {
            self.print_tables(&result, &pair_rows);
        }

        // Nonzero exit when something is left unexplained on either side
        if !result.is_fully_reconciled() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_tables(&self, result: &ReconciliationResult, pair_rows: &[PairRow]) {
        println!();
        println!(
            "RECONCILIATION ({} day tolerance): {} matched, {} bank unmatched, {} book unmatched",
            self.tolerance,
            result.matched.len(),
            result.unmatched_bank.len(),
            result.unmatched_book.len()
        );
        println!();

        if !pair_rows.is_empty() {
            println!("MATCHED");
            print_rows(pair_rows);
        }
        if !result.unmatched_bank.is_empty() {
            println!("UNMATCHED BANK");
            print_rows(&unmatched_rows(&result.unmatched_bank));
        }
        if !result.unmatched_book.is_empty() {
            println!("UNMATCHED BOOK");
            print_rows(&unmatched_rows(&result.unmatched_book));
        }

        if result.is_fully_reconciled() {
            println!("\u{2713} Fully reconciled, {} total", result.total_matched_amount());
        }
    }
}

fn display_date(entry: &LedgerEntry) -> String {
    entry
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(invalid)".to_string())
}

fn unmatched_rows(entries: &[LedgerEntry]) -> Vec<UnmatchedRow> {
    entries
        .iter()
        .map(|e| UnmatchedRow {
            id: e.id.clone(),
            date: display_date(e),
            amount: e.amount.to_string(),
            description: e.description.clone(),
        })
        .collect()
}

fn print_rows<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();
}
