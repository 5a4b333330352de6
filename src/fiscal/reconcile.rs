//! Bank-extract vs. book-entry reconciliation.
//!
//! Greedy first-fit matching: bank entries are processed in input order,
//! and each takes the earliest-appearing unconsumed book entry with an
//! exactly equal amount inside the date window. The earliest-first bias on
//! duplicate amounts is part of the contract, not an accident.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_TOLERANCE_DAYS: i64 = 3;

/// Which ledger an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerSide {
    Bank,
    Book,
}

/// One ledger line. A `None` date models a source date that failed to
/// parse: the entry is kept visible but can never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
    pub description: String,
    pub side: LedgerSide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub bank: LedgerEntry,
    pub book: LedgerEntry,
}

/// Partition of both input ledgers: every entry lands in exactly one of
/// the three buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub matched: Vec<MatchedPair>,
    pub unmatched_bank: Vec<LedgerEntry>,
    pub unmatched_book: Vec<LedgerEntry>,
}

impl ReconciliationResult {
    pub fn total_matched_amount(&self) -> Decimal {
        self.matched.iter().map(|p| p.bank.amount).sum()
    }

    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_bank.is_empty() && self.unmatched_book.is_empty()
    }
}

fn within_tolerance(bank: &LedgerEntry, book: &LedgerEntry, tolerance_days: i64) -> bool {
    match (bank.date, book.date) {
        (Some(bank_date), Some(book_date)) => {
            (bank_date - book_date).num_days().abs() <= tolerance_days
        }
        // An undated entry is ineligible for matching
        _ => false,
    }
}

/// Match bank entries against book entries within a date tolerance.
///
/// Single sequential pass over the bank entries; the consumed state on the
/// book side lives in a run-local vector, so no entry can be taken twice
/// and concurrent runs over the same data cannot interfere.
pub fn reconcile(
    bank_entries: &[LedgerEntry],
    book_entries: &[LedgerEntry],
    tolerance_days: i64,
) -> ReconciliationResult {
    let mut consumed = vec![false; book_entries.len()];
    let mut matched = Vec::new();
    let mut unmatched_bank = Vec::new();

    for bank in bank_entries {
        let candidate = book_entries.iter().enumerate().find(|(i, book)| {
            !consumed[*i] && bank.amount == book.amount && within_tolerance(bank, book, tolerance_days)
        });

        match candidate {
            Some((i, book)) => {
                log::debug!(
                    "matched bank {} to book {} on amount {}",
                    bank.id,
                    book.id,
                    bank.amount
                );
                consumed[i] = true;
                matched.push(MatchedPair {
                    bank: bank.clone(),
                    book: book.clone(),
                });
            }
            None => unmatched_bank.push(bank.clone()),
        }
    }

    let unmatched_book = book_entries
        .iter()
        .zip(&consumed)
        .filter(|(_, taken)| !**taken)
        .map(|(entry, _)| entry.clone())
        .collect();

    ReconciliationResult {
        matched,
        unmatched_bank,
        unmatched_book,
    }
}
