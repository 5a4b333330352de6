//! Expense risk rules: cash ceiling and withholding-base thresholds.

use super::constants::FiscalConstants;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Check,
    Other,
}

/// A single expense line, produced by the import boundary. Never mutated
/// by the evaluators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub counterparty_id: String,
    pub concept: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
}

/// Finding severity. Ordering matters: the overall verdict severity is the
/// maximum over triggered findings, and rules may only escalate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        };
        write!(f, "{}", s)
    }
}

/// Which rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FindingCode {
    CashCeilingExceeded,
    ServicesWithholding,
    GoodsWithholding,
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FindingCode::CashCeilingExceeded => "CASH_CEILING",
            FindingCode::ServicesWithholding => "WH_SERVICES",
            FindingCode::GoodsWithholding => "WH_GOODS",
        };
        write!(f, "{}", s)
    }
}

/// One triggered rule on one expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RiskFinding {
    pub code: FindingCode,
    pub message: String,
    pub severity: Severity,
}

/// Verdict for one expense record: zero or more findings and their
/// maximum severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RiskVerdict {
    pub severity: Severity,
    pub findings: Vec<RiskFinding>,
}

impl RiskVerdict {
    #[cfg(test)]
    pub fn has_finding(&self, code: FindingCode) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }
}

/// Classify a single expense against the fiscal thresholds. Pure: identical
/// record and constants always produce an identical verdict.
pub fn evaluate_expense(record: &ExpenseRecord, constants: &FiscalConstants) -> RiskVerdict {
    let mut findings = Vec::new();

    let cash_ceiling = constants.cash_ceiling();
    if record.payment_method == PaymentMethod::Cash && record.amount > cash_ceiling {
        log::debug!(
            "cash ceiling: {} pays {} in cash over ceiling {}",
            record.counterparty_id,
            record.amount,
            cash_ceiling
        );
        findings.push(RiskFinding {
            code: FindingCode::CashCeilingExceeded,
            message: format!(
                "cash payment of {} exceeds individual cash ceiling of {}",
                record.amount, cash_ceiling
            ),
            severity: Severity::High,
        });
    }

    let service_threshold = constants.service_withholding_threshold();
    let goods_threshold = constants.goods_withholding_threshold();
    if record.amount >= goods_threshold {
        findings.push(RiskFinding {
            code: FindingCode::GoodsWithholding,
            message: format!(
                "amount {} reaches goods withholding base of {}, verify goods withholding",
                record.amount, goods_threshold
            ),
            severity: Severity::Medium,
        });
    } else if record.amount >= service_threshold {
        findings.push(RiskFinding {
            code: FindingCode::ServicesWithholding,
            message: format!(
                "amount {} reaches services withholding base of {}, verify services withholding",
                record.amount, service_threshold
            ),
            severity: Severity::Medium,
        });
    }

    let severity = findings
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Low);

    RiskVerdict { severity, findings }
}
