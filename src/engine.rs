//! Composition root: fans batches of records out to the evaluators and
//! collects per-record outcomes. A bad record never aborts the batch.

use crate::fiscal::{
    evaluate_cap, evaluate_expense, project_cost, EmployerCostBreakdown, EmployerCostOptions,
    ExpenseRecord, FiscalConstants, PayrollRecord, PayrollVerdict, RiskVerdict, Severity,
};
use serde::Serialize;

/// Verdict for one expense record, paired with its input position.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseOutcome {
    pub index: usize,
    pub verdict: RiskVerdict,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseAuditReport {
    pub outcomes: Vec<ExpenseOutcome>,
}

impl ExpenseAuditReport {
    /// Highest severity across the batch, `Low` for an empty batch.
    pub fn max_severity(&self) -> Severity {
        self.outcomes
            .iter()
            .map(|o| o.verdict.severity)
            .max()
            .unwrap_or(Severity::Low)
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.severity == severity)
            .count()
    }

    #[cfg(test)]
    pub fn finding_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.verdict.findings.len()).sum()
    }
}

/// Outcome for one payroll record: the cap verdict always, the cost
/// breakdown when the options were valid for this record, the error
/// otherwise.
#[derive(Debug, Clone, Serialize)]
pub struct PayrollOutcome {
    pub index: usize,
    pub employee_id: String,
    pub cap_verdict: PayrollVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_cost: Option<EmployerCostBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayrollReport {
    pub outcomes: Vec<PayrollOutcome>,
}

impl PayrollReport {
    pub fn non_compliant_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| !o.cap_verdict.compliant)
            .count()
    }
}

/// Stateless evaluator host. Holds the validated fiscal constants for one
/// run; every evaluation is a pure function of (record, constants).
pub struct ComplianceEngine {
    constants: FiscalConstants,
}

impl ComplianceEngine {
    pub fn new(constants: FiscalConstants) -> Self {
        ComplianceEngine { constants }
    }

    /// Evaluate every expense record. Outcomes keep input order: outcome
    /// `i` belongs to record `i`.
    pub fn audit_expenses(&self, records: &[ExpenseRecord]) -> ExpenseAuditReport {
        let outcomes = records
            .iter()
            .enumerate()
            .map(|(index, record)| ExpenseOutcome {
                index,
                verdict: evaluate_expense(record, &self.constants),
            })
            .collect();
        ExpenseAuditReport { outcomes }
    }

    /// Evaluate the cap rule and project employer cost for every payroll
    /// record. An option set invalid for the run surfaces per record, not
    /// as a batch failure.
    pub fn evaluate_payroll(
        &self,
        records: &[PayrollRecord],
        options: &EmployerCostOptions,
    ) -> PayrollReport {
        let outcomes = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let (employer_cost, cost_error) =
                    match project_cost(record, options, &self.constants) {
                        Ok(breakdown) => (Some(breakdown), None),
                        Err(e) => (None, Some(e.to_string())),
                    };
                PayrollOutcome {
                    index,
                    employee_id: record.employee_id.clone(),
                    cap_verdict: evaluate_cap(record),
                    employer_cost,
                    cost_error,
                }
            })
            .collect();
        PayrollReport { outcomes }
    }
}
