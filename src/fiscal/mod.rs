pub mod constants;
pub mod employer;
pub mod nit;
pub mod payroll;
pub mod reconcile;
pub mod risk;

// Flat public surface for domain types and functions.
pub use constants::{ConfigError, FiscalConstants, FiscalYear};
pub use employer::{project_cost, EmployerCostBreakdown, EmployerCostError, EmployerCostOptions};
pub use nit::{NitError, TaxId};
pub use payroll::{evaluate_cap, PayrollRecord, PayrollVerdict};
pub use reconcile::{
    reconcile, LedgerEntry, LedgerSide, MatchedPair, ReconciliationResult,
    DEFAULT_DATE_TOLERANCE_DAYS,
};
pub use risk::{
    evaluate_expense, ExpenseRecord, FindingCode, PaymentMethod, RiskFinding, RiskVerdict,
    Severity,
};
