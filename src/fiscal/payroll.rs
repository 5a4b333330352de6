//! UGPP 40% rule: cap on non-salary compensation outside the
//! contribution base.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const NON_SALARY_CAP_RATE: Decimal = dec!(0.40);

/// One employee's compensation for a period. Read-only input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollRecord {
    pub employee_id: String,
    pub base_salary: Decimal,
    pub non_salary_compensation: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PayrollVerdict {
    /// IBC after adding back any excess over the cap
    #[schemars(with = "f64")]
    pub adjusted_base_for_contributions: Decimal,
    /// Non-salary compensation above 40% of total compensation
    #[schemars(with = "f64")]
    pub excess_amount: Decimal,
    pub compliant: bool,
}

/// Apply the 40% cap: non-salary compensation above 40% of total
/// compensation is added back to the contribution base.
pub fn evaluate_cap(record: &PayrollRecord) -> PayrollVerdict {
    let total = record.base_salary + record.non_salary_compensation;
    let cap = total * NON_SALARY_CAP_RATE;

    if record.non_salary_compensation > cap {
        let excess = record.non_salary_compensation - cap;
        PayrollVerdict {
            adjusted_base_for_contributions: record.base_salary + excess,
            excess_amount: excess,
            compliant: false,
        }
    } else {
        PayrollVerdict {
            adjusted_base_for_contributions: record.base_salary,
            excess_amount: Decimal::ZERO,
            compliant: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(base: Decimal, non_salary: Decimal) -> PayrollRecord {
        PayrollRecord {
            employee_id: "E-001".to_string(),
            base_salary: base,
            non_salary_compensation: non_salary,
        }
    }

    #[test]
    fn under_cap_is_compliant() {
        let verdict = evaluate_cap(&record(dec!(3000000), dec!(1000000)));
        assert!(verdict.compliant);
        assert_eq!(verdict.excess_amount, Decimal::ZERO);
        assert_eq!(verdict.adjusted_base_for_contributions, dec!(3000000));
    }

    #[test]
    fn exactly_forty_percent_is_compliant() {
        // total 5,000,000; cap = 2,000,000 = non-salary exactly
        let verdict = evaluate_cap(&record(dec!(3000000), dec!(2000000)));
        assert!(verdict.compliant);
        assert_eq!(verdict.excess_amount, Decimal::ZERO);
    }

    #[test]
    fn over_cap_adds_excess_back_to_base() {
        // total 5,000,000; cap 2,000,000; excess 1,000,000
        let verdict = evaluate_cap(&record(dec!(2000000), dec!(3000000)));
        assert!(!verdict.compliant);
        assert_eq!(verdict.excess_amount, dec!(1000000));
        assert_eq!(verdict.adjusted_base_for_contributions, dec!(3000000));
    }

    #[test]
    fn adjusted_base_is_exactly_base_plus_excess() {
        let record = record(dec!(1423500), dec!(4000000));
        let verdict = evaluate_cap(&record);
        assert!(!verdict.compliant);
        assert_eq!(
            verdict.adjusted_base_for_contributions,
            record.base_salary + verdict.excess_amount
        );
    }

    #[test]
    fn zero_non_salary_is_compliant() {
        let verdict = evaluate_cap(&record(dec!(1423500), Decimal::ZERO));
        assert!(verdict.compliant);
        assert_eq!(verdict.adjusted_base_for_contributions, dec!(1423500));
    }
}
