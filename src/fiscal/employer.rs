//! Employer cost projection: the statutory burden on top of raw
//! compensation.

use super::constants::FiscalConstants;
use super::payroll::PayrollRecord;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const HEALTH_RATE: Decimal = dec!(0.085);
const PENSION_RATE: Decimal = dec!(0.12);
const PAYROLL_TAX_BASE_RATE: Decimal = dec!(0.04);
const PAYROLL_TAX_NON_EXEMPT_RATE: Decimal = dec!(0.05);
const BENEFIT_ACCRUAL_RATE: Decimal = dec!(0.2183);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmployerCostError {
    #[error("occupational risk class must be 1..=5, got {0}")]
    InvalidRiskClass(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployerCostOptions {
    pub has_transport_allowance: bool,
    /// ARL risk class, 1..=5
    pub occupational_risk_class: u8,
    /// Law 1607 exemption from employer health and SENA/ICBF contributions
    pub exempt_from_health_contribution: bool,
}

/// Full employer cost for one payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmployerCostBreakdown {
    #[schemars(with = "f64")]
    pub base_compensation: Decimal,
    #[schemars(with = "f64")]
    pub transport_allowance: Decimal,
    #[schemars(with = "f64")]
    pub health_contribution: Decimal,
    #[schemars(with = "f64")]
    pub pension_contribution: Decimal,
    #[schemars(with = "f64")]
    pub occupational_risk_contribution: Decimal,
    #[schemars(with = "f64")]
    pub payroll_tax_contribution: Decimal,
    #[schemars(with = "f64")]
    pub statutory_benefit_accrual: Decimal,
    /// Everything the employer pays for the month
    #[schemars(with = "f64")]
    pub total: Decimal,
    /// Cost beyond what the employee sees: total minus compensation paid out
    #[schemars(with = "f64")]
    pub employer_burden: Decimal,
}

impl EmployerCostBreakdown {
    /// Compensation actually paid to the employee (salary plus allowance)
    #[cfg(test)]
    pub fn benefits_base(&self) -> Decimal {
        self.base_compensation + self.transport_allowance
    }
}

/// Project the full employer cost of a payroll record. The transport
/// allowance is excluded from the health/pension/ARL contribution base by
/// law, but counts toward statutory benefit accrual.
pub fn project_cost(
    record: &PayrollRecord,
    options: &EmployerCostOptions,
    constants: &FiscalConstants,
) -> Result<EmployerCostBreakdown, EmployerCostError> {
    let arl_rate = constants
        .arl_rate(options.occupational_risk_class)
        .ok_or(EmployerCostError::InvalidRiskClass(
            options.occupational_risk_class,
        ))?;

    let transport_allowance = if options.has_transport_allowance {
        constants.transport_allowance
    } else {
        Decimal::ZERO
    };

    let contribution_base = record.base_salary;
    let benefits_base = record.base_salary + transport_allowance;

    let health_contribution = if options.exempt_from_health_contribution {
        Decimal::ZERO
    } else {
        contribution_base * HEALTH_RATE
    };
    let pension_contribution = contribution_base * PENSION_RATE;
    let occupational_risk_contribution = contribution_base * arl_rate;

    let mut payroll_tax_contribution = contribution_base * PAYROLL_TAX_BASE_RATE;
    if !options.exempt_from_health_contribution {
        payroll_tax_contribution += contribution_base * PAYROLL_TAX_NON_EXEMPT_RATE;
    }

    let statutory_benefit_accrual = benefits_base * BENEFIT_ACCRUAL_RATE;

    let total = benefits_base
        + health_contribution
        + pension_contribution
        + occupational_risk_contribution
        + payroll_tax_contribution
        + statutory_benefit_accrual;

    Ok(EmployerCostBreakdown {
        base_compensation: record.base_salary,
        transport_allowance,
        health_contribution,
        pension_contribution,
        occupational_risk_contribution,
        payroll_tax_contribution,
        statutory_benefit_accrual,
        total,
        employer_burden: total - benefits_base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::constants::FiscalYear;

    fn constants() -> FiscalConstants {
        FiscalConstants::for_year(FiscalYear(2025)).unwrap()
    }

    fn record(base: Decimal) -> PayrollRecord {
        PayrollRecord {
            employee_id: "E-001".to_string(),
            base_salary: base,
            non_salary_compensation: Decimal::ZERO,
        }
    }

    fn options() -> EmployerCostOptions {
        EmployerCostOptions {
            has_transport_allowance: true,
            occupational_risk_class: 1,
            exempt_from_health_contribution: false,
        }
    }

    #[test]
    fn breakdown_for_minimum_wage() {
        let breakdown = project_cost(&record(dec!(1423500)), &options(), &constants()).unwrap();

        assert_eq!(breakdown.transport_allowance, dec!(200000));
        assert_eq!(breakdown.health_contribution, dec!(120997.500));
        assert_eq!(breakdown.pension_contribution, dec!(170820.00));
        assert_eq!(breakdown.occupational_risk_contribution, dec!(7430.67000));
        // 4% + 5% when not exempt
        assert_eq!(breakdown.payroll_tax_contribution, dec!(128115.00));
        // accrual over salary plus allowance
        assert_eq!(breakdown.statutory_benefit_accrual, dec!(354410.0500));
    }

    #[test]
    fn total_is_benefits_base_plus_components() {
        let breakdown = project_cost(&record(dec!(2500000)), &options(), &constants()).unwrap();
        let components = breakdown.health_contribution
            + breakdown.pension_contribution
            + breakdown.occupational_risk_contribution
            + breakdown.payroll_tax_contribution
            + breakdown.statutory_benefit_accrual;
        assert_eq!(breakdown.total, breakdown.benefits_base() + components);
    }

    #[test]
    fn employer_burden_equals_component_sum() {
        // total − benefits base must equal the contribution/accrual
        // components exactly, with none silently dropped
        let breakdown = project_cost(&record(dec!(3800000)), &options(), &constants()).unwrap();
        let components = breakdown.health_contribution
            + breakdown.pension_contribution
            + breakdown.occupational_risk_contribution
            + breakdown.payroll_tax_contribution
            + breakdown.statutory_benefit_accrual;
        assert_eq!(breakdown.employer_burden, components);
        assert_eq!(breakdown.employer_burden, breakdown.total - breakdown.benefits_base());
    }

    #[test]
    fn no_transport_allowance_shrinks_benefits_base_only() {
        let with = project_cost(&record(dec!(2000000)), &options(), &constants()).unwrap();
        let without = project_cost(
            &record(dec!(2000000)),
            &EmployerCostOptions {
                has_transport_allowance: false,
                ..options()
            },
            &constants(),
        )
        .unwrap();

        assert_eq!(without.transport_allowance, Decimal::ZERO);
        // contribution-based components are unchanged: allowance is outside
        // the contribution base
        assert_eq!(without.health_contribution, with.health_contribution);
        assert_eq!(without.pension_contribution, with.pension_contribution);
        assert!(without.statutory_benefit_accrual < with.statutory_benefit_accrual);
    }

    #[test]
    fn exemption_zeroes_health_and_surtax() {
        let exempt = project_cost(
            &record(dec!(2000000)),
            &EmployerCostOptions {
                exempt_from_health_contribution: true,
                ..options()
            },
            &constants(),
        )
        .unwrap();

        assert_eq!(exempt.health_contribution, Decimal::ZERO);
        // only the 4% component remains
        assert_eq!(exempt.payroll_tax_contribution, dec!(80000.00));
    }

    #[test]
    fn higher_risk_class_costs_more() {
        let class_1 = project_cost(&record(dec!(2000000)), &options(), &constants()).unwrap();
        let class_5 = project_cost(
            &record(dec!(2000000)),
            &EmployerCostOptions {
                occupational_risk_class: 5,
                ..options()
            },
            &constants(),
        )
        .unwrap();
        assert!(class_5.occupational_risk_contribution > class_1.occupational_risk_contribution);
    }

    #[test]
    fn out_of_range_risk_class_is_rejected() {
        for class in [0, 6, 99] {
            let result = project_cost(
                &record(dec!(2000000)),
                &EmployerCostOptions {
                    occupational_risk_class: class,
                    ..options()
                },
                &constants(),
            );
            assert_eq!(result, Err(EmployerCostError::InvalidRiskClass(class)));
        }
    }
}
