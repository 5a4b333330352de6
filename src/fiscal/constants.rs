use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Colombian fiscal year (calendar year). Threshold values are indexed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FiscalYear(pub i32);

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no built-in constants for fiscal year {0}; supply a constants file")]
    UnknownYear(FiscalYear),
    #[error("UVT value must be positive, got {0}")]
    NonPositiveUvt(Decimal),
    #[error("transport allowance must be positive, got {0}")]
    NonPositiveTransportAllowance(Decimal),
    #[error("{name} multiplier must be positive, got {value}")]
    NonPositiveMultiplier { name: &'static str, value: Decimal },
    #[error("ARL rate for class {class} must be positive, got {rate}")]
    NonPositiveArlRate { class: u8, rate: Decimal },
}

/// Fiscal threshold constants for one year. Injected into the evaluators;
/// evaluator logic never hard-codes any of these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FiscalConstants {
    /// UVT (Unidad de Valor Tributario) in COP for the year
    #[schemars(with = "f64")]
    pub uvt_value: Decimal,
    /// Individual cash payment ceiling, in UVT
    #[schemars(with = "f64")]
    pub cash_ceiling_multiplier: Decimal,
    /// Services withholding base threshold, in UVT
    #[schemars(with = "f64")]
    pub service_withholding_multiplier: Decimal,
    /// Goods withholding base threshold, in UVT
    #[schemars(with = "f64")]
    pub goods_withholding_multiplier: Decimal,
    /// Monthly transport allowance in COP
    #[schemars(with = "f64")]
    pub transport_allowance: Decimal,
    /// ARL contribution rates indexed by risk class 1..=5
    #[schemars(with = "[f64; 5]")]
    pub arl_rates: [Decimal; 5],
}

/// ARL rates from decree 1772/1994; stable across the built-in years.
const ARL_RATES: [Decimal; 5] = [
    dec!(0.00522),
    dec!(0.01044),
    dec!(0.02436),
    dec!(0.04350),
    dec!(0.06960),
];

impl FiscalConstants {
    /// Built-in constants for a fiscal year. Years outside the built-in
    /// table require an explicit constants file.
    pub fn for_year(year: FiscalYear) -> Result<Self, ConfigError> {
        let (uvt_value, transport_allowance) = match year.0 {
            2025 => (dec!(49799), dec!(200000)),
            2024 => (dec!(47065), dec!(162000)),
            _ => return Err(ConfigError::UnknownYear(year)),
        };
        Ok(FiscalConstants {
            uvt_value,
            cash_ceiling_multiplier: dec!(100),
            service_withholding_multiplier: dec!(4),
            goods_withholding_multiplier: dec!(27),
            transport_allowance,
            arl_rates: ARL_RATES,
        })
    }

    /// Read constants from JSON and validate them.
    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        let constants: FiscalConstants = serde_json::from_reader(reader)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject zero or negative values: a zeroed threshold would silently
    /// corrupt every verdict computed from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uvt_value <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveUvt(self.uvt_value));
        }
        if self.transport_allowance <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveTransportAllowance(
                self.transport_allowance,
            ));
        }
        for (name, value) in [
            ("cash ceiling", self.cash_ceiling_multiplier),
            ("services withholding", self.service_withholding_multiplier),
            ("goods withholding", self.goods_withholding_multiplier),
        ] {
            if value <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveMultiplier { name, value });
            }
        }
        for (i, rate) in self.arl_rates.iter().enumerate() {
            if *rate <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveArlRate {
                    class: i as u8 + 1,
                    rate: *rate,
                });
            }
        }
        Ok(())
    }

    /// Individual cash payment ceiling in COP
    pub fn cash_ceiling(&self) -> Decimal {
        self.uvt_value * self.cash_ceiling_multiplier
    }

    /// Services withholding base threshold in COP
    pub fn service_withholding_threshold(&self) -> Decimal {
        self.uvt_value * self.service_withholding_multiplier
    }

    /// Goods withholding base threshold in COP
    pub fn goods_withholding_threshold(&self) -> Decimal {
        self.uvt_value * self.goods_withholding_multiplier
    }

    /// ARL rate for a risk class, `None` when the class is out of 1..=5
    pub fn arl_rate(&self, class: u8) -> Option<Decimal> {
        match class {
            1..=5 => Some(self.arl_rates[class as usize - 1]),
            _ => None,
        }
    }
}
