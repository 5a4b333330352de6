//! NIT check digit (DV) computation.

use serde::{Deserialize, Serialize};

/// Official DIAN prime weights, assigned from the least-significant digit.
/// Digits beyond the fifteenth carry no weight.
const DV_WEIGHTS: [u32; 15] = [3, 7, 13, 17, 19, 23, 29, 37, 41, 43, 47, 53, 59, 67, 71];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NitError {
    #[error("NIT must not be empty")]
    Empty,
    #[error("NIT contains non-digit character '{0}'")]
    InvalidDigit(char),
}

/// Body digits of a NIT, without its check digit. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a NIT body. Non-digit input is rejected, never coerced.
    pub fn parse(input: &str) -> Result<Self, NitError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(NitError::Empty);
        }
        if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_digit()) {
            return Err(NitError::InvalidDigit(bad));
        }
        Ok(TaxId(trimmed.to_string()))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Modulo-11 weighted-sum check digit.
    pub fn check_digit(&self) -> u8 {
        let sum: u32 = self
            .0
            .bytes()
            .rev()
            .map(|b| u32::from(b - b'0'))
            .zip(DV_WEIGHTS)
            .map(|(digit, weight)| digit * weight)
            .sum();
        let remainder = sum % 11;
        match remainder {
            0 | 1 => remainder as u8,
            _ => (11 - remainder) as u8,
        }
    }
}

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
