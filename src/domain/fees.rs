//! Fee parsing and ether formatting
//!
//! Fees are entered as decimal ether strings (optionally with a unit suffix)
//! and carried as wei.

use alloy::primitives::utils::{parse_units, Unit};
use alloy::primitives::U256;
use thiserror::Error;

/// Fee applied to each of the three transmit parameters when none is given.
pub const DEFAULT_FEE: &str = "0.0001";

const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeeError {
    #[error("{label} is empty")]
    Empty { label: &'static str },
    #[error("{label} must not be negative: {value}")]
    Negative { label: &'static str, value: String },
    #[error("{label} has an unknown unit: {unit}")]
    UnknownUnit { label: &'static str, unit: String },
    #[error("{label} is not a valid amount: {value} ({reason})")]
    Invalid {
        label: &'static str,
        value: String,
        reason: String,
    },
    #[error("total fee overflows uint256")]
    Overflow,
}

/// A single parsed fee: the text as typed plus its value in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    pub raw: String,
    pub wei: U256,
}

impl Fee {
    pub fn parse(label: &'static str, input: &str) -> Result<Self, FeeError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(FeeError::Empty { label });
        }
        if raw.starts_with('-') {
            return Err(FeeError::Negative {
                label,
                value: raw.to_string(),
            });
        }

        let (value, unit) = parse_value_and_unit(raw);
        let unit: Unit = unit.parse().map_err(|_| FeeError::UnknownUnit {
            label,
            unit: unit.to_string(),
        })?;
        if !is_decimal(value) {
            return Err(FeeError::Invalid {
                label,
                value: raw.to_string(),
                reason: "expected a decimal number".to_string(),
            });
        }
        if let Some((_, fraction)) = value.split_once('.') {
            if fraction.len() > unit.get() as usize {
                return Err(FeeError::Invalid {
                    label,
                    value: raw.to_string(),
                    reason: format!("more than {} decimal places", unit.get()),
                });
            }
        }
        let wei = parse_units(value, unit.get())
            .map_err(|e| FeeError::Invalid {
                label,
                value: raw.to_string(),
                reason: e.to_string(),
            })?
            .get_absolute();

        Ok(Self {
            raw: raw.to_string(),
            wei,
        })
    }
}

/// The three fees passed to `transmit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    pub request: Fee,
    pub result: Fee,
    pub batch: Fee,
}

impl FeeSchedule {
    /// Parse the three fee strings, substituting [`DEFAULT_FEE`] for any that
    /// are missing.
    pub fn parse(
        request: Option<&str>,
        result: Option<&str>,
        batch: Option<&str>,
    ) -> Result<Self, FeeError> {
        Ok(Self {
            request: Fee::parse("request fee", request.unwrap_or(DEFAULT_FEE))?,
            result: Fee::parse("result fee", result.unwrap_or(DEFAULT_FEE))?,
            batch: Fee::parse("batch fee", batch.unwrap_or(DEFAULT_FEE))?,
        })
    }

    /// Sum of the three fees; this is the value attached to the transaction.
    pub fn total(&self) -> Result<U256, FeeError> {
        self.request
            .wei
            .checked_add(self.result.wei)
            .and_then(|v| v.checked_add(self.batch.wei))
            .ok_or(FeeError::Overflow)
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let fee = Fee {
            raw: DEFAULT_FEE.to_string(),
            wei: U256::from(100_000_000_000_000u64),
        };
        Self {
            request: fee.clone(),
            result: fee.clone(),
            batch: fee,
        }
    }
}

// "0.5" -> ether, "50 gwei" -> gwei
fn parse_value_and_unit(input: &str) -> (&str, &str) {
    let mut parts = input.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(value), Some(unit), None) => (value, unit),
        _ => (input, "ether"),
    }
}

// ASCII digits with at most one '.', and at least one digit
fn is_decimal(value: &str) -> bool {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && digits(fraction) && whole.len() + fraction.len() > 0
}

/// Format wei as ether with trailing zeros trimmed, keeping at least one
/// fractional digit (`0.0003`, `1.0`).
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let remainder = wei % unit;

    let decimal = format!("{:0>18}", remainder.to_string());
    let decimal = decimal.trim_end_matches('0');
    if decimal.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{decimal}")
    }
}
