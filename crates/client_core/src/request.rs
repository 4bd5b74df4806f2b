//! Validation of raw form input into a [`SimulationRequest`].

use std::str::FromStr;

use rust_decimal::Decimal;
use shared::{
    domain::{RiskTolerance, SimulationRequest, DAYS_PER_YEAR},
    error::ValidationError,
};

/// Raw, unvalidated form fields as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSimulationInput {
    pub initial_investment: String,
    pub risk_tolerance: String,
    pub num_years: String,
}

impl RawSimulationInput {
    pub fn new(
        initial_investment: impl Into<String>,
        risk_tolerance: impl Into<String>,
        num_years: impl Into<String>,
    ) -> Self {
        Self {
            initial_investment: initial_investment.into(),
            risk_tolerance: risk_tolerance.into(),
            num_years: num_years.into(),
        }
    }

    pub fn build(&self) -> Result<SimulationRequest, ValidationError> {
        build_request(
            &self.initial_investment,
            &self.risk_tolerance,
            &self.num_years,
        )
    }
}

/// Checks run initial, then risk, then years; the first failure wins.
pub fn build_request(
    raw_initial: &str,
    raw_risk: &str,
    raw_years: &str,
) -> Result<SimulationRequest, ValidationError> {
    let initial_investment = parse_positive_decimal(raw_initial)?;
    let risk_tolerance = RiskTolerance::from_wire(raw_risk.trim())
        .ok_or_else(|| ValidationError::InvalidEnum(raw_risk.to_string()))?;
    let num_years = parse_positive_years(raw_years)?;
    let num_days = num_years
        .checked_mul(DAYS_PER_YEAR)
        .ok_or_else(|| ValidationError::NotPositiveInteger(raw_years.to_string()))?;

    Ok(SimulationRequest {
        initial_investment,
        risk_tolerance,
        num_days,
    })
}

fn parse_positive_decimal(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::NotPositiveNumber(raw.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositiveNumber(raw.to_string()));
    }
    Ok(value)
}

fn parse_positive_years(raw: &str) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(years) if years >= 1 => Ok(years),
        _ => Err(ValidationError::NotPositiveInteger(raw.to_string())),
    }
}

#[cfg(test)]
#[path = "tests/request_tests.rs"]
mod tests;
