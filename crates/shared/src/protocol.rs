//! JSON wire format of the external simulation service.

use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{BreakdownEntry, RiskTolerance, SimulationRequest, SimulationResult},
    error::ClientError,
};

pub const SIMULATE_PATH: &str = "/simulate";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequestBody {
    pub initial_investment: f64,
    pub risk_tolerance: RiskTolerance,
    pub num_days: u32,
}

impl From<&SimulationRequest> for SimulateRequestBody {
    fn from(request: &SimulationRequest) -> Self {
        Self {
            initial_investment: request.initial_investment.to_f64().unwrap_or_default(),
            risk_tolerance: request.risk_tolerance,
            num_days: request.num_days,
        }
    }
}

/// Response body. The breakdown stays a raw JSON object so key order survives
/// and each amount can be checked individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateResponseBody {
    pub final_investment_value: f64,
    pub total_returns: f64,
    pub monthly_values: Vec<f64>,
    pub investment_breakdown: Map<String, Value>,
}

impl TryFrom<SimulateResponseBody> for SimulationResult {
    type Error = ClientError;

    fn try_from(body: SimulateResponseBody) -> Result<Self, Self::Error> {
        if body.monthly_values.is_empty() {
            return Err(ClientError::malformed("monthly_values is empty"));
        }

        let monthly_values = body
            .monthly_values
            .iter()
            .enumerate()
            .map(|(idx, value)| to_decimal(*value, || format!("monthly_values[{idx}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let investment_breakdown = body
            .investment_breakdown
            .into_iter()
            .map(|(category, value)| {
                let amount = value
                    .as_f64()
                    .ok_or_else(|| {
                        ClientError::malformed(format!(
                            "investment_breakdown['{category}'] is not numeric"
                        ))
                    })
                    .and_then(|raw| {
                        to_decimal(raw, || format!("investment_breakdown['{category}']"))
                    })?;
                Ok(BreakdownEntry { category, amount })
            })
            .collect::<Result<Vec<_>, ClientError>>()?;

        Ok(Self {
            final_investment_value: to_decimal(body.final_investment_value, || {
                "final_investment_value".to_string()
            })?,
            total_returns: to_decimal(body.total_returns, || "total_returns".to_string())?,
            monthly_values,
            investment_breakdown,
        })
    }
}

impl From<&SimulationResult> for SimulateResponseBody {
    fn from(result: &SimulationResult) -> Self {
        let investment_breakdown = result
            .investment_breakdown
            .iter()
            .map(|entry| {
                let amount = entry.amount.to_f64().unwrap_or_default();
                (entry.category.clone(), Value::from(amount))
            })
            .collect();

        Self {
            final_investment_value: result.final_investment_value.to_f64().unwrap_or_default(),
            total_returns: result.total_returns.to_f64().unwrap_or_default(),
            monthly_values: result
                .monthly_values
                .iter()
                .map(|value| value.to_f64().unwrap_or_default())
                .collect(),
            investment_breakdown,
        }
    }
}

/// Decodes a response body into a validated result.
pub fn parse_simulation_result(body: &[u8]) -> Result<SimulationResult, ClientError> {
    let wire: SimulateResponseBody = serde_json::from_slice(body)
        .map_err(|err| ClientError::malformed(format!("invalid response body: {err}")))?;
    SimulationResult::try_from(wire)
}

fn to_decimal(value: f64, field: impl FnOnce() -> String) -> Result<Decimal, ClientError> {
    Decimal::from_f64(value)
        .ok_or_else(|| ClientError::malformed(format!("{} is out of range", field())))
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
