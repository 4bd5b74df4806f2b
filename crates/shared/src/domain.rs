use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Exact match against the wire spelling.
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|risk| risk.as_str() == raw)
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for one simulation run. Built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub initial_investment: Decimal,
    pub risk_tolerance: RiskTolerance,
    pub num_days: u32,
}

impl SimulationRequest {
    pub fn num_years(&self) -> u32 {
        self.num_days / DAYS_PER_YEAR
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    pub category: String,
    pub amount: Decimal,
}

/// One simulation outcome as returned by the service.
///
/// `monthly_values` is never empty and `investment_breakdown` keeps the key
/// order the service sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    pub final_investment_value: Decimal,
    pub total_returns: Decimal,
    pub monthly_values: Vec<Decimal>,
    pub investment_breakdown: Vec<BreakdownEntry>,
}

impl SimulationResult {
    pub fn period_count(&self) -> usize {
        self.monthly_values.len()
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.investment_breakdown
            .iter()
            .map(|entry| entry.category.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Table,
    Graph,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Table => Self::Graph,
            Self::Graph => Self::Table,
        }
    }
}
