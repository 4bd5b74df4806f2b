//! Derived views over a [`SimulationResult`]: table rows, chart series and CSV.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::domain::SimulationResult;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub final_investment_value: String,
    pub total_returns: String,
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to encode csv record: {0}")]
    Encode(#[from] csv::Error),
    #[error("failed to finish csv buffer: {0}")]
    Flush(String),
    #[error("csv output was not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn to_table_rows(result: &SimulationResult) -> Vec<TableRow> {
    result
        .investment_breakdown
        .iter()
        .map(|entry| TableRow {
            category: display_category(&entry.category),
            amount: entry.amount,
        })
        .collect()
}

pub fn to_chart_series(result: &SimulationResult) -> ChartSeries {
    ChartSeries {
        labels: (1..=result.monthly_values.len())
            .map(period_label)
            .collect(),
        values: result.monthly_values.clone(),
    }
}

pub fn to_breakdown_series(result: &SimulationResult) -> ChartSeries {
    let (labels, values) = result
        .investment_breakdown
        .iter()
        .map(|entry| (display_category(&entry.category), entry.amount))
        .unzip();
    ChartSeries { labels, values }
}

pub fn summary(result: &SimulationResult) -> ResultSummary {
    ResultSummary {
        final_investment_value: format_amount(result.final_investment_value),
        total_returns: format_amount(result.total_returns),
    }
}

/// Renders the export file. Every row repeats the final breakdown because the
/// service only reports it once per run.
pub fn to_csv(result: &SimulationResult) -> Result<String, CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = vec!["Period".to_string(), "Value".to_string()];
    header.extend(result.category_names().map(str::to_string));
    writer.write_record(&header)?;

    let breakdown: Vec<String> = result
        .investment_breakdown
        .iter()
        .map(|entry| format_amount(entry.amount))
        .collect();

    for (idx, value) in result.monthly_values.iter().enumerate() {
        let mut row = Vec::with_capacity(2 + breakdown.len());
        row.push((idx + 1).to_string());
        row.push(format_amount(*value));
        row.extend(breakdown.iter().cloned());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CsvError::Flush(err.error().to_string()))?;
    let mut body = String::from_utf8(bytes)?;
    if body.ends_with('\n') {
        body.pop();
    }
    Ok(body)
}

pub fn period_label(period: usize) -> String {
    format!("Period {period}")
}

/// Two decimal places, half away from zero.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// `mutual_fund` becomes `Mutual Fund`. Display only; keys stay untouched.
pub fn display_category(category: &str) -> String {
    category
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
