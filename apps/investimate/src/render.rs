//! Plain-text presentation of the formatter's views.

use std::fmt::Write as _;

use client_core::{
    format::{
        format_amount, summary, to_breakdown_series, to_chart_series, ChartSeries, TableRow,
    },
    ResultView,
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use shared::domain::SimulationResult;

const BAR_WIDTH: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_summary(result: &SimulationResult) -> String {
    let summary = summary(result);
    format!(
        "Simulation Results\nFinal Investment Value: {}\nTotal Returns: {}\n",
        summary.final_investment_value, summary.total_returns
    )
}

pub fn render_view(view: &ResultView) -> String {
    match view {
        ResultView::Table(rows) => render_table(rows),
        ResultView::Graph(series) => {
            let mut out = String::from("Monthly Investment Growth\n");
            out.push_str(&render_line_chart(series));
            out
        }
    }
}

pub fn render_table(rows: &[TableRow]) -> String {
    let amounts: Vec<String> = rows.iter().map(|row| format_amount(row.amount)).collect();
    let category_width = rows
        .iter()
        .map(|row| row.category.chars().count())
        .chain(["Category".len()])
        .max()
        .unwrap_or_default();
    let amount_width = amounts
        .iter()
        .map(String::len)
        .chain(["Amount".len()])
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<category_width$}  {:>amount_width$}",
        "Category", "Amount"
    );
    let _ = writeln!(
        out,
        "{}  {}",
        "-".repeat(category_width),
        "-".repeat(amount_width)
    );
    for (row, amount) in rows.iter().zip(&amounts) {
        let _ = writeln!(
            out,
            "{:<category_width$}  {:>amount_width$}",
            row.category, amount
        );
    }
    out
}

/// One sparkline over the whole series followed by the first and last points.
pub fn render_line_chart(series: &ChartSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", sparkline(&series.values));
    if let (Some((first_label, first)), Some((last_label, last))) =
        (series.points().next(), series.points().last())
    {
        let _ = writeln!(
            out,
            "{first_label}: {}  ->  {last_label}: {}",
            format_amount(first),
            format_amount(last)
        );
    }
    out
}

pub fn render_bar_chart(series: &ChartSeries) -> String {
    let label_width = label_width(series);
    let max = series.values.iter().copied().max().unwrap_or_default();
    let mut out = String::new();
    for (label, value) in series.points() {
        let _ = writeln!(
            out,
            "{label:<label_width$}  {:<BAR_WIDTH$}  {}",
            bar(value, max),
            format_amount(value)
        );
    }
    out
}

pub fn render_pie_chart(series: &ChartSeries) -> String {
    let label_width = label_width(series);
    let total: Decimal = series
        .values
        .iter()
        .copied()
        .filter(|value| *value > Decimal::ZERO)
        .sum();
    let mut out = String::new();
    for (label, value) in series.points() {
        let share = share_percent(value, total);
        let _ = writeln!(
            out,
            "{label:<label_width$}  {share:>5.1}%  {:<BAR_WIDTH$}  {}",
            bar(value, total),
            format_amount(value)
        );
    }
    out
}

/// The visualization page: line, pie and bar charts for one result.
pub fn render_visualizations(result: &SimulationResult) -> String {
    let periods = to_chart_series(result);
    let breakdown = to_breakdown_series(result);

    let mut out = String::from("Investment Visualizations\n\n");
    out.push_str("Investment Growth Over Time (Line Chart)\n");
    out.push_str(&render_line_chart(&periods));
    out.push_str("\nInvestment Breakdown (Pie Chart)\n");
    out.push_str(&render_pie_chart(&breakdown));
    out.push_str("\nMonthly Growth Comparison (Bar Chart)\n");
    out.push_str(&render_bar_chart(&periods));
    out
}

fn label_width(series: &ChartSeries) -> usize {
    series
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or_default()
}

fn ratio(value: Decimal, max: Decimal) -> f64 {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0.0;
    }
    (value / max).to_f64().unwrap_or_default().clamp(0.0, 1.0)
}

fn bar(value: Decimal, max: Decimal) -> String {
    let filled = (ratio(value, max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

fn share_percent(value: Decimal, total: Decimal) -> f64 {
    ratio(value, total) * 100.0
}

fn sparkline(values: &[Decimal]) -> String {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let span = *max - *min;
    values
        .iter()
        .map(|value| {
            if span.is_zero() {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let level = ((*value - *min) / span).to_f64().unwrap_or_default()
                * (SPARK_LEVELS.len() - 1) as f64;
            SPARK_LEVELS[(level.round() as usize).min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}
