use crate::models::{DerivedMetrics, FinancialFigures};

/// Margin below which the score takes the thin-margin deduction.
const MARGIN_FLOOR: f64 = 0.10;

/// Derive solvency metrics from extracted revenue/expense totals.
///
/// Pure computation, no I/O. The score starts at 100 and takes two
/// independent deductions: 30 for a profit margin strictly below 10%, 40 for
/// a negative profit. Both may fire on the same input, so the lowest
/// reachable score is 30 before clamping.
pub fn derive_metrics(figures: &FinancialFigures) -> DerivedMetrics {
    let profit = figures.revenue - figures.expense;
    let working_capital = figures.revenue - figures.expense;
    let profit_margin = if figures.revenue > 0.0 {
        profit / figures.revenue
    } else {
        0.0
    };

    let mut score: i64 = 100;
    if profit_margin < MARGIN_FLOOR {
        score -= 30;
    }
    if profit < 0.0 {
        score -= 40;
    }

    DerivedMetrics {
        profit,
        working_capital,
        profit_margin,
        credit_score: score.clamp(0, 100),
    }
}

/// Profit margin as a percentage rounded to two decimals, as exposed in the
/// API response.
pub fn margin_percentage(metrics: &DerivedMetrics) -> f64 {
    (metrics.profit_margin * 100.0 * 100.0).round() / 100.0
}
