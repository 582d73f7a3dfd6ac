use crate::models::analytics::InvestmentResult;
use crate::models::chart::ChartBar;

/// Builds the contributed-vs-matured comparison chart from results.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// One pair of bars per result, in result order.
    ///
    /// Both bars of every pair share a single scale: the largest contribution
    /// or maturity value across all results maps to a ratio of 1.0.
    pub fn comparison_bars(&self, results: &[InvestmentResult]) -> Vec<ChartBar> {
        let max_value = results
            .iter()
            .flat_map(|r| [r.total_contribution, r.maturity_value])
            .fold(0.0_f64, f64::max);

        results
            .iter()
            .map(|r| ChartBar {
                label: r.name.clone(),
                contributed: r.total_contribution,
                matured: r.maturity_value,
                contributed_ratio: Self::ratio(r.total_contribution, max_value),
                matured_ratio: Self::ratio(r.maturity_value, max_value),
            })
            .collect()
    }

    fn ratio(value: f64, max_value: f64) -> f64 {
        if max_value > 0.0 {
            (value / max_value).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
