use serde::{Deserialize, Serialize};

/// A pair of bars for one investment in the comparison chart.
///
/// The core computes these; the frontend just draws them. Heights are
/// ratios in `[0, 1]` of the largest value across the whole chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    /// Investment name, used as the x-axis label
    pub label: String,

    /// Total money put in
    pub contributed: f64,

    /// Value at maturity
    pub matured: f64,

    /// Height of the contribution bar relative to the chart maximum
    pub contributed_ratio: f64,

    /// Height of the maturity bar relative to the chart maximum
    pub matured_ratio: f64,
}
