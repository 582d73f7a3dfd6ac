use serde::{Deserialize, Serialize};

use super::investment::InvestmentKind;

/// Computed outcome of a single investment over its full term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    /// Name of the source record (e.g. "Investment 2")
    pub name: String,

    /// Kind of the source record
    pub kind: InvestmentKind,

    /// Lump-sum portion (0 for a pure recurring deposit)
    pub principal: f64,

    /// Everything paid in: principal plus all monthly deposits
    pub total_contribution: f64,

    /// maturity_value - total_contribution
    pub interest_earned: f64,

    /// Value at the end of the term
    pub maturity_value: f64,

    /// Annualized compound rate implied by total_contribution → maturity_value
    pub effective_rate_percent: f64,
}

impl InvestmentResult {
    /// Type label for tables ("Custom Plan (FD + RD)" for custom plans).
    pub fn kind_label(&self) -> &'static str {
        self.kind.result_label()
    }
}

/// Aggregate figures across every result in a calculation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Number of results aggregated
    pub count: usize,

    /// Σ total_contribution
    pub total_contribution: f64,

    /// Σ interest_earned
    pub interest_earned: f64,

    /// Σ maturity_value
    pub maturity_value: f64,

    /// Highest effective_rate_percent among the results
    pub best_effective_rate: f64,

    /// Name of the result holding the best rate (first one on ties)
    pub best_investment: String,
}
