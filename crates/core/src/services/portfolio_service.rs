use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::analytics::{InvestmentResult, PortfolioTotals};
use crate::models::investment::{InvestmentForm, InvestmentRecord};
use crate::models::portfolio::Portfolio;

use super::investment_service::InvestmentService;

/// Manages the investments being compared and their computed results.
///
/// Pure business logic, no I/O. Every mutation of `records` marks the
/// results stale; results only change through `recalculate_all`.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Validate form input and append it as "Investment N".
    /// On a validation error the portfolio is left untouched.
    pub fn add_investment(
        &self,
        portfolio: &mut Portfolio,
        form: InvestmentForm,
    ) -> Result<Uuid, CoreError> {
        let record = form.into_record(portfolio.records.len() + 1)?;
        let id = record.id();
        log::debug!("Adding {} ({})", record.name(), record.summary());
        portfolio.records.push(record);
        portfolio.invalidate_results();
        Ok(id)
    }

    /// Remove a record by its id.
    pub fn remove_investment(
        &self,
        portfolio: &mut Portfolio,
        id: Uuid,
    ) -> Result<InvestmentRecord, CoreError> {
        let idx = portfolio
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CoreError::InvestmentNotFound(id.to_string()))?;

        let removed = portfolio.records.remove(idx);
        log::debug!("Removed {}", removed.name());
        portfolio.invalidate_results();
        Ok(removed)
    }

    /// Remove every record carrying `name`. Returns how many were removed.
    pub fn remove_investments_by_name(&self, portfolio: &mut Portfolio, name: &str) -> usize {
        let before = portfolio.records.len();
        portfolio.records.retain(|r| r.name() != name);
        let removed = before - portfolio.records.len();
        if removed > 0 {
            log::debug!("Removed {removed} investment(s) named '{name}'");
            portfolio.invalidate_results();
        }
        removed
    }

    /// Drop every record and result.
    pub fn clear_all(&self, portfolio: &mut Portfolio) {
        portfolio.records.clear();
        portfolio.invalidate_results();
    }

    /// Evaluate every record, in order, replacing the previous results.
    ///
    /// All-or-nothing: the first failing record aborts the pass, no partial
    /// results are kept and the old ones stay marked stale.
    pub fn recalculate_all<'a>(
        &self,
        portfolio: &'a mut Portfolio,
        engine: &InvestmentService,
    ) -> Result<&'a [InvestmentResult], CoreError> {
        let results = portfolio
            .records
            .iter()
            .map(|record| {
                engine.evaluate(record).inspect_err(|e| {
                    log::warn!("Calculation aborted at {}: {e}", record.name());
                })
            })
            .collect::<Result<Vec<_>, _>>();

        match results {
            Ok(results) => {
                log::debug!("Recalculated {} investment(s)", results.len());
                portfolio.results = results;
                portfolio.results_stale = false;
                Ok(&portfolio.results)
            }
            Err(e) => {
                portfolio.results.clear();
                portfolio.results_stale = !portfolio.records.is_empty();
                Err(e)
            }
        }
    }

    /// Sum the results and pick the best effective rate.
    /// Returns `None` for an empty slice: there is nothing to summarize.
    pub fn totals(&self, results: &[InvestmentResult]) -> Option<PortfolioTotals> {
        let first = results.first()?;
        let mut totals = PortfolioTotals {
            count: results.len(),
            total_contribution: 0.0,
            interest_earned: 0.0,
            maturity_value: 0.0,
            best_effective_rate: first.effective_rate_percent,
            best_investment: first.name.clone(),
        };

        for result in results {
            totals.total_contribution += result.total_contribution;
            totals.interest_earned += result.interest_earned;
            totals.maturity_value += result.maturity_value;
            if result.effective_rate_percent > totals.best_effective_rate {
                totals.best_effective_rate = result.effective_rate_percent;
                totals.best_investment = result.name.clone();
            }
        }

        Some(totals)
    }

    /// Get a record by its id.
    pub fn get_investment<'a>(
        &self,
        portfolio: &'a Portfolio,
        id: Uuid,
    ) -> Option<&'a InvestmentRecord> {
        portfolio.records.iter().find(|r| r.id() == id)
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
