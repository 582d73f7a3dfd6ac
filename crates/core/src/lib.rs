pub mod calculator;
pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use calculator::Calculator;
use models::{
    analytics::{InvestmentResult, PortfolioTotals},
    chart::ChartBar,
    investment::{InvestmentForm, InvestmentRecord},
    portfolio::Portfolio,
    settings::Settings,
};
use providers::{http_fetcher::HttpFetcher, traits::AssetFetcher};
use services::{
    asset_cache_service::OfflineAssetCache, chart_service::ChartService,
    investment_service::InvestmentService, portfolio_service::PortfolioService,
};
use storage::cache_storage::CacheStorage;

use errors::CoreError;

/// Main entry point for the calculator suite core library.
/// Holds the comparison workspace, both keypads and the services operating on them.
#[must_use]
pub struct CalculatorSuite {
    settings: Settings,
    portfolio: Portfolio,
    portfolio_service: PortfolioService,
    investment_service: InvestmentService,
    chart_service: ChartService,
    basic: Calculator,
    scientific: Calculator,
}

impl std::fmt::Debug for CalculatorSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorSuite")
            .field("investments", &self.portfolio.records.len())
            .field("results", &self.portfolio.results.len())
            .field("results_stale", &self.portfolio.results_stale)
            .field("settings", &self.settings)
            .finish()
    }
}

impl CalculatorSuite {
    /// Create a suite with default settings.
    pub fn new() -> Self {
        Self::build(Settings::default())
    }

    /// Create a suite from validated settings.
    pub fn with_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    /// Create a suite from a JSON settings document.
    pub fn from_settings_json(json: &str) -> Result<Self, CoreError> {
        Ok(Self::build(Settings::from_json(json)?))
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Investments ─────────────────────────────────────────────────

    /// Validate the form and add it to the comparison.
    /// Existing results become stale until the next `calculate_all`.
    pub fn add_investment(&mut self, form: InvestmentForm) -> Result<uuid::Uuid, CoreError> {
        self.portfolio_service
            .add_investment(&mut self.portfolio, form)
    }

    /// Remove an investment by its ID.
    pub fn remove_investment(&mut self, id: uuid::Uuid) -> Result<InvestmentRecord, CoreError> {
        self.portfolio_service
            .remove_investment(&mut self.portfolio, id)
    }

    /// Remove every investment with the given name, then recalculate the rest.
    /// Returns how many were removed.
    ///
    /// The removal always stands. If the remaining investments fail to
    /// recalculate, `results()` is `None` afterwards and `calculate_all`
    /// reports the error.
    pub fn remove_investment_by_name(&mut self, name: &str) -> usize {
        let removed = self
            .portfolio_service
            .remove_investments_by_name(&mut self.portfolio, name);
        if removed > 0 && !self.portfolio.is_empty() {
            if let Err(e) = self.calculate_all() {
                log::warn!("Removed {removed} '{name}' investment(s), recalculation failed: {e}");
            }
        }
        removed
    }

    /// Drop every investment and result.
    pub fn clear_all(&mut self) {
        self.portfolio_service.clear_all(&mut self.portfolio);
    }

    /// Get a single investment by its ID.
    #[must_use]
    pub fn get_investment(&self, id: uuid::Uuid) -> Option<&InvestmentRecord> {
        self.portfolio_service.get_investment(&self.portfolio, id)
    }

    /// All investments, in the order they were added.
    #[must_use]
    pub fn investments(&self) -> &[InvestmentRecord] {
        &self.portfolio.records
    }

    #[must_use]
    pub fn investment_count(&self) -> usize {
        self.portfolio.records.len()
    }

    // ── Comparison ──────────────────────────────────────────────────

    /// Evaluate every investment. Fails as a whole if any one of them fails.
    pub fn calculate_all(&mut self) -> Result<&[InvestmentResult], CoreError> {
        if self.portfolio.is_empty() {
            return Err(CoreError::ValidationError(
                "Please add at least one investment to calculate".into(),
            ));
        }
        self.portfolio_service
            .recalculate_all(&mut self.portfolio, &self.investment_service)
    }

    /// Results of the last calculation, if still current.
    #[must_use]
    pub fn results(&self) -> Option<&[InvestmentResult]> {
        self.portfolio.current_results()
    }

    /// Aggregate figures over the current results.
    #[must_use]
    pub fn totals(&self) -> Option<PortfolioTotals> {
        self.results()
            .and_then(|results| self.portfolio_service.totals(results))
    }

    /// Contributed-vs-matured bars for the current results.
    #[must_use]
    pub fn chart_bars(&self) -> Vec<ChartBar> {
        self.results()
            .map(|results| self.chart_service.comparison_bars(results))
            .unwrap_or_default()
    }

    /// Format an amount with the configured currency symbol.
    #[must_use]
    pub fn format_currency(&self, amount: f64) -> String {
        format::format_currency(amount, &self.settings.display.currency_symbol)
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export the current results as pretty JSON (an empty array if none).
    pub fn export_results_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self.results().unwrap_or_default())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize results: {e}")))
    }

    /// Export the current results as CSV.
    #[must_use]
    pub fn export_results_to_csv(&self) -> String {
        let mut csv = String::from(
            "name,type,principal,total_contribution,interest_earned,maturity_value,effective_rate_percent\n",
        );
        for result in self.results().unwrap_or_default() {
            let name = if result.name.contains(',') || result.name.contains('"') {
                format!("\"{}\"", result.name.replace('"', "\"\""))
            } else {
                result.name.clone()
            };
            csv.push_str(&format!(
                "{},{},{:.2},{:.2},{:.2},{:.2},{:.2}\n",
                name,
                result.kind_label(),
                result.principal,
                result.total_contribution,
                result.interest_earned,
                result.maturity_value,
                result.effective_rate_percent,
            ));
        }
        csv
    }

    // ── Calculators ─────────────────────────────────────────────────

    pub fn basic_calculator(&mut self) -> &mut Calculator {
        &mut self.basic
    }

    pub fn scientific_calculator(&mut self) -> &mut Calculator {
        &mut self.scientific
    }

    // ── Offline Asset Cache ─────────────────────────────────────────

    /// Create the offline asset cache for the configured version, backed by
    /// `storage` (shared with any previous epoch) and `fetcher`.
    pub fn build_asset_cache(
        &self,
        storage: Arc<CacheStorage>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> OfflineAssetCache {
        OfflineAssetCache::new(self.settings.cache.clone(), storage, fetcher)
    }

    /// Same as `build_asset_cache`, fetching over HTTP from the configured origin.
    pub fn build_http_asset_cache(&self, storage: Arc<CacheStorage>) -> OfflineAssetCache {
        let fetcher = HttpFetcher::new(self.settings.cache.origin.clone());
        self.build_asset_cache(storage, Arc::new(fetcher))
    }

    fn build(settings: Settings) -> Self {
        log::info!(
            "Calculator suite ready (cache version {})",
            settings.cache.version
        );
        Self {
            settings,
            portfolio: Portfolio::new(),
            portfolio_service: PortfolioService::new(),
            investment_service: InvestmentService::new(),
            chart_service: ChartService::new(),
            basic: Calculator::basic(),
            scientific: Calculator::scientific(),
        }
    }
}

impl Default for CalculatorSuite {
    fn default() -> Self {
        Self::new()
    }
}
