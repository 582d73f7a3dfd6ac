use serde::Serialize;

use super::analytics::InvestmentResult;
use super::investment::InvestmentRecord;

/// The investment comparison workspace: admitted records in insertion order,
/// plus the results of the last calculation pass.
///
/// Lives only for the session; nothing in here is persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Portfolio {
    /// Admitted investments, in the order they were added
    pub records: Vec<InvestmentRecord>,

    /// Results of the last successful pass, parallel to `records` when fresh
    pub results: Vec<InvestmentResult>,

    /// Set whenever `records` changes after the last pass
    pub results_stale: bool,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Results, if they reflect the current records.
    pub fn current_results(&self) -> Option<&[InvestmentResult]> {
        if self.results_stale || self.results.is_empty() {
            None
        } else {
            Some(&self.results)
        }
    }

    /// Mark results as out of date; drop them entirely once no record is left.
    pub fn invalidate_results(&mut self) {
        if self.records.is_empty() {
            self.results.clear();
            self.results_stale = false;
        } else {
            self.results_stale = true;
        }
    }
}
