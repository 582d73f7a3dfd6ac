use crate::errors::CoreError;
use crate::models::analytics::InvestmentResult;
use crate::models::investment::{InterestType, InvestmentKind, InvestmentRecord};

use super::interest;

/// Money in and out for one deposit portion of an investment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Growth {
    contribution: f64,
    interest: f64,
    maturity: f64,
}

impl std::ops::Add for Growth {
    type Output = Growth;

    fn add(self, other: Growth) -> Growth {
        Growth {
            contribution: self.contribution + other.contribution,
            interest: self.interest + other.interest,
            maturity: self.maturity + other.maturity,
        }
    }
}

/// Turns investment records into results.
///
/// Pure computation: no I/O, no state. Records are already admitted, so the
/// only failure is a numerically undefined formula (`CoreError::DomainError`).
pub struct InvestmentService;

impl InvestmentService {
    pub fn new() -> Self {
        Self
    }

    /// Compute maturity, interest and effective rate for one record.
    pub fn evaluate(&self, record: &InvestmentRecord) -> Result<InvestmentResult, CoreError> {
        let growth = match record.kind() {
            InvestmentKind::FixedDeposit => Self::fixed_deposit(record, record.principal())?,
            InvestmentKind::RecurringDeposit => {
                Self::recurring_deposit(record, record.monthly_contribution())?
            }
            // Both portions share rate, term and compounding; the plan's
            // rate is then derived from the combined totals.
            InvestmentKind::CustomPlan => {
                Self::fixed_deposit(record, record.principal())?
                    + Self::recurring_deposit(record, record.monthly_contribution())?
            }
        };

        let effective_rate_percent =
            interest::effective_annual_rate(growth.contribution, growth.maturity, record.term_years())?;

        Ok(InvestmentResult {
            name: record.name().to_string(),
            kind: record.kind(),
            principal: record.principal(),
            total_contribution: growth.contribution,
            interest_earned: growth.interest,
            maturity_value: growth.maturity,
            effective_rate_percent,
        })
    }

    /// Lump sum grown over the term.
    fn fixed_deposit(record: &InvestmentRecord, principal: f64) -> Result<Growth, CoreError> {
        if principal == 0.0 {
            return Ok(Growth::default());
        }
        let rate = record.annual_rate_percent();
        let years = record.term_years();

        let (interest, maturity) = match record.interest_type() {
            InterestType::Simple => {
                let interest = interest::simple_interest(principal, rate, years)?;
                (interest, principal + interest)
            }
            InterestType::Compound => {
                let maturity = interest::compound_maturity(
                    principal,
                    rate,
                    record.compounding().periods_per_year(),
                    years,
                )?;
                (maturity - principal, maturity)
            }
        };

        Ok(Growth {
            contribution: principal,
            interest,
            maturity,
        })
    }

    /// Monthly deposits over the term.
    fn recurring_deposit(record: &InvestmentRecord, monthly: f64) -> Result<Growth, CoreError> {
        if monthly == 0.0 {
            return Ok(Growth::default());
        }
        let rate = record.annual_rate_percent();
        let years = record.term_years();
        let contribution = monthly * years * 12.0;

        let (interest, maturity) = match record.interest_type() {
            // Flat interest on the full deposited amount for the whole term.
            InterestType::Simple => {
                let interest = interest::simple_interest(contribution, rate, years)?;
                (interest, contribution + interest)
            }
            InterestType::Compound => {
                let maturity = interest::recurring_deposit_maturity(
                    monthly,
                    rate,
                    record.compounding().periods_per_year(),
                    years,
                )?;
                (maturity - contribution, maturity)
            }
        };

        Ok(Growth {
            contribution,
            interest,
            maturity,
        })
    }
}

impl Default for InvestmentService {
    fn default() -> Self {
        Self::new()
    }
}
