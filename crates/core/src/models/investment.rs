use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// Upper bound (inclusive) for an admissible annual rate, in percent.
pub const MAX_ANNUAL_RATE_PERCENT: f64 = 20.0;

/// The financial instrument an investment models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentKind {
    /// Lump-sum principal grown over the term.
    FixedDeposit,
    /// Fixed monthly deposits grown over the term.
    RecurringDeposit,
    /// Both a lump sum and monthly deposits (FD + RD).
    CustomPlan,
}

impl InvestmentKind {
    /// Label used in result rows and exports.
    pub fn result_label(&self) -> &'static str {
        match self {
            InvestmentKind::FixedDeposit => "Fixed Deposit",
            InvestmentKind::RecurringDeposit => "Recurring Deposit",
            InvestmentKind::CustomPlan => "Custom Plan (FD + RD)",
        }
    }
}

impl std::fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestmentKind::FixedDeposit => write!(f, "Fixed Deposit"),
            InvestmentKind::RecurringDeposit => write!(f, "Recurring Deposit"),
            InvestmentKind::CustomPlan => write!(f, "Custom Plan"),
        }
    }
}

/// Simple or compound interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InterestType {
    Simple,
    #[default]
    Compound,
}

impl std::fmt::Display for InterestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterestType::Simple => write!(f, "simple"),
            InterestType::Compound => write!(f, "compound"),
        }
    }
}

/// How often interest is compounded. Ignored for simple interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl CompoundingFrequency {
    /// Compounding periods per year.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Weekly => 52,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::HalfYearly => 2,
            CompoundingFrequency::Yearly => 1,
        }
    }
}

/// Unit the investment term was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TermUnit {
    Months,
    #[default]
    Years,
}

impl TermUnit {
    /// Convert a term in this unit to fractional years.
    pub fn to_years(&self, term: f64) -> f64 {
        match self {
            TermUnit::Months => term / 12.0,
            TermUnit::Years => term,
        }
    }
}

/// A single investment admitted into the portfolio.
///
/// Only built through [`InvestmentForm::into_record`], so every record in a
/// portfolio satisfies the admission invariants. Fields are read-only and the
/// type is serialize-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentRecord {
    id: Uuid,
    name: String,
    kind: InvestmentKind,
    principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    compounding: CompoundingFrequency,
    term_years: f64,
    interest_type: InterestType,
}

impl InvestmentRecord {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> InvestmentKind {
        self.kind
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn compounding(&self) -> CompoundingFrequency {
        self.compounding
    }

    pub fn term_years(&self) -> f64 {
        self.term_years
    }

    pub fn interest_type(&self) -> InterestType {
        self.interest_type
    }

    /// One-line summary for the investment list, e.g.
    /// `Fixed Deposit | 8.5% compound | 5 years`.
    pub fn summary(&self) -> String {
        format!(
            "{} | {}% {} | {} years",
            self.kind, self.annual_rate_percent, self.interest_type, self.term_years
        )
    }
}

/// Raw investment form input, as collected by the presentation layer.
///
/// Defaults mirror the pre-filled form: 100000 principal, 5000 monthly,
/// 8.5% compounded monthly over 5 years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentForm {
    pub kind: InvestmentKind,
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub compounding: CompoundingFrequency,
    pub term: f64,
    pub term_unit: TermUnit,
    pub interest_type: InterestType,
}

impl Default for InvestmentForm {
    fn default() -> Self {
        Self {
            kind: InvestmentKind::FixedDeposit,
            principal: 100_000.0,
            monthly_contribution: 5_000.0,
            annual_rate_percent: 8.5,
            compounding: CompoundingFrequency::default(),
            term: 5.0,
            term_unit: TermUnit::default(),
            interest_type: InterestType::default(),
        }
    }
}

impl InvestmentForm {
    /// Check the admission invariants without building a record.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("principal", self.principal),
            ("monthly contribution", self.monthly_contribution),
            ("interest rate", self.annual_rate_percent),
            ("investment term", self.term),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "Please enter a valid {field}"
                )));
            }
        }
        if self.principal < 0.0 || self.monthly_contribution < 0.0 {
            return Err(CoreError::ValidationError(
                "Amounts must not be negative".into(),
            ));
        }

        match self.kind {
            InvestmentKind::FixedDeposit if self.principal <= 0.0 => {
                return Err(CoreError::ValidationError(
                    "Please enter a valid principal amount for Fixed Deposit".into(),
                ));
            }
            InvestmentKind::RecurringDeposit if self.monthly_contribution <= 0.0 => {
                return Err(CoreError::ValidationError(
                    "Please enter a valid monthly contribution for Recurring Deposit".into(),
                ));
            }
            InvestmentKind::CustomPlan
                if self.principal <= 0.0 && self.monthly_contribution <= 0.0 =>
            {
                return Err(CoreError::ValidationError(
                    "Please enter at least principal amount or monthly contribution for Custom Plan"
                        .into(),
                ));
            }
            _ => {}
        }

        if self.annual_rate_percent <= 0.0 || self.annual_rate_percent > MAX_ANNUAL_RATE_PERCENT {
            return Err(CoreError::ValidationError(
                "Please enter a valid interest rate (0-20%)".into(),
            ));
        }
        if self.term <= 0.0 {
            return Err(CoreError::ValidationError(
                "Please enter a valid investment term".into(),
            ));
        }
        Ok(())
    }

    /// Validate and build an admitted record named `Investment {position}`.
    ///
    /// Amounts that the kind does not use are zeroed, so a fixed deposit never
    /// carries a stray monthly contribution into its calculation.
    pub fn into_record(self, position: usize) -> Result<InvestmentRecord, CoreError> {
        self.validate()?;

        let (principal, monthly_contribution) = match self.kind {
            InvestmentKind::FixedDeposit => (self.principal, 0.0),
            InvestmentKind::RecurringDeposit => (0.0, self.monthly_contribution),
            InvestmentKind::CustomPlan => (self.principal, self.monthly_contribution),
        };

        Ok(InvestmentRecord {
            id: Uuid::new_v4(),
            name: format!("Investment {position}"),
            kind: self.kind,
            principal,
            monthly_contribution,
            annual_rate_percent: self.annual_rate_percent,
            compounding: self.compounding,
            term_years: self.term_unit.to_years(self.term),
            interest_type: self.interest_type,
        })
    }
}
