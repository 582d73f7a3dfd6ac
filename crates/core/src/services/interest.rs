//! Interest formulas. Pure functions, no state.
//!
//! Rates are passed in percent (8.5 means 8.5% p.a.), terms in years.
//! Nothing here ever returns NaN or infinity: undefined or overflowing
//! computations come back as `CoreError::DomainError`.

use crate::errors::CoreError;

/// Below this magnitude the recurring deposit denominator is treated as zero.
pub const DENOMINATOR_EPSILON: f64 = 1e-12;

/// Interest earned on `principal` at a flat rate: `P * r/100 * t`.
pub fn simple_interest(principal: f64, rate_percent: f64, years: f64) -> Result<f64, CoreError> {
    finite(principal * (rate_percent / 100.0) * years, "simple interest")
}

/// Value of `principal` compounded `periods_per_year` times a year:
/// `P * (1 + r/n)^(n*t)`.
pub fn compound_maturity(
    principal: f64,
    rate_percent: f64,
    periods_per_year: u32,
    years: f64,
) -> Result<f64, CoreError> {
    let n = periods(periods_per_year)?;
    let r = rate_percent / 100.0;
    finite(principal * (1.0 + r / n).powf(n * years), "compound maturity")
}

/// Maturity of a monthly deposit annuity:
/// `M * ((1 + r/n)^(n*t) - 1) / ((1 + r/n)^(n/12) - 1)`.
///
/// The denominator is the growth over one month; when it vanishes (a zero
/// rate, or a rate too small to register) the annuity is undefined.
pub fn recurring_deposit_maturity(
    monthly_contribution: f64,
    rate_percent: f64,
    periods_per_year: u32,
    years: f64,
) -> Result<f64, CoreError> {
    let n = periods(periods_per_year)?;
    let growth = 1.0 + (rate_percent / 100.0) / n;

    let denominator = growth.powf(n / 12.0) - 1.0;
    if !denominator.is_finite() || denominator.abs() < DENOMINATOR_EPSILON {
        return Err(CoreError::domain(format!(
            "Recurring deposit growth per month is zero at {rate_percent}% compounded {periods_per_year}x a year"
        )));
    }

    let numerator = growth.powf(n * years) - 1.0;
    finite(
        monthly_contribution * numerator / denominator,
        "recurring deposit maturity",
    )
}

/// Annualized compound rate that turns `total_in` into `total_out` over
/// `years`: `((out/in)^(1/t) - 1) * 100`.
pub fn effective_annual_rate(total_in: f64, total_out: f64, years: f64) -> Result<f64, CoreError> {
    if total_in.is_nan() || total_in <= 0.0 {
        return Err(CoreError::domain(format!(
            "Effective rate needs a positive amount invested, got {total_in}"
        )));
    }
    if years.is_nan() || years <= 0.0 {
        return Err(CoreError::domain(format!(
            "Effective rate needs a positive term, got {years} years"
        )));
    }
    if total_out < 0.0 {
        return Err(CoreError::domain(format!(
            "Effective rate undefined for a negative final value ({total_out})"
        )));
    }
    finite(
        ((total_out / total_in).powf(1.0 / years) - 1.0) * 100.0,
        "effective rate",
    )
}

fn periods(periods_per_year: u32) -> Result<f64, CoreError> {
    if periods_per_year == 0 {
        return Err(CoreError::domain("Compounding needs at least one period per year"));
    }
    Ok(f64::from(periods_per_year))
}

fn finite(value: f64, what: &str) -> Result<f64, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::domain(format!("{what} is not a finite number")))
    }
}

