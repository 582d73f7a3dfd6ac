use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Largest n whose factorial fits in an f64.
pub const MAX_FACTORIAL: u32 = 170;

/// One-argument functions of the scientific keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScientificFunction {
    /// Sine of an angle in degrees
    Sin,
    /// Cosine of an angle in degrees
    Cos,
    /// Tangent of an angle in degrees
    Tan,
    /// Base-10 logarithm
    Log10,
    /// Natural logarithm
    Ln,
    Sqrt,
    Square,
    Cube,
    Factorial,
    /// 1/x
    Inverse,
    /// Replaces the value with π
    Pi,
    /// Replaces the value with e
    E,
}

/// Apply `function` to `x`.
///
/// Fails with `DomainError` outside the function's domain and whenever the
/// result would not be a finite number.
pub fn evaluate(function: ScientificFunction, x: f64) -> Result<f64, CoreError> {
    let result = match function {
        ScientificFunction::Sin => x.to_radians().sin(),
        ScientificFunction::Cos => x.to_radians().cos(),
        ScientificFunction::Tan => x.to_radians().tan(),
        ScientificFunction::Log10 => {
            if x <= 0.0 {
                return Err(CoreError::domain("Cannot calculate log of non-positive number"));
            }
            x.log10()
        }
        ScientificFunction::Ln => {
            if x <= 0.0 {
                return Err(CoreError::domain("Cannot calculate ln of non-positive number"));
            }
            x.ln()
        }
        ScientificFunction::Sqrt => {
            if x < 0.0 {
                return Err(CoreError::domain(
                    "Cannot calculate square root of negative number",
                ));
            }
            x.sqrt()
        }
        ScientificFunction::Square => x.powi(2),
        ScientificFunction::Cube => x.powi(3),
        ScientificFunction::Factorial => factorial(x)?,
        ScientificFunction::Inverse => {
            if x == 0.0 {
                return Err(CoreError::domain("Cannot divide by zero"));
            }
            1.0 / x
        }
        ScientificFunction::Pi => std::f64::consts::PI,
        ScientificFunction::E => std::f64::consts::E,
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(CoreError::domain("Result is too large to display"))
    }
}

/// n! for a non-negative integer n (as f64, up to 170!).
pub fn factorial(n: f64) -> Result<f64, CoreError> {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(CoreError::domain(
            "Factorial is only defined for non-negative integers",
        ));
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Err(CoreError::domain(format!(
            "Factorial is too large to display above {MAX_FACTORIAL}!"
        )));
    }
    Ok((2..=n as u32).fold(1.0, |acc, i| acc * f64::from(i)))
}
