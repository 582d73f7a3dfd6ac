//! Keypad calculators.
//!
//! One arithmetic state machine serves both the basic and the scientific
//! keypad; the scientific one just has the extra operation set enabled.
//! The operand being typed is kept as text only until it is committed; from
//! then on the numeric value is the source of truth and the display is
//! derived from it by [`crate::format`].

pub mod memory;
pub mod scientific;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::format;

use memory::{Memory, MemoryOp};
use scientific::ScientificFunction;

/// Binary operators of the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// `a % b` means b percent of a
    Percent,
}

impl Operator {
    /// Symbol shown next to the pending operand.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "−",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Percent => "%",
        }
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64, CoreError> {
        let result = match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => {
                if rhs == 0.0 {
                    return Err(CoreError::domain("Cannot divide by zero"));
                }
                lhs / rhs
            }
            Operator::Percent => lhs * (rhs / 100.0),
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(CoreError::domain("Result is too large to display"))
        }
    }
}

/// Which operation set a calculator exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculatorMode {
    /// Digits, the five operators, equals
    Basic,
    /// Basic plus scientific functions and memory
    Scientific,
}

/// The operand on the display.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    /// Being typed; may be empty right after an operator
    Entry(String),
    /// Produced by a computation, a function or a memory recall
    Value(f64),
}

/// Arithmetic state machine behind a keypad.
#[derive(Debug, Clone)]
pub struct Calculator {
    mode: CalculatorMode,
    current: Operand,
    previous: Option<f64>,
    operator: Option<Operator>,
    /// Next digit starts a fresh operand
    reset_on_input: bool,
    memory: Memory,
}

impl Calculator {
    pub fn new(mode: CalculatorMode) -> Self {
        Self {
            mode,
            current: Operand::Entry("0".to_string()),
            previous: None,
            operator: None,
            reset_on_input: false,
            memory: Memory::default(),
        }
    }

    pub fn basic() -> Self {
        Self::new(CalculatorMode::Basic)
    }

    pub fn scientific() -> Self {
        Self::new(CalculatorMode::Scientific)
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    // ── Entry ───────────────────────────────────────────────────────

    /// Type a digit or the decimal point.
    /// A second decimal point in the same operand is ignored.
    pub fn input(&mut self, key: char) -> Result<(), CoreError> {
        if !key.is_ascii_digit() && key != '.' {
            return Err(CoreError::ValidationError(format!(
                "'{key}' is not a digit or decimal point"
            )));
        }

        let mut entry = match &self.current {
            Operand::Entry(s) if !self.reset_on_input => s.clone(),
            _ => String::new(),
        };
        self.reset_on_input = false;

        if key == '.' {
            if entry.contains('.') {
                self.current = Operand::Entry(entry);
                return Ok(());
            }
            if entry.is_empty() {
                entry.push('0');
            }
            entry.push('.');
        } else if entry == "0" {
            entry = key.to_string();
        } else {
            entry.push(key);
        }

        self.current = Operand::Entry(entry);
        Ok(())
    }

    /// Type a whole number string, key by key.
    pub fn input_str(&mut self, keys: &str) -> Result<(), CoreError> {
        keys.chars().try_for_each(|key| self.input(key))
    }

    /// Backspace. A computed value cannot be edited, so it resets to 0.
    pub fn delete(&mut self) {
        self.current = match &self.current {
            Operand::Entry(s) if s.chars().count() > 1 => {
                let mut s = s.clone();
                s.pop();
                Operand::Entry(s)
            }
            _ => Operand::Entry("0".to_string()),
        };
        self.reset_on_input = false;
    }

    /// Reset the operands and pending operator. Memory is kept.
    pub fn clear(&mut self) {
        self.current = Operand::Entry("0".to_string());
        self.previous = None;
        self.operator = None;
        self.reset_on_input = false;
    }

    // ── Arithmetic ──────────────────────────────────────────────────

    /// Select the next operator, first resolving a pending one (`2 + 3 ×`
    /// computes 5). Ignored while no operand has been typed.
    pub fn choose_operator(&mut self, operator: Operator) -> Result<(), CoreError> {
        let Some(value) = self.current_value() else {
            return Ok(());
        };
        let value = if self.previous.is_some() {
            self.compute()?.unwrap_or(value)
        } else {
            value
        };

        self.previous = Some(value);
        self.operator = Some(operator);
        self.current = Operand::Entry(String::new());
        self.reset_on_input = true;
        Ok(())
    }

    /// Equals. Returns the result, or `None` when there is nothing to compute.
    /// On a math error the state is left unchanged.
    pub fn compute(&mut self) -> Result<Option<f64>, CoreError> {
        let (Some(previous), Some(operator)) = (self.previous, self.operator) else {
            return Ok(None);
        };
        let Some(current) = self.current_value() else {
            return Ok(None);
        };

        let result = operator.apply(previous, current)?;
        self.set_value(result);
        self.previous = None;
        self.operator = None;
        Ok(Some(result))
    }

    // ── Scientific ──────────────────────────────────────────────────

    /// Replace the current operand with `function(current)`.
    ///
    /// With nothing typed (right after an operator) the operand becomes 0 and
    /// the function is not applied, constants included.
    pub fn apply_function(&mut self, function: ScientificFunction) -> Result<f64, CoreError> {
        self.require_scientific()?;
        let Some(x) = self.current_value() else {
            self.current = Operand::Entry("0".to_string());
            return Ok(0.0);
        };
        let result = scientific::evaluate(function, x)?;
        self.set_value(result);
        Ok(result)
    }

    /// MC / MR / M+ / M−.
    pub fn apply_memory(&mut self, op: MemoryOp) -> Result<(), CoreError> {
        self.require_scientific()?;
        let x = self.current_value().unwrap_or(0.0);
        match op {
            MemoryOp::Clear => self.memory.clear(),
            MemoryOp::Recall => self.set_value(self.memory.value()),
            MemoryOp::Add => self.memory.add(x),
            MemoryOp::Subtract => self.memory.subtract(x),
        }
        Ok(())
    }

    pub fn memory(&self) -> f64 {
        self.memory.value()
    }

    // ── Display ─────────────────────────────────────────────────────

    /// Numeric value of the current operand; `None` while nothing is typed.
    pub fn current_value(&self) -> Option<f64> {
        match &self.current {
            Operand::Entry(s) => s.parse::<f64>().ok(),
            Operand::Value(v) => Some(*v),
        }
    }

    /// Main display line.
    pub fn display(&self) -> String {
        match &self.current {
            Operand::Entry(s) => format::format_entry(s),
            Operand::Value(v) => format::format_number(*v),
        }
    }

    /// Secondary line: the pending operand and operator (e.g. "1,200 ×").
    pub fn expression(&self) -> String {
        match (self.previous, self.operator) {
            (Some(previous), Some(operator)) => {
                format!("{} {}", format::format_number(previous), operator.symbol())
            }
            _ => String::new(),
        }
    }

    fn set_value(&mut self, value: f64) {
        self.current = Operand::Value(value);
        self.reset_on_input = true;
    }

    fn require_scientific(&self) -> Result<(), CoreError> {
        match self.mode {
            CalculatorMode::Scientific => Ok(()),
            CalculatorMode::Basic => Err(CoreError::InvalidState(
                "scientific operations are not available on the basic calculator".into(),
            )),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::basic()
    }
}
