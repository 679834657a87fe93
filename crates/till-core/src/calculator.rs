//! # Calculator State Machine
//!
//! The four-function keypad next to the cart, used to work out the cash
//! tendered. It knows nothing about the POS domain except that `apply`
//! hands its display to the tendered field.
//!
//! ## Phases
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │          digit                 operator                digit            │
//! │   Idle ─────────► Entering ─────────────► Awaiting ─────────► HasPending│
//! │    ▲              Operand  ◄───────────── Second   ◄───────── Operator  │
//! │    │                 ▲          =          Operand   operator    │      │
//! │    │ C               │                  (op swap ok)             │      │
//! │    └─────────────────┴───────────────────────────────────────────┘      │
//! │                                    =  (accumulator op display)          │
//! │                                                                         │
//! │  %   display ÷ 100, any phase                                           │
//! │  CE  display "0", pending operator kept                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Arithmetic
//! Exact decimals via `rust_decimal`. Results are shown in shortest form
//! (`10`, not `10.00`). Division by zero shows `0`, as does a result that
//! overflows.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::CALCULATOR_MAX_DISPLAY_LEN;

// =============================================================================
// Keys
// =============================================================================

/// A binary operator key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// Applies the operator. `None` means the result overflowed.
    fn apply(self, lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Subtract => lhs.checked_sub(rhs),
            Operator::Multiply => lhs.checked_mul(rhs),
            Operator::Divide if rhs.is_zero() => Some(Decimal::ZERO),
            Operator::Divide => lhs.checked_div(rhs),
        }
    }
}

/// One keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    Operator(Operator),
    Equals,
    Percent,
    /// `C`: reset everything.
    Clear,
    /// `CE`: reset the display only.
    ClearEntry,
    /// Copy the display to the tendered field. Negative results are not
    /// applied.
    Apply,
}

impl Key {
    /// Maps a button label to a key.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::calculator::{Key, Operator};
    ///
    /// assert_eq!(Key::parse("7").unwrap(), Key::Digit(7));
    /// assert_eq!(Key::parse("/").unwrap(), Key::Operator(Operator::Divide));
    /// assert_eq!(Key::parse("CE").unwrap(), Key::ClearEntry);
    /// assert!(Key::parse("sqrt").is_err());
    /// ```
    pub fn parse(label: &str) -> Result<Key, ValidationError> {
        let key = match label {
            "." => Key::Point,
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "*" => Key::Operator(Operator::Multiply),
            "/" => Key::Operator(Operator::Divide),
            "=" => Key::Equals,
            "%" => Key::Percent,
            "C" => Key::Clear,
            "CE" => Key::ClearEntry,
            "apply" => Key::Apply,
            _ => match label.as_bytes() {
                [d @ b'0'..=b'9'] => Key::Digit(d - b'0'),
                _ => {
                    return Err(ValidationError::invalid_format(
                        "key",
                        format!("unknown calculator key '{label}'"),
                    ))
                }
            },
        };
        Ok(key)
    }
}

impl FromStr for Key {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::parse(s)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Where the calculator is in an expression. Derived from the state, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CalculatorPhase {
    Idle,
    EnteringOperand,
    AwaitingSecondOperand,
    HasPendingOperator,
}

/// What the front end draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CalculatorView {
    pub display: String,
    pub pending_operator: Option<Operator>,
    pub phase: CalculatorPhase,
}

/// Calculator state. Transient: never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    display: String,
    pending: Option<Operator>,
    accumulator: Decimal,
    awaiting_operand: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Calculator {
            display: "0".to_string(),
            pending: None,
            accumulator: Decimal::ZERO,
            awaiting_operand: false,
        }
    }

    /// Handles one key press.
    ///
    /// Returns the amount to tender when `apply` is pressed on a display
    /// that parses as a non-negative number (rounded to cents); `None`
    /// otherwise.
    pub fn press(&mut self, key: Key) -> Option<Money> {
        match key {
            Key::Digit(d) => self.input(char::from(b'0' + d.min(9))),
            Key::Point => self.input('.'),
            Key::Operator(op) => {
                if self.pending.is_some() && !self.awaiting_operand {
                    self.equals();
                }
                self.pending = Some(op);
                self.accumulator = self.value().unwrap_or(Decimal::ZERO);
                self.awaiting_operand = true;
            }
            Key::Equals => self.equals(),
            Key::Percent => {
                let value = self.value().unwrap_or(Decimal::ZERO);
                self.show(value.checked_div(Decimal::ONE_HUNDRED));
            }
            Key::Clear => *self = Calculator::new(),
            Key::ClearEntry => self.display = "0".to_string(),
            Key::Apply => {
                return self
                    .value()
                    .and_then(Money::from_decimal)
                    .filter(|amount| !amount.is_negative())
            }
        }
        None
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending
    }

    pub fn phase(&self) -> CalculatorPhase {
        match (self.pending, self.awaiting_operand) {
            (Some(_), true) => CalculatorPhase::AwaitingSecondOperand,
            (Some(_), false) => CalculatorPhase::HasPendingOperator,
            (None, _) if self.display == "0" => CalculatorPhase::Idle,
            (None, _) => CalculatorPhase::EnteringOperand,
        }
    }

    pub fn view(&self) -> CalculatorView {
        CalculatorView {
            display: self.display.clone(),
            pending_operator: self.pending,
            phase: self.phase(),
        }
    }

    fn input(&mut self, c: char) {
        if self.awaiting_operand {
            self.display = if c == '.' { "0.".to_string() } else { c.to_string() };
            self.awaiting_operand = false;
        } else if self.display == "0" && c != '.' {
            self.display = c.to_string();
        } else if c == '.' && self.display.contains('.') {
            return;
        } else {
            self.display.push(c);
        }
        self.truncate();
    }

    fn equals(&mut self) {
        let Some(op) = self.pending.take() else {
            return;
        };
        let rhs = self.value().unwrap_or(Decimal::ZERO);
        self.show(op.apply(self.accumulator, rhs));
    }

    fn show(&mut self, result: Option<Decimal>) {
        let result = result.unwrap_or_else(|| {
            warn!(display = %self.display, "Calculator overflow, showing 0");
            Decimal::ZERO
        });
        self.display = result.normalize().to_string();
        self.truncate();
    }

    fn truncate(&mut self) {
        if self.display.chars().count() > CALCULATOR_MAX_DISPLAY_LEN {
            self.display = self.display.chars().take(CALCULATOR_MAX_DISPLAY_LEN).collect();
        }
    }

    /// The display as a number. A trailing point (`"12."`) is ignored.
    fn value(&self) -> Option<Decimal> {
        Decimal::from_str(self.display.trim_end_matches('.')).ok()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(labels: &[&str]) -> Calculator {
        let mut calc = Calculator::new();
        for label in labels {
            calc.press(Key::parse(label).unwrap());
        }
        calc
    }

    #[test]
    fn test_addition() {
        assert_eq!(run(&["7", "+", "3", "="]).display(), "10");
    }

    #[test]
    fn test_divide_by_zero_shows_zero() {
        assert_eq!(run(&["5", "/", "0", "="]).display(), "0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(run(&["5", "0", "%"]).display(), "0.5");
    }

    #[test]
    fn test_chained_operators_resolve_left_to_right() {
        let calc = run(&["2", "+", "3", "*"]);
        assert_eq!(calc.display(), "5");
        assert_eq!(calc.pending_operator(), Some(Operator::Multiply));

        assert_eq!(run(&["2", "+", "3", "*", "4", "="]).display(), "20");
    }

    #[test]
    fn test_operator_swap_does_not_evaluate() {
        let calc = run(&["9", "+", "-", "4", "="]);
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_decimal_arithmetic_is_exact() {
        assert_eq!(run(&[".", "1", "+", ".", "2", "="]).display(), "0.3");
        assert_eq!(run(&["1", "/", "4", "="]).display(), "0.25");
    }

    #[test]
    fn test_leading_zero_and_single_point() {
        assert_eq!(run(&["0", "0", "7"]).display(), "7");
        assert_eq!(run(&["1", ".", ".", "5", "."]).display(), "1.5");
        assert_eq!(run(&["."]).display(), "0.");
    }

    #[test]
    fn test_point_after_operator_starts_fraction() {
        assert_eq!(run(&["4", "*", ".", "5", "="]).display(), "2");
    }

    #[test]
    fn test_display_is_truncated() {
        let labels = vec!["9"; 20];
        assert_eq!(run(&labels).display().len(), CALCULATOR_MAX_DISPLAY_LEN);

        let calc = run(&["1", "/", "3", "="]);
        assert_eq!(calc.display(), "0.3333333333333");
    }

    #[test]
    fn test_clear_and_clear_entry() {
        let calc = run(&["8", "+", "5", "CE"]);
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.pending_operator(), Some(Operator::Add));

        let calc = run(&["8", "+", "5", "CE", "2", "="]);
        assert_eq!(calc.display(), "10");

        let calc = run(&["8", "+", "5", "C"]);
        assert_eq!(calc, Calculator::new());
        assert_eq!(calc.phase(), CalculatorPhase::Idle);
    }

    #[test]
    fn test_phases() {
        let mut calc = Calculator::new();
        assert_eq!(calc.phase(), CalculatorPhase::Idle);

        calc.press(Key::Digit(6));
        assert_eq!(calc.phase(), CalculatorPhase::EnteringOperand);

        calc.press(Key::Operator(Operator::Add));
        assert_eq!(calc.phase(), CalculatorPhase::AwaitingSecondOperand);

        calc.press(Key::Digit(4));
        assert_eq!(calc.phase(), CalculatorPhase::HasPendingOperator);

        calc.press(Key::Equals);
        assert_eq!(calc.phase(), CalculatorPhase::EnteringOperand);
        assert_eq!(calc.display(), "10");
    }

    #[test]
    fn test_apply_returns_amount() {
        let mut calc = run(&["2", "0", "0", "+", "5", "0", "="]);
        assert_eq!(calc.press(Key::Apply), Some(Money::from_cents(25000)));

        let mut calc = run(&["1", "2", ".", "3", "4", "5"]);
        assert_eq!(calc.press(Key::Apply), Some(Money::from_cents(1235)));

        // Other keys never tender
        assert_eq!(calc.press(Key::Digit(1)), None);
    }

    #[test]
    fn test_apply_ignores_negative_result() {
        let mut calc = run(&["0", "-", "5", "="]);
        assert_eq!(calc.display(), "-5");
        assert_eq!(calc.press(Key::Apply), None);
    }

    #[test]
    fn test_overflow_shows_zero() {
        // 999999999999999² is past the largest representable decimal
        let mut labels = vec!["9"; 15];
        labels.push("*");
        labels.extend(vec!["9"; 15]);
        labels.push("=");
        assert_eq!(run(&labels).display(), "0");
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert!(Key::parse("12").is_err());
        assert!(Key::parse("").is_err());
        assert!("x".parse::<Key>().is_err());
    }
}
