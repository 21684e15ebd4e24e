//! Arithmetic dispatch over the dynamic value domain
//!
//! A thin layer translating runtime values into `Dimension`s and
//! dispatching the five binary arithmetic operators plus unary negate.
//! `calculate` returns `Ok(None)` (not an error) when either operand cannot
//! be coerced to a number; callers treat that as "fall back to symbolic or
//! string form".

use regex::Regex;

use crate::ast::BinaryOp;
use crate::error::{CompilerError, Result};
use crate::number::Dimension;
use crate::units;
use crate::value::Value;

pub struct ArithmeticCalculator {
    numeric: Regex,
}

impl ArithmeticCalculator {
    pub fn new() -> Self {
        Self {
            // float prefix, optionally followed by a unit token with at
            // most one space between; anything trailing invalidates
            numeric: Regex::new(r"^(-?(?:\d+\.?\d*|\.\d+)) ?([a-zA-Z%]+)?$").unwrap(),
        }
    }

    /// Parse a string as `number [unit]`. Trailing garbage after the
    /// number invalidates the whole match: `"123abc"` is not numeric.
    pub fn try_parse_numeric_string(&self, input: &str) -> Option<Dimension> {
        let caps = self.numeric.captures(input.trim())?;
        let value: f64 = caps[1].parse().ok()?;
        match caps.get(2) {
            Some(unit) => {
                if units::is_recognized_unit(unit.as_str()) {
                    Some(Dimension::with_unit(value, unit.as_str()))
                } else {
                    None
                }
            }
            None => Some(Dimension::unitless(value)),
        }
    }

    /// Coerce a value to a `Dimension` if it has a numeric interpretation.
    pub fn try_to_dimension(&self, value: &Value) -> Option<Dimension> {
        match value {
            Value::Dimension(d) => Some(d.clone()),
            Value::Str { text, .. } => self.try_parse_numeric_string(text),
            _ => None,
        }
    }

    /// Coerce or fail with a rendering of the rejected value.
    pub fn to_dimension(&self, value: &Value) -> Result<Dimension> {
        self.try_to_dimension(value)
            .ok_or_else(|| CompilerError::conversion(value.render_for_error()))
    }

    /// Evaluate `left op right` numerically. `Ok(None)` signals that one
    /// side has no numeric interpretation and another strategy applies.
    pub fn calculate(&self, op: BinaryOp, left: &Value, right: &Value) -> Result<Option<Value>> {
        let (lhs, rhs) = match (self.try_to_dimension(left), self.try_to_dimension(right)) {
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(None),
        };

        let result = match op {
            BinaryOp::Add => lhs.add(&rhs)?,
            BinaryOp::Subtract => lhs.subtract(&rhs)?,
            BinaryOp::Multiply => lhs.multiply(&rhs),
            BinaryOp::Divide => lhs.divide(&rhs)?,
            BinaryOp::Modulo => lhs.modulo(&rhs)?,
            other => {
                return Err(CompilerError::UnknownArithmeticOperator {
                    op: other.as_str().to_string(),
                })
            }
        };
        Ok(Some(Value::Dimension(result)))
    }

    /// Unary negation; a hard error when the operand is not numeric.
    pub fn negate(&self, value: &Value) -> Result<Value> {
        let dim = self.to_dimension(value)?;
        Ok(Value::Dimension(dim.negate()))
    }
}

impl Default for ArithmeticCalculator {
    fn default() -> Self {
        Self::new()
    }
}
