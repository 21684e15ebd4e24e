//! Central operator dispatch over already-evaluated operands
//!
//! Given two evaluated values and an operator, decide which semantic domain
//! applies, in order: force lazy wrappers, comparison/logical delegation,
//! string concatenation on `+`, numeric arithmetic, CSS slash passthrough
//! for `/` between plain strings, symbolic `calc()` fallback, and finally
//! a hard `UndefinedOperation` for the nonsensical residue.

use crate::arithmetic::ArithmeticCalculator;
use crate::ast::BinaryOp;
use crate::comparator::ValueComparator;
use crate::error::{CompilerError, Result};
use crate::lazy;
use crate::value::Value;

pub struct OperationEvaluator {
    calc: ArithmeticCalculator,
    cmp: ValueComparator,
}

impl OperationEvaluator {
    pub fn new() -> Self {
        Self {
            calc: ArithmeticCalculator::new(),
            cmp: ValueComparator::new(),
        }
    }

    pub fn evaluate(&self, op: BinaryOp, left: Value, right: Value) -> Result<Value> {
        let left = lazy::force(left)?;
        let right = lazy::force(right)?;

        if op.is_comparison_or_logical() {
            return Ok(Value::Bool(self.cmp.compare(op, &left, &right)?));
        }

        let left_dim = self.calc.try_to_dimension(&left);
        let right_dim = self.calc.try_to_dimension(&right);
        // a plain string has no numeric interpretation
        let left_plain = matches!(left, Value::Str { .. }) && left_dim.is_none();
        let right_plain = matches!(right, Value::Str { .. }) && right_dim.is_none();

        if op == BinaryOp::Add && (left_plain || right_plain) {
            return Ok(self.concatenate(&left, &right));
        }

        if let (Some(l), Some(r)) = (&left_dim, &right_dim) {
            // Additive arithmetic on irreconcilable units is deferred to
            // the browser as calc(); division/modulo have no CSS meaning
            // there and stay hard errors.
            if matches!(op, BinaryOp::Add | BinaryOp::Subtract)
                && l.unit.is_some()
                && r.unit.is_some()
                && !l.is_compatible_with(r)
            {
                return Ok(self.css_fallback(op, &left, &right));
            }
            if let Some(result) = self.calc.calculate(op, &left, &right)? {
                return Ok(result);
            }
        }

        if left_plain && right_plain {
            match op {
                // `font: 16px/1.5`-style shorthand: `/` between two
                // non-numeric strings is valid CSS, not an error
                BinaryOp::Divide => {
                    return Ok(Value::unquoted(format!(
                        "{} / {}",
                        render_operand(&left),
                        render_operand(&right)
                    )));
                }
                BinaryOp::Multiply | BinaryOp::Modulo => {
                    return Err(CompilerError::UndefinedOperation {
                        left: render_operand(&left),
                        op: op.as_str().to_string(),
                        right: render_operand(&right),
                    });
                }
                _ => {}
            }
        }

        Ok(self.css_fallback(op, &left, &right))
    }

    /// String concatenation for `+`. Numeric sides render to canonical
    /// form and join directly, no space, in left-right order. The result
    /// is quoted if either side was.
    fn concatenate(&self, left: &Value, right: &Value) -> Value {
        let quoted = is_quoted(left) || is_quoted(right);
        let text = format!("{}{}", render_operand(left), render_operand(right));
        Value::Str { text, quoted }
    }

    /// Symbolic `calc()` rendering for operations that cannot be resolved
    /// at compile time. This is a valid outcome, not an error.
    fn css_fallback(&self, op: BinaryOp, left: &Value, right: &Value) -> Value {
        Value::unquoted(format!(
            "calc({} {} {})",
            left.to_css_string(),
            op.as_str(),
            right.to_css_string()
        ))
    }
}

impl Default for OperationEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_quoted(value: &Value) -> bool {
    matches!(value, Value::Str { quoted: true, .. })
}

/// Rendering used for concatenation and slash passthrough: string content
/// without its quotes, everything else in canonical CSS form.
fn render_operand(value: &Value) -> String {
    match value {
        Value::Str { text, .. } => text.clone(),
        other => other.to_css_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lazy::LazyValue;

    fn eval(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
        OperationEvaluator::new().evaluate(op, left, right)
    }

    #[test]
    fn test_arithmetic_path() {
        let result = eval(
            BinaryOp::Add,
            Value::dimension(10.0, "px"),
            Value::dimension(5.0, "px"),
        )
        .unwrap();
        assert_eq!(result, Value::dimension(15.0, "px"));
    }

    #[test]
    fn test_comparison_short_circuits() {
        let result = eval(
            BinaryOp::Equal,
            Value::dimension(96.0, "px"),
            Value::dimension(1.0, "in"),
        )
        .unwrap();
        assert_eq!(result, Value::Bool(true));
    }

    #[test]
    fn test_string_concatenation() {
        let result = eval(
            BinaryOp::Add,
            Value::quoted("Hello "),
            Value::unquoted("world"),
        )
        .unwrap();
        assert_eq!(result, Value::quoted("Hello world"));
    }

    #[test]
    fn test_number_string_concatenation() {
        let result = eval(
            BinaryOp::Add,
            Value::dimension(10.0, "px"),
            Value::unquoted("-wide"),
        )
        .unwrap();
        assert_eq!(result, Value::unquoted("10px-wide"));

        let result = eval(
            BinaryOp::Add,
            Value::unquoted("width-"),
            Value::dimension(0.5, "em"),
        )
        .unwrap();
        assert_eq!(result, Value::unquoted("width-.5em"));
    }

    #[test]
    fn test_slash_between_plain_strings() {
        let result = eval(
            BinaryOp::Divide,
            Value::unquoted("serif"),
            Value::unquoted("fallback"),
        )
        .unwrap();
        assert_eq!(result, Value::unquoted("serif / fallback"));
    }

    #[test]
    fn test_numeric_strings_still_divide() {
        let result = eval(
            BinaryOp::Divide,
            Value::unquoted("96px"),
            Value::unquoted("1in"),
        )
        .unwrap();
        assert_eq!(result, Value::number(1.0));
    }

    #[test]
    fn test_incompatible_additive_units_defer_to_calc() {
        let result = eval(
            BinaryOp::Add,
            Value::dimension(10.0, "px"),
            Value::dimension(2.0, "em"),
        )
        .unwrap();
        assert_eq!(result, Value::unquoted("calc(10px + 2em)"));
    }

    #[test]
    fn test_incompatible_division_is_hard_error() {
        let err = eval(
            BinaryOp::Divide,
            Value::dimension(10.0, "px"),
            Value::dimension(2.0, "deg"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide px by deg: incompatible units");
    }

    #[test]
    fn test_fallback_for_structured_operand() {
        let result = eval(
            BinaryOp::Add,
            Value::dimension(10.0, "px"),
            Value::Map(vec![(Value::unquoted("a"), Value::number(1.0))]),
        )
        .unwrap();
        assert!(result.to_css_string().contains("calc("));
    }

    #[test]
    fn test_undefined_operation() {
        let err = eval(
            BinaryOp::Multiply,
            Value::unquoted("serif"),
            Value::unquoted("bold"),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Undefined operation \"serif * bold\".");
    }

    #[test]
    fn test_lazy_operands_forced_first() {
        let lazy = LazyValue::new(|| Ok(Value::dimension(4.0, "px"))).into_value();
        let result = eval(BinaryOp::Multiply, lazy, Value::number(2.0)).unwrap();
        assert_eq!(result, Value::dimension(8.0, "px"));
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let err = eval(BinaryOp::Divide, Value::number(1.0), Value::number(0.0)).unwrap_err();
        assert_eq!(err.to_string(), "Division by zero");
    }
}
