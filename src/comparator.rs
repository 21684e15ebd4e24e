//! Equality, ordering and truthiness over the dynamic value domain

use crate::arithmetic::ArithmeticCalculator;
use crate::ast::BinaryOp;
use crate::error::{CompilerError, Result};
use crate::value::Value;

pub struct ValueComparator {
    calc: ArithmeticCalculator,
}

impl ValueComparator {
    pub fn new() -> Self {
        Self {
            calc: ArithmeticCalculator::new(),
        }
    }

    /// Language-level equality.
    ///
    /// Decision order: structural identity (covers null == null), null
    /// against anything else, numeric comparison after unit normalization
    /// when both sides coerce, element-wise list/map recursion, string
    /// equality with surrounding quotes stripped, and finally canonical-
    /// rendering equality. The rendering fallback replaces host-language
    /// loose equality; it never equates 0, false and "" since their
    /// renderings differ.
    pub fn equals(&self, left: &Value, right: &Value) -> bool {
        if left == right {
            return true;
        }
        if matches!(left, Value::Null) || matches!(right, Value::Null) {
            return false;
        }

        if let (Some(l), Some(r)) = (
            self.calc.try_to_dimension(left),
            self.calc.try_to_dimension(right),
        ) {
            // unit-aware; incompatible units are unequal, never an error
            return l == r;
        }

        match (left, right) {
            (Value::List { items: a, .. }, Value::List { items: b, .. }) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|(x, y)| self.equals(x, y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
                        self.equals(ka, kb) && self.equals(va, vb)
                    })
            }
            (Value::Str { text: a, .. }, Value::Str { text: b, .. }) => a == b,
            _ => left.to_css_string() == right.to_css_string(),
        }
    }

    /// Numeric ordering. Both sides coercible: unit-aware comparison.
    /// Otherwise a raw-float fallback where `null` counts as zero; if
    /// neither side yields a number the comparison fails.
    fn ordering(&self, left: &Value, right: &Value) -> Result<std::cmp::Ordering> {
        if let (Some(l), Some(r)) = (
            self.calc.try_to_dimension(left),
            self.calc.try_to_dimension(right),
        ) {
            return l.compare(&r);
        }

        let lf = self.raw_float(left);
        let rf = self.raw_float(right);
        match (lf, rf) {
            (Some(l), Some(r)) => Ok(l
                .partial_cmp(&r)
                .unwrap_or(std::cmp::Ordering::Equal)),
            _ => Err(CompilerError::NonNumericComparison),
        }
    }

    fn raw_float(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Null => Some(0.0),
            other => self.calc.try_to_dimension(other).map(|d| d.value),
        }
    }

    pub fn less_than(&self, left: &Value, right: &Value) -> Result<bool> {
        Ok(self.ordering(left, right)? == std::cmp::Ordering::Less)
    }

    pub fn greater_than(&self, left: &Value, right: &Value) -> Result<bool> {
        Ok(self.ordering(left, right)? == std::cmp::Ordering::Greater)
    }

    pub fn less_than_or_equal(&self, left: &Value, right: &Value) -> Result<bool> {
        Ok(self.ordering(left, right)? != std::cmp::Ordering::Greater)
    }

    pub fn greater_than_or_equal(&self, left: &Value, right: &Value) -> Result<bool> {
        Ok(self.ordering(left, right)? != std::cmp::Ordering::Less)
    }

    /// `false`, `null` and the literal string "null" (case-insensitive)
    /// are falsy; everything else, including 0, "" and empty lists, is
    /// truthy.
    pub fn is_truthy(&self, value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Null => false,
            Value::Str { text, .. } => !text.eq_ignore_ascii_case("null"),
            _ => true,
        }
    }

    pub fn and(&self, left: &Value, right: &Value) -> bool {
        self.is_truthy(left) && self.is_truthy(right)
    }

    pub fn or(&self, left: &Value, right: &Value) -> bool {
        self.is_truthy(left) || self.is_truthy(right)
    }

    pub fn not(&self, value: &Value) -> bool {
        !self.is_truthy(value)
    }

    /// Dispatch a comparison or logical operator to a boolean result.
    pub fn compare(&self, op: BinaryOp, left: &Value, right: &Value) -> Result<bool> {
        match op {
            BinaryOp::Equal => Ok(self.equals(left, right)),
            BinaryOp::NotEqual => Ok(!self.equals(left, right)),
            BinaryOp::LessThan => self.less_than(left, right),
            BinaryOp::GreaterThan => self.greater_than(left, right),
            BinaryOp::LessThanOrEqual => self.less_than_or_equal(left, right),
            BinaryOp::GreaterThanOrEqual => self.greater_than_or_equal(left, right),
            BinaryOp::And => Ok(self.and(left, right)),
            BinaryOp::Or => Ok(self.or(left, right)),
            other => Err(CompilerError::UnknownComparisonOperator {
                op: other.as_str().to_string(),
            }),
        }
    }
}

impl Default for ValueComparator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Separator;

    #[test]
    fn test_equals_across_units() {
        let cmp = ValueComparator::new();
        assert!(cmp.equals(&Value::dimension(96.0, "px"), &Value::dimension(1.0, "in")));
        assert!(!cmp.equals(&Value::dimension(1.0, "px"), &Value::dimension(1.0, "deg")));
    }

    #[test]
    fn test_equals_numeric_string_vs_dimension() {
        let cmp = ValueComparator::new();
        assert!(cmp.equals(&Value::unquoted("10px"), &Value::dimension(10.0, "px")));
        assert!(cmp.equals(&Value::unquoted("1in"), &Value::dimension(96.0, "px")));
    }

    #[test]
    fn test_equals_null_handling() {
        let cmp = ValueComparator::new();
        assert!(cmp.equals(&Value::Null, &Value::Null));
        assert!(!cmp.equals(&Value::Null, &Value::number(0.0)));
        assert!(!cmp.equals(&Value::Null, &Value::Bool(false)));
    }

    #[test]
    fn test_equals_strips_quotes() {
        let cmp = ValueComparator::new();
        assert!(cmp.equals(&Value::quoted("bold"), &Value::unquoted("bold")));
        assert!(!cmp.equals(&Value::quoted("bold"), &Value::unquoted("italic")));
    }

    #[test]
    fn test_equals_lists() {
        let cmp = ValueComparator::new();
        let a = Value::List {
            items: vec![Value::dimension(96.0, "px"), Value::unquoted("solid")],
            separator: Separator::Space,
            bracketed: false,
        };
        let b = Value::List {
            items: vec![Value::dimension(1.0, "in"), Value::quoted("solid")],
            separator: Separator::Space,
            bracketed: false,
        };
        assert!(cmp.equals(&a, &b));
    }

    #[test]
    fn test_loose_fallback_never_equates_falsy_families() {
        let cmp = ValueComparator::new();
        assert!(!cmp.equals(&Value::number(0.0), &Value::Bool(false)));
        assert!(!cmp.equals(&Value::Bool(false), &Value::unquoted("")));
    }

    #[test]
    fn test_ordering_unit_aware() {
        let cmp = ValueComparator::new();
        assert!(cmp
            .less_than(&Value::dimension(1.0, "cm"), &Value::dimension(1.0, "in"))
            .unwrap());
        assert!(cmp
            .greater_than_or_equal(&Value::dimension(96.0, "px"), &Value::dimension(1.0, "in"))
            .unwrap());
    }

    #[test]
    fn test_ordering_null_as_zero_in_fallback() {
        let cmp = ValueComparator::new();
        assert!(cmp.less_than(&Value::Null, &Value::number(1.0)).unwrap());
    }

    #[test]
    fn test_ordering_non_numeric_fails() {
        let cmp = ValueComparator::new();
        let err = cmp
            .less_than(&Value::unquoted("bold"), &Value::unquoted("wide"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot compare non-numeric values");
    }

    #[test]
    fn test_truthiness() {
        let cmp = ValueComparator::new();
        assert!(!cmp.is_truthy(&Value::Bool(false)));
        assert!(!cmp.is_truthy(&Value::Null));
        assert!(!cmp.is_truthy(&Value::unquoted("NULL")));
        assert!(cmp.is_truthy(&Value::number(0.0)));
        assert!(cmp.is_truthy(&Value::unquoted("")));
        assert!(cmp.is_truthy(&Value::List {
            items: Vec::new(),
            separator: Separator::Comma,
            bracketed: false,
        }));
    }

    #[test]
    fn test_logical_operators() {
        let cmp = ValueComparator::new();
        assert!(cmp.and(&Value::Bool(true), &Value::number(0.0)));
        assert!(!cmp.and(&Value::Bool(true), &Value::Null));
        assert!(cmp.or(&Value::Null, &Value::unquoted("x")));
        assert!(cmp.not(&Value::Null));
    }

    #[test]
    fn test_unknown_comparison_operator() {
        let cmp = ValueComparator::new();
        let err = cmp
            .compare(BinaryOp::Add, &Value::Null, &Value::Null)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown comparison operator: +");
    }
}
