//! Unit-aware numeric values
//!
//! `Dimension` is the base arithmetic type of the language: an immutable
//! float paired with an optional CSS unit. Every operation returns a new
//! instance. Unit resolution follows preprocessor convention, not
//! dimensional analysis: `px * px` is still `px`.

use crate::error::{CompilerError, Result};
use crate::units;

/// A numeric value with an optional unit.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub value: f64,
    pub unit: Option<String>,
}

impl Dimension {
    pub fn new(value: f64, unit: Option<String>) -> Self {
        Self { value, unit }
    }

    pub fn unitless(value: f64) -> Self {
        Self { value, unit: None }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: Some(unit.into()),
        }
    }

    fn unit_str(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }

    /// True when both are unitless or both units sit in the same family
    /// (including literally the same unit).
    pub fn is_compatible_with(&self, other: &Dimension) -> bool {
        match (&self.unit, &other.unit) {
            (None, _) | (_, None) => true,
            (Some(a), Some(b)) => units::units_compatible(a, b),
        }
    }

    /// Convert to `target` units. Undefined (returns `None`) when either
    /// unit is outside a known family or the units sit in different
    /// families; callers check `is_compatible_with` first.
    pub fn convert_to(&self, target: &str) -> Option<Dimension> {
        match &self.unit {
            None => Some(Dimension::with_unit(self.value, target)),
            Some(unit) => {
                let factor = units::conversion_factor(unit, target)?;
                Some(Dimension::with_unit(self.value * factor, target))
            }
        }
    }

    /// Bring `other` into this value's unit for combination. Unitless sides
    /// adopt the other side's unit unchanged.
    fn align(&self, other: &Dimension) -> Result<f64> {
        match (&self.unit, &other.unit) {
            (_, None) | (None, _) => Ok(other.value),
            (Some(a), Some(b)) => {
                if a == b {
                    Ok(other.value)
                } else if units::units_compatible(a, b) {
                    // compatible, different units: convert other to ours
                    Ok(other.value * units::conversion_factor(b, a).unwrap_or(1.0))
                } else {
                    Err(CompilerError::incompatible_units(b.clone(), a.clone()))
                }
            }
        }
    }

    fn combined_unit(&self, other: &Dimension) -> Option<String> {
        self.unit.clone().or_else(|| other.unit.clone())
    }

    pub fn add(&self, other: &Dimension) -> Result<Dimension> {
        let rhs = self.align(other).map_err(|_| {
            CompilerError::incompatible_units(self.unit_str(), other.unit_str())
        })?;
        Ok(Dimension::new(self.value + rhs, self.combined_unit(other)))
    }

    pub fn subtract(&self, other: &Dimension) -> Result<Dimension> {
        let rhs = self.align(other).map_err(|_| {
            CompilerError::incompatible_units(self.unit_str(), other.unit_str())
        })?;
        Ok(Dimension::new(self.value - rhs, self.combined_unit(other)))
    }

    /// Numeric product. Result unit is this value's unit if present, else
    /// the other's ("first unit wins").
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        Dimension::new(self.value * other.value, self.combined_unit(other))
    }

    pub fn divide(&self, other: &Dimension) -> Result<Dimension> {
        if other.value == 0.0 {
            return Err(CompilerError::DivisionByZero);
        }
        match (&self.unit, &other.unit) {
            (_, None) => Ok(Dimension::new(self.value / other.value, self.unit.clone())),
            (None, Some(u)) => Ok(Dimension::with_unit(self.value / other.value, u.clone())),
            (Some(a), Some(b)) => {
                if a == b {
                    Ok(Dimension::unitless(self.value / other.value))
                } else if units::units_compatible(a, b) {
                    let divisor = other.value * units::conversion_factor(b, a).unwrap_or(1.0);
                    Ok(Dimension::unitless(self.value / divisor))
                } else {
                    Err(CompilerError::IncompatibleDivision {
                        left: a.clone(),
                        right: b.clone(),
                    })
                }
            }
        }
    }

    /// Floating-point remainder; sign follows the dividend.
    pub fn modulo(&self, other: &Dimension) -> Result<Dimension> {
        if other.value == 0.0 {
            return Err(CompilerError::ModuloByZero);
        }
        let divisor = match (&self.unit, &other.unit) {
            (Some(a), Some(b)) if a != b => {
                if units::units_compatible(a, b) {
                    other.value * units::conversion_factor(b, a).unwrap_or(1.0)
                } else {
                    return Err(CompilerError::IncompatibleModulo {
                        left: a.clone(),
                        right: b.clone(),
                    });
                }
            }
            _ => other.value,
        };
        Ok(Dimension::new(self.value % divisor, self.combined_unit(other)))
    }

    pub fn negate(&self) -> Dimension {
        Dimension::new(-self.value, self.unit.clone())
    }

    /// Unit-aware ordering. Fails when the units cannot be reconciled.
    pub fn compare(&self, other: &Dimension) -> Result<std::cmp::Ordering> {
        if !self.is_compatible_with(other) {
            return Err(CompilerError::NonNumericComparison);
        }
        let rhs = self.align(other)?;
        Ok(self
            .value
            .partial_cmp(&rhs)
            .unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Canonical CSS rendering: trailing zeros stripped, no leading zero
    /// before a decimal point (`0.5` renders as `.5`).
    pub fn to_css_string(&self) -> String {
        let mut out = format_float(self.value);
        if let Some(unit) = &self.unit {
            out.push_str(unit);
        }
        out
    }
}

/// Unit-compatible numeric equality (after conversion), never structural.
/// Incompatible units compare unequal rather than erroring.
impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_compatible_with(other) {
            return false;
        }
        match self.align(other) {
            Ok(rhs) => (self.value - rhs).abs() < 1e-9,
            Err(_) => false,
        }
    }
}

/// Format a float the way CSS output expects: integers without a decimal
/// point, fractions with trailing zeros stripped and the leading `0`
/// before the point dropped.
pub fn format_float(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let mut s = format!("{:.10}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if let Some(stripped) = s.strip_prefix("0.") {
        s = format!(".{}", stripped);
    } else if let Some(stripped) = s.strip_prefix("-0.") {
        s = format!("-.{}", stripped);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_same_unit() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(5.0, "px");
        assert_eq!(a.add(&b).unwrap(), Dimension::with_unit(15.0, "px"));
    }

    #[test]
    fn test_add_unitless_adopts_unit() {
        let a = Dimension::unitless(10.0);
        let b = Dimension::with_unit(5.0, "em");
        assert_eq!(a.add(&b).unwrap(), Dimension::with_unit(15.0, "em"));
    }

    #[test]
    fn test_add_converts_compatible_units() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(1.0, "in");
        assert_eq!(a.add(&b).unwrap(), Dimension::with_unit(106.0, "px"));
    }

    #[test]
    fn test_add_incompatible_units_fails() {
        let a = Dimension::with_unit(1.0, "px");
        let b = Dimension::with_unit(1.0, "deg");
        let err = a.add(&b).unwrap_err();
        assert!(err.to_string().contains("Incompatible units"));
    }

    #[test]
    fn test_multiply_first_unit_wins() {
        let a = Dimension::with_unit(4.0, "px");
        let b = Dimension::with_unit(2.0, "em");
        assert_eq!(a.multiply(&b), Dimension::with_unit(8.0, "px"));

        let a = Dimension::unitless(4.0);
        let b = Dimension::with_unit(2.0, "em");
        assert_eq!(a.multiply(&b), Dimension::with_unit(8.0, "em"));
    }

    #[test]
    fn test_divide_cancels_units() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(2.0, "px");
        let result = a.divide(&b).unwrap();
        assert_eq!(result.value, 5.0);
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_divide_converts_compatible() {
        // 96px / 1in = 1 (unitless)
        let a = Dimension::with_unit(96.0, "px");
        let b = Dimension::with_unit(1.0, "in");
        let result = a.divide(&b).unwrap();
        assert_eq!(result.value, 1.0);
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_divide_by_zero() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::unitless(0.0);
        assert_eq!(a.divide(&b).unwrap_err(), CompilerError::DivisionByZero);
    }

    #[test]
    fn test_divide_incompatible_units() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(2.0, "s");
        let err = a.divide(&b).unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide px by s: incompatible units");
    }

    #[test]
    fn test_division_identity() {
        let n = Dimension::with_unit(42.0, "rem");
        let result = n.divide(&n).unwrap();
        assert_eq!(result.value, 1.0);
        assert_eq!(result.unit, None);
    }

    #[test]
    fn test_modulo_sign_follows_dividend() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(3.0, "px");
        assert_eq!(a.modulo(&b).unwrap(), Dimension::with_unit(1.0, "px"));

        let a = Dimension::unitless(-7.0);
        let b = Dimension::unitless(3.0);
        assert_eq!(a.modulo(&b).unwrap().value, -1.0);
    }

    #[test]
    fn test_modulo_by_zero() {
        let a = Dimension::unitless(10.0);
        let b = Dimension::unitless(0.0);
        assert_eq!(a.modulo(&b).unwrap_err(), CompilerError::ModuloByZero);
    }

    #[test]
    fn test_modulo_incompatible_units() {
        let a = Dimension::with_unit(10.0, "px");
        let b = Dimension::with_unit(3.0, "deg");
        let err = a.modulo(&b).unwrap_err();
        assert_eq!(err.to_string(), "Incompatible units for '%': px and deg");
    }

    #[test]
    fn test_unit_round_trip() {
        let n = Dimension::with_unit(12.5, "px");
        for target in ["in", "cm", "mm", "pt", "pc"] {
            let round_tripped = n
                .convert_to(target)
                .unwrap()
                .convert_to("px")
                .unwrap();
            assert!((round_tripped.value - n.value).abs() < 1e-9, "{target}");
        }
    }

    #[test]
    fn test_equality_across_units() {
        assert_eq!(
            Dimension::with_unit(96.0, "px"),
            Dimension::with_unit(1.0, "in")
        );
        assert_ne!(
            Dimension::with_unit(1.0, "px"),
            Dimension::with_unit(1.0, "deg")
        );
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.5), ".5");
        assert_eq!(format_float(-0.5), "-.5");
        assert_eq!(format_float(10.0), "10");
        assert_eq!(format_float(1.25), "1.25");
        assert_eq!(format_float(1.5000000000), "1.5");
    }

    #[test]
    fn test_css_rendering() {
        assert_eq!(Dimension::with_unit(0.5, "em").to_css_string(), ".5em");
        assert_eq!(Dimension::unitless(16.0).to_css_string(), "16");
    }
}
