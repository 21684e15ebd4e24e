//! Error types for the Styl evaluator

use thiserror::Error;

/// All failures in the evaluation core.
///
/// Every variant carries a human-readable message; the variant set mirrors
/// the logical failure categories (unit incompatibility, arithmetic domain
/// errors, conversion, comparison, undefined lookups, invalid colors) so
/// callers can match on the category while the rendered message stays stable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Incompatible units: {left} and {right}")]
    IncompatibleUnits { left: String, right: String },

    #[error("Cannot divide {left} by {right}: incompatible units")]
    IncompatibleDivision { left: String, right: String },

    #[error("Incompatible units for '%': {left} and {right}")]
    IncompatibleModulo { left: String, right: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Cannot convert value to number: {rendered}")]
    Conversion { rendered: String },

    #[error("Cannot compare non-numeric values")]
    NonNumericComparison,

    #[error("Unknown arithmetic operator: {op}")]
    UnknownArithmeticOperator { op: String },

    #[error("Unknown comparison operator: {op}")]
    UnknownComparisonOperator { op: String },

    #[error("Unknown adjustment parameter: {param}")]
    UnknownAdjustmentParameter { param: String },

    #[error("Unknown scaling parameter: {param}")]
    UnknownScalingParameter { param: String },

    #[error("Unknown changing parameter: {param}")]
    UnknownChangingParameter { param: String },

    #[error("Undefined variable: ${name}")]
    UndefinedVariable { name: String },

    #[error("Undefined mixin: {name}")]
    UndefinedMixin { name: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("Undefined property: ${property} in module ${module}")]
    UndefinedProperty { module: String, property: String },

    #[error("Undefined operation \"{left} {op} {right}\".")]
    UndefinedOperation {
        left: String,
        op: String,
        right: String,
    },

    #[error("Invalid color format: {value}")]
    InvalidColor { value: String },

    #[error("Invalid alpha value: {value}")]
    InvalidAlpha { value: String },

    #[error("Invalid saturation value: {value}")]
    InvalidSaturation { value: String },

    #[error("Invalid lightness value: {value}")]
    InvalidLightness { value: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, CompilerError>;

impl CompilerError {
    pub fn incompatible_units(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::IncompatibleUnits {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable { name: name.into() }
    }

    pub fn undefined_mixin(name: impl Into<String>) -> Self {
        Self::UndefinedMixin { name: name.into() }
    }

    pub fn undefined_function(name: impl Into<String>) -> Self {
        Self::UndefinedFunction { name: name.into() }
    }

    pub fn undefined_property(module: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UndefinedProperty {
            module: module.into(),
            property: property.into(),
        }
    }

    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    pub fn conversion(rendered: impl Into<String>) -> Self {
        Self::Conversion {
            rendered: rendered.into(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
