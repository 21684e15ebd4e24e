//! Expression AST for the Styl evaluator
//!
//! The parser produces this closed variant set; the evaluator's dispatch
//! over it is exhaustive. Every node carries the source line it came from
//! for error attribution.

use crate::number::format_float;
use crate::value::Separator;

/// Binary operators of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    /// Comparison and logical operators short-circuit to the comparator
    /// before any numeric coercion.
    pub fn is_comparison_or_logical(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::LessThanOrEqual
                | BinaryOp::GreaterThanOrEqual
                | BinaryOp::And
                | BinaryOp::Or
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "not",
        }
    }
}

/// A function-call argument. Spread arguments (`$args...`) are expanded by
/// the evaluator before dispatch; keyword arguments are partitioned off for
/// parameter-name matching (color adjustment functions rely on this).
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Expr),
    Keyword(String, Expr),
    Spread(Expr),
}

/// Expression AST nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal with the unit spelled in the source, if any.
    Number {
        value: f64,
        unit: Option<String>,
        line: usize,
    },

    /// String literal. `quoted` distinguishes `"red"` from the keyword `red`.
    Str {
        value: String,
        quoted: bool,
        line: usize,
    },

    /// Bare identifier (CSS keyword, color name, `true`/`false`/`null`).
    Identifier { name: String, line: usize },

    /// `$name` variable reference.
    Variable { name: String, line: usize },

    /// `namespace.property` module member access.
    PropertyAccess {
        namespace: String,
        property: String,
        line: usize,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        line: usize,
    },

    /// Binary operation. `parenthesized` records whether the source wrapped
    /// this node in parentheses; the division/separator heuristic needs it.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        parenthesized: bool,
        line: usize,
    },

    FunctionCall {
        name: String,
        args: Vec<Arg>,
        line: usize,
    },

    List {
        items: Vec<Expr>,
        separator: Separator,
        bracketed: bool,
        line: usize,
    },

    Map {
        entries: Vec<(Expr, Expr)>,
        line: usize,
    },

    /// Symbolic passthrough for text that must survive evaluation verbatim
    /// (selector fragments, operator tokens, unparsable CSS).
    Raw { text: String, line: usize },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Number { line, .. }
            | Expr::Str { line, .. }
            | Expr::Identifier { line, .. }
            | Expr::Variable { line, .. }
            | Expr::PropertyAccess { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Binary { line, .. }
            | Expr::FunctionCall { line, .. }
            | Expr::List { line, .. }
            | Expr::Map { line, .. }
            | Expr::Raw { line, .. } => *line,
        }
    }

    /// True for bare numeric literals; the slash-separator heuristic
    /// applies only between these.
    pub fn is_number_literal(&self) -> bool {
        matches!(self, Expr::Number { .. })
    }

    /// Symbolic CSS rendering for nodes that could not be evaluated:
    /// unresolved binaries become `calc(left OP right)`, variables stay
    /// as `$name`.
    pub fn to_css_string(&self) -> String {
        match self {
            Expr::Number { value, unit, .. } => {
                let mut s = format_float(*value);
                if let Some(u) = unit {
                    s.push_str(u);
                }
                s
            }
            Expr::Str { value, quoted, .. } => {
                if *quoted {
                    format!("\"{}\"", value)
                } else {
                    value.clone()
                }
            }
            Expr::Identifier { name, .. } => name.clone(),
            Expr::Variable { name, .. } => format!("${}", name),
            Expr::PropertyAccess {
                namespace, property, ..
            } => format!("{}.{}", namespace, property),
            Expr::Unary { op, operand, .. } => match op {
                UnaryOp::Not => format!("not {}", operand.to_css_string()),
                _ => format!("{}{}", op.as_str(), operand.to_css_string()),
            },
            Expr::Binary {
                op, left, right, ..
            } => format!(
                "calc({} {} {})",
                left.to_css_string(),
                op.as_str(),
                right.to_css_string()
            ),
            Expr::FunctionCall { name, args, .. } => {
                let rendered: Vec<String> = args
                    .iter()
                    .map(|arg| match arg {
                        Arg::Positional(e) => e.to_css_string(),
                        Arg::Keyword(k, e) => format!("${}: {}", k, e.to_css_string()),
                        Arg::Spread(e) => format!("{}...", e.to_css_string()),
                    })
                    .collect();
                format!("{}({})", name, rendered.join(", "))
            }
            Expr::List {
                items,
                separator,
                bracketed,
                ..
            } => {
                let joined = items
                    .iter()
                    .map(Expr::to_css_string)
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                if *bracketed {
                    format!("[{}]", joined)
                } else {
                    joined
                }
            }
            Expr::Map { entries, .. } => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_css_string(), v.to_css_string()))
                    .collect();
                format!("({})", rendered.join(", "))
            }
            Expr::Raw { text, .. } => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_binary_renders_as_calc() {
        let expr = Expr::Binary {
            op: BinaryOp::Add,
            left: Box::new(Expr::Number {
                value: 10.0,
                unit: Some("px".to_string()),
                line: 1,
            }),
            right: Box::new(Expr::Variable {
                name: "gap".to_string(),
                line: 1,
            }),
            parenthesized: false,
            line: 1,
        };
        assert_eq!(expr.to_css_string(), "calc(10px + $gap)");
    }

    #[test]
    fn test_number_rendering_strips_leading_zero() {
        let expr = Expr::Number {
            value: 0.5,
            unit: Some("em".to_string()),
            line: 1,
        };
        assert_eq!(expr.to_css_string(), ".5em");
    }
}
