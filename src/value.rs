//! The dynamic value domain flowing through evaluation
//!
//! A closed sum type replaces the duck-typed mix of numbers, strings,
//! lists and AST passthroughs the language semantics call for. Colors are
//! represented as formatted strings once produced, not a distinct runtime
//! variant.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Expr;
use crate::lazy::LazyValue;
use crate::number::Dimension;

/// List delimiter semantics, affecting both spread expansion and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Space,
    Slash,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::Space => " ",
            Separator::Slash => "/",
        }
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Dimension(Dimension),
    /// Quoting is part of the value: `"red"` and `red` are distinct.
    Str {
        text: String,
        quoted: bool,
    },
    Bool(bool),
    Null,
    List {
        items: Vec<Value>,
        separator: Separator,
        bracketed: bool,
    },
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    /// Deferred computation, forced at most once on first read.
    Lazy(Rc<RefCell<LazyValue>>),
    /// Symbolic AST passthrough for values that stay unresolved.
    Raw(Box<Expr>),
}

impl Value {
    pub fn quoted(text: impl Into<String>) -> Self {
        Value::Str {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn unquoted(text: impl Into<String>) -> Self {
        Value::Str {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn number(value: f64) -> Self {
        Value::Dimension(Dimension::unitless(value))
    }

    pub fn dimension(value: f64, unit: impl Into<String>) -> Self {
        Value::Dimension(Dimension::with_unit(value, unit))
    }

    pub fn as_dimension(&self) -> Option<&Dimension> {
        match self {
            Value::Dimension(d) => Some(d),
            _ => None,
        }
    }

    /// Canonical CSS rendering of a terminal value.
    pub fn to_css_string(&self) -> String {
        match self {
            Value::Dimension(d) => d.to_css_string(),
            Value::Str { text, quoted } => {
                if *quoted {
                    format!("\"{}\"", text)
                } else {
                    text.clone()
                }
            }
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::List {
                items,
                separator,
                bracketed,
            } => {
                let joined = items
                    .iter()
                    .map(Value::to_css_string)
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                if *bracketed {
                    format!("[{}]", joined)
                } else {
                    joined
                }
            }
            Value::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.to_css_string(), v.to_css_string()))
                    .collect();
                format!("({})", rendered.join(", "))
            }
            Value::Lazy(cell) => match cell.borrow().cached() {
                Some(v) => v.to_css_string(),
                None => "null".to_string(),
            },
            Value::Raw(expr) => expr.to_css_string(),
        }
    }

    /// Rendering used inside error messages: strings force-quoted, booleans
    /// and null by keyword, lists and maps by their type name.
    pub fn render_for_error(&self) -> String {
        match self {
            Value::Str { text, .. } => format!("\"{}\"", text),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::List { .. } => "list".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Dimension(d) => d.to_css_string(),
            Value::Lazy(_) => "lazy".to_string(),
            Value::Raw(expr) => expr.to_css_string(),
        }
    }

    /// The string content with surrounding quotes conceptually removed.
    pub fn unquoted_text(&self) -> Option<&str> {
        match self {
            Value::Str { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Structural equality, used by tests and collections. Language-level
/// equality (unit conversion, quote stripping, coercion) lives in the
/// comparator.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Dimension(a), Value::Dimension(b)) => a == b,
            (
                Value::Str { text: a, quoted: qa },
                Value::Str { text: b, quoted: qb },
            ) => a == b && qa == qb,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (
                Value::List {
                    items: a,
                    separator: sa,
                    bracketed: ba,
                },
                Value::List {
                    items: b,
                    separator: sb,
                    bracketed: bb,
                },
            ) => sa == sb && ba == bb && a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => Rc::ptr_eq(a, b),
            (Value::Raw(a), Value::Raw(b)) => a == b,
            _ => false,
        }
    }
}
