//! Styl Stylesheet Compiler
//!
//! The expression-evaluation core of the Styl language: a CSS superset with
//! `$variables`, user functions, unit-aware arithmetic and a full color
//! engine. Expressions evaluate to plain CSS value text.
//!
//! # Features
//!
//! - Unit-aware numeric model with static conversion tables
//!   (length, angle, time, frequency, resolution)
//! - Color engine: named colors, hex, rgb()/rgba()/hsl()/hsla()/hwb(),
//!   RGB/HSL/HWB/XYZ conversions, adjust/scale/change/mix operations
//! - Arithmetic, comparison and logical operators over dynamic values
//! - CSS-preserving fallbacks: `calc()` rendering for what cannot be
//!   resolved at compile time, slash shorthand for `font: 16px/1.5`
//! - Chained lexical scopes with `!global` and `!default` write semantics
//! - Lazily evaluated values, forced at most once
//! - Error reporting with line numbers and stable message templates
//!
//! # Basic Usage
//!
//! ```rust
//! use stylc::{evaluate_expression, Result};
//!
//! fn main() -> Result<()> {
//!     let css = evaluate_expression("mix(red, blue)")?;
//!     assert_eq!(css, "purple");
//!     Ok(())
//! }
//! ```
//!
//! # Evaluation Pipeline
//!
//! 1. **Parse**: lexer and recursive descent parser build the expression AST
//! 2. **Resolve**: variables and `namespace.property` members via the scope
//!    arena and an optional module resolver
//! 3. **Evaluate**: depth-first walk dispatching to the arithmetic
//!    calculator, value comparator, color engine and built-in functions
//! 4. **Format**: canonical CSS rendering of the resulting value

pub mod arithmetic;
pub mod ast;
pub mod color;
pub mod color_ops;
pub mod comparator;
pub mod error;
pub mod evaluator;
pub mod lazy;
pub mod number;
pub mod operations;
pub mod parser;
pub mod scope;
pub mod units;
pub mod value;

mod builtins;

use std::collections::HashMap;
use std::time::Instant;

use serde::Serialize;

// Re-export commonly used types and functions
pub use arithmetic::ArithmeticCalculator;
pub use ast::{Arg, BinaryOp, Expr, UnaryOp};
pub use color::{Color, ColorEngine};
pub use comparator::ValueComparator;
pub use error::{CompilerError, Result};
pub use evaluator::{EvalCounters, Evaluator, ModuleResolver};
pub use lazy::LazyValue;
pub use number::{format_float, Dimension};
pub use operations::OperationEvaluator;
pub use parser::parse_expression;
pub use scope::{CallableDef, Param, ScopeArena};
pub use value::{Separator, Value};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Evaluation options and settings
#[derive(Debug, Clone, Default)]
pub struct EvaluatorOptions {
    /// Enable debug mode with extra logging
    pub debug_mode: bool,

    /// Variable definitions to inject into the root scope before
    /// evaluation; values are Styl expressions
    pub custom_variables: HashMap<String, String>,
}

/// Evaluation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationStats {
    /// Number of AST nodes evaluated
    pub expressions_evaluated: u64,

    /// Number of successful variable lookups
    pub variables_resolved: u64,

    /// Number of function calls dispatched
    pub function_calls: u64,

    /// Number of color parse/convert/adjust operations
    pub color_operations: u64,

    /// Evaluation time in milliseconds
    pub eval_time_ms: u64,
}

impl EvaluationStats {
    fn from_counters(counters: &EvalCounters, started: Instant) -> Self {
        Self {
            expressions_evaluated: counters.expressions_evaluated,
            variables_resolved: counters.variables_resolved,
            function_calls: counters.function_calls,
            color_operations: counters.color_operations,
            eval_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Evaluate a single expression to CSS text with default options.
pub fn evaluate_expression(source: &str) -> Result<String> {
    let (css, _stats) = evaluate_expression_with_options(source, &EvaluatorOptions::default())?;
    Ok(css)
}

/// Evaluate a single expression with custom options.
pub fn evaluate_expression_with_options(
    source: &str,
    options: &EvaluatorOptions,
) -> Result<(String, EvaluationStats)> {
    let started = Instant::now();
    let mut eval = build_evaluator(options)?;

    if options.debug_mode {
        log::debug!("Parsing expression: {}", source);
    }
    let expr = parser::parse_expression(source)?;
    let value = eval.evaluate_forced(&expr)?;
    let css = value.to_css_string();

    if options.debug_mode {
        log::debug!("Evaluated to: {}", css);
    }
    Ok((css, EvaluationStats::from_counters(&eval.counters, started)))
}

/// Evaluate a declaration file.
///
/// Each line is either a variable declaration (`$name: expression;`,
/// optionally flagged `!default` or `!global`), a `//` comment, or a bare
/// expression. Expression lines evaluate in order against the accumulated
/// declarations; the result is their CSS text joined with newlines.
pub fn evaluate_file(path: &str, options: &EvaluatorOptions) -> Result<(String, EvaluationStats)> {
    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::info!("Evaluating '{}'...", path);
    }
    let source = std::fs::read_to_string(path)?;
    evaluate_source(&source, options)
}

/// Evaluate declaration-file content from a string. See [`evaluate_file`].
pub fn evaluate_source(source: &str, options: &EvaluatorOptions) -> Result<(String, EvaluationStats)> {
    let started = Instant::now();
    let mut eval = build_evaluator(options)?;
    let mut outputs = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        let line = line.strip_suffix(';').unwrap_or(line).trim();

        if let Some((name, body)) = split_declaration(line) {
            let (expr_src, global, default) = strip_flags(body);
            if options.debug_mode {
                log::debug!("line {}: declaring ${}", line_no, name);
            }
            let expr = at_line(parser::parse_expression(expr_src), line_no)?;
            let value = eval.evaluate(&expr)?;
            eval.scopes.set_variable(name, value, global, default);
            continue;
        }

        if options.debug_mode {
            log::debug!("line {}: evaluating expression", line_no);
        }
        let expr = at_line(parser::parse_expression(line), line_no)?;
        let value = eval.evaluate_forced(&expr)?;
        outputs.push(value.to_css_string());
    }

    Ok((
        outputs.join("\n"),
        EvaluationStats::from_counters(&eval.counters, started),
    ))
}

fn build_evaluator(options: &EvaluatorOptions) -> Result<Evaluator> {
    let mut eval = Evaluator::new();
    for (name, source) in &options.custom_variables {
        let expr = parser::parse_expression(source)?;
        let value = eval.evaluate(&expr)?;
        eval.scopes.set_variable(name, value, true, false);
    }
    Ok(eval)
}

/// `$name: body` declaration heads. Expression lines that merely start
/// with a variable reference have no top-level colon and fall through.
fn split_declaration(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('$')?;
    let (name, body) = rest.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, body.trim()))
}

fn strip_flags(body: &str) -> (&str, bool, bool) {
    let mut rest = body.trim();
    let mut global = false;
    let mut default = false;
    loop {
        if let Some(stripped) = rest.strip_suffix("!default") {
            default = true;
            rest = stripped.trim_end();
        } else if let Some(stripped) = rest.strip_suffix("!global") {
            global = true;
            rest = stripped.trim_end();
        } else {
            return (rest, global, default);
        }
    }
}

/// Re-attribute a parse error from a single-line source to its position in
/// the surrounding file.
fn at_line(result: Result<Expr>, line: usize) -> Result<Expr> {
    result.map_err(|err| match err {
        CompilerError::Parse { message, .. } => CompilerError::Parse { line, message },
        other => other,
    })
}
