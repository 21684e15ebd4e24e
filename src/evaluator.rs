//! Recursive expression evaluation
//!
//! Walks `Expr` nodes depth-first, resolving variables through the scope
//! arena, dispatching function calls to built-ins or user definitions, and
//! handing binary nodes to the operation evaluator. The evaluator owns the
//! color engine and the scope tree for one compilation; nothing here is
//! shared across threads.

use log::{debug, warn};
use serde::Serialize;

use crate::arithmetic::ArithmeticCalculator;
use crate::ast::{Arg, BinaryOp, Expr, UnaryOp};
use crate::builtins;
use crate::color::ColorEngine;
use crate::comparator::ValueComparator;
use crate::error::{CompilerError, Result};
use crate::lazy;
use crate::operations::OperationEvaluator;
use crate::scope::ScopeArena;
use crate::value::{Separator, Value};

/// External module member resolution for `namespace.property` nodes.
///
/// An `Err` from the resolver is not fatal: the evaluator falls back to a
/// flat `$namespace.property` variable lookup before reporting the property
/// as undefined.
pub trait ModuleResolver {
    fn get_property(&self, namespace: &str, property: &str) -> Result<Value>;
}

/// Running totals for one evaluator instance.
#[derive(Debug, Default, Clone, Serialize)]
pub struct EvalCounters {
    pub expressions_evaluated: u64,
    pub variables_resolved: u64,
    pub function_calls: u64,
    pub color_operations: u64,
}

/// Evaluated call arguments, spreads already expanded and keywords
/// partitioned off for parameter-name matching.
#[derive(Debug, Default)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

pub struct Evaluator {
    pub(crate) colors: ColorEngine,
    pub(crate) calc: ArithmeticCalculator,
    pub(crate) cmp: ValueComparator,
    ops: OperationEvaluator,
    pub scopes: ScopeArena,
    resolver: Option<Box<dyn ModuleResolver>>,
    pub counters: EvalCounters,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            colors: ColorEngine::new(),
            calc: ArithmeticCalculator::new(),
            cmp: ValueComparator::new(),
            ops: OperationEvaluator::new(),
            scopes: ScopeArena::new(),
            resolver: None,
            counters: EvalCounters::default(),
        }
    }

    pub fn set_resolver(&mut self, resolver: Box<dyn ModuleResolver>) {
        self.resolver = Some(resolver);
    }

    /// Evaluate an expression to a runtime value. Lazy wrappers in the
    /// result are left unforced; callers that need a terminal value go
    /// through [`Evaluator::evaluate_forced`].
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        self.counters.expressions_evaluated += 1;
        match expr {
            Expr::Number { value, unit, .. } => Ok(match unit {
                Some(u) => Value::dimension(*value, u.clone()),
                None => Value::number(*value),
            }),
            Expr::Str { value, quoted, .. } => Ok(Value::Str {
                text: value.clone(),
                quoted: *quoted,
            }),
            Expr::Identifier { name, .. } => Ok(match name.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                _ => Value::unquoted(name.clone()),
            }),
            Expr::Variable { name, .. } => {
                let value = self.scopes.get_variable(name)?;
                self.counters.variables_resolved += 1;
                Ok(value)
            }
            Expr::PropertyAccess {
                namespace,
                property,
                ..
            } => self.eval_property_access(namespace, property),
            Expr::Unary { op, operand, .. } => self.eval_unary(*op, operand),
            Expr::Binary {
                op,
                left,
                right,
                parenthesized,
                ..
            } => self.eval_binary(*op, left, right, *parenthesized),
            Expr::FunctionCall { name, args, line } => self.eval_call(name, args, *line),
            Expr::List {
                items,
                separator,
                bracketed,
                ..
            } => {
                let evaluated: Result<Vec<Value>> =
                    items.iter().map(|item| self.evaluate(item)).collect();
                Ok(Value::List {
                    items: evaluated?,
                    separator: *separator,
                    bracketed: *bracketed,
                })
            }
            Expr::Map { entries, .. } => {
                let mut evaluated = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    evaluated.push((self.evaluate(k)?, self.evaluate(v)?));
                }
                Ok(Value::Map(evaluated))
            }
            Expr::Raw { .. } => Ok(Value::Raw(Box::new(expr.clone()))),
        }
    }

    /// Evaluate and force through any lazy wrapper.
    pub fn evaluate_forced(&mut self, expr: &Expr) -> Result<Value> {
        lazy::force(self.evaluate(expr)?)
    }

    fn eval_property_access(&mut self, namespace: &str, property: &str) -> Result<Value> {
        if let Some(resolver) = &self.resolver {
            match resolver.get_property(namespace, property) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(
                        "module resolver failed for {}.{} ({}), trying flat lookup",
                        namespace, property, err
                    );
                }
            }
        }
        // legacy spelling: the dotted name bound as one flat variable
        let flat = format!("{}.{}", namespace, property);
        self.scopes
            .get_variable(&flat)
            .map_err(|_| CompilerError::undefined_property(namespace, property))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Value> {
        let value = self.evaluate_forced(operand)?;
        match op {
            UnaryOp::Plus => {
                let dim = self.calc.to_dimension(&value)?;
                Ok(Value::Dimension(dim))
            }
            UnaryOp::Minus => self.calc.negate(&value),
            UnaryOp::Not => Ok(Value::Bool(self.cmp.not(&value))),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        parenthesized: bool,
    ) -> Result<Value> {
        // `font: 16px/1.5` shorthand: an unparenthesised slash chain over
        // bare numeric literals, at least one carrying a unit, is a
        // separator list, not nested division.
        if op == BinaryOp::Divide && !parenthesized {
            let mut leaves = Vec::new();
            if collect_slash_chain(left, &mut leaves)
                && collect_slash_chain(right, &mut leaves)
                && leaves.iter().any(has_unit)
            {
                let items: Result<Vec<Value>> =
                    leaves.iter().map(|leaf| self.evaluate(leaf)).collect();
                return Ok(Value::List {
                    items: items?,
                    separator: Separator::Slash,
                    bracketed: false,
                });
            }
        }

        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;
        self.ops.evaluate(op, lhs, rhs)
    }

    fn eval_call(&mut self, name: &str, args: &[Arg], line: usize) -> Result<Value> {
        self.counters.function_calls += 1;
        let call = self.collect_args(args)?;

        if let Some(result) = builtins::dispatch(self, name, &call) {
            return result;
        }
        if self.scopes.has_function(name) {
            return self.call_user_function(name, call, line);
        }
        if builtins::is_css_passthrough(name) {
            warn!("passing unknown CSS function {}() through unevaluated", name);
            let rendered: Vec<String> =
                call.positional.iter().map(Value::to_css_string).collect();
            return Ok(Value::unquoted(format!("{}({})", name, rendered.join(", "))));
        }
        Err(CompilerError::undefined_function(name))
    }

    /// Evaluate call arguments, expanding `...` spreads. A spread list
    /// flattens positionally; a spread map contributes keyword arguments
    /// named by its string keys; scalars append verbatim.
    fn collect_args(&mut self, args: &[Arg]) -> Result<CallArgs> {
        let mut call = CallArgs::default();
        for arg in args {
            match arg {
                Arg::Positional(expr) => call.positional.push(self.evaluate(expr)?),
                Arg::Keyword(name, expr) => {
                    let key = name.trim_start_matches('$').to_string();
                    call.keywords.push((key, self.evaluate(expr)?));
                }
                Arg::Spread(expr) => match self.evaluate_forced(expr)? {
                    Value::List { items, .. } => call.positional.extend(items),
                    Value::Map(entries) => {
                        for (key, value) in entries {
                            match key.unquoted_text() {
                                Some(name) => {
                                    let key = name.trim_start_matches('$').to_string();
                                    call.keywords.push((key, value));
                                }
                                None => call.positional.push(value),
                            }
                        }
                    }
                    scalar => call.positional.push(scalar),
                },
            }
        }
        Ok(call)
    }

    fn call_user_function(&mut self, name: &str, call: CallArgs, line: usize) -> Result<Value> {
        let def = self.scopes.get_function(name)?;
        let CallArgs {
            positional,
            mut keywords,
        } = call;
        let mut positional = positional.into_iter();

        // bind every parameter before opening the call scope so that
        // defaults evaluate in the caller's environment
        let mut bindings = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let value = if let Some(at) = keywords.iter().position(|(k, _)| k == &param.name) {
                keywords.remove(at).1
            } else if let Some(value) = positional.next() {
                value
            } else if let Some(default) = &param.default {
                self.evaluate(default)?
            } else {
                return Err(CompilerError::parse(
                    line,
                    format!("Missing argument ${} in call to {}()", param.name, name),
                ));
            };
            bindings.push((param.name.clone(), value));
        }
        if let Some((stray, _)) = keywords.first() {
            return Err(CompilerError::parse(
                line,
                format!("No parameter named ${} in {}()", stray, name),
            ));
        }

        self.scopes.enter_scope();
        for (param, value) in bindings {
            self.scopes.set_variable(&param, value, false, false);
        }
        let result = self.evaluate(&def.body);
        self.scopes.exit_scope()?;
        result
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_slash_chain<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) -> bool {
    match expr {
        Expr::Binary {
            op: BinaryOp::Divide,
            left,
            right,
            parenthesized: false,
            ..
        } => collect_slash_chain(left, out) && collect_slash_chain(right, out),
        Expr::Number { .. } => {
            out.push(expr);
            true
        }
        _ => false,
    }
}

fn has_unit(expr: &&Expr) -> bool {
    matches!(expr, Expr::Number { unit: Some(_), .. })
}
