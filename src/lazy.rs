//! Deferred, memoized evaluation
//!
//! A `LazyValue` wraps a computation that must not run until its result is
//! first read. The computation is invoked at most once; subsequent reads
//! return the cached result. Evaluation is single-threaded, so interior
//! mutability via `RefCell` suffices.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::value::Value;

type Thunk = Box<dyn FnOnce() -> Result<Value>>;

pub struct LazyValue {
    thunk: Option<Thunk>,
    cached: Option<Value>,
}

impl LazyValue {
    pub fn new(thunk: impl FnOnce() -> Result<Value> + 'static) -> Self {
        Self {
            thunk: Some(Box::new(thunk)),
            cached: None,
        }
    }

    /// Wrap an already-computed value; `force` will never run a thunk.
    pub fn resolved(value: Value) -> Self {
        Self {
            thunk: None,
            cached: Some(value),
        }
    }

    /// Run the computation if it has not run yet and return the result.
    pub fn force(&mut self) -> Result<Value> {
        if let Some(v) = &self.cached {
            return Ok(v.clone());
        }
        match self.thunk.take() {
            Some(thunk) => {
                let value = thunk()?;
                self.cached = Some(value.clone());
                Ok(value)
            }
            // a failed thunk is not retried
            None => Ok(Value::Null),
        }
    }

    pub fn cached(&self) -> Option<Value> {
        self.cached.clone()
    }

    pub fn is_forced(&self) -> bool {
        self.cached.is_some()
    }

    /// Share a lazy value as a `Value` variant.
    pub fn into_value(self) -> Value {
        Value::Lazy(Rc::new(RefCell::new(self)))
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cached {
            Some(v) => f.debug_tuple("LazyValue").field(v).finish(),
            None => f.write_str("LazyValue(<pending>)"),
        }
    }
}

/// Unwrap lazy wrappers, forcing the computation on first read. Non-lazy
/// values pass through unchanged.
pub fn force(value: Value) -> Result<Value> {
    match value {
        Value::Lazy(cell) => {
            let forced = cell.borrow_mut().force()?;
            // a lazy thunk may itself yield a lazy value
            force(forced)
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_thunk_runs_at_most_once() {
        let counter = Rc::new(Cell::new(0));
        let c = Rc::clone(&counter);
        let mut lazy = LazyValue::new(move || {
            c.set(c.get() + 1);
            Ok(Value::number(42.0))
        });

        assert!(!lazy.is_forced());
        assert_eq!(lazy.force().unwrap(), Value::number(42.0));
        assert_eq!(lazy.force().unwrap(), Value::number(42.0));
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_force_unwraps_value_variant() {
        let value = LazyValue::new(|| Ok(Value::unquoted("deferred"))).into_value();
        assert_eq!(force(value).unwrap(), Value::unquoted("deferred"));
    }

    #[test]
    fn test_resolved_never_computes() {
        let mut lazy = LazyValue::resolved(Value::Bool(true));
        assert!(lazy.is_forced());
        assert_eq!(lazy.force().unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_force_passes_plain_values_through() {
        assert_eq!(force(Value::Null).unwrap(), Value::Null);
    }
}
