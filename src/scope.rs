//! Chained lexical environments for variables, mixins and user functions
//!
//! Scopes live in an arena: nodes are owned by a `Vec`, parent links are
//! indices, and the current scope moves via explicit `enter_scope` /
//! `exit_scope` calls. A variable and a mixin may share a name without
//! collision; the three namespaces are independent maps.

use std::collections::HashMap;

use crate::ast::Expr;
use crate::error::{CompilerError, Result};
use crate::value::Value;

/// A user-defined mixin or function: parameter list plus body expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

impl Param {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Expr) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

#[derive(Debug, Default)]
struct ScopeData {
    variables: HashMap<String, Value>,
    mixins: HashMap<String, CallableDef>,
    functions: HashMap<String, CallableDef>,
    parent: Option<usize>,
}

/// The scope tree. Index 0 is the process-lifetime root scope.
#[derive(Debug)]
pub struct ScopeArena {
    scopes: Vec<ScopeData>,
    current: usize,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self {
            scopes: vec![ScopeData::default()],
            current: 0,
        }
    }

    /// Open a child of the current scope and make it current.
    pub fn enter_scope(&mut self) -> usize {
        let id = self.scopes.len();
        self.scopes.push(ScopeData {
            parent: Some(self.current),
            ..Default::default()
        });
        self.current = id;
        id
    }

    /// Return to the parent scope. The root scope cannot be exited.
    pub fn exit_scope(&mut self) -> Result<()> {
        match self.scopes[self.current].parent {
            Some(parent) => {
                self.current = parent;
                Ok(())
            }
            None => Err(CompilerError::parse(0, "Cannot exit the root scope")),
        }
    }

    pub fn current_scope(&self) -> usize {
        self.current
    }

    fn chain(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = Some(self.current);
        std::iter::from_fn(move || {
            let id = next?;
            next = self.scopes[id].parent;
            Some(id)
        })
    }

    /// Innermost-first lookup along the parent chain.
    pub fn get_variable(&self, name: &str) -> Result<Value> {
        for id in self.chain() {
            if let Some(value) = self.scopes[id].variables.get(name) {
                return Ok(value.clone());
            }
        }
        Err(CompilerError::undefined_variable(name))
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.chain()
            .any(|id| self.scopes[id].variables.contains_key(name))
    }

    /// Write a variable binding.
    ///
    /// `global` writes into the root scope, bypassing everything between.
    /// `default` makes the write a no-op when the target already binds the
    /// name: for global writes that means the root scope's own map, for
    /// local writes any scope on the chain.
    pub fn set_variable(&mut self, name: &str, value: Value, global: bool, default: bool) {
        if global {
            if default && self.scopes[0].variables.contains_key(name) {
                return;
            }
            self.scopes[0].variables.insert(name.to_string(), value);
        } else {
            if default && self.has_variable(name) {
                return;
            }
            self.scopes[self.current]
                .variables
                .insert(name.to_string(), value);
        }
    }

    pub fn set_mixin(&mut self, def: CallableDef) {
        self.scopes[self.current]
            .mixins
            .insert(def.name.clone(), def);
    }

    pub fn get_mixin(&self, name: &str) -> Result<CallableDef> {
        for id in self.chain() {
            if let Some(def) = self.scopes[id].mixins.get(name) {
                return Ok(def.clone());
            }
        }
        Err(CompilerError::undefined_mixin(name))
    }

    /// Delete the innermost definition of a mixin, if any. Used to
    /// temporarily hide a forwarded definition.
    pub fn remove_mixin(&mut self, name: &str) -> bool {
        let ids: Vec<usize> = self.chain().collect();
        for id in ids {
            if self.scopes[id].mixins.remove(name).is_some() {
                return true;
            }
        }
        false
    }

    pub fn set_function(&mut self, def: CallableDef) {
        self.scopes[self.current]
            .functions
            .insert(def.name.clone(), def);
    }

    pub fn get_function(&self, name: &str) -> Result<CallableDef> {
        for id in self.chain() {
            if let Some(def) = self.scopes[id].functions.get(name) {
                return Ok(def.clone());
            }
        }
        Err(CompilerError::undefined_function(name))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.chain()
            .any(|id| self.scopes[id].functions.contains_key(name))
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}
