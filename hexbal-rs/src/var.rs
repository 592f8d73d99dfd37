//! Variable environment.
//!
//! Variables have a two-state lifecycle: unknown until an initializing
//! `set`, then initialized and freely reassignable — never reverting.  The
//! environment is the sole owner of variable state; the statement
//! interpreter is its only mutator, and loop bodies share it by reference
//! rather than by copy.

use std::collections::{HashMap, HashSet};

use crate::error::EvalError;
use crate::value::Value;

/// Variable table with explicit initialization tracking.
#[derive(Debug, Default)]
pub struct VarEnv {
    values: HashMap<String, Value>,
    initialized: HashSet<String>,
}

impl VarEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializing assignment (`set name = …`).  Fails if the variable is
    /// already initialized.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.initialized.contains(name) {
            return Err(EvalError::AlreadyInitialized(name.to_owned()));
        }
        self.values.insert(name.to_owned(), value);
        self.initialized.insert(name.to_owned());
        Ok(())
    }

    /// Plain reassignment (`name = …`).  Fails unless already initialized.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        if !self.initialized.contains(name) {
            return Err(EvalError::NotInitialized(name.to_owned()));
        }
        self.values.insert(name.to_owned(), value);
        Ok(())
    }

    /// Loop-header binding: initializes a fresh name or overwrites an
    /// existing one.
    pub fn bind_loop(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_owned(), value);
        self.initialized.insert(name.to_owned());
    }

    /// Value of an initialized variable.  `Ok(None)` for unknown names; a
    /// declared but uninitialized name is an error.
    pub fn get(&self, name: &str) -> Result<Option<&Value>, EvalError> {
        match self.values.get(name) {
            Some(value) if self.initialized.contains(name) => Ok(Some(value)),
            Some(_) => Err(EvalError::NotInitialized(name.to_owned())),
            None => Ok(None),
        }
    }

    /// Whether the name is known at all.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the name has been through its initializing assignment.
    pub fn is_initialized(&self, name: &str) -> bool {
        self.initialized.contains(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
