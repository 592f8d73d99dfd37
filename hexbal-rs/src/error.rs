//! Evaluation errors.
//!
//! Only conditions that abort the current program run are errors.  Non-fatal
//! conditions (undefined rules, unrecognized statements, unrecognized `ekko`
//! alternatives, malformed lines) are reported as `% `-prefixed lines in the
//! interpreter's output stream and execution continues.

use std::fmt;

/// A fatal failure during expression evaluation or statement execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A token matched no literal form, variable, rule, or operator.
    UnrecognizedToken(String),
    /// A variable was read or reassigned before its initializing `set`.
    NotInitialized(String),
    /// A `set` targeted a variable that is already initialized.
    AlreadyInitialized(String),
    /// An operator was applied to operand kinds it does not accept.
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    /// Division or modulo by zero.
    DivisionByZero,
    /// Integer arithmetic or an integer literal overflowed.
    Overflow,
    /// A `)` without a matching `(`, or vice versa.
    UnbalancedParens,
    /// The expression did not reduce to exactly one value.
    MalformedExpression(String),
    /// Rule resolution recursed past the depth limit (rule cycle).
    RecursionLimit(String),
    /// A loop exceeded its body-pass budget (e.g. `step 0`).
    IterationLimit(String),
    /// A loop bound or loop variable held a non-integer value.
    NonIntegerLoopBound { name: String, kind: &'static str },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnrecognizedToken(token) => write!(f, "unrecognized token '{token}'"),
            EvalError::NotInitialized(name) => {
                write!(f, "variable '{name}' is not initialized; use 'set' to initialize")
            }
            EvalError::AlreadyInitialized(name) => {
                write!(f, "variable '{name}' is already initialized; assign without 'set'")
            }
            EvalError::TypeMismatch { op, lhs, rhs } => {
                write!(f, "operator '{op}' cannot combine {lhs} and {rhs}")
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::Overflow => write!(f, "integer overflow"),
            EvalError::UnbalancedParens => write!(f, "unbalanced parentheses"),
            EvalError::MalformedExpression(text) => write!(f, "malformed expression '{text}'"),
            EvalError::RecursionLimit(name) => {
                write!(f, "rule resolution depth exceeded while resolving '{name}'")
            }
            EvalError::IterationLimit(name) => {
                write!(f, "loop over '{name}' exceeded the iteration budget")
            }
            EvalError::NonIntegerLoopBound { name, kind } => {
                write!(f, "loop bound '{name}' must be an integer, found {kind}")
            }
        }
    }
}

impl std::error::Error for EvalError {}

// ── Tests ─────────────────────────────────────────────────────────────────────
