//! HexBalance esolang interpreter.
//!
//! A HexBalance program has two sections.  `LOGIC` declares named
//! conditional rules:
//!
//! ```text
//! rule big: if x > 10 -> "large"
//! ```
//!
//! `FORCE` holds imperative statements executed in order: initializing
//! assignment (`set x = 5`), reassignment (`x = x + 1`), output
//! (`ekko(big or x)`), and counted loops
//! (`for i from 1 to 5 step 1` … `end`).
//!
//! Expressions are evaluated directly from their token stream with a
//! two-stack precedence algorithm; rules resolve on demand while an
//! expression is being evaluated, consulting the same variable environment.
//!
//! # Quick start
//!
//! ```rust
//! let source = "\
//! LOGIC
//! rule big: if x > 10 -> \"large\"
//! FORCE
//! set x = 15
//! ekko(big or x)";
//!
//! let outcome = hexbal::program::run_source(source, false);
//! assert!(outcome.error.is_none());
//! assert_eq!(outcome.output, vec!["large"]);
//! ```

pub mod cli;
pub mod error;
pub mod expr;
pub mod interp;
pub mod program;
pub mod rules;
pub mod value;
pub mod var;

// Re-exports for convenience.
pub use error::EvalError;
pub use interp::Interpreter;
pub use value::Value;
