//! Expression tokenizer and two-stack precedence evaluator.
//!
//! Expressions are evaluated directly from the flat token stream: an operand
//! stack and an operator stack, applying stacked operators whose precedence
//! is at least the incoming one.  Parentheses push a sentinel frame that `)`
//! pops back to, so grouping binds tightest.
//!
//! Operator precedence (lowest → highest):
//!   `or`  →  `and`  →  `==` `not` `<` `>`  →  `+` `-`  →  `*` `/` `//` `%`
//!
//! All operators are binary and left-associative.  `not` is inequality, not
//! negation.

use crate::error::EvalError;
use crate::value::Value;

// ── Operator vocabulary ───────────────────────────────────────────────────────

/// Symbol → precedence (low binds loosest).
pub const OPERATORS: &[(&str, u8)] = &[
    ("or", 2),
    ("and", 3),
    ("==", 4),
    ("not", 4),
    ("<", 4),
    (">", 4),
    ("+", 5),
    ("-", 5),
    ("*", 6),
    ("/", 6),
    ("//", 6),
    ("%", 6),
];

/// Precedence of an operator symbol, if it is one.
pub fn precedence(symbol: &str) -> Option<u8> {
    OPERATORS
        .iter()
        .find(|(sym, _)| *sym == symbol)
        .map(|(_, prec)| *prec)
}

/// Whether `token` is an operator symbol.
pub fn is_operator(token: &str) -> bool {
    precedence(token).is_some()
}

/// Whether `text` contains any operator symbol anywhere.  Rule results use
/// this to decide between expression evaluation and literal interpretation.
pub fn contains_operator(text: &str) -> bool {
    OPERATORS.iter().any(|(sym, _)| text.contains(sym))
}

fn two_byte_operator(a: u8, b: u8) -> Option<&'static str> {
    OPERATORS
        .iter()
        .map(|(sym, _)| *sym)
        .find(|sym| sym.as_bytes() == [a, b])
}

fn one_byte_operator(a: u8) -> Option<&'static str> {
    OPERATORS
        .iter()
        .map(|(sym, _)| *sym)
        .find(|sym| sym.as_bytes() == [a])
}

// ── EvalContext ───────────────────────────────────────────────────────────────

/// Dependency-injection interface used by the evaluator.
///
/// The [`Interpreter`](crate::interp::Interpreter) implements this trait to
/// give the evaluator access to the live variable environment and rule
/// registry.  Rule resolution re-enters the evaluator through the same
/// context.
pub trait EvalContext {
    /// Current value of an initialized variable; `Ok(None)` for unknown
    /// names.  A declared but uninitialized name is an error.
    fn var_value(&self, name: &str) -> Result<Option<Value>, EvalError>;

    /// Whether a rule of this name is registered.
    fn has_rule(&self, name: &str) -> bool;

    /// Resolve a rule: `None` when its condition fails or it has no result.
    fn resolve_rule(&mut self, name: &str) -> Result<Option<Value>, EvalError>;

    /// Emit a non-fatal diagnostic.
    fn report(&mut self, message: String);
}

// ── Tokenizer ─────────────────────────────────────────────────────────────────

/// Split an expression into tokens.
///
/// Single left-to-right scan with an accumulator: whitespace flushes,
/// parentheses flush and stand alone, a two-byte window matching a
/// two-character operator (`//`, `==`, `or`) flushes and emits, a single
/// operator byte flushes and emits, and every other byte accumulates.  Quote
/// characters are not special — they stay in the accumulated token and are
/// stripped later during evaluation.  The tokenizer itself never fails;
/// malformed tokens surface as unrecognized during evaluation.
///
/// Three-character word operators (`and`, `not`) are below the lookahead
/// window, so they only form tokens when whitespace-delimited — while `or`
/// is recognized anywhere, even inside a longer word.
pub fn tokenize(expr: &str) -> Vec<String> {
    let src = expr.as_bytes();
    let mut tokens: Vec<String> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut pos = 0;

    fn flush(tokens: &mut Vec<String>, current: &mut Vec<u8>) {
        if !current.is_empty() {
            tokens.push(String::from_utf8_lossy(current).into_owned());
            current.clear();
        }
    }

    while pos < src.len() {
        let b = src[pos];
        if b.is_ascii_whitespace() {
            flush(&mut tokens, &mut current);
            pos += 1;
        } else if b == b'(' || b == b')' {
            flush(&mut tokens, &mut current);
            tokens.push((b as char).to_string());
            pos += 1;
        } else if let Some(sym) =
            src.get(pos + 1).and_then(|&b2| two_byte_operator(b, b2))
        {
            flush(&mut tokens, &mut current);
            tokens.push(sym.to_string());
            pos += 2;
        } else if let Some(sym) = one_byte_operator(b) {
            flush(&mut tokens, &mut current);
            tokens.push(sym.to_string());
            pos += 1;
        } else {
            current.push(b);
            pos += 1;
        }
    }
    flush(&mut tokens, &mut current);
    tokens
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

/// Tokenize and evaluate an expression string.
pub fn eval_str(expr: &str, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    eval_tokens(&tokenize(expr), ctx)
}

/// Evaluate a token sequence against the given context.
pub fn eval_tokens(tokens: &[String], ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let mut values: Vec<Value> = Vec::new();
    let mut ops: Vec<&str> = Vec::new();

    for token in tokens {
        if is_integer_literal(token) {
            let n = token.parse().map_err(|_| EvalError::Overflow)?;
            values.push(Value::Int(n));
        } else if let Some(inner) = quoted(token) {
            values.push(Value::Str(inner.to_owned()));
        } else if token == "(" {
            ops.push("(");
        } else if token == ")" {
            loop {
                match ops.pop() {
                    None => return Err(EvalError::UnbalancedParens),
                    Some("(") => break,
                    Some(op) => apply(op, &mut values, tokens)?,
                }
            }
        } else if let Some(value) = ctx.var_value(token)? {
            // Variables shadow rules and word operators.
            values.push(value);
        } else if ctx.has_rule(token) {
            match ctx.resolve_rule(token)? {
                Some(value) => values.push(value),
                None => values.push(Value::Bool(false)),
            }
        } else if let Some(prec) = precedence(token) {
            while let Some(&top) = ops.last() {
                let applies = top != "(" && precedence(top).is_some_and(|p| p >= prec);
                if !applies {
                    break;
                }
                ops.pop();
                apply(top, &mut values, tokens)?;
            }
            ops.push(token);
        } else {
            return Err(EvalError::UnrecognizedToken(token.clone()));
        }
    }

    while let Some(op) = ops.pop() {
        if op == "(" {
            return Err(EvalError::UnbalancedParens);
        }
        apply(op, &mut values, tokens)?;
    }

    match (values.pop(), values.is_empty()) {
        (Some(value), true) => Ok(value),
        _ => Err(EvalError::MalformedExpression(tokens.join(" "))),
    }
}

/// Pop two operands, apply `op`, push the result.
fn apply(op: &str, values: &mut Vec<Value>, tokens: &[String]) -> Result<(), EvalError> {
    let (Some(b), Some(a)) = (values.pop(), values.pop()) else {
        return Err(EvalError::MalformedExpression(tokens.join(" ")));
    };
    let result = match op {
        "+" => a.arith_add(&b)?,
        "-" => a.arith_sub(&b)?,
        "*" => a.arith_mul(&b)?,
        "/" | "//" => a.arith_div(&b)?,
        "%" => a.arith_rem(&b)?,
        "==" => a.cmp_eq(&b)?,
        "not" => a.cmp_ne(&b)?,
        "<" => a.cmp_lt(&b)?,
        ">" => a.cmp_gt(&b)?,
        "and" => a.logic_and(&b),
        "or" => a.logic_or(&b),
        _ => return Err(EvalError::UnrecognizedToken(op.to_owned())),
    };
    values.push(result);
    Ok(())
}

fn is_integer_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// The unquoted content of a `"…"` token, if it is one.
fn quoted(token: &str) -> Option<&str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Some(&token[1..token.len() - 1])
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
