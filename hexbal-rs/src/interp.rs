//! FORCE-section statement interpreter.
//!
//! Walks the imperative section line by line with an explicit cursor — `for`
//! consumes a variable-length block of body lines and repositions the cursor
//! past it.  Loop bodies re-enter [`Interpreter::parse_force`] against the
//! same environment, so mutations inside a loop persist outside it.
//!
//! Output is collected in order; non-fatal diagnostics are `% `-prefixed
//! lines in the same stream.  Fatal failures ([`EvalError`]) abort the run.

use crate::error::EvalError;
use crate::expr::{self, EvalContext};
use crate::rules::RuleRegistry;
use crate::value::Value;
use crate::var::VarEnv;

/// Rule-resolution re-entry depth before a cycle is assumed.
const MAX_RULE_DEPTH: usize = 64;
/// Body passes a single loop may make before it is declared divergent.
const MAX_LOOP_PASSES: usize = 100_000;

/// The HexBalance interpreter: one program run's variable environment, rule
/// registry, and ordered output stream.
#[derive(Debug, Default)]
pub struct Interpreter {
    vars: VarEnv,
    rules: RuleRegistry,
    /// Lines produced by `ekko` and by non-fatal diagnostics, in order.
    pub output: Vec<String>,
    /// Report rule registrations (the `-d` flag).
    pub debug: bool,
    rule_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vars(&self) -> &VarEnv {
        &self.vars
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Drain the collected output.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    // ── LOGIC ─────────────────────────────────────────────────────────────────

    /// Parse the LOGIC section, populating the rule registry.  Malformed
    /// declarations are reported and skipped; other lines are ignored.
    pub fn parse_logic(&mut self, lines: &[String]) {
        for line in lines {
            match RuleRegistry::parse_line(line) {
                Ok(Some((name, rule))) => {
                    if self.debug {
                        self.report(format!("rule added: {name}"));
                    }
                    self.rules.register(name, rule);
                }
                Ok(None) => {}
                Err(e) => self.report(e),
            }
        }
    }

    // ── FORCE ─────────────────────────────────────────────────────────────────

    /// Execute the FORCE section.  Fatal failures abort the run; non-fatal
    /// conditions are reported and execution continues.
    pub fn parse_force(&mut self, lines: &[String]) -> Result<(), EvalError> {
        let mut i = 0;
        while i < lines.len() {
            let line = strip_comment(&lines[i]);
            if line.is_empty() || line == "start" || line == "end" {
                i += 1;
                continue;
            }
            if let Some(rest) = line.strip_prefix("set ") {
                self.exec_set(rest)?;
            } else if line.starts_with("ekko") {
                self.exec_ekko(line)?;
            } else if line.starts_with("for ") {
                i = self.exec_for(line, lines, i)?;
            } else if let Some((name, text)) = line.split_once('=') {
                self.exec_assign(name.trim(), text.trim())?;
            } else {
                self.report(format!("unrecognized statement '{line}'"));
            }
            i += 1;
        }
        Ok(())
    }

    fn eval(&mut self, text: &str) -> Result<Value, EvalError> {
        expr::eval_str(text, self)
    }

    /// `set <name> = <expr>` — the initializing assignment.
    fn exec_set(&mut self, rest: &str) -> Result<(), EvalError> {
        let Some((name, text)) = rest.split_once('=') else {
            self.report(format!("malformed set statement 'set {rest}'"));
            return Ok(());
        };
        let (name, text) = (name.trim(), text.trim());
        if self.vars.is_initialized(name) {
            return Err(EvalError::AlreadyInitialized(name.to_owned()));
        }
        let value = self.eval(text)?;
        self.vars.declare(name, value)
    }

    /// `<name> = <expr>` — reassignment of an initialized variable.
    fn exec_assign(&mut self, name: &str, text: &str) -> Result<(), EvalError> {
        if !self.vars.is_initialized(name) {
            return Err(EvalError::NotInitialized(name.to_owned()));
        }
        let value = self.eval(text)?;
        self.vars.assign(name, value)
    }

    /// `ekko(...)` — the output statement.
    ///
    /// A quoted-string argument is emitted verbatim, unquoted.  Anything
    /// else is an ` or `-separated list of alternatives tried in order: a
    /// rule that resolves emits and stops, a numeral emits and stops, an
    /// initialized variable emits and stops, and an unrecognized alternative
    /// is reported before moving on to the next.
    fn exec_ekko(&mut self, line: &str) -> Result<(), EvalError> {
        let Some((_, rest)) = line.split_once('(') else {
            self.report(format!("malformed ekko statement '{line}'"));
            return Ok(());
        };
        let content = rest.trim_end_matches(')');

        if content.len() >= 2 && content.starts_with('"') && content.ends_with('"') {
            self.output.push(content.trim_matches('"').to_owned());
            return Ok(());
        }

        for alt in content.split(" or ") {
            let alt = alt.trim();
            if self.rules.contains(alt) {
                // A rule with no result falls through to the next alternative.
                if let Some(value) = self.resolve_rule(alt)? {
                    self.output.push(value.to_string());
                    break;
                }
            } else if !alt.is_empty() && alt.bytes().all(|b| b.is_ascii_digit()) {
                let n: i64 = alt.parse().map_err(|_| EvalError::Overflow)?;
                self.output.push(n.to_string());
                break;
            } else if self.vars.contains(alt) {
                if let Some(value) = self.vars.get(alt)? {
                    self.output.push(value.to_string());
                    break;
                }
            } else {
                self.report(format!("unrecognized ekko alternative '{alt}'"));
            }
        }
        Ok(())
    }

    /// `for <var> from <start> to <end> step <step>` … `end`.
    ///
    /// Returns the cursor position of the consumed `end` line (the caller's
    /// increment then steps past it).
    fn exec_for(
        &mut self,
        header: &str,
        lines: &[String],
        index: usize,
    ) -> Result<usize, EvalError> {
        let words: Vec<&str> = header.split_whitespace().collect();
        if words.len() != 8 {
            self.report(format!("malformed for header '{header}'"));
            return Ok(index);
        }
        let loop_var = words[1];
        let (start, end, step) = match (
            self.loop_bound(words[3])?,
            self.loop_bound(words[5])?,
            self.loop_bound(words[7])?,
        ) {
            (Some(start), Some(end), Some(step)) => (start, end, step),
            _ => {
                self.report(format!("malformed for header '{header}'"));
                return Ok(index);
            }
        };

        // Body: everything up to the first `end` line.  Reaching the end of
        // the section closes the body implicitly.
        let mut body_end = index + 1;
        while body_end < lines.len() && !lines[body_end].trim_start().starts_with("end") {
            body_end += 1;
        }
        let body = &lines[index + 1..body_end];

        self.vars.bind_loop(loop_var, Value::Int(start));
        let mut passes = 0usize;
        loop {
            if self.loop_value(loop_var)? > end {
                break;
            }
            if passes >= MAX_LOOP_PASSES {
                return Err(EvalError::IterationLimit(loop_var.to_owned()));
            }
            passes += 1;
            self.parse_force(body)?;
            let next = self
                .loop_value(loop_var)?
                .checked_add(step)
                .ok_or(EvalError::Overflow)?;
            self.vars.bind_loop(loop_var, Value::Int(next));
        }
        Ok(body_end)
    }

    /// A loop bound: an initialized integer variable, or an integer literal.
    /// `Ok(None)` when the word is neither (a malformed header).
    fn loop_bound(&self, word: &str) -> Result<Option<i64>, EvalError> {
        if self.vars.contains(word) {
            return match self.vars.get(word)? {
                Some(Value::Int(n)) => Ok(Some(*n)),
                Some(other) => Err(EvalError::NonIntegerLoopBound {
                    name: word.to_owned(),
                    kind: other.kind(),
                }),
                None => Ok(None),
            };
        }
        Ok(word.parse().ok())
    }

    /// Current value of the loop variable, which must remain an integer.
    fn loop_value(&self, name: &str) -> Result<i64, EvalError> {
        match self.vars.get(name)? {
            Some(Value::Int(n)) => Ok(*n),
            Some(other) => Err(EvalError::NonIntegerLoopBound {
                name: name.to_owned(),
                kind: other.kind(),
            }),
            None => Err(EvalError::NotInitialized(name.to_owned())),
        }
    }
}

// ── EvalContext ───────────────────────────────────────────────────────────────

impl EvalContext for Interpreter {
    fn var_value(&self, name: &str) -> Result<Option<Value>, EvalError> {
        Ok(self.vars.get(name)?.cloned())
    }

    fn has_rule(&self, name: &str) -> bool {
        self.rules.contains(name)
    }

    fn resolve_rule(&mut self, name: &str) -> Result<Option<Value>, EvalError> {
        let Some(rule) = self.rules.get(name).cloned() else {
            self.report(format!("undefined rule '{name}'"));
            return Ok(None);
        };
        if self.rule_depth >= MAX_RULE_DEPTH {
            return Err(EvalError::RecursionLimit(name.to_owned()));
        }
        self.rule_depth += 1;
        let resolved = rule.resolve(self);
        self.rule_depth -= 1;
        resolved
    }

    fn report(&mut self, message: String) {
        self.output.push(format!("% {message}"));
    }
}

/// Strip a `#` comment suffix and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
