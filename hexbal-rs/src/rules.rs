//! Rule registry and resolution.
//!
//! The LOGIC section declares named conditional rules:
//!
//! ```text
//! rule big: if x > 10 -> "large"
//! rule even: n % 2 == 0
//! ```
//!
//! A rule resolves on demand: the condition (when present) must evaluate
//! truthy, then the result text is classified — expression when it contains
//! an operator symbol, variable reference when it names an initialized
//! variable, string literal otherwise.  Rules are immutable once registered;
//! re-declaring a name overwrites it silently.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::EvalError;
use crate::expr::{self, EvalContext};
use crate::value::Value;

/// `rule <name> <body>` — the name's trailing `:` is stripped separately so
/// that both `rule big: …` and `rule big …` parse.
fn rule_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^rule\s+(\S+)\s+(\S.*)$").expect("rule pattern is valid"))
}

/// A named conditional rule from the LOGIC section.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Guard expression; `None` or empty means always satisfied.
    pub condition: Option<String>,
    /// Result text; condition-only rules have none and never yield a value.
    pub result: Option<String>,
}

impl Rule {
    /// Parse the declaration body after `rule <name>`.
    ///
    /// With `->`, the left side supplies the condition when it starts with
    /// `if ` (and is discarded otherwise) and the right side is the result.
    /// Without `->`, the whole body is a condition-only rule.
    fn from_body(body: &str) -> Rule {
        match body.split_once("->") {
            Some((head, result)) => Rule {
                condition: head
                    .trim()
                    .strip_prefix("if ")
                    .map(|cond| cond.trim().to_owned()),
                result: Some(result.trim().to_owned()),
            },
            None => Rule {
                condition: Some(body.trim().to_owned()),
                result: None,
            },
        }
    }

    /// Resolve this rule against the live environment.
    ///
    /// `Ok(None)` means "no result" — the condition failed or the rule has
    /// no result text.  That is distinct from a resolved `false`.
    pub fn resolve(&self, ctx: &mut dyn EvalContext) -> Result<Option<Value>, EvalError> {
        if let Some(cond) = &self.condition {
            if !cond.is_empty() && !expr::eval_str(cond, ctx)?.truthy() {
                return Ok(None);
            }
        }
        let Some(result) = &self.result else {
            return Ok(None);
        };
        if expr::contains_operator(result) {
            return expr::eval_str(result, ctx).map(Some);
        }
        if let Some(value) = ctx.var_value(result)? {
            return Ok(Some(value));
        }
        Ok(Some(Value::Str(result.trim_matches('"').to_owned())))
    }
}

/// Named rule store.  Owned by one interpreter instance — never a
/// process-wide singleton — so independent program runs can coexist.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, silently overwriting any previous one of that name.
    pub fn register(&mut self, name: impl Into<String>, rule: Rule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse one LOGIC line.  `Ok(None)` for lines that are not rule
    /// declarations (those are skipped silently); `Err` describes a
    /// malformed declaration.
    pub fn parse_line(line: &str) -> Result<Option<(String, Rule)>, String> {
        let line = line.trim();
        if !line.starts_with("rule") {
            return Ok(None);
        }
        let caps = rule_line_re()
            .captures(line)
            .ok_or_else(|| format!("malformed rule declaration '{line}'"))?;
        let name = caps[1].trim_end_matches(':').to_owned();
        Ok(Some((name, Rule::from_body(&caps[2]))))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
