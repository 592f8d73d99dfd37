//! Program driving: section splitting and source/file runners.
//!
//! A HexBalance program is plain text with two marker lines, `LOGIC` and
//! `FORCE`, each introducing the section that follows.  The driver splits
//! the text, loads the rules, executes the commands, and hands back the
//! ordered output.  Every run gets a fresh [`Interpreter`] so independent
//! programs cannot leak state into each other.

use std::fs;
use std::path::Path;

use crate::error::EvalError;
use crate::interp::Interpreter;

/// Ordered output of one program run, plus the fatal error that stopped it,
/// if any.  Output produced before the failure is preserved.
#[derive(Debug)]
pub struct RunOutcome {
    pub output: Vec<String>,
    pub error: Option<EvalError>,
}

/// Split program text into its LOGIC and FORCE line lists.
///
/// The markers are the exact lines `LOGIC` and `FORCE` (right-trimmed for
/// carriage-return tolerance); anything before the first marker is ignored.
/// Section lines are stored trimmed.
pub fn split_sections(source: &str) -> (Vec<String>, Vec<String>) {
    enum Section {
        Neither,
        Logic,
        Force,
    }

    let mut logic = Vec::new();
    let mut force = Vec::new();
    let mut section = Section::Neither;

    for line in source.lines() {
        match line.trim_end() {
            "LOGIC" => section = Section::Logic,
            "FORCE" => section = Section::Force,
            _ => match section {
                Section::Logic => logic.push(line.trim().to_owned()),
                Section::Force => force.push(line.trim().to_owned()),
                Section::Neither => {}
            },
        }
    }
    (logic, force)
}

/// Run a complete program source and collect its output.
pub fn run_source(source: &str, debug: bool) -> RunOutcome {
    let (logic, force) = split_sections(source);
    let mut interp = Interpreter::new();
    interp.debug = debug;
    interp.parse_logic(&logic);
    let error = interp.parse_force(&force).err();
    RunOutcome {
        output: interp.take_output(),
        error,
    }
}

/// Read and run a program file.
pub fn run_file(path: impl AsRef<Path>, debug: bool) -> std::io::Result<RunOutcome> {
    let source = fs::read_to_string(path)?;
    Ok(run_source(&source, debug))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
