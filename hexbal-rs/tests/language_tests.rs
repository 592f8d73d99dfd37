//! End-to-end language tests: run HexBalance sources through the library
//! driver and compare the ordered output.
//!
//! Each case is a `(source, expected_lines)` pair.  Sources are complete
//! programs with `LOGIC`/`FORCE` markers.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use hexbal::program::{run_file, run_source};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn run_ok(source: &str) -> Vec<String> {
    let outcome = run_source(source, false);
    assert!(
        outcome.error.is_none(),
        "program failed: {:?}\noutput so far: {:?}",
        outcome.error,
        outcome.output
    );
    outcome.output
}

fn check(cases: &[(&str, &[&str])]) {
    for (source, expected) in cases {
        let got = run_ok(source);
        assert_eq!(&got, expected, "source:\n{source}");
    }
}

// ── Core language behavior ────────────────────────────────────────────────────

#[test]
fn arithmetic_and_output() {
    check(&[
        ("FORCE\nset x = 3 + 4 * 2\nekko(x)", &["11"]),
        ("FORCE\nset x = (3 + 4) * 2\nekko(x)", &["14"]),
        ("FORCE\nset x = 7 // 2 + 7 / 2\nekko(x)", &["6"]),
        ("FORCE\nset x = 10 % 3\nekko(x)", &["1"]),
        ("FORCE\nekko(42)", &["42"]),
        ("FORCE\nekko(\"Hello, World!\")", &["Hello, World!"]),
    ]);
}

#[test]
fn rules_resolve_against_live_state() {
    let src = "\
LOGIC
rule big: if x > 10 -> \"large\"
FORCE
set x = 15
ekko(big or x)";
    assert_eq!(run_ok(src), ["large"]);

    let src = "\
LOGIC
rule big: if x > 10 -> \"large\"
FORCE
set x = 5
ekko(big or x)";
    assert_eq!(run_ok(src), ["5"]);
}

#[test]
fn rule_results_classify_three_ways() {
    // Expression, variable reference, and string literal results.
    let src = "\
LOGIC
rule doubled: -> n * 2
rule echoed: -> n
rule named: -> \"fixed\"
FORCE
set n = 21
ekko(doubled)
ekko(echoed)
ekko(named)";
    assert_eq!(run_ok(src), ["42", "21", "fixed"]);
}

#[test]
fn counted_loop_and_loop_variable_afterwards() {
    let src = "\
FORCE
start
for i from 1 to 5 step 1
ekko(i)
end
ekko(i)
end";
    assert_eq!(run_ok(src), ["1", "2", "3", "4", "5", "6"]);
}

#[test]
fn loop_shares_enclosing_environment() {
    let src = "\
FORCE
set total = 0
for i from 1 to 10 step 1
total = total + i
end
ekko(total)";
    assert_eq!(run_ok(src), ["55"]);
}

#[test]
fn initialization_discipline() {
    let outcome = run_source("FORCE\nset y = 10\nset y = 20", false);
    assert!(matches!(
        outcome.error,
        Some(hexbal::EvalError::AlreadyInitialized(_))
    ));

    let outcome = run_source("FORCE\ny = 20", false);
    assert!(matches!(
        outcome.error,
        Some(hexbal::EvalError::NotInitialized(_))
    ));
}

#[test]
fn reregistered_rule_is_idempotent() {
    let src = "\
LOGIC
rule big: if x > 10 -> \"large\"
rule big: if x > 10 -> \"large\"
FORCE
set x = 15
ekko(big)";
    assert_eq!(run_ok(src), ["large"]);
}

#[test]
fn undefined_rule_in_ekko_is_reported_not_fatal() {
    let src = "FORCE\nset n = 3\nekko(ghost or n)";
    let got = run_ok(src);
    assert_eq!(got.len(), 2);
    assert!(got[0].starts_with("% unrecognized ekko alternative"));
    assert_eq!(got[1], "3");
}

#[test]
fn unrecognized_statement_is_reported_not_fatal() {
    let src = "FORCE\nwobble the frobnicator\nekko(\"done\")";
    let got = run_ok(src);
    assert!(got[0].starts_with("% unrecognized statement"));
    assert_eq!(got[1], "done");
}

#[test]
fn comments_and_block_delimiters() {
    let src = "\
FORCE
start
# whole-line comment
set x = 2   # trailing comment
ekko(x)
end";
    assert_eq!(run_ok(src), ["2"]);
}

#[test]
fn rule_chaining_through_other_rules() {
    let src = "\
LOGIC
rule base: -> 21
rule doubled: -> base * 2
FORCE
ekko(doubled)";
    assert_eq!(run_ok(src), ["42"]);
}

#[test]
fn rule_cycle_fails_cleanly() {
    let src = "\
LOGIC
rule ping: -> pong * 1
rule pong: -> ping * 1
FORCE
ekko(ping)";
    let outcome = run_source(src, false);
    assert!(matches!(
        outcome.error,
        Some(hexbal::EvalError::RecursionLimit(_))
    ));
}

#[test]
fn zero_step_loop_fails_cleanly() {
    let src = "FORCE\nfor i from 1 to 5 step 0\nend";
    let outcome = run_source(src, false);
    assert!(matches!(
        outcome.error,
        Some(hexbal::EvalError::IterationLimit(_))
    ));
}

#[test]
fn debug_flag_reports_registrations() {
    let src = "LOGIC\nrule big: if x > 10 -> \"large\"\nFORCE\nset x = 1";
    let outcome = run_source(src, true);
    assert_eq!(outcome.output, ["% rule added: big"]);
}

// ── Sample programs ───────────────────────────────────────────────────────────

fn samples_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("lib/hexbal")
}

#[test]
fn all_sample_programs_run_clean() {
    let expected: &[(&str, &[&str])] = &[
        ("helloworld.hxbal", &["Hello, World!"]),
        ("math.hxbal", &["38", "17"]),
        (
            "light.hxbal",
            &["the lamp barely glows", "the lamp floods the room"],
        ),
        (
            "fizzbuzz.hxbal",
            &[
                "1", "2", "Fizz", "4", "Buzz", "Fizz", "7", "8", "Fizz", "Buzz", "11", "Fizz",
                "13", "14", "FizzBuzz",
            ],
        ),
    ];

    for (name, lines) in expected {
        let path = samples_dir().join(name);
        let outcome = run_file(&path, false)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
        assert!(
            outcome.error.is_none(),
            "{name} failed: {:?}",
            outcome.error
        );
        assert_eq!(&outcome.output, lines, "{name}");
        assert!(
            !outcome.output.iter().any(|l| l.starts_with('%')),
            "{name} produced diagnostics"
        );
    }
}

#[test]
fn no_sample_program_is_missed() {
    let dir = samples_dir();
    let count = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot open {}: {e}", dir.display()))
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "hxbal"))
        .count();
    assert_eq!(count, 4, "sample set changed — update the expectations");
}

// ── Binary driver ─────────────────────────────────────────────────────────────

#[test]
fn binary_runs_a_program_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".hxbal")
        .tempfile()
        .expect("create temp program");
    writeln!(
        file,
        "LOGIC\nrule big: if x > 10 -> \"large\"\nFORCE\nset x = 15\nekko(big or x)"
    )
    .expect("write temp program");

    let out = Command::new(env!("CARGO_BIN_EXE_hexbal"))
        .arg(file.path())
        .output()
        .expect("failed to spawn hexbal binary");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let mut lines = stdout.lines();
    assert!(lines.next().is_some_and(|l| l.starts_with("Running ")));
    assert_eq!(lines.next(), Some("large"));
}

#[test]
fn binary_runs_inline_source() {
    let out = Command::new(env!("CARGO_BIN_EXE_hexbal"))
        .args(["-c", "FORCE\nekko(\"inline\")"])
        .output()
        .expect("failed to spawn hexbal binary");

    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "inline");
}

#[test]
fn binary_reports_fatal_errors() {
    let out = Command::new(env!("CARGO_BIN_EXE_hexbal"))
        .args(["-c", "FORCE\nset x = 1\nset x = 2"])
        .output()
        .expect("failed to spawn hexbal binary");

    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("already initialized"), "stderr: {stderr}");
}
