use hexbal::cli;
use hexbal::program::{self, RunOutcome};

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("hexbal: {e}");
            eprintln!("Usage: hexbal [-d] [-c <source>] [<file>…]");
            std::process::exit(2);
        }
    };

    let mut failed = false;

    if let Some(source) = &args.source {
        failed |= print_outcome(program::run_source(source, args.debug));
    }

    for path in &args.files {
        println!("Running {}:", path.display());
        match program::run_file(path, args.debug) {
            Ok(outcome) => failed |= print_outcome(outcome),
            Err(e) => {
                eprintln!("hexbal: {}: {e}", path.display());
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

/// Print a run's output lines, then any fatal error.  Returns `true` when
/// the run failed.
fn print_outcome(outcome: RunOutcome) -> bool {
    for line in &outcome.output {
        println!("{line}");
    }
    match outcome.error {
        Some(e) => {
            eprintln!("hexbal: {e}");
            true
        }
        None => false,
    }
}
