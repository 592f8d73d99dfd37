//! Command-line argument parsing.
//!
//! Usage:
//!   hexbal [-d] [-c <source>] [<file>…]

use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Report rule registrations and other detail (`-d`).
    pub debug: bool,
    /// Program text supplied directly on the command line (`-c <source>`).
    pub source: Option<String>,
    /// Program files to run, in order.
    pub files: Vec<PathBuf>,
}

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();
        match arg {
            // `--` ends flag processing.
            "--" => {
                i += 1;
                args.files.extend(argv[i..].iter().map(PathBuf::from));
                break;
            }
            "-d" => args.debug = true,
            "-c" => {
                i += 1;
                let source = argv
                    .get(i)
                    .ok_or_else(|| "-c requires a program argument".to_owned())?;
                args.source = Some(source.clone());
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("unknown option '{arg}'"));
            }
            _ => args.files.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    if args.source.is_none() && args.files.is_empty() {
        return Err("no program given".to_owned());
    }
    Ok(args)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
