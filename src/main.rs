//! flatmod entry point
//!
//! Parses arguments and dispatches to the CLI module; prints errors to
//! stderr and exits non-zero on failure.

use flatmod::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
