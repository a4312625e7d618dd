//! # Scale CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and turns errors into exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | I/O failure or a failed external command |
//! | 2 | usage, configuration, parse or invalid-input error |
//! | 3 | HTTP failure or an error response from the server |

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
