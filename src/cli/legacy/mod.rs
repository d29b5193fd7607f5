//! Shared driver for the positional-argument tools
//!
//! `cxbopt`, `cxbups` and `cxbrnd` keep their historical command lines:
//! a usage text on stdout with exit code 3 for bad arguments, and
//! `Error: ...` on stderr with exit code 1 when the computation fails.

pub mod cxbopt;
pub mod cxbrnd;
pub mod cxbups;

use crate::cli::init_tracing;
use crate::error::Error;
use clap::Parser;

/// Exit code for malformed command lines
pub const USAGE_EXIT_CODE: i32 = 3;

/// Outcome of a legacy tool invocation
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Text for stdout
    Output(String),
    /// Print the usage text
    Usage,
    /// Message for stderr
    Failed(String),
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Output(_) => 0,
            Outcome::Usage => USAGE_EXIT_CODE,
            Outcome::Failed(_) => 1,
        }
    }
}

/// Parse `argv` and run `command`, mapping every failure to an outcome
pub fn execute<A, F, I, T>(argv: I, command: F) -> Outcome
where
    A: Parser,
    F: FnOnce(A) -> crate::Result<String>,
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = match A::try_parse_from(argv) {
        Ok(args) => args,
        Err(_) => return Outcome::Usage,
    };

    match command(args) {
        Ok(output) => Outcome::Output(output),
        Err(Error::Argument(_)) => Outcome::Usage,
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

/// Run a legacy tool against the process arguments and exit
pub fn main<A, F>(usage: &str, command: F) -> !
where
    A: Parser,
    F: FnOnce(A) -> crate::Result<String>,
{
    init_tracing();

    let outcome = execute(std::env::args_os(), command);
    match &outcome {
        Outcome::Output(output) => print!("{}", output),
        Outcome::Usage => print!("{}", usage),
        Outcome::Failed(message) => eprintln!("Error: {}", message),
    }
    std::process::exit(outcome.exit_code())
}
