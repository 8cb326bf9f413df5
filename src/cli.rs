//! Output and exit codes for the one-shot `ross generate` command.

use std::io::{self, Write};

use crate::core::controller::Outcome;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// The token is missing or was rejected.
pub const EXIT_LOGIN_REQUIRED: u8 = 2;

/// Writes the outcome to `out` (response) or `err` (failure, login notice)
/// and returns the process exit code.
pub fn report_outcome(
    outcome: &Outcome,
    html: bool,
    login_path: &str,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<u8> {
    match outcome {
        Outcome::Success(text) => {
            let rendered = if html {
                text.to_html()
            } else {
                text.plain_text()
            };
            writeln!(out, "{rendered}")?;
            Ok(EXIT_SUCCESS)
        }
        Outcome::Failure(message) => {
            writeln!(err, "{message}")?;
            Ok(EXIT_FAILURE)
        }
        Outcome::LoginRequired => {
            writeln!(
                err,
                "Login required: sign in at {login_path} and run `ross token set <TOKEN>`"
            )?;
            Ok(EXIT_LOGIN_REQUIRED)
        }
    }
}
