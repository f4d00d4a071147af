use crate::error::{LoginError, Result};
use std::io::{self, BufRead, Write};

/// Source of one-time MFA codes
#[cfg_attr(test, mockall::automock)]
pub trait MfaPrompt {
    fn read_token(&self, serial_number: &str) -> Result<String>;
}

/// Prompts on stderr and reads a single line from stdin
#[derive(Debug, Default)]
pub struct TerminalMfaPrompt;

impl MfaPrompt for TerminalMfaPrompt {
    fn read_token(&self, serial_number: &str) -> Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "Enter MFA code for {}: ", serial_number).map_err(LoginError::MfaReadFailed)?;
        stderr.flush().map_err(LoginError::MfaReadFailed)?;

        read_token_line(&mut io::stdin().lock())
    }
}

fn read_token_line(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(LoginError::MfaReadFailed)?;
    if read == 0 {
        return Err(LoginError::MfaReadFailed(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no MFA code entered",
        )));
    }

    Ok(line.trim().to_string())
}
