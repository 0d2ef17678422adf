//! Command codec
//!
//! Parsing and rendering of command lines.
//!
//! ### Grammar
//! - `insert <key> <i32>`
//! - `delete <key> <i32>`
//! - `find <key>`
//!
//! Tokens are separated by any ASCII whitespace. Keys are any token.

use crate::error::{Result, SetKvError};

use super::Command;

/// Parse one command line
pub fn parse_command(line: &str) -> Result<Command> {
    let mut tokens = line.split_whitespace();

    let verb = tokens
        .next()
        .ok_or_else(|| SetKvError::Protocol("Empty command".to_string()))?;

    let command = match verb {
        "insert" => Command::Insert {
            key: next_key(&mut tokens, verb)?,
            value: next_value(&mut tokens, verb)?,
        },
        "delete" => Command::Delete {
            key: next_key(&mut tokens, verb)?,
            value: next_value(&mut tokens, verb)?,
        },
        "find" => Command::Find {
            key: next_key(&mut tokens, verb)?,
        },
        other => {
            return Err(SetKvError::Protocol(format!("Unknown command: {:?}", other)));
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(SetKvError::Protocol(format!(
            "Unexpected trailing token after {}: {:?}",
            verb, extra
        )));
    }

    Ok(command)
}

/// Render a command as a single line (without newline)
pub fn encode_command(command: &Command) -> String {
    match command {
        Command::Insert { key, value } => format!("insert {} {}", key, value),
        Command::Delete { key, value } => format!("delete {} {}", key, value),
        Command::Find { key } => format!("find {}", key),
    }
}

// =============================================================================
// Internal Helpers
// =============================================================================

fn next_key<'a>(tokens: &mut impl Iterator<Item = &'a str>, verb: &str) -> Result<String> {
    tokens
        .next()
        .map(str::to_string)
        .ok_or_else(|| SetKvError::Protocol(format!("{}: missing key", verb)))
}

fn next_value<'a>(tokens: &mut impl Iterator<Item = &'a str>, verb: &str) -> Result<i32> {
    let token = tokens
        .next()
        .ok_or_else(|| SetKvError::Protocol(format!("{}: missing value", verb)))?;

    token.parse::<i32>().map_err(|e| {
        SetKvError::Protocol(format!("{}: invalid value {:?}: {}", verb, token, e))
    })
}
