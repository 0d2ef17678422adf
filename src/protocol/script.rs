//! Script driver
//!
//! Reads a command stream, executes it against an engine, writes responses.

use std::io::{BufRead, Write};

use crate::engine::Engine;
use crate::error::Result;

use super::parse_command;

/// Counters from one [`run_script`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptStats {
    /// Commands executed
    pub executed: usize,
    /// Malformed lines skipped
    pub skipped: usize,
    /// Lines written to the output
    pub outputs: usize,
}

/// Execute a command stream
///
/// The first non-blank line is the number of commands to run. If it is not a
/// number, there is no limit and that line is itself treated as a command.
/// After a count header every line uses up one command slot: blank lines are
/// consumed silently, malformed lines (including ones that are not UTF-8) are
/// logged and skipped. Without a header, blank lines are ignored. Storage
/// failures abort the run.
pub fn run_script<R: BufRead, W: Write>(
    engine: &mut Engine,
    mut reader: R,
    writer: &mut W,
) -> Result<ScriptStats> {
    let mut stats = ScriptStats::default();
    let mut limit: Option<usize> = None;
    let mut seen_header = false;
    let mut processed = 0usize;
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let text = std::str::from_utf8(&buf).ok().map(str::trim);

        if !seen_header {
            match text {
                Some("") => continue,
                Some(line) => {
                    seen_header = true;
                    if let Ok(n) = line.parse::<usize>() {
                        tracing::debug!(commands = n, "Script header read");
                        limit = Some(n);
                        continue;
                    }
                }
                None => seen_header = true,
            }
        }

        if limit.is_some_and(|n| processed >= n) {
            break;
        }

        let line = match text {
            Some("") if limit.is_none() => continue,
            Some(line) => line,
            None => {
                processed += 1;
                tracing::warn!(line = line_no, "Skipping command that is not valid UTF-8");
                stats.skipped += 1;
                continue;
            }
        };
        processed += 1;

        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(line = line_no, "Skipping malformed command: {}", e);
                stats.skipped += 1;
                continue;
            }
        };

        tracing::trace!(line = line_no, ?command, "Executing");
        let response = engine.execute(command)?;
        stats.executed += 1;

        if response.has_output() {
            writeln!(writer, "{}", response)?;
            stats.outputs += 1;
        }
    }

    writer.flush()?;
    Ok(stats)
}
