//! Command definitions
//!
//! Represents commands read from the input stream.

use std::fmt;

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Insert,
    Delete,
    Find,
}

impl CommandType {
    /// Keyword used on the wire
    pub fn keyword(&self) -> &'static str {
        match self {
            CommandType::Insert => "insert",
            CommandType::Delete => "delete",
            CommandType::Find => "find",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a value to a key's set
    Insert { key: String, value: i32 },

    /// Remove a value from a key's set
    Delete { key: String, value: i32 },

    /// Fetch a key's set
    Find { key: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Insert { .. } => CommandType::Insert,
            Command::Delete { .. } => CommandType::Delete,
            Command::Find { .. } => CommandType::Find,
        }
    }

    /// Key the command operates on
    pub fn key(&self) -> &str {
        match self {
            Command::Insert { key, .. } | Command::Delete { key, .. } | Command::Find { key } => key,
        }
    }
}
