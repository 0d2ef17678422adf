//! Response definitions
//!
//! Result of executing a command, rendered as one output line (or none).

use std::fmt;

use crate::set::SortedSet;

/// A response to a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Mutation applied (or a no-op); produces no output
    Done,

    /// Values of a present key, ascending
    Values(Vec<i32>),

    /// Key is absent
    Null,
}

impl Response {
    /// Build the response to a `find`
    pub fn from_find(found: Option<SortedSet>) -> Self {
        match found {
            Some(set) => Response::Values(set.into_vec()),
            None => Response::Null,
        }
    }

    /// Whether this response is written to the output stream
    pub fn has_output(&self) -> bool {
        !matches!(self, Response::Done)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Done => Ok(()),
            Response::Null => f.write_str("null"),
            Response::Values(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            }
        }
    }
}
