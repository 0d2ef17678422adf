//! Protocol Module
//!
//! Line-oriented command stream for driving an [`Engine`](crate::Engine).
//!
//! ## Input Format
//! ```text
//! <n>                     number of commands that follow
//! insert <key> <value>    add value to key's set
//! delete <key> <value>    remove value from key's set
//! find <key>              print key's set
//! ```
//!
//! ### Output
//! One line per `find`: the values in ascending order separated by single
//! spaces, or `null` when the key is absent. `insert` and `delete` print
//! nothing.
//!
//! After the count line every line uses up one of the `n` slots, blank or
//! not. Lines that do not parse (or are not UTF-8) are skipped.

mod codec;
mod command;
mod response;
mod script;

pub use codec::{encode_command, parse_command};
pub use command::{Command, CommandType};
pub use response::Response;
pub use script::{run_script, ScriptStats};
