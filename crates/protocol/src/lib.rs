//! Wire types for the debug server line protocol.
//!
//! Both the top-level server and every session speak the same framing: one
//! JSON object per line, a request answered by exactly one response.
//!
//! ```text
//! -> {"name": "readData", "args": {"address": 4096, "page": 0, "numBytes": 4}}
//! <- {"status": "OK", "data": [0, 0, 0, 0]}
//! ```
//!
//! Types in this crate are pure data. Sending them and interpreting the
//! status lives in `dsc-runtime`.

pub mod args;
pub mod command;
pub mod envelope;
pub mod types;

pub use args::*;
pub use envelope::{DELIMITER, Request, Response, Status, decode, encode};
pub use types::*;
