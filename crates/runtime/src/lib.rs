//! Debug server runtime - transport, dispatch, and configuration
//!
//! This crate provides the low-level plumbing for talking to a DebugServer-js
//! instance and its sessions:
//!
//! - **Transport**: newline-framed JSON over a TCP stream
//! - **Connection**: one request, one response, status mapped to [`Result`]
//! - **Endpoint**: host/port configuration, including environment overrides
//! - **Announce**: reading the `PORT: <n>` line a launched server prints
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  dsclient   │  DebugServer, DebugSession, session registry
//! └──────┬──────┘
//!        │ call(command, args)
//! ┌──────▼──────┐
//! │ dsc-runtime │  This crate
//! │  ┌────────┐ │
//! │  │ Conn   │ │  Status handling, typed payloads
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  Line framing
//! │  └────────┘ │
//! └─────────────┘
//! ```

pub mod announce;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod transport;

pub use announce::{parse_port_announcement, read_port_announcement};
pub use connection::Connection;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use transport::LineTransport;
