//! Rust client for DebugServer-js.
//!
//! A [`DebugServer`] wraps the server's control socket: target configuration,
//! device/CPU listings, and the lifecycle of debug sessions. Each open
//! session is a [`DebugSession`] with its own socket for device operations
//! (connect, flash, memory and register access, run/halt).
//!
//! ```ignore
//! use dsclient::{DebugServer, Endpoint};
//!
//! let server = DebugServer::connect(Endpoint::localhost(port)).await?;
//! server.set_config("/path/to/CC1310F128.ccxml").await?;
//!
//! let session = server.open_session("Cortex_M3").await?;
//! session.connect().await?;
//! session.load("/path/to/app.out").await?;
//! let word = session.read_data(0x2000_0000, 0, 4).await?;
//!
//! server.kill().await?;
//! ```

mod registry;
mod server;
mod session;

pub use dsc_protocol::{ConfigTarget, CreatedConfig, ImageOptions, ReadDataArgs, SessionInfo};
pub use dsc_runtime::{Endpoint, Error, Result, parse_port_announcement, read_port_announcement};
pub use registry::resolve_name;
pub use server::DebugServer;
pub use session::DebugSession;
