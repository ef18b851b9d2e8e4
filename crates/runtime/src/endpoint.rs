//! Socket addresses for the server and its sessions.

use std::fmt;

use crate::error::{Error, Result};

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Environment variable overriding the server host.
pub const HOST_ENV: &str = "DSCLIENT_HOST";

/// Environment variable holding the server port.
pub const PORT_ENV: &str = "DSCLIENT_PORT";

/// A `(host, port)` pair identifying one TCP connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
	pub host: String,
	pub port: u16,
}

impl Endpoint {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port }
	}

	pub fn localhost(port: u16) -> Self {
		Self::new(DEFAULT_HOST, port)
	}

	/// Same host, different port. Sessions live next to their server.
	pub fn with_port(&self, port: u16) -> Self {
		Self::new(self.host.clone(), port)
	}

	/// Reads the server endpoint from `DSCLIENT_HOST` and `DSCLIENT_PORT`.
	///
	/// The host falls back to [`DEFAULT_HOST`]; the port is required.
	pub fn from_env() -> Result<Self> {
		Self::from_vars(std::env::var(HOST_ENV).ok(), std::env::var(PORT_ENV).ok())
	}

	fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self> {
		let host = host.filter(|h| !h.trim().is_empty()).unwrap_or_else(|| DEFAULT_HOST.to_string());
		let port = port.ok_or_else(|| Error::InvalidArgument(format!("{PORT_ENV} is not set")))?;
		let port = port
			.trim()
			.parse::<u16>()
			.map_err(|e| Error::InvalidArgument(format!("{PORT_ENV}={port:?} is not a valid port: {e}")))?;
		Ok(Self { host, port })
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}
