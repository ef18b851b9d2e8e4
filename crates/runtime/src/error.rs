//! Error types for the debug server client.

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a debug server or session.
#[derive(Debug, Error)]
pub enum Error {
	/// The TCP connection could not be established.
	#[error("Could not connect to {endpoint}: {source}")]
	ConnectionFailed {
		endpoint: Endpoint,
		#[source]
		source: std::io::Error,
	},

	/// The connection was already closed by `stop`, `kill` or `close`.
	#[error("Connection closed")]
	ConnectionClosed,

	/// Socket failure in the middle of an exchange.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Framing violation, e.g. the peer closed before a full line arrived.
	#[error("Protocol error: {0}")]
	Protocol(String),

	/// Response line was not a valid response envelope.
	#[error("Decode error: {0}")]
	Decode(String),

	/// A well-formed `OK` reply whose payload does not fit the expected type.
	/// The connection stays in sync and usable.
	#[error("Unexpected payload for {command}: {reason}")]
	UnexpectedPayload { command: String, reason: String },

	/// The remote side answered with `FAIL`.
	#[error("Command {command} failed: {message}")]
	Remote { command: String, message: String },

	/// The session is not in the local registry.
	#[error("Session {name} is not open")]
	NotOpen { name: String },

	/// The session is already in the local registry.
	#[error("Session {name} is already open")]
	AlreadyOpen { name: String },

	/// No addressable session name matched the pattern.
	#[error("Could not resolve session name: {pattern}")]
	NameResolution { pattern: String },

	/// More than one addressable session name matched the pattern.
	#[error("Found multiple potential session names for {pattern}: {}", matches.join(", "))]
	AmbiguousName { pattern: String, matches: Vec<String> },

	/// The session name pattern is not a valid regular expression.
	#[error("Invalid session name pattern {pattern}: {reason}")]
	InvalidPattern { pattern: String, reason: String },

	/// Arguments or configuration rejected before anything was sent.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

impl Error {
	/// Returns true if the remote side reported the failure.
	pub fn is_remote(&self) -> bool {
		matches!(self, Error::Remote { .. })
	}

	/// Returns the server's diagnostic if this is a remote failure.
	pub fn remote_message(&self) -> Option<&str> {
		match self {
			Error::Remote { message, .. } => Some(message),
			_ => None,
		}
	}

	/// Returns true for session registry precondition violations.
	pub fn is_registry(&self) -> bool {
		matches!(
			self,
			Error::NotOpen { .. } | Error::AlreadyOpen { .. } | Error::NameResolution { .. } | Error::AmbiguousName { .. } | Error::InvalidPattern { .. }
		)
	}

	/// Returns true if the connection this error came from is no longer usable.
	///
	/// [`Error::UnexpectedPayload`] and [`Error::Remote`] are not fatal: the
	/// reply line was consumed and the next request pairs with the next reply.
	pub fn is_fatal(&self) -> bool {
		matches!(
			self,
			Error::ConnectionFailed { .. } | Error::ConnectionClosed | Error::Io(_) | Error::Protocol(_) | Error::Decode(_)
		)
	}
}
