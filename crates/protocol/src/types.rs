//! Payload shapes returned in the `data` field of successful responses.

use serde::{Deserialize, Serialize};

/// One entry of `getListOfSessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
	/// Full session name (usually the CPU name it is bound to).
	pub name: String,
	/// Port of the session's own socket.
	pub port: u16,
}

/// Reply to `openSession`: where the freshly allocated session listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndpoint {
	pub port: u16,
}

/// Reply to `createConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedConfig {
	/// File name of the created configuration.
	pub name: String,
	/// Directory the file was written to.
	#[serde(default)]
	pub directory: Option<String>,
}
