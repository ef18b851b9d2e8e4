//! Argument shapes for every command that takes arguments.
//!
//! Each struct serializes to the `args` object of a [`Request`](crate::Request).
//! Field names follow the remote side's camelCase spelling.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `setConfig` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfigArgs {
	/// Full path to the target configuration (`.ccxml`) file.
	pub path: String,
}

/// What a generated configuration describes.
///
/// Either a named board, or an explicit connection and device pair. The
/// remote side rejects anything else, so no other shape is representable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigTarget {
	Board { board: String },
	Connection { connection: String, device: String },
}

impl ConfigTarget {
	pub fn board(board: impl Into<String>) -> Self {
		Self::Board { board: board.into() }
	}

	pub fn connection(connection: impl Into<String>, device: impl Into<String>) -> Self {
		Self::Connection {
			connection: connection.into(),
			device: device.into(),
		}
	}
}

/// `createConfig` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateConfigArgs {
	/// File name of the configuration to create.
	pub name: String,
	#[serde(flatten)]
	pub target: ConfigTarget,
	/// Directory to place the file in; the server default when omitted.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub directory: Option<String>,
}

/// `openSession` / `terminateSession` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNameArgs {
	pub name: String,
}

/// Image handling shared by `load` and `verify`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
	/// Treat the file as a raw binary image rather than an object file.
	pub binary: bool,
	/// Placement address for binary images. Always forwarded, even when
	/// `binary` is false; the remote side decides whether it applies.
	pub address: u64,
}

impl ImageOptions {
	pub fn binary_at(address: u64) -> Self {
		Self { binary: true, address }
	}
}

/// `load` / `verify` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArgs {
	pub file: String,
	#[serde(flatten)]
	pub options: ImageOptions,
}

/// `evaluate` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateArgs {
	/// C or GEL expression.
	pub expression: String,
	/// Symbol file loaded before evaluating. The key is absent, not `null`,
	/// when no file is given.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub file: Option<String>,
}

/// `readData` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadDataArgs {
	pub address: u64,
	pub page: u32,
	pub num_bytes: usize,
}

impl ReadDataArgs {
	/// One byte from page 0.
	pub fn new(address: u64) -> Self {
		Self {
			address,
			page: 0,
			num_bytes: 1,
		}
	}

	pub fn page(mut self, page: u32) -> Self {
		self.page = page;
		self
	}

	pub fn num_bytes(mut self, num_bytes: usize) -> Self {
		self.num_bytes = num_bytes;
		self
	}
}

/// `writeData` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteDataArgs {
	pub data: Vec<u8>,
	pub address: u64,
	pub page: u32,
}

/// `readRegister` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterArgs {
	pub name: String,
}

/// `writeRegister` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRegisterArgs {
	pub name: String,
	pub value: u64,
}

/// `getOption` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionIdArgs {
	pub id: String,
}

/// `setOption` arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOptionArgs {
	pub id: String,
	pub value: Value,
}

/// `performOperation` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformOperationArgs {
	pub opcode: String,
}

/// `run` arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArgs {
	/// Reply as soon as the run command is issued instead of on completion.
	pub asynchronous: bool,
}

/// `halt` arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaltArgs {
	/// Delay the reply until the target has actually halted.
	pub wait: bool,
}
