//! Request and response envelopes plus the newline codec.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Frame delimiter for both directions.
///
/// Serialized JSON never contains a raw newline (they are escaped inside
/// strings), so the first `\n` always ends the document.
pub const DELIMITER: u8 = b'\n';

/// A single command sent to a server or session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
	/// Command identifier, e.g. `openSession` or `readData`.
	pub name: String,
	/// Named arguments. The key is omitted entirely when there are none.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub args: Option<Map<String, Value>>,
}

impl Request {
	/// Request without arguments.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), args: None }
	}

	/// Request with the given argument map.
	pub fn with_args(name: impl Into<String>, args: Map<String, Value>) -> Self {
		Self {
			name: name.into(),
			args: Some(args),
		}
	}
}

/// Outcome reported by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
	Ok,
	Fail,
}

/// Reply to a [`Request`].
///
/// `data` is only meaningful on [`Status::Ok`], `message` only on
/// [`Status::Fail`]. An absent `data` and an explicit `null` decode the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
	pub status: Status,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Response {
	pub fn ok(data: impl Into<Option<Value>>) -> Self {
		Self {
			status: Status::Ok,
			data: data.into(),
			message: None,
		}
	}

	pub fn fail(message: impl Into<String>) -> Self {
		Self {
			status: Status::Fail,
			data: None,
			message: Some(message.into()),
		}
	}

	pub fn is_ok(&self) -> bool {
		self.status == Status::Ok
	}

	/// Payload with absent and `null` folded into [`Value::Null`].
	pub fn into_data(self) -> Value {
		self.data.unwrap_or(Value::Null)
	}
}

/// Serializes a request to UTF-8 JSON. The delimiter is not appended.
pub fn encode(request: &Request) -> serde_json::Result<Vec<u8>> {
	serde_json::to_vec(request)
}

/// Parses one response document.
///
/// Fails when the bytes are not JSON or the object has no `status` field.
/// Trailing carriage returns and whitespace are tolerated.
pub fn decode(bytes: &[u8]) -> serde_json::Result<Response> {
	serde_json::from_slice(bytes)
}
