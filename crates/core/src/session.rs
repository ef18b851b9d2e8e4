//! [`DebugSession`] handle for one open debug session.

use std::fmt;

use dsc_protocol::command::session as cmd;
use dsc_protocol::{
	EvaluateArgs, HaltArgs, ImageArgs, ImageOptions, OptionIdArgs, PerformOperationArgs, ReadDataArgs, RegisterArgs, RunArgs,
	SetOptionArgs, WriteDataArgs, WriteRegisterArgs,
};
use dsc_runtime::{Connection, Endpoint, Error, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Device operations for a session bound to one CPU.
///
/// Obtained from [`DebugServer::open_session`](crate::DebugServer::open_session)
/// or [`DebugServer::get_session`](crate::DebugServer::get_session); never
/// constructed directly. Each session talks over its own socket, so
/// different sessions can be driven from different tasks concurrently.
pub struct DebugSession {
	name: String,
	connection: Connection,
}

impl fmt::Debug for DebugSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DebugSession")
			.field("name", &self.name)
			.field("endpoint", self.connection.endpoint())
			.finish()
	}
}

impl DebugSession {
	/// Connects to a session socket the server has already allocated.
	pub(crate) async fn attach(name: impl Into<String>, endpoint: Endpoint) -> Result<Self> {
		let name = name.into();
		let connection = Connection::connect(endpoint).await?;
		debug!(target = "dsc.session", session = %name, endpoint = %connection.endpoint(), "attached");
		Ok(Self { name, connection })
	}

	/// Full resolved session name.
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn endpoint(&self) -> &Endpoint {
		self.connection.endpoint()
	}

	/// Returns true once [`stop`](Self::stop) has closed the socket.
	pub async fn is_stopped(&self) -> bool {
		self.connection.is_closed().await
	}

	/// Connects to the target device.
	pub async fn connect(&self) -> Result<()> {
		self.connection.call_no_result(cmd::CONNECT, Value::Null).await
	}

	/// Disconnects from the target device.
	pub async fn disconnect(&self) -> Result<()> {
		self.connection.call_no_result(cmd::DISCONNECT, Value::Null).await
	}

	/// Erases the device's flash.
	pub async fn erase(&self) -> Result<()> {
		self.connection.call_no_result(cmd::ERASE, Value::Null).await
	}

	pub async fn reset(&self) -> Result<()> {
		self.connection.call_no_result(cmd::RESET, Value::Null).await
	}

	/// Flashes an image file. Shorthand for [`load_with`](Self::load_with)
	/// with default [`ImageOptions`].
	pub async fn load(&self, file: &str) -> Result<()> {
		self.load_with(file, ImageOptions::default()).await
	}

	/// Flashes an image file.
	///
	/// `options.address` only has a documented meaning for binary images, but
	/// it is forwarded either way.
	pub async fn load_with(&self, file: &str, options: ImageOptions) -> Result<()> {
		let args = ImageArgs {
			file: file.to_string(),
			options,
		};
		self.connection.call_no_result(cmd::LOAD, args).await
	}

	/// Verifies flash contents against an image file.
	pub async fn verify(&self, file: &str) -> Result<()> {
		self.verify_with(file, ImageOptions::default()).await
	}

	pub async fn verify_with(&self, file: &str, options: ImageOptions) -> Result<()> {
		let args = ImageArgs {
			file: file.to_string(),
			options,
		};
		self.connection.call_no_result(cmd::VERIFY, args).await
	}

	/// Evaluates a C/GEL expression and returns its integer value.
	pub async fn evaluate(&self, expression: &str) -> Result<i64> {
		let args = EvaluateArgs {
			expression: expression.to_string(),
			file: None,
		};
		self.connection.call(cmd::EVALUATE, args).await
	}

	/// Loads symbols from `file`, then evaluates `expression`.
	pub async fn evaluate_with_symbols(&self, expression: &str, file: &str) -> Result<i64> {
		let args = EvaluateArgs {
			expression: expression.to_string(),
			file: Some(file.to_string()),
		};
		self.connection.call(cmd::EVALUATE, args).await
	}

	/// Reads `num_bytes` bytes of target memory.
	pub async fn read_data(&self, address: u64, page: u32, num_bytes: usize) -> Result<Vec<u8>> {
		self.read(ReadDataArgs::new(address).page(page).num_bytes(num_bytes)).await
	}

	/// Reads target memory described by `args`.
	pub async fn read(&self, args: ReadDataArgs) -> Result<Vec<u8>> {
		self.connection.call(cmd::READ_DATA, args).await
	}

	/// Writes bytes to target memory.
	pub async fn write_data(&self, data: &[u8], address: u64, page: u32) -> Result<()> {
		let args = WriteDataArgs {
			data: data.to_vec(),
			address,
			page,
		};
		self.connection.call_no_result(cmd::WRITE_DATA, args).await
	}

	pub async fn read_register(&self, name: &str) -> Result<u64> {
		let args = RegisterArgs { name: name.to_string() };
		self.connection.call(cmd::READ_REGISTER, args).await
	}

	pub async fn write_register(&self, name: &str, value: u64) -> Result<()> {
		let args = WriteRegisterArgs {
			name: name.to_string(),
			value,
		};
		self.connection.call_no_result(cmd::WRITE_REGISTER, args).await
	}

	/// Reads a device option. The value's type depends on the option.
	pub async fn get_option(&self, id: &str) -> Result<Value> {
		self.connection.call(cmd::GET_OPTION, OptionIdArgs { id: id.to_string() }).await
	}

	pub async fn set_option(&self, id: &str, value: impl Serialize) -> Result<()> {
		let value = serde_json::to_value(value).map_err(|e| Error::InvalidArgument(format!("option {id}: {e}")))?;
		let args = SetOptionArgs { id: id.to_string(), value };
		self.connection.call_no_result(cmd::SET_OPTION, args).await
	}

	/// Runs a flash operation by opcode and returns whatever it produces.
	pub async fn perform_operation(&self, opcode: &str) -> Result<Value> {
		let args = PerformOperationArgs { opcode: opcode.to_string() };
		self.connection.call(cmd::PERFORM_OPERATION, args).await
	}

	/// Starts the target.
	///
	/// With `asynchronous` the reply comes back once the run command is
	/// issued; otherwise the server holds its reply until the run completes.
	pub async fn run(&self, asynchronous: bool) -> Result<()> {
		self.connection.call_no_result(cmd::RUN, RunArgs { asynchronous }).await
	}

	/// Halts the target, optionally waiting until it has actually stopped.
	pub async fn halt(&self, wait: bool) -> Result<()> {
		self.connection.call_no_result(cmd::HALT, HaltArgs { wait }).await
	}

	/// Ends this client's use of the session without terminating it.
	///
	/// The socket is closed whatever the server answers. A remote failure is
	/// still returned after the socket is gone. Stopping an already stopped
	/// session, including from two tasks at once, sends nothing more and
	/// returns `Ok(())`.
	pub async fn stop(&self) -> Result<()> {
		let result = self.connection.call_and_close(cmd::STOP, Value::Null).await;
		if let Err(err) = &result {
			warn!(target = "dsc.session", session = %self.name, error = %err, "stop was not acknowledged");
		}
		result
	}
}
