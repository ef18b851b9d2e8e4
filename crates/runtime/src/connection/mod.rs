//! Remote call dispatcher.
//!
//! A [`Connection`] owns one socket and turns a command name plus arguments
//! into exactly one request line, waits for exactly one response line, and
//! maps the response status onto [`Result`].
//!
//! # Message Flow
//!
//! 1. Caller invokes [`Connection::call`] with a command and typed arguments
//! 2. Arguments are serialized into the request envelope's `args` object
//! 3. The transport lock is taken, so at most one request is in flight
//! 4. The line is sent and the reply line awaited
//! 5. `FAIL` becomes [`Error::Remote`], `OK` yields the `data` payload

use dsc_protocol::{Request, Response, Status, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::transport::LineTransport;

/// A synchronous request/response channel to one server or session socket.
pub struct Connection<S = TcpStream> {
	endpoint: Endpoint,
	transport: Mutex<LineTransport<S>>,
}

impl Connection<TcpStream> {
	/// Opens a TCP connection to `endpoint`.
	///
	/// # Errors
	///
	/// Returns [`Error::ConnectionFailed`] if the socket cannot be established.
	pub async fn connect(endpoint: Endpoint) -> Result<Self> {
		let stream = match TcpStream::connect((endpoint.host.as_str(), endpoint.port)).await {
			Ok(stream) => stream,
			Err(source) => return Err(Error::ConnectionFailed { endpoint, source }),
		};
		if let Err(err) = stream.set_nodelay(true) {
			debug!(target = "dsc.connection", %endpoint, error = %err, "could not disable nagle");
		}
		debug!(target = "dsc.connection", %endpoint, "connected");
		Ok(Self::from_stream(endpoint, stream))
	}
}

impl<S> Connection<S>
where
	S: AsyncRead + AsyncWrite + Unpin + Send,
{
	/// Wraps an already established stream.
	pub fn from_stream(endpoint: Endpoint, stream: S) -> Self {
		Self {
			endpoint,
			transport: Mutex::new(LineTransport::new(stream)),
		}
	}

	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Sends a command with arguments and decodes the payload into `R`.
	///
	/// `params` must serialize to a JSON object, or to `null` for no
	/// arguments. An absent payload decodes like `null`, so `R = ()` and
	/// `R = Option<T>` accept commands that return nothing.
	pub async fn call<P: Serialize, R: DeserializeOwned>(&self, command: &str, params: P) -> Result<R> {
		let request = build_request(command, params)?;
		let data = self.send(&request).await?;
		serde_json::from_value(data).map_err(|e| Error::UnexpectedPayload {
			command: command.to_string(),
			reason: e.to_string(),
		})
	}

	/// Sends a command without arguments.
	pub async fn call_no_args<R: DeserializeOwned>(&self, command: &str) -> Result<R> {
		self.call(command, Value::Null).await
	}

	/// Sends a command whose payload is ignored.
	pub async fn call_no_result<P: Serialize>(&self, command: &str, params: P) -> Result<()> {
		let _: Value = self.call(command, params).await?;
		Ok(())
	}

	/// Sends a prepared request and returns the raw payload.
	pub async fn send(&self, request: &Request) -> Result<Value> {
		let mut transport = self.transport.lock().await;
		self.send_locked(&mut transport, request).await
	}

	/// Sends a final command, then closes the socket whatever the reply.
	///
	/// Both happen under one transport lock. If the socket is already closed
	/// nothing is sent and the call succeeds.
	pub async fn call_and_close<P: Serialize>(&self, command: &str, params: P) -> Result<()> {
		let request = build_request(command, params)?;
		let mut transport = self.transport.lock().await;
		if transport.is_closed() {
			return Ok(());
		}
		let result = self.send_locked(&mut transport, &request).await;
		debug!(target = "dsc.connection", endpoint = %self.endpoint, command, "closing after final command");
		transport.close().await;
		result.map(drop)
	}

	async fn send_locked(&self, transport: &mut LineTransport<S>, request: &Request) -> Result<Value> {
		let payload = encode(request).map_err(|e| Error::InvalidArgument(format!("cannot encode {}: {e}", request.name)))?;

		debug!(target = "dsc.connection", endpoint = %self.endpoint, command = %request.name, "dispatch");
		let line = transport.send_and_receive(&payload).await?;

		let response = decode(&line).map_err(|e| Error::Decode(format!("invalid response to {}: {e}", request.name)))?;
		into_payload(&request.name, response)
	}

	/// Closes the socket. Later calls fail with [`Error::ConnectionClosed`].
	pub async fn close(&self) {
		let mut transport = self.transport.lock().await;
		if !transport.is_closed() {
			debug!(target = "dsc.connection", endpoint = %self.endpoint, "closing");
		}
		transport.close().await;
	}

	pub async fn is_closed(&self) -> bool {
		self.transport.lock().await.is_closed()
	}
}

fn build_request<P: Serialize>(command: &str, params: P) -> Result<Request> {
	Ok(match to_args(command, params)? {
		Some(args) => Request::with_args(command, args),
		None => Request::new(command),
	})
}

fn to_args<P: Serialize>(command: &str, params: P) -> Result<Option<Map<String, Value>>> {
	match serde_json::to_value(params) {
		Ok(Value::Null) => Ok(None),
		Ok(Value::Object(map)) => Ok(Some(map)),
		Ok(other) => Err(Error::InvalidArgument(format!("{command} arguments must be an object, got {other}"))),
		Err(e) => Err(Error::InvalidArgument(format!("cannot serialize {command} arguments: {e}"))),
	}
}

fn into_payload(command: &str, response: Response) -> Result<Value> {
	match response.status {
		Status::Ok => Ok(response.into_data()),
		Status::Fail => {
			let message = response.message.unwrap_or_default();
			warn!(target = "dsc.connection", command, %message, "remote command failed");
			Err(Error::Remote {
				command: command.to_string(),
				message,
			})
		}
	}
}
