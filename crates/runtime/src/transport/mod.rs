//! Newline-framed byte transport.
//!
//! Writes one document followed by [`DELIMITER`] and then reads until the
//! delimiter shows up. TCP is a byte stream, so a single read may return a
//! partial line, several lines, or anything in between; the reader keeps
//! accumulating until the delimiter is somewhere in the buffer.
//!
//! Only one response per request is expected. Bytes following the delimiter
//! in the same read are dropped with a warning rather than carried over.

use dsc_protocol::DELIMITER;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

const READ_CHUNK: usize = 1024;

/// One request/response pair at a time over a byte stream.
pub struct LineTransport<S> {
	stream: Option<S>,
	buffer: Vec<u8>,
}

impl<S> LineTransport<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	pub fn new(stream: S) -> Self {
		Self {
			stream: Some(stream),
			buffer: Vec::with_capacity(READ_CHUNK),
		}
	}

	pub fn is_closed(&self) -> bool {
		self.stream.is_none()
	}

	/// Sends `payload` as one line and returns the next line from the peer,
	/// without its delimiter.
	///
	/// The stream is held outside the transport for the whole exchange and
	/// only put back once a complete line has been read. A failed exchange,
	/// or a future dropped mid-exchange, leaves the transport closed, so a
	/// late reply is never read as the answer to a later request.
	///
	/// # Errors
	///
	/// - [`Error::ConnectionClosed`] after [`close`](Self::close) or a failed exchange
	/// - [`Error::Protocol`] if the peer closes before a delimiter arrives
	/// - [`Error::Io`] for socket failures
	pub async fn send_and_receive(&mut self, payload: &[u8]) -> Result<Vec<u8>> {
		let mut stream = self.stream.take().ok_or(Error::ConnectionClosed)?;
		match exchange(&mut stream, &mut self.buffer, payload).await {
			Ok(line) => {
				self.stream = Some(stream);
				Ok(line)
			}
			Err(err) => {
				debug!(target = "dsc.transport", error = %err, "exchange failed, dropping stream");
				Err(err)
			}
		}
	}

	/// Shuts the stream down. Calling it again is a no-op.
	pub async fn close(&mut self) {
		if let Some(mut stream) = self.stream.take() {
			if let Err(err) = stream.shutdown().await {
				debug!(target = "dsc.transport", error = %err, "shutdown after peer already closed");
			}
		}
	}
}

async fn exchange<S>(stream: &mut S, buffer: &mut Vec<u8>, payload: &[u8]) -> Result<Vec<u8>>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	let mut frame = Vec::with_capacity(payload.len() + 1);
	frame.extend_from_slice(payload);
	frame.push(DELIMITER);
	trace!(target = "dsc.transport", line = %String::from_utf8_lossy(payload), "send");
	stream.write_all(&frame).await?;
	stream.flush().await?;

	buffer.clear();
	let mut scanned = 0;
	let mut chunk = [0u8; READ_CHUNK];
	let end = loop {
		if let Some(offset) = buffer[scanned..].iter().position(|&b| b == DELIMITER) {
			break scanned + offset;
		}
		scanned = buffer.len();

		let n = stream.read(&mut chunk).await?;
		if n == 0 {
			return Err(Error::Protocol(format!(
				"peer closed the connection after {} bytes without a line delimiter",
				buffer.len()
			)));
		}
		buffer.extend_from_slice(&chunk[..n]);
	};

	let trailing = buffer.len() - end - 1;
	if trailing > 0 {
		warn!(target = "dsc.transport", trailing, "discarding bytes received after the response line");
	}

	let line = buffer[..end].to_vec();
	trace!(target = "dsc.transport", line = %String::from_utf8_lossy(&line), "recv");
	Ok(line)
}
