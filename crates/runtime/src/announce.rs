//! Port discovery from a launched server's standard output.
//!
//! The server prints `PORT: <number>` once its listening socket is ready.
//! Whoever launches the process hands its stdout here and gets the port back.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::error::{Error, Result};

const PORT_PREFIX: &str = "PORT:";

/// Extracts the port from a single `PORT: <number>` line.
pub fn parse_port_announcement(line: &str) -> Option<u16> {
	line.trim().strip_prefix(PORT_PREFIX)?.trim().parse().ok()
}

/// Reads lines until the first port announcement.
///
/// Lines that are not announcements (banners, warnings) are skipped.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the stream ends before a port is announced.
pub async fn read_port_announcement<R>(reader: &mut R) -> Result<u16>
where
	R: AsyncBufRead + Unpin,
{
	let mut line = String::new();
	loop {
		line.clear();
		if reader.read_line(&mut line).await? == 0 {
			return Err(Error::Protocol("server output ended before a port was announced".to_string()));
		}
		if let Some(port) = parse_port_announcement(&line) {
			debug!(target = "dsc.connection", port, "server announced port");
			return Ok(port);
		}
	}
}
