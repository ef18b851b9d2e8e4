//! [`DebugServer`] - configuration and session lifecycle.

use std::fmt;
use std::sync::Arc;

use dsc_protocol::command::server as cmd;
use dsc_protocol::{ConfigTarget, CreateConfigArgs, CreatedConfig, SessionEndpoint, SessionInfo, SessionNameArgs, SetConfigArgs};
use dsc_runtime::{Connection, Endpoint, Result};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::registry::{self, SessionRegistry};
use crate::session::DebugSession;

/// Client for a running DebugServer-js instance.
///
/// Owns the server socket and the registry of sessions this client has open.
/// Registry changes (`open_session`, `terminate_session`, `kill`) run under
/// one lock, so two tasks opening the same name cannot both succeed.
pub struct DebugServer {
	connection: Connection,
	sessions: Mutex<SessionRegistry>,
}

impl fmt::Debug for DebugServer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DebugServer").field("endpoint", self.connection.endpoint()).finish_non_exhaustive()
	}
}

impl DebugServer {
	/// Connects to the server and adopts every session it already has open.
	///
	/// # Errors
	///
	/// Returns [`Error::ConnectionFailed`](dsc_runtime::Error::ConnectionFailed)
	/// if the server or one of its existing session sockets is unreachable.
	pub async fn connect(endpoint: Endpoint) -> Result<Self> {
		let connection = Connection::connect(endpoint).await?;
		let existing: Option<Vec<SessionInfo>> = connection.call_no_args(cmd::GET_LIST_OF_SESSIONS).await?;

		let mut registry = SessionRegistry::default();
		for info in existing.unwrap_or_default() {
			let session = DebugSession::attach(info.name, connection.endpoint().with_port(info.port)).await?;
			registry.insert(Arc::new(session))?;
		}
		debug!(target = "dsc.server", endpoint = %connection.endpoint(), existing = registry.len(), "bootstrapped session registry");

		Ok(Self {
			connection,
			sessions: Mutex::new(registry),
		})
	}

	/// Connects using `DSCLIENT_HOST` / `DSCLIENT_PORT`.
	pub async fn connect_from_env() -> Result<Self> {
		Self::connect(Endpoint::from_env()?).await
	}

	pub fn endpoint(&self) -> &Endpoint {
		self.connection.endpoint()
	}

	/// Selects the target configuration (`.ccxml`) file.
	pub async fn set_config(&self, path: &str) -> Result<()> {
		self.connection.call_no_result(cmd::SET_CONFIG, SetConfigArgs { path: path.to_string() }).await
	}

	/// Returns the configuration file in use, if one has been set.
	pub async fn get_config(&self) -> Result<Option<String>> {
		self.connection.call_no_args(cmd::GET_CONFIG).await
	}

	/// Generates a configuration file for a board or a connection/device pair.
	pub async fn create_config(&self, name: &str, target: ConfigTarget, directory: Option<&str>) -> Result<CreatedConfig> {
		let args = CreateConfigArgs {
			name: name.to_string(),
			target,
			directory: directory.map(str::to_string),
		};
		self.connection.call(cmd::CREATE_CONFIG, args).await
	}

	/// CPU names in the current configuration. These are the names sessions
	/// are opened under.
	pub async fn get_list_of_cpus(&self) -> Result<Vec<String>> {
		self.list(cmd::GET_LIST_OF_CPUS).await
	}

	pub async fn get_list_of_devices(&self) -> Result<Vec<String>> {
		self.list(cmd::GET_LIST_OF_DEVICES).await
	}

	pub async fn get_list_of_connections(&self) -> Result<Vec<String>> {
		self.list(cmd::GET_LIST_OF_CONNECTIONS).await
	}

	pub async fn get_list_of_configurations(&self) -> Result<Vec<String>> {
		self.list(cmd::GET_LIST_OF_CONFIGURATIONS).await
	}

	async fn list(&self, command: &str) -> Result<Vec<String>> {
		let names: Option<Vec<String>> = self.connection.call_no_args(command).await?;
		Ok(names.unwrap_or_default())
	}

	/// Resolves a name pattern against the server's current CPU list.
	///
	/// The list is fetched fresh on every call.
	pub async fn resolve_name(&self, pattern: &str) -> Result<String> {
		let candidates = self.get_list_of_cpus().await?;
		registry::resolve_name(pattern, &candidates)
	}

	/// Opens the session whose name `pattern` uniquely matches.
	///
	/// # Errors
	///
	/// - [`Error::NameResolution`](dsc_runtime::Error::NameResolution) /
	///   [`Error::AmbiguousName`](dsc_runtime::Error::AmbiguousName) if the
	///   pattern matches no name or several
	/// - [`Error::AlreadyOpen`](dsc_runtime::Error::AlreadyOpen) if this client
	///   already has that session open
	pub async fn open_session(&self, pattern: &str) -> Result<Arc<DebugSession>> {
		let mut sessions = self.sessions.lock().await;
		let name = self.resolve_name(pattern).await?;
		sessions.ensure_absent(&name)?;

		let endpoint: SessionEndpoint = self.connection.call(cmd::OPEN_SESSION, SessionNameArgs { name: name.clone() }).await?;
		let session = DebugSession::attach(name, self.endpoint().with_port(endpoint.port)).await?;
		info!(target = "dsc.server", session = %session.name(), port = endpoint.port, "session opened");
		sessions.insert(Arc::new(session))
	}

	/// Returns the handle of an already open session.
	///
	/// Every call returns the same handle for the same session.
	pub async fn get_session(&self, pattern: &str) -> Result<Arc<DebugSession>> {
		let sessions = self.sessions.lock().await;
		let name = self.resolve_name(pattern).await?;
		sessions.get(&name)
	}

	/// Stops and terminates an open session by its full name.
	///
	/// The local handle is stopped before the server is asked to terminate,
	/// and the name leaves the registry last.
	pub async fn terminate_session(&self, name: &str) -> Result<()> {
		let mut sessions = self.sessions.lock().await;
		self.terminate_locked(&mut sessions, name).await
	}

	async fn terminate_locked(&self, sessions: &mut SessionRegistry, name: &str) -> Result<()> {
		let session = sessions.get(name)?;
		session.stop().await?;
		self.connection
			.call_no_result(cmd::TERMINATE_SESSION, SessionNameArgs { name: name.to_string() })
			.await?;
		sessions.remove(name);
		info!(target = "dsc.server", session = %name, "session terminated");
		Ok(())
	}

	/// Full names of the sessions this client has open. No I/O.
	pub async fn session_names(&self) -> Vec<String> {
		self.sessions.lock().await.names()
	}

	/// Whether `name` (a full name, not a pattern) is open. No I/O.
	pub async fn is_open(&self, name: &str) -> bool {
		self.sessions.lock().await.contains(name)
	}

	/// Opens the Code Composer Studio GUI attached to this server.
	pub async fn attach_ccs(&self) -> Result<()> {
		self.connection.call_no_result(cmd::ATTACH_CCS, Value::Null).await
	}

	/// Terminates every open session, shuts the server down, and closes the
	/// server socket.
	///
	/// The first failure is returned as-is; sessions already terminated by
	/// then stay terminated and the rest stay in the registry.
	pub async fn kill(&self) -> Result<()> {
		let mut sessions = self.sessions.lock().await;
		for name in sessions.names() {
			self.terminate_locked(&mut sessions, &name).await?;
		}

		self.connection.call_no_result(cmd::KILL_SERVER, Value::Null).await?;
		self.connection.close().await;
		info!(target = "dsc.server", endpoint = %self.endpoint(), "server killed");
		Ok(())
	}
}
