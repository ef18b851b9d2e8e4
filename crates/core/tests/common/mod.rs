#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use dsc_protocol::{Request, Response, encode};
use dsclient::Endpoint;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
		.with_test_writer()
		.try_init();
}

/// Ordered log of `"<peer>:<command>"` entries shared by every peer in a test.
pub type EventLog = Arc<Mutex<Vec<String>>>;

type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// A line-protocol peer on an ephemeral localhost port.
pub struct MockPeer {
	pub port: u16,
	requests: Arc<Mutex<Vec<Request>>>,
}

impl MockPeer {
	pub async fn start<F>(label: &str, events: EventLog, handler: F) -> Self
	where
		F: Fn(&Request) -> Response + Send + Sync + 'static,
	{
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let port = listener.local_addr().unwrap().port();
		let requests = Arc::new(Mutex::new(Vec::new()));
		let handler: Handler = Arc::new(handler);

		let label = label.to_string();
		let log = Arc::clone(&requests);
		tokio::spawn(async move {
			while let Ok((stream, _)) = listener.accept().await {
				tokio::spawn(serve(stream, label.clone(), Arc::clone(&events), Arc::clone(&log), Arc::clone(&handler)));
			}
		});

		Self { port, requests }
	}

	pub fn endpoint(&self) -> Endpoint {
		Endpoint::new("127.0.0.1", self.port)
	}

	pub fn requests(&self) -> Vec<Request> {
		self.requests.lock().clone()
	}

	pub fn commands(&self) -> Vec<String> {
		self.requests.lock().iter().map(|r| r.name.clone()).collect()
	}
}

async fn serve(stream: TcpStream, label: String, events: EventLog, log: Arc<Mutex<Vec<Request>>>, handler: Handler) {
	let mut reader = BufReader::new(stream);
	let mut line = String::new();
	loop {
		line.clear();
		match reader.read_line(&mut line).await {
			Ok(0) | Err(_) => return,
			Ok(_) => {}
		}
		let request: Request = serde_json::from_str(&line).unwrap();
		events.lock().push(format!("{label}:{}", request.name));
		log.lock().push(request.clone());

		let response = handler(&request);
		let mut bytes = encode_response(&response);
		bytes.push(b'\n');
		if reader.get_mut().write_all(&bytes).await.is_err() {
			return;
		}
	}
}

fn encode_response(response: &Response) -> Vec<u8> {
	serde_json::to_vec(response).unwrap()
}

/// Encodes a request the way the client would, for assertions on raw shape.
pub fn encode_request(request: &Request) -> Value {
	serde_json::from_slice(&encode(request).unwrap()).unwrap()
}

pub fn arg<'a>(request: &'a Request, key: &str) -> Option<&'a Value> {
	request.args.as_ref().and_then(|args| args.get(key))
}

/// Emulated session socket: flat memory, registers, and a few fixed answers.
#[derive(Default)]
pub struct SessionState {
	pub memory: HashMap<u64, u8>,
	pub registers: HashMap<String, u64>,
	pub options: HashMap<String, Value>,
	/// When set, every command fails with this message.
	pub fail_with: Option<String>,
}

pub async fn start_session(label: &str, events: EventLog) -> (MockPeer, Arc<Mutex<SessionState>>) {
	let state = Arc::new(Mutex::new(SessionState::default()));
	let shared = Arc::clone(&state);
	let peer = MockPeer::start(label, events, move |request| session_reply(&mut shared.lock(), request)).await;
	(peer, state)
}

fn session_reply(state: &mut SessionState, request: &Request) -> Response {
	if let Some(message) = &state.fail_with {
		return Response::fail(message.clone());
	}
	let u64_arg = |key: &str| arg(request, key).and_then(Value::as_u64).unwrap_or(0);
	match request.name.as_str() {
		"readData" => {
			let address = u64_arg("address");
			let count = u64_arg("numBytes");
			let bytes: Vec<u8> = (0..count).map(|i| state.memory.get(&(address + i)).copied().unwrap_or(0)).collect();
			Response::ok(json!(bytes))
		}
		"writeData" => {
			let address = u64_arg("address");
			let data = arg(request, "data").and_then(Value::as_array).cloned().unwrap_or_default();
			for (i, byte) in data.iter().enumerate() {
				state.memory.insert(address + i as u64, byte.as_u64().unwrap_or(0) as u8);
			}
			Response::ok(None)
		}
		"readRegister" => {
			let name = arg(request, "name").and_then(Value::as_str).unwrap_or_default();
			Response::ok(json!(state.registers.get(name).copied().unwrap_or(0)))
		}
		"writeRegister" => {
			let name = arg(request, "name").and_then(Value::as_str).unwrap_or_default().to_string();
			state.registers.insert(name, u64_arg("value"));
			Response::ok(None)
		}
		"getOption" => {
			let id = arg(request, "id").and_then(Value::as_str).unwrap_or_default();
			Response::ok(state.options.get(id).cloned())
		}
		"setOption" => {
			let id = arg(request, "id").and_then(Value::as_str).unwrap_or_default().to_string();
			let value = arg(request, "value").cloned().unwrap_or(Value::Null);
			state.options.insert(id, value);
			Response::ok(None)
		}
		"evaluate" => Response::ok(json!(if arg(request, "file").is_some() { 7 } else { 42 })),
		"performOperation" => Response::ok(json!({"opcode": arg(request, "opcode")})),
		_ => Response::ok(None),
	}
}

/// Emulated top-level server with a pool of pre-started session sockets.
pub struct FakeServer {
	pub control: MockPeer,
	pub state: Arc<Mutex<ServerState>>,
	pub sessions: HashMap<u16, Arc<Mutex<SessionState>>>,
	pub session_peers: Vec<MockPeer>,
	pub events: EventLog,
}

#[derive(Default)]
pub struct ServerState {
	pub cpus: Vec<String>,
	pub config: Option<String>,
	/// Remote view of open sessions: name -> port.
	pub open: HashMap<String, u16>,
	pub free_ports: VecDeque<u16>,
	pub killed: bool,
	/// Per-command forced failures.
	pub failures: HashMap<String, String>,
}

impl FakeServer {
	/// Starts a server whose CPU list is `cpus`, with `existing` sessions
	/// already open before the client connects.
	pub async fn start(cpus: &[&str], existing: &[&str]) -> Self {
		init_tracing();
		let events: EventLog = Arc::new(Mutex::new(Vec::new()));

		let mut sessions = HashMap::new();
		let mut session_peers = Vec::new();
		let mut state = ServerState {
			cpus: cpus.iter().map(|s| s.to_string()).collect(),
			..ServerState::default()
		};
		for i in 0..4 {
			let (peer, session_state) = start_session(&format!("session{i}"), Arc::clone(&events)).await;
			sessions.insert(peer.port, session_state);
			state.free_ports.push_back(peer.port);
			session_peers.push(peer);
		}
		for name in existing {
			let port = state.free_ports.pop_front().unwrap();
			state.open.insert(name.to_string(), port);
		}

		let state = Arc::new(Mutex::new(state));
		let shared = Arc::clone(&state);
		let control = MockPeer::start("server", Arc::clone(&events), move |request| server_reply(&mut shared.lock(), request)).await;

		Self {
			control,
			state,
			sessions,
			session_peers,
			events,
		}
	}

	pub fn endpoint(&self) -> Endpoint {
		self.control.endpoint()
	}

	pub fn set_cpus(&self, cpus: &[&str]) {
		self.state.lock().cpus = cpus.iter().map(|s| s.to_string()).collect();
	}

	pub fn fail(&self, command: &str, message: &str) {
		self.state.lock().failures.insert(command.to_string(), message.to_string());
	}

	pub fn session_state(&self, port: u16) -> Arc<Mutex<SessionState>> {
		Arc::clone(&self.sessions[&port])
	}

	pub fn session_peer(&self, port: u16) -> &MockPeer {
		self.session_peers.iter().find(|p| p.port == port).unwrap()
	}

	pub fn events(&self) -> Vec<String> {
		self.events.lock().clone()
	}

	pub fn count(&self, command: &str) -> usize {
		self.control.commands().iter().filter(|c| *c == command).count()
	}
}

fn server_reply(state: &mut ServerState, request: &Request) -> Response {
	if let Some(message) = state.failures.get(&request.name) {
		return Response::fail(message.clone());
	}
	let name_arg = || arg(request, "name").and_then(Value::as_str).unwrap_or_default().to_string();
	match request.name.as_str() {
		"getListOfSessions" => {
			let list: Vec<Value> = state.open.iter().map(|(name, port)| json!({"name": name, "port": port})).collect();
			Response::ok(json!(list))
		}
		"getListOfCPUs" => Response::ok(json!(state.cpus)),
		"getListOfDevices" => Response::ok(json!(["CC1310F128", "CC2640R2F"])),
		"getListOfConnections" => Response::ok(json!(["Texas Instruments XDS110 USB Debug Probe"])),
		"getListOfConfigurations" => Response::ok(json!([])),
		"setConfig" => {
			state.config = arg(request, "path").and_then(Value::as_str).map(str::to_string);
			Response::ok(None)
		}
		"getConfig" => Response::ok(state.config.clone().map(Value::from)),
		"createConfig" => Response::ok(json!({
			"name": name_arg(),
			"directory": arg(request, "directory").cloned().unwrap_or(json!("/default")),
		})),
		"openSession" => {
			let name = name_arg();
			if state.open.contains_key(&name) {
				return Response::fail(format!("session {name} already open"));
			}
			let Some(port) = state.free_ports.pop_front() else {
				return Response::fail("no free session ports");
			};
			state.open.insert(name, port);
			Response::ok(json!({"port": port}))
		}
		"terminateSession" => match state.open.remove(&name_arg()) {
			Some(_) => Response::ok(None),
			None => Response::fail("session not open"),
		},
		"killServer" => {
			state.killed = true;
			Response::ok(None)
		}
		_ => Response::ok(None),
	}
}
