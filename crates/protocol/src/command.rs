//! Command identifiers understood by the remote endpoints.

/// Commands accepted on the top-level server socket.
pub mod server {
	pub const GET_LIST_OF_SESSIONS: &str = "getListOfSessions";
	pub const SET_CONFIG: &str = "setConfig";
	pub const GET_CONFIG: &str = "getConfig";
	pub const CREATE_CONFIG: &str = "createConfig";
	pub const GET_LIST_OF_CPUS: &str = "getListOfCPUs";
	pub const GET_LIST_OF_DEVICES: &str = "getListOfDevices";
	pub const GET_LIST_OF_CONNECTIONS: &str = "getListOfConnections";
	pub const GET_LIST_OF_CONFIGURATIONS: &str = "getListOfConfigurations";
	pub const OPEN_SESSION: &str = "openSession";
	pub const TERMINATE_SESSION: &str = "terminateSession";
	pub const ATTACH_CCS: &str = "attachCCS";
	pub const KILL_SERVER: &str = "killServer";
}

/// Commands accepted on a session socket.
pub mod session {
	pub const CONNECT: &str = "connect";
	pub const DISCONNECT: &str = "disconnect";
	pub const ERASE: &str = "erase";
	pub const RESET: &str = "reset";
	pub const LOAD: &str = "load";
	pub const VERIFY: &str = "verify";
	pub const EVALUATE: &str = "evaluate";
	pub const READ_DATA: &str = "readData";
	pub const WRITE_DATA: &str = "writeData";
	pub const READ_REGISTER: &str = "readRegister";
	pub const WRITE_REGISTER: &str = "writeRegister";
	pub const GET_OPTION: &str = "getOption";
	pub const SET_OPTION: &str = "setOption";
	pub const PERFORM_OPERATION: &str = "performOperation";
	pub const RUN: &str = "run";
	pub const HALT: &str = "halt";
	pub const STOP: &str = "stop";
}
