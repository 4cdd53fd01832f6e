#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use xpcsnoop::xpc::{
	BootstrapPort, ConnectionInfo, ErrorLookup, InterceptControl, LookupPipe, LookupRequest, ObjAddr, PreCallObserver,
	RawPort, RecordSink, Result, SendEntry, ValueAccess, Visit, XpcError,
};

/// One object in the fake process image.
pub enum FakeObj {
	/// String object holding a raw C-string pointer (0 = null pointer).
	Str { ptr: u64 },
	Int64(i64),
	Uint64(u64),
	Double(f64),
	Bool(bool),
	Null,
	Date(i64),
	Fd(i32),
	/// Data object with a payload pointer (0 = null) and length.
	Data { ptr: u64, len: usize },
	MachSend(String),
	Endpoint(String),
	/// Entries as (key C-string address, member object address) pairs.
	Dict(Vec<(u64, u64)>),
	Array(Vec<u64>),
	/// Object reporting an arbitrary runtime class name.
	Custom(String),
}

/// In-memory substitute for the instrumentation backend's host primitives.
#[derive(Default)]
pub struct FakeHost {
	pub objects: HashMap<u64, FakeObj>,
	pub cstrings: HashMap<u64, String>,
	pub bytes: HashMap<u64, Vec<u8>>,
	pub conn_names: HashMap<u64, String>,
	pub lookup_reply: u64,
	pub lookup_fail: bool,
	pub requests: Mutex<Vec<LookupRequest>>,
}

impl FakeHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, addr: u64, obj: FakeObj) {
		self.objects.insert(addr, obj);
	}

	pub fn insert_cstring(&mut self, addr: u64, text: &str) {
		self.cstrings.insert(addr, text.to_owned());
	}

	pub fn insert_bytes(&mut self, addr: u64, bytes: &[u8]) {
		self.bytes.insert(addr, bytes.to_vec());
	}

	/// Register a string object at `obj_addr` whose payload lives at `str_addr`.
	pub fn insert_str_obj(&mut self, obj_addr: u64, str_addr: u64, text: &str) {
		self.insert(obj_addr, FakeObj::Str { ptr: str_addr });
		self.insert_cstring(str_addr, text);
	}

	fn obj(&self, addr: ObjAddr) -> Result<&FakeObj> {
		self.objects.get(&addr.0).ok_or_else(|| XpcError::HostPrimitive {
			call: "object",
			detail: format!("no object at {addr}"),
		})
	}

	fn wrong_kind(call: &'static str, addr: ObjAddr) -> XpcError {
		XpcError::HostPrimitive {
			call,
			detail: format!("wrong object kind at {addr}"),
		}
	}
}

impl ValueAccess for FakeHost {
	fn type_name(&self, addr: ObjAddr) -> Result<String> {
		Ok(match self.obj(addr)? {
			FakeObj::Str { .. } => "OS_xpc_string".to_owned(),
			FakeObj::Int64(_) => "OS_xpc_int64".to_owned(),
			FakeObj::Uint64(_) => "OS_xpc_uint64".to_owned(),
			FakeObj::Double(_) => "OS_xpc_double".to_owned(),
			FakeObj::Bool(_) => "OS_xpc_bool".to_owned(),
			FakeObj::Null => "OS_xpc_null".to_owned(),
			FakeObj::Date(_) => "OS_xpc_date".to_owned(),
			FakeObj::Fd(_) => "OS_xpc_fd".to_owned(),
			FakeObj::Data { .. } => "OS_xpc_data".to_owned(),
			FakeObj::MachSend(_) => "OS_xpc_mach_send".to_owned(),
			FakeObj::Endpoint(_) => "OS_xpc_endpoint".to_owned(),
			FakeObj::Dict(_) => "OS_xpc_dictionary".to_owned(),
			FakeObj::Array(_) => "OS_xpc_array".to_owned(),
			FakeObj::Custom(class) => class.clone(),
		})
	}

	fn string_ptr(&self, obj: ObjAddr) -> Result<ObjAddr> {
		match self.obj(obj)? {
			FakeObj::Str { ptr } => Ok(ObjAddr(*ptr)),
			_ => Err(Self::wrong_kind("xpc_string_get_string_ptr", obj)),
		}
	}

	fn read_cstring(&self, addr: ObjAddr) -> Result<String> {
		self.cstrings.get(&addr.0).cloned().ok_or_else(|| XpcError::HostPrimitive {
			call: "read_cstring",
			detail: format!("no string at {addr}"),
		})
	}

	fn int64_value(&self, obj: ObjAddr) -> Result<i64> {
		match self.obj(obj)? {
			FakeObj::Int64(value) => Ok(*value),
			_ => Err(Self::wrong_kind("xpc_int64_get_value", obj)),
		}
	}

	fn uint64_value(&self, obj: ObjAddr) -> Result<u64> {
		match self.obj(obj)? {
			FakeObj::Uint64(value) => Ok(*value),
			_ => Err(Self::wrong_kind("xpc_uint64_get_value", obj)),
		}
	}

	fn double_value(&self, obj: ObjAddr) -> Result<f64> {
		match self.obj(obj)? {
			FakeObj::Double(value) => Ok(*value),
			_ => Err(Self::wrong_kind("xpc_double_get_value", obj)),
		}
	}

	fn bool_value(&self, obj: ObjAddr) -> Result<bool> {
		match self.obj(obj)? {
			FakeObj::Bool(value) => Ok(*value),
			_ => Err(Self::wrong_kind("xpc_bool_get_value", obj)),
		}
	}

	fn date_value(&self, obj: ObjAddr) -> Result<i64> {
		match self.obj(obj)? {
			FakeObj::Date(value) => Ok(*value),
			_ => Err(Self::wrong_kind("xpc_date_get_value", obj)),
		}
	}

	fn dup_fd(&self, obj: ObjAddr) -> Result<i32> {
		match self.obj(obj)? {
			FakeObj::Fd(fd) => Ok(*fd),
			_ => Err(Self::wrong_kind("xpc_fd_dup", obj)),
		}
	}

	fn data_bytes_ptr(&self, obj: ObjAddr) -> Result<ObjAddr> {
		match self.obj(obj)? {
			FakeObj::Data { ptr, .. } => Ok(ObjAddr(*ptr)),
			_ => Err(Self::wrong_kind("xpc_data_get_bytes_ptr", obj)),
		}
	}

	fn data_len(&self, obj: ObjAddr) -> Result<usize> {
		match self.obj(obj)? {
			FakeObj::Data { len, .. } => Ok(*len),
			_ => Err(Self::wrong_kind("xpc_data_get_length", obj)),
		}
	}

	fn read_bytes(&self, addr: ObjAddr, len: usize) -> Result<Vec<u8>> {
		let bytes = self.bytes.get(&addr.0).ok_or_else(|| XpcError::HostPrimitive {
			call: "read_bytes",
			detail: format!("no bytes at {addr}"),
		})?;
		Ok(bytes[..len.min(bytes.len())].to_vec())
	}

	fn describe(&self, obj: ObjAddr) -> Result<String> {
		match self.obj(obj)? {
			FakeObj::MachSend(desc) | FakeObj::Endpoint(desc) => Ok(desc.clone()),
			_ => Err(Self::wrong_kind("xpc_copy_description", obj)),
		}
	}

	fn apply_dictionary(&self, obj: ObjAddr, visitor: &mut dyn FnMut(ObjAddr, ObjAddr) -> Result<Visit>) -> Result<()> {
		let FakeObj::Dict(entries) = self.obj(obj)? else {
			return Err(Self::wrong_kind("xpc_dictionary_apply", obj));
		};
		for (key, member) in entries {
			if let Visit::Stop = visitor(ObjAddr(*key), ObjAddr(*member))? {
				break;
			}
		}
		Ok(())
	}

	fn apply_array(&self, obj: ObjAddr, visitor: &mut dyn FnMut(usize, ObjAddr) -> Result<Visit>) -> Result<()> {
		let FakeObj::Array(members) = self.obj(obj)? else {
			return Err(Self::wrong_kind("xpc_array_apply", obj));
		};
		for (index, member) in members.iter().enumerate() {
			if let Visit::Stop = visitor(index, ObjAddr(*member))? {
				break;
			}
		}
		Ok(())
	}
}

impl ErrorLookup for FakeHost {
	fn strerror(&self, code: i64) -> Result<String> {
		Ok(format!("fake xpc error {code}"))
	}
}

impl ConnectionInfo for FakeHost {
	fn connection_name(&self, conn: ObjAddr) -> Result<Option<String>> {
		Ok(self.conn_names.get(&conn.0).cloned())
	}
}

impl BootstrapPort for FakeHost {
	fn bootstrap_port(&self) -> Result<RawPort> {
		Ok(RawPort(0x707))
	}
}

impl LookupPipe for FakeHost {
	fn send_lookup(&self, request: &LookupRequest) -> Result<ObjAddr> {
		self.requests.lock().expect("request log lock").push(request.clone());
		if self.lookup_fail {
			return Err(XpcError::HostPrimitive {
				call: "xpc_pipe_routine",
				detail: "pipe returned status 5".to_owned(),
			});
		}
		Ok(ObjAddr(self.lookup_reply))
	}
}

/// Sink collecting emitted records for assertions.
#[derive(Default)]
pub struct VecSink {
	pub records: Mutex<Vec<String>>,
}

impl RecordSink for VecSink {
	fn emit(&self, record: &str) {
		self.records.lock().expect("sink lock").push(record.to_owned());
	}
}

/// Intercept capability recording which entry points were attached.
#[derive(Default)]
pub struct FakeControl {
	pub attached: Vec<SendEntry>,
}

impl InterceptControl for FakeControl {
	fn attach(&mut self, entry: SendEntry, _observer: std::sync::Arc<dyn PreCallObserver>) -> Result<()> {
		self.attached.push(entry);
		Ok(())
	}
}
