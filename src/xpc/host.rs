use crate::xpc::Result;
use crate::xpc::handle::ObjAddr;
use crate::xpc::lookup::{LookupRequest, RawPort};

/// Signal returned by container visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
	/// Keep visiting members.
	Continue,
	/// Stop the traversal early.
	Stop,
}

/// Read primitives over the traced process's XPC objects.
///
/// Implemented by the instrumentation backend against the live process;
/// substituted with an in-memory fake in tests. All reads are borrowed and
/// side-effect free except [`ValueAccess::dup_fd`], which creates a new
/// descriptor the caller owns.
pub trait ValueAccess {
	/// Runtime class name of the object at `addr`.
	fn type_name(&self, addr: ObjAddr) -> Result<String>;

	/// Raw C-string pointer held by a string object. May be null.
	fn string_ptr(&self, obj: ObjAddr) -> Result<ObjAddr>;

	/// Read the NUL-terminated string at `addr`.
	fn read_cstring(&self, addr: ObjAddr) -> Result<String>;

	/// Signed integer payload of an int64 object.
	fn int64_value(&self, obj: ObjAddr) -> Result<i64>;

	/// Unsigned integer payload of a uint64 object.
	fn uint64_value(&self, obj: ObjAddr) -> Result<u64>;

	/// Float payload of a double object.
	fn double_value(&self, obj: ObjAddr) -> Result<f64>;

	/// Boolean payload of a bool object.
	fn bool_value(&self, obj: ObjAddr) -> Result<bool>;

	/// Tick count payload of a date object.
	fn date_value(&self, obj: ObjAddr) -> Result<i64>;

	/// Duplicate the descriptor held by an fd object and return the new
	/// descriptor number. The duplicate is not closed by this crate.
	fn dup_fd(&self, obj: ObjAddr) -> Result<i32>;

	/// Pointer to a data object's payload bytes. May be null.
	fn data_bytes_ptr(&self, obj: ObjAddr) -> Result<ObjAddr>;

	/// Payload length of a data object.
	fn data_len(&self, obj: ObjAddr) -> Result<usize>;

	/// Read `len` raw bytes starting at `addr`.
	fn read_bytes(&self, addr: ObjAddr, len: usize) -> Result<Vec<u8>>;

	/// Host-rendered description of an opaque object (send rights,
	/// endpoints). The object is never dereferenced beyond this.
	fn describe(&self, obj: ObjAddr) -> Result<String>;

	/// Visit every entry of a dictionary object, synchronously, in the
	/// host's own traversal order. The visitor receives the raw key-string
	/// address and the member object address. A visitor error aborts the
	/// traversal and surfaces unchanged.
	fn apply_dictionary(&self, obj: ObjAddr, visitor: &mut dyn FnMut(ObjAddr, ObjAddr) -> Result<Visit>) -> Result<()>;

	/// Visit every element of an array object in positional order. Same
	/// contract as [`ValueAccess::apply_dictionary`].
	fn apply_array(&self, obj: ObjAddr, visitor: &mut dyn FnMut(usize, ObjAddr) -> Result<Visit>) -> Result<()>;
}

/// Human-readable descriptions for XPC error codes (`xpc_strerror`).
pub trait ErrorLookup {
	/// Describe one error code.
	fn strerror(&self, code: i64) -> Result<String>;
}

/// Connection metadata access on the traced process.
pub trait ConnectionInfo {
	/// Remote service name of a connection, when the host can report one.
	fn connection_name(&self, conn: ObjAddr) -> Result<Option<String>>;
}

/// Access to the traced process's well-known bootstrap port.
pub trait BootstrapPort {
	/// The bootstrap port value.
	fn bootstrap_port(&self) -> Result<RawPort>;
}

/// Side channel to the bootstrap authority, used to resolve service
/// metadata for a connection.
///
/// Blocks the calling thread until the reply arrives or the pipe errors;
/// no timeout is defined.
pub trait LookupPipe {
	/// Send one lookup request and return the address of the reply object.
	fn send_lookup(&self, request: &LookupRequest) -> Result<ObjAddr>;
}

/// Destination for rendered trace records.
pub trait RecordSink {
	/// Emit one multi-line record.
	fn emit(&self, record: &str);
}
