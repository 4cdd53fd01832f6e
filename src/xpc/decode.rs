use crate::xpc::handle::{ObjAddr, ValueHandle};
use crate::xpc::host::{ValueAccess, Visit};
use crate::xpc::kind::Kind;
use crate::xpc::value::{DataValue, DictValue, XpcValue};
use crate::xpc::{Result, XpcError};

/// Width of the format tag at the head of a data payload.
const DATA_FORMAT_TAG_LEN: usize = 8;

/// Tag-driven decoder over an injected host accessor bundle.
///
/// Stateless and re-entrant; one instance can serve any number of decode
/// calls, each of which is a single synchronous walk over the host's
/// object graph.
pub struct Decoder<'h, H: ValueAccess + ?Sized> {
	host: &'h H,
}

impl<'h, H> Decoder<'h, H>
where
	H: ValueAccess + ?Sized,
{
	/// Create a decoder borrowing the host accessors.
	pub fn new(host: &'h H) -> Self {
		Self { host }
	}

	/// Resolve the runtime type at `addr` and decode the full value tree.
	pub fn decode_addr(&self, addr: ObjAddr) -> Result<XpcValue> {
		let handle = ValueHandle::resolve(self.host, addr)?;
		self.decode(&handle)
	}

	/// Decode one handle, recursing into containers.
	///
	/// An unrecognized discriminant decodes to [`XpcValue::Unknown`]; a
	/// failing member inside a container aborts the whole container.
	pub fn decode(&self, handle: &ValueHandle) -> Result<XpcValue> {
		match handle.kind() {
			Kind::Unknown => Ok(XpcValue::Unknown),
			Kind::String => self.decode_string(handle.addr),
			Kind::Int64 => Ok(XpcValue::Int64(self.host.int64_value(handle.addr)?)),
			Kind::Uint64 => Ok(XpcValue::Uint64(self.host.uint64_value(handle.addr)?)),
			Kind::Double => Ok(XpcValue::Double(self.host.double_value(handle.addr)?)),
			Kind::Bool => Ok(XpcValue::Bool(self.host.bool_value(handle.addr)?)),
			Kind::Null => Ok(XpcValue::Null),
			Kind::Date => Ok(XpcValue::Date(self.host.date_value(handle.addr)?)),
			Kind::Fd => Ok(XpcValue::Fd(self.host.dup_fd(handle.addr)?)),
			Kind::Data => self.decode_data(handle.addr),
			Kind::MachSend => Ok(XpcValue::MachSend(self.host.describe(handle.addr)?.into_boxed_str())),
			Kind::Endpoint => Ok(XpcValue::Endpoint(self.host.describe(handle.addr)?.into_boxed_str())),
			Kind::Dictionary => self.decode_dictionary(handle.addr),
			Kind::Array => self.decode_array(handle.addr),
		}
	}

	fn decode_string(&self, obj: ObjAddr) -> Result<XpcValue> {
		let ptr = self.host.string_ptr(obj)?;
		if ptr.is_null() {
			return Err(XpcError::NullPointerDecode { what: "string", at: obj });
		}
		Ok(XpcValue::String(self.host.read_cstring(ptr)?.into_boxed_str()))
	}

	fn decode_data(&self, obj: ObjAddr) -> Result<XpcValue> {
		let ptr = self.host.data_bytes_ptr(obj)?;
		if ptr.is_null() {
			return Err(XpcError::NullPointerDecode { what: "data", at: obj });
		}
		let len = self.host.data_len(obj)?;
		let bytes = self.host.read_bytes(ptr, len)?;
		Ok(XpcValue::Data(DataValue {
			format: format_tag(&bytes),
			body: printable_body(&bytes),
		}))
	}

	fn decode_dictionary(&self, obj: ObjAddr) -> Result<XpcValue> {
		let mut dict = DictValue::new();
		self.host.apply_dictionary(obj, &mut |key_addr, child| {
			if key_addr.is_null() {
				return Err(XpcError::NullPointerDecode {
					what: "dictionary key",
					at: obj,
				});
			}
			let key = self.host.read_cstring(key_addr)?;
			let value = self.decode_addr(child).map_err(|err| XpcError::DictMember {
				key: key.clone(),
				source: Box::new(err),
			})?;
			dict.insert(key, value);
			Ok(Visit::Continue)
		})?;
		Ok(XpcValue::Dictionary(dict))
	}

	fn decode_array(&self, obj: ObjAddr) -> Result<XpcValue> {
		let mut items = Vec::new();
		self.host.apply_array(obj, &mut |index, child| {
			let value = self.decode_addr(child).map_err(|err| XpcError::ArrayMember {
				index,
				source: Box::new(err),
			})?;
			items.push(value);
			Ok(Visit::Continue)
		})?;
		Ok(XpcValue::Array(items))
	}
}

/// First up-to-8 payload bytes as printable text, stopping at a NUL.
fn format_tag(bytes: &[u8]) -> Box<str> {
	let head = &bytes[..bytes.len().min(DATA_FORMAT_TAG_LEN)];
	let end = head.iter().position(|byte| *byte == 0).unwrap_or(head.len());
	String::from_utf8_lossy(&head[..end]).into_owned().into_boxed_str()
}

/// Payload decoded as text up to the first NUL; empty when not valid UTF-8.
fn printable_body(bytes: &[u8]) -> Box<str> {
	let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
	match std::str::from_utf8(&bytes[..end]) {
		Ok(text) => text.into(),
		Err(_) => Box::from(""),
	}
}
