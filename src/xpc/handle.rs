use std::fmt;

use crate::xpc::host::ValueAccess;
use crate::xpc::kind::Kind;
use crate::xpc::{Result, XpcError};

/// Raw address of an object living in the traced process.
///
/// Never dereferenced directly; every read goes through a host primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjAddr(pub u64);

impl ObjAddr {
	/// The null address.
	pub const NULL: ObjAddr = ObjAddr(0);

	/// Return whether this is the null address.
	pub fn is_null(self) -> bool {
		self.0 == 0
	}
}

impl fmt::Display for ObjAddr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:016x}", self.0)
	}
}

/// Borrowed reference to one tagged value: its address plus the runtime
/// type discriminant the host reported for it.
///
/// Valid only while the traced process's memory is accessible; never
/// outlives the decode call that produced it.
#[derive(Debug, Clone)]
pub struct ValueHandle {
	/// Address of the referenced object.
	pub addr: ObjAddr,
	/// Runtime class name reported by the host. May be any string.
	pub discriminant: Box<str>,
}

impl ValueHandle {
	/// Build a handle from an address and an already-known discriminant.
	pub fn new(addr: ObjAddr, discriminant: impl Into<Box<str>>) -> Self {
		Self {
			addr,
			discriminant: discriminant.into(),
		}
	}

	/// Query the host for the runtime type at `addr` and build a handle.
	pub fn resolve<H>(host: &H, addr: ObjAddr) -> Result<Self>
	where
		H: ValueAccess + ?Sized,
	{
		if addr.is_null() {
			return Err(XpcError::NullPointerDecode { what: "object", at: addr });
		}
		let discriminant = host.type_name(addr)?;
		Ok(Self {
			addr,
			discriminant: discriminant.into_boxed_str(),
		})
	}

	/// Classify the discriminant, falling back to [`Kind::Unknown`].
	pub fn kind(&self) -> Kind {
		Kind::from_discriminant(&self.discriminant)
	}
}
