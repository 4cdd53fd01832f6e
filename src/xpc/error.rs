use thiserror::Error;

use crate::xpc::handle::ObjAddr;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, XpcError>;

/// Errors produced while decoding, rendering, and tracing XPC traffic.
#[derive(Debug, Error)]
pub enum XpcError {
	/// A value claimed to hold a pointer that is null. Surfaced, never
	/// masked to an empty value, since it signals a stale or invalid handle.
	#[error("{what} pointer at {at} is null")]
	NullPointerDecode {
		/// What the pointer was supposed to reference.
		what: &'static str,
		/// Address of the offending object.
		at: ObjAddr,
	},
	/// A host accessor primitive failed.
	#[error("host primitive {call} failed: {detail}")]
	HostPrimitive {
		/// Name of the failing primitive.
		call: &'static str,
		/// Host-reported failure detail.
		detail: String,
	},
	/// A dictionary member failed to decode; aborts the whole dictionary.
	#[error("dictionary member {key:?} failed to decode")]
	DictMember {
		/// Key of the failing entry.
		key: String,
		/// Underlying decode failure.
		#[source]
		source: Box<XpcError>,
	},
	/// An array member failed to decode; aborts the whole array.
	#[error("array member {index} failed to decode")]
	ArrayMember {
		/// Position of the failing element.
		index: usize,
		/// Underlying decode failure.
		#[source]
		source: Box<XpcError>,
	},
	/// The synthetic bootstrap lookup round trip could not be completed.
	#[error("bootstrap lookup failed for service {service:?}: {detail}")]
	LookupFailed {
		/// Service name the lookup was issued for, when known.
		service: Option<String>,
		/// Pipe-reported failure detail.
		detail: String,
	},
	/// The instrumentation capability could not attach an observer.
	#[error("attach failed for {symbol}: {detail}")]
	AttachFailed {
		/// Entry-point symbol being attached.
		symbol: &'static str,
		/// Capability-reported failure detail.
		detail: String,
	},
}
