mod decode;
mod error;
mod format;
mod handle;
mod harness;
mod host;
mod kind;
mod lookup;
mod value;

/// Tag-driven decoder over an injected host.
pub use decode::Decoder;
/// Error and result aliases.
pub use error::{Result, XpcError};
/// Value tree rendering.
pub use format::render_value;
/// Object address and borrowed handle types.
pub use handle::{ObjAddr, ValueHandle};
/// Send interception harness types and entry points.
pub use harness::{
	InterceptControl, PreCallObserver, SendCall, SendEntry, SendRecord, SendTracer, attach_send_observers,
};
/// Host capability traits.
pub use host::{BootstrapPort, ConnectionInfo, ErrorLookup, LookupPipe, RecordSink, ValueAccess, Visit};
/// Runtime discriminant classification.
pub use kind::Kind;
/// Bootstrap lookup request shape and protocol constants.
pub use lookup::{LOOKUP_TYPE, LookupRequest, ROUTINE_LOOKUP, RawPort, SUBSYSTEM_BOOTSTRAP};
/// Decoded value tree types.
pub use value::{DataValue, DictEntry, DictValue, XpcValue};
