use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::xpc::decode::Decoder;
use crate::xpc::format::render_value;
use crate::xpc::handle::ObjAddr;
use crate::xpc::host::{BootstrapPort, ConnectionInfo, ErrorLookup, LookupPipe, RecordSink, ValueAccess};
use crate::xpc::lookup::LookupRequest;
use crate::xpc::value::XpcValue;
use crate::xpc::{Result, XpcError};

/// The three outbound send entry points the tracer observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendEntry {
	/// `xpc_connection_send_message`.
	SendMessage,
	/// `xpc_connection_send_message_with_reply`.
	SendMessageWithReply,
	/// `xpc_connection_send_message_with_reply_sync`.
	SendMessageWithReplySync,
}

impl SendEntry {
	/// All observed entry points.
	pub const ALL: [SendEntry; 3] = [
		SendEntry::SendMessage,
		SendEntry::SendMessageWithReply,
		SendEntry::SendMessageWithReplySync,
	];

	/// Exported symbol name of the entry point.
	pub fn symbol(self) -> &'static str {
		match self {
			SendEntry::SendMessage => "xpc_connection_send_message",
			SendEntry::SendMessageWithReply => "xpc_connection_send_message_with_reply",
			SendEntry::SendMessageWithReplySync => "xpc_connection_send_message_with_reply_sync",
		}
	}
}

/// Argument view of one intercepted send call.
#[derive(Debug, Clone, Copy)]
pub struct SendCall {
	/// Entry point that fired.
	pub entry: SendEntry,
	/// Connection argument (first parameter).
	pub connection: ObjAddr,
	/// Message argument (second parameter).
	pub message: ObjAddr,
}

/// Pre-call observer contract.
///
/// The instrumentation capability invokes the observer synchronously on the
/// calling thread, before the real send proceeds, with read access to the
/// call's arguments. An error here is visible to the capability as a
/// failure of that call's instrumentation; nothing is retried or swallowed.
pub trait PreCallObserver: Send + Sync {
	/// Observe one intercepted call.
	fn on_send(&self, call: &SendCall) -> Result<()>;
}

/// Instrumentation capability able to arrange pre-call observation of an
/// outbound send entry point.
pub trait InterceptControl {
	/// Attach `observer` so it runs before every call to `entry`.
	fn attach(&mut self, entry: SendEntry, observer: Arc<dyn PreCallObserver>) -> Result<()>;
}

/// One fully decoded trace record for an intercepted send.
#[derive(Debug, Clone, Serialize)]
pub struct SendRecord {
	/// Symbol name of the intercepted entry point.
	pub function: &'static str,
	/// Service name reported for the connection, when available.
	pub service: Option<String>,
	/// Decoded bootstrap lookup reply describing the connection target.
	pub connection: XpcValue,
	/// Decoded outgoing message.
	pub message: XpcValue,
}

impl SendRecord {
	/// Render the record as one multi-line trace block.
	pub fn render(&self, errors: &dyn ErrorLookup) -> Result<String> {
		let service = self.service.as_deref().unwrap_or("(unknown)");
		let connection = render_value(&self.connection, 3, errors)?;
		let message = render_value(&self.message, 2, errors)?;
		Ok(format!(
			"{function}(\n\tconnection = {{\n\t\t{service} = {connection}\n\t}},\n\tmessage: {label} = {message}\n);",
			function = self.function,
			label = self.message.kind().label(),
		))
	}
}

/// Live tracer wiring the decoder, the bootstrap lookup side channel, and
/// the record sink together.
///
/// Stateless across calls: every interception is an independent activation
/// on the thread that invoked the send, so concurrent sends need no
/// synchronization here.
pub struct SendTracer<H> {
	host: H,
	sink: Arc<dyn RecordSink + Send + Sync>,
}

impl<H> SendTracer<H>
where
	H: ValueAccess + ConnectionInfo + ErrorLookup + LookupPipe + BootstrapPort,
{
	/// Create a tracer over the host capability bundle and output sink.
	pub fn new(host: H, sink: Arc<dyn RecordSink + Send + Sync>) -> Self {
		Self { host, sink }
	}

	/// Borrow the host bundle.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Decode one intercepted call into a record.
	///
	/// Returns `Ok(None)` when the connection argument is null; the message
	/// is not introspectable without a connection. Decode and lookup errors
	/// propagate to the caller.
	pub fn trace(&self, call: &SendCall) -> Result<Option<SendRecord>> {
		if call.connection.is_null() {
			debug!(entry = call.entry.symbol(), "null connection argument, skipping call");
			return Ok(None);
		}

		let service = self.host.connection_name(call.connection)?;
		let reply = self.lookup_service(service.clone())?;
		let decoder = Decoder::new(&self.host);
		let connection = decoder.decode_addr(reply)?;
		let message = decoder.decode_addr(call.message)?;

		Ok(Some(SendRecord {
			function: call.entry.symbol(),
			service,
			connection,
			message,
		}))
	}

	fn lookup_service(&self, name: Option<String>) -> Result<ObjAddr> {
		let port = self.host.bootstrap_port()?;
		let request = LookupRequest::for_service(name.clone(), port);
		self.host.send_lookup(&request).map_err(|err| XpcError::LookupFailed {
			service: name,
			detail: err.to_string(),
		})
	}
}

impl<H> PreCallObserver for SendTracer<H>
where
	H: ValueAccess + ConnectionInfo + ErrorLookup + LookupPipe + BootstrapPort + Send + Sync,
{
	fn on_send(&self, call: &SendCall) -> Result<()> {
		let Some(record) = self.trace(call)? else {
			return Ok(());
		};
		let text = record.render(&self.host)?;
		trace!(function = record.function, bytes = text.len(), "emitting send record");
		self.sink.emit(&text);
		Ok(())
	}
}

/// Attach one observer to all three outbound send entry points.
pub fn attach_send_observers<I>(control: &mut I, observer: Arc<dyn PreCallObserver>) -> Result<()>
where
	I: InterceptControl + ?Sized,
{
	for entry in SendEntry::ALL {
		control.attach(entry, Arc::clone(&observer))?;
	}
	Ok(())
}
