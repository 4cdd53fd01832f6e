//! Decoding and live tracing of XPC objects in a foreign process.
//!
//! The crate never owns the memory it inspects: every read, traversal, and
//! interception goes through capability traits supplied by an
//! instrumentation backend, so the whole decode/render/trace pipeline can
//! run unchanged against a fake host in tests.

/// XPC value decoding, rendering, and the outbound-send tracing harness.
pub mod xpc;
