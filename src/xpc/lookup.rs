/// Bootstrap subsystem id carried by every lookup request.
pub const SUBSYSTEM_BOOTSTRAP: u64 = 3;
/// Bootstrap routine id for a service lookup.
pub const ROUTINE_LOOKUP: u64 = 0x324;
/// Handle type field expected by the lookup routine.
pub const LOOKUP_TYPE: u64 = 7;

/// Raw mach port name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPort(pub u32);

/// Fixed-shape bootstrap lookup request.
///
/// The one outbound value this crate constructs itself. The pipe
/// collaborator turns it into the wire dictionary; a lookup has no
/// observable effect on the target beyond a normal query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
	/// Subsystem id, always [`SUBSYSTEM_BOOTSTRAP`].
	pub subsystem: u64,
	/// Target handle, always 0.
	pub handle: u64,
	/// Operation code, always [`ROUTINE_LOOKUP`].
	pub routine: u64,
	/// Service name, omitted when the connection reports none.
	pub name: Option<String>,
	/// Lookup type field, always [`LOOKUP_TYPE`].
	pub lookup_type: u64,
	/// The caller's bootstrap port, carried as a send right.
	pub domain_port: RawPort,
	/// Legacy flag expected by the bootstrap authority.
	pub legacy: bool,
}

impl LookupRequest {
	/// Build a lookup request for an optional service name.
	pub fn for_service(name: Option<String>, domain_port: RawPort) -> Self {
		Self {
			subsystem: SUBSYSTEM_BOOTSTRAP,
			handle: 0,
			routine: ROUTINE_LOOKUP,
			name,
			lookup_type: LOOKUP_TYPE,
			domain_port,
			legacy: true,
		}
	}
}
