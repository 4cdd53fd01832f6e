/// Classified kind of one XPC object.
///
/// Covers the thirteen concrete kinds the decoder understands plus an
/// explicit [`Kind::Unknown`] fallback, so an unrecognized runtime class
/// can always be represented without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Unrecognized runtime class.
	Unknown,
	/// `OS_xpc_string`.
	String,
	/// `OS_xpc_int64`.
	Int64,
	/// `OS_xpc_uint64`.
	Uint64,
	/// `OS_xpc_double`.
	Double,
	/// `OS_xpc_bool`.
	Bool,
	/// `OS_xpc_null`.
	Null,
	/// `OS_xpc_date`.
	Date,
	/// `OS_xpc_fd`.
	Fd,
	/// `OS_xpc_data`.
	Data,
	/// `OS_xpc_mach_send`.
	MachSend,
	/// `OS_xpc_endpoint`.
	Endpoint,
	/// `OS_xpc_dictionary`.
	Dictionary,
	/// `OS_xpc_array`.
	Array,
}

/// Runtime class names the dispatcher recognizes.
const DISCRIMINANTS: [(&str, Kind); 13] = [
	("OS_xpc_string", Kind::String),
	("OS_xpc_int64", Kind::Int64),
	("OS_xpc_uint64", Kind::Uint64),
	("OS_xpc_double", Kind::Double),
	("OS_xpc_bool", Kind::Bool),
	("OS_xpc_null", Kind::Null),
	("OS_xpc_date", Kind::Date),
	("OS_xpc_fd", Kind::Fd),
	("OS_xpc_data", Kind::Data),
	("OS_xpc_mach_send", Kind::MachSend),
	("OS_xpc_endpoint", Kind::Endpoint),
	("OS_xpc_dictionary", Kind::Dictionary),
	("OS_xpc_array", Kind::Array),
];

impl Kind {
	/// Map a runtime class name onto a kind.
	///
	/// Exact match only; anything unrecognized is [`Kind::Unknown`], never
	/// an error.
	pub fn from_discriminant(name: &str) -> Kind {
		DISCRIMINANTS
			.iter()
			.find(|(candidate, _)| *candidate == name)
			.map(|(_, kind)| *kind)
			.unwrap_or(Kind::Unknown)
	}

	/// Short label used in rendered output.
	pub fn label(self) -> &'static str {
		match self {
			Kind::Unknown => "unknown",
			Kind::String => "string",
			Kind::Int64 => "int64",
			Kind::Uint64 => "uint64",
			Kind::Double => "double",
			Kind::Bool => "bool",
			Kind::Null => "null",
			Kind::Date => "date",
			Kind::Fd => "fd",
			Kind::Data => "data",
			Kind::MachSend => "mach-send",
			Kind::Endpoint => "endpoint",
			Kind::Dictionary => "dictionary",
			Kind::Array => "array",
		}
	}
}
