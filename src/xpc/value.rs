use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::xpc::kind::Kind;

/// One decoded XPC value.
///
/// Composite variants own their children; traversal is driven by the host's
/// one-shot apply mechanism, so the tree is always finite and acyclic.
#[derive(Debug, Clone)]
pub enum XpcValue {
	/// Unrecognized object kind, kept as an opaque placeholder.
	Unknown,
	/// UTF-8 string payload.
	String(Box<str>),
	/// Signed 64-bit integer.
	Int64(i64),
	/// Unsigned 64-bit integer.
	Uint64(u64),
	/// Double-precision float.
	Double(f64),
	/// Boolean.
	Bool(bool),
	/// Null value.
	Null,
	/// Date as raw tick count reported by the host.
	Date(i64),
	/// Duplicated file descriptor. The decoder never closes the duplicate;
	/// ownership sits with whoever consumes the tree.
	Fd(i32),
	/// Binary payload with a format tag and best-effort text body.
	Data(DataValue),
	/// Mach send right, carried as descriptive text only.
	MachSend(Box<str>),
	/// Connection endpoint, carried as descriptive text only.
	Endpoint(Box<str>),
	/// Ordered key/value mapping.
	Dictionary(DictValue),
	/// Ordered element sequence.
	Array(Vec<XpcValue>),
}

impl XpcValue {
	/// Kind tag for this value.
	pub fn kind(&self) -> Kind {
		match self {
			XpcValue::Unknown => Kind::Unknown,
			XpcValue::String(_) => Kind::String,
			XpcValue::Int64(_) => Kind::Int64,
			XpcValue::Uint64(_) => Kind::Uint64,
			XpcValue::Double(_) => Kind::Double,
			XpcValue::Bool(_) => Kind::Bool,
			XpcValue::Null => Kind::Null,
			XpcValue::Date(_) => Kind::Date,
			XpcValue::Fd(_) => Kind::Fd,
			XpcValue::Data(_) => Kind::Data,
			XpcValue::MachSend(_) => Kind::MachSend,
			XpcValue::Endpoint(_) => Kind::Endpoint,
			XpcValue::Dictionary(_) => Kind::Dictionary,
			XpcValue::Array(_) => Kind::Array,
		}
	}
}

/// Binary payload split into its leading format tag and decoded body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DataValue {
	/// First up-to-8 payload bytes as printable text.
	pub format: Box<str>,
	/// Payload decoded as text, empty when the bytes are not text.
	pub body: Box<str>,
}

/// One dictionary entry.
#[derive(Debug, Clone)]
pub struct DictEntry {
	/// Entry key.
	pub key: Box<str>,
	/// Entry value.
	pub value: XpcValue,
}

/// Dictionary preserving host visitation order.
///
/// Keys are unique; inserting an existing key overwrites the value in place
/// and keeps the first-seen position.
#[derive(Debug, Clone, Default)]
pub struct DictValue {
	entries: Vec<DictEntry>,
}

impl DictValue {
	/// Create an empty dictionary.
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	/// Insert one entry, overwriting in place on a duplicate key.
	pub fn insert(&mut self, key: impl Into<Box<str>>, value: XpcValue) {
		let key = key.into();
		if let Some(existing) = self.entries.iter_mut().find(|entry| entry.key == key) {
			existing.value = value;
			return;
		}
		self.entries.push(DictEntry { key, value });
	}

	/// Look up a value by key.
	pub fn get(&self, key: &str) -> Option<&XpcValue> {
		self.entries.iter().find(|entry| entry.key.as_ref() == key).map(|entry| &entry.value)
	}

	/// Entries in insertion order.
	pub fn entries(&self) -> &[DictEntry] {
		&self.entries
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return whether the dictionary has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl FromIterator<(Box<str>, XpcValue)> for DictValue {
	fn from_iter<I: IntoIterator<Item = (Box<str>, XpcValue)>>(iter: I) -> Self {
		let mut dict = DictValue::new();
		for (key, value) in iter {
			dict.insert(key, value);
		}
		dict
	}
}

impl Serialize for DictValue {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for entry in &self.entries {
			map.serialize_entry(entry.key.as_ref(), &entry.value)?;
		}
		map.end()
	}
}

impl Serialize for XpcValue {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			XpcValue::Unknown => single_entry(serializer, "unknown", &()),
			XpcValue::String(text) => serializer.serialize_str(text),
			XpcValue::Int64(value) => serializer.serialize_i64(*value),
			XpcValue::Uint64(value) => serializer.serialize_u64(*value),
			XpcValue::Double(value) => serializer.serialize_f64(*value),
			XpcValue::Bool(value) => serializer.serialize_bool(*value),
			XpcValue::Null => serializer.serialize_unit(),
			XpcValue::Date(ticks) => single_entry(serializer, "date", ticks),
			XpcValue::Fd(fd) => single_entry(serializer, "fd", fd),
			XpcValue::Data(data) => data.serialize(serializer),
			XpcValue::MachSend(desc) => single_entry(serializer, "mach-send", desc.as_ref()),
			XpcValue::Endpoint(desc) => single_entry(serializer, "endpoint", desc.as_ref()),
			XpcValue::Dictionary(dict) => dict.serialize(serializer),
			XpcValue::Array(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
		}
	}
}

fn single_entry<S, T>(serializer: S, key: &'static str, value: &T) -> std::result::Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize + ?Sized,
{
	let mut map = serializer.serialize_map(Some(1))?;
	map.serialize_entry(key, value)?;
	map.end()
}
