use crate::xpc::Result;
use crate::xpc::host::ErrorLookup;
use crate::xpc::value::{DataValue, DictValue, XpcValue};

const INDENT: &str = "\t";

/// Render a decoded value as nested structured text.
///
/// `depth` is the indentation depth applied to container entries; top-level
/// calls start at 1, nested containers render at `depth + 1`, and each
/// closing delimiter sits at `depth - 1`. Depth 0 is out of contract.
///
/// Pure: no I/O, no mutation of the input. Errors come only from the
/// [`ErrorLookup`] collaborator, consulted for dictionary entries whose key
/// is exactly `error`.
pub fn render_value(value: &XpcValue, depth: usize, errors: &dyn ErrorLookup) -> Result<String> {
	match value {
		XpcValue::Unknown => Ok("unknown".to_owned()),
		XpcValue::String(text) => Ok(text.to_string()),
		XpcValue::Int64(v) => Ok(v.to_string()),
		XpcValue::Uint64(v) => Ok(v.to_string()),
		XpcValue::Double(v) => Ok(v.to_string()),
		XpcValue::Bool(v) => Ok(v.to_string()),
		XpcValue::Null => Ok("null".to_owned()),
		XpcValue::Date(ticks) => Ok(ticks.to_string()),
		XpcValue::Fd(fd) => Ok(fd.to_string()),
		XpcValue::Data(data) => Ok(render_data(data, depth)),
		XpcValue::MachSend(desc) => Ok(desc.to_string()),
		XpcValue::Endpoint(desc) => Ok(desc.to_string()),
		XpcValue::Dictionary(dict) => render_dictionary(dict, depth, errors),
		XpcValue::Array(items) => render_array(items, depth, errors),
	}
}

fn render_dictionary(dict: &DictValue, depth: usize, errors: &dyn ErrorLookup) -> Result<String> {
	let pad = INDENT.repeat(depth);
	let mut lines = Vec::with_capacity(dict.len());
	for entry in dict.entries() {
		let rendered = if entry.key.as_ref() == "error" {
			render_error_entry(&entry.value, depth, errors)?
		} else {
			render_value(&entry.value, depth + 1, errors)?
		};
		lines.push(format!("{pad}{key}: {label} = {rendered}", key = entry.key, label = entry.value.kind().label()));
	}
	Ok(format!("{{\n{}\n{}}}", lines.join(",\n"), close_pad(depth)))
}

fn render_array(items: &[XpcValue], depth: usize, errors: &dyn ErrorLookup) -> Result<String> {
	let pad = INDENT.repeat(depth);
	let mut lines = Vec::with_capacity(items.len());
	for item in items {
		let rendered = render_value(item, depth + 1, errors)?;
		lines.push(format!("{pad}: {label} = {rendered}", label = item.kind().label()));
	}
	Ok(format!("[\n{}\n{}]", lines.join(",\n"), close_pad(depth)))
}

fn render_data(data: &DataValue, depth: usize) -> String {
	let pad = INDENT.repeat(depth);
	format!(
		"{{\n{pad}format = {format},\n{pad}body = {{\n{body}\n{pad}}}\n{close}}}",
		format = data.format,
		body = data.body,
		close = close_pad(depth),
	)
}

/// An `error` entry renders its code through the lookup collaborator; any
/// non-integer value under that key falls back to the default rendering.
fn render_error_entry(value: &XpcValue, depth: usize, errors: &dyn ErrorLookup) -> Result<String> {
	match value {
		XpcValue::Int64(code) => errors.strerror(*code),
		other => render_value(other, depth + 1, errors),
	}
}

fn close_pad(depth: usize) -> String {
	INDENT.repeat(depth.saturating_sub(1))
}
